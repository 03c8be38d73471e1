//! Abbreviated money display (`1.5k`, `23.45M`, ...).
//!
//! The output must stay identical to what earlier versions of the game
//! showed, including how a second-decimal tie rounds (half-up, like
//! JavaScript's `toFixed`).

const SUFFIXES: &[(f64, &str)] = &[
    (1e3, "k"),
    (1e6, "M"),
    (1e9, "B"),
    (1e12, "T"),
    (1e15, "P"),
    (1e18, "E"),
    (1e21, "Z"),
    (1e24, "Y"),
];

/// Format a currency amount.
///
/// Below 1000 the value is floored and shown as a plain integer. Otherwise it
/// is divided by the largest suffix threshold it reaches, rounded to two
/// decimals with trailing zeros dropped, and suffixed. Inputs with no
/// applicable suffix (NaN, infinities) fall back to exponential notation.
pub fn format_money(n: f64) -> String {
    if n < 1000.0 {
        return format!("{}", n.floor());
    }
    for &(threshold, suffix) in SUFFIXES.iter().rev() {
        if n >= threshold && n.is_finite() {
            return format!("{}{}", display_number(round_2(n / threshold)), suffix);
        }
    }
    to_exponential_2(n)
}

/// Round to two decimals, ties away from zero.
fn round_2(x: f64) -> f64 {
    // Only multiples of 1/8 can sit exactly on a 0.005 boundary.
    let exact_tie = (x * 8.0).fract() == 0.0 && (x * 4.0).fract() != 0.0;
    if exact_tie {
        return ((x * 100.0).floor() + 1.0) / 100.0;
    }
    format!("{x:.2}").parse().unwrap_or(x)
}

/// Shortest round-trip rendering, switching to `1e+21` style for huge values.
fn display_number(x: f64) -> String {
    if x.abs() >= 1e21 {
        format!("{x:e}").replacen('e', "e+", 1)
    } else {
        format!("{x}")
    }
}

fn to_exponential_2(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let s = format!("{n:.2e}");
    match s.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
        _ => s,
    }
}
