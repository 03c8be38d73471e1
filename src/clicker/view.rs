//! Presentation-only state: never saved, never read by the engine.

use super::economy::ActivationSource;
use super::engine::Activation;
use super::format::format_money;

/// Seconds a payout popup stays on screen.
pub const POPUP_LIFETIME: f64 = 1.0;
/// How far (px) a popup drifts upward over its lifetime.
pub const POPUP_RISE: f64 = 40.0;
const MAX_POPUPS: usize = 24;
/// Seconds a status message stays visible.
const MESSAGE_SECS: f64 = 3.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShopTab {
    Units,
    Upgrades,
}

/// Floating `+$amount` text.
#[derive(Clone, Debug, PartialEq)]
pub struct Popup {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub age: f64,
    pub manual: bool,
}

impl Popup {
    /// Current y position in arena px.
    pub fn current_y(&self) -> f64 {
        self.y - POPUP_RISE * (self.age / POPUP_LIFETIME)
    }
}

pub struct ViewState {
    pub tab: ShopTab,
    /// Row highlighted in the current shop tab.
    pub cursor: usize,
    /// Card targeted by keyboard activation and arrow-key moves.
    pub selected: Option<u64>,
    pub popups: Vec<Popup>,
    pub confirm_reset: bool,
    message: Option<(String, f64)>,
}

impl ViewState {
    pub fn new() -> Self {
        Self {
            tab: ShopTab::Units,
            cursor: 0,
            selected: None,
            popups: Vec::new(),
            confirm_reset: false,
            message: None,
        }
    }

    pub fn switch_tab(&mut self, tab: ShopTab) {
        if self.tab != tab {
            self.tab = tab;
            self.cursor = 0;
        }
    }

    pub fn toggle_tab(&mut self) {
        let next = match self.tab {
            ShopTab::Units => ShopTab::Upgrades,
            ShopTab::Upgrades => ShopTab::Units,
        };
        self.switch_tab(next);
    }

    /// Move the shop cursor, clamped to `rows`.
    pub fn move_cursor(&mut self, delta: i32, rows: usize) {
        if rows == 0 {
            self.cursor = 0;
            return;
        }
        let next = (self.cursor as i64 + delta as i64).clamp(0, rows as i64 - 1);
        self.cursor = next as usize;
    }

    /// Select the card after the current one, wrapping around.
    pub fn cycle_selection(&mut self, ids: &[u64]) {
        self.selected = match self.selected.and_then(|s| ids.iter().position(|&id| id == s)) {
            Some(i) => ids.get((i + 1) % ids.len()).copied(),
            None => ids.first().copied(),
        };
    }

    pub fn push_popup(&mut self, activation: &Activation) {
        self.popups.push(Popup {
            text: format!("+${}", format_money(activation.earned)),
            x: activation.x,
            y: activation.y,
            age: 0.0,
            manual: activation.source == ActivationSource::Manual,
        });
        if self.popups.len() > MAX_POPUPS {
            self.popups.remove(0);
        }
    }

    pub fn set_message(&mut self, text: impl Into<String>) {
        self.message = Some((text.into(), MESSAGE_SECS));
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_ref().map(|(text, _)| text.as_str())
    }

    /// Age popups and the status message by `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        for popup in &mut self.popups {
            popup.age += dt;
        }
        self.popups.retain(|p| p.age < POPUP_LIFETIME);
        let expired = match &mut self.message {
            Some((_, remaining)) => {
                *remaining -= dt;
                *remaining <= 0.0
            }
            None => false,
        };
        if expired {
            self.message = None;
        }
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}
