//! Semantic action IDs for Card Clicker click targets.
//!
//! Registered during render and dispatched via `InputEvent::Click`.

// ── Tab navigation ──────────────────────────────────────────────
pub const TAB_UNITS: u16 = 10;
pub const TAB_UPGRADES: u16 = 11;

// ── Unit purchase (base + catalog index) ────────────────────────
pub const BUY_UNIT_BASE: u16 = 100;

// ── Upgrade purchase (base + track index) ───────────────────────
pub const BUY_UPGRADE_BASE: u16 = 200;

// ── Reset ───────────────────────────────────────────────────────
pub const RESET: u16 = 500;
pub const RESET_CONFIRM: u16 = 501;

// ── Cards on the board (base + position in the owned list) ──────
pub const ACTIVATE_CARD_BASE: u16 = 1000;
