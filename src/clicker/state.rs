//! Card Clicker data model.
//!
//! `EconomyState` is the whole persisted snapshot; its serde field names are
//! the save format and must not change.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A unit the player owns, placed on the board.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnedUnit {
    /// Unique, assigned from a counter that never goes backwards.
    pub instance_id: u64,
    /// References `UnitType::id`. Unknown ids are kept but earn nothing.
    pub type_id: String,
    pub x: f64,
    pub y: f64,
}

/// Snapshot of everything the economy owns.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EconomyState {
    #[serde(alias = "money")]
    pub currency: f64,
    #[serde(alias = "cards")]
    pub units: Vec<OwnedUnit>,
    pub next_instance_id: u64,
    /// Track key (`arrow`, `click`, `ballSize`) → purchased level.
    pub upgrades: BTreeMap<String, u32>,
}

impl Default for EconomyState {
    fn default() -> Self {
        Self {
            currency: 0.0,
            units: Vec::new(),
            next_instance_id: 1,
            upgrades: BTreeMap::new(),
        }
    }
}
