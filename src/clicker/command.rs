//! Discrete commands the presentation sends into the engine.

use super::catalog::{TrackId, UpgradeLevel};
use super::economy::{ActivationSource, Rejection};
use super::state::OwnedUnit;

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    BuyUnit { type_id: String },
    BuyUpgrade { track: TrackId, level: u32 },
    BuyNextUpgrade { track: TrackId },
    Activate { instance_id: u64, source: ActivationSource },
    Reposition { instance_id: u64, x: f64, y: f64 },
    Reset,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    UnitBought(OwnedUnit),
    UpgradeBought(&'static UpgradeLevel),
    Activated { instance_id: u64, earned: f64 },
    Moved { instance_id: u64, x: f64, y: f64 },
    Reset,
    Rejected(Rejection),
    /// The command referenced something that does not exist.
    Ignored,
}

impl Outcome {
    /// Whether the persisted snapshot changed in a way worth saving right away.
    /// Activations are left to the periodic autosave.
    pub fn should_save(&self) -> bool {
        matches!(
            self,
            Outcome::UnitBought(_) | Outcome::UpgradeBought(_) | Outcome::Moved { .. } | Outcome::Reset
        )
    }
}
