//! Currency, owned units and upgrade levels.
//!
//! Every mutation goes through a method that either succeeds completely or
//! leaves the state untouched. Rejections are ordinary values, never faults.

use std::collections::BTreeMap;

use rand::Rng;
use thiserror::Error;

use super::agent::Arena;
use super::catalog::{Catalog, TrackId, UpgradeEffect, UpgradeLevel, STARTER_UNIT};
use super::config::GameConfig;
use super::state::{EconomyState, OwnedUnit};

/// Type id that older saves used for the starter unit.
const LEGACY_STARTER_UNIT: &str = "novice";

/// Why a purchase was refused. State is unchanged in every case.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum Rejection {
    #[error("unknown unit type `{0}`")]
    UnknownUnit(String),
    #[error("not enough currency: need {cost}, have {available}")]
    Unaffordable { cost: f64, available: f64 },
    #[error("unknown upgrade track `{0}`")]
    UnknownTrack(TrackId),
    #[error("{track} level {requested} is not purchasable (current level {current})")]
    OutOfSequence {
        track: TrackId,
        requested: u32,
        current: u32,
    },
    #[error("{0} is already at its maximum level")]
    MaxedOut(TrackId),
    #[error("no instance ids left")]
    IdsExhausted,
}

/// Who triggered an activation. Only manual activations get the click multiplier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActivationSource {
    Manual,
    Automated,
}

/// Agent parameters derived from the purchased upgrade levels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgentProfile {
    /// `arrow` track level; 0 keeps the agent inactive.
    pub level: u32,
    pub speed: f64,
    pub size: f64,
}

#[derive(Clone, Debug)]
pub struct Economy {
    catalog: Catalog,
    config: GameConfig,
    currency: f64,
    units: Vec<OwnedUnit>,
    next_instance_id: u64,
    upgrades: BTreeMap<TrackId, u32>,
}

impl Economy {
    /// Fresh game: zero currency, one starter unit, nothing upgraded.
    pub fn new(catalog: Catalog, config: GameConfig) -> Self {
        let mut economy = Self {
            catalog,
            config,
            currency: 0.0,
            units: Vec::new(),
            next_instance_id: 1,
            upgrades: BTreeMap::new(),
        };
        economy.ensure_starter();
        economy
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn currency(&self) -> f64 {
        self.currency
    }

    pub fn units(&self) -> &[OwnedUnit] {
        &self.units
    }

    pub fn unit(&self, instance_id: u64) -> Option<&OwnedUnit> {
        self.units.iter().find(|u| u.instance_id == instance_id)
    }

    pub fn next_instance_id(&self) -> u64 {
        self.next_instance_id
    }

    pub fn upgrade_level(&self, track: TrackId) -> u32 {
        self.upgrades.get(&track).copied().unwrap_or(0)
    }

    pub fn count_of(&self, type_id: &str) -> usize {
        self.units.iter().filter(|u| u.type_id == type_id).count()
    }

    /// Price of the next unit of `type_id`: `base_cost × growth^owned`.
    pub fn unit_cost(&self, type_id: &str) -> Option<f64> {
        let unit_type = self.catalog.unit_type(type_id)?;
        let owned = self.count_of(type_id) as i32;
        Some(unit_type.base_cost * self.config.cost_growth.powi(owned))
    }

    pub fn buy_unit<R: Rng + ?Sized>(
        &mut self,
        type_id: &str,
        rng: &mut R,
    ) -> Result<OwnedUnit, Rejection> {
        let cost = self
            .unit_cost(type_id)
            .ok_or_else(|| Rejection::UnknownUnit(type_id.to_string()))?;
        if self.currency < cost {
            return Err(Rejection::Unaffordable {
                cost,
                available: self.currency,
            });
        }

        let (ox, oy) = self.config.spawn_origin;
        let spread = self.config.spawn_spread;
        let x = ox + rng.gen::<f64>() * spread;
        let y = oy + rng.gen::<f64>() * spread;
        let unit = self.spawn(type_id, x, y).ok_or(Rejection::IdsExhausted)?;
        self.currency -= cost;
        log::debug!(
            "bought {} #{} for {:.2}, {:.2} left",
            type_id,
            unit.instance_id,
            cost,
            self.currency
        );
        Ok(unit)
    }

    /// The level a purchase on `track` would buy next, or `None` when maxed out.
    pub fn next_upgrade(&self, track: TrackId) -> Option<&'static UpgradeLevel> {
        self.catalog
            .track(track)?
            .level(self.upgrade_level(track) + 1)
    }

    /// Buy exactly `level` on `track`. Only `current + 1` is ever accepted.
    pub fn buy_upgrade(
        &mut self,
        track: TrackId,
        level: u32,
    ) -> Result<&'static UpgradeLevel, Rejection> {
        let def = self
            .catalog
            .track(track)
            .ok_or(Rejection::UnknownTrack(track))?;
        let current = self.upgrade_level(track);
        if current >= def.max_level() {
            return Err(Rejection::MaxedOut(track));
        }
        let out_of_sequence = Rejection::OutOfSequence {
            track,
            requested: level,
            current,
        };
        if level != current + 1 {
            return Err(out_of_sequence);
        }
        let next = def.level(level).ok_or(out_of_sequence)?;
        if self.currency < next.cost {
            return Err(Rejection::Unaffordable {
                cost: next.cost,
                available: self.currency,
            });
        }

        self.currency -= next.cost;
        self.upgrades.insert(track, level);
        log::info!("upgrade {} -> level {} ({})", track, level, next.name);
        Ok(next)
    }

    pub fn buy_next_upgrade(&mut self, track: TrackId) -> Result<&'static UpgradeLevel, Rejection> {
        let level = self.upgrade_level(track) + 1;
        self.buy_upgrade(track, level)
    }

    fn current_effect(&self, track: TrackId) -> Option<UpgradeEffect> {
        let level = self.upgrade_level(track);
        self.catalog
            .track(track)
            .and_then(|t| t.level(level))
            .map(|l| l.effect)
    }

    /// Multiplier for manual activations; 1 until a click upgrade is bought.
    pub fn click_multiplier(&self) -> f64 {
        match self.current_effect(TrackId::Click) {
            Some(UpgradeEffect::ClickMultiplier(m)) => m,
            _ => 1.0,
        }
    }

    /// Agent parameters implied by the current upgrade levels. Re-applying the
    /// same profile is idempotent.
    pub fn agent_profile(&self) -> AgentProfile {
        let level = self.upgrade_level(TrackId::Agent);
        let speed = match self.current_effect(TrackId::Agent) {
            Some(UpgradeEffect::AgentSpeed(s)) => s,
            _ => 0.0,
        };
        let size = match self.current_effect(TrackId::AgentSize) {
            Some(UpgradeEffect::AgentSize(s)) => s,
            _ => self.config.agent_size,
        };
        AgentProfile { level, speed, size }
    }

    /// Credit one activation of `instance_id`. Unknown units earn nothing.
    pub fn activate(&mut self, instance_id: u64, source: ActivationSource) -> f64 {
        let Some(unit) = self.unit(instance_id) else {
            return 0.0;
        };
        let Some(unit_type) = self.catalog.unit_type(&unit.type_id) else {
            return 0.0;
        };
        let multiplier = match source {
            ActivationSource::Manual => self.click_multiplier(),
            ActivationSource::Automated => 1.0,
        };
        let earned = unit_type.activation_value * self.config.base_multiplier * multiplier;
        self.currency += earned;
        earned
    }

    /// Move a unit, keeping its card inside the arena. Returns the clamped
    /// position, or `None` for an unknown id.
    pub fn reposition(&mut self, instance_id: u64, x: f64, y: f64, arena: Arena) -> Option<(f64, f64)> {
        let max_x = (arena.width - self.config.card_width).max(0.0);
        let max_y = (arena.height - self.config.card_height).max(0.0);
        let unit = self.units.iter_mut().find(|u| u.instance_id == instance_id)?;
        unit.x = x.clamp(0.0, max_x);
        unit.y = y.clamp(0.0, max_y);
        Some((unit.x, unit.y))
    }

    pub fn snapshot(&self) -> EconomyState {
        let upgrades = self
            .catalog
            .tracks
            .iter()
            .map(|t| (t.id.key().to_string(), self.upgrade_level(t.id)))
            .collect();
        EconomyState {
            currency: self.currency,
            units: self.units.clone(),
            next_instance_id: self.next_instance_id,
            upgrades,
        }
    }

    /// Replace the state with a saved snapshot.
    ///
    /// A snapshot whose currency is negative or not finite, or whose instance
    /// ids overflow the counter, is rejected and the economy falls back to a
    /// fresh game; returns whether the snapshot was accepted. Out-of-range
    /// upgrade levels are clamped and unknown tracks dropped.
    pub fn restore(&mut self, state: EconomyState) -> bool {
        if !(state.currency.is_finite() && state.currency >= 0.0) {
            log::warn!("discarding save with invalid currency {}", state.currency);
            self.reset();
            return false;
        }
        let max_id = state.units.iter().map(|u| u.instance_id).max().unwrap_or(0);
        let next_instance_id = max_id
            .checked_add(1)
            .map(|id| id.max(state.next_instance_id))
            // A full counter is fine as long as no starter has to be spawned.
            .filter(|&id| id < u64::MAX || !state.units.is_empty());
        let Some(next_instance_id) = next_instance_id else {
            log::warn!(
                "discarding save with exhausted instance ids (max {}, next {})",
                max_id,
                state.next_instance_id
            );
            self.reset();
            return false;
        };

        let mut upgrades = BTreeMap::new();
        for (key, level) in &state.upgrades {
            let Some(track) = TrackId::from_key(key).and_then(|id| self.catalog.track(id)) else {
                log::warn!("dropping unknown upgrade track `{}` from save", key);
                continue;
            };
            let clamped = (*level).min(track.max_level());
            if clamped != *level {
                log::warn!("clamping {} level {} to {}", key, level, clamped);
            }
            if clamped > 0 {
                upgrades.insert(track.id, clamped);
            }
        }

        let mut units = state.units;
        for unit in &mut units {
            if unit.type_id == LEGACY_STARTER_UNIT {
                unit.type_id = STARTER_UNIT.to_string();
            }
        }

        self.currency = state.currency;
        self.units = units;
        self.next_instance_id = next_instance_id;
        self.upgrades = upgrades;
        self.ensure_starter();
        log::info!(
            "restored save: {} units, currency {:.2}",
            self.units.len(),
            self.currency
        );
        true
    }

    /// Back to a fresh game.
    pub fn reset(&mut self) {
        self.currency = 0.0;
        self.units.clear();
        self.next_instance_id = 1;
        self.upgrades.clear();
        self.ensure_starter();
    }

    fn ensure_starter(&mut self) {
        if self.units.is_empty() {
            let (x, y) = self.config.starter_position;
            if self.spawn(STARTER_UNIT, x, y).is_none() {
                log::warn!("no instance id left for the starter unit");
            }
        }
    }

    /// Place a new unit under the next instance id. `None` once the counter
    /// cannot advance any further.
    fn spawn(&mut self, type_id: &str, x: f64, y: f64) -> Option<OwnedUnit> {
        let next = self.next_instance_id.checked_add(1)?;
        let unit = OwnedUnit {
            instance_id: self.next_instance_id,
            type_id: type_id.to_string(),
            x,
            y,
        };
        self.next_instance_id = next;
        self.units.push(unit.clone());
        Some(unit)
    }

    #[cfg(test)]
    pub(crate) fn set_currency(&mut self, currency: f64) {
        self.currency = currency;
    }
}

impl Default for Economy {
    fn default() -> Self {
        Self::new(Catalog::standard(), GameConfig::default())
    }
}
