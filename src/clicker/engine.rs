//! The engine context: economy, agent and RNG owned together.
//!
//! The host owns one `ClickerGame` and drives it with `tick` once per frame.
//! Commands are plain method calls between ticks.

use rand::rngs::SmallRng;
use rand::SeedableRng;

use super::agent::{Agent, Arena, Bounds, Target};
use super::catalog::{Catalog, TrackId, UpgradeLevel};
use super::command::{Command, Outcome};
use super::config::GameConfig;
use super::economy::{ActivationSource, Economy, Rejection};
use super::state::{EconomyState, OwnedUnit};

/// One credited activation, with where it happened for payout popups.
#[derive(Clone, Debug, PartialEq)]
pub struct Activation {
    pub instance_id: u64,
    pub earned: f64,
    pub source: ActivationSource,
    pub x: f64,
    pub y: f64,
}

pub struct ClickerGame {
    economy: Economy,
    agent: Agent,
    rng: SmallRng,
}

impl ClickerGame {
    pub fn new(config: GameConfig, seed: u64) -> Self {
        Self::with_catalog(Catalog::standard(), config, seed)
    }

    pub fn with_catalog(catalog: Catalog, config: GameConfig, seed: u64) -> Self {
        let agent = Agent::new(Arena::default(), config.agent_size, config.cooldown_secs);
        let mut game = Self {
            economy: Economy::new(catalog, config),
            agent,
            rng: SmallRng::seed_from_u64(seed),
        };
        game.sync_agent();
        game
    }

    pub fn economy(&self) -> &Economy {
        &self.economy
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    pub fn config(&self) -> &GameConfig {
        self.economy.config()
    }

    pub fn arena(&self) -> Arena {
        self.agent.arena()
    }

    pub fn set_arena(&mut self, arena: Arena) {
        self.agent.set_arena(arena);
    }

    /// Push the upgrade-derived parameters into the agent.
    fn sync_agent(&mut self) {
        let profile = self.economy.agent_profile();
        self.agent
            .set_level(profile.level, profile.speed, &mut self.rng);
        self.agent.set_size(profile.size);
    }

    /// Advance the agent by `dt` seconds and credit every unit it touches.
    /// Activations come back in candidate order.
    pub fn tick(&mut self, dt: f64, targets: &[Target]) -> Vec<Activation> {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.agent.update(dt, &mut self.rng);

        let hits = self.agent.active_targets(targets);
        let mut activations = Vec::with_capacity(hits.len());
        for id in hits {
            let earned = self.economy.activate(id, ActivationSource::Automated);
            self.agent.on_activated(id);
            let (x, y) = self
                .economy
                .unit(id)
                .map(|u| (u.x, u.y))
                .unwrap_or((self.agent.x, self.agent.y));
            activations.push(Activation {
                instance_id: id,
                earned,
                source: ActivationSource::Automated,
                x,
                y,
            });
        }
        activations
    }

    /// Collision boxes for every owned unit at the configured card size.
    pub fn unit_targets(&self) -> Vec<Target> {
        let config = self.economy.config();
        self.economy
            .units()
            .iter()
            .map(|u| Target {
                id: u.instance_id,
                bounds: Bounds::new(u.x, u.y, config.card_width, config.card_height),
            })
            .collect()
    }

    pub fn buy_unit(&mut self, type_id: &str) -> Result<OwnedUnit, Rejection> {
        self.economy.buy_unit(type_id, &mut self.rng)
    }

    pub fn buy_upgrade(
        &mut self,
        track: TrackId,
        level: u32,
    ) -> Result<&'static UpgradeLevel, Rejection> {
        let bought = self.economy.buy_upgrade(track, level)?;
        self.sync_agent();
        Ok(bought)
    }

    pub fn buy_next_upgrade(&mut self, track: TrackId) -> Result<&'static UpgradeLevel, Rejection> {
        let bought = self.economy.buy_next_upgrade(track)?;
        self.sync_agent();
        Ok(bought)
    }

    pub fn activate(&mut self, instance_id: u64, source: ActivationSource) -> f64 {
        self.economy.activate(instance_id, source)
    }

    pub fn reposition(&mut self, instance_id: u64, x: f64, y: f64) -> Option<(f64, f64)> {
        let arena = self.agent.arena();
        self.economy.reposition(instance_id, x, y, arena)
    }

    pub fn snapshot(&self) -> EconomyState {
        self.economy.snapshot()
    }

    /// Load a saved snapshot, or start fresh when there is none. Returns
    /// whether the snapshot was used.
    pub fn restore(&mut self, state: Option<EconomyState>) -> bool {
        let accepted = match state {
            Some(state) => self.economy.restore(state),
            None => {
                self.economy.reset();
                false
            }
        };
        self.sync_agent();
        accepted
    }

    pub fn reset(&mut self) {
        self.economy.reset();
        self.sync_agent();
    }

    pub fn apply(&mut self, command: Command) -> Outcome {
        match command {
            Command::BuyUnit { type_id } => match self.buy_unit(&type_id) {
                Ok(unit) => Outcome::UnitBought(unit),
                Err(e) => Outcome::Rejected(e),
            },
            Command::BuyUpgrade { track, level } => match self.buy_upgrade(track, level) {
                Ok(level) => Outcome::UpgradeBought(level),
                Err(e) => Outcome::Rejected(e),
            },
            Command::BuyNextUpgrade { track } => match self.buy_next_upgrade(track) {
                Ok(level) => Outcome::UpgradeBought(level),
                Err(e) => Outcome::Rejected(e),
            },
            Command::Activate {
                instance_id,
                source,
            } => {
                if self.economy.unit(instance_id).is_none() {
                    return Outcome::Ignored;
                }
                let earned = self.activate(instance_id, source);
                Outcome::Activated {
                    instance_id,
                    earned,
                }
            }
            Command::Reposition { instance_id, x, y } => match self.reposition(instance_id, x, y) {
                Some((x, y)) => Outcome::Moved { instance_id, x, y },
                None => Outcome::Ignored,
            },
            Command::Reset => {
                self.reset();
                Outcome::Reset
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game() -> ClickerGame {
        let mut game = ClickerGame::new(GameConfig::default(), 1);
        game.set_arena(Arena::new(800.0, 600.0));
        game
    }

    fn unlock_agent(game: &mut ClickerGame) {
        game.economy.set_currency(1_000.0);
        game.buy_upgrade(TrackId::Agent, 1).unwrap();
    }

    fn target_at(id: u64, x: f64, y: f64) -> Target {
        Target {
            id,
            bounds: Bounds::new(x, y, 20.0, 20.0),
        }
    }

    #[test]
    fn agent_starts_inactive() {
        let mut game = game();
        assert!(!game.agent().is_active());
        let targets = game.unit_targets();
        assert!(game.tick(0.1, &targets).is_empty());
    }

    #[test]
    fn buying_first_agent_level_activates_it() {
        let mut game = game();
        unlock_agent(&mut game);
        assert!(game.agent().is_active());
        assert_eq!(game.agent().speed(), 200.0);
        assert_eq!(game.economy().currency(), 0.0);
    }

    #[test]
    fn tick_credits_every_touched_unit_once() {
        let mut game = game();
        unlock_agent(&mut game);
        game.agent.set_speed(0.0);
        game.agent.x = 100.0;
        game.agent.y = 100.0;
        // Two overlapping boxes, both pointing at the starter (id 1) and an
        // unknown unit (id 77).
        let targets = [target_at(1, 90.0, 90.0), target_at(77, 130.0, 130.0)];

        let hits = game.tick(0.0, &targets);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].instance_id, 1);
        assert_eq!(hits[0].earned, 1.0);
        assert_eq!(hits[0].source, ActivationSource::Automated);
        assert_eq!((hits[0].x, hits[0].y), (100.0, 100.0));
        assert_eq!(hits[1].earned, 0.0);
        assert!(game.agent().is_cooling(77));

        // Still overlapping but cooling down.
        assert!(game.tick(0.25, &targets).is_empty());
        assert!(game.tick(0.125, &targets).is_empty());
        // 0.5s elapsed in total, cooldown gone, both can fire again.
        let again = game.tick(0.125, &targets);
        assert_eq!(again.len(), 2);
        assert_eq!(game.economy().currency(), 2.0);
    }

    #[test]
    fn automated_payout_ignores_click_multiplier() {
        let mut game = game();
        game.economy.set_currency(51_000.0);
        game.buy_next_upgrade(TrackId::Agent).unwrap();
        game.buy_next_upgrade(TrackId::Click).unwrap();
        game.agent.set_speed(0.0);
        game.agent.x = 100.0;
        game.agent.y = 100.0;
        let before = game.economy().currency();
        let hits = game.tick(0.0, &[target_at(1, 100.0, 100.0)]);
        assert_eq!(hits[0].earned, 1.0);
        assert_eq!(game.activate(1, ActivationSource::Manual), 2.0);
        assert_eq!(game.economy().currency(), before + 3.0);
    }

    #[test]
    fn bad_dt_is_treated_as_zero() {
        let mut game = game();
        unlock_agent(&mut game);
        let before = (game.agent().x, game.agent().y);
        game.tick(f64::NAN, &[]);
        game.tick(-1.0, &[]);
        assert_eq!((game.agent().x, game.agent().y), before);
    }

    #[test]
    fn restore_reapplies_upgrades_to_agent() {
        let mut game = game();
        game.economy.set_currency(1e6);
        game.buy_next_upgrade(TrackId::Agent).unwrap();
        game.buy_next_upgrade(TrackId::Agent).unwrap();
        game.buy_next_upgrade(TrackId::AgentSize).unwrap();
        let snap = game.snapshot();

        let mut other = ClickerGame::new(GameConfig::default(), 99);
        other.set_arena(Arena::new(800.0, 600.0));
        assert!(other.restore(Some(snap.clone())));
        assert!(other.agent().is_active());
        assert_eq!(other.agent().speed(), 300.0);
        assert_eq!(other.agent().size(), 60.0);
        assert_eq!(other.snapshot(), snap);

        // Restoring again leaves the derived parameters where they were.
        other.restore(Some(snap));
        assert_eq!(other.agent().speed(), 300.0);
        assert_eq!(other.agent().size(), 60.0);
    }

    #[test]
    fn restore_none_starts_fresh() {
        let mut game = game();
        unlock_agent(&mut game);
        assert!(!game.restore(None));
        assert!(!game.agent().is_active());
        assert_eq!(game.economy().units().len(), 1);
    }

    #[test]
    fn reset_deactivates_agent() {
        let mut game = game();
        unlock_agent(&mut game);
        game.agent.on_activated(1);
        game.reset();
        assert!(!game.agent().is_active());
        assert_eq!(game.agent().cooldown_count(), 0);
        assert_eq!(game.economy().currency(), 0.0);
    }

    #[test]
    fn apply_routes_commands() {
        let mut game = game();
        let outcome = game.apply(Command::Activate {
            instance_id: 1,
            source: ActivationSource::Manual,
        });
        assert_eq!(
            outcome,
            Outcome::Activated {
                instance_id: 1,
                earned: 1.0
            }
        );
        assert!(!outcome.should_save());

        let outcome = game.apply(Command::BuyUnit {
            type_id: "jeffrey".into(),
        });
        assert!(matches!(
            outcome,
            Outcome::Rejected(Rejection::Unaffordable { .. })
        ));
        assert!(!outcome.should_save());

        let outcome = game.apply(Command::Reposition {
            instance_id: 1,
            x: 10.0,
            y: 20.0,
        });
        assert_eq!(
            outcome,
            Outcome::Moved {
                instance_id: 1,
                x: 10.0,
                y: 20.0
            }
        );
        assert!(outcome.should_save());

        assert_eq!(
            game.apply(Command::Activate {
                instance_id: 404,
                source: ActivationSource::Manual
            }),
            Outcome::Ignored
        );
        assert_eq!(game.apply(Command::Reset), Outcome::Reset);
    }

    #[test]
    fn unit_targets_use_card_size() {
        let game = game();
        let targets = game.unit_targets();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].bounds, Bounds::new(100.0, 100.0, 140.0, 80.0));
    }
}
