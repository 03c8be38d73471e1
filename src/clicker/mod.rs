//! Card Clicker: an idle card game with a bouncing ball that clicks for you.

pub mod actions;
pub mod agent;
pub mod catalog;
pub mod command;
pub mod config;
pub mod economy;
pub mod engine;
pub mod format;
pub mod render;
pub mod save;
pub mod state;
pub mod view;

mod simulator;

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::Frame;

use crate::input::{ClickState, InputEvent};
use crate::time::FrameClock;

use actions::*;
use catalog::TrackId;
use command::{Command, Outcome};
use config::GameConfig;
use economy::{ActivationSource, Rejection};
use engine::{Activation, ClickerGame};
use format::format_money;
use save::{SaveStore, StorageBackend};
use view::{ShopTab, ViewState};

pub struct ClickerApp<B: StorageBackend> {
    game: ClickerGame,
    store: SaveStore<B>,
    view: ViewState,
    clock: FrameClock,
    /// Seconds of play since the last save.
    since_save: f64,
}

impl<B: StorageBackend> ClickerApp<B> {
    /// Start from whatever the backend has saved, or a fresh game.
    pub fn new(config: GameConfig, seed: u64, backend: B) -> Self {
        let mut store = SaveStore::new(backend);
        let clock = FrameClock::new(config.max_frame_delta);
        let mut game = ClickerGame::new(config, seed);
        if game.restore(store.load()) {
            log::info!("Card Clicker: loaded save");
        }
        Self {
            game,
            store,
            view: ViewState::new(),
            clock,
            since_save: 0.0,
        }
    }

    pub fn game(&self) -> &ClickerGame {
        &self.game
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn store(&self) -> &SaveStore<B> {
        &self.store
    }

    /// Resize the arena to the board area of a terminal of size `area`.
    pub fn sync_viewport(&mut self, area: Rect) {
        let board = render::layout(area).board;
        let arena = render::arena_for(render::board_inner(board));
        if arena != self.game.arena() {
            self.game.set_arena(arena);
        }
    }

    /// One animation frame: resize, then advance by the time since the last frame.
    pub fn frame(&mut self, now_ms: f64, area: Rect) {
        self.sync_viewport(area);
        let dt = self.clock.update(now_ms);
        self.tick(dt);
    }

    pub fn tick(&mut self, dt: f64) {
        let targets = self.game.unit_targets();
        for activation in self.game.tick(dt, &targets) {
            self.view.push_popup(&activation);
        }
        self.view.advance(dt);

        self.since_save += dt;
        if self.since_save >= self.game.config().autosave_secs {
            self.save();
        }
    }

    pub fn save(&mut self) {
        self.store.save(&self.game.snapshot());
        self.since_save = 0.0;
    }

    fn shop_rows(&self) -> usize {
        match self.view.tab {
            ShopTab::Units => self.game.economy().catalog().units.len(),
            ShopTab::Upgrades => TrackId::all().len(),
        }
    }

    fn unit_ids(&self) -> Vec<u64> {
        self.game.economy().units().iter().map(|u| u.instance_id).collect()
    }

    fn dispatch(&mut self, command: Command) -> Outcome {
        let outcome = self.game.apply(command);
        match &outcome {
            Outcome::UnitBought(unit) => {
                let name = self
                    .game
                    .economy()
                    .catalog()
                    .unit_type(&unit.type_id)
                    .map_or(unit.type_id.as_str(), |t| t.name);
                self.view.set_message(format!("Bought {name}!"));
            }
            Outcome::UpgradeBought(level) => {
                self.view.set_message(format!("{} unlocked!", level.name));
            }
            Outcome::Activated {
                instance_id,
                earned,
            } => {
                if let Some(unit) = self.game.economy().unit(*instance_id) {
                    let activation = Activation {
                        instance_id: *instance_id,
                        earned: *earned,
                        source: ActivationSource::Manual,
                        x: unit.x,
                        y: unit.y,
                    };
                    self.view.push_popup(&activation);
                }
            }
            Outcome::Rejected(reason) => {
                let text = match reason {
                    Rejection::Unaffordable { cost, .. } => format!("Need ${}", format_money(*cost)),
                    Rejection::MaxedOut(_) => "Already at max level".to_string(),
                    other => other.to_string(),
                };
                self.view.set_message(text);
            }
            Outcome::Moved { .. } | Outcome::Reset | Outcome::Ignored => {}
        }
        if outcome.should_save() {
            self.save();
        }
        outcome
    }

    fn activate_card(&mut self, instance_id: u64) {
        self.view.selected = Some(instance_id);
        self.dispatch(Command::Activate {
            instance_id,
            source: ActivationSource::Manual,
        });
    }

    fn buy_at(&mut self, tab: ShopTab, index: usize) {
        let command = match tab {
            ShopTab::Units => {
                let Some(unit_type) = self.game.economy().catalog().units.get(index) else {
                    return;
                };
                Command::BuyUnit {
                    type_id: unit_type.id.to_string(),
                }
            }
            ShopTab::Upgrades => {
                let Some(&track) = TrackId::all().get(index) else {
                    return;
                };
                Command::BuyNextUpgrade { track }
            }
        };
        self.dispatch(command);
    }

    fn nudge_selected(&mut self, dx: i16, dy: i16) {
        let Some(id) = self.view.selected else {
            return;
        };
        let Some(unit) = self.game.economy().unit(id) else {
            return;
        };
        let x = unit.x + dx as f64 * render::PX_PER_COL;
        let y = unit.y + dy as f64 * render::PX_PER_ROW;
        self.dispatch(Command::Reposition { instance_id: id, x, y });
    }

    fn reset(&mut self) {
        self.dispatch(Command::Reset);
        self.store.reset();
        self.since_save = 0.0;
        self.view.clear();
        self.view.set_message("Progress reset");
        log::info!("Card Clicker: progress reset");
    }

    /// Handle an input event. Returns true if the event was consumed.
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        if self.view.confirm_reset {
            self.view.confirm_reset = false;
            if matches!(event, InputEvent::Key('y') | InputEvent::Click(RESET_CONFIRM)) {
                self.reset();
                return true;
            }
            if !matches!(event, InputEvent::Click(_)) {
                // The key only cancelled the prompt.
                return true;
            }
        }

        match *event {
            InputEvent::Key(' ') | InputEvent::Key('c') => {
                if self.view.selected.is_none() {
                    let ids = self.unit_ids();
                    self.view.cycle_selection(&ids);
                }
                match self.view.selected {
                    Some(id) => self.activate_card(id),
                    None => return false,
                }
            }
            InputEvent::Key('\t') => {
                let ids = self.unit_ids();
                self.view.cycle_selection(&ids);
            }
            InputEvent::Key('u') => self.view.toggle_tab(),
            InputEvent::Key('w') => {
                let rows = self.shop_rows();
                self.view.move_cursor(-1, rows);
            }
            InputEvent::Key('s') => {
                let rows = self.shop_rows();
                self.view.move_cursor(1, rows);
            }
            InputEvent::Key('\n') | InputEvent::Key('b') => {
                self.buy_at(self.view.tab, self.view.cursor);
            }
            InputEvent::Key('R') => self.view.confirm_reset = true,
            InputEvent::Key(_) => return false,
            InputEvent::Nudge { dx, dy } => self.nudge_selected(dx, dy),
            InputEvent::Click(TAB_UNITS) => self.view.switch_tab(ShopTab::Units),
            InputEvent::Click(TAB_UPGRADES) => self.view.switch_tab(ShopTab::Upgrades),
            InputEvent::Click(RESET) => self.view.confirm_reset = true,
            InputEvent::Click(id) if (BUY_UNIT_BASE..BUY_UPGRADE_BASE).contains(&id) => {
                let index = (id - BUY_UNIT_BASE) as usize;
                self.view.switch_tab(ShopTab::Units);
                self.view.cursor = index;
                self.buy_at(ShopTab::Units, index);
            }
            InputEvent::Click(id) if (BUY_UPGRADE_BASE..RESET).contains(&id) => {
                let index = (id - BUY_UPGRADE_BASE) as usize;
                self.view.switch_tab(ShopTab::Upgrades);
                self.view.cursor = index;
                self.buy_at(ShopTab::Upgrades, index);
            }
            InputEvent::Click(id) if id >= ACTIVATE_CARD_BASE => {
                let index = (id - ACTIVATE_CARD_BASE) as usize;
                let Some(instance_id) = self.game.economy().units().get(index).map(|u| u.instance_id) else {
                    return false;
                };
                self.activate_card(instance_id);
            }
            InputEvent::Click(_) => return false,
        }
        true
    }

    pub fn render(&self, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
        let mut cs = click_state.borrow_mut();
        render::render(&self.game, &self.view, f, area, &mut cs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use save::{MemoryStorage, STORAGE_KEY};
    use state::{EconomyState, OwnedUnit};

    fn app() -> ClickerApp<MemoryStorage> {
        let mut app = ClickerApp::new(GameConfig::default(), 3, MemoryStorage::new());
        app.sync_viewport(Rect::new(0, 0, 120, 40));
        app
    }

    fn app_with_currency(currency: f64) -> ClickerApp<MemoryStorage> {
        let state = EconomyState {
            currency,
            units: vec![OwnedUnit {
                instance_id: 1,
                type_id: "jeffrey".into(),
                x: 100.0,
                y: 100.0,
            }],
            next_instance_id: 2,
            ..EconomyState::default()
        };
        let mut backend = MemoryStorage::new();
        backend.insert(STORAGE_KEY, &save::encode(&state).unwrap());
        let mut app = ClickerApp::new(GameConfig::default(), 3, backend);
        app.sync_viewport(Rect::new(0, 0, 120, 40));
        app
    }

    fn saved(app: &ClickerApp<MemoryStorage>) -> Option<EconomyState> {
        app.store()
            .backend()
            .get(STORAGE_KEY)
            .and_then(|json| save::decode(json).ok())
    }

    #[test]
    fn click_key_activates_starter() {
        let mut app = app();
        assert!(app.handle_input(&InputEvent::Key('c')));
        assert_eq!(app.view().selected, Some(1));
        assert!((app.game().economy().currency() - 1.0).abs() < 1e-9);
        assert_eq!(app.view().popups.len(), 1);
        assert!(app.view().popups[0].manual);
    }

    #[test]
    fn tapping_a_card_activates_it() {
        let mut app = app();
        assert!(app.handle_input(&InputEvent::Click(ACTIVATE_CARD_BASE)));
        assert!((app.game().economy().currency() - 1.0).abs() < 1e-9);
        assert!(!app.handle_input(&InputEvent::Click(ACTIVATE_CARD_BASE + 5)));
    }

    #[test]
    fn loads_existing_save() {
        let app = app_with_currency(500.0);
        assert!((app.game().economy().currency() - 500.0).abs() < 1e-9);
    }

    #[test]
    fn buy_with_enter_saves_immediately() {
        let mut app = app_with_currency(100.0);
        app.handle_input(&InputEvent::Key('\n'));
        assert_eq!(app.game().economy().count_of("jeffrey"), 2);
        assert_eq!(app.view().message(), Some("Bought Jeffrey!"));
        let saved = saved(&app).unwrap();
        assert_eq!(saved.units.len(), 2);
        assert!((saved.currency - 88.5).abs() < 1e-9);
    }

    #[test]
    fn unaffordable_purchase_shows_price() {
        let mut app = app();
        app.handle_input(&InputEvent::Key('b'));
        assert_eq!(app.view().message(), Some("Need $11"));
        assert_eq!(app.game().economy().units().len(), 1);
    }

    #[test]
    fn shop_cursor_and_tab() {
        let mut app = app_with_currency(2_000.0);
        app.handle_input(&InputEvent::Key('s'));
        app.handle_input(&InputEvent::Key('b'));
        assert_eq!(app.game().economy().count_of("adept"), 1);

        app.handle_input(&InputEvent::Key('u'));
        assert_eq!(app.view().tab, ShopTab::Upgrades);
        assert_eq!(app.view().cursor, 0);
        app.handle_input(&InputEvent::Key('w'));
        assert_eq!(app.view().cursor, 0);
        app.handle_input(&InputEvent::Key('\n'));
        assert_eq!(app.game().economy().upgrade_level(TrackId::Agent), 1);
        assert!(app.game().agent().is_active());
    }

    #[test]
    fn clicking_shop_rows_buys() {
        let mut app = app_with_currency(60_000.0);
        app.handle_input(&InputEvent::Click(BUY_UPGRADE_BASE + 1));
        assert_eq!(app.view().tab, ShopTab::Upgrades);
        assert_eq!(app.game().economy().upgrade_level(TrackId::Click), 1);
        app.handle_input(&InputEvent::Click(TAB_UNITS));
        app.handle_input(&InputEvent::Click(BUY_UNIT_BASE));
        assert_eq!(app.game().economy().count_of("jeffrey"), 2);
    }

    #[test]
    fn arrows_move_selected_card() {
        let mut app = app();
        app.handle_input(&InputEvent::Key('\t'));
        app.handle_input(&InputEvent::Nudge { dx: 1, dy: -1 });
        let unit = &app.game().economy().units()[0];
        assert_eq!((unit.x, unit.y), (110.0, 80.0));
        assert!(saved(&app).is_some());
    }

    #[test]
    fn nudge_without_selection_is_ignored() {
        let mut app = app();
        app.handle_input(&InputEvent::Nudge { dx: 1, dy: 0 });
        assert_eq!(app.game().economy().units()[0].x, 100.0);
    }

    #[test]
    fn reset_needs_confirmation() {
        let mut app = app_with_currency(500.0);
        app.handle_input(&InputEvent::Key('R'));
        assert!(app.view().confirm_reset);
        // Any other key cancels.
        app.handle_input(&InputEvent::Key('c'));
        assert!(!app.view().confirm_reset);
        assert!((app.game().economy().currency() - 500.0).abs() < 1e-9);

        app.handle_input(&InputEvent::Click(RESET));
        app.handle_input(&InputEvent::Key('y'));
        assert_eq!(app.game().economy().currency(), 0.0);
        assert_eq!(app.game().economy().units().len(), 1);
        assert!(saved(&app).is_none());
        assert_eq!(app.view().message(), Some("Progress reset"));
    }

    #[test]
    fn autosave_after_interval() {
        let mut app = app();
        app.handle_input(&InputEvent::Key('c'));
        assert!(saved(&app).is_none());
        for _ in 0..59 {
            app.tick(0.5);
        }
        assert!(saved(&app).is_none());
        app.tick(0.5);
        let saved = saved(&app).unwrap();
        assert!((saved.currency - 1.0).abs() < 1e-9);
    }

    #[test]
    fn explicit_save_persists_before_autosave() {
        let mut app = app();
        app.handle_input(&InputEvent::Key('c'));
        app.tick(0.5);
        assert!(saved(&app).is_none());
        app.save();
        let saved = saved(&app).unwrap();
        assert!((saved.currency - 1.0).abs() < 1e-9);
        assert_eq!(saved.units.len(), 1);
    }

    #[test]
    fn restored_ball_starts_at_board_centre() {
        let mut state = EconomyState::default();
        state.upgrades.insert("arrow".into(), 1);
        let mut backend = MemoryStorage::new();
        backend.insert(STORAGE_KEY, &save::encode(&state).unwrap());
        let mut app = ClickerApp::new(GameConfig::default(), 3, backend);
        assert!(app.game().agent().is_active());

        app.sync_viewport(Rect::new(0, 0, 120, 40));
        let arena = app.game().arena();
        assert!(!arena.is_empty());
        let agent = app.game().agent();
        assert_eq!((agent.x, agent.y), (arena.width / 2.0, arena.height / 2.0));
    }

    #[test]
    fn frame_uses_clock_delta() {
        let mut app = app();
        let area = Rect::new(0, 0, 120, 40);
        app.frame(0.0, area);
        app.frame(16.0, area);
        assert_eq!(app.game().arena(), render::arena_for(render::board_inner(render::layout(area).board)));
    }

    #[test]
    fn unknown_key_is_not_consumed() {
        let mut app = app();
        assert!(!app.handle_input(&InputEvent::Key('z')));
        assert!(!app.handle_input(&InputEvent::Click(999)));
    }
}
