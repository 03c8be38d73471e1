//! End-to-end scenarios through the public engine API.

use card_clicker::clicker::agent::{Arena, Bounds, Target};
use card_clicker::clicker::catalog::{Catalog, TrackId, UpgradeEffect, UpgradeLevel, UpgradeTrack};
use card_clicker::clicker::config::GameConfig;
use card_clicker::clicker::economy::{ActivationSource, Rejection};
use card_clicker::clicker::engine::ClickerGame;
use card_clicker::clicker::format::format_money;
use card_clicker::clicker::save::{self, MemoryStorage, SaveStore};
use card_clicker::clicker::state::EconomyState;

fn game() -> ClickerGame {
    let mut game = ClickerGame::new(GameConfig::default(), 2024);
    game.set_arena(Arena::new(800.0, 600.0));
    game
}

/// Restore a snapshot that only differs from a fresh game in currency.
fn with_currency(game: &mut ClickerGame, currency: f64) {
    let mut state = game.snapshot();
    state.currency = currency;
    assert!(game.restore(Some(state)));
}

#[test]
fn fresh_game_click_then_unaffordable_purchase() {
    let mut game = game();
    let units = game.economy().units();
    assert_eq!(units.len(), 1);
    assert_eq!(units[0].type_id, "jeffrey");
    let starter = units[0].instance_id;

    assert_eq!(game.activate(starter, ActivationSource::Manual), 1.0);
    assert_eq!(game.economy().currency(), 1.0);

    let result = game.buy_unit("jeffrey");
    assert!(matches!(result, Err(Rejection::Unaffordable { .. })));
    assert_eq!(game.economy().currency(), 1.0);
}

#[test]
fn upgrade_level_two_requires_level_one() {
    let mut game = game();
    with_currency(&mut game, 6_000.0);
    assert!(matches!(
        game.buy_upgrade(TrackId::Agent, 2),
        Err(Rejection::OutOfSequence { .. })
    ));
    assert_eq!(game.economy().currency(), 6_000.0);
    assert!(game.buy_upgrade(TrackId::Agent, 1).is_ok());
    assert!(game.buy_upgrade(TrackId::Agent, 2).is_ok());
    assert_eq!(game.economy().currency(), 0.0);
}

#[test]
fn cost_curve_is_exponential_in_owned_count() {
    let mut game = game();
    with_currency(&mut game, 1e6);
    let base = 150.0;
    let mut previous = 0.0;
    for n in 0..10 {
        let cost = game.economy().unit_cost("adept").unwrap();
        let expected = base * 1.15f64.powi(n);
        assert!((cost - expected).abs() < expected * 1e-12, "n={n}");
        assert!(cost > previous);
        previous = cost;
        game.buy_unit("adept").unwrap();
    }
}

#[test]
fn ball_hits_several_cards_in_one_tick() {
    let mut game = game();
    with_currency(&mut game, 2_000.0);
    game.buy_unit("jeffrey").unwrap();
    game.buy_unit("jeffrey").unwrap();
    game.buy_upgrade(TrackId::Agent, 1).unwrap();

    // Ball starts centred at (400, 300); put three cards around it.
    let agent = game.agent();
    let (ax, ay) = (agent.x, agent.y);
    let ids: Vec<u64> = game.economy().units().iter().map(|u| u.instance_id).collect();
    let targets: Vec<Target> = ids
        .iter()
        .map(|&id| Target {
            id,
            bounds: Bounds::new(ax - 5.0, ay - 5.0, 60.0, 60.0),
        })
        .collect();

    let before = game.economy().currency();
    let hits = game.tick(0.0, &targets);
    assert_eq!(hits.len(), 3);
    assert!(hits.iter().all(|h| h.source == ActivationSource::Automated));
    assert_eq!(game.economy().currency(), before + 3.0);

    // Same contact on the next frame is absorbed by the cooldown.
    assert!(game.tick(0.0, &targets).is_empty());
}

#[test]
fn cooldown_expires_after_half_a_second() {
    let mut game = game();
    with_currency(&mut game, 1_000.0);
    game.buy_upgrade(TrackId::Agent, 1).unwrap();
    let target = Target {
        id: 1,
        // Covers the whole arena so the moving ball always touches it.
        bounds: Bounds::new(0.0, 0.0, 800.0, 600.0),
    };
    assert_eq!(game.tick(0.0, &[target]).len(), 1);
    assert!(game.agent().is_cooling(1));

    for _ in 0..3 {
        assert!(game.tick(0.125, &[target]).is_empty());
    }
    let refired = game.tick(0.125, &[target]);
    assert_eq!(refired.len(), 1);
    assert_eq!(game.economy().currency(), 2.0);
    assert!(game.agent().is_cooling(1));
}

#[test]
fn click_power_only_boosts_manual_activations() {
    let mut game = game();
    with_currency(&mut game, 50_000.0);
    let id = game.economy().units()[0].instance_id;
    assert_eq!(
        game.activate(id, ActivationSource::Manual),
        game.activate(id, ActivationSource::Automated)
    );
    game.buy_upgrade(TrackId::Click, 1).unwrap();
    let manual = game.activate(id, ActivationSource::Manual);
    let automated = game.activate(id, ActivationSource::Automated);
    assert!(manual > automated);
}

#[test]
fn save_restore_roundtrip_rederives_agent() {
    let mut game = game();
    with_currency(&mut game, 200_000.0);
    game.buy_unit("adept").unwrap();
    game.buy_upgrade(TrackId::Agent, 1).unwrap();
    game.buy_upgrade(TrackId::AgentSize, 1).unwrap();

    let mut store = SaveStore::new(MemoryStorage::new());
    store.save(&game.snapshot());

    let mut other = ClickerGame::new(GameConfig::default(), 1);
    other.set_arena(Arena::new(800.0, 600.0));
    assert!(other.restore(store.load()));
    assert_eq!(other.snapshot(), game.snapshot());
    assert!(other.agent().is_active());
    assert_eq!(other.agent().speed(), game.agent().speed());
    assert_eq!(other.agent().size(), 60.0);
}

#[test]
fn corrupt_save_starts_a_fresh_game() {
    let mut backend = MemoryStorage::new();
    backend.insert(save::STORAGE_KEY, "not json at all");
    let mut store = SaveStore::new(backend);

    let mut game = game();
    assert!(!game.restore(store.load()));
    assert_eq!(game.economy().currency(), 0.0);
    assert_eq!(game.economy().units().len(), 1);
}

#[test]
fn legacy_save_migrates_starter() {
    let json = r#"{"money": 12, "cards": [{"instanceId": 3, "typeId": "novice", "x": 40, "y": 60}]}"#;
    let state = save::decode(json).unwrap();
    let mut game = game();
    assert!(game.restore(Some(state)));
    let unit = &game.economy().units()[0];
    assert_eq!(unit.type_id, "jeffrey");
    assert_eq!(game.economy().next_instance_id(), 4);
    assert_eq!(game.activate(3, ActivationSource::Manual), 1.0);
}

#[test]
fn negative_currency_in_save_is_rejected() {
    let state = EconomyState {
        currency: -5.0,
        ..EconomyState::default()
    };
    let mut game = game();
    assert!(!game.restore(Some(state)));
    assert_eq!(game.economy().currency(), 0.0);
}

#[test]
fn save_with_maximal_ids_starts_fresh() {
    let saves = [
        r#"{"currency": 5, "units": [{"instanceId": 18446744073709551615, "typeId": "jeffrey", "x": 0, "y": 0}], "nextInstanceId": 3}"#,
        r#"{"currency": 5, "units": [], "nextInstanceId": 18446744073709551615}"#,
    ];
    for json in saves {
        let state = save::decode(json).unwrap();
        let mut game = game();
        assert!(!game.restore(Some(state)));
        assert_eq!(game.economy().currency(), 0.0);
        assert_eq!(game.economy().units()[0].instance_id, 1);
    }
}

#[test]
fn custom_catalog_with_two_level_track() {
    static LEVELS: &[UpgradeLevel] = &[
        UpgradeLevel {
            track: TrackId::Click,
            level: 1,
            name: "One",
            cost: 1000.0,
            effect: UpgradeEffect::ClickMultiplier(3.0),
            description: "",
        },
        UpgradeLevel {
            track: TrackId::Click,
            level: 2,
            name: "Two",
            cost: 5000.0,
            effect: UpgradeEffect::ClickMultiplier(7.0),
            description: "",
        },
    ];
    static TRACKS: &[UpgradeTrack] = &[UpgradeTrack {
        id: TrackId::Click,
        levels: LEVELS,
    }];
    let catalog = Catalog {
        units: Catalog::standard().units,
        tracks: TRACKS,
    };
    let mut game = ClickerGame::with_catalog(catalog, GameConfig::default(), 9);
    with_currency(&mut game, 6_000.0);

    assert!(game.buy_upgrade(TrackId::Click, 2).is_err());
    assert!(matches!(
        game.buy_upgrade(TrackId::Agent, 1),
        Err(Rejection::UnknownTrack(TrackId::Agent))
    ));
    game.buy_upgrade(TrackId::Click, 1).unwrap();
    game.buy_next_upgrade(TrackId::Click).unwrap();
    assert_eq!(game.economy().click_multiplier(), 7.0);
    assert!(matches!(
        game.buy_next_upgrade(TrackId::Click),
        Err(Rejection::MaxedOut(TrackId::Click))
    ));
}

#[test]
fn money_display() {
    assert_eq!(format_money(999.0), "999");
    assert_eq!(format_money(1_500.0), "1.5k");
    assert_eq!(format_money(2.5e9), "2.5B");
}
