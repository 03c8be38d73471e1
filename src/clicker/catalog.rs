//! Static progression data: unit types and upgrade tracks.

use std::fmt;

const K: f64 = 1e3;
const M: f64 = 1e6;
const B: f64 = 1e9;
const T: f64 = 1e12;
const P: f64 = 1e15;
const E: f64 = 1e18;
const Z: f64 = 1e21;
const Y: f64 = 1e24;

/// Type id of the unit every fresh game starts with.
pub const STARTER_UNIT: &str = "jeffrey";

/// A purchasable unit type.
#[derive(Clone, Debug, PartialEq)]
pub struct UnitType {
    pub id: &'static str,
    pub name: &'static str,
    /// Price of the first unit of this type.
    pub base_cost: f64,
    /// Currency credited per activation (before multipliers).
    pub activation_value: f64,
}

/// Upgrade track identifiers. The wire keys are the ones saves have always used.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TrackId {
    /// Unlocks the bouncing agent and raises its speed.
    Agent,
    /// Multiplies manual activations.
    Click,
    /// Grows the agent's bounding box.
    AgentSize,
}

impl TrackId {
    /// All tracks in shop order.
    pub fn all() -> &'static [TrackId] {
        &[TrackId::Agent, TrackId::Click, TrackId::AgentSize]
    }

    /// Key used in the persisted `upgrades` map.
    pub fn key(&self) -> &'static str {
        match self {
            TrackId::Agent => "arrow",
            TrackId::Click => "click",
            TrackId::AgentSize => "ballSize",
        }
    }

    pub fn from_key(key: &str) -> Option<TrackId> {
        TrackId::all().iter().copied().find(|t| t.key() == key)
    }

    pub fn label(&self) -> &'static str {
        match self {
            TrackId::Agent => "BALL",
            TrackId::Click => "CLICK",
            TrackId::AgentSize => "SIZE",
        }
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// What buying an upgrade level does.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UpgradeEffect {
    /// Agent speed in px/s. Any level > 0 also activates the agent.
    AgentSpeed(f64),
    /// Multiplier applied to manual activations only.
    ClickMultiplier(f64),
    /// Agent box edge length in px.
    AgentSize(f64),
}

/// One level of an upgrade track.
#[derive(Clone, Debug, PartialEq)]
pub struct UpgradeLevel {
    pub track: TrackId,
    /// 1-based, contiguous within the track.
    pub level: u32,
    pub name: &'static str,
    pub cost: f64,
    pub effect: UpgradeEffect,
    pub description: &'static str,
}

/// An ordered sequence of upgrade levels.
#[derive(Clone, Debug, PartialEq)]
pub struct UpgradeTrack {
    pub id: TrackId,
    pub levels: &'static [UpgradeLevel],
}

impl UpgradeTrack {
    pub fn max_level(&self) -> u32 {
        self.levels.len() as u32
    }

    /// Definition of `level` (1-based), if the track has one.
    pub fn level(&self, level: u32) -> Option<&'static UpgradeLevel> {
        let levels: &'static [UpgradeLevel] = self.levels;
        levels.iter().find(|l| l.level == level)
    }
}

/// Immutable reference data the economy is built against.
#[derive(Clone, Copy, Debug)]
pub struct Catalog {
    pub units: &'static [UnitType],
    pub tracks: &'static [UpgradeTrack],
}

impl Catalog {
    /// The shipped progression.
    pub fn standard() -> Self {
        Self {
            units: UNIT_TYPES,
            tracks: UPGRADE_TRACKS,
        }
    }

    pub fn unit_type(&self, id: &str) -> Option<&'static UnitType> {
        let units: &'static [UnitType] = self.units;
        units.iter().find(|u| u.id == id)
    }

    pub fn track(&self, id: TrackId) -> Option<&'static UpgradeTrack> {
        let tracks: &'static [UpgradeTrack] = self.tracks;
        tracks.iter().find(|t| t.id == id)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

macro_rules! unit {
    ($id:expr, $name:expr, $cost:expr, $value:expr) => {
        UnitType {
            id: $id,
            name: $name,
            base_cost: $cost,
            activation_value: $value,
        }
    };
}

pub static UNIT_TYPES: &[UnitType] = &[
    unit!("jeffrey", "Jeffrey", 10.0, 1.0),
    unit!("adept", "Adept", 150.0, 12.0),
    unit!("scholar", "Scholar", 2.0 * K, 180.0),
    unit!("expert", "Expert", 35.0 * K, 2.5 * K),
    unit!("master", "Master", 600.0 * K, 45.0 * K),
    unit!("grandmaster", "Grandmaster", 15.0 * M, 900.0 * K),
    unit!("legend", "Legend", 450.0 * M, 25.0 * M),
    unit!("mythic", "Mythic", 15.0 * B, 800.0 * M),
    unit!("celestial", "Celestial", 600.0 * B, 25.0 * B),
    unit!("ancient", "Ancient", 25.0 * T, 1.0 * T),
    unit!("eternal", "Eternal", 1.0 * P, 50.0 * T),
    unit!("void", "Void", 80.0 * P, 4.0 * P),
    unit!("cosmic", "Cosmic", 5.0 * E, 300.0 * P),
    unit!("galactic", "Galactic", 250.0 * E, 15.0 * E),
    unit!("universal", "Universal", 10.0 * K * E, 600.0 * E),
    unit!("multiversal", "Multiversal", 1.0 * Y, 80.0 * Z),
    unit!("dimension", "Dimension", 100.0 * Y, 9.0 * Y),
    unit!("temporal", "Temporal", 15.0 * K * Y, 1.2 * K * Y),
    unit!("infinity", "Infinity", 1.0 * M * Y, 90.0 * K * Y),
    unit!("source", "The Source", 1.0 * B * Y, 10.0 * M * Y),
];

macro_rules! level {
    ($track:expr, $level:expr, $name:expr, $cost:expr, $effect:expr, $desc:expr) => {
        UpgradeLevel {
            track: $track,
            level: $level,
            name: $name,
            cost: $cost,
            effect: $effect,
            description: $desc,
        }
    };
}

use TrackId::{Agent, AgentSize, Click};
use UpgradeEffect::{AgentSize as Size, AgentSpeed as Speed, ClickMultiplier as Power};

static AGENT_LEVELS: &[UpgradeLevel] = &[
    level!(Agent, 1, "Bouncing Ball", 1_000.0, Speed(200.0), "Unlocks a ball that bounces around and clicks for you."),
    level!(Agent, 2, "Quick Ball I", 5_000.0, Speed(300.0), "The ball moves faster."),
    level!(Agent, 3, "Quick Ball II", 25_000.0, Speed(450.0), "Even faster!"),
    level!(Agent, 4, "Sonic Ball", 100_000.0, Speed(700.0), "The ball moves at incredible speed."),
    level!(Agent, 5, "Hyper Ball", 1_000_000.0, Speed(1200.0), "You can barely see it!"),
    level!(Agent, 6, "Quantum Ball", 50_000_000.0, Speed(2500.0), "It is everywhere at once."),
    level!(Agent, 7, "Divine Ball", 10.0 * B, Speed(5000.0), "Divine velocity."),
];

static CLICK_LEVELS: &[UpgradeLevel] = &[
    level!(Click, 1, "Power Gloves", 50_000.0, Power(2.0), "Your clicks are worth x2."),
    level!(Click, 2, "Digital Hammer", 250_000.0, Power(5.0), "Your clicks are worth x5."),
    level!(Click, 3, "Sonic Click", 1_000_000.0, Power(10.0), "Your clicks are worth x10."),
    level!(Click, 4, "Midas Finger", 5_000_000.0, Power(25.0), "Your clicks are worth x25."),
    level!(Click, 5, "Divine Click", 100_000_000.0, Power(100.0), "Your clicks are worth x100."),
];

static SIZE_LEVELS: &[UpgradeLevel] = &[
    level!(AgentSize, 1, "Big Ball", 15_000.0, Size(60.0), "Makes the ball bigger."),
    level!(AgentSize, 2, "Giant Ball", 100_000.0, Size(80.0), "Bigger is better!"),
    level!(AgentSize, 3, "Colossal Ball", 500_000.0, Size(120.0), "Hits more cards at once."),
    level!(AgentSize, 4, "Miniature Sun", 5.0 * M, Size(200.0), "Covers a good part of the board."),
];

pub static UPGRADE_TRACKS: &[UpgradeTrack] = &[
    UpgradeTrack {
        id: Agent,
        levels: AGENT_LEVELS,
    },
    UpgradeTrack {
        id: Click,
        levels: CLICK_LEVELS,
    },
    UpgradeTrack {
        id: AgentSize,
        levels: SIZE_LEVELS,
    },
];
