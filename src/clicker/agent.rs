//! The bouncing ball: an autonomous agent that activates every card it touches.
//!
//! Each tick the ball moves along its unit direction vector, then each axis is
//! checked against the arena on its own. A bounce forces that axis back
//! inward and re-rolls the *other* axis uniformly in `[-1, 1]`, so the ball
//! never settles into a repeating path. After all bounces in a tick the
//! direction is renormalised once.

use std::collections::BTreeMap;

use rand::Rng;

/// Axis-aligned box, `x`/`y` is the top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Edge contact counts as overlap.
    pub fn overlaps(&self, other: &Bounds) -> bool {
        !(other.x > self.right()
            || other.right() < self.x
            || other.y > self.bottom()
            || other.bottom() < self.y)
    }
}

/// Playable area the agent bounces inside, origin at (0, 0).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Arena {
    pub width: f64,
    pub height: f64,
}

impl Arena {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// No playable space yet, e.g. before the first layout pass.
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// A collision candidate supplied by whoever renders the units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Target {
    pub id: u64,
    pub bounds: Bounds,
}

/// Kinematic state of the bouncing ball.
#[derive(Clone, Debug)]
pub struct Agent {
    pub x: f64,
    pub y: f64,
    vx: f64,
    vy: f64,
    speed: f64,
    size: f64,
    /// Upgrade level; 0 means the agent has not been unlocked.
    level: u32,
    arena: Arena,
    cooldown_secs: f64,
    cooldowns: BTreeMap<u64, f64>,
}

impl Agent {
    pub fn new(arena: Arena, size: f64, cooldown_secs: f64) -> Self {
        Self {
            x: arena.width / 2.0,
            y: arena.height / 2.0,
            vx: 1.0,
            vy: 0.0,
            speed: 0.0,
            size,
            level: 0,
            arena,
            cooldown_secs,
            cooldowns: BTreeMap::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.level > 0
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn velocity(&self) -> (f64, f64) {
        (self.vx, self.vy)
    }

    pub fn arena(&self) -> Arena {
        self.arena
    }

    /// Apply the agent track level. Going from 0 to any level places the ball
    /// at the arena centre with a random heading; going back to 0 parks it.
    pub fn set_level<R: Rng + ?Sized>(&mut self, level: u32, speed: f64, rng: &mut R) {
        if self.level == 0 && level > 0 {
            self.centre();
            self.randomize_direction(rng);
        }
        if level == 0 {
            self.cooldowns.clear();
        }
        self.level = level;
        self.speed = speed;
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed;
    }

    pub fn set_size(&mut self, size: f64) {
        self.size = size;
    }

    /// An active ball placed while there was no arena yet is moved to the
    /// centre of the first real one.
    pub fn set_arena(&mut self, arena: Arena) {
        let was_empty = self.arena.is_empty();
        self.arena = arena;
        if was_empty && !arena.is_empty() && self.is_active() {
            self.centre();
        }
    }

    fn centre(&mut self) {
        self.x = self.arena.width / 2.0;
        self.y = self.arena.height / 2.0;
    }

    /// Heading for tests and for restoring a known direction.
    pub fn set_velocity(&mut self, vx: f64, vy: f64) {
        self.vx = vx;
        self.vy = vy;
    }

    pub fn randomize_direction<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let angle = rng.gen_range(0.0..std::f64::consts::TAU);
        self.vx = angle.cos();
        self.vy = angle.sin();
    }

    /// Advance by `dt` seconds. Returns whether any wall was hit.
    pub fn update<R: Rng + ?Sized>(&mut self, dt: f64, rng: &mut R) -> bool {
        if !self.is_active() {
            return false;
        }

        let step = self.speed * dt;
        self.x += self.vx * step;
        self.y += self.vy * step;

        let max_x = (self.arena.width - self.size).max(0.0);
        let max_y = (self.arena.height - self.size).max(0.0);
        let mut bounced = false;

        if self.x < 0.0 {
            self.x = 0.0;
            self.vx = self.vx.abs();
            self.vy = rng.gen_range(-1.0..=1.0);
            bounced = true;
        } else if self.x > max_x {
            self.x = max_x;
            self.vx = -self.vx.abs();
            self.vy = rng.gen_range(-1.0..=1.0);
            bounced = true;
        }

        if self.y < 0.0 {
            self.y = 0.0;
            self.vy = self.vy.abs();
            self.vx = rng.gen_range(-1.0..=1.0);
            bounced = true;
        } else if self.y > max_y {
            self.y = max_y;
            self.vy = -self.vy.abs();
            self.vx = rng.gen_range(-1.0..=1.0);
            bounced = true;
        }

        if bounced {
            (self.vx, self.vy) = normalized(self.vx, self.vy);
        }

        for remaining in self.cooldowns.values_mut() {
            *remaining -= dt;
        }
        self.cooldowns.retain(|_, remaining| *remaining > 0.0);

        bounced
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.x, self.y, self.size, self.size)
    }

    /// Every candidate touching the agent that is not cooling down, in input order.
    pub fn active_targets(&self, candidates: &[Target]) -> Vec<u64> {
        if !self.is_active() {
            return Vec::new();
        }
        let me = self.bounds();
        candidates
            .iter()
            .filter(|t| !self.cooldowns.contains_key(&t.id))
            .filter(|t| me.overlaps(&t.bounds))
            .map(|t| t.id)
            .collect()
    }

    /// Start the cooldown for a target the agent just activated.
    pub fn on_activated(&mut self, id: u64) {
        self.cooldowns.insert(id, self.cooldown_secs);
    }

    pub fn cooldown(&self, id: u64) -> Option<f64> {
        self.cooldowns.get(&id).copied()
    }

    pub fn is_cooling(&self, id: u64) -> bool {
        self.cooldowns.contains_key(&id)
    }

    pub fn cooldown_count(&self) -> usize {
        self.cooldowns.len()
    }
}

/// Unit vector in the same direction; zero length becomes `(1, 0)`.
pub fn normalized(vx: f64, vy: f64) -> (f64, f64) {
    let len = (vx * vx + vy * vy).sqrt();
    if len == 0.0 {
        (1.0, 0.0)
    } else {
        (vx / len, vy / len)
    }
}
