//! Entity definitions and render snapshots
//!
//! Plain data for every entity kind. Behaviour lives in `game::systems`.

use serde::{Deserialize, Serialize};

use crate::game::circle::Circle;
use crate::game::constants::{bot, merge, pellet, player, virus};
use crate::util::vec2::Vec2;

/// Random source shared by every system of one world
pub type SimRng = rand::rngs::SmallRng;

/// Static food particle
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Pellet {
    pub position: Vec2,
    pub hue: u16,
}

impl Pellet {
    pub fn new(position: Vec2, hue: u16) -> Self {
        Self { position, hue }
    }
}

impl Circle for Pellet {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn radius(&self) -> f32 {
        pellet::RADIUS
    }
}

/// Static hazard that pops anything strictly larger than itself
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Virus {
    pub position: Vec2,
    pub radius: f32,
}

impl Virus {
    pub fn new(position: Vec2, radius: f32) -> Self {
        Self {
            position,
            radius: radius.max(0.0),
        }
    }
}

impl Circle for Virus {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn radius(&self) -> f32 {
        self.radius
    }
}

/// Autonomous single-circle organism
///
/// `radius` chases `target_radius` by exponential smoothing; growth and
/// decay only ever touch the target.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bot {
    pub position: Vec2,
    pub radius: f32,
    pub target_radius: f32,
    pub smoothing: f32,
    /// Travel direction in radians
    pub heading: f32,
    pub base_max_speed: f32,
    /// Fraction of radius lost per second
    pub decay_rate: f32,
    pub hue: u16,
}

impl Bot {
    pub fn new(position: Vec2, radius: f32, heading: f32, hue: u16, decay_rate: f32) -> Self {
        let radius = radius.max(0.0);
        Self {
            position,
            radius,
            target_radius: radius,
            smoothing: bot::SMOOTHING,
            heading,
            base_max_speed: bot::BASE_MAX_SPEED,
            decay_rate,
            hue,
        }
    }

    pub fn set_target_radius(&mut self, target: f32) {
        self.target_radius = target.max(0.0);
    }

    pub fn grow(&mut self, amount: f32) {
        self.set_target_radius(self.target_radius + amount);
    }
}

impl Circle for Bot {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn radius(&self) -> f32 {
        self.radius
    }
}

/// One circular sub-unit of the player's organism
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerCell {
    pub position: Vec2,
    pub radius: f32,
    pub target_radius: f32,
    /// Residual ejection momentum, world units per tick
    pub velocity: Vec2,
    /// Fraction of `velocity` kept each tick
    pub friction: f32,
    /// Simulation time (ms) before which this cell cannot merge
    pub merge_eligible_at_ms: f64,
    pub hue: u16,
}

impl PlayerCell {
    /// New cell at rest, merge-ineligible for the split cooldown window
    pub fn new(position: Vec2, radius: f32, now_ms: f64) -> Self {
        let radius = radius.max(0.0);
        Self {
            position,
            radius,
            target_radius: radius,
            velocity: Vec2::ZERO,
            friction: player::FRICTION,
            merge_eligible_at_ms: now_ms + merge::SPLIT_COOLDOWN_MS,
            hue: player::HUE,
        }
    }

    pub fn set_target_radius(&mut self, target: f32) {
        self.target_radius = target.max(0.0);
    }

    /// Set both the effective and the target radius
    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius.max(0.0);
        self.target_radius = self.radius;
    }

    pub fn is_merge_eligible(&self, now_ms: f64) -> bool {
        self.merge_eligible_at_ms <= now_ms
    }
}

impl Circle for PlayerCell {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn radius(&self) -> f32 {
        self.radius
    }
}

/// Session phase; `GameOver` is terminal
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum MatchPhase {
    #[default]
    Running,
    GameOver,
}

/// Why a session ended
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum EndReason {
    /// Countdown reached zero
    TimeExpired,
    /// Every player cell was eaten
    Eliminated,
}

/// Render view of one circle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct EntityView {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub hue: u16,
}

impl EntityView {
    pub fn of<C: Circle>(entity: &C, hue: u16) -> Self {
        let position = entity.position();
        Self {
            x: position.x,
            y: position.y,
            radius: entity.radius(),
            hue,
        }
    }
}

/// Read-only copy of everything a renderer needs after a tick
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorldSnapshot {
    pub tick: u64,
    pub phase: MatchPhase,
    pub world_width: f32,
    pub world_height: f32,
    pub pellets: Vec<EntityView>,
    pub viruses: Vec<EntityView>,
    pub bots: Vec<EntityView>,
    pub cells: Vec<EntityView>,
    pub total_mass: f32,
    pub max_mass: f32,
    pub time_left_ms: u64,
}

/// Helper used by views of viruses, which carry no hue of their own
pub(crate) fn virus_view(v: &Virus) -> EntityView {
    EntityView::of(v, virus::HUE)
}
