//! Bot organisms
//!
//! Random-walk AI with radius-dependent speed and continuous mass decay.
//! Bots never look at other entities; all interaction happens in the
//! collision pass.

use rand::Rng;

use crate::game::constants::bot::*;
use crate::game::constants::speed_for_radius;
use crate::game::state::{Bot, EntityView, SimRng};
use crate::util::vec2::Vec2;

impl Bot {
    /// One tick of bot motion.
    ///
    /// `heading_delta` is the random-walk perturbation for this tick (zero
    /// when the heading does not change). Order: smoothing, decay, speed,
    /// heading, move, clamp.
    pub fn advance(&mut self, dt_secs: f32, heading_delta: f32, width: f32, height: f32) {
        self.radius += self.smoothing * (self.target_radius - self.radius);
        self.radius = self.radius.max(0.0);

        let radius_loss = self.radius * self.decay_rate * dt_secs;
        self.set_target_radius(self.target_radius - radius_loss);

        let max_speed = speed_for_radius(self.base_max_speed, self.radius);

        self.heading += heading_delta;

        self.position += Vec2::from_angle(self.heading) * max_speed;
        self.position = self.position.clamp_to_bounds(width, height);
    }
}

/// Owns every bot in the world
#[derive(Debug, Clone, Default)]
pub struct BotSwarm {
    bots: Vec<Bot>,
    width: f32,
    height: f32,
    decay_rate: f32,
}

impl BotSwarm {
    pub fn new(width: f32, height: f32, decay_rate: f32) -> Self {
        Self {
            bots: Vec::new(),
            width,
            height,
            decay_rate,
        }
    }

    /// Spawn `count` bots with random position, radius in `[15, 25)`, heading and hue
    pub fn spawn(&mut self, count: usize, rng: &mut SimRng) {
        self.bots.reserve(count);
        for _ in 0..count {
            let position = Vec2::new(
                rng.gen::<f32>() * self.width,
                rng.gen::<f32>() * self.height,
            );
            let radius = rng.gen_range(MIN_SPAWN_RADIUS..MAX_SPAWN_RADIUS);
            let heading = rng.gen_range(0.0..std::f32::consts::TAU);
            let hue = rng.gen_range(0..360);
            self.bots
                .push(Bot::new(position, radius, heading, hue, self.decay_rate));
        }
        tracing::debug!("Spawned {} bots", count);
    }

    pub fn insert(&mut self, bot: Bot) {
        self.bots.push(bot);
    }

    /// Advance every bot by one tick
    pub fn update(&mut self, dt_ms: f32, rng: &mut SimRng) {
        let dt_secs = dt_ms / 1000.0;
        for bot in &mut self.bots {
            let heading_delta = if rng.gen_bool(HEADING_CHANGE_PROBABILITY) {
                rng.gen_range(-HEADING_JITTER..=HEADING_JITTER)
            } else {
                0.0
            };
            bot.advance(dt_secs, heading_delta, self.width, self.height);
        }
    }

    pub fn bots(&self) -> &[Bot] {
        &self.bots
    }

    /// Mutable access for the collision resolver
    pub fn bots_mut(&mut self) -> &mut Vec<Bot> {
        &mut self.bots
    }

    pub fn len(&self) -> usize {
        self.bots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bots.is_empty()
    }

    pub fn views(&self) -> Vec<EntityView> {
        self.bots.iter().map(|b| EntityView::of(b, b.hue)).collect()
    }
}
