//! Simulation session
//!
//! `World` owns every entity collection plus the clock and RNG, and steps
//! them in a fixed order each tick:
//!
//! 1. end-of-session checks (timer, elimination)
//! 2. gated split request
//! 3. player body update (movement, separation, merges)
//! 4. bot update
//! 5. collision pass
//!
//! Callers drive it with an explicit `dt_ms`; nothing reads the wall clock.

use std::fmt;

use rand::SeedableRng;
use tracing::{debug, info};

use crate::config::{ConfigError, SimConfig};
use crate::game::clock::SimulationClock;
use crate::game::constants::player::DEFAULT_SPEED_LIMIT_RADIUS;
use crate::game::match_result::{check_match_end, determine_result, MatchResult};
use crate::game::state::{EndReason, MatchPhase, PlayerCell, SimRng, WorldSnapshot};
use crate::game::systems::bots::BotSwarm;
use crate::game::systems::collision::{self, CollisionReport};
use crate::game::systems::pellets::ResourceField;
use crate::game::systems::player::PlayerBody;
use crate::game::systems::viruses::HazardField;
use crate::util::vec2::Vec2;

/// Per-tick player intent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickInput {
    /// World-space point the body steers toward
    pub target: Vec2,
    /// Split requested this tick
    pub split: bool,
    /// Distance at which steering saturates (half the viewport width)
    pub speed_limit_radius: f32,
}

impl Default for TickInput {
    fn default() -> Self {
        Self {
            target: Vec2::ZERO,
            split: false,
            speed_limit_radius: DEFAULT_SPEED_LIMIT_RADIUS,
        }
    }
}

impl TickInput {
    pub fn toward(target: Vec2) -> Self {
        Self {
            target,
            ..Self::default()
        }
    }
}

/// Remaining session time, displayed as `MM:SS`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeLeft {
    pub remaining_ms: u64,
}

impl TimeLeft {
    pub fn minutes(&self) -> u64 {
        self.remaining_ms / 60_000
    }

    pub fn seconds(&self) -> u64 {
        (self.remaining_ms / 1000) % 60
    }
}

impl fmt::Display for TimeLeft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.minutes(), self.seconds())
    }
}

/// One simulation session
#[derive(Debug, Clone)]
pub struct World {
    config: SimConfig,
    clock: SimulationClock,
    rng: SimRng,
    pellets: ResourceField,
    viruses: HazardField,
    bots: BotSwarm,
    player: PlayerBody,
    phase: MatchPhase,
    end_reason: Option<EndReason>,
    max_mass: f32,
    last_split_at_ms: Option<f64>,
}

impl World {
    /// Validate `config` and populate a fresh session
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let clock = SimulationClock::new();
        let mut rng = seeded_rng(config.seed);
        let (pellets, viruses, bots, player) = populate(&config, &clock, &mut rng);

        let mut world = Self {
            config,
            clock,
            rng,
            pellets,
            viruses,
            bots,
            player,
            phase: MatchPhase::Running,
            end_reason: None,
            max_mass: 0.0,
            last_split_at_ms: None,
        };
        world.max_mass = world.total_mass();

        info!(
            "World created: {}x{}, {} pellets, {} viruses, {} bots",
            world.config.world_width,
            world.config.world_height,
            world.pellets.len(),
            world.viruses.len(),
            world.bots.len()
        );
        Ok(world)
    }

    /// Start over with the same configuration (and seed, if any)
    pub fn reset(&mut self) {
        self.clock = SimulationClock::new();
        self.rng = seeded_rng(self.config.seed);
        let (pellets, viruses, bots, player) = populate(&self.config, &self.clock, &mut self.rng);
        self.pellets = pellets;
        self.viruses = viruses;
        self.bots = bots;
        self.player = player;
        self.phase = MatchPhase::Running;
        self.end_reason = None;
        self.last_split_at_ms = None;
        self.max_mass = self.total_mass();
        info!("World reset");
    }

    /// End the session and return its summary
    pub fn dispose(self) -> MatchResult {
        let result = determine_result(&self);
        debug!("World disposed after {} ticks", result.ticks);
        result
    }

    /// Advance the simulation by `dt_ms` milliseconds
    pub fn tick(&mut self, dt_ms: f32, input: &TickInput) -> MatchPhase {
        if self.phase == MatchPhase::GameOver {
            return self.phase;
        }

        let dt_ms = self.clock.advance(dt_ms);
        let now_ms = self.clock.now_ms();

        if let Some(reason) =
            check_match_end(now_ms, self.config.time_limit_ms(), self.player.is_empty())
        {
            self.end(reason);
            return self.phase;
        }

        if input.split {
            self.request_split(input.target);
        }

        self.player
            .update(input.target, input.speed_limit_radius, dt_ms, now_ms);
        self.bots.update(dt_ms, &mut self.rng);

        let report = self.resolve_collisions();
        if report.eliminated {
            self.end(EndReason::Eliminated);
            return self.phase;
        }

        self.max_mass = self.max_mass.max(self.total_mass());
        self.phase
    }

    /// Forward a split intent to the body if the cooldown and cell cap allow it.
    ///
    /// Returns true only when a cell was actually split. An accepted request
    /// restarts the cooldown even when the largest cell is too small to split.
    pub fn request_split(&mut self, target: Vec2) -> bool {
        if self.phase == MatchPhase::GameOver {
            return false;
        }
        let now_ms = self.clock.now_ms();
        if let Some(last) = self.last_split_at_ms {
            if now_ms - last < self.config.split_cooldown_ms {
                return false;
            }
        }
        if self.player.len() >= self.config.max_cells {
            return false;
        }

        self.last_split_at_ms = Some(now_ms);
        self.player.split(target, now_ms)
    }

    fn resolve_collisions(&mut self) -> CollisionReport {
        collision::resolve(
            &mut self.player,
            &mut self.pellets,
            &mut self.viruses,
            &mut self.bots,
        )
    }

    fn end(&mut self, reason: EndReason) {
        self.phase = MatchPhase::GameOver;
        self.end_reason = Some(reason);
        info!(
            "Game over ({:?}) at {} with max mass {:.0}",
            reason,
            self.time_left(),
            self.max_mass
        );
    }

    /// Render copy of the current state
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            tick: self.clock.ticks(),
            phase: self.phase,
            world_width: self.config.world_width,
            world_height: self.config.world_height,
            pellets: self.pellets.views(),
            viruses: self.viruses.views(),
            bots: self.bots.views(),
            cells: self.player.views(),
            total_mass: self.total_mass(),
            max_mass: self.max_mass,
            time_left_ms: self.time_left().remaining_ms,
        }
    }

    pub fn total_mass(&self) -> f32 {
        self.player.total_mass()
    }

    /// Highest total mass seen this session
    pub fn max_mass(&self) -> f32 {
        self.max_mass
    }

    pub fn largest_cell(&self) -> Option<&PlayerCell> {
        self.player.largest_cell()
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == MatchPhase::GameOver
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn end_reason(&self) -> Option<EndReason> {
        self.end_reason
    }

    pub fn time_left(&self) -> TimeLeft {
        let remaining = (self.config.time_limit_ms() - self.clock.now_ms()).max(0.0);
        TimeLeft {
            remaining_ms: remaining as u64,
        }
    }

    pub fn now_ms(&self) -> f64 {
        self.clock.now_ms()
    }

    pub fn ticks(&self) -> u64 {
        self.clock.ticks()
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn body(&self) -> &PlayerBody {
        &self.player
    }

    pub fn bots(&self) -> &BotSwarm {
        &self.bots
    }

    pub fn pellets(&self) -> &ResourceField {
        &self.pellets
    }

    pub fn viruses(&self) -> &HazardField {
        &self.viruses
    }
}

fn seeded_rng(seed: Option<u64>) -> SimRng {
    match seed {
        Some(seed) => SimRng::seed_from_u64(seed),
        None => SimRng::from_entropy(),
    }
}

fn populate(
    config: &SimConfig,
    clock: &SimulationClock,
    rng: &mut SimRng,
) -> (ResourceField, HazardField, BotSwarm, PlayerBody) {
    let (width, height) = (config.world_width, config.world_height);

    let mut pellets = ResourceField::new(width, height);
    pellets.spawn(config.pellet_count, rng);

    let mut viruses = HazardField::new(width, height);
    viruses.spawn(config.virus_count, rng);

    let mut bots = BotSwarm::new(width, height, config.bot_decay_rate);
    bots.spawn(config.bot_count, rng);

    let player = PlayerBody::new(width, height, config.player_decay_rate, clock.now_ms());

    (pellets, viruses, bots, player)
}
