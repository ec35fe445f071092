use crate::game::constants::{bot, game, player, split, world};

/// Invalid simulation configuration
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("World dimensions must be positive and finite, got {width}x{height}")]
    InvalidWorldSize { width: f32, height: f32 },
    #[error("max_cells must be at least 1")]
    ZeroMaxCells,
    #[error("Decay rate for {kind} must be finite and >= 0, got {value}")]
    InvalidDecayRate { kind: &'static str, value: f32 },
    #[error("Split cooldown must be finite and >= 0, got {0}")]
    InvalidSplitCooldown(f64),
    #[error("Tick rate must be at least 1 Hz")]
    ZeroTickRate,
}

/// Simulation configuration
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// World width in world units
    pub world_width: f32,
    /// World height in world units
    pub world_height: f32,
    /// Pellets spawned at session start
    pub pellet_count: usize,
    /// Viruses spawned at session start
    pub virus_count: usize,
    /// Bots spawned at session start
    pub bot_count: usize,
    /// Session length in seconds
    pub time_limit_secs: u64,
    /// Maximum number of player cells; splits beyond this are ignored
    pub max_cells: usize,
    /// Minimum time between accepted split requests
    pub split_cooldown_ms: f64,
    /// Fixed RNG seed; `None` seeds from entropy
    pub seed: Option<u64>,
    /// Fraction of radius a bot loses per second
    pub bot_decay_rate: f32,
    /// Fraction of radius a player cell loses per second
    pub player_decay_rate: f32,
    /// Headless driver tick rate in Hz
    pub tick_rate: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            world_width: world::WIDTH,
            world_height: world::HEIGHT,
            pellet_count: world::PELLET_COUNT,
            virus_count: world::VIRUS_COUNT,
            bot_count: world::BOT_COUNT,
            time_limit_secs: game::TIME_LIMIT_SECS,
            max_cells: split::MAX_CELLS,
            split_cooldown_ms: split::COOLDOWN_MS,
            seed: None,
            bot_decay_rate: bot::DECAY_RATE,
            player_decay_rate: player::DECAY_RATE,
            tick_rate: game::TICK_RATE,
        }
    }
}

/// Parse env var `name` into `target`, keeping the current value (with a warning)
/// when the variable is malformed or rejected by `accept`.
fn override_from_env<T, F>(name: &str, target: &mut T, accept: F)
where
    T: std::str::FromStr,
    F: Fn(&T) -> bool,
{
    let Ok(raw) = std::env::var(name) else {
        return;
    };
    match raw.parse::<T>() {
        Ok(parsed) if accept(&parsed) => *target = parsed,
        Ok(_) => tracing::warn!("{} '{}' out of range, using default", name, raw),
        Err(_) => tracing::warn!("Invalid {} '{}', using default", name, raw),
    }
}

impl SimConfig {
    /// Load config from environment or use defaults
    pub fn load_or_default() -> Self {
        let mut config = Self::default();

        let positive = |v: &f32| v.is_finite() && *v > 0.0;
        let non_negative = |v: &f32| v.is_finite() && *v >= 0.0;

        override_from_env("WORLD_WIDTH", &mut config.world_width, positive);
        override_from_env("WORLD_HEIGHT", &mut config.world_height, positive);
        override_from_env("PELLET_COUNT", &mut config.pellet_count, |_| true);
        override_from_env("VIRUS_COUNT", &mut config.virus_count, |_| true);
        override_from_env("BOT_COUNT", &mut config.bot_count, |_| true);
        override_from_env("TIME_LIMIT_SECS", &mut config.time_limit_secs, |v| *v > 0);
        override_from_env("MAX_CELLS", &mut config.max_cells, |v| (1..=64).contains(v));
        override_from_env("SPLIT_COOLDOWN_MS", &mut config.split_cooldown_ms, |v| {
            v.is_finite() && *v >= 0.0
        });
        override_from_env("BOT_DECAY_RATE", &mut config.bot_decay_rate, non_negative);
        override_from_env("PLAYER_DECAY_RATE", &mut config.player_decay_rate, non_negative);
        override_from_env("TICK_RATE", &mut config.tick_rate, |v| (1..=1000).contains(v));

        if let Ok(raw) = std::env::var("SIM_SEED") {
            match raw.parse::<u64>() {
                Ok(seed) => config.seed = Some(seed),
                Err(_) => tracing::warn!("Invalid SIM_SEED '{}', seeding from entropy", raw),
            }
        }

        config
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        let dimension_ok = |d: f32| d.is_finite() && d > 0.0;
        if !dimension_ok(self.world_width) || !dimension_ok(self.world_height) {
            return Err(ConfigError::InvalidWorldSize {
                width: self.world_width,
                height: self.world_height,
            });
        }
        if self.max_cells == 0 {
            return Err(ConfigError::ZeroMaxCells);
        }
        for (kind, value) in [("bots", self.bot_decay_rate), ("player", self.player_decay_rate)] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidDecayRate { kind, value });
            }
        }
        if !self.split_cooldown_ms.is_finite() || self.split_cooldown_ms < 0.0 {
            return Err(ConfigError::InvalidSplitCooldown(self.split_cooldown_ms));
        }
        if self.tick_rate == 0 {
            return Err(ConfigError::ZeroTickRate);
        }
        Ok(())
    }

    /// Session length in milliseconds
    pub fn time_limit_ms(&self) -> f64 {
        self.time_limit_secs as f64 * 1000.0
    }

    /// Duration of one headless tick in milliseconds
    pub fn tick_duration_ms(&self) -> f32 {
        1000.0 / self.tick_rate.max(1) as f32
    }
}
