/// World dimensions and default populations
pub mod world {
    /// Default world width in world units
    pub const WIDTH: f32 = 3000.0;
    /// Default world height in world units
    pub const HEIGHT: f32 = 3000.0;
    /// Pellets spawned at world creation
    pub const PELLET_COUNT: usize = 400;
    /// Viruses spawned at world creation
    pub const VIRUS_COUNT: usize = 15;
    /// Bots spawned at world creation
    pub const BOT_COUNT: usize = 15;
}

/// Pellet (food) constants
pub mod pellet {
    /// Fixed pellet radius
    pub const RADIUS: f32 = 3.0;
    /// Target radius gained per pellet eaten
    pub const GROWTH_PER_PELLET: f32 = 0.5;
}

/// Virus (hazard) constants
pub mod virus {
    /// Smallest virus radius (inclusive)
    pub const MIN_RADIUS: f32 = 40.0;
    /// Largest virus radius (exclusive)
    pub const MAX_RADIUS: f32 = 55.0;
    /// Viruses are always drawn green
    pub const HUE: u16 = 120;
}

/// Bot organism constants
pub mod bot {
    /// Smallest spawn radius (inclusive)
    pub const MIN_SPAWN_RADIUS: f32 = 15.0;
    /// Largest spawn radius (exclusive)
    pub const MAX_SPAWN_RADIUS: f32 = 25.0;
    /// Per-tick exponential smoothing toward target radius
    pub const SMOOTHING: f32 = 0.15;
    /// Speed of a zero-radius bot, world units per tick
    pub const BASE_MAX_SPEED: f32 = 2.0;
    /// Fraction of radius lost per second
    pub const DECAY_RATE: f32 = 0.001;
    /// Chance per tick of perturbing the heading
    pub const HEADING_CHANGE_PROBABILITY: f64 = 0.01;
    /// Heading perturbation is uniform in [-HEADING_JITTER, HEADING_JITTER]
    pub const HEADING_JITTER: f32 = 0.5;
}

/// Player cell constants
pub mod player {
    /// Radius of the single cell the body starts with
    pub const INITIAL_RADIUS: f32 = 15.0;
    /// Player cells are always drawn red
    pub const HUE: u16 = 0;
    /// Per-tick exponential smoothing toward target radius
    pub const SMOOTHING: f32 = 0.1;
    /// Speed of a zero-radius cell before distance scaling
    pub const BASE_MAX_SPEED: f32 = 1.0;
    /// Fraction of the remaining distance covered per tick at full speed
    pub const ACCELERATION_FACTOR: f32 = 0.01;
    /// Fraction of radius lost per second
    pub const DECAY_RATE: f32 = 0.0005;
    /// Ejection velocity retained per tick
    pub const FRICTION: f32 = 0.85;
    /// Cells closer than this to the target do not steer
    pub const STEER_DEADZONE: f32 = 0.5;
    /// Default distance at which steering saturates (half a 800px viewport)
    pub const DEFAULT_SPEED_LIMIT_RADIUS: f32 = 400.0;
}

/// Split constants
pub mod split {
    /// Largest cell must have at least this area to split (radius ~17.84)
    pub const MIN_AREA: f32 = 1000.0;
    /// Ejection speed of the new half, world units per tick
    pub const EJECT_SPEED: f32 = 15.0;
    /// Default maximum number of cells a body may own
    pub const MAX_CELLS: usize = 10;
    /// Default minimum time between accepted split requests
    pub const COOLDOWN_MS: f64 = 1000.0;
}

/// Merge constants
pub mod merge {
    /// Merge-ineligibility window after creation or a split
    pub const SPLIT_COOLDOWN_MS: f64 = 15_000.0;
    /// Merge-ineligibility window after a merge
    pub const POST_MERGE_COOLDOWN_MS: f64 = 5_000.0;
}

/// Collision resolution constants
pub mod collision {
    /// Fraction of the loser's radius added to the winner's target radius
    pub const ABSORPTION_RATIO: f32 = 0.3;
    /// Floor for center distances used as divisors
    pub const MIN_SEPARATION_DISTANCE: f32 = 0.0001;
}

/// Game/session constants
pub mod game {
    /// Session length in seconds (30 minutes)
    pub const TIME_LIMIT_SECS: u64 = 30 * 60;
    /// Headless driver tick rate in Hz (one tick per display frame)
    pub const TICK_RATE: u32 = 60;
}

/// Area (mass) of a circle
#[inline]
pub fn circle_area(radius: f32) -> f32 {
    std::f32::consts::PI * radius * radius
}

/// Radius of a circle with the given area (inverse of `circle_area`)
#[inline]
pub fn radius_from_area(area: f32) -> f32 {
    (area.max(0.0) / std::f32::consts::PI).sqrt()
}

/// Maximum speed for a circle of the given radius; larger circles are strictly slower
#[inline]
pub fn speed_for_radius(base_max_speed: f32, radius: f32) -> f32 {
    base_max_speed / (1.0 + radius * 0.01)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_area() {
        let area = circle_area(10.0);
        assert!((area - 314.159_27).abs() < 0.01);
    }

    #[test]
    fn test_radius_from_area() {
        let radius = radius_from_area(circle_area(25.0));
        assert!((radius - 25.0).abs() < 0.001);
    }

    #[test]
    fn test_radius_from_negative_area_is_zero() {
        assert_eq!(radius_from_area(-5.0), 0.0);
    }

    #[test]
    fn test_split_threshold_radius() {
        // The area threshold corresponds to a radius of roughly 17.8
        let threshold_radius = radius_from_area(split::MIN_AREA);
        assert!((threshold_radius - 17.84).abs() < 0.01);
        assert!(circle_area(player::INITIAL_RADIUS) < split::MIN_AREA);
    }

    #[test]
    fn test_speed_decreases_with_radius() {
        let radii = [0.0, 10.0, 50.0, 100.0, 500.0];
        for pair in radii.windows(2) {
            assert!(
                speed_for_radius(bot::BASE_MAX_SPEED, pair[0])
                    > speed_for_radius(bot::BASE_MAX_SPEED, pair[1])
            );
        }
        // 2 / (1 + 100 * 0.01) = 1
        assert!((speed_for_radius(bot::BASE_MAX_SPEED, 100.0) - 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_player_decays_slower_than_bots() {
        assert!(player::DECAY_RATE < bot::DECAY_RATE);
        assert!(player::SMOOTHING < bot::SMOOTHING);
    }

    #[test]
    fn test_cooldowns_ordering() {
        assert!(merge::POST_MERGE_COOLDOWN_MS < merge::SPLIT_COOLDOWN_MS);
        assert!(split::COOLDOWN_MS < merge::SPLIT_COOLDOWN_MS);
    }

    #[test]
    fn test_virus_radius_range() {
        assert!(virus::MIN_RADIUS < virus::MAX_RADIUS);
        // Fresh bots can never pop a virus
        assert!(bot::MAX_SPAWN_RADIUS < virus::MIN_RADIUS);
    }
}
