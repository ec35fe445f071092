use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cell_royale_sim::config::SimConfig;
use cell_royale_sim::game::circle::Circle;
use cell_royale_sim::game::constants::split;
use cell_royale_sim::game::state::MatchPhase;
use cell_royale_sim::game::world::{TickInput, World};
use cell_royale_sim::util::vec2::Vec2;

/// Seconds between scripted split attempts
const SPLIT_EVERY_SECS: u64 = 5;

/// Headless driver input: chase the pellet nearest the largest cell and split
/// periodically once big enough.
fn scripted_input(world: &World, tick: u64, tick_rate: u32) -> TickInput {
    let Some(cell) = world.largest_cell() else {
        return TickInput::default();
    };
    let from = cell.position();

    let target = world
        .pellets()
        .pellets()
        .iter()
        .map(|p| p.position)
        .min_by(|a, b| a.distance_sq_to(from).total_cmp(&b.distance_sq_to(from)))
        .unwrap_or_else(|| {
            Vec2::new(
                world.config().world_width / 2.0,
                world.config().world_height / 2.0,
            )
        });

    let split_tick = tick % (SPLIT_EVERY_SECS * u64::from(tick_rate)) == 0;
    TickInput {
        target,
        split: split_tick && cell.area() >= split::MIN_AREA * 2.0,
        ..TickInput::default()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    info!("Cell Royale simulation v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = SimConfig::load_or_default();
    info!(
        "Configuration loaded: {}x{} world, tick_rate={}, seed={:?}",
        config.world_width, config.world_height, config.tick_rate, config.seed
    );

    let tick_rate = config.tick_rate;
    let dt_ms = config.tick_duration_ms();
    let mut world = World::new(config)?;

    let mut interval = tokio::time::interval(Duration::from_secs_f32(dt_ms / 1000.0));
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let run = async {
        let mut tick: u64 = 0;
        loop {
            interval.tick().await;
            let input = scripted_input(&world, tick, tick_rate);
            if world.tick(dt_ms, &input) == MatchPhase::GameOver {
                break;
            }
            tick += 1;

            if tick % u64::from(tick_rate) == 0 {
                info!(
                    "{} left | cells={} mass={:.0} max={:.0} bots={} pellets={}",
                    world.time_left(),
                    world.body().len(),
                    world.total_mass(),
                    world.max_mass(),
                    world.bots().len(),
                    world.pellets().len()
                );
            }
        }
    };

    // Run until the session ends or Ctrl+C
    tokio::select! {
        _ = run => {
            info!("Session finished");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    let result = world.dispose();
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}
