//! Cell Royale simulation core
//!
//! Headless 2D cell-eating simulation: a multi-cell player body, random-walk
//! bots, food pellets and virus hazards in a bounded world, advanced by an
//! explicit time step.
//!
//! Start from [`game::world::World`]: build it from a [`config::SimConfig`],
//! call `tick` with a [`game::world::TickInput`] each frame and read state
//! back with `snapshot`.

pub mod config;
pub mod game;
pub mod util;
