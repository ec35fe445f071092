//! Session end detection and summary

use serde::Serialize;

use crate::game::state::EndReason;
use crate::game::world::World;

/// Summary of one finished (or abandoned) session
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MatchResult {
    /// `None` when the session was disposed while still running
    pub end_reason: Option<EndReason>,
    pub final_mass: f32,
    pub max_mass: f32,
    pub elapsed_ms: f64,
    pub ticks: u64,
    pub cells_remaining: usize,
    pub bots_remaining: usize,
    pub pellets_remaining: usize,
    pub viruses_remaining: usize,
}

/// Build the summary from current world state
pub fn determine_result(world: &World) -> MatchResult {
    MatchResult {
        end_reason: world.end_reason(),
        final_mass: world.total_mass(),
        max_mass: world.max_mass(),
        elapsed_ms: world.now_ms(),
        ticks: world.ticks(),
        cells_remaining: world.body().len(),
        bots_remaining: world.bots().len(),
        pellets_remaining: world.pellets().len(),
        viruses_remaining: world.viruses().len(),
    }
}

/// Check whether the session should end. Time runs out before elimination
/// is considered.
pub fn check_match_end(now_ms: f64, time_limit_ms: f64, body_empty: bool) -> Option<EndReason> {
    if now_ms >= time_limit_ms {
        return Some(EndReason::TimeExpired);
    }
    if body_empty {
        return Some(EndReason::Eliminated);
    }
    None
}
