//! Collision resolution
//!
//! Runs once per tick after movement, in four phases:
//!
//! 1. each player cell, in index order: pellets, then the first overlapping
//!    virus
//! 2. each bot, in index order: pellets, then the first overlapping virus
//! 3. each player cell against every bot (reverse bot order)
//! 4. bot vs bot, nested index order
//!
//! Feeding and popping finish before any size contest starts. Contests only
//! touch `target_radius`, so every contest compares the radii left by the
//! feeding phases.
//!
//! Every size contest uses [`contest`]: the first operand wins only when
//! strictly larger. Cell-vs-bot ties therefore go to the bot, bot-vs-bot ties
//! to the later bot, and entity-vs-virus ties to the virus (no pop).
//!
//! Removal is order-preserving with explicit index adjustment, so no pair is
//! skipped or visited twice after an element disappears.

use smallvec::SmallVec;

use crate::game::circle::{contest, Circle, Contest};
use crate::game::constants::collision::ABSORPTION_RATIO;
use crate::game::constants::pellet::GROWTH_PER_PELLET;
use crate::game::systems::bots::BotSwarm;
use crate::game::systems::pellets::ResourceField;
use crate::game::systems::player::PlayerBody;
use crate::game::systems::viruses::HazardField;

/// Notable interaction during a collision pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionEvent {
    /// A player cell popped a virus and had its target radius halved
    CellPopped,
    /// A bot popped a virus and had its target radius halved
    BotPopped,
    /// A player cell ate a bot
    BotEatenByCell,
    /// A bot ate a player cell
    CellEatenByBot,
    /// A bot ate another bot
    BotEatenByBot,
}

/// Summary of one collision pass
#[derive(Debug, Clone, Default)]
pub struct CollisionReport {
    pub pellets_eaten_by_player: usize,
    pub pellets_eaten_by_bots: usize,
    /// OPTIMIZATION: SmallVec keeps the common quiet tick allocation-free
    pub events: SmallVec<[CollisionEvent; 8]>,
    /// The player's last cell was eaten; the pass stopped early
    pub eliminated: bool,
}

impl CollisionReport {
    pub fn count(&self, kind: CollisionEvent) -> usize {
        self.events.iter().filter(|&&e| e == kind).count()
    }
}

/// Apply every interaction rule for this tick
pub fn resolve(
    body: &mut PlayerBody,
    pellets: &mut ResourceField,
    viruses: &mut HazardField,
    swarm: &mut BotSwarm,
) -> CollisionReport {
    let mut report = CollisionReport::default();

    resolve_cell_feeding(body, pellets, viruses, &mut report);
    resolve_bot_feeding(pellets, viruses, swarm, &mut report);

    resolve_cell_contests(body, swarm, &mut report);
    if report.eliminated {
        return report;
    }

    resolve_bot_contests(swarm, &mut report);

    report
}

fn resolve_cell_feeding(
    body: &mut PlayerBody,
    pellets: &mut ResourceField,
    viruses: &mut HazardField,
    report: &mut CollisionReport,
) {
    for (c, cell) in body.cells_mut().iter_mut().enumerate() {
        let eaten = pellets.check_collisions(&*cell);
        if eaten > 0 {
            report.pellets_eaten_by_player += eaten;
            cell.set_target_radius(cell.target_radius + eaten as f32 * GROWTH_PER_PELLET);
        }

        if let Some(vi) = viruses.check_collision(&*cell) {
            let virus_radius = viruses.get(vi).map_or(f32::INFINITY, |v| v.radius);
            if contest(cell.radius, virus_radius) == Contest::FirstWins {
                cell.set_target_radius(cell.radius / 2.0);
                viruses.remove(vi);
                report.events.push(CollisionEvent::CellPopped);
                tracing::debug!("Cell {} popped a virus of radius {:.1}", c, virus_radius);
            }
        }
    }
}

fn resolve_bot_feeding(
    pellets: &mut ResourceField,
    viruses: &mut HazardField,
    swarm: &mut BotSwarm,
    report: &mut CollisionReport,
) {
    for bot in swarm.bots_mut().iter_mut() {
        let eaten = pellets.check_collisions(&*bot);
        if eaten > 0 {
            report.pellets_eaten_by_bots += eaten;
            bot.grow(eaten as f32 * GROWTH_PER_PELLET);
        }

        if let Some(vi) = viruses.check_collision(&*bot) {
            let virus_radius = viruses.get(vi).map_or(f32::INFINITY, |v| v.radius);
            if contest(bot.radius, virus_radius) == Contest::FirstWins {
                bot.set_target_radius(bot.radius / 2.0);
                viruses.remove(vi);
                report.events.push(CollisionEvent::BotPopped);
            }
        }
    }
}

fn resolve_cell_contests(body: &mut PlayerBody, swarm: &mut BotSwarm, report: &mut CollisionReport) {
    let bots = swarm.bots_mut();
    let mut c = 0;
    while c < body.len() {
        let mut cell_eaten = false;
        for b in (0..bots.len()).rev() {
            let cell = &body.cells()[c];
            if !cell.overlaps(&bots[b]) {
                continue;
            }
            match contest(cell.radius, bots[b].radius) {
                Contest::FirstWins => {
                    let gain = bots[b].radius * ABSORPTION_RATIO;
                    body.grow_cell(c, gain);
                    bots.remove(b);
                    report.events.push(CollisionEvent::BotEatenByCell);
                }
                Contest::SecondWins => {
                    let gain = cell.radius * ABSORPTION_RATIO;
                    bots[b].grow(gain);
                    body.remove_cell(c);
                    report.events.push(CollisionEvent::CellEatenByBot);
                    cell_eaten = true;
                    break;
                }
            }
        }

        if cell_eaten {
            tracing::debug!("Cell {} eaten by a bot, {} cells left", c, body.len());
            if body.is_empty() {
                report.eliminated = true;
                return;
            }
            // The next cell has shifted into slot `c`
            continue;
        }
        c += 1;
    }
}

fn resolve_bot_contests(swarm: &mut BotSwarm, report: &mut CollisionReport) {
    let bots = swarm.bots_mut();
    let mut i = 0;
    while i < bots.len() {
        let mut first_eaten = false;
        let mut j = i + 1;
        while j < bots.len() {
            if !bots[i].overlaps(&bots[j]) {
                j += 1;
                continue;
            }
            report.events.push(CollisionEvent::BotEatenByBot);
            match contest(bots[i].radius, bots[j].radius) {
                Contest::FirstWins => {
                    let gain = bots[j].radius * ABSORPTION_RATIO;
                    bots[i].grow(gain);
                    bots.remove(j);
                    // Slot `j` now holds the next candidate
                }
                Contest::SecondWins => {
                    let gain = bots[i].radius * ABSORPTION_RATIO;
                    bots[j].grow(gain);
                    bots.remove(i);
                    first_eaten = true;
                    break;
                }
            }
        }
        if !first_eaten {
            i += 1;
        }
    }
}
