//! Shared circle capability
//!
//! Every entity kind (pellet, virus, bot, player cell) is a circle in world
//! space. Collision routines are written once against [`Circle`].

use crate::game::constants::circle_area;
use crate::util::vec2::Vec2;

/// Anything with a position and a radius
pub trait Circle {
    fn position(&self) -> Vec2;
    fn radius(&self) -> f32;

    /// Area of the circle; the game's notion of mass
    fn area(&self) -> f32 {
        circle_area(self.radius())
    }

    /// Strict overlap test on squared distances: touching circles do not overlap
    fn overlaps<C: Circle + ?Sized>(&self, other: &C) -> bool {
        let radius_sum = self.radius() + other.radius();
        self.position().distance_sq_to(other.position()) < radius_sum * radius_sum
    }
}

/// Outcome of a size contest between two overlapping circles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contest {
    FirstWins,
    SecondWins,
}

/// The first operand wins only when strictly larger; ties go to the second.
///
/// This is the single tie-break used by cell-vs-bot, bot-vs-bot and
/// entity-vs-virus contests.
#[inline]
pub fn contest(first_radius: f32, second_radius: f32) -> Contest {
    if first_radius > second_radius {
        Contest::FirstWins
    } else {
        Contest::SecondWins
    }
}

/// Bare circle, used for ad-hoc queries and tests
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Disc {
    pub position: Vec2,
    pub radius: f32,
}

impl Disc {
    pub fn new(position: Vec2, radius: f32) -> Self {
        Self {
            position,
            radius: radius.max(0.0),
        }
    }
}

impl Circle for Disc {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn radius(&self) -> f32 {
        self.radius
    }
}
