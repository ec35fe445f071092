//! Virus field
//!
//! Static hazards. The field only reports contact; the collision resolver
//! decides whether the contact pops the entity and removes the virus.

use rand::Rng;

use crate::game::circle::Circle;
use crate::game::constants::virus::{MAX_RADIUS, MIN_RADIUS};
use crate::game::state::{virus_view, EntityView, SimRng, Virus};
use crate::util::vec2::Vec2;

/// Owns every virus in the world, in spawn order
#[derive(Debug, Clone, Default)]
pub struct HazardField {
    viruses: Vec<Virus>,
    width: f32,
    height: f32,
}

impl HazardField {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            viruses: Vec::new(),
            width,
            height,
        }
    }

    /// Fill with `count` viruses of radius in `[40, 55)` at uniform positions
    pub fn spawn(&mut self, count: usize, rng: &mut SimRng) {
        self.viruses.reserve(count);
        for _ in 0..count {
            let position = Vec2::new(
                rng.gen::<f32>() * self.width,
                rng.gen::<f32>() * self.height,
            );
            let radius = rng.gen_range(MIN_RADIUS..MAX_RADIUS);
            self.viruses.push(Virus::new(position, radius));
        }
        tracing::debug!("Spawned {} viruses", count);
    }

    pub fn insert(&mut self, virus: Virus) {
        self.viruses.push(virus);
    }

    /// Index of the first virus (in collection order) overlapping `circle`
    pub fn check_collision<C: Circle + ?Sized>(&self, circle: &C) -> Option<usize> {
        self.viruses.iter().position(|virus| circle.overlaps(virus))
    }

    pub fn get(&self, index: usize) -> Option<&Virus> {
        self.viruses.get(index)
    }

    /// Order-preserving removal, so "first overlapping" stays stable
    pub fn remove(&mut self, index: usize) -> Option<Virus> {
        (index < self.viruses.len()).then(|| self.viruses.remove(index))
    }

    pub fn viruses(&self) -> &[Virus] {
        &self.viruses
    }

    pub fn len(&self) -> usize {
        self.viruses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.viruses.is_empty()
    }

    pub fn views(&self) -> Vec<EntityView> {
        self.viruses.iter().map(virus_view).collect()
    }
}
