//! Pellet field
//!
//! Static food population. Pellets never move and are never replenished;
//! an empty field is a valid steady state.

use rand::Rng;

use crate::game::circle::Circle;
use crate::game::state::{EntityView, Pellet, SimRng};
use crate::util::vec2::Vec2;

/// Owns every pellet in the world
#[derive(Debug, Clone, Default)]
pub struct ResourceField {
    pellets: Vec<Pellet>,
    width: f32,
    height: f32,
}

impl ResourceField {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            pellets: Vec::new(),
            width,
            height,
        }
    }

    /// Fill with `count` pellets at uniform positions in `[0, width) x [0, height)`
    pub fn spawn(&mut self, count: usize, rng: &mut SimRng) {
        self.pellets.reserve(count);
        for _ in 0..count {
            let position = Vec2::new(
                rng.gen::<f32>() * self.width,
                rng.gen::<f32>() * self.height,
            );
            let hue = rng.gen_range(0..360);
            self.pellets.push(Pellet::new(position, hue));
        }
        tracing::debug!("Spawned {} pellets", count);
    }

    /// Place a pellet at an exact position
    pub fn insert(&mut self, pellet: Pellet) {
        self.pellets.push(pellet);
    }

    /// Remove every pellet overlapping `circle`; returns how many were removed.
    ///
    /// Each pellet is tested independently, so removal order cannot change the result.
    pub fn check_collisions<C: Circle + ?Sized>(&mut self, circle: &C) -> usize {
        let before = self.pellets.len();
        self.pellets.retain(|pellet| !circle.overlaps(pellet));
        before - self.pellets.len()
    }

    pub fn pellets(&self) -> &[Pellet] {
        &self.pellets
    }

    pub fn len(&self) -> usize {
        self.pellets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pellets.is_empty()
    }

    pub fn views(&self) -> Vec<EntityView> {
        self.pellets.iter().map(|p| EntityView::of(p, p.hue)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::circle::Disc;
    use rand::SeedableRng;

    fn field_with(positions: &[(f32, f32)]) -> ResourceField {
        let mut field = ResourceField::new(3000.0, 3000.0);
        for &(x, y) in positions {
            field.insert(Pellet::new(Vec2::new(x, y), 0));
        }
        field
    }

    #[test]
    fn test_spawn_within_bounds() {
        let mut rng = SimRng::seed_from_u64(7);
        let mut field = ResourceField::new(200.0, 100.0);
        field.spawn(500, &mut rng);

        assert_eq!(field.len(), 500);
        for p in field.pellets() {
            assert!(p.position.x >= 0.0 && p.position.x < 200.0);
            assert!(p.position.y >= 0.0 && p.position.y < 100.0);
            assert!(p.hue < 360);
        }
    }

    #[test]
    fn test_pellet_at_cell_center_is_eaten() {
        let mut field = field_with(&[(1500.0, 1500.0)]);
        let cell = Disc::new(Vec2::new(1500.0, 1500.0), 15.0);

        assert_eq!(field.check_collisions(&cell), 1);
        assert!(field.is_empty());
    }

    #[test]
    fn test_only_overlapping_pellets_removed() {
        // radius sum = 10 + 3 = 13
        let mut field = field_with(&[(0.0, 0.0), (12.9, 0.0), (13.0, 0.0), (100.0, 100.0)]);
        let circle = Disc::new(Vec2::ZERO, 10.0);

        let eaten = field.check_collisions(&circle);

        assert_eq!(eaten, 2);
        assert_eq!(field.len(), 2);
        assert!(field.pellets().iter().all(|p| p.position.x >= 13.0));
    }

    #[test]
    fn test_count_matches_removed_and_never_grows() {
        let mut rng = SimRng::seed_from_u64(11);
        let mut field = ResourceField::new(300.0, 300.0);
        field.spawn(200, &mut rng);

        for step in 0..20 {
            let before = field.len();
            let disc = Disc::new(Vec2::new(step as f32 * 15.0, 150.0), 40.0);
            let eaten = field.check_collisions(&disc);
            assert_eq!(before - field.len(), eaten);
            assert!(field.len() <= before);
        }
    }

    #[test]
    fn test_empty_field_is_valid() {
        let mut field = ResourceField::new(100.0, 100.0);
        assert_eq!(field.check_collisions(&Disc::new(Vec2::ZERO, 50.0)), 0);
        assert!(field.views().is_empty());
    }
}
