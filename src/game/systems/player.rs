//! Player body
//!
//! The player's organism is 1..N cells that each move, decay and grow on
//! their own. Cells created by a split repel each other until their merge
//! cooldown expires; once two overlapping cells are both eligible they fuse.

use crate::game::circle::Circle;
use crate::game::constants::collision::MIN_SEPARATION_DISTANCE;
use crate::game::constants::merge::{POST_MERGE_COOLDOWN_MS, SPLIT_COOLDOWN_MS};
use crate::game::constants::{player, radius_from_area, speed_for_radius, split};
use crate::game::state::{EntityView, PlayerCell};
use crate::util::vec2::Vec2;

/// The player's multi-cell organism
#[derive(Debug, Clone)]
pub struct PlayerBody {
    cells: Vec<PlayerCell>,
    width: f32,
    height: f32,
    decay_rate: f32,
    base_max_speed: f32,
    acceleration_factor: f32,
}

impl PlayerBody {
    /// Single cell of the initial radius at world center
    pub fn new(width: f32, height: f32, decay_rate: f32, now_ms: f64) -> Self {
        let center = Vec2::new(width / 2.0, height / 2.0);
        Self {
            cells: vec![PlayerCell::new(center, player::INITIAL_RADIUS, now_ms)],
            width,
            height,
            decay_rate,
            base_max_speed: player::BASE_MAX_SPEED,
            acceleration_factor: player::ACCELERATION_FACTOR,
        }
    }

    /// Body built from explicit cells
    pub fn with_cells(width: f32, height: f32, decay_rate: f32, cells: Vec<PlayerCell>) -> Self {
        Self {
            cells,
            width,
            height,
            decay_rate,
            base_max_speed: player::BASE_MAX_SPEED,
            acceleration_factor: player::ACCELERATION_FACTOR,
        }
    }

    /// Move every cell, then separate cells that may not merge yet, then merge.
    pub fn update(&mut self, target: Vec2, speed_limit_radius: f32, dt_ms: f32, now_ms: f64) {
        let dt_secs = dt_ms / 1000.0;
        for index in 0..self.cells.len() {
            self.move_cell(index, target, speed_limit_radius, dt_secs);
        }

        self.separate_overlaps(now_ms);
        self.merge_cells(now_ms);
    }

    fn move_cell(&mut self, index: usize, target: Vec2, speed_limit_radius: f32, dt_secs: f32) {
        let (width, height) = (self.width, self.height);
        let decay_rate = self.decay_rate;
        let base_max_speed = self.base_max_speed;
        let acceleration_factor = self.acceleration_factor;
        let cell = &mut self.cells[index];

        cell.radius += player::SMOOTHING * (cell.target_radius - cell.radius);
        cell.radius = cell.radius.max(0.0);

        let radius_loss = cell.radius * decay_rate * dt_secs;
        cell.set_target_radius(cell.target_radius - radius_loss);

        // Ejection momentum with geometric drag
        cell.position += cell.velocity;
        cell.velocity *= cell.friction;

        let offset = target - cell.position;
        let distance = offset.length();
        if distance > player::STEER_DEADZONE {
            let raw_max_speed = speed_for_radius(base_max_speed, cell.radius);
            let ratio = if speed_limit_radius > 0.0 {
                (distance / speed_limit_radius).min(1.0)
            } else {
                1.0
            };
            let final_speed = ratio * raw_max_speed;
            cell.position +=
                Vec2::from_angle(offset.angle()) * (distance * acceleration_factor * final_speed);
        }

        cell.position = cell.position.clamp_to_bounds(width, height);
    }

    /// Push apart overlapping pairs where at least one cell is still merge-ineligible
    fn separate_overlaps(&mut self, now_ms: f64) {
        let (width, height) = (self.width, self.height);
        for i in 0..self.cells.len() {
            for j in (i + 1)..self.cells.len() {
                let (head, tail) = self.cells.split_at_mut(j);
                let (first, second) = (&mut head[i], &mut tail[0]);

                if first.is_merge_eligible(now_ms) && second.is_merge_eligible(now_ms) {
                    continue;
                }
                if !first.overlaps(&*second) {
                    continue;
                }

                let axis = separation_axis(first.position, second.position);
                let distance = first.position.distance_to(second.position);
                let push = (first.radius + second.radius - distance) / 2.0;

                second.position = (second.position + axis * push).clamp_to_bounds(width, height);
                first.position = (first.position - axis * push).clamp_to_bounds(width, height);
            }
        }
    }

    /// Fuse overlapping pairs of merge-eligible cells into the lower index.
    ///
    /// Pairs are visited in nested index order; after a removal the inner
    /// index is re-scanned so no pair is skipped.
    fn merge_cells(&mut self, now_ms: f64) {
        let mut i = 0;
        while i < self.cells.len() {
            let mut j = i + 1;
            while j < self.cells.len() {
                let mergeable = self.cells[i].is_merge_eligible(now_ms)
                    && self.cells[j].is_merge_eligible(now_ms)
                    && self.cells[i].overlaps(&self.cells[j]);
                if !mergeable {
                    j += 1;
                    continue;
                }

                let absorbed = self.cells.remove(j);
                let survivor = &mut self.cells[i];
                let (area1, area2) = (survivor.area(), absorbed.area());
                let total = area1 + area2;
                if total > 0.0 {
                    survivor.position =
                        (survivor.position * area1 + absorbed.position * area2) * (1.0 / total);
                }
                survivor.set_radius(radius_from_area(total));
                survivor.merge_eligible_at_ms = now_ms + POST_MERGE_COOLDOWN_MS;

                tracing::debug!(
                    "Merged cells {} and {} into radius {:.1}",
                    i,
                    j,
                    survivor.radius
                );
            }
            i += 1;
        }
    }

    /// Split the largest cell in two halves of equal area.
    ///
    /// Returns false (no-op) when the largest cell is below the split threshold.
    /// Cell-count and cooldown limits are enforced by the caller.
    pub fn split(&mut self, target: Vec2, now_ms: f64) -> bool {
        let Some(index) = self.largest_cell_index() else {
            return false;
        };
        let area = self.cells[index].area();
        if area < split::MIN_AREA {
            return false;
        }

        let half_radius = radius_from_area(area / 2.0);
        let cell = &mut self.cells[index];
        cell.set_radius(half_radius);
        cell.merge_eligible_at_ms = now_ms + SPLIT_COOLDOWN_MS;

        let mut ejected = PlayerCell::new(cell.position, half_radius, now_ms);
        let bearing = (target - cell.position).angle();
        ejected.velocity = Vec2::from_angle(bearing) * split::EJECT_SPEED;
        self.cells.push(ejected);

        tracing::debug!(
            "Split cell {} into two halves of radius {:.1} ({} cells)",
            index,
            half_radius,
            self.cells.len()
        );
        true
    }

    /// Index of the cell with the greatest area (first one on ties)
    pub fn largest_cell_index(&self) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for (index, cell) in self.cells.iter().enumerate() {
            let area = cell.area();
            match best {
                Some((_, best_area)) if area <= best_area => {}
                _ => best = Some((index, area)),
            }
        }
        best.map(|(index, _)| index)
    }

    pub fn largest_cell(&self) -> Option<&PlayerCell> {
        self.largest_cell_index().map(|index| &self.cells[index])
    }

    /// Sum of cell areas
    pub fn total_mass(&self) -> f32 {
        self.cells.iter().map(|cell| cell.area()).sum()
    }

    /// Add to a cell's target radius (never below zero)
    pub fn grow_cell(&mut self, index: usize, amount: f32) {
        if let Some(cell) = self.cells.get_mut(index) {
            cell.set_target_radius(cell.target_radius + amount);
        }
    }

    /// Order-preserving removal
    pub fn remove_cell(&mut self, index: usize) -> Option<PlayerCell> {
        (index < self.cells.len()).then(|| self.cells.remove(index))
    }

    pub fn cells(&self) -> &[PlayerCell] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [PlayerCell] {
        &mut self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// An empty body is dead
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn views(&self) -> Vec<EntityView> {
        self.cells.iter().map(|c| EntityView::of(c, c.hue)).collect()
    }
}

/// Unit vector from `from` toward `to`; a fixed +x axis when the centers coincide
fn separation_axis(from: Vec2, to: Vec2) -> Vec2 {
    if from.distance_sq_to(to) < MIN_SEPARATION_DISTANCE * MIN_SEPARATION_DISTANCE {
        return Vec2::new(1.0, 0.0);
    }
    from.direction_to(to, MIN_SEPARATION_DISTANCE).0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::constants::circle_area;

    const W: f32 = 3000.0;
    const H: f32 = 3000.0;

    fn cell(x: f32, y: f32, radius: f32, eligible_at: f64) -> PlayerCell {
        let mut c = PlayerCell::new(Vec2::new(x, y), radius, 0.0);
        c.merge_eligible_at_ms = eligible_at;
        c
    }

    fn body(cells: Vec<PlayerCell>) -> PlayerBody {
        PlayerBody::with_cells(W, H, player::DECAY_RATE, cells)
    }

    #[test]
    fn test_new_body_single_centered_cell() {
        let b = PlayerBody::new(W, H, player::DECAY_RATE, 0.0);
        assert_eq!(b.len(), 1);
        assert_eq!(b.cells()[0].position, Vec2::new(1500.0, 1500.0));
        assert_eq!(b.cells()[0].radius, player::INITIAL_RADIUS);
    }

    #[test]
    fn test_smoothing_and_decay() {
        let mut b = body(vec![cell(1500.0, 1500.0, 20.0, 0.0)]);
        b.cells_mut()[0].target_radius = 30.0;

        // Target equal to position: no steering
        b.update(Vec2::new(1500.0, 1500.0), 400.0, 1000.0, 0.0);

        let c = &b.cells()[0];
        // 20 + 0.1 * (30 - 20) = 21
        assert!((c.radius - 21.0).abs() < 0.0001);
        // 30 - 21 * 0.0005 * 1s
        assert!((c.target_radius - (30.0 - 21.0 * 0.0005)).abs() < 0.0001);
    }

    #[test]
    fn test_steering_toward_target() {
        let mut b = body(vec![cell(1000.0, 1000.0, 0.0, 0.0)]);

        b.update(Vec2::new(1400.0, 1000.0), 400.0, 0.0, 0.0);

        // distance 400, ratio 1, speed 1: moves 400 * 0.01 = 4
        assert!((b.cells()[0].position.x - 1004.0).abs() < 0.001);
        assert!((b.cells()[0].position.y - 1000.0).abs() < 0.001);
    }

    #[test]
    fn test_steering_slows_near_target() {
        let mut far = body(vec![cell(1000.0, 1000.0, 0.0, 0.0)]);
        let mut near = body(vec![cell(1000.0, 1000.0, 0.0, 0.0)]);

        far.update(Vec2::new(1400.0, 1000.0), 400.0, 0.0, 0.0);
        near.update(Vec2::new(1100.0, 1000.0), 400.0, 0.0, 0.0);

        // near: distance 100, ratio 0.25: moves 100 * 0.01 * 0.25 = 0.25
        assert!((near.cells()[0].position.x - 1000.25).abs() < 0.001);
        assert!(far.cells()[0].position.x > near.cells()[0].position.x);
    }

    #[test]
    fn test_deadzone_prevents_jitter() {
        let mut b = body(vec![cell(1000.0, 1000.0, 10.0, 0.0)]);
        b.update(Vec2::new(1000.3, 1000.0), 400.0, 0.0, 0.0);
        assert_eq!(b.cells()[0].position, Vec2::new(1000.0, 1000.0));
    }

    #[test]
    fn test_ejection_velocity_decays_geometrically() {
        let mut c = cell(1000.0, 1000.0, 10.0, 0.0);
        c.velocity = Vec2::new(10.0, 0.0);
        let mut b = body(vec![c]);

        b.update(Vec2::new(1010.0, 1000.0), 400.0, 0.0, 0.0);
        assert!((b.cells()[0].velocity.x - 8.5).abs() < 0.0001);
        // Moved by the full carried velocity; target now 0 away
        assert!((b.cells()[0].position.x - 1010.0).abs() < 0.0001);

        b.update(Vec2::new(1010.0, 1000.0), 400.0, 0.0, 0.0);
        assert!((b.cells()[0].velocity.x - 7.225).abs() < 0.0001);
    }

    #[test]
    fn test_cells_clamped_to_world() {
        let mut c = cell(5.0, 2995.0, 10.0, 0.0);
        c.velocity = Vec2::new(-50.0, 50.0);
        let mut b = body(vec![c]);

        b.update(Vec2::new(-500.0, 3500.0), 400.0, 16.0, 0.0);

        assert_eq!(b.cells()[0].position, Vec2::new(0.0, 3000.0));
    }

    #[test]
    fn test_split_halves_area() {
        let mut b = body(vec![cell(1500.0, 1500.0, 30.0, 0.0)]);

        assert!(b.split(Vec2::new(1600.0, 1500.0), 0.0));

        assert_eq!(b.len(), 2);
        let expected = (circle_area(30.0) / 2.0 / std::f32::consts::PI).sqrt();
        assert!((expected - 21.21).abs() < 0.01);
        for c in b.cells() {
            assert!((c.radius - expected).abs() < 0.001);
            assert!((c.target_radius - expected).abs() < 0.001);
        }
        assert!((b.total_mass() - circle_area(30.0)).abs() < 0.1);
    }

    #[test]
    fn test_split_ejects_toward_target() {
        let mut b = body(vec![cell(1500.0, 1500.0, 30.0, 0.0)]);

        b.split(Vec2::new(1500.0, 1000.0), 0.0);

        let ejected = &b.cells()[1];
        assert_eq!(ejected.position, b.cells()[0].position);
        assert!(ejected.velocity.x.abs() < 0.0001);
        assert!((ejected.velocity.y + split::EJECT_SPEED).abs() < 0.0001);
        assert_eq!(b.cells()[0].velocity, Vec2::ZERO);
    }

    #[test]
    fn test_split_small_cell_is_noop() {
        let mut b = body(vec![cell(1500.0, 1500.0, 5.0, 0.0)]);
        assert!(!b.split(Vec2::new(1600.0, 1500.0), 0.0));
        assert_eq!(b.len(), 1);
        assert_eq!(b.cells()[0].radius, 5.0);
    }

    #[test]
    fn test_split_uses_largest_cell() {
        let mut b = body(vec![
            cell(500.0, 500.0, 20.0, 0.0),
            cell(1500.0, 1500.0, 40.0, 0.0),
        ]);

        b.split(Vec2::new(2000.0, 1500.0), 0.0);

        assert_eq!(b.len(), 3);
        assert_eq!(b.cells()[0].radius, 20.0);
        assert!(b.cells()[1].radius < 40.0);
        assert_eq!(b.cells()[2].position, Vec2::new(1500.0, 1500.0));
    }

    #[test]
    fn test_split_resets_merge_cooldown() {
        let mut b = body(vec![cell(1500.0, 1500.0, 30.0, 0.0)]);
        b.split(Vec2::new(1600.0, 1500.0), 2_000.0);

        for c in b.cells() {
            assert_eq!(c.merge_eligible_at_ms, 2_000.0 + SPLIT_COOLDOWN_MS);
        }
    }

    #[test]
    fn test_split_cells_cannot_merge_before_cooldown() {
        let mut b = body(vec![cell(1500.0, 1500.0, 40.0, 0.0)]);
        b.split(Vec2::new(1500.0, 1500.0), 0.0);

        // Pin the target on the body so the halves are pulled together
        let mut now = 0.0;
        while now < SPLIT_COOLDOWN_MS - 100.0 {
            now += 100.0;
            b.update(Vec2::new(1500.0, 1500.0), 400.0, 100.0, now);
            assert_eq!(b.len(), 2, "merged early at {} ms", now);
        }
    }

    #[test]
    fn test_ineligible_cells_are_pushed_apart() {
        let mut b = body(vec![
            cell(1000.0, 1000.0, 20.0, 10_000.0),
            cell(1010.0, 1000.0, 20.0, 0.0),
        ]);

        b.separate_overlaps(0.0);

        let (a, c) = (&b.cells()[0], &b.cells()[1]);
        // penetration 30, each moves 15
        assert!((a.position.x - 985.0).abs() < 0.001);
        assert!((c.position.x - 1025.0).abs() < 0.001);
        assert!(!a.overlaps(c));
    }

    #[test]
    fn test_separation_visits_pairs_in_index_order() {
        let mut b = body(vec![
            cell(1000.0, 1000.0, 10.0, 10_000.0),
            cell(1015.0, 1000.0, 10.0, 10_000.0),
            cell(1005.0, 1000.0, 10.0, 10_000.0),
            cell(1010.0, 1000.0, 10.0, 10_000.0),
        ]);

        b.separate_overlaps(0.0);

        // (0,1) (0,2) (0,3) (1,2) (1,3) (2,3), each pushed apart in turn
        let xs: Vec<f32> = b.cells().iter().map(|c| c.position.x).collect();
        assert!((xs[0] - 990.625).abs() < 0.001);
        assert!((xs[1] - 1027.5).abs() < 0.001);
        assert!((xs[2] - 995.9375).abs() < 0.001);
        assert!((xs[3] - 1015.9375).abs() < 0.001);
        for c in b.cells() {
            assert_eq!(c.position.y, 1000.0);
        }
    }

    #[test]
    fn test_coincident_cells_separate_without_nan() {
        let mut b = body(vec![
            cell(1000.0, 1000.0, 20.0, 10_000.0),
            cell(1000.0, 1000.0, 20.0, 10_000.0),
        ]);

        b.separate_overlaps(0.0);

        for c in b.cells() {
            assert!(c.position.is_finite());
        }
        assert!(b.cells()[0].position.distance_to(b.cells()[1].position) > 39.0);
    }

    #[test]
    fn test_eligible_cells_are_not_separated() {
        let mut b = body(vec![
            cell(1000.0, 1000.0, 20.0, 0.0),
            cell(1010.0, 1000.0, 20.0, 0.0),
        ]);
        b.separate_overlaps(1.0);
        assert_eq!(b.cells()[0].position, Vec2::new(1000.0, 1000.0));
        assert_eq!(b.cells()[1].position, Vec2::new(1010.0, 1000.0));
    }

    #[test]
    fn test_merge_conserves_area() {
        let mut b = body(vec![
            cell(1000.0, 1000.0, 20.0, 0.0),
            cell(1010.0, 1000.0, 15.0, 0.0),
        ]);

        b.merge_cells(1.0);

        assert_eq!(b.len(), 1);
        let merged = &b.cells()[0];
        assert!((merged.radius - 25.0).abs() < 0.001);
        assert!((merged.target_radius - 25.0).abs() < 0.001);
        assert_eq!(merged.merge_eligible_at_ms, 1.0 + POST_MERGE_COOLDOWN_MS);
    }

    #[test]
    fn test_merge_uses_area_weighted_center() {
        let mut b = body(vec![
            cell(1000.0, 1000.0, 20.0, 0.0),
            cell(1010.0, 1000.0, 15.0, 0.0),
        ]);

        b.merge_cells(1.0);

        // (1000 * 400 + 1010 * 225) / 625 = 1003.6
        assert!((b.cells()[0].position.x - 1003.6).abs() < 0.01);
        assert!((b.cells()[0].position.y - 1000.0).abs() < 0.01);
    }

    #[test]
    fn test_merge_requires_both_eligible() {
        let mut b = body(vec![
            cell(1000.0, 1000.0, 20.0, 0.0),
            cell(1010.0, 1000.0, 15.0, 5_000.0),
        ]);
        b.merge_cells(1_000.0);
        assert_eq!(b.len(), 2);
    }

    #[test]
    fn test_merge_rescans_after_removal() {
        // Cells 1 and 2 both overlap cell 0. After 0 absorbs 1 it is on
        // cooldown, so 2 must survive; 3 and 4 then merge with each other.
        let mut b = body(vec![
            cell(1000.0, 1000.0, 20.0, 0.0),
            cell(1010.0, 1000.0, 10.0, 0.0),
            cell(990.0, 1000.0, 10.0, 0.0),
            cell(2000.0, 2000.0, 10.0, 0.0),
            cell(2005.0, 2000.0, 10.0, 0.0),
        ]);

        b.merge_cells(1.0);

        assert_eq!(b.len(), 3);
        assert!((b.cells()[0].radius - (500.0f32).sqrt()).abs() < 0.001);
        assert_eq!(b.cells()[1].radius, 10.0);
        assert!((b.cells()[2].radius - (200.0f32).sqrt()).abs() < 0.001);
    }

    #[test]
    fn test_largest_cell_and_total_mass() {
        let b = body(vec![
            cell(0.0, 0.0, 10.0, 0.0),
            cell(100.0, 0.0, 30.0, 0.0),
            cell(200.0, 0.0, 30.0, 0.0),
        ]);
        assert_eq!(b.largest_cell_index(), Some(1));
        assert_eq!(b.largest_cell().map(|c| c.radius), Some(30.0));
        let expected = circle_area(10.0) + 2.0 * circle_area(30.0);
        assert!((b.total_mass() - expected).abs() < 0.01);
    }

    #[test]
    fn test_empty_body_queries() {
        let mut b = body(vec![]);
        assert!(b.is_empty());
        assert!(b.largest_cell().is_none());
        assert_eq!(b.total_mass(), 0.0);
        assert!(!b.split(Vec2::ZERO, 0.0));
        b.update(Vec2::ZERO, 400.0, 16.0, 0.0);
    }

    #[test]
    fn test_grow_cell_clamps_at_zero() {
        let mut b = body(vec![cell(0.0, 0.0, 10.0, 0.0)]);
        b.grow_cell(0, 2.5);
        assert_eq!(b.cells()[0].target_radius, 12.5);
        b.grow_cell(0, -100.0);
        assert_eq!(b.cells()[0].target_radius, 0.0);
        // Out of range is ignored
        b.grow_cell(5, 1.0);
    }
}
