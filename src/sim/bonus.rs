//! Bonus zone placement

use glam::Vec2;
use rand::Rng;

use super::arena::ArenaBounds;
use crate::consts::BONUS_CLEARANCE;

/// Picks wall-safe positions for the bonus zone in the upper half of the arena
#[derive(Debug, Clone, Copy)]
pub struct BonusRelocator {
    bounds: ArenaBounds,
    half_size: f32,
}

impl BonusRelocator {
    pub fn new(bounds: ArenaBounds, half_size: f32) -> Self {
        Self { bounds, half_size }
    }

    /// Distance kept between the zone center and the arena edges
    pub fn margin(&self) -> f32 {
        self.bounds.wall_thickness + self.half_size + BONUS_CLEARANCE
    }

    /// Allowed range for the zone center's x
    pub fn x_range(&self) -> (f32, f32) {
        let margin = self.margin();
        (margin, self.bounds.width - margin)
    }

    /// Allowed range for the zone center's y (top half only)
    pub fn y_range(&self) -> (f32, f32) {
        let margin = self.margin();
        (margin, self.bounds.height / 2.0 - margin)
    }

    /// Draw a new center uniformly from the allowed rectangle
    pub fn next_position<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        Vec2::new(sample(rng, self.x_range()), sample(rng, self.y_range()))
    }

    pub fn is_valid(&self, pos: Vec2) -> bool {
        let (x_min, x_max) = self.x_range();
        let (y_min, y_max) = self.y_range();
        pos.x >= x_min && pos.x <= x_max && pos.y >= y_min && pos.y <= y_max
    }
}

/// Uniform draw; an arena too small for the margins collapses to the midpoint
fn sample<R: Rng + ?Sized>(rng: &mut R, (lo, hi): (f32, f32)) -> f32 {
    if lo < hi {
        rng.random_range(lo..=hi)
    } else {
        (lo + hi) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn relocator(width: f32, height: f32) -> BonusRelocator {
        BonusRelocator::new(ArenaBounds::new(width, height), 30.0)
    }

    #[test]
    fn test_margins_match_layout() {
        let r = relocator(400.0, 800.0);
        assert_eq!(r.margin(), 70.0);
        assert_eq!(r.x_range(), (70.0, 330.0));
        assert_eq!(r.y_range(), (70.0, 330.0));
    }

    #[test]
    fn test_same_seed_same_position() {
        let r = relocator(400.0, 800.0);
        let a = r.next_position(&mut Pcg32::seed_from_u64(3));
        let b = r.next_position(&mut Pcg32::seed_from_u64(3));
        assert_eq!(a, b);
    }

    #[test]
    fn test_tiny_arena_collapses_to_midpoint() {
        let r = relocator(100.0, 100.0);
        let pos = r.next_position(&mut Pcg32::seed_from_u64(1));
        assert_eq!(pos, Vec2::new(50.0, 25.0));
    }

    proptest! {
        #[test]
        fn prop_positions_respect_margins(
            seed in any::<u64>(),
            width in 200.0f32..2000.0,
            height in 400.0f32..3000.0,
        ) {
            let r = relocator(width, height);
            let mut rng = Pcg32::seed_from_u64(seed);
            for _ in 0..16 {
                let pos = r.next_position(&mut rng);
                prop_assert!(r.is_valid(pos));
                prop_assert!(pos.y <= height / 2.0 - 70.0);
            }
        }
    }
}
