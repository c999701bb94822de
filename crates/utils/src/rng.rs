use bevy::prelude::Resource;



#[derive(Debug, Resource, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameRng {
    pub seed: u32,
}

impl GameRng {
    // Constants for the LCG algorithm. These are common choices.
    const A: u32 = 1664525;  // Multiplier
    const C: u32 = 1013904223; // Increment
    // Modulus M is implicitly 2^32 because we are using u32 and letting overflow happen.

    /// Creates a new RNG instance with a given seed.
    /// Two instances built from the same seed replay the same spawn layout.
    pub fn new(initial_seed: u32) -> Self {
        GameRng { seed: initial_seed }
    }

    /// Seeds the generator from the thread rng, for sessions that don't need replay.
    pub fn from_entropy() -> Self {
        Self::new(rand::random::<u32>())
    }

    /// Generates the next u32 random number.
    /// This method advances the RNG state.
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: X_n+1 = (a * X_n + c) mod m
        self.seed = self.seed.wrapping_mul(Self::A).wrapping_add(Self::C);
        self.seed
    }

    /// Generates a random f32 value between 0.0 (inclusive) and 1.0 (exclusive).
    pub fn next_f32(&mut self) -> f32 {
        // Only the top 24 bits fit in an f32 mantissa; dividing the full u32
        // can round up to exactly 1.0.
        (self.next_u32() >> 8) as f32 / 16777216.0 // 2^24
    }

    /// Generates a random f32 value between -1.0 (inclusive) and 1.0 (exclusive).
    pub fn next_f32_symmetric(&mut self) -> f32 {
        (self.next_f32() * 2.0) - 1.0
    }

    /// Uniform value in `[min, max)`. Returns `min` when the range is empty.
    pub fn range_f32(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }
        min + self.next_f32() * (max - min)
    }

    /// Uniform angle in radians, `[0, TAU)`.
    pub fn angle(&mut self) -> f32 {
        self.next_f32() * std::f32::consts::TAU
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::new(12345)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_new() {
        let rng = GameRng::new(42);
        assert_eq!(rng.seed, 42, "RNG seed should be initialized correctly.");
    }

    #[test]
    fn test_rng_determinism_u32() {
        let mut rng1 = GameRng::new(12345);
        let mut rng2 = GameRng::new(12345);

        let sequence1: Vec<u32> = (0..100).map(|_| rng1.next_u32()).collect();
        let sequence2: Vec<u32> = (0..100).map(|_| rng2.next_u32()).collect();

        assert_eq!(sequence1, sequence2, "Two RNGs with the same seed should produce the same sequence of u32s.");
        assert_ne!(rng1.seed, 12345, "RNG seed should change after generation.");
    }

    #[test]
    fn test_rng_f32_range() {
        let mut rng = GameRng::new(98765);
        for _ in 0..10_000 {
            let val = rng.next_f32();
            assert!((0.0..1.0).contains(&val), "next_f32() output {} was not in range [0.0, 1.0)", val);
        }
    }

    #[test]
    fn test_rng_f32_symmetric_range() {
        let mut rng = GameRng::new(112233);
        for _ in 0..1000 {
            let val = rng.next_f32_symmetric();
            assert!((-1.0..1.0).contains(&val), "next_f32_symmetric() output {} was not in range [-1.0, 1.0)", val);
        }
    }

    #[test]
    fn test_range_f32_bounds() {
        let mut rng = GameRng::new(7);
        for _ in 0..1000 {
            let val = rng.range_f32(3.0, 8.0);
            assert!((3.0..8.0).contains(&val), "range_f32(3, 8) produced {}", val);
        }
        assert_eq!(rng.range_f32(5.0, 5.0), 5.0);
        assert_eq!(rng.range_f32(5.0, 1.0), 5.0);
    }

    #[test]
    fn test_angle_bounds() {
        let mut rng = GameRng::new(31);
        for _ in 0..1000 {
            let a = rng.angle();
            assert!((0.0..std::f32::consts::TAU).contains(&a));
        }
    }

    #[test]
    fn test_rng_different_seeds_produce_different_sequences() {
        let mut rng1 = GameRng::new(100);
        let mut rng2 = GameRng::new(200);

        let seq1: Vec<u32> = (0..10).map(|_| rng1.next_u32()).collect();
        let seq2: Vec<u32> = (0..10).map(|_| rng2.next_u32()).collect();
        assert_ne!(seq1, seq2, "RNGs with different seeds should produce different sequences.");
    }
}
