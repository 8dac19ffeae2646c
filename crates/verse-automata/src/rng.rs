/// Small deterministic RNG for seeding grids and perturbing rules.
///
/// A 64-bit LCG: not suitable for anything statistical, but every
/// seed reproduces the exact same universe on every platform.
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    /// Creates a generator from a seed.
    pub fn new(seed: u64) -> Self {
        Self {
            state: seed.wrapping_add(1),
        }
    }

    /// Returns the next raw value.
    pub fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.state
    }

    /// Returns a value in `0..bound`. `bound` must be non-zero.
    pub fn next_below(&mut self, bound: u64) -> u64 {
        // High bits of an LCG are far better distributed than the low ones.
        (self.next_u64() >> 32) % bound
    }

    /// Returns a fair coin flip.
    pub fn next_bool(&mut self) -> bool {
        self.next_u64() >> 63 == 1
    }

    /// Returns a value in `[0, 1]`.
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u64() as f64 / u64::MAX as f64) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = SimpleRng::new(7);
        let mut b = SimpleRng::new(7);
        for _ in 0..32 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn test_next_below_bound() {
        let mut rng = SimpleRng::new(99);
        for _ in 0..1000 {
            assert!(rng.next_below(9) < 9);
        }
    }

    #[test]
    fn test_next_f32_range() {
        let mut rng = SimpleRng::new(3);
        for _ in 0..1000 {
            let v = rng.next_f32();
            assert!((0.0..=1.0).contains(&v));
        }
    }
}
