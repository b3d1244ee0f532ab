//! Deterministic Random Number Generator
//!
//! Uses Xorshift128+ for fast, seedable randomness.
//! The simulation itself never draws random numbers; the RNG feeds the
//! drivers around it (random class picks, scripted stick input), so a seed
//! fully reproduces a demo match.

use serde::{Serialize, Deserialize};

use super::vec2::Vec2;

/// Deterministic PRNG using Xorshift128+ algorithm.
///
/// # Example
///
/// ```
/// use ship_duel::core::rng::DeterministicRng;
///
/// let mut rng = DeterministicRng::new(42);
/// let value = rng.next_u64();
/// assert_eq!(value, 16629283624882167704); // Always the same!
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeterministicRng {
    state: [u64; 2],
}

impl Default for DeterministicRng {
    fn default() -> Self {
        Self::new(0)
    }
}

impl DeterministicRng {
    /// Create a new RNG from a 64-bit seed.
    ///
    /// Uses SplitMix64 to initialize the internal state, ensuring
    /// good distribution even from weak seeds.
    pub fn new(seed: u64) -> Self {
        let mut s = seed;
        let state0 = splitmix64(&mut s);
        let state1 = splitmix64(&mut s);

        // Ensure state is never all zeros
        let state = if state0 == 0 && state1 == 0 {
            [1, 1]
        } else {
            [state0, state1]
        };

        Self { state }
    }

    /// Generate the next 64-bit random value.
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        let s0 = self.state[0];
        let mut s1 = self.state[1];
        let result = s0.wrapping_add(s1);

        s1 ^= s0;
        self.state[0] = s0.rotate_left(24) ^ s1 ^ (s1 << 16);
        self.state[1] = s1.rotate_left(37);

        result
    }

    /// Generate a random integer in range [0, max).
    #[inline]
    pub fn next_int(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        // Simple modulo - slight bias for very large max, but acceptable
        (self.next_u64() % max as u64) as u32
    }

    /// Generate a float in range [0, 1).
    #[inline]
    pub fn next_f32(&mut self) -> f32 {
        // 24 mantissa bits
        (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32
    }

    /// Generate a float in range [min, max).
    #[inline]
    pub fn next_f32_range(&mut self, min: f32, max: f32) -> f32 {
        if min >= max {
            return min;
        }
        min + self.next_f32() * (max - min)
    }

    /// Generate a random unit direction.
    pub fn random_direction(&mut self) -> Vec2 {
        let angle = self.next_f32_range(0.0, std::f32::consts::TAU);
        Vec2::from_angle(angle)
    }

    /// Select a random element from a slice.
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        if slice.is_empty() {
            None
        } else {
            let idx = self.next_int(slice.len() as u32) as usize;
            slice.get(idx)
        }
    }
}

/// SplitMix64 for seed initialization.
/// Produces well-distributed values from sequential seeds.
#[inline]
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_determinism() {
        let mut rng1 = DeterministicRng::new(12345);
        let mut rng2 = DeterministicRng::new(12345);

        for _ in 0..1000 {
            assert_eq!(rng1.next_u64(), rng2.next_u64());
        }
    }

    #[test]
    fn test_rng_known_values() {
        // Demo matches are reproduced from their seed; these must never change.
        let mut rng = DeterministicRng::new(42);
        assert_eq!(rng.next_u64(), 16629283624882167704);
        assert_eq!(rng.next_u64(), 1420492921613871959);
        assert_eq!(rng.next_u64(), 9768315062676884790);
    }

    #[test]
    fn test_next_f32_range() {
        let mut rng = DeterministicRng::new(9999);

        for _ in 0..1000 {
            let unit = rng.next_f32();
            assert!((0.0..1.0).contains(&unit));

            let val = rng.next_f32_range(-1.0, 1.0);
            assert!((-1.0..1.0).contains(&val));
        }

        // Edge case: empty range
        assert_eq!(rng.next_f32_range(5.0, 5.0), 5.0);
    }

    #[test]
    fn test_random_direction_is_unit() {
        let mut rng = DeterministicRng::new(7777);
        for _ in 0..100 {
            let dir = rng.random_direction();
            assert!((dir.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_choose() {
        let mut rng = DeterministicRng::new(1111);
        let empty: [u8; 0] = [];
        assert!(rng.choose(&empty).is_none());

        let items = ["a", "b", "c"];
        for _ in 0..100 {
            assert!(items.contains(rng.choose(&items).unwrap_or(&"missing")));
        }
    }
}
