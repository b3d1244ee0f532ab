//! Core primitives.
//!
//! Vector math, frame-normalized time, state hashing and the seeded RNG.
//! Nothing in here knows about ships or projectiles.

pub mod frame;
pub mod vec2;
pub mod rng;
pub mod hash;

// Re-export core types
pub use frame::{BASELINE_FPS, frames_to_secs};
pub use vec2::Vec2;
pub use rng::DeterministicRng;
pub use hash::{StateHash, StateHasher, compute_state_hash};
