//! # Ship Duel
//!
//! Simulation core for a two-player arcade ship duel: two ships share one
//! screen, fire class-specific weapons and ram each other until one or
//! both are destroyed.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        SHIP DUEL                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Primitives                                │
//! │  ├── frame.rs    - 60fps-normalized time and tuning          │
//! │  ├── vec2.rs     - 2D vector                                 │
//! │  ├── rng.rs      - Seeded Xorshift128+ PRNG                  │
//! │  └── hash.rs     - State hashing for verification            │
//! │                                                              │
//! │  game/           - Game logic                                │
//! │  ├── catalog.rs  - Ship classes                              │
//! │  ├── combatant.rs- Ships                                     │
//! │  ├── projectile.rs - Weapon behaviors                        │
//! │  ├── effect.rs   - Blast and wreck rings                     │
//! │  ├── collision.rs- Collision detection                       │
//! │  ├── input.rs    - Frame input and recordings                │
//! │  ├── snapshot.rs - Renderer-facing frame view                │
//! │  └── tick.rs     - Match loop                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Frame Flow
//!
//! The host calls `MatchLoop::tick` once per rendered frame with both
//! steering vectors and the elapsed time, then draws from
//! `MatchLoop::snapshot`. The core does no I/O and never draws random
//! numbers, so identical inputs give identical state on the same machine.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;

// Re-export commonly used types
pub use core::vec2::Vec2;
pub use core::rng::DeterministicRng;
pub use game::catalog::{ClassArchetype, ClassCatalog, WeaponType};
pub use game::input::{FrameInput, InputRecording, InputSource, StickFrame};
pub use game::state::{MatchState, PlayerId, Playfield};
pub use game::tick::{MatchConfig, MatchLoop, TickResult};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Baseline simulation rate (Hz)
pub const TICK_RATE: u32 = 60;
