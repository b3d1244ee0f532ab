//! Game Logic Module
//!
//! Everything that happens on the playfield.
//!
//! ## Module Structure
//!
//! - `catalog`: Ship classes and catalog loading
//! - `state`: Seats, playfield and the match state machine
//! - `combatant`: Ship movement, health, firing and knockback
//! - `projectile`: Weapon-specific projectile behavior
//! - `effect`: Blast and wreck rings
//! - `collision`: Circle tests, splash damage, pairwise scans
//! - `input`: Frame input, input sources, recordings
//! - `events`: Events produced by each frame
//! - `snapshot`: Read-only frame view for renderers
//! - `tick`: The match loop

pub mod catalog;
pub mod state;
pub mod combatant;
pub mod projectile;
pub mod effect;
pub mod collision;
pub mod input;
pub mod events;
pub mod snapshot;
pub mod tick;

// Re-export key types
pub use catalog::{CatalogError, ClassArchetype, ClassCatalog, Hitbox, WeaponType};
pub use state::{MatchState, PlayerId, Playfield};
pub use combatant::Combatant;
pub use projectile::{Projectile, ProjectileSignal};
pub use effect::{AreaEffect, EffectKind};
pub use input::{FrameInput, InputRecording, InputSource, StickFrame};
pub use events::{GameEvent, GameEventData, HitKind};
pub use snapshot::FrameSnapshot;
pub use tick::{MatchConfig, MatchLoop, TickResult};
