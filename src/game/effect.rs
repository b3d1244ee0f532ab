//! Area Effects
//!
//! Expanding rings left behind by detonations and destroyed ships. They
//! carry no damage of their own; splash damage is applied once by the
//! match loop when the blast is spawned.

use serde::{Serialize, Deserialize};

use crate::core::frame::{frames_to_secs, AREA_EFFECT_SECS};
use crate::core::vec2::Vec2;

/// What spawned the effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    /// Detonation of an explosive round
    Blast,
    /// Destroyed ship
    Wreck,
}

/// A transient expanding ring.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AreaEffect {
    /// Centre
    pub position: Vec2,
    /// Radius at the end of the lifetime
    pub max_radius: f32,
    /// Radius this frame
    pub current_radius: f32,
    /// Seconds since spawn
    pub age: f32,
    /// Seconds until expiry
    pub lifetime: f32,
    /// Origin of the effect
    pub kind: EffectKind,
}

impl AreaEffect {
    /// Spawn an effect with the standard lifetime.
    pub fn new(position: Vec2, max_radius: f32, kind: EffectKind) -> Self {
        Self {
            position,
            max_radius: max_radius.max(0.0),
            current_radius: 0.0,
            age: 0.0,
            lifetime: AREA_EFFECT_SECS,
            kind,
        }
    }

    /// Advance one frame. Returns whether the effect has expired.
    pub fn update(&mut self, dt: f32) -> bool {
        self.age += frames_to_secs(dt);
        let progress = (self.age / self.lifetime).min(1.0);
        self.current_radius = self.max_radius * progress;
        self.age >= self.lifetime
    }

    /// Completion in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        (self.age / self.lifetime).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grows_linearly_then_expires() {
        let mut effect = AreaEffect::new(Vec2::new(10.0, 10.0), 50.0, EffectKind::Blast);
        assert_eq!(effect.current_radius, 0.0);

        for _ in 0..15 {
            assert!(!effect.update(1.0));
        }
        assert!((effect.current_radius - 25.0).abs() < 1e-3);
        assert!((effect.progress() - 0.5).abs() < 1e-3);

        let mut expired = false;
        for _ in 0..16 {
            expired = effect.update(1.0);
            if expired {
                break;
            }
        }
        assert!(expired);
        assert!(effect.current_radius <= 50.0);
        assert!((effect.current_radius - 50.0).abs() < 1e-3);
    }

    #[test]
    fn test_large_step_clamps_radius() {
        let mut effect = AreaEffect::new(Vec2::ZERO, 80.0, EffectKind::Wreck);
        assert!(effect.update(60.0));
        assert_eq!(effect.current_radius, 80.0);
    }
}
