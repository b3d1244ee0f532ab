//! Frame-Normalized Time
//!
//! The simulation measures elapsed time in "frames relative to a 60fps
//! baseline": a `delta_time` of `1.0` is one 60fps frame, `2.0` is a frame
//! that took twice as long. Velocities and accelerations are tuned per
//! baseline frame, timers are kept in seconds.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  delta_time (frames)  ──/60──▶  seconds (timers, lifetimes)  │
//! │  velocity (px/frame)  ──*dt──▶  displacement (px)            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! A host running at a different native rate scales `delta_time`,
//! never the constants below.

/// Baseline frame rate all tuning constants are expressed against.
pub const BASELINE_FPS: f32 = 60.0;

/// Milliseconds per baseline frame, as measured by the browser scheduler
/// the tuning was done against.
pub const BASELINE_FRAME_MS: f32 = 16.67;

/// Upper bound accepted for a single frame's `delta_time`.
///
/// A stalled host (debugger, backgrounded tab) would otherwise integrate a
/// multi-second step and tunnel ships through walls.
pub const MAX_DELTA_FRAMES: f32 = 10.0;

// =============================================================================
// GAME CONSTANTS
// =============================================================================

/// Ship velocity damping per baseline frame when no input is held.
pub const SHIP_DAMPING: f32 = 0.92;

/// Ship speed (px/frame) below which an idle ship snaps to rest.
pub const SHIP_MIN_SPEED: f32 = 0.05;

/// Velocity kept (and inverted) when a ship hits a screen edge.
pub const WALL_RESTITUTION: f32 = 0.8;

/// Ship-vs-ship restitution. Deliberately far above 1.0: the duel is
/// tuned around energetic knockback, not physical bounces.
pub const SHIP_RESTITUTION: f32 = 4.8;

/// Speed (px/frame) above which the velocity defines the ship's facing.
pub const FACING_SPEED_THRESHOLD: f32 = 0.1;

/// Gap between a ship's hull and a freshly spawned projectile.
pub const SHOT_MARGIN: f32 = 5.0;

/// Seconds a destroyed ship takes to fade out.
pub const DEATH_FADE_SECS: f32 = 0.5;

/// Projectile lifetime in seconds (explosive rounds use `EXPLOSIVE_FUSE_SECS`).
pub const PROJECTILE_LIFETIME_SECS: f32 = 0.8;

/// Fuse of an explosive round in seconds.
pub const EXPLOSIVE_FUSE_SECS: f32 = 1.0;

/// Wall contacts a bouncing round survives.
pub const MAX_BOUNCES: u32 = 3;

/// Visibility flips per second of a phase round (two full on/off cycles).
pub const PHASE_FLIPS_PER_SEC: f32 = 4.0;

/// Seconds an area effect takes to expand and fade.
pub const AREA_EFFECT_SECS: f32 = 0.5;

/// Scale applied to a non-circular hitbox's half extent when projectiles
/// test against it.
pub const HITBOX_FORGIVENESS: f32 = 0.8;

/// Convert a frame-normalized delta into seconds.
#[inline]
pub fn frames_to_secs(delta_time: f32) -> f32 {
    delta_time / BASELINE_FPS
}

/// Convert elapsed wall-clock milliseconds into a frame-normalized delta.
#[inline]
pub fn delta_from_millis(elapsed_ms: f32) -> f32 {
    elapsed_ms / BASELINE_FRAME_MS
}

/// Sanitize a host-provided delta: non-finite or negative becomes 0,
/// oversized steps are capped at `MAX_DELTA_FRAMES`.
#[inline]
pub fn clamp_delta(delta_time: f32) -> f32 {
    if !delta_time.is_finite() || delta_time <= 0.0 {
        return 0.0;
    }
    delta_time.min(MAX_DELTA_FRAMES)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_second_of_frames() {
        let mut elapsed = 0.0;
        for _ in 0..60 {
            elapsed += frames_to_secs(1.0);
        }
        assert!((elapsed - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_delta_from_millis() {
        assert!((delta_from_millis(16.67) - 1.0).abs() < 1e-6);
        assert!((delta_from_millis(33.34) - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_clamp_delta() {
        assert_eq!(clamp_delta(1.0), 1.0);
        assert_eq!(clamp_delta(-3.0), 0.0);
        assert_eq!(clamp_delta(f32::NAN), 0.0);
        assert_eq!(clamp_delta(f32::INFINITY), 0.0);
        assert_eq!(clamp_delta(500.0), MAX_DELTA_FRAMES);
    }
}
