//! Combatant
//!
//! A ship on the playfield: thrust and damping, wall bounces, firing on a
//! cooldown, health, ship-vs-ship knockback and the cosmetic death fade.
//!
//! Velocities are in pixels per baseline frame and `dt` is the
//! frame-normalized delta (see `core::frame`). The shot cooldown is kept
//! in seconds.

use std::sync::Arc;

use tracing::warn;

use crate::core::frame::{
    frames_to_secs, DEATH_FADE_SECS, FACING_SPEED_THRESHOLD, SHIP_DAMPING, SHIP_MIN_SPEED,
    SHIP_RESTITUTION, SHOT_MARGIN, WALL_RESTITUTION,
};
use crate::core::vec2::Vec2;
use crate::game::catalog::{ClassArchetype, WeaponType, DEFAULT_SHIP_RADIUS, DEFAULT_SHOT_INTERVAL_SECS};
use crate::game::projectile::Projectile;
use crate::game::state::{PlayerId, Playfield};

/// Top speed before a class is bound (px/frame).
pub const DEFAULT_MAX_SPEED: f32 = 6.0;

/// Thrust before a class is bound (px/frame²).
pub const DEFAULT_THRUST: f32 = 0.4;

/// Health before a class is bound.
pub const DEFAULT_HEALTH: i32 = 10;

/// Ship mass. All classes weigh the same.
pub const SHIP_MASS: f32 = 1.0;

/// A player's ship.
#[derive(Clone, Debug)]
pub struct Combatant {
    /// Seat
    pub id: PlayerId,
    /// Centre in screen space
    pub position: Vec2,
    /// Pixels per baseline frame
    pub velocity: Vec2,
    /// Hull radius (always > 0)
    pub radius: f32,
    /// Speed cap under thrust
    pub max_speed: f32,
    /// Acceleration at full stick
    pub thrust_accel: f32,
    /// Current health, `0..=max_health`
    pub health: i32,
    /// Health at spawn
    pub max_health: i32,
    /// Seconds since the last shot
    pub shoot_timer: f32,
    /// Seconds between shots
    pub shoot_interval: f32,
    /// Unit heading of the last steering input
    pub last_facing: Vec2,
    /// Mass for knockback
    pub mass: f32,
    /// Whether the ship still has health
    pub alive: bool,
    /// Seconds since destruction, `None` while alive
    pub death_timer: Option<f32>,
    /// Alternate paint job when both seats fly the same class
    pub variant: bool,
    archetype: Option<Arc<ClassArchetype>>,
}

impl Combatant {
    /// Create an unbound ship with default stats.
    pub fn new(id: PlayerId, position: Vec2) -> Self {
        Self {
            id,
            position,
            velocity: Vec2::ZERO,
            radius: DEFAULT_SHIP_RADIUS,
            max_speed: DEFAULT_MAX_SPEED,
            thrust_accel: DEFAULT_THRUST,
            health: DEFAULT_HEALTH,
            max_health: DEFAULT_HEALTH,
            shoot_timer: 0.0,
            shoot_interval: DEFAULT_SHOT_INTERVAL_SECS,
            last_facing: id.spawn_facing(),
            mass: SHIP_MASS,
            alive: true,
            death_timer: None,
            variant: false,
            archetype: None,
        }
    }

    /// Class this ship flies, if bound.
    pub fn archetype(&self) -> Option<&Arc<ClassArchetype>> {
        self.archetype.as_ref()
    }

    /// Bind a class. Refills health and flags the paint variant when the
    /// opponent flies the same class from the second seat.
    pub fn set_archetype(
        &mut self,
        archetype: Arc<ClassArchetype>,
        opponent: Option<&ClassArchetype>,
    ) {
        self.radius = if archetype.size > 0.0 {
            archetype.size
        } else {
            warn!(player = %self.id, size = archetype.size, "Non-positive ship size, using default");
            DEFAULT_SHIP_RADIUS
        };
        self.max_health = if archetype.max_health > 0 {
            archetype.max_health
        } else {
            warn!(player = %self.id, health = archetype.max_health, "Non-positive max health, using 1");
            1
        };
        self.health = self.max_health;
        self.max_speed = archetype.max_speed.max(0.0);
        self.thrust_accel = archetype.thrust_accel.max(0.0);
        self.shoot_interval = if archetype.shot_interval_secs.is_finite() && archetype.shot_interval_secs > 0.0 {
            archetype.shot_interval_secs
        } else {
            warn!(player = %self.id, interval = archetype.shot_interval_secs, "Invalid shot interval, using default");
            DEFAULT_SHOT_INTERVAL_SECS
        };
        self.variant = self.id == PlayerId::Two
            && opponent.map_or(false, |other| other.key == archetype.key);
        self.archetype = Some(archetype);
    }

    /// Put the ship back at its spawn with full health and no momentum.
    /// The bound class is kept.
    pub fn reset(&mut self, position: Vec2) {
        self.position = position;
        self.velocity = Vec2::ZERO;
        self.health = self.max_health;
        self.shoot_timer = 0.0;
        self.last_facing = self.id.spawn_facing();
        self.alive = true;
        self.death_timer = None;
    }

    // =========================================================================
    // MOVEMENT
    // =========================================================================

    /// Advance one frame of movement.
    ///
    /// A non-zero `input` thrusts and steers, a zero `input` coasts under
    /// damping. The ship bounces off the playfield edges.
    pub fn update(&mut self, dt: f32, input: Vec2, bounds: &Playfield) {
        if !input.is_zero() {
            self.velocity.add(input * (self.thrust_accel * dt));
            if self.velocity.length() > self.max_speed {
                self.velocity.normalize().multiply(self.max_speed);
            }
            self.last_facing = input.normalized();
        } else {
            self.velocity.multiply(SHIP_DAMPING.powf(dt));
            if self.velocity.length() < SHIP_MIN_SPEED {
                self.velocity = Vec2::ZERO;
            }
        }

        self.position.add(self.velocity * dt);
        self.shoot_timer += frames_to_secs(dt);

        self.bounce_off_walls(bounds);
    }

    fn bounce_off_walls(&mut self, bounds: &Playfield) {
        let r = self.radius;

        if self.position.x - r < 0.0 || self.position.x + r > bounds.width {
            self.velocity.x *= -WALL_RESTITUTION;
            self.position.x = self.position.x.min(bounds.width - r).max(r);
        }
        if self.position.y - r < 0.0 || self.position.y + r > bounds.height {
            self.velocity.y *= -WALL_RESTITUTION;
            self.position.y = self.position.y.min(bounds.height - r).max(r);
        }
    }

    /// Current heading: the velocity when moving, otherwise the last
    /// steering direction.
    pub fn facing(&self) -> Vec2 {
        if self.velocity.length() > FACING_SPEED_THRESHOLD {
            self.velocity.normalized()
        } else {
            self.last_facing
        }
    }

    /// Heading in radians.
    #[inline]
    pub fn facing_angle(&self) -> f32 {
        self.facing().angle()
    }

    // =========================================================================
    // WEAPONS
    // =========================================================================

    /// Whether the cooldown has elapsed.
    #[inline]
    pub fn ready_to_fire(&self) -> bool {
        self.shoot_timer >= self.shoot_interval
    }

    /// Fire the class weapon. Returns no projectiles for an unbound ship.
    ///
    /// Does not touch the cooldown; the caller resets `shoot_timer`.
    pub fn shoot(&mut self) -> Vec<Projectile> {
        let Some(archetype) = self.archetype.clone() else {
            return Vec::new();
        };

        let direction = self.facing();
        if self.velocity.length() > FACING_SPEED_THRESHOLD {
            self.last_facing = direction;
        }

        let offset = self.radius + SHOT_MARGIN;
        let spawn = |from: Vec2, toward: Vec2| from + toward * offset;

        match archetype.weapon_type {
            WeaponType::Side => {
                let flank = direction.perpendicular();
                vec![
                    Projectile::new(spawn(self.position, flank), direction, &archetype, self.id),
                    Projectile::new(spawn(self.position, -flank), direction, &archetype, self.id),
                ]
            }
            WeaponType::Rear => {
                let back = -direction;
                vec![Projectile::new(spawn(self.position, back), back, &archetype, self.id)]
            }
            _ => vec![Projectile::new(
                spawn(self.position, direction),
                direction,
                &archetype,
                self.id,
            )],
        }
    }

    // =========================================================================
    // HEALTH
    // =========================================================================

    /// Apply damage, clamping health at zero. Returns whether the ship is
    /// out of health.
    ///
    /// The first time health reaches zero the ship is marked destroyed and
    /// starts fading out.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        let amount = amount.max(0);
        self.health = (self.health - amount).clamp(0, self.max_health);

        if self.health == 0 && self.alive {
            self.alive = false;
            self.death_timer = Some(0.0);
        }

        self.health == 0
    }

    /// Advance the death fade. No-op while alive.
    pub fn advance_death(&mut self, dt: f32) {
        if let Some(timer) = self.death_timer.as_mut() {
            *timer = (*timer + frames_to_secs(dt)).min(DEATH_FADE_SECS);
        }
    }

    /// Opacity for rendering: 1 while alive, fading to 0 after destruction.
    pub fn fade_alpha(&self) -> f32 {
        match self.death_timer {
            None => 1.0,
            Some(t) => (1.0 - t / DEATH_FADE_SECS).max(0.0),
        }
    }

    /// Whether the death fade is still running.
    pub fn is_dying(&self) -> bool {
        matches!(self.death_timer, Some(t) if t < DEATH_FADE_SECS)
    }

    // =========================================================================
    // COLLISION
    // =========================================================================

    /// Radius projectiles test against.
    pub fn hitbox_radius(&self) -> f32 {
        match &self.archetype {
            Some(archetype) => archetype.hitbox.projectile_radius(self.radius),
            None => self.radius,
        }
    }

    /// Whether the hulls overlap.
    #[inline]
    pub fn check_collision(&self, other: &Combatant) -> bool {
        Vec2::distance(self.position, other.position) < self.radius + other.radius
    }

    /// Separate two overlapping ships and exchange a knockback impulse.
    ///
    /// Does nothing when the ships are already moving apart. Returns
    /// whether a response was applied.
    pub fn resolve_collision(&mut self, other: &mut Combatant) -> bool {
        let delta = other.position - self.position;
        let distance = delta.length();
        let normal = if distance > 0.0 {
            delta * (1.0 / distance)
        } else {
            // Stacked centres: push along the seat axis
            self.id.spawn_facing()
        };

        let closing = (other.velocity - self.velocity).dot(normal);
        if closing >= 0.0 {
            return false;
        }

        let overlap = self.radius + other.radius - distance;
        if overlap > 0.0 {
            let half = overlap / 2.0;
            self.position.subtract(normal * half);
            other.position.add(normal * half);
        }

        let impulse = -(1.0 + SHIP_RESTITUTION) * closing / (1.0 / self.mass + 1.0 / other.mass);
        self.velocity.subtract(normal * (impulse / self.mass));
        other.velocity.add(normal * (impulse / other.mass));

        true
    }
}

// =============================================================================
// TESTS
// =============================================================================
