//! Projectiles
//!
//! Every round flies in a straight line; the weapon type decides what
//! happens at the edges of the playfield and when the round runs out of
//! time.
//!
//! ```text
//! ┌────────────┬────────────────────────────────────────────────┐
//! │ explosive  │ detonates in place after its 1.0s fuse         │
//! │ bounce     │ reflects off edges, gone after 3 wall contacts │
//! │ portal     │ wraps to the opposite edge, expires on age     │
//! │ phase      │ blinks 4x/s, cannot collide while invisible    │
//! │ others     │ expire after 0.8s or on leaving the playfield  │
//! └────────────┴────────────────────────────────────────────────┘
//! ```

use serde::{Serialize, Deserialize};

use crate::core::frame::{
    frames_to_secs, EXPLOSIVE_FUSE_SECS, MAX_BOUNCES, PHASE_FLIPS_PER_SEC,
    PROJECTILE_LIFETIME_SECS,
};
use crate::core::vec2::Vec2;
use crate::game::catalog::{ClassArchetype, WeaponType};
use crate::game::combatant::Combatant;
use crate::game::state::{PlayerId, Playfield};

/// Outcome of a projectile's frame update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProjectileSignal {
    /// Spawn a blast at the projectile's position
    pub explode: bool,
    /// Drop the projectile
    pub remove: bool,
}

impl ProjectileSignal {
    const KEEP: Self = Self { explode: false, remove: false };
    const REMOVE: Self = Self { explode: false, remove: true };
    const DETONATE: Self = Self { explode: true, remove: true };
}

/// A round in flight.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    /// Centre in screen space
    pub position: Vec2,
    /// Pixels per baseline frame
    pub velocity: Vec2,
    /// Collision radius
    pub radius: f32,
    /// Seat that fired it
    pub owner: PlayerId,
    /// Weapon behavior
    pub weapon: WeaponType,
    /// Seconds in flight
    pub age: f32,
    /// Seconds before expiry
    pub lifetime: f32,
    /// Wall contacts so far (bounce rounds)
    pub bounces: u32,
    /// Wall contacts survived (bounce rounds)
    pub max_bounces: u32,
    /// Whether it can currently be seen and collide (phase rounds)
    pub visible: bool,
    /// Seconds on the blink clock (phase rounds)
    pub phase_timer: f32,
}

impl Projectile {
    /// Fire a round of `archetype`'s weapon from `position` along
    /// `direction`.
    pub fn new(
        position: Vec2,
        direction: Vec2,
        archetype: &ClassArchetype,
        owner: PlayerId,
    ) -> Self {
        let weapon = archetype.weapon_type;
        let lifetime = match weapon {
            WeaponType::Explosive => EXPLOSIVE_FUSE_SECS,
            _ => PROJECTILE_LIFETIME_SECS,
        };

        Self {
            position,
            velocity: direction.normalized() * archetype.bullet_speed,
            radius: archetype.bullet_size,
            owner,
            weapon,
            age: 0.0,
            lifetime,
            bounces: 0,
            max_bounces: MAX_BOUNCES,
            visible: true,
            phase_timer: 0.0,
        }
    }

    /// Advance one frame inside the current playfield.
    pub fn update(&mut self, dt: f32, bounds: &Playfield) -> ProjectileSignal {
        self.age += frames_to_secs(dt);

        match self.weapon {
            WeaponType::Explosive => {
                if self.age >= self.lifetime {
                    return ProjectileSignal::DETONATE;
                }
            }
            WeaponType::Bounce => {
                self.position.add(self.velocity * dt);
                self.reflect_off_walls(bounds);
                return if self.bounces >= self.max_bounces || self.expired() {
                    ProjectileSignal::REMOVE
                } else {
                    ProjectileSignal::KEEP
                };
            }
            WeaponType::Phase => {
                self.phase_timer += frames_to_secs(dt);
                self.visible = (self.phase_timer * PHASE_FLIPS_PER_SEC).floor() as i64 % 2 == 0;
            }
            WeaponType::Portal => {
                self.position.add(self.velocity * dt);
                self.wrap_around(bounds);
                return if self.expired() {
                    ProjectileSignal::REMOVE
                } else {
                    ProjectileSignal::KEEP
                };
            }
            WeaponType::Standard | WeaponType::Side | WeaponType::Rear => {}
        }

        self.position.add(self.velocity * dt);

        if self.expired() || !bounds.contains(self.position) {
            ProjectileSignal::REMOVE
        } else {
            ProjectileSignal::KEEP
        }
    }

    #[inline]
    fn expired(&self) -> bool {
        self.age >= self.lifetime
    }

    /// Reflect each axis that has crossed a wall while heading into it,
    /// pulling the round back inside.
    fn reflect_off_walls(&mut self, bounds: &Playfield) {
        let r = self.radius;
        let Playfield { width, height } = *bounds;

        if self.position.x - r < 0.0 && self.velocity.x < 0.0 {
            self.velocity.x = -self.velocity.x;
            self.position.x = r.min(width - r);
            self.bounces += 1;
        } else if self.position.x + r > width && self.velocity.x > 0.0 {
            self.velocity.x = -self.velocity.x;
            self.position.x = (width - r).max(r);
            self.bounces += 1;
        }

        if self.position.y - r < 0.0 && self.velocity.y < 0.0 {
            self.velocity.y = -self.velocity.y;
            self.position.y = r.min(height - r);
            self.bounces += 1;
        } else if self.position.y + r > height && self.velocity.y > 0.0 {
            self.velocity.y = -self.velocity.y;
            self.position.y = (height - r).max(r);
            self.bounces += 1;
        }
    }

    fn wrap_around(&mut self, bounds: &Playfield) {
        let Playfield { width, height } = *bounds;

        if self.position.x > width {
            self.position.x = 0.0;
        } else if self.position.x < 0.0 {
            self.position.x = width;
        }
        if self.position.y > height {
            self.position.y = 0.0;
        } else if self.position.y < 0.0 {
            self.position.y = height;
        }
    }

    /// Whether the round can currently hit anything.
    #[inline]
    pub fn can_collide(&self) -> bool {
        self.weapon != WeaponType::Phase || self.visible
    }

    /// Whether the round overlaps a circle.
    #[inline]
    pub fn check_collision(&self, position: Vec2, radius: f32) -> bool {
        Vec2::distance(self.position, position) < self.radius + radius
    }

    /// Whether the round overlaps a ship's hitbox.
    #[inline]
    pub fn hits(&self, combatant: &Combatant) -> bool {
        self.check_collision(combatant.position, combatant.hitbox_radius())
    }
}
