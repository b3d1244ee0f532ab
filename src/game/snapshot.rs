//! Frame Snapshots
//!
//! Read-only view of a frame for renderers and tooling. Snapshots own their
//! data, so a host can hold one across frames or ship it elsewhere as JSON
//! or as a compact bincode frame.

use serde::{Serialize, Deserialize};

use crate::core::vec2::Vec2;
use crate::game::catalog::WeaponType;
use crate::game::combatant::Combatant;
use crate::game::effect::{AreaEffect, EffectKind};
use crate::game::projectile::Projectile;
use crate::game::state::{MatchState, PlayerId, Playfield};

/// A ship as the renderer sees it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CombatantView {
    /// Seat
    pub id: PlayerId,
    /// Class key, if bound
    pub class_key: Option<String>,
    /// Centre
    pub position: Vec2,
    /// Velocity (px/frame)
    pub velocity: Vec2,
    /// Hull radius
    pub radius: f32,
    /// Current health
    pub health: i32,
    /// Maximum health
    pub max_health: i32,
    /// Still has health
    pub alive: bool,
    /// Death fade running
    pub dying: bool,
    /// Heading in radians
    pub facing_angle: f32,
    /// Opacity
    pub fade_alpha: f32,
    /// Alternate paint job
    pub variant: bool,
}

impl From<&Combatant> for CombatantView {
    fn from(ship: &Combatant) -> Self {
        Self {
            id: ship.id,
            class_key: ship.archetype().map(|a| a.key.clone()),
            position: ship.position,
            velocity: ship.velocity,
            radius: ship.radius,
            health: ship.health,
            max_health: ship.max_health,
            alive: ship.alive,
            dying: ship.is_dying(),
            facing_angle: ship.facing_angle(),
            fade_alpha: ship.fade_alpha(),
            variant: ship.variant,
        }
    }
}

/// A projectile as the renderer sees it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectileView {
    /// Centre
    pub position: Vec2,
    /// Radius
    pub radius: f32,
    /// Shooter
    pub owner: PlayerId,
    /// Weapon behavior
    pub weapon: WeaponType,
    /// Seconds in flight
    pub age: f32,
    /// Seconds before expiry
    pub lifetime: f32,
    /// Whether to draw it
    pub visible: bool,
}

impl From<&Projectile> for ProjectileView {
    fn from(p: &Projectile) -> Self {
        Self {
            position: p.position,
            radius: p.radius,
            owner: p.owner,
            weapon: p.weapon,
            age: p.age,
            lifetime: p.lifetime,
            visible: p.visible,
        }
    }
}

/// An area effect as the renderer sees it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EffectView {
    /// Centre
    pub position: Vec2,
    /// Radius this frame
    pub current_radius: f32,
    /// Seconds since spawn
    pub age: f32,
    /// Seconds until expiry
    pub lifetime: f32,
    /// Origin
    pub kind: EffectKind,
}

impl From<&AreaEffect> for EffectView {
    fn from(e: &AreaEffect) -> Self {
        Self {
            position: e.position,
            current_radius: e.current_radius,
            age: e.age,
            lifetime: e.lifetime,
            kind: e.kind,
        }
    }
}

/// Everything needed to draw one frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    /// Frame counter
    pub tick: u32,
    /// Match state
    pub state: MatchState,
    /// Playfield
    pub bounds: Playfield,
    /// Both ships in seat order
    pub combatants: [CombatantView; 2],
    /// Projectiles in flight
    pub projectiles: Vec<ProjectileView>,
    /// Active area effects
    pub effects: Vec<EffectView>,
}

impl FrameSnapshot {
    /// Encode as JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Encode as a compact binary frame.
    pub fn to_bytes(&self) -> bincode::Result<Vec<u8>> {
        bincode::serialize(self)
    }

    /// Decode a binary frame.
    pub fn from_bytes(bytes: &[u8]) -> bincode::Result<Self> {
        bincode::deserialize(bytes)
    }

    /// View of a seat's ship.
    pub fn combatant(&self, player: PlayerId) -> &CombatantView {
        &self.combatants[player.index()]
    }
}
