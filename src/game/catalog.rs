//! Class Catalog
//!
//! Immutable table of ship archetypes. The built-in table carries the six
//! duel classes; hosts may load their own table from JSON instead.
//!
//! Loading is strict about structure (a catalog that is not JSON, is empty
//! or repeats a key is rejected) and lenient about per-class tuning: an
//! unknown or missing weapon type falls back to `standard`, a bad hitbox to
//! a circle, non-positive numbers to safe defaults. Those fallbacks are
//! logged and never fail the load.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use serde::{Serialize, Deserialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::frame::{BASELINE_FPS, HITBOX_FORGIVENESS};

/// Ship radius used before a class is bound and for invalid class data.
pub const DEFAULT_SHIP_RADIUS: f32 = 25.0;

/// Shot interval used for invalid class data (seconds).
pub const DEFAULT_SHOT_INTERVAL_SECS: f32 = 1.0;

// =============================================================================
// ERRORS
// =============================================================================

/// Errors raised while loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Catalog file could not be read
    #[error("failed to read catalog {path}: {source}")]
    Io {
        /// Path that was read
        path: String,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Catalog is not valid JSON or misses required fields
    #[error("invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Catalog has no archetypes
    #[error("catalog contains no archetypes")]
    Empty,

    /// Two archetypes share a key
    #[error("duplicate archetype key: {0}")]
    DuplicateKey(String),

    /// Lookup of a key that is not in the catalog
    #[error("unknown archetype: {0}")]
    UnknownArchetype(String),
}

// =============================================================================
// WEAPON TYPE
// =============================================================================

/// Firing pattern and projectile behavior of a class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
#[derive(Default)]
pub enum WeaponType {
    /// Single forward shot
    #[default]
    Standard = 0,
    /// Twin shots from both flanks
    Side = 1,
    /// Single shot out of the stern
    Rear = 2,
    /// Grenade that detonates after its fuse
    Explosive = 3,
    /// Ricochets off the screen edges
    Bounce = 4,
    /// Wraps around the screen edges
    Portal = 5,
    /// Flickers in and out of existence
    Phase = 6,
}

impl WeaponType {
    /// All weapon types.
    pub const ALL: [WeaponType; 7] = [
        WeaponType::Standard,
        WeaponType::Side,
        WeaponType::Rear,
        WeaponType::Explosive,
        WeaponType::Bounce,
        WeaponType::Portal,
        WeaponType::Phase,
    ];

    /// Parse a weapon name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "standard" => Some(WeaponType::Standard),
            "side" => Some(WeaponType::Side),
            "rear" => Some(WeaponType::Rear),
            "explosive" => Some(WeaponType::Explosive),
            "bounce" => Some(WeaponType::Bounce),
            "portal" => Some(WeaponType::Portal),
            "phase" => Some(WeaponType::Phase),
            _ => None,
        }
    }

    /// Parse a possibly missing or unknown weapon name, defaulting to
    /// `Standard`.
    pub fn parse_lenient(name: Option<&str>) -> Self {
        match name {
            Some(raw) => Self::from_name(raw).unwrap_or_else(|| {
                warn!("Unknown weapon type {:?}, falling back to standard", raw);
                WeaponType::Standard
            }),
            None => {
                warn!("Missing weapon type, falling back to standard");
                WeaponType::Standard
            }
        }
    }

    /// Lowercase name as used in catalogs.
    pub fn name(self) -> &'static str {
        match self {
            WeaponType::Standard => "standard",
            WeaponType::Side => "side",
            WeaponType::Rear => "rear",
            WeaponType::Explosive => "explosive",
            WeaponType::Bounce => "bounce",
            WeaponType::Portal => "portal",
            WeaponType::Phase => "phase",
        }
    }
}

// =============================================================================
// HITBOX
// =============================================================================

/// Simplified hull outline of a class.
///
/// Collision uses a circle equivalent of the outline.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Hitbox {
    /// Round hull, radius equals the ship size
    Circle,
    /// Elliptical hull
    Oval {
        /// Width in pixels
        width: f32,
        /// Height in pixels
        height: f32,
    },
    /// Boxy hull
    Rectangle {
        /// Width in pixels
        width: f32,
        /// Height in pixels
        height: f32,
    },
}

impl Hitbox {
    /// Radius a projectile must come within to hit a ship of `size`.
    pub fn projectile_radius(&self, size: f32) -> f32 {
        match *self {
            Hitbox::Circle => size,
            Hitbox::Oval { width, height } | Hitbox::Rectangle { width, height } => {
                width.max(height) / 2.0 * HITBOX_FORGIVENESS
            }
        }
    }

    fn is_valid(&self) -> bool {
        match *self {
            Hitbox::Circle => true,
            Hitbox::Oval { width, height } | Hitbox::Rectangle { width, height } => {
                width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0
            }
        }
    }
}

// =============================================================================
// ARCHETYPE
// =============================================================================

/// A named bundle of ship stats and weapon.
///
/// Shared by reference (`Arc`) between the catalog and the combatants that
/// fly it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClassArchetype {
    /// Catalog key (identity of the class)
    pub key: String,
    /// Display name
    pub name: String,
    /// Hull radius in pixels
    pub size: f32,
    /// Top speed in pixels per frame
    pub max_speed: f32,
    /// Acceleration per frame at full stick
    pub thrust_accel: f32,
    /// Starting and maximum health
    pub max_health: i32,
    /// Projectile speed in pixels per frame
    pub bullet_speed: f32,
    /// Projectile radius in pixels
    pub bullet_size: f32,
    /// Weapon behavior
    pub weapon_type: WeaponType,
    /// Seconds between shots
    pub shot_interval_secs: f32,
    /// Presentation color (CSS hex)
    pub color: String,
    /// Simplified hull outline
    pub hitbox: Hitbox,
}

impl ClassArchetype {
    /// Radius a projectile must come within to hit this class.
    #[inline]
    pub fn projectile_hit_radius(&self) -> f32 {
        self.hitbox.projectile_radius(self.size)
    }

    /// Build from a raw catalog record, defaulting anything unusable.
    fn from_record(record: ArchetypeRecord) -> Self {
        let key = record.key;

        let weapon_type = WeaponType::parse_lenient(record.weapon_type.as_deref());

        let size = if record.size.is_finite() && record.size > 0.0 {
            record.size
        } else {
            warn!(archetype = %key, size = record.size, "Invalid ship size, using default");
            DEFAULT_SHIP_RADIUS
        };

        let max_health = if record.max_health > 0 {
            record.max_health
        } else {
            warn!(archetype = %key, health = record.max_health, "Invalid max health, using 1");
            1
        };

        let interval = record
            .shot_interval_secs
            .or_else(|| record.shot_interval_frames.map(|frames| frames / BASELINE_FPS));
        let shot_interval_secs = match interval {
            Some(secs) if secs.is_finite() && secs > 0.0 => secs,
            _ => {
                warn!(archetype = %key, "Missing or invalid shot interval, using default");
                DEFAULT_SHOT_INTERVAL_SECS
            }
        };

        let hitbox = match record.hitbox {
            None => Hitbox::Circle,
            Some(raw) => match serde_json::from_value::<Hitbox>(raw) {
                Ok(hitbox) if hitbox.is_valid() => hitbox,
                _ => {
                    warn!(archetype = %key, "Unusable hitbox, using circle");
                    Hitbox::Circle
                }
            },
        };

        let non_negative = |v: f32| if v.is_finite() { v.max(0.0) } else { 0.0 };
        let bullet_size = if record.bullet_size.is_finite() && record.bullet_size > 0.0 {
            record.bullet_size
        } else {
            1.0
        };

        Self {
            name: record.name.unwrap_or_else(|| key.clone()),
            key,
            size,
            max_speed: non_negative(record.max_speed),
            thrust_accel: non_negative(record.thrust_accel),
            max_health,
            bullet_speed: non_negative(record.bullet_speed),
            bullet_size,
            weapon_type,
            shot_interval_secs,
            color: record.color.unwrap_or_else(|| "#FFFFFF".to_string()),
            hitbox,
        }
    }
}

/// Catalog entry as written in JSON.
#[derive(Deserialize)]
struct ArchetypeRecord {
    key: String,
    #[serde(default)]
    name: Option<String>,
    size: f32,
    max_speed: f32,
    thrust_accel: f32,
    max_health: i32,
    bullet_speed: f32,
    bullet_size: f32,
    #[serde(default)]
    weapon_type: Option<String>,
    #[serde(default)]
    shot_interval_secs: Option<f32>,
    #[serde(default)]
    shot_interval_frames: Option<f32>,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    hitbox: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct CatalogFile {
    archetypes: Vec<ArchetypeRecord>,
}

// =============================================================================
// CATALOG
// =============================================================================

/// Immutable set of archetypes, in declaration order.
#[derive(Clone, Debug)]
pub struct ClassCatalog {
    archetypes: Vec<Arc<ClassArchetype>>,
}

impl Default for ClassCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ClassCatalog {
    /// The six built-in duel classes.
    pub fn builtin() -> Self {
        let secs = |frames: f32| frames / BASELINE_FPS;
        let archetypes = vec![
            ClassArchetype {
                key: "demolition".to_string(),
                name: "Demolition Expert".to_string(),
                size: 25.0,
                max_speed: 2.5,
                thrust_accel: 0.1,
                max_health: 12,
                bullet_speed: 4.0,
                bullet_size: 8.0,
                weapon_type: WeaponType::Explosive,
                shot_interval_secs: secs(45.0),
                color: "#FF8C00".to_string(),
                hitbox: Hitbox::Rectangle { width: 35.0, height: 40.0 },
            },
            ClassArchetype {
                key: "bouncer".to_string(),
                name: "Bouncer".to_string(),
                size: 20.0,
                max_speed: 3.5,
                thrust_accel: 0.125,
                max_health: 8,
                bullet_speed: 8.0,
                bullet_size: 4.0,
                weapon_type: WeaponType::Bounce,
                shot_interval_secs: secs(25.0),
                color: "#32CD32".to_string(),
                hitbox: Hitbox::Oval { width: 28.0, height: 35.0 },
            },
            ClassArchetype {
                key: "portal".to_string(),
                name: "Portal Walker".to_string(),
                size: 25.0,
                max_speed: 2.5,
                thrust_accel: 0.1,
                max_health: 10,
                bullet_speed: 6.0,
                bullet_size: 5.0,
                weapon_type: WeaponType::Portal,
                shot_interval_secs: secs(35.0),
                color: "#8A2BE2".to_string(),
                hitbox: Hitbox::Rectangle { width: 45.0, height: 40.0 },
            },
            ClassArchetype {
                key: "sidewinder".to_string(),
                name: "Sidewinder".to_string(),
                size: 30.0,
                max_speed: 1.5,
                thrust_accel: 0.075,
                max_health: 14,
                bullet_speed: 5.0,
                bullet_size: 6.0,
                weapon_type: WeaponType::Side,
                shot_interval_secs: secs(40.0),
                color: "#8B0000".to_string(),
                hitbox: Hitbox::Rectangle { width: 50.0, height: 35.0 },
            },
            ClassArchetype {
                key: "retreat".to_string(),
                name: "Retreat Specialist".to_string(),
                size: 18.0,
                max_speed: 4.0,
                thrust_accel: 0.15,
                max_health: 6,
                bullet_speed: 7.0,
                bullet_size: 4.0,
                weapon_type: WeaponType::Rear,
                shot_interval_secs: secs(20.0),
                color: "#4169E1".to_string(),
                hitbox: Hitbox::Oval { width: 24.0, height: 32.0 },
            },
            ClassArchetype {
                key: "quantum".to_string(),
                name: "Quantum Assassin".to_string(),
                size: 23.0,
                max_speed: 3.0,
                thrust_accel: 0.11,
                max_health: 7,
                bullet_speed: 7.0,
                bullet_size: 5.0,
                weapon_type: WeaponType::Phase,
                shot_interval_secs: secs(30.0),
                color: "#4B0082".to_string(),
                hitbox: Hitbox::Rectangle { width: 32.0, height: 40.0 },
            },
        ];

        Self {
            archetypes: archetypes.into_iter().map(Arc::new).collect(),
        }
    }

    /// Build a catalog from already validated archetypes.
    pub fn from_archetypes(archetypes: Vec<ClassArchetype>) -> Result<Self, CatalogError> {
        if archetypes.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = BTreeSet::new();
        for archetype in &archetypes {
            if !seen.insert(archetype.key.clone()) {
                return Err(CatalogError::DuplicateKey(archetype.key.clone()));
            }
        }

        Ok(Self {
            archetypes: archetypes.into_iter().map(Arc::new).collect(),
        })
    }

    /// Parse a catalog from JSON text.
    ///
    /// ```json
    /// { "archetypes": [ { "key": "scout", "size": 20, "max_speed": 3,
    ///   "thrust_accel": 0.1, "max_health": 8, "bullet_speed": 6,
    ///   "bullet_size": 4, "weapon_type": "standard",
    ///   "shot_interval_secs": 0.5 } ] }
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        let archetypes: Vec<ClassArchetype> = file
            .archetypes
            .into_iter()
            .map(ClassArchetype::from_record)
            .collect();

        let catalog = Self::from_archetypes(archetypes)?;
        debug!("Loaded catalog with {} archetypes", catalog.len());
        Ok(catalog)
    }

    /// Read and parse a catalog file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Look up an archetype by key.
    pub fn get(&self, key: &str) -> Option<Arc<ClassArchetype>> {
        self.archetypes.iter().find(|a| a.key == key).cloned()
    }

    /// Look up an archetype by key, failing with `UnknownArchetype`.
    pub fn require(&self, key: &str) -> Result<Arc<ClassArchetype>, CatalogError> {
        self.get(key)
            .ok_or_else(|| CatalogError::UnknownArchetype(key.to_string()))
    }

    /// All archetypes in declaration order.
    pub fn archetypes(&self) -> &[Arc<ClassArchetype>] {
        &self.archetypes
    }

    /// All keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.archetypes.iter().map(|a| a.key.as_str())
    }

    /// Number of archetypes.
    pub fn len(&self) -> usize {
        self.archetypes.len()
    }

    /// Whether the catalog is empty (never true for a loaded catalog).
    pub fn is_empty(&self) -> bool {
        self.archetypes.is_empty()
    }

    /// Classes bound before anyone has picked: demolition for Player 1 and
    /// bouncer for Player 2 when present, otherwise the first entries.
    pub fn default_pair(&self) -> Option<(Arc<ClassArchetype>, Arc<ClassArchetype>)> {
        let first = self.get("demolition").or_else(|| self.archetypes.first().cloned())?;
        let second = self
            .get("bouncer")
            .or_else(|| self.archetypes.get(1).cloned())
            .unwrap_or_else(|| first.clone());
        Some((first, second))
    }
}

// =============================================================================
// TESTS
// =============================================================================
