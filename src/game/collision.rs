//! Collision Detection
//!
//! Circle tests and the pairwise scans the match loop runs every frame.
//! Scans never remove anything themselves: they set flags in a `marked`
//! slice parallel to the projectile list and the caller drops all flagged
//! projectiles in one pass afterwards.

use crate::core::vec2::Vec2;
use crate::game::combatant::Combatant;
use crate::game::projectile::Projectile;
use crate::game::state::PlayerId;

/// Check if two circles overlap.
#[inline]
pub fn circles_overlap(pos_a: Vec2, radius_a: f32, pos_b: Vec2, radius_b: f32) -> bool {
    let combined = radius_a + radius_b;
    (pos_a - pos_b).length_squared() < combined * combined
}

/// Splash damage at `distance` from a blast of `radius`.
///
/// Falls off linearly from `max_damage` at the centre but never below 1
/// inside the radius. `None` outside it.
pub fn splash_damage(distance: f32, radius: f32, max_damage: i32) -> Option<i32> {
    if radius <= 0.0 || !distance.is_finite() || distance > radius {
        return None;
    }
    let scaled = (max_damage as f32 * (1.0 - distance / radius)).floor() as i32;
    Some(scaled.max(1))
}

/// A ship caught in a blast.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SplashHit {
    /// Ship hit
    pub target: PlayerId,
    /// Distance from the blast centre
    pub distance: f32,
    /// Damage to apply
    pub damage: i32,
}

/// Ships caught by a blast at `center`. The shooter and destroyed ships
/// are never caught.
pub fn splash_hits(
    center: Vec2,
    owner: PlayerId,
    combatants: &[Combatant; 2],
    radius: f32,
    max_damage: i32,
) -> Vec<SplashHit> {
    combatants
        .iter()
        .filter(|ship| ship.alive && ship.id != owner)
        .filter_map(|ship| {
            let distance = Vec2::distance(center, ship.position);
            splash_damage(distance, radius, max_damage).map(|damage| SplashHit {
                target: ship.id,
                distance,
                damage,
            })
        })
        .collect()
}

/// A projectile striking a ship.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProjectileHit {
    /// Index into the projectile list
    pub projectile: usize,
    /// Ship struck
    pub target: PlayerId,
}

/// Find projectiles striking a live ship other than their owner.
///
/// Projectiles are visited in list order and ships in seat order; each
/// projectile hits at most one ship and is marked. Ships already destroyed
/// this frame (splash) are passed through.
pub fn mark_projectile_hits(
    projectiles: &[Projectile],
    marked: &mut [bool],
    combatants: &[Combatant; 2],
) -> Vec<ProjectileHit> {
    let mut hits = Vec::new();

    for (index, projectile) in projectiles.iter().enumerate() {
        if marked[index] || !projectile.can_collide() {
            continue;
        }

        let struck = combatants
            .iter()
            .find(|ship| ship.alive && ship.id != projectile.owner && projectile.hits(ship));

        if let Some(ship) = struck {
            marked[index] = true;
            hits.push(ProjectileHit {
                projectile: index,
                target: ship.id,
            });
        }
    }

    hits
}

/// Find pairs of projectiles that destroy each other.
///
/// Any two unmarked, collidable projectiles that overlap are both marked,
/// regardless of owner. A projectile takes part in at most one clash.
pub fn mark_projectile_clashes(
    projectiles: &[Projectile],
    marked: &mut [bool],
) -> Vec<(usize, usize)> {
    let mut clashes = Vec::new();

    for i in 0..projectiles.len() {
        if marked[i] || !projectiles[i].can_collide() {
            continue;
        }

        for j in (i + 1)..projectiles.len() {
            if marked[j] || !projectiles[j].can_collide() {
                continue;
            }

            let (a, b) = (&projectiles[i], &projectiles[j]);
            if a.check_collision(b.position, b.radius) {
                marked[i] = true;
                marked[j] = true;
                clashes.push((i, j));
                break;
            }
        }
    }

    clashes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::catalog::ClassCatalog;

    fn ships() -> [Combatant; 2] {
        [
            Combatant::new(PlayerId::One, Vec2::new(100.0, 500.0)),
            Combatant::new(PlayerId::Two, Vec2::new(100.0, 100.0)),
        ]
    }

    fn shot(key: &str, owner: PlayerId, position: Vec2) -> Projectile {
        let archetype = ClassCatalog::builtin().require(key).unwrap();
        Projectile::new(position, Vec2::UP, &archetype, owner)
    }

    #[test]
    fn test_circles_overlap() {
        assert!(circles_overlap(Vec2::ZERO, 0.6, Vec2::new(1.0, 0.0), 0.6));
        assert!(!circles_overlap(Vec2::ZERO, 0.6, Vec2::new(2.0, 0.0), 0.6));
        // Touching is not overlapping
        assert!(!circles_overlap(Vec2::ZERO, 1.0, Vec2::new(2.0, 0.0), 1.0));
    }

    #[test]
    fn test_splash_damage_falloff() {
        assert_eq!(splash_damage(0.0, 50.0, 3), Some(3));
        assert_eq!(splash_damage(10.0, 50.0, 3), Some(2));
        assert_eq!(splash_damage(45.0, 50.0, 3), Some(1));
        assert_eq!(splash_damage(50.0, 50.0, 3), Some(1));
        assert_eq!(splash_damage(50.5, 50.0, 3), None);
        assert_eq!(splash_damage(0.0, 0.0, 3), None);
    }

    #[test]
    fn test_splash_skips_owner_and_wrecks() {
        let mut ships = ships();
        ships[0].position = Vec2::new(100.0, 120.0);

        let hits = splash_hits(Vec2::new(100.0, 110.0), PlayerId::One, &ships, 50.0, 3);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].target, PlayerId::Two);
        assert_eq!(hits[0].damage, 2);

        ships[1].take_damage(100);
        assert!(splash_hits(Vec2::new(100.0, 110.0), PlayerId::One, &ships, 50.0, 3).is_empty());
    }

    #[test]
    fn test_projectile_hits_skip_owner() {
        let ships = ships();
        let projectiles = vec![
            shot("bouncer", PlayerId::Two, Vec2::new(100.0, 100.0)),
            shot("bouncer", PlayerId::One, Vec2::new(100.0, 105.0)),
            shot("bouncer", PlayerId::One, Vec2::new(400.0, 300.0)),
        ];
        let mut marked = vec![false; projectiles.len()];

        let hits = mark_projectile_hits(&projectiles, &mut marked, &ships);
        assert_eq!(hits, vec![ProjectileHit { projectile: 1, target: PlayerId::Two }]);
        assert_eq!(marked, vec![false, true, false]);
    }

    #[test]
    fn test_projectile_hits_skip_destroyed_ship() {
        let mut ships = ships();
        ships[1].take_damage(100);
        let projectiles = vec![shot("bouncer", PlayerId::One, Vec2::new(100.0, 105.0))];
        let mut marked = vec![false; projectiles.len()];

        assert!(mark_projectile_hits(&projectiles, &mut marked, &ships).is_empty());
        assert_eq!(marked, vec![false]);
    }

    #[test]
    fn test_invisible_phase_passes_through() {
        let ships = ships();
        let mut ghost = shot("quantum", PlayerId::One, Vec2::new(100.0, 100.0));
        ghost.visible = false;
        let projectiles = vec![ghost, shot("bouncer", PlayerId::Two, Vec2::new(100.0, 100.0))];
        let mut marked = vec![false; 2];

        assert!(mark_projectile_hits(&projectiles, &mut marked, &ships).is_empty());
        assert!(mark_projectile_clashes(&projectiles, &mut marked).is_empty());
        assert_eq!(marked, vec![false, false]);
    }

    #[test]
    fn test_clashes_pair_once() {
        let projectiles = vec![
            shot("bouncer", PlayerId::One, Vec2::new(300.0, 300.0)),
            shot("bouncer", PlayerId::Two, Vec2::new(303.0, 300.0)),
            shot("bouncer", PlayerId::Two, Vec2::new(306.0, 300.0)),
            shot("bouncer", PlayerId::One, Vec2::new(309.0, 300.0)),
            shot("bouncer", PlayerId::One, Vec2::new(600.0, 300.0)),
        ];
        let mut marked = vec![false; projectiles.len()];

        let clashes = mark_projectile_clashes(&projectiles, &mut marked);
        assert_eq!(clashes, vec![(0, 1), (2, 3)]);
        assert_eq!(marked, vec![true, true, true, true, false]);
    }

    #[test]
    fn test_clash_skips_already_marked() {
        let projectiles = vec![
            shot("bouncer", PlayerId::One, Vec2::new(300.0, 300.0)),
            shot("bouncer", PlayerId::Two, Vec2::new(303.0, 300.0)),
        ];
        let mut marked = vec![true, false];
        assert!(mark_projectile_clashes(&projectiles, &mut marked).is_empty());
    }
}
