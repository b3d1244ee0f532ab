//! Game Events
//!
//! Events generated during a frame, for hosts (sound, screen shake, UI)
//! and for replay comparison.

use serde::{Serialize, Deserialize};

use crate::core::vec2::Vec2;
use crate::game::catalog::WeaponType;
use crate::game::state::{MatchState, PlayerId};

/// Priority for event processing order.
///
/// Lower value = processed first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum EventPriority {
    /// Match outcome first
    MatchOutcome = 0,
    /// Then ship destruction
    Destruction = 1,
    /// Then damage
    Damage = 2,
    /// Then detonations and clashes
    Impact = 3,
    /// Then shots fired
    Fire = 4,
    /// Lowest priority
    Other = 255,
}

/// How a ship was damaged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitKind {
    /// Struck by a projectile
    Direct,
    /// Caught in a blast
    Splash,
}

/// Game event data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameEventData {
    /// A ship fired its weapon
    ProjectileFired {
        /// Shooter
        player_id: PlayerId,
        /// Weapon fired
        weapon: WeaponType,
        /// Rounds spawned
        count: u8,
    },

    /// A ship lost health
    CombatantHit {
        /// Ship hit
        player_id: PlayerId,
        /// Owner of the projectile or blast
        attacker_id: PlayerId,
        /// Direct or splash
        kind: HitKind,
        /// Damage dealt
        damage: i32,
        /// Health left
        remaining_health: i32,
    },

    /// An explosive round detonated
    Explosion {
        /// Owner of the round
        owner_id: PlayerId,
        /// Blast centre
        position: Vec2,
    },

    /// Two projectiles destroyed each other
    ProjectilesClashed {
        /// Position of the first round
        position: Vec2,
    },

    /// A ship ran out of health
    CombatantDestroyed {
        /// Ship destroyed
        player_id: PlayerId,
        /// Wreck position
        position: Vec2,
    },

    /// Match reached a terminal state
    MatchEnded {
        /// Final state
        outcome: MatchState,
        /// Frames played
        duration_ticks: u32,
    },

    /// Results delay elapsed; the host may show class selection
    ResultsReady {
        /// Final state
        outcome: MatchState,
    },
}

/// A game event with timing and priority.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameEvent {
    /// Frame when event occurred
    pub tick: u32,

    /// Processing priority
    pub priority: EventPriority,

    /// Player involved (for tie-breaking)
    pub player_id: Option<PlayerId>,

    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(tick: u32, priority: EventPriority, data: GameEventData) -> Self {
        let player_id = match &data {
            GameEventData::ProjectileFired { player_id, .. } => Some(*player_id),
            GameEventData::CombatantHit { player_id, .. } => Some(*player_id),
            GameEventData::Explosion { owner_id, .. } => Some(*owner_id),
            GameEventData::CombatantDestroyed { player_id, .. } => Some(*player_id),
            GameEventData::MatchEnded { outcome, .. } => outcome.winner(),
            GameEventData::ResultsReady { outcome } => outcome.winner(),
            GameEventData::ProjectilesClashed { .. } => None,
        };

        Self {
            tick,
            priority,
            player_id,
            data,
        }
    }

    /// Create projectile fired event.
    pub fn projectile_fired(tick: u32, player_id: PlayerId, weapon: WeaponType, count: u8) -> Self {
        Self::new(
            tick,
            EventPriority::Fire,
            GameEventData::ProjectileFired { player_id, weapon, count },
        )
    }

    /// Create combatant hit event.
    pub fn combatant_hit(
        tick: u32,
        player_id: PlayerId,
        attacker_id: PlayerId,
        kind: HitKind,
        damage: i32,
        remaining_health: i32,
    ) -> Self {
        Self::new(
            tick,
            EventPriority::Damage,
            GameEventData::CombatantHit {
                player_id,
                attacker_id,
                kind,
                damage,
                remaining_health,
            },
        )
    }

    /// Create explosion event.
    pub fn explosion(tick: u32, owner_id: PlayerId, position: Vec2) -> Self {
        Self::new(
            tick,
            EventPriority::Impact,
            GameEventData::Explosion { owner_id, position },
        )
    }

    /// Create projectiles clashed event.
    pub fn projectiles_clashed(tick: u32, position: Vec2) -> Self {
        Self::new(
            tick,
            EventPriority::Impact,
            GameEventData::ProjectilesClashed { position },
        )
    }

    /// Create combatant destroyed event.
    pub fn combatant_destroyed(tick: u32, player_id: PlayerId, position: Vec2) -> Self {
        Self::new(
            tick,
            EventPriority::Destruction,
            GameEventData::CombatantDestroyed { player_id, position },
        )
    }

    /// Create match ended event.
    pub fn match_ended(tick: u32, outcome: MatchState) -> Self {
        Self::new(
            tick,
            EventPriority::MatchOutcome,
            GameEventData::MatchEnded {
                outcome,
                duration_ticks: tick,
            },
        )
    }

    /// Create results ready event.
    pub fn results_ready(tick: u32, outcome: MatchState) -> Self {
        Self::new(
            tick,
            EventPriority::Other,
            GameEventData::ResultsReady { outcome },
        )
    }
}

impl PartialEq for GameEvent {
    fn eq(&self, other: &Self) -> bool {
        self.tick == other.tick
            && self.priority == other.priority
            && self.player_id == other.player_id
    }
}

impl Eq for GameEvent {}

impl PartialOrd for GameEvent {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GameEvent {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Sort by: tick, then priority, then player_id
        self.tick
            .cmp(&other.tick)
            .then(self.priority.cmp(&other.priority))
            .then(self.player_id.cmp(&other.player_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_ordering() {
        let fired = GameEvent::projectile_fired(10, PlayerId::One, WeaponType::Bounce, 1);
        let hit = GameEvent::combatant_hit(10, PlayerId::Two, PlayerId::One, HitKind::Direct, 1, 4);
        let destroyed_one = GameEvent::combatant_destroyed(10, PlayerId::One, Vec2::ZERO);
        let destroyed_two = GameEvent::combatant_destroyed(10, PlayerId::Two, Vec2::ZERO);
        let ended = GameEvent::match_ended(10, MatchState::Draw);

        // Same tick: outcome < destruction < damage < fire
        assert!(ended < destroyed_one);
        assert!(destroyed_one < hit);
        assert!(hit < fired);

        // Same tick and priority: seat order
        assert!(destroyed_one < destroyed_two);

        // Earlier tick always first
        let later = GameEvent::match_ended(11, MatchState::Draw);
        assert!(fired < later);
    }

    #[test]
    fn test_player_attribution() {
        let won = GameEvent::match_ended(5, MatchState::Player2Won);
        assert_eq!(won.player_id, Some(PlayerId::Two));

        let draw = GameEvent::results_ready(5, MatchState::Draw);
        assert_eq!(draw.player_id, None);

        let clash = GameEvent::projectiles_clashed(5, Vec2::ZERO);
        assert_eq!(clash.player_id, None);

        let hit = GameEvent::combatant_hit(5, PlayerId::One, PlayerId::Two, HitKind::Splash, 2, 8);
        assert_eq!(hit.player_id, Some(PlayerId::One));
    }

    #[test]
    fn test_sorting_is_stable_by_key() {
        let mut events = vec![
            GameEvent::projectile_fired(3, PlayerId::Two, WeaponType::Side, 2),
            GameEvent::explosion(3, PlayerId::One, Vec2::new(1.0, 1.0)),
            GameEvent::combatant_destroyed(2, PlayerId::Two, Vec2::ZERO),
        ];
        events.sort();

        assert!(matches!(events[0].data, GameEventData::CombatantDestroyed { .. }));
        assert!(matches!(events[1].data, GameEventData::Explosion { .. }));
        assert!(matches!(events[2].data, GameEventData::ProjectileFired { .. }));
    }
}
