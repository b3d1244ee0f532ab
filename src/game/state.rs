//! Game State Definitions
//!
//! Identifiers, playfield bounds and the match state machine.

use std::fmt;
use serde::{Serialize, Deserialize};

use crate::core::vec2::Vec2;

// =============================================================================
// PLAYER ID
// =============================================================================

/// Seat of a combatant. Player 1 spawns at the bottom of the screen,
/// Player 2 at the top.
///
/// Implements Ord so combatants are always processed One, then Two.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PlayerId {
    /// Bottom seat
    One = 1,
    /// Top seat
    Two = 2,
}

impl PlayerId {
    /// Both seats in processing order.
    pub const ALL: [PlayerId; 2] = [PlayerId::One, PlayerId::Two];

    /// Index into per-player arrays (0 or 1).
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            PlayerId::One => 0,
            PlayerId::Two => 1,
        }
    }

    /// The other seat.
    #[inline]
    pub const fn opponent(self) -> PlayerId {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }

    /// Numeric id (1 or 2).
    #[inline]
    pub const fn number(self) -> u8 {
        self as u8
    }

    /// Facing a ship has at spawn: Player 1 looks up the screen,
    /// Player 2 looks down.
    #[inline]
    pub const fn spawn_facing(self) -> Vec2 {
        match self {
            PlayerId::One => Vec2::UP,
            PlayerId::Two => Vec2::DOWN,
        }
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player {}", self.number())
    }
}

// =============================================================================
// PLAYFIELD
// =============================================================================

/// Screen rectangle the match is played in, origin at the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    /// Width in pixels
    pub width: f32,
    /// Height in pixels
    pub height: f32,
}

impl Default for Playfield {
    fn default() -> Self {
        Self { width: 800.0, height: 600.0 }
    }
}

impl Playfield {
    /// Create a playfield. Non-finite or negative extents collapse to zero.
    pub fn new(width: f32, height: f32) -> Self {
        let sanitize = |v: f32| if v.is_finite() { v.max(0.0) } else { 0.0 };
        Self {
            width: sanitize(width),
            height: sanitize(height),
        }
    }

    /// Whether a point lies inside the rectangle (edges inclusive).
    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= 0.0 && point.x <= self.width && point.y >= 0.0 && point.y <= self.height
    }

    /// Spawn point of a seat: horizontally centred, `margin` pixels from
    /// the seat's edge.
    pub fn spawn_point(&self, id: PlayerId, margin: f32) -> Vec2 {
        match id {
            PlayerId::One => Vec2::new(self.width / 2.0, self.height - margin),
            PlayerId::Two => Vec2::new(self.width / 2.0, margin),
        }
    }
}

// =============================================================================
// MATCH STATE
// =============================================================================

/// State of a match. `InProgress` moves one way into a terminal state;
/// only a new match returns to `InProgress`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Default)]
pub enum MatchState {
    /// Ships are flying and shooting
    #[default]
    InProgress,
    /// Player 2 was destroyed
    Player1Won,
    /// Player 1 was destroyed
    Player2Won,
    /// Both ships were destroyed on the same frame
    Draw,
}

impl MatchState {
    /// Whether the match is over.
    #[inline]
    pub fn is_terminal(self) -> bool {
        !matches!(self, MatchState::InProgress)
    }

    /// Winner of a finished match, if there is one.
    pub fn winner(self) -> Option<PlayerId> {
        match self {
            MatchState::Player1Won => Some(PlayerId::One),
            MatchState::Player2Won => Some(PlayerId::Two),
            MatchState::InProgress | MatchState::Draw => None,
        }
    }

    /// Terminal state for a frame given which ships are out of health.
    /// Returns `None` while both are still flying.
    pub fn from_eliminations(player1_down: bool, player2_down: bool) -> Option<MatchState> {
        match (player1_down, player2_down) {
            (true, true) => Some(MatchState::Draw),
            (true, false) => Some(MatchState::Player2Won),
            (false, true) => Some(MatchState::Player1Won),
            (false, false) => None,
        }
    }

    /// Stable tag for hashing.
    pub(crate) fn tag(self) -> u8 {
        match self {
            MatchState::InProgress => 0,
            MatchState::Player1Won => 1,
            MatchState::Player2Won => 2,
            MatchState::Draw => 3,
        }
    }
}

impl fmt::Display for MatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchState::InProgress => write!(f, "in progress"),
            MatchState::Player1Won => write!(f, "Player 1 wins"),
            MatchState::Player2Won => write!(f, "Player 2 wins"),
            MatchState::Draw => write!(f, "draw"),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_ordering() {
        assert!(PlayerId::One < PlayerId::Two);
        assert_eq!(PlayerId::ALL, [PlayerId::One, PlayerId::Two]);
        assert_eq!(PlayerId::One.opponent(), PlayerId::Two);
        assert_eq!(PlayerId::Two.opponent(), PlayerId::One);
        assert_eq!(PlayerId::Two.index(), 1);
        assert_eq!(PlayerId::Two.number(), 2);
    }

    #[test]
    fn test_spawn_points() {
        let field = Playfield::new(400.0, 300.0);
        assert_eq!(field.spawn_point(PlayerId::One, 50.0), Vec2::new(200.0, 250.0));
        assert_eq!(field.spawn_point(PlayerId::Two, 50.0), Vec2::new(200.0, 50.0));
        assert_eq!(PlayerId::One.spawn_facing(), Vec2::UP);
    }

    #[test]
    fn test_playfield_sanitizes() {
        let field = Playfield::new(f32::NAN, -10.0);
        assert_eq!(field.width, 0.0);
        assert_eq!(field.height, 0.0);
    }

    #[test]
    fn test_contains_edges() {
        let field = Playfield::new(100.0, 100.0);
        assert!(field.contains(Vec2::new(0.0, 100.0)));
        assert!(!field.contains(Vec2::new(-0.1, 50.0)));
        assert!(!field.contains(Vec2::new(50.0, 100.1)));
    }

    #[test]
    fn test_terminal_transitions() {
        assert_eq!(MatchState::from_eliminations(false, false), None);
        assert_eq!(MatchState::from_eliminations(true, true), Some(MatchState::Draw));
        assert_eq!(MatchState::from_eliminations(true, false), Some(MatchState::Player2Won));
        assert_eq!(MatchState::from_eliminations(false, true), Some(MatchState::Player1Won));

        assert!(!MatchState::InProgress.is_terminal());
        assert!(MatchState::Draw.is_terminal());
        assert_eq!(MatchState::Draw.winner(), None);
        assert_eq!(MatchState::Player2Won.winner(), Some(PlayerId::Two));
    }
}
