//! Input Capture and Normalization
//!
//! The simulation consumes one normalized steering vector per seat per
//! frame, bundled with the frame's delta and playfield in a `FrameInput`.
//! Hosts provide vectors through the `InputSource` seam.
//!
//! For replays and determinism checks sticks are quantized to `i8` axes
//! (`StickFrame`) and recorded delta-compressed: a seat's stick is only
//! stored on frames where it changed.

use serde::{Serialize, Deserialize};
use tracing::warn;

use crate::core::frame::clamp_delta;
use crate::core::vec2::Vec2;
use crate::game::state::{PlayerId, Playfield};

// =============================================================================
// FRAME INPUT
// =============================================================================

/// Anything that can produce a steering vector for a seat.
pub trait InputSource {
    /// Steering vector for `player` this frame. Magnitude should be at
    /// most 1; zero means no input.
    fn input_vector(&mut self, player: PlayerId) -> Vec2;
}

/// Fixed vectors, indexed by seat.
impl InputSource for [Vec2; 2] {
    fn input_vector(&mut self, player: PlayerId) -> Vec2 {
        self[player.index()]
    }
}

/// Everything the match loop needs for one frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameInput {
    /// Elapsed time in 60fps-normalized frames
    pub delta_time: f32,
    /// Current playfield
    pub bounds: Playfield,
    /// Steering vectors, indexed by seat
    pub moves: [Vec2; 2],
}

impl FrameInput {
    /// Bundle a frame's input.
    pub fn new(delta_time: f32, bounds: Playfield, moves: [Vec2; 2]) -> Self {
        Self { delta_time, bounds, moves }
    }

    /// A frame with both sticks released.
    pub fn idle(delta_time: f32, bounds: Playfield) -> Self {
        Self::new(delta_time, bounds, [Vec2::ZERO; 2])
    }

    /// Sample both seats from an input source.
    pub fn from_source<S: InputSource + ?Sized>(
        delta_time: f32,
        bounds: Playfield,
        source: &mut S,
    ) -> Self {
        let moves = [
            source.input_vector(PlayerId::One),
            source.input_vector(PlayerId::Two),
        ];
        Self::new(delta_time, bounds, moves)
    }

    /// Delta clamped to the accepted range.
    #[inline]
    pub fn clamped_delta(&self) -> f32 {
        clamp_delta(self.delta_time)
    }

    /// Sanitized steering vector of a seat.
    #[inline]
    pub fn move_for(&self, player: PlayerId) -> Vec2 {
        sanitize_move(player, self.moves[player.index()])
    }

    /// Copy with the delta clamped and both vectors sanitized.
    pub fn sanitized(&self) -> Self {
        Self::new(
            self.clamped_delta(),
            self.bounds,
            [self.move_for(PlayerId::One), self.move_for(PlayerId::Two)],
        )
    }
}

/// Make a host-provided steering vector safe to integrate.
///
/// Non-finite vectors become zero, vectors longer than 1 are scaled back
/// to unit length.
pub fn sanitize_move(player: PlayerId, input: Vec2) -> Vec2 {
    if !input.is_finite() {
        warn!(%player, "Non-finite input vector, treating as released");
        return Vec2::ZERO;
    }

    let length = input.length();
    if length > 1.0 {
        warn!(%player, length, "Input vector longer than 1, clamping");
        return input.normalized();
    }

    input
}

// =============================================================================
// STICK FRAMES
// =============================================================================

/// Quantized stick state for one seat.
///
/// Axes run from -127 to +127; -128 on both axes means the stick is
/// released.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StickFrame {
    /// Horizontal axis (+ is right)
    pub move_x: i8,
    /// Vertical axis (+ is down the screen)
    pub move_y: i8,
}

impl Default for StickFrame {
    fn default() -> Self {
        Self::RELEASED
    }
}

impl StickFrame {
    /// Axis value reserved for "no input"
    pub const NO_INPUT: i8 = -128;

    /// Stick let go
    pub const RELEASED: Self = Self {
        move_x: Self::NO_INPUT,
        move_y: Self::NO_INPUT,
    };

    /// Create a stick frame from raw axes.
    pub const fn new(move_x: i8, move_y: i8) -> Self {
        Self { move_x, move_y }
    }

    /// Quantize a steering vector. A zero vector is a released stick.
    pub fn from_vector(vector: Vec2) -> Self {
        let vector = if vector.is_finite() { vector } else { Vec2::ZERO };
        if vector.is_zero() {
            return Self::RELEASED;
        }
        let axis = |v: f32| (v.clamp(-1.0, 1.0) * 127.0).round() as i8;
        Self::new(axis(vector.x), axis(vector.y))
    }

    /// Whether the stick is released.
    #[inline]
    pub fn is_released(&self) -> bool {
        self.move_x == Self::NO_INPUT && self.move_y == Self::NO_INPUT
    }

    /// Steering vector, at most unit length.
    pub fn to_vector(&self) -> Vec2 {
        let axis = |v: i8| if v == Self::NO_INPUT { 0.0 } else { v as f32 / 127.0 };
        let vector = Vec2::new(axis(self.move_x), axis(self.move_y));
        if vector.length() > 1.0 {
            vector.normalized()
        } else {
            vector
        }
    }
}

/// Stick change for one seat, effective from `frame` on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputDelta {
    /// Frame index the change takes effect
    pub frame: u32,
    /// New stick state
    pub stick: StickFrame,
}

// =============================================================================
// INPUT RECORDING
// =============================================================================

/// Complete input of a match: per-frame deltas plus delta-compressed
/// sticks for both seats.
///
/// Used for replays and same-machine determinism checks.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InputRecording {
    /// Playfield the match was played on
    pub bounds: Playfield,
    frame_times: Vec<f32>,
    deltas: [Vec<InputDelta>; 2],
}

impl InputRecording {
    /// Start an empty recording.
    pub fn new(bounds: Playfield) -> Self {
        Self {
            bounds,
            frame_times: Vec::with_capacity(1024),
            deltas: [Vec::new(), Vec::new()],
        }
    }

    /// Record the next frame and return the input to simulate it with.
    pub fn record(&mut self, delta_time: f32, sticks: [StickFrame; 2]) -> FrameInput {
        let frame = self.frame_times.len() as u32;
        self.frame_times.push(delta_time);

        for player in PlayerId::ALL {
            let stick = sticks[player.index()];
            if stick != self.last_stick(player) {
                self.deltas[player.index()].push(InputDelta { frame, stick });
            }
        }

        FrameInput::new(
            delta_time,
            self.bounds,
            [sticks[0].to_vector(), sticks[1].to_vector()],
        )
    }

    /// Most recently stored stick of a seat.
    fn last_stick(&self, player: PlayerId) -> StickFrame {
        self.deltas[player.index()]
            .last()
            .map_or(StickFrame::RELEASED, |delta| delta.stick)
    }

    /// Number of recorded frames.
    pub fn len(&self) -> usize {
        self.frame_times.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.frame_times.is_empty()
    }

    /// Stored stick changes of a seat.
    pub fn deltas(&self, player: PlayerId) -> &[InputDelta] {
        &self.deltas[player.index()]
    }

    /// Stick of a seat at a frame.
    pub fn stick_at(&self, player: PlayerId, frame: u32) -> StickFrame {
        let deltas = &self.deltas[player.index()];
        let idx = deltas.partition_point(|d| d.frame <= frame);
        if idx == 0 {
            StickFrame::RELEASED
        } else {
            deltas[idx - 1].stick
        }
    }

    /// Rebuild the input of a recorded frame.
    pub fn frame_input(&self, frame: u32) -> Option<FrameInput> {
        let delta_time = *self.frame_times.get(frame as usize)?;
        Some(FrameInput::new(
            delta_time,
            self.bounds,
            [
                self.stick_at(PlayerId::One, frame).to_vector(),
                self.stick_at(PlayerId::Two, frame).to_vector(),
            ],
        ))
    }

    /// Iterate the recorded frames in order.
    pub fn replay_iter(&self) -> ReplayIterator<'_> {
        ReplayIterator {
            recording: self,
            frame: 0,
            cursors: [0, 0],
            current: [StickFrame::RELEASED; 2],
        }
    }

    /// Playback cursor usable as an `InputSource`.
    pub fn playback(&self) -> Playback<'_> {
        Playback { recording: self, frame: 0 }
    }
}

/// Iterator yielding each recorded frame's input.
pub struct ReplayIterator<'a> {
    recording: &'a InputRecording,
    frame: usize,
    cursors: [usize; 2],
    current: [StickFrame; 2],
}

impl<'a> Iterator for ReplayIterator<'a> {
    type Item = FrameInput;

    fn next(&mut self) -> Option<Self::Item> {
        let delta_time = *self.recording.frame_times.get(self.frame)?;

        for player in PlayerId::ALL {
            let i = player.index();
            let deltas = &self.recording.deltas[i];
            while let Some(delta) = deltas.get(self.cursors[i]) {
                if delta.frame as usize > self.frame {
                    break;
                }
                self.current[i] = delta.stick;
                self.cursors[i] += 1;
            }
        }

        self.frame += 1;
        Some(FrameInput::new(
            delta_time,
            self.recording.bounds,
            [self.current[0].to_vector(), self.current[1].to_vector()],
        ))
    }
}

/// Recorded sticks served one frame at a time through `InputSource`.
///
/// Call `advance` once both seats have been sampled.
pub struct Playback<'a> {
    recording: &'a InputRecording,
    frame: u32,
}

impl Playback<'_> {
    /// Move to the next frame.
    pub fn advance(&mut self) {
        self.frame += 1;
    }

    /// Current frame index.
    pub fn frame(&self) -> u32 {
        self.frame
    }
}

impl InputSource for Playback<'_> {
    fn input_vector(&mut self, player: PlayerId) -> Vec2 {
        self.recording.stick_at(player, self.frame).to_vector()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_sanitize_move() {
        assert_eq!(sanitize_move(PlayerId::One, Vec2::new(f32::NAN, 0.5)), Vec2::ZERO);
        assert_eq!(sanitize_move(PlayerId::One, Vec2::new(f32::INFINITY, 0.0)), Vec2::ZERO);
        assert_eq!(sanitize_move(PlayerId::Two, Vec2::new(3.0, 4.0)), Vec2::new(0.6, 0.8));
        assert_eq!(sanitize_move(PlayerId::Two, Vec2::new(0.3, -0.4)), Vec2::new(0.3, -0.4));
    }

    #[test]
    fn test_frame_input_from_source() {
        let mut fixed = [Vec2::new(1.0, 0.0), Vec2::new(0.0, -1.0)];
        let input = FrameInput::from_source(1.0, Playfield::default(), &mut fixed);
        assert_eq!(input.moves, fixed);
        assert_eq!(input.move_for(PlayerId::Two), Vec2::new(0.0, -1.0));
    }

    #[test]
    fn test_clamped_delta() {
        let input = FrameInput::idle(f32::NAN, Playfield::default());
        assert_eq!(input.clamped_delta(), 0.0);
        assert_eq!(FrameInput::idle(2.0, Playfield::default()).clamped_delta(), 2.0);

        let raw = FrameInput::new(-1.0, Playfield::default(), [Vec2::new(0.0, 2.0), Vec2::new(f32::NAN, 0.0)]);
        let clean = raw.sanitized();
        assert_eq!(clean.delta_time, 0.0);
        assert_eq!(clean.moves, [Vec2::DOWN, Vec2::ZERO]);
    }

    #[test]
    fn test_stick_quantization() {
        assert_eq!(StickFrame::from_vector(Vec2::ZERO), StickFrame::RELEASED);
        assert_eq!(StickFrame::RELEASED.to_vector(), Vec2::ZERO);

        let right = StickFrame::from_vector(Vec2::new(1.0, 0.0));
        assert_eq!(right, StickFrame::new(127, 0));
        assert_eq!(right.to_vector(), Vec2::new(1.0, 0.0));

        let left = StickFrame::new(-127, 0);
        assert_eq!(left.to_vector(), Vec2::new(-1.0, 0.0));

        // Full diagonal is clamped to the unit circle
        let corner = StickFrame::new(127, 127).to_vector();
        assert!((corner.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_recording_delta_compression() {
        let mut recording = InputRecording::new(Playfield::default());
        let held = [StickFrame::new(100, 50), StickFrame::RELEASED];

        for _ in 0..4 {
            recording.record(1.0, held);
        }
        assert_eq!(recording.len(), 4);
        assert_eq!(recording.deltas(PlayerId::One).len(), 1);
        assert!(recording.deltas(PlayerId::Two).is_empty());

        recording.record(1.0, [StickFrame::new(-100, -50), StickFrame::new(0, 127)]);
        assert_eq!(recording.deltas(PlayerId::One).len(), 2);
        assert_eq!(recording.deltas(PlayerId::Two).len(), 1);
    }

    #[test]
    fn test_stick_at() {
        let mut recording = InputRecording::new(Playfield::default());
        let a = StickFrame::new(50, 0);
        let b = StickFrame::new(-50, 0);

        for frame in 0..30 {
            let stick = match frame {
                0..=9 => StickFrame::RELEASED,
                10..=19 => a,
                _ => b,
            };
            recording.record(1.0, [stick, StickFrame::RELEASED]);
        }

        assert!(recording.stick_at(PlayerId::One, 5).is_released());
        assert_eq!(recording.stick_at(PlayerId::One, 10), a);
        assert_eq!(recording.stick_at(PlayerId::One, 15), a);
        assert_eq!(recording.stick_at(PlayerId::One, 20), b);
        assert_eq!(recording.stick_at(PlayerId::One, 100), b);
        assert!(recording.frame_input(30).is_none());
    }

    #[test]
    fn test_replay_matches_live_input() {
        let mut recording = InputRecording::new(Playfield::new(400.0, 300.0));
        let script = [
            [StickFrame::new(10, 0), StickFrame::RELEASED],
            [StickFrame::new(10, 0), StickFrame::new(0, -127)],
            [StickFrame::RELEASED, StickFrame::new(0, -127)],
            [StickFrame::new(20, 5), StickFrame::new(90, 90)],
        ];
        let deltas = [1.0, 1.5, 0.5, 1.0];

        let live: Vec<FrameInput> = script
            .iter()
            .zip(deltas)
            .map(|(sticks, dt)| recording.record(dt, *sticks))
            .collect();

        let replayed: Vec<FrameInput> = recording.replay_iter().collect();
        assert_eq!(live, replayed);

        let indexed: Vec<FrameInput> = (0..4).filter_map(|f| recording.frame_input(f)).collect();
        assert_eq!(live, indexed);

        let mut playback = recording.playback();
        for expected in &live {
            let sampled = FrameInput::from_source(expected.delta_time, recording.bounds, &mut playback);
            assert_eq!(sampled.moves, expected.moves);
            playback.advance();
        }
        assert_eq!(playback.frame(), 4);
    }

    #[test]
    fn test_recording_resumes_after_bincode() {
        let mut recording = InputRecording::new(Playfield::default());
        let mut live = vec![recording.record(1.0, [StickFrame::new(100, 0), StickFrame::RELEASED])];

        let bytes = bincode::serialize(&recording).unwrap();
        let mut resumed: InputRecording = bincode::deserialize(&bytes).unwrap();
        live.push(resumed.record(1.0, [StickFrame::RELEASED, StickFrame::RELEASED]));

        assert_eq!(resumed.deltas(PlayerId::One).len(), 2);
        let replayed: Vec<FrameInput> = resumed.replay_iter().collect();
        assert_eq!(live, replayed);
        assert_eq!(replayed[1].moves[0], Vec2::ZERO);
    }

    proptest! {
        #[test]
        fn prop_sanitized_move_is_bounded(x in proptest::num::f32::ANY, y in proptest::num::f32::ANY) {
            let v = sanitize_move(PlayerId::One, Vec2::new(x, y));
            prop_assert!(v.is_finite());
            prop_assert!(v.length() <= 1.0 + 1e-5);
        }

        #[test]
        fn prop_stick_vector_is_bounded(x in any::<i8>(), y in any::<i8>()) {
            let v = StickFrame::new(x, y).to_vector();
            prop_assert!(v.is_finite());
            prop_assert!(v.length() <= 1.0 + 1e-5);
        }
    }
}
