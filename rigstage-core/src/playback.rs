/// Transport state: current frame, keyframes and the playback timer
///
/// The controller is the only owner of the playhead. Hosts feed it elapsed
/// wall-clock time through [`PlaybackController::advance`]; the periodic tick
/// is an owned fixed-interval accumulator, so there is never more than one
/// timer per controller and none at all while stopped.
use log::{debug, info, trace};
use std::time::Duration;

use crate::config::EditorConfig;
use crate::error::{Result, RigError};
use crate::rig::Joint;
use crate::timeline::{clamp_frame, Frame, Keyframe, TOTAL_FRAMES};

/// Transport rate in frames per second
pub const DEFAULT_RATE: u32 = 24;

/// Transport state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
}

/// Something picked in the UI: a model from the library or a bone of the rig
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Model(String),
    Bone(Joint),
}

impl Selection {
    /// Whether the properties panel should offer bone editing for this selection
    pub fn shows_bone_editing(&self) -> bool {
        matches!(self, Selection::Bone(_))
    }
}

/// Periodic tick, armed while playing
#[derive(Debug, Clone, Copy)]
struct TickTimer {
    interval: Duration,
    pending: Duration,
}

impl TickTimer {
    fn new(interval: Duration) -> Self {
        Self {
            interval,
            pending: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlaybackController {
    total_frames: u32,
    rate: u32,
    current_frame: Frame,
    keyframes: Vec<Keyframe>,
    state: PlaybackState,
    timer: Option<TickTimer>,
}

impl PlaybackController {
    /// A stopped controller at frame 0 with the default 120 frames at 24 fps
    pub fn new() -> Self {
        Self {
            total_frames: TOTAL_FRAMES,
            rate: DEFAULT_RATE,
            current_frame: 0,
            keyframes: Vec::new(),
            state: PlaybackState::Stopped,
            timer: None,
        }
    }

    pub fn with_timing(total_frames: u32, rate: u32) -> Result<Self> {
        if total_frames == 0 || rate == 0 {
            return Err(RigError::InvalidTiming { total_frames, rate });
        }

        Ok(Self {
            total_frames,
            rate,
            ..Self::new()
        })
    }

    pub fn from_config(config: &EditorConfig) -> Result<Self> {
        Self::with_timing(config.total_frames, config.rate)
    }

    pub fn total_frames(&self) -> u32 {
        self.total_frames
    }

    pub fn rate(&self) -> u32 {
        self.rate
    }

    pub fn current_frame(&self) -> Frame {
        self.current_frame
    }

    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Time between two playback ticks
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(1) / self.rate
    }

    pub fn play(&mut self) {
        if self.is_playing() {
            return;
        }

        debug!("play from frame {} at {} fps", self.current_frame, self.rate);
        self.state = PlaybackState::Playing;
        self.timer = Some(TickTimer::new(self.tick_interval()));
    }

    pub fn pause(&mut self) {
        if !self.is_playing() {
            return;
        }

        debug!("pause at frame {}", self.current_frame);
        self.state = PlaybackState::Stopped;
        self.timer = None;
    }

    pub fn toggle(&mut self) {
        if self.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Advance one frame. Reaching the end of the timeline rewinds to frame 0
    /// and stops playback.
    pub fn tick(&mut self) {
        let next = self.current_frame + 1;
        if next >= self.total_frames {
            debug!("reached end of timeline, rewinding");
            self.current_frame = 0;
            self.pause();
        } else {
            trace!("tick {}", next);
            self.current_frame = next;
        }
    }

    /// Feed elapsed host time to the playback timer and return the number of
    /// ticks that fired. Does nothing while stopped.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        match self.timer.as_mut() {
            Some(timer) => timer.pending = timer.pending.saturating_add(elapsed),
            None => return 0,
        }

        let mut fired = 0;
        loop {
            match self.timer.as_mut() {
                Some(timer) if timer.pending >= timer.interval => {
                    timer.pending -= timer.interval;
                }
                _ => break,
            }

            self.tick();
            fired += 1;
        }

        fired
    }

    /// Move the playhead, clamping into the timeline. Playback state is
    /// unchanged, but a pending tick is restarted so it cannot immediately
    /// overwrite the new position.
    pub fn seek(&mut self, frame: i64) {
        self.current_frame = clamp_frame(frame, self.total_frames);
        trace!("seek to {}", self.current_frame);

        if let Some(timer) = self.timer.as_mut() {
            timer.pending = Duration::ZERO;
        }
    }

    pub fn seek_start(&mut self) {
        self.seek(0);
    }

    pub fn seek_end(&mut self) {
        self.seek(i64::from(self.total_frames) - 1);
    }

    pub fn step_forward(&mut self) {
        self.seek(i64::from(self.current_frame) + 1);
    }

    pub fn step_backward(&mut self) {
        self.seek(i64::from(self.current_frame) - 1);
    }

    /// Append a transform keyframe at the current frame. Returns whether a key
    /// was inserted; nothing happens without a selection.
    pub fn add_keyframe(&mut self, selection: Option<&Selection>) -> bool {
        self.insert_keyframe(i64::from(self.current_frame), selection)
    }

    /// Append a transform keyframe at `frame` (clamped)
    pub fn insert_keyframe(&mut self, frame: i64, selection: Option<&Selection>) -> bool {
        let Some(selection) = selection else {
            debug!("keyframe rejected: nothing selected");
            return false;
        };

        let frame = clamp_frame(frame, self.total_frames);
        info!("keyframe at {} for {:?}", frame, selection);
        self.keyframes.push(Keyframe::transform(frame));
        true
    }
}

impl Default for PlaybackController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection() -> Selection {
        Selection::Model("Character".to_string())
    }

    #[test]
    fn test_initial_state() {
        let controller = PlaybackController::new();
        assert_eq!(controller.state(), PlaybackState::Stopped);
        assert_eq!(controller.current_frame(), 0);
        assert_eq!(controller.total_frames(), 120);
        assert_eq!(controller.rate(), 24);
        assert!(controller.keyframes().is_empty());
    }

    #[test]
    fn test_seek_in_range_is_exact() {
        let mut controller = PlaybackController::new();
        for frame in 0..120 {
            controller.seek(frame);
            assert_eq!(controller.current_frame() as i64, frame);
        }
    }

    #[test]
    fn test_seek_clamps() {
        let mut controller = PlaybackController::new();
        controller.seek(-5);
        assert_eq!(controller.current_frame(), 0);
        controller.seek(500);
        assert_eq!(controller.current_frame(), 119);
        controller.seek_start();
        assert_eq!(controller.current_frame(), 0);
        controller.seek_end();
        assert_eq!(controller.current_frame(), 119);
    }

    #[test]
    fn test_step_clamps_at_ends() {
        let mut controller = PlaybackController::new();
        controller.step_backward();
        assert_eq!(controller.current_frame(), 0);
        controller.step_forward();
        assert_eq!(controller.current_frame(), 1);
        controller.seek_end();
        controller.step_forward();
        assert_eq!(controller.current_frame(), 119);
    }

    #[test]
    fn test_seek_keeps_playback_state() {
        let mut controller = PlaybackController::new();
        controller.play();
        controller.seek(40);
        assert!(controller.is_playing());
        controller.pause();
        controller.seek(20);
        assert!(!controller.is_playing());
    }

    #[test]
    fn test_play_to_end_stops_and_rewinds() {
        let mut controller = PlaybackController::new();
        controller.play();
        for _ in 0..119 {
            controller.tick();
            assert!(controller.is_playing());
        }
        assert_eq!(controller.current_frame(), 119);

        controller.tick();
        assert!(!controller.is_playing());
        assert_eq!(controller.current_frame(), 0);
    }

    #[test]
    fn test_play_and_pause_are_idempotent() {
        let mut controller = PlaybackController::new();
        controller.play();
        controller.advance(Duration::from_millis(30));
        controller.play();
        // A second play must not restart or duplicate the timer
        assert_eq!(controller.advance(Duration::from_millis(12)), 1);

        controller.pause();
        let snapshot = (controller.state(), controller.current_frame());
        controller.pause();
        assert_eq!((controller.state(), controller.current_frame()), snapshot);
        assert_eq!(controller.advance(Duration::from_secs(1)), 0);
        assert_eq!(controller.current_frame(), snapshot.1);
    }

    #[test]
    fn test_toggle() {
        let mut controller = PlaybackController::new();
        controller.toggle();
        assert!(controller.is_playing());
        controller.toggle();
        assert!(!controller.is_playing());
    }

    #[test]
    fn test_one_second_advances_rate_frames() {
        let mut controller = PlaybackController::new();
        controller.play();
        assert_eq!(controller.advance(Duration::from_millis(1000)), 24);
        assert_eq!(controller.current_frame(), 24);
        assert!(controller.is_playing());
    }

    #[test]
    fn test_advance_accumulates_partial_intervals() {
        let mut controller = PlaybackController::new();
        controller.play();
        assert_eq!(controller.advance(Duration::from_millis(16)), 0);
        assert_eq!(controller.advance(Duration::from_millis(16)), 0);
        assert_eq!(controller.advance(Duration::from_millis(16)), 1);
        assert_eq!(controller.current_frame(), 1);
    }

    #[test]
    fn test_advance_stops_at_boundary() {
        let mut controller = PlaybackController::new();
        controller.seek(110);
        controller.play();
        assert_eq!(controller.advance(Duration::from_secs(5)), 10);
        assert!(!controller.is_playing());
        assert_eq!(controller.current_frame(), 0);
    }

    #[test]
    fn test_advance_while_stopped_does_nothing() {
        let mut controller = PlaybackController::new();
        assert_eq!(controller.advance(Duration::from_secs(3)), 0);
        assert_eq!(controller.current_frame(), 0);
    }

    #[test]
    fn test_seek_restarts_pending_tick() {
        let mut controller = PlaybackController::new();
        controller.play();
        controller.advance(Duration::from_millis(40));
        controller.seek(60);
        assert_eq!(controller.advance(Duration::from_millis(5)), 0);
        assert_eq!(controller.current_frame(), 60);
    }

    #[test]
    fn test_keyframe_requires_selection() {
        let mut controller = PlaybackController::new();
        controller.seek(30);
        assert!(!controller.add_keyframe(None));
        assert!(controller.keyframes().is_empty());

        assert!(controller.add_keyframe(Some(&selection())));
        assert_eq!(controller.keyframes().len(), 1);
        assert_eq!(controller.keyframes()[0].frame, 30);
    }

    #[test]
    fn test_duplicate_keyframes_are_kept() {
        let mut controller = PlaybackController::new();
        let selection = Selection::Bone(Joint::ArmL);
        controller.add_keyframe(Some(&selection));
        controller.add_keyframe(Some(&selection));
        controller.insert_keyframe(900, Some(&selection));
        let frames: Vec<_> = controller.keyframes().iter().map(|k| k.frame).collect();
        assert_eq!(frames, vec![0, 0, 119]);
    }

    #[test]
    fn test_huge_elapsed_stops_at_boundary() {
        let mut controller = PlaybackController::new();
        controller.play();
        assert_eq!(controller.advance(Duration::from_millis(10)), 0);

        let fired = controller.advance(Duration::MAX);
        assert_eq!(fired, 120);
        assert!(!controller.is_playing());
        assert_eq!(controller.current_frame(), 0);
    }

    #[test]
    fn test_invalid_timing() {
        assert!(matches!(
            PlaybackController::with_timing(0, 24),
            Err(RigError::InvalidTiming { .. })
        ));
        assert!(PlaybackController::with_timing(120, 0).is_err());

        let controller = PlaybackController::with_timing(48, 12).unwrap();
        assert_eq!(controller.tick_interval(), Duration::from_secs(1) / 12);
    }

    #[test]
    fn test_selection_bone_editing() {
        assert!(Selection::Bone(Joint::Head).shows_bone_editing());
        assert!(!selection().shows_bone_editing());
    }
}
