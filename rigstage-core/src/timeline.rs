/// Timeline data: frames, keyframes and the geometry of the timeline strip
use std::collections::BTreeMap;

/// Discrete position along the timeline, 0-based
pub type Frame = u32;

/// Length of the editor timeline in frames
pub const TOTAL_FRAMES: u32 = 120;

/// Ruler grid spacing, in frames
pub const RULER_GRID_STEP: u32 = 5;

/// Every frame divisible by this gets a numeric label on the ruler
pub const RULER_LABEL_STEP: u32 = 10;

/// Clamp an arbitrary (possibly negative) frame index into `[0, total_frames - 1]`
pub fn clamp_frame(frame: i64, total_frames: u32) -> Frame {
    let last = i64::from(total_frames.saturating_sub(1));
    frame.clamp(0, last) as Frame
}

/// What a keyframe records. Only transform keys exist today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyframeKind {
    Transform,
}

impl KeyframeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyframeKind::Transform => "transform",
        }
    }
}

/// A marker associating a frame with a transform payload
///
/// The payload is opaque and is never read back by the pose sampler.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyframe {
    pub frame: Frame,
    pub kind: KeyframeKind,
    pub data: BTreeMap<String, String>,
}

impl Keyframe {
    pub fn transform(frame: Frame) -> Self {
        Self {
            frame,
            kind: KeyframeKind::Transform,
            data: BTreeMap::new(),
        }
    }
}

/// One grid line of the timeline ruler
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RulerTick {
    pub frame: Frame,
    pub x: f32,
    pub labeled: bool,
}

/// Maps between frames and horizontal positions on a timeline strip
#[derive(Debug, Clone, Copy)]
pub struct TimelineRuler {
    total_frames: u32,
    width: f32,
}

impl TimelineRuler {
    pub fn new(total_frames: u32, width: f32) -> Self {
        Self {
            total_frames: total_frames.max(1),
            width: width.max(0.0),
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn frame_width(&self) -> f32 {
        self.width / self.total_frames as f32
    }

    /// Frame under a click at `x`. Clicks outside the strip clamp to the ends.
    pub fn frame_at(&self, x: f32) -> Frame {
        let frame_width = self.frame_width();
        if frame_width <= 0.0 || !x.is_finite() {
            return 0;
        }

        let frame = (x / frame_width).floor();
        if frame <= 0.0 {
            0
        } else {
            clamp_frame(frame as i64, self.total_frames)
        }
    }

    /// Left edge of the cell for `frame`, where markers and the playhead are drawn
    pub fn marker_x(&self, frame: Frame) -> f32 {
        frame as f32 * self.frame_width()
    }

    /// Grid lines every few frames, including one at the very end of the strip
    pub fn ticks(&self) -> impl Iterator<Item = RulerTick> + '_ {
        (0..=self.total_frames)
            .step_by(RULER_GRID_STEP as usize)
            .map(move |frame| RulerTick {
                frame,
                x: self.marker_x(frame),
                labeled: frame % RULER_LABEL_STEP == 0,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_frame() {
        assert_eq!(clamp_frame(-5, TOTAL_FRAMES), 0);
        assert_eq!(clamp_frame(0, TOTAL_FRAMES), 0);
        assert_eq!(clamp_frame(64, TOTAL_FRAMES), 64);
        assert_eq!(clamp_frame(500, TOTAL_FRAMES), 119);
        assert_eq!(clamp_frame(3, 0), 0);
    }

    #[test]
    fn test_transform_keyframe() {
        let key = Keyframe::transform(12);
        assert_eq!(key.frame, 12);
        assert_eq!(key.kind.as_str(), "transform");
        assert!(key.data.is_empty());
    }

    #[test]
    fn test_frame_at_floors_click_position() {
        let ruler = TimelineRuler::new(120, 600.0);
        assert!((ruler.frame_width() - 5.0).abs() < 1e-6);
        assert_eq!(ruler.frame_at(0.0), 0);
        assert_eq!(ruler.frame_at(4.9), 0);
        assert_eq!(ruler.frame_at(5.0), 1);
        assert_eq!(ruler.frame_at(597.0), 119);
    }

    #[test]
    fn test_frame_at_clamps_outside_strip() {
        let ruler = TimelineRuler::new(120, 600.0);
        assert_eq!(ruler.frame_at(-30.0), 0);
        assert_eq!(ruler.frame_at(10_000.0), 119);
        assert_eq!(ruler.frame_at(f32::NAN), 0);

        let collapsed = TimelineRuler::new(120, 0.0);
        assert_eq!(collapsed.frame_at(50.0), 0);
    }

    #[test]
    fn test_marker_lands_in_clicked_cell() {
        let ruler = TimelineRuler::new(120, 840.0);
        for x in [0.0_f32, 13.0, 420.5, 839.0] {
            let frame = ruler.frame_at(x);
            let left = ruler.marker_x(frame);
            assert!(left <= x && x < left + ruler.frame_width());
        }
    }

    #[test]
    fn test_ruler_ticks() {
        let ruler = TimelineRuler::new(120, 600.0);
        let ticks: Vec<_> = ruler.ticks().collect();
        assert_eq!(ticks.len(), 25);
        assert_eq!(ticks[0].frame, 0);
        assert!(ticks[0].labeled);
        assert!(!ticks[1].labeled);
        assert_eq!(ticks[24].frame, 120);
        assert!((ticks[24].x - 600.0).abs() < 1e-3);
    }
}
