/// Procedural pose sampling for the fixed rig
///
/// Every joint follows its own sine wave of the frame number, which gives a
/// repeating walk-like cycle. Keyframes are timeline markers only and are not
/// read here.
use std::f32::consts::TAU;

use crate::rig::Joint;
use crate::timeline::Frame;

/// Phase advance per frame
pub const PHASE_STEP: f32 = 0.05;

pub const SPINE_AMPLITUDE: f32 = 0.3;
pub const HEAD_AMPLITUDE: f32 = 0.2;
pub const ARM_AMPLITUDE: f32 = 0.5;
pub const LEG_AMPLITUDE: f32 = 0.4;

/// Peak deviation of the uniform scale pulse from 1.0
pub const SCALE_PULSE: f32 = 0.1;
pub const SCALE_PULSE_RATE: f32 = 0.1;

/// Spin added per rendered tick by default
pub const DEFAULT_SPIN_STEP: f32 = 0.01;

/// Rotation (radians, about the joint's swing axis) and scale of one joint
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointOffset {
    pub rotation: f32,
    pub scale: f32,
}

impl JointOffset {
    pub fn rotation(rotation: f32) -> Self {
        Self {
            rotation,
            scale: 1.0,
        }
    }
}

impl Default for JointOffset {
    fn default() -> Self {
        Self::rotation(0.0)
    }
}

/// Complete set of joint offsets for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub frame: Frame,
    /// Free-running rotation of the whole model about the vertical axis
    pub spin: f32,
    /// Uniform scale of the whole model
    pub scale: f32,
    offsets: [JointOffset; 6],
}

impl Pose {
    /// The neutral pose: every joint at rest
    pub fn rest() -> Self {
        Self {
            frame: 0,
            spin: 0.0,
            scale: 1.0,
            offsets: [JointOffset::default(); 6],
        }
    }

    pub fn joint(&self, joint: Joint) -> JointOffset {
        self.offsets[joint as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Joint, JointOffset)> + '_ {
        Joint::ALL.iter().map(move |joint| (*joint, self.joint(*joint)))
    }
}

/// Sample the rig pose at `frame`
///
/// `elapsed_spins` is carried through as the model spin; see [`Spinner`].
pub fn sample_pose(frame: Frame, elapsed_spins: f32) -> Pose {
    let t = frame as f32 * PHASE_STEP;

    let arm = ARM_AMPLITUDE * (3.0 * t).sin();
    let leg = LEG_AMPLITUDE * (4.0 * t).sin();

    let mut offsets = [JointOffset::default(); 6];
    offsets[Joint::Root as usize] = JointOffset::rotation(SPINE_AMPLITUDE * t.sin());
    offsets[Joint::Head as usize] = JointOffset::rotation(HEAD_AMPLITUDE * (2.0 * t).sin());
    offsets[Joint::ArmL as usize] = JointOffset::rotation(arm);
    offsets[Joint::ArmR as usize] = JointOffset::rotation(-arm);
    offsets[Joint::LegL as usize] = JointOffset::rotation(leg);
    offsets[Joint::LegR as usize] = JointOffset::rotation(-leg);

    Pose {
        frame,
        spin: elapsed_spins,
        scale: 1.0 + SCALE_PULSE * (SCALE_PULSE_RATE * frame as f32).sin(),
        offsets,
    }
}

/// Free-running spin accumulator, advanced once per rendered tick
///
/// Independent of the timeline: it keeps turning while playback is stopped.
#[derive(Debug, Clone, Copy)]
pub struct Spinner {
    angle: f32,
    step: f32,
}

impl Spinner {
    pub fn new(step: f32) -> Self {
        Self { angle: 0.0, step }
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Advance by one tick and return the new angle, wrapped into `[0, TAU)`
    pub fn advance(&mut self) -> f32 {
        self.angle = (self.angle + self.step).rem_euclid(TAU);
        self.angle
    }
}

impl Default for Spinner {
    fn default() -> Self {
        Self::new(DEFAULT_SPIN_STEP)
    }
}
