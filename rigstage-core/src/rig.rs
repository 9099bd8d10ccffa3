/// Fixed rig topology: joint names, hierarchy and rest layout
use nalgebra::{Point3, Vector3};
use std::fmt;

use crate::error::{Result, RigError};

/// Depth of every limb box; the rig is a flat-fronted mannequin
const LIMB_HALF_DEPTH: f32 = 0.25;

/// A named joint of the rig
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Joint {
    /// Spine; the root of the hierarchy
    Root,
    Head,
    ArmL,
    ArmR,
    LegL,
    LegR,
}

impl Joint {
    pub const ALL: [Joint; 6] = [
        Joint::Root,
        Joint::Head,
        Joint::ArmL,
        Joint::ArmR,
        Joint::LegL,
        Joint::LegR,
    ];

    /// Short identifier used in poses and scripts
    pub fn key(&self) -> &'static str {
        match self {
            Joint::Root => "root",
            Joint::Head => "head",
            Joint::ArmL => "armL",
            Joint::ArmR => "armR",
            Joint::LegL => "legL",
            Joint::LegR => "legR",
        }
    }

    /// Name shown in the bone list
    pub fn display_name(&self) -> &'static str {
        match self {
            Joint::Root => "Spine",
            Joint::Head => "Head",
            Joint::ArmL => "Arm.L",
            Joint::ArmR => "Arm.R",
            Joint::LegL => "Leg.L",
            Joint::LegR => "Leg.R",
        }
    }

    pub fn parent(&self) -> Option<Joint> {
        match self {
            Joint::Root => None,
            _ => Some(Joint::Root),
        }
    }

    /// Look a joint up by key or display name, ignoring case
    pub fn from_name(name: &str) -> Result<Joint> {
        let name = name.trim();
        Joint::ALL
            .iter()
            .copied()
            .find(|joint| {
                joint.key().eq_ignore_ascii_case(name)
                    || joint.display_name().eq_ignore_ascii_case(name)
            })
            .ok_or_else(|| RigError::UnknownJoint(name.to_string()))
    }

    /// Axis the joint rotates about when the pose swings it
    pub fn swing_axis(&self) -> Vector3<f32> {
        match self {
            Joint::Root | Joint::Head => Vector3::y(),
            Joint::ArmL | Joint::ArmR | Joint::LegL | Joint::LegR => Vector3::x(),
        }
    }

    /// Rest layout of the bone driven by this joint
    pub fn bone(&self) -> Bone {
        let (pivot, center, half) = match self {
            Joint::Root => ((0.0, 0.0), (0.0, -0.4), (0.5, 0.8)),
            Joint::Head => ((0.0, 0.4), (0.0, 0.8), (0.6, 0.4)),
            Joint::ArmL => ((-0.8, 0.6), (-0.8, 0.3), (0.2, 0.7)),
            Joint::ArmR => ((0.8, 0.6), (0.8, 0.3), (0.2, 0.7)),
            Joint::LegL => ((-0.4, -1.2), (-0.4, -1.7), (0.2, 0.5)),
            Joint::LegR => ((0.4, -1.2), (0.4, -1.7), (0.2, 0.5)),
        };

        Bone {
            joint: *self,
            pivot: Point3::new(pivot.0, pivot.1, 0.0),
            center: Point3::new(center.0, center.1, 0.0),
            half_extents: Vector3::new(half.0, half.1, LIMB_HALF_DEPTH),
        }
    }
}

impl fmt::Display for Joint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A box-shaped limb hanging from a joint, in model space at rest
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bone {
    pub joint: Joint,
    /// Point the limb rotates around
    pub pivot: Point3<f32>,
    /// Center of the limb box
    pub center: Point3<f32>,
    pub half_extents: Vector3<f32>,
}

impl Bone {
    /// Offset from the pivot to the box center
    pub fn offset(&self) -> Vector3<f32> {
        self.center - self.pivot
    }
}
