/// Renderer-agnostic draw list built from a pose
///
/// Backends receive plain primitives in world space and never see the rig.
use nalgebra::{Matrix4, Point3, Vector3};

use crate::pose::Pose;
use crate::rig::Joint;
use crate::transform::Transform;

/// Height of the floor the rig stands on
pub const FLOOR_Y: f32 = -2.2;
/// Floor grid spans `[-GRID_EXTENT, GRID_EXTENT]` on both axes
pub const GRID_EXTENT: i32 = 4;
pub const JOINT_MARKER_RADIUS: f32 = 0.2;

/// Color role of a primitive; each backend picks its own palette
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shade {
    Grid,
    Axis,
    Body,
    Highlight,
    Joint,
}

impl Shade {
    /// Canvas color for the role
    pub fn hex(&self) -> &'static str {
        match self {
            Shade::Grid => "#2a2a2a",
            Shade::Axis | Shade::Body => "#0ea5e9",
            Shade::Highlight => "#f5f5f5",
            Shade::Joint => "#ea384c",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Line {
        from: Point3<f32>,
        to: Point3<f32>,
        shade: Shade,
    },
    /// Box of `half_extents` centered on the origin of `transform`
    Box {
        joint: Joint,
        transform: Matrix4<f32>,
        half_extents: Vector3<f32>,
        shade: Shade,
    },
    JointMarker {
        joint: Joint,
        position: Point3<f32>,
        radius: f32,
        shade: Shade,
    },
}

/// World matrix of every joint, indexed by `Joint as usize`
pub fn joint_matrices(pose: &Pose) -> [Matrix4<f32>; 6] {
    let model = Transform::model_matrix(pose.spin, pose.scale);

    let local = |joint: Joint| {
        let bone = joint.bone();
        Transform::pivot_rotation(&bone.pivot, &joint.swing_axis(), pose.joint(joint).rotation)
    };

    let mut matrices = [Matrix4::identity(); 6];
    for joint in Joint::ALL {
        let parent = match joint.parent() {
            Some(parent) => matrices[parent as usize],
            None => model,
        };
        matrices[joint as usize] = parent * local(joint);
    }
    matrices
}

/// Floor grid with the two horizontal axes highlighted
pub fn floor_grid() -> Vec<DrawCommand> {
    let extent = GRID_EXTENT as f32;
    let mut commands = Vec::new();

    for i in -GRID_EXTENT..=GRID_EXTENT {
        let offset = i as f32;
        let shade = if i == 0 { Shade::Axis } else { Shade::Grid };
        commands.push(DrawCommand::Line {
            from: Point3::new(offset, FLOOR_Y, -extent),
            to: Point3::new(offset, FLOOR_Y, extent),
            shade,
        });
        commands.push(DrawCommand::Line {
            from: Point3::new(-extent, FLOOR_Y, offset),
            to: Point3::new(extent, FLOOR_Y, offset),
            shade,
        });
    }

    commands
}

/// Full draw list for one pose: floor first, then limbs, then joint markers
pub fn draw_pose(pose: &Pose, highlight: Option<Joint>) -> Vec<DrawCommand> {
    let matrices = joint_matrices(pose);
    let mut commands = floor_grid();

    for joint in Joint::ALL {
        let bone = joint.bone();
        let shade = if highlight == Some(joint) {
            Shade::Highlight
        } else {
            Shade::Body
        };

        commands.push(DrawCommand::Box {
            joint,
            transform: matrices[joint as usize] * Transform::translation_matrix(&bone.center.coords),
            half_extents: bone.half_extents,
            shade,
        });
    }

    for joint in Joint::ALL {
        let position = matrices[joint as usize].transform_point(&joint.bone().pivot);
        commands.push(DrawCommand::JointMarker {
            joint,
            position,
            radius: JOINT_MARKER_RADIUS * pose.scale,
            shade: Shade::Joint,
        });
    }

    commands
}
