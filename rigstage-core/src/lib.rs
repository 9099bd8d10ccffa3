/// rigstage core - transport, pose sampling and viewport logic
///
/// This library holds the host-independent part of the editor: the playback
/// state machine, the procedural rig pose, timeline geometry, the viewport
/// camera and a renderer-agnostic draw list.

pub mod command;
pub mod config;
pub mod draw;
pub mod error;
pub mod geometry;
pub mod playback;
pub mod pose;
pub mod projection;
pub mod rig;
pub mod session;
pub mod timeline;
pub mod transform;

// Re-export commonly used types
pub use command::{parse_script, TransportCommand};
pub use config::EditorConfig;
pub use draw::{draw_pose, DrawCommand, Shade};
pub use error::{Result, RigError};
pub use geometry::{Mesh, Triangle, Vertex};
pub use playback::{PlaybackController, PlaybackState, Selection};
pub use pose::{sample_pose, JointOffset, Pose, Spinner};
pub use projection::{Camera, ProjectionMode, ViewMode};
pub use rig::{Bone, Joint};
pub use session::EditorSession;
pub use timeline::{Frame, Keyframe, KeyframeKind, TimelineRuler, TOTAL_FRAMES};
pub use transform::{RotationState, Transform};
