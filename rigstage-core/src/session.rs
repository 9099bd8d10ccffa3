/// Editor session: the single owner of transport, selection and viewport state
///
/// Front ends hold one session and hand it input events and elapsed time.
use log::debug;
use std::time::Duration;

use crate::command::{parse_script, TransportCommand};
use crate::config::EditorConfig;
use crate::draw::{draw_pose, DrawCommand};
use crate::error::Result;
use crate::playback::{PlaybackController, Selection};
use crate::pose::{sample_pose, Pose, Spinner};
use crate::projection::Camera;
use crate::rig::Joint;

pub struct EditorSession {
    pub controller: PlaybackController,
    pub camera: Camera,
    selection: Option<Selection>,
    spinner: Spinner,
    pose: Pose,
}

impl EditorSession {
    pub fn new(config: &EditorConfig) -> Result<Self> {
        config.validate()?;

        let mut camera = Camera::default();
        camera.set_view(config.view_mode);

        Ok(Self {
            controller: PlaybackController::from_config(config)?,
            camera,
            selection: None,
            spinner: Spinner::new(config.spin_step),
            pose: Pose::rest(),
        })
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn select(&mut self, selection: Selection) {
        debug!("select {:?}", selection);
        self.selection = Some(selection);
    }

    pub fn deselect(&mut self) {
        self.selection = None;
    }

    /// Bone highlighted in the viewport, if a bone is selected
    pub fn selected_joint(&self) -> Option<Joint> {
        match self.selection {
            Some(Selection::Bone(joint)) => Some(joint),
            _ => None,
        }
    }

    pub fn add_keyframe(&mut self) -> bool {
        self.controller.add_keyframe(self.selection.as_ref())
    }

    /// One viewport refresh: let `elapsed` pass on the transport timer, turn the
    /// spinner one step and resample the pose
    pub fn render_tick(&mut self, elapsed: Duration) -> &Pose {
        self.controller.advance(elapsed);
        let spins = self.spinner.advance();
        self.pose = sample_pose(self.controller.current_frame(), spins);
        &self.pose
    }

    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    pub fn draw_list(&self) -> Vec<DrawCommand> {
        draw_pose(&self.pose, self.selected_joint())
    }

    pub fn apply(&mut self, command: &TransportCommand) {
        match command {
            TransportCommand::Play => self.controller.play(),
            TransportCommand::Pause => self.controller.pause(),
            TransportCommand::Toggle => self.controller.toggle(),
            TransportCommand::Seek(frame) => self.controller.seek(*frame),
            TransportCommand::SeekStart => self.controller.seek_start(),
            TransportCommand::SeekEnd => self.controller.seek_end(),
            TransportCommand::StepForward => self.controller.step_forward(),
            TransportCommand::StepBackward => self.controller.step_backward(),
            TransportCommand::AddKeyframe => {
                self.add_keyframe();
            }
            TransportCommand::SelectBone(joint) => self.select(Selection::Bone(*joint)),
            TransportCommand::SelectModel(model) => self.select(Selection::Model(model.clone())),
            TransportCommand::Deselect => self.deselect(),
            TransportCommand::Wait(duration) => {
                self.render_tick(*duration);
            }
            TransportCommand::View(view) => self.camera.set_view(*view),
        }
    }

    /// Parse and run a script, returning the number of commands applied
    pub fn run_script(&mut self, script: &str) -> Result<usize> {
        let commands = parse_script(script)?;
        for command in &commands {
            self.apply(command);
        }
        Ok(commands.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::ViewMode;

    fn session() -> EditorSession {
        EditorSession::new(&EditorConfig::default()).unwrap()
    }

    #[test]
    fn test_keyframe_needs_selection() {
        let mut session = session();
        assert!(!session.add_keyframe());
        session.select(Selection::Model("Character".to_string()));
        assert!(session.add_keyframe());
        session.deselect();
        assert!(!session.add_keyframe());
        assert_eq!(session.controller.keyframes().len(), 1);
    }

    #[test]
    fn test_render_tick_samples_current_frame() {
        let mut session = session();
        session.controller.seek(42);
        let pose = *session.render_tick(Duration::from_millis(16));
        assert_eq!(pose.frame, 42);
        assert_eq!(pose, sample_pose(42, session.spinner.angle()));
    }

    #[test]
    fn test_spinner_turns_while_stopped() {
        let mut session = session();
        let first = session.render_tick(Duration::ZERO).spin;
        let second = session.render_tick(Duration::ZERO).spin;
        assert!(second > first);
        assert_eq!(session.controller.current_frame(), 0);
    }

    #[test]
    fn test_script_drives_session() {
        let mut session = session();
        let count = session
            .run_script("select Arm.L; seek 40; key; view side; play; wait 1000")
            .unwrap();
        assert_eq!(count, 6);
        assert_eq!(session.selected_joint(), Some(Joint::ArmL));
        assert_eq!(session.controller.keyframes()[0].frame, 40);
        assert_eq!(session.camera.view, ViewMode::Side);
        assert!(session.controller.is_playing());
        assert_eq!(session.controller.current_frame(), 64);
        assert_eq!(session.pose().frame, 64);
    }

    #[test]
    fn test_bad_script_applies_nothing() {
        let mut session = session();
        assert!(session.run_script("play; fly").is_err());
        assert!(!session.controller.is_playing());
    }

    #[test]
    fn test_model_selection_has_no_highlight() {
        let mut session = session();
        session.apply(&TransportCommand::SelectModel("Robot".to_string()));
        assert_eq!(session.selected_joint(), None);
        assert!(session.selection().is_some());
    }
}
