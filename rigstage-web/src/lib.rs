/// rigstage web - WASM facade over the editor session
///
/// A browser shell owns one `WebEditor`, wires its transport buttons to the
/// methods below, calls `advance` from `requestAnimationFrame` and redraws
/// the viewport and timeline canvases afterwards.
use rigstage_core::{
    EditorConfig, EditorSession, Joint, RigError, Selection, TimelineRuler, ViewMode,
};
use std::time::Duration;
use wasm_bindgen::prelude::*;

pub mod canvas;

fn js_error(error: RigError) -> JsValue {
    JsValue::from_str(&error.to_string())
}

#[wasm_bindgen]
pub struct WebEditor {
    session: EditorSession,
}

#[wasm_bindgen]
impl WebEditor {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<WebEditor, JsValue> {
        Self::from_config(&EditorConfig::default())
    }

    /// Build an editor from TOML settings
    pub fn with_config(toml: &str) -> Result<WebEditor, JsValue> {
        let config = EditorConfig::from_toml(toml).map_err(js_error)?;
        Self::from_config(&config)
    }

    pub fn play(&mut self) {
        self.session.controller.play();
    }

    pub fn pause(&mut self) {
        self.session.controller.pause();
    }

    pub fn toggle(&mut self) {
        self.session.controller.toggle();
    }

    pub fn seek(&mut self, frame: i32) {
        self.session.controller.seek(i64::from(frame));
    }

    pub fn seek_start(&mut self) {
        self.session.controller.seek_start();
    }

    pub fn seek_end(&mut self) {
        self.session.controller.seek_end();
    }

    pub fn step_forward(&mut self) {
        self.session.controller.step_forward();
    }

    pub fn step_backward(&mut self) {
        self.session.controller.step_backward();
    }

    /// Returns false when nothing is selected
    pub fn add_keyframe(&mut self) -> bool {
        self.session.add_keyframe()
    }

    pub fn select_bone(&mut self, name: &str) -> Result<(), JsValue> {
        let joint = Joint::from_name(name).map_err(js_error)?;
        self.session.select(Selection::Bone(joint));
        Ok(())
    }

    pub fn select_model(&mut self, name: &str) {
        self.session.select(Selection::Model(name.to_string()));
    }

    pub fn deselect(&mut self) {
        self.session.deselect();
    }

    /// Whether the properties panel should show bone editing
    pub fn shows_bone_editing(&self) -> bool {
        self.session
            .selection()
            .is_some_and(|selection| selection.shows_bone_editing())
    }

    pub fn is_playing(&self) -> bool {
        self.session.controller.is_playing()
    }

    pub fn current_frame(&self) -> u32 {
        self.session.controller.current_frame()
    }

    pub fn total_frames(&self) -> u32 {
        self.session.controller.total_frames()
    }

    pub fn rate(&self) -> u32 {
        self.session.controller.rate()
    }

    pub fn keyframe_frames(&self) -> Vec<u32> {
        self.session
            .controller
            .keyframes()
            .iter()
            .map(|key| key.frame)
            .collect()
    }

    /// One animation frame of the host: `elapsed_ms` since the previous call.
    /// Negative or NaN deltas count as zero, overlong ones saturate.
    pub fn advance(&mut self, elapsed_ms: f64) {
        let elapsed = Duration::try_from_secs_f64(elapsed_ms.max(0.0) / 1000.0)
            .unwrap_or(Duration::MAX);
        self.session.render_tick(elapsed);
    }

    pub fn joint_rotation(&self, name: &str) -> Result<f32, JsValue> {
        let joint = Joint::from_name(name).map_err(js_error)?;
        Ok(self.session.pose().joint(joint).rotation)
    }

    pub fn set_view(&mut self, name: &str) -> Result<(), JsValue> {
        let view = name.parse::<ViewMode>().map_err(js_error)?;
        self.session.camera.set_view(view);
        Ok(())
    }

    pub fn zoom_in(&mut self) {
        self.session.camera.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.session.camera.zoom_out();
    }

    pub fn orbit(&mut self, yaw: f32, pitch: f32) {
        self.session.camera.orbit(yaw, pitch);
    }

    /// Frame under a click at `x` on a timeline strip `width` pixels wide
    pub fn timeline_frame_at(&self, x: f32, width: f32) -> u32 {
        TimelineRuler::new(self.total_frames(), width).frame_at(x)
    }

    /// Run a transport script; returns the number of commands applied
    pub fn run_script(&mut self, script: &str) -> Result<u32, JsValue> {
        let count = self.session.run_script(script).map_err(js_error)?;
        Ok(count as u32)
    }

    /// Draw the rig into the canvas with id `canvas_id`
    pub fn render(&mut self, canvas_id: &str) -> Result<(), JsValue> {
        let (element, context) = canvas::canvas_context(canvas_id)?;
        let (width, height) = (element.width(), element.height());

        self.session.camera.set_aspect(width, height);
        let commands = self.session.draw_list();
        canvas::draw_viewport(&context, &commands, &self.session.camera, width, height)
    }

    /// Draw the timeline strip into the canvas with id `canvas_id`
    pub fn render_timeline(&self, canvas_id: &str) -> Result<(), JsValue> {
        let (element, context) = canvas::canvas_context(canvas_id)?;
        let controller = &self.session.controller;
        let ruler = TimelineRuler::new(controller.total_frames(), element.width() as f32);

        canvas::draw_timeline(
            &context,
            &ruler,
            controller.keyframes(),
            controller.current_frame(),
            element.height(),
        )
    }
}

impl WebEditor {
    fn from_config(config: &EditorConfig) -> Result<WebEditor, JsValue> {
        let session = EditorSession::new(config).map_err(js_error)?;
        Ok(WebEditor { session })
    }
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    // Setup panic hook for better error messages in browser console
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    Ok(())
}
