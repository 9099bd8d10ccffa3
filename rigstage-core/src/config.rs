/// Editor configuration, loaded from TOML
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{Result, RigError};
use crate::playback::DEFAULT_RATE;
use crate::pose::DEFAULT_SPIN_STEP;
use crate::projection::ViewMode;
use crate::timeline::TOTAL_FRAMES;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    pub total_frames: u32,
    /// Transport rate, frames per second
    pub rate: u32,
    /// Spin added to the model per rendered tick, radians
    pub spin_step: f32,
    /// Target redraw rate of the viewport
    pub render_fps: u32,
    pub view_mode: ViewMode,
}

impl EditorConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: EditorConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.total_frames == 0 || self.rate == 0 {
            return Err(RigError::InvalidTiming {
                total_frames: self.total_frames,
                rate: self.rate,
            });
        }
        if self.render_fps == 0 {
            return Err(RigError::InvalidRenderRate);
        }
        if !self.spin_step.is_finite() {
            return Err(RigError::InvalidSpinStep(self.spin_step));
        }
        Ok(())
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            total_frames: TOTAL_FRAMES,
            rate: DEFAULT_RATE,
            spin_step: DEFAULT_SPIN_STEP,
            render_fps: 30,
            view_mode: ViewMode::Perspective,
        }
    }
}
