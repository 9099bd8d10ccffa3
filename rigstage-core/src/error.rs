/// Error types for the fallible edges of the editor core
///
/// Transport operations never fail; errors only come from construction with
/// custom timing, configuration loading, command parsing and joint lookup.
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RigError {
    /// A timeline needs at least one frame and a non-zero playback rate.
    #[error("invalid timing: {total_frames} frames at {rate} fps")]
    InvalidTiming { total_frames: u32, rate: u32 },

    #[error("render rate must be non-zero")]
    InvalidRenderRate,

    #[error("spin step must be finite, got {0}")]
    InvalidSpinStep(f32),

    #[error("failed to read config: {0}")]
    ConfigRead(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// A transport script could not be parsed. `position` is a byte offset.
    #[error("invalid command at byte {position}: {message}")]
    Command { position: usize, message: String },

    #[error("unknown joint: {0}")]
    UnknownJoint(String),

    #[error("unknown view mode: {0}")]
    UnknownViewMode(String),
}

pub type Result<T> = std::result::Result<T, RigError>;
