//! Error type shared by every stage of the pipeline.

use thiserror::Error;

pub type WhirlResult<T> = Result<T, WhirlError>;

/// Errors that can occur while building or serializing an animation.
#[derive(Debug, Error)]
pub enum WhirlError {
    /// Rejected before any work was scheduled.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The source bytes could not be decoded into an image.
    #[error("decode failed: {0}")]
    DecodeFailure(String),

    /// A single rotation or quantization task failed; the whole batch is discarded.
    #[error("frame {index} failed: {message}")]
    FrameTaskFailure { index: usize, message: String },

    /// The assembled animation could not be written.
    #[error("encode failed: {0}")]
    EncodeFailure(String),
}

impl WhirlError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::DecodeFailure(msg.into())
    }

    pub fn frame_task(index: usize, msg: impl Into<String>) -> Self {
        Self::FrameTaskFailure {
            index,
            message: msg.into(),
        }
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::EncodeFailure(msg.into())
    }
}
