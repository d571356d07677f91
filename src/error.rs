use thiserror::Error;

/// Errors that abort a detection run before any output is produced.
///
/// Conditions the pipeline can recover from are not errors: a missing hand is
/// reported through [`crate::Detection::NoHandDetected`] and an empty vein mask
/// through [`crate::VeinStatistics::NoVeinsDetected`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VeinError {
    /// The image has zero width or zero height.
    #[error("image has zero dimension ({width}x{height})")]
    EmptyImage {
        /// Image width in pixels
        width: usize,
        /// Image height in pixels
        height: usize,
    },

    /// A raw pixel buffer does not match its declared dimensions.
    #[error("pixel buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSize {
        /// Byte count implied by width, height and channel count
        expected: usize,
        /// Actual buffer length
        actual: usize,
    },

    /// Two buffers that must share dimensions do not.
    #[error("dimension mismatch: {left:?} vs {right:?}")]
    DimensionMismatch {
        /// Dimensions of the first buffer
        left: (u32, u32),
        /// Dimensions of the second buffer
        right: (u32, u32),
    },

    /// A configuration value that the pipeline cannot execute.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, VeinError>;

impl VeinError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
