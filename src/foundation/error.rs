use std::path::PathBuf;

/// Convenience result type used across stillcap.
pub type CaptionResult<T> = Result<T, CaptionError>;

/// Top-level error taxonomy used by the compositor and encoder.
#[derive(thiserror::Error, Debug)]
pub enum CaptionError {
    /// The source image path does not exist.
    #[error("source image not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// No font could be obtained from any strategy in the fallback chain.
    #[error("font unavailable: {0}")]
    FontUnavailable(String),

    /// The source image exists but could not be read or decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// Invalid user-provided job values.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while spawning, feeding or finalizing the video encoder.
    #[error("encode error: {0}")]
    Encode(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CaptionError {
    /// Build a [`CaptionError::SourceNotFound`] value.
    pub fn source_not_found(path: impl Into<PathBuf>) -> Self {
        Self::SourceNotFound(path.into())
    }

    /// Build a [`CaptionError::FontUnavailable`] value.
    pub fn font_unavailable(msg: impl Into<String>) -> Self {
        Self::FontUnavailable(msg.into())
    }

    /// Build a [`CaptionError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`CaptionError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CaptionError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
