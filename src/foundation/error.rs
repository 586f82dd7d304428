/// Convenience result type used across Kaleido.
pub type KaleidoResult<T> = Result<T, KaleidoError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Empty input is not an error: runs that find nothing to expand report
/// [`RunOutcome::NothingToExpand`](crate::RunOutcome::NothingToExpand), and rotations of empty
/// layers report [`RotateOutcome::Skipped`](crate::RotateOutcome::Skipped).
#[derive(thiserror::Error, Debug)]
pub enum KaleidoError {
    /// The document cannot be processed at all (no document open, unsupported color mode).
    #[error("precondition failed: {0}")]
    Precondition(String),

    /// Invalid user-provided configuration or geometry.
    #[error("validation error: {0}")]
    Validation(String),

    /// Pixel buffers that do not match the canvas they claim to belong to.
    #[error("raster error: {0}")]
    Raster(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl KaleidoError {
    /// Build a [`KaleidoError::Precondition`] value.
    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::Precondition(msg.into())
    }

    /// Build a [`KaleidoError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`KaleidoError::Raster`] value.
    pub fn raster(msg: impl Into<String>) -> Self {
        Self::Raster(msg.into())
    }

    /// Build a [`KaleidoError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
