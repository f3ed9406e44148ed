use std::path::PathBuf;

use thiserror::Error;

/// Failures of a generate-and-render run.
#[derive(Debug, Error)]
pub enum MapError {
    /// Grid or margin values cannot produce a usable interior.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The finished image could not be written.
    #[error("failed to write {path:?}: {source}")]
    RenderIo {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl MapError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        MapError::InvalidConfiguration(message.into())
    }
}
