//! Error types for the pricing workflow and its capability ports

use thiserror::Error;

/// Result type alias for florista operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while acquiring images, rendering or exporting.
///
/// Input validation is not represented here: a rejected step submission is a
/// steady-state condition reported as `false`/`None`, not an error.
#[derive(Error, Debug)]
pub enum Error {
    /// The user refused camera access
    #[error("Camera access was denied: {0}")]
    CameraDenied(String),

    /// No capture device is available on this platform
    #[error("Camera unavailable: {0}")]
    CameraUnavailable(String),

    /// A capture session is already open
    #[error("A camera capture session is already active")]
    CaptureBusy,

    /// Snapshotting a frame from an open stream failed
    #[error("Photo capture failed: {0}")]
    CaptureFailed(String),

    /// A file could not be turned into an image asset
    #[error("Could not read image: {0}")]
    DecodeError(String),

    /// Failed to rasterize the preview card
    #[error("Rendering failed: {0}")]
    RenderError(String),

    /// Failed to save the rendered card
    #[error("Export failed: {0}")]
    ExportError(String),

    /// The native share flow reported a failure
    #[error("Share failed: {0}")]
    ShareError(String),

    /// Native file sharing is not available on this platform
    #[error("Sharing is not supported on this platform")]
    ShareUnavailable,

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Camera denial or absence. The user may retry or switch to a file.
    pub fn is_capability_denial(&self) -> bool {
        matches!(self, Error::CameraDenied(_) | Error::CameraUnavailable(_))
    }
}

impl From<png::EncodingError> for Error {
    fn from(err: png::EncodingError) -> Self {
        Error::RenderError(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::ConfigError(err.to_string())
    }
}
