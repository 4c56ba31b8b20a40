//! Camera capability port.
//!
//! A [`Camera`] hands out at most one live [`CameraStream`]. Callers go
//! through [`crate::acquire::CaptureSession`], which guarantees the stream is
//! stopped on every exit path.

use serde::Deserialize;

use crate::model::ImageAsset;
use crate::{Error, Result};

/// Which way the capture device should point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    /// Outward-facing ("environment") camera
    #[default]
    Rear,
    /// User-facing camera
    Front,
}

/// What to ask the device for. Devices treat width/height as ideals.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CaptureConstraints {
    pub facing: Facing,
    pub width: u32,
    pub height: u32,
    /// Encoder quality for snapshots on a 0..=1 scale
    pub quality: f32,
}

impl Default for CaptureConstraints {
    fn default() -> Self {
        Self {
            facing: Facing::Rear,
            width: 1280,
            height: 720,
            quality: 0.8,
        }
    }
}

/// What the device actually granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamSettings {
    pub width: u32,
    pub height: u32,
    pub facing: Facing,
}

pub trait Camera: Send + Sync {
    /// Request exclusive access to a capture device.
    ///
    /// Fails with [`Error::CameraDenied`] when the user refuses and
    /// [`Error::CameraUnavailable`] when there is no device.
    fn open(&self, constraints: &CaptureConstraints) -> Result<Box<dyn CameraStream>>;
}

/// A live, exclusively held video stream.
pub trait CameraStream: Send {
    fn settings(&self) -> StreamSettings;

    /// Encode the current frame as a still image.
    fn snapshot(&mut self, quality: f32) -> Result<ImageAsset>;

    /// Release the device. Must be idempotent.
    fn stop(&mut self);
}

/// Camera for platforms without capture devices; every request fails.
pub struct UnavailableCamera;

impl UnavailableCamera {
    pub fn new() -> Self {
        UnavailableCamera
    }
}

impl Default for UnavailableCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera for UnavailableCamera {
    fn open(&self, _constraints: &CaptureConstraints) -> Result<Box<dyn CameraStream>> {
        Err(Error::CameraUnavailable(
            "no capture device on this platform; choose an image file instead".to_string(),
        ))
    }
}
