//! Image acquisition for the product photo.
//!
//! Two sources produce the same [`ImageAsset`]: a live camera via a
//! [`CaptureSession`], or a picked file. Failures never touch workflow state;
//! the product form simply keeps no image and stays unsubmittable.

use std::path::Path;

use log::{debug, info, warn};

use crate::model::ImageAsset;
use crate::platform::{
    decode_image, Camera, CameraStream, CaptureConstraints, FilePicker, StreamSettings,
    ACCEPT_IMAGES,
};
use crate::{Error, Result};

/// Exclusive hold on a camera stream.
///
/// The stream is stopped when a photo is captured, when the session is
/// dismissed, and when the session is dropped for any other reason.
pub struct CaptureSession {
    stream: Option<Box<dyn CameraStream>>,
    quality: f32,
}

impl CaptureSession {
    pub fn open(camera: &dyn Camera, constraints: &CaptureConstraints) -> Result<Self> {
        let stream = camera.open(constraints)?;
        let s = stream.settings();
        debug!("camera stream open: {}x{} {:?}", s.width, s.height, s.facing);
        Ok(Self {
            stream: Some(stream),
            quality: constraints.quality,
        })
    }

    pub fn settings(&self) -> Option<StreamSettings> {
        self.stream.as_ref().map(|s| s.settings())
    }

    /// Snapshot the current frame and release the device.
    pub fn capture(mut self) -> Result<ImageAsset> {
        let mut stream = self
            .stream
            .take()
            .ok_or_else(|| Error::CaptureFailed("stream already released".into()))?;
        let shot = stream.snapshot(self.quality);
        stream.stop();
        let asset = shot?;
        if asset.is_empty() {
            return Err(Error::CaptureFailed("camera returned an empty frame".into()));
        }
        Ok(asset)
    }

    /// Close the capture surface without taking a photo.
    pub fn dismiss(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
            debug!("camera stream released");
        }
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        self.release();
    }
}

/// Both photo sources behind one front-end facing surface. At most one
/// capture session is active at a time.
pub struct ImageAcquisition {
    camera: Box<dyn Camera>,
    picker: Box<dyn FilePicker>,
    constraints: CaptureConstraints,
    session: Option<CaptureSession>,
}

impl ImageAcquisition {
    pub fn new(
        camera: Box<dyn Camera>,
        picker: Box<dyn FilePicker>,
        constraints: CaptureConstraints,
    ) -> Self {
        Self {
            camera,
            picker,
            constraints,
            session: None,
        }
    }

    pub fn is_capturing(&self) -> bool {
        self.session.is_some()
    }

    /// Open the capture surface. A denial is logged and returned so the
    /// front-end can show it once; nothing else changes.
    pub fn open_camera(&mut self) -> Result<()> {
        if self.session.is_some() {
            return Err(Error::CaptureBusy);
        }
        match CaptureSession::open(self.camera.as_ref(), &self.constraints) {
            Ok(session) => {
                self.session = Some(session);
                Ok(())
            }
            Err(e) => {
                warn!("camera not available: {}", e);
                Err(e)
            }
        }
    }

    /// Take the photo from the open capture surface, closing it.
    pub fn capture(&mut self) -> Result<ImageAsset> {
        let session = self
            .session
            .take()
            .ok_or_else(|| Error::CaptureFailed("camera is not open".into()))?;
        let asset = session.capture()?;
        info!("captured {} photo ({} bytes)", asset.mime(), asset.bytes().len());
        Ok(asset)
    }

    pub fn dismiss_camera(&mut self) {
        if let Some(session) = self.session.take() {
            session.dismiss();
        }
    }

    /// Ask the platform picker for an image file, passing along any location
    /// the user typed. `Ok(None)` when the user cancels.
    pub fn pick_file(&self, hint: Option<&Path>) -> Result<Option<ImageAsset>> {
        match self.picker.pick(ACCEPT_IMAGES, hint)? {
            Some(file) => {
                let asset = decode_image(file)?;
                info!("picked {} photo ({} bytes)", asset.mime(), asset.bytes().len());
                Ok(Some(asset))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::camera::{Facing, UnavailableCamera};
    use crate::platform::files::NoopFilePicker;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingCamera {
        stops: Arc<AtomicUsize>,
    }

    struct CountingStream {
        stops: Arc<AtomicUsize>,
        stopped: bool,
    }

    impl Camera for CountingCamera {
        fn open(&self, c: &CaptureConstraints) -> Result<Box<dyn CameraStream>> {
            assert_eq!(c.facing, Facing::Rear);
            Ok(Box::new(CountingStream {
                stops: self.stops.clone(),
                stopped: false,
            }))
        }
    }

    impl CameraStream for CountingStream {
        fn settings(&self) -> StreamSettings {
            StreamSettings {
                width: 1280,
                height: 720,
                facing: Facing::Rear,
            }
        }

        fn snapshot(&mut self, quality: f32) -> Result<ImageAsset> {
            assert!(!self.stopped);
            assert_eq!(quality, 0.8);
            Ok(ImageAsset::new("image/jpeg", vec![0xFF, 0xD8, 0xFF]))
        }

        fn stop(&mut self) {
            if !self.stopped {
                self.stopped = true;
                self.stops.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    fn acquisition(stops: &Arc<AtomicUsize>) -> ImageAcquisition {
        ImageAcquisition::new(
            Box::new(CountingCamera { stops: stops.clone() }),
            Box::new(NoopFilePicker),
            CaptureConstraints::default(),
        )
    }

    #[test]
    fn capture_releases_device() {
        let stops = Arc::new(AtomicUsize::new(0));
        let mut acq = acquisition(&stops);
        acq.open_camera().unwrap();
        assert!(acq.is_capturing());
        let photo = acq.capture().unwrap();
        assert_eq!(photo.mime(), "image/jpeg");
        assert!(!acq.is_capturing());
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn dismiss_and_drop_release_device() {
        let stops = Arc::new(AtomicUsize::new(0));
        let mut acq = acquisition(&stops);
        acq.open_camera().unwrap();
        acq.dismiss_camera();
        assert_eq!(stops.load(Ordering::SeqCst), 1);

        acq.open_camera().unwrap();
        drop(acq);
        assert_eq!(stops.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn one_session_at_a_time() {
        let stops = Arc::new(AtomicUsize::new(0));
        let mut acq = acquisition(&stops);
        acq.open_camera().unwrap();
        assert!(matches!(acq.open_camera(), Err(Error::CaptureBusy)));
    }

    #[test]
    fn denial_leaves_no_session() {
        let mut acq = ImageAcquisition::new(
            Box::new(UnavailableCamera::new()),
            Box::new(NoopFilePicker),
            CaptureConstraints::default(),
        );
        assert!(acq.open_camera().unwrap_err().is_capability_denial());
        assert!(!acq.is_capturing());
        assert!(acq.capture().is_err());
        assert!(acq.pick_file(None).unwrap().is_none());
    }
}
