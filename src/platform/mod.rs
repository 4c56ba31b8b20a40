//! Platform capability ports: camera, file picker, native share, downloads.
//!
//! The workflow and pricing code never touch a device directly. Front-ends
//! hand in a [`PlatformApi`] and tests substitute doubles for any port.

use std::path::PathBuf;

pub mod camera;
pub mod files;
pub mod share;

pub use camera::{Camera, CameraStream, CaptureConstraints, Facing, StreamSettings};
pub use files::{decode_image, FilePicker, PickedFile, ACCEPT_IMAGES};
pub use share::{Downloader, ShareRequest, ShareTarget, SharedFile};

/// Composite access to every capability a front-end can offer.
pub trait PlatformApi: Send + Sync {
    fn camera(&self) -> Box<dyn Camera>;
    fn file_picker(&self) -> Box<dyn FilePicker>;
    fn share_target(&self) -> Box<dyn ShareTarget>;
    fn downloader(&self) -> Box<dyn Downloader>;
}

/// No camera, no picker, no share; downloads are accepted and discarded.
pub struct NoopPlatform;

impl NoopPlatform {
    pub fn new() -> Self {
        NoopPlatform
    }
}

impl Default for NoopPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformApi for NoopPlatform {
    fn camera(&self) -> Box<dyn Camera> {
        Box::new(camera::UnavailableCamera::new())
    }

    fn file_picker(&self) -> Box<dyn FilePicker> {
        Box::new(files::NoopFilePicker)
    }

    fn share_target(&self) -> Box<dyn ShareTarget> {
        Box::new(share::NoShare)
    }

    fn downloader(&self) -> Box<dyn Downloader> {
        Box::new(share::NullDownloader)
    }
}

/// Desktop wiring used by the binary: files come from the path the user
/// typed or a preset path, and downloads land in the output directory.
/// There is no camera or share sheet.
pub struct DesktopPlatform {
    image_path: Option<PathBuf>,
    output_dir: PathBuf,
}

impl DesktopPlatform {
    pub fn new(image_path: Option<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            image_path,
            output_dir: output_dir.into(),
        }
    }
}

impl PlatformApi for DesktopPlatform {
    fn camera(&self) -> Box<dyn Camera> {
        Box::new(camera::UnavailableCamera::new())
    }

    fn file_picker(&self) -> Box<dyn FilePicker> {
        Box::new(files::PathFilePicker::new(self.image_path.clone()))
    }

    fn share_target(&self) -> Box<dyn ShareTarget> {
        Box::new(share::NoShare)
    }

    fn downloader(&self) -> Box<dyn Downloader> {
        Box::new(share::DirectoryDownloader::new(self.output_dir.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_platform_provides_inert_ports() {
        let p = NoopPlatform::new();
        assert!(p.camera().open(&CaptureConstraints::default()).is_err());
        assert!(p.file_picker().pick(ACCEPT_IMAGES, None).unwrap().is_none());
        assert!(!p.share_target().can_share_files());
        let path = p.downloader().save("card.png", b"x").unwrap();
        assert_eq!(path, PathBuf::from("card.png"));
    }

    #[test]
    fn desktop_platform_has_no_camera_or_share() {
        let p = DesktopPlatform::new(None, ".");
        assert!(p.camera().open(&CaptureConstraints::default()).is_err());
        assert!(!p.share_target().can_share_files());
        assert!(p.file_picker().pick(ACCEPT_IMAGES, None).unwrap().is_none());
    }
}
