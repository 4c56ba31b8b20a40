//! File picker port and decoding of picked files into [`ImageAsset`]s.

use std::path::{Path, PathBuf};

use log::debug;

use crate::model::ImageAsset;
use crate::{Error, Result};

/// Filter passed to pickers when asking for a product photo.
pub const ACCEPT_IMAGES: &str = "image/*";

/// A file the user selected.
#[derive(Debug, Clone, PartialEq)]
pub struct PickedFile {
    pub name: String,
    /// Media type reported by the picker, if any
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

pub trait FilePicker: Send + Sync {
    /// Ask the user for a single file. `Ok(None)` means they cancelled.
    ///
    /// `hint` is a location the user already typed in a text front-end.
    /// Pickers that open their own dialog may ignore it.
    fn pick(&self, accept: &str, hint: Option<&Path>) -> Result<Option<PickedFile>>;
}

/// Turn a picked file into an image asset.
///
/// No size or type validation happens here beyond requiring some content;
/// the media type is sniffed from the bytes, then taken from the picker,
/// then guessed from the file extension.
pub fn decode_image(file: PickedFile) -> Result<ImageAsset> {
    if file.bytes.is_empty() {
        return Err(Error::DecodeError(format!("{} is empty", file.name)));
    }
    let mime = sniff_mime(&file.bytes)
        .map(str::to_string)
        .or(file.mime)
        .or_else(|| mime_from_extension(Path::new(&file.name)).map(str::to_string))
        .unwrap_or_else(|| "application/octet-stream".to_string());
    debug!("decoded {} ({} bytes) as {}", file.name, file.bytes.len(), mime);
    Ok(ImageAsset::new(mime, file.bytes))
}

/// Media type from well-known magic numbers.
pub fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        Some("image/png")
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some("image/gif")
    } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        Some("image/webp")
    } else if bytes.starts_with(b"BM") {
        Some("image/bmp")
    } else {
        None
    }
}

fn mime_from_extension(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        _ => None,
    }
}

/// Picker that reads the hinted path, or else a path chosen up front on the
/// command line.
pub struct PathFilePicker {
    path: Option<PathBuf>,
}

impl PathFilePicker {
    pub fn new(path: Option<PathBuf>) -> Self {
        PathFilePicker { path }
    }
}

impl FilePicker for PathFilePicker {
    fn pick(&self, _accept: &str, hint: Option<&Path>) -> Result<Option<PickedFile>> {
        let Some(path) = hint.or(self.path.as_deref()) else {
            return Ok(None);
        };
        let bytes = std::fs::read(path)
            .map_err(|e| Error::DecodeError(format!("{}: {}", path.display(), e)))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Some(PickedFile {
            name,
            mime: None,
            bytes,
        }))
    }
}

/// Picker that is always cancelled.
pub struct NoopFilePicker;

impl FilePicker for NoopFilePicker {
    fn pick(&self, _accept: &str, _hint: Option<&Path>) -> Result<Option<PickedFile>> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn picked(name: &str, mime: Option<&str>, bytes: &[u8]) -> PickedFile {
        PickedFile {
            name: name.to_string(),
            mime: mime.map(str::to_string),
            bytes: bytes.to_vec(),
        }
    }

    #[test]
    fn sniffing_beats_declared_type() {
        let file = picked("a.bin", Some("text/plain"), b"\x89PNG\r\n\x1a\nrest");
        let asset = decode_image(file).unwrap();
        assert_eq!(asset.mime(), "image/png");
    }

    #[test]
    fn falls_back_to_declared_then_extension() {
        let asset = decode_image(picked("a.heic", Some("image/heic"), b"xxxx")).unwrap();
        assert_eq!(asset.mime(), "image/heic");
        let asset = decode_image(picked("photo.JPG", None, b"xxxx")).unwrap();
        assert_eq!(asset.mime(), "image/jpeg");
        let asset = decode_image(picked("blob", None, b"xxxx")).unwrap();
        assert_eq!(asset.mime(), "application/octet-stream");
    }

    #[test]
    fn empty_file_is_rejected() {
        assert!(decode_image(picked("a.png", None, b"")).is_err());
    }

    #[test]
    fn path_picker_without_path_is_cancelled() {
        assert!(PathFilePicker::new(None).pick(ACCEPT_IMAGES, None).unwrap().is_none());
        assert!(NoopFilePicker
            .pick(ACCEPT_IMAGES, Some(Path::new("a.png")))
            .unwrap()
            .is_none());
    }

    #[test]
    fn path_picker_prefers_hint() {
        let dir = tempfile::tempdir().unwrap();
        let preset = dir.path().join("preset.png");
        let typed = dir.path().join("typed.png");
        std::fs::write(&preset, b"preset").unwrap();
        std::fs::write(&typed, b"typed").unwrap();

        let picker = PathFilePicker::new(Some(preset));
        let file = picker.pick(ACCEPT_IMAGES, Some(&typed)).unwrap().unwrap();
        assert_eq!(file.name, "typed.png");
        assert_eq!(file.bytes, b"typed");
        let file = picker.pick(ACCEPT_IMAGES, None).unwrap().unwrap();
        assert_eq!(file.name, "preset.png");
    }

    #[test]
    fn path_picker_reports_missing_file() {
        let picker = PathFilePicker::new(Some(PathBuf::from("/definitely/not/here.png")));
        assert!(matches!(
            picker.pick(ACCEPT_IMAGES, None),
            Err(Error::DecodeError(_))
        ));
    }
}
