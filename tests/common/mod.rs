#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use florista::model::ImageAsset;
use florista::platform::{
    Camera, CameraStream, CaptureConstraints, Downloader, Facing, FilePicker, PickedFile,
    ShareRequest, ShareTarget, StreamSettings,
};
use florista::{Error, Result};

/// Encode a solid-colour RGB PNG.
pub fn png_fixture(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, width, height);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().expect("png header");
        let data: Vec<u8> = (0..width * height).flat_map(|_| rgb).collect();
        writer.write_image_data(&data).expect("png data");
    }
    out
}

pub fn photo() -> ImageAsset {
    ImageAsset::new("image/png", png_fixture(16, 12, [200, 40, 80]))
}

/// Decode PNG bytes into (width, height, RGBA pixels).
pub fn decode_png(bytes: &[u8]) -> (u32, u32, Vec<u8>) {
    let mut decoder = png::Decoder::new(bytes);
    decoder.set_transformations(png::Transformations::EXPAND);
    let mut reader = decoder.read_info().expect("png info");
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf).expect("png frame");
    buf.truncate(info.buffer_size());
    let rgba = match info.color_type {
        png::ColorType::Rgba => buf,
        png::ColorType::Rgb => buf
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
        other => panic!("unexpected colour type {:?}", other),
    };
    (info.width, info.height, rgba)
}

#[derive(Clone, Copy, PartialEq)]
pub enum CameraBehaviour {
    Grant,
    Deny,
    FailSnapshot,
}

/// Camera double that counts opens and stops.
#[derive(Clone)]
pub struct FakeCamera {
    pub behaviour: CameraBehaviour,
    pub opens: Arc<AtomicUsize>,
    pub stops: Arc<AtomicUsize>,
}

impl FakeCamera {
    pub fn new(behaviour: CameraBehaviour) -> Self {
        Self {
            behaviour,
            opens: Arc::new(AtomicUsize::new(0)),
            stops: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }
}

struct FakeStream {
    behaviour: CameraBehaviour,
    stops: Arc<AtomicUsize>,
    live: bool,
}

impl Camera for FakeCamera {
    fn open(&self, constraints: &CaptureConstraints) -> Result<Box<dyn CameraStream>> {
        if self.behaviour == CameraBehaviour::Deny {
            return Err(Error::CameraDenied("permission dismissed".into()));
        }
        assert_eq!(constraints.facing, Facing::Rear);
        self.opens.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeStream {
            behaviour: self.behaviour,
            stops: self.stops.clone(),
            live: true,
        }))
    }
}

impl CameraStream for FakeStream {
    fn settings(&self) -> StreamSettings {
        StreamSettings {
            width: 1280,
            height: 720,
            facing: Facing::Rear,
        }
    }

    fn snapshot(&mut self, _quality: f32) -> Result<ImageAsset> {
        assert!(self.live, "snapshot after stop");
        match self.behaviour {
            CameraBehaviour::FailSnapshot => Err(Error::CaptureFailed("sensor error".into())),
            _ => Ok(photo()),
        }
    }

    fn stop(&mut self) {
        if self.live {
            self.live = false;
            self.stops.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[derive(Clone, Copy, PartialEq)]
pub enum ShareBehaviour {
    Unsupported,
    Accept,
    Fail,
}

/// Share target that records what it was asked to share.
#[derive(Clone)]
pub struct RecordingShare {
    pub behaviour: ShareBehaviour,
    pub requests: Arc<Mutex<Vec<ShareRequest>>>,
}

impl RecordingShare {
    pub fn new(behaviour: ShareBehaviour) -> Self {
        Self {
            behaviour,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn requests(&self) -> Vec<ShareRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl ShareTarget for RecordingShare {
    fn can_share_files(&self) -> bool {
        self.behaviour != ShareBehaviour::Unsupported
    }

    fn share(&self, request: &ShareRequest) -> Result<()> {
        self.requests.lock().unwrap().push(request.clone());
        match self.behaviour {
            ShareBehaviour::Accept => Ok(()),
            ShareBehaviour::Fail => Err(Error::ShareError("share sheet closed".into())),
            ShareBehaviour::Unsupported => Err(Error::ShareUnavailable),
        }
    }
}

/// Downloader that keeps saved files in memory, or refuses every save.
#[derive(Clone, Default)]
pub struct MemoryDownloader {
    pub saved: Arc<Mutex<Vec<(String, Vec<u8>)>>>,
    pub fail: bool,
}

impl MemoryDownloader {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn saved(&self) -> Vec<(String, Vec<u8>)> {
        self.saved.lock().unwrap().clone()
    }
}

impl Downloader for MemoryDownloader {
    fn save(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
        if self.fail {
            return Err(Error::ExportError(format!("{}: disk full", filename)));
        }
        self.saved
            .lock()
            .unwrap()
            .push((filename.to_string(), bytes.to_vec()));
        Ok(PathBuf::from("downloads").join(filename))
    }
}

/// Picker that hands out the test photo for any hinted name and records the
/// hints it was given. Without a hint it behaves like a cancelled dialog.
#[derive(Clone, Default)]
pub struct FakePicker {
    pub hints: Arc<Mutex<Vec<PathBuf>>>,
}

impl FakePicker {
    pub fn hints(&self) -> Vec<PathBuf> {
        self.hints.lock().unwrap().clone()
    }
}

impl FilePicker for FakePicker {
    fn pick(&self, accept: &str, hint: Option<&Path>) -> Result<Option<PickedFile>> {
        assert_eq!(accept, "image/*");
        let Some(hint) = hint else {
            return Ok(None);
        };
        self.hints.lock().unwrap().push(hint.to_path_buf());
        Ok(Some(PickedFile {
            name: hint.display().to_string(),
            mime: Some("image/png".to_string()),
            bytes: photo().bytes().to_vec(),
        }))
    }
}
