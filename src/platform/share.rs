//! Native share and download ports.

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// A file attached to a share request.
#[derive(Debug, Clone, PartialEq)]
pub struct SharedFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShareRequest {
    pub title: String,
    pub text: String,
    pub files: Vec<SharedFile>,
}

pub trait ShareTarget: Send + Sync {
    /// Whether the platform can share files at all.
    fn can_share_files(&self) -> bool;

    /// Open the platform share flow.
    fn share(&self, request: &ShareRequest) -> Result<()>;
}

/// Browser-style "save as download".
pub trait Downloader: Send + Sync {
    /// Save `bytes` under `filename`, returning where they ended up.
    fn save(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf>;
}

/// Share target for platforms without native sharing.
pub struct NoShare;

impl ShareTarget for NoShare {
    fn can_share_files(&self) -> bool {
        false
    }

    fn share(&self, _request: &ShareRequest) -> Result<()> {
        Err(Error::ShareUnavailable)
    }
}

/// Writes downloads into a directory, creating it when needed.
pub struct DirectoryDownloader {
    dir: PathBuf,
}

impl DirectoryDownloader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Downloader for DirectoryDownloader {
    fn save(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)
            .map_err(|e| Error::ExportError(format!("{}: {}", self.dir.display(), e)))?;
        let path = self.dir.join(filename);
        std::fs::write(&path, bytes)
            .map_err(|e| Error::ExportError(format!("{}: {}", path.display(), e)))?;
        Ok(path)
    }
}

/// Accepts every download without writing anything.
pub struct NullDownloader;

impl Downloader for NullDownloader {
    fn save(&self, filename: &str, _bytes: &[u8]) -> Result<PathBuf> {
        Ok(PathBuf::from(filename))
    }
}
