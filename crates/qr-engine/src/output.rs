//! PNG encoding and output destinations.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbaImage};
use serde::Serialize;

use crate::error::{QrError, Result};

/// A written image: the bytes and where they landed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedImage {
    pub path: PathBuf,
    #[serde(skip)]
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Encode an RGBA canvas as PNG bytes.
pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)?;
    Ok(buf.into_inner())
}

/// Destination for named PNG files.
pub trait ImageSink {
    /// Store `png` under `file_name` and return the resulting path.
    fn write(&mut self, file_name: &str, png: &[u8]) -> Result<PathBuf>;
}

/// Writes files into a directory on disk.
#[derive(Debug, Clone)]
pub struct DirSink {
    dir: PathBuf,
}

impl DirSink {
    /// Use `dir`, creating it (and parents) if missing.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| QrError::io(&dir, e))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ImageSink for DirSink {
    fn write(&mut self, file_name: &str, png: &[u8]) -> Result<PathBuf> {
        let path = self.dir.join(file_name);
        write_file(&path, png)?;
        Ok(path)
    }
}

/// Keeps files in memory; paths are virtual, rooted at `root`.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    root: PathBuf,
    files: Vec<(PathBuf, Vec<u8>)>,
}

impl MemorySink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            files: Vec::new(),
        }
    }

    pub fn files(&self) -> &[(PathBuf, Vec<u8>)] {
        &self.files
    }

    pub fn get(&self, path: &Path) -> Option<&[u8]> {
        self.files
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, bytes)| bytes.as_slice())
    }
}

impl ImageSink for MemorySink {
    fn write(&mut self, file_name: &str, png: &[u8]) -> Result<PathBuf> {
        let path = self.root.join(file_name);
        self.files.retain(|(p, _)| p != &path);
        self.files.push((path.clone(), png.to_vec()));
        Ok(path)
    }
}

/// Write bytes to an exact path. Parent directories are not created.
pub fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes).map_err(|e| QrError::io(path, e))
}
