//! Error types for QR synthesis.

use std::path::PathBuf;

use crate::style::EccLevel;

/// Errors produced while building, rendering, or writing a QR image.
#[derive(Debug, thiserror::Error)]
pub enum QrError {
    #[error("QR payload is empty")]
    EmptyPayload,

    #[error("payload of {len} bytes exceeds QR capacity at error correction level {ecc}")]
    PayloadTooLarge { len: usize, ecc: EccLevel },

    #[error("QR encode error: {0}")]
    Encode(String),

    #[error("invalid style: {0}")]
    InvalidStyle(String),

    #[error("logo size ratio {0} is outside (0, 0.3]")]
    InvalidLogoRatio(f64),

    #[error("failed to load logo {}: {source}", path.display())]
    LogoLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("invalid table range {start}..={end}")]
    InvalidRange { start: u32, end: u32 },

    #[error("invalid label font: {0}")]
    Font(String),

    #[error("image encode error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("archive error: {0}")]
    Archive(String),
}

impl QrError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = QrError> = std::result::Result<T, E>;
