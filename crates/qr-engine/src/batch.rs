//! Sequential table-code batches and ZIP bundling.
//!
//! A batch is not transactional: a failure at one table stops the loop and
//! reports the paths already written, in order, so callers can retry the
//! failed suffix.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{QrError, Result};
use crate::generate::Synthesizer;
use crate::logo::LogoLoader;
use crate::output::{DirSink, ImageSink, encode_png};
use crate::payload::table_url;
use crate::style::{StyleConfig, StyleOverrides};

/// What to generate: one code per table in `start_index..=end_index`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableBatch {
    pub base_url: String,
    pub restaurant_id: String,
    pub start_index: u32,
    pub end_index: u32,
    /// Files are named `{file_prefix}-{i}.png`.
    pub file_prefix: String,
    /// Labels read `{label_prefix} {i}`.
    pub label_prefix: String,
}

impl TableBatch {
    pub fn new(
        base_url: impl Into<String>,
        restaurant_id: impl Into<String>,
        start_index: u32,
        end_index: u32,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            restaurant_id: restaurant_id.into(),
            start_index,
            end_index,
            file_prefix: "table".into(),
            label_prefix: "Table".into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.start_index > self.end_index {
            return Err(QrError::InvalidRange {
                start: self.start_index,
                end: self.end_index,
            });
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        if self.start_index > self.end_index {
            0
        } else {
            (self.end_index - self.start_index) as usize + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn payload(&self, index: u32) -> String {
        table_url(&self.base_url, &self.restaurant_id, index)
    }

    pub fn file_name(&self, index: u32) -> String {
        format!("{}-{index}.png", self.file_prefix)
    }

    pub fn label(&self, index: u32) -> String {
        format!("{} {index}", self.label_prefix)
    }
}

/// Wire form of a batch request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRequest {
    pub base_url: String,
    pub restaurant_id: String,
    pub start_index: u32,
    pub end_index: u32,
    pub output_dir: PathBuf,
    #[serde(default)]
    pub template_id: Option<String>,
    #[serde(default)]
    pub style_overrides: StyleOverrides,
}

impl BatchRequest {
    pub fn table_batch(&self) -> TableBatch {
        TableBatch::new(
            self.base_url.clone(),
            self.restaurant_id.clone(),
            self.start_index,
            self.end_index,
        )
    }

    pub fn style(&self) -> Result<StyleConfig> {
        StyleConfig::from_template_and_overrides(self.template_id.as_deref(), &self.style_overrides)
    }
}

/// Successful batch result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchOutput {
    pub paths: Vec<PathBuf>,
    pub count: usize,
}

impl BatchOutput {
    fn new(paths: Vec<PathBuf>) -> Self {
        let count = paths.len();
        Self { paths, count }
    }
}

/// Why a batch did not complete.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    /// Rejected before any image was generated.
    #[error("batch rejected: {0}")]
    Rejected(#[source] QrError),

    /// Stopped at `index`; `written` holds the earlier paths in order.
    #[error("batch aborted at table {index} after {} images: {source}", written.len())]
    Aborted {
        index: u32,
        written: Vec<PathBuf>,
        #[source]
        source: QrError,
    },
}

impl BatchError {
    /// Paths written before the failure (empty when rejected).
    pub fn written(&self) -> &[PathBuf] {
        match self {
            BatchError::Rejected(_) => &[],
            BatchError::Aborted { written, .. } => written,
        }
    }

    pub fn source_error(&self) -> &QrError {
        match self {
            BatchError::Rejected(e) => e,
            BatchError::Aborted { source, .. } => source,
        }
    }
}

impl<L: LogoLoader> Synthesizer<L> {
    /// Generate one labeled image per table, ascending, into `sink`.
    pub fn generate_sequential_batch(
        &self,
        batch: &TableBatch,
        style: &StyleConfig,
        sink: &mut impl ImageSink,
    ) -> std::result::Result<BatchOutput, BatchError> {
        batch.validate().map_err(BatchError::Rejected)?;
        let style = style.clone().prepare().map_err(BatchError::Rejected)?;

        info!(
            restaurant_id = %batch.restaurant_id,
            start = batch.start_index,
            end = batch.end_index,
            "Generating table QR batch"
        );

        let mut written = Vec::new();
        for index in batch.start_index..=batch.end_index {
            match self.generate_table(batch, index, &style, sink) {
                Ok(path) => written.push(path),
                Err(source) => {
                    warn!(
                        index,
                        written = written.len(),
                        error = %source,
                        "Table QR batch aborted"
                    );
                    return Err(BatchError::Aborted {
                        index,
                        written,
                        source,
                    });
                }
            }
        }

        info!(count = written.len(), "Table QR batch complete");
        Ok(BatchOutput::new(written))
    }

    fn generate_table(
        &self,
        batch: &TableBatch,
        index: u32,
        style: &StyleConfig,
        sink: &mut impl ImageSink,
    ) -> Result<PathBuf> {
        let img = self.render_labeled_prepared(&batch.payload(index), &batch.label(index), style)?;
        let png = encode_png(&img)?;
        sink.write(&batch.file_name(index), &png)
    }
}

/// Generate a table batch into `output_dir` (created if missing) with the
/// filesystem logo loader and bundled label font.
pub fn generate_sequential_batch(
    base_url: &str,
    restaurant_id: &str,
    start_index: u32,
    end_index: u32,
    output_dir: &Path,
    style: &StyleConfig,
) -> std::result::Result<BatchOutput, BatchError> {
    let batch = TableBatch::new(base_url, restaurant_id, start_index, end_index);
    batch.validate().map_err(BatchError::Rejected)?;
    let synth = Synthesizer::new().map_err(BatchError::Rejected)?;
    let mut sink = DirSink::create(output_dir).map_err(BatchError::Rejected)?;
    synth.generate_sequential_batch(&batch, style, &mut sink)
}

/// Bundle `paths` into a deflate ZIP at `zip_path`, entries named by file name.
pub fn archive_batch(paths: &[PathBuf], zip_path: &Path) -> Result<PathBuf> {
    let file = File::create(zip_path).map_err(|e| QrError::io(zip_path, e))?;
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated);

    for path in paths {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| QrError::Archive(format!("no file name in {}", path.display())))?;
        zip.start_file(name.as_str(), options)
            .map_err(|e| QrError::Archive(e.to_string()))?;
        let mut f = File::open(path).map_err(|e| QrError::io(path, e))?;
        std::io::copy(&mut f, &mut zip).map_err(|e| QrError::io(zip_path, e))?;
    }

    zip.finish().map_err(|e| QrError::Archive(e.to_string()))?;
    info!(path = %zip_path.display(), entries = paths.len(), "Wrote batch archive");
    Ok(zip_path.to_path_buf())
}
