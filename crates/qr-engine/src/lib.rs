//! Styled QR image synthesis for restaurant menus and tables.
//!
//! Builds a QR symbol from a payload, rasterizes it with a module shape and
//! optional gradient, redraws the three finder patterns, and optionally
//! places a circular logo in the center. Table batches add a text label
//! under each code and write `table-{n}.png` files in ascending order.

pub mod batch;
pub mod compose;
pub mod error;
pub mod finder;
pub mod generate;
pub mod logo;
pub mod output;
pub mod paint;
pub mod payload;
pub mod raster;
pub mod style;
pub mod symbol;
pub mod templates;
pub mod text;

// Re-exports for convenience
pub use batch::{
    BatchError, BatchOutput, BatchRequest, TableBatch, archive_batch, generate_sequential_batch,
};
pub use error::{QrError, Result};
pub use generate::Synthesizer;
pub use logo::{FsLogoLoader, LogoLoader, add_logo};
pub use output::{DirSink, GeneratedImage, ImageSink, MemorySink, encode_png};
pub use payload::{
    WifiAuth, generate_short_code, menu_url, restaurant_page_url, table_url, wifi_payload,
};
pub use style::{Color, EccLevel, ModuleShape, StyleConfig, StyleOverrides};
pub use symbol::{Symbol, build_symbol};
pub use templates::{Template, find_template, list_templates};
pub use text::LabelFont;
