//! Module-level rasterization of a [`Symbol`] onto an RGBA canvas.

use image::RgbaImage;
use tracing::debug;

use crate::paint::{Outline, Paint, fill_outline};
use crate::style::StyleConfig;
use crate::symbol::Symbol;

/// Pixel geometry of a rendered symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    /// Modules per side.
    pub modules: u32,
    /// Pixels per module.
    pub scale: u32,
    /// Quiet zone in pixels.
    pub margin_px: u32,
}

impl Geometry {
    pub fn new(symbol: &Symbol, style: &StyleConfig) -> Self {
        Self {
            modules: symbol.width() as u32,
            scale: style.scale,
            margin_px: style.margin * style.scale,
        }
    }

    /// Side length of the square canvas: `N*scale + 2*margin*scale`.
    pub fn canvas_size(&self) -> u32 {
        self.symbol_extent() + 2 * self.margin_px
    }

    /// Side length of the symbol itself, without quiet zone.
    pub fn symbol_extent(&self) -> u32 {
        self.modules * self.scale
    }

    /// Pixel origin of module `(row, col)`.
    pub fn module_origin(&self, row: usize, col: usize) -> (u32, u32) {
        (
            col as u32 * self.scale + self.margin_px,
            row as u32 * self.scale + self.margin_px,
        )
    }
}

/// A rendered symbol. Single owner; later passes mutate it in place.
#[derive(Debug, Clone)]
pub struct Canvas {
    pub image: RgbaImage,
    pub geometry: Geometry,
}

impl Canvas {
    pub fn size(&self) -> u32 {
        self.geometry.canvas_size()
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

/// Paint every dark module of `symbol` with the style's shape and paint.
///
/// The background is filled with `colorLight` before any module is drawn.
pub fn rasterize(symbol: &Symbol, style: &StyleConfig) -> Canvas {
    let geometry = Geometry::new(symbol, style);
    let size = geometry.canvas_size();
    let mut image = RgbaImage::from_pixel(size, size, style.color_light.to_rgba());

    let paint = Paint::for_style(style, geometry.margin_px, geometry.symbol_extent());
    let outline = Outline::for_module(style);
    let scale = geometry.scale;

    for (row, col) in symbol.dark_modules() {
        let (x, y) = geometry.module_origin(row, col);
        fill_outline(&mut image, x, y, scale, scale, outline, |px, py| {
            paint.color_at(px, py)
        });
    }

    debug!(
        modules = geometry.modules,
        scale,
        size,
        shape = ?style.shape,
        gradient = style.gradient_colors.is_some(),
        "Rasterized QR symbol"
    );

    Canvas { image, geometry }
}
