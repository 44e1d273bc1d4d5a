//! Label text rendering for batch table codes.

use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;

use crate::error::{QrError, Result};

/// DejaVu Sans Bold, shipped so labels render without system fonts.
const BUNDLED_FONT: &[u8] = include_bytes!("../assets/fonts/DejaVuSans-Bold.ttf");

/// Font used to draw labels under table codes.
#[derive(Clone)]
pub struct LabelFont {
    font: FontArc,
}

impl LabelFont {
    pub fn bundled() -> Result<Self> {
        let font =
            FontArc::try_from_slice(BUNDLED_FONT).map_err(|e| QrError::Font(e.to_string()))?;
        Ok(Self { font })
    }

    /// Load caller-provided TTF/OTF bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let font = FontArc::try_from_vec(data).map_err(|e| QrError::Font(e.to_string()))?;
        Ok(Self { font })
    }

    pub fn font(&self) -> &FontArc {
        &self.font
    }
}

impl std::fmt::Debug for LabelFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabelFont").finish_non_exhaustive()
    }
}

/// Measure the pixel width of a string at the given font and scale.
pub fn measure_text_width(font: &impl Font, scale: PxScale, text: &str) -> u32 {
    let scaled = font.as_scaled(scale);
    let mut width = 0.0f32;
    let mut prev_glyph: Option<ab_glyph::GlyphId> = None;

    for ch in text.chars() {
        let glyph_id = scaled.glyph_id(ch);
        if let Some(prev) = prev_glyph {
            width += scaled.kern(prev, glyph_id);
        }
        width += scaled.h_advance(glyph_id);
        prev_glyph = Some(glyph_id);
    }

    width.ceil() as u32
}

/// Compute the line height for the given font and scale.
pub fn line_height(font: &impl Font, scale: PxScale) -> u32 {
    let scaled = font.as_scaled(scale);
    (scaled.ascent() - scaled.descent() + scaled.line_gap()).ceil() as u32
}

/// Draw `text` horizontally centered and vertically centered inside the band
/// `[band_top, band_top + band_height)`.
pub fn draw_centered_label(
    img: &mut RgbaImage,
    font: &impl Font,
    scale: PxScale,
    band_top: u32,
    band_height: u32,
    text: &str,
    color: Rgba<u8>,
) {
    let text_width = measure_text_width(font, scale, text) as i32;
    let x = ((img.width() as i32) - text_width).max(0) / 2;
    let lh = line_height(font, scale) as i32;
    let y = band_top as i32 + ((band_height as i32) - lh) / 2;
    draw_text_mut(img, color, x, y, scale, font, text);
}
