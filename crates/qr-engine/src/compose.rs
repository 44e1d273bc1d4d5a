//! Pixel compositing helpers: alpha blending and canvas extension.

use image::{Rgba, RgbaImage};

/// Alpha-composite `fg` over the pixel at `(x, y)`. Out-of-bounds is a no-op.
pub fn blend_onto(base: &mut RgbaImage, x: u32, y: u32, fg: Rgba<u8>) {
    if x >= base.width() || y >= base.height() {
        return;
    }
    let alpha = fg[3] as f32 / 255.0;
    if alpha > 0.99 {
        base.put_pixel(x, y, fg);
    } else if alpha > 0.01 {
        let bg = *base.get_pixel(x, y);
        base.put_pixel(x, y, blend_pixel(&bg, &fg, alpha));
    }
}

fn blend_pixel(bg: &Rgba<u8>, fg: &Rgba<u8>, alpha: f32) -> Rgba<u8> {
    let inv = 1.0 - alpha;
    Rgba([
        (fg[0] as f32 * alpha + bg[0] as f32 * inv) as u8,
        (fg[1] as f32 * alpha + bg[1] as f32 * inv) as u8,
        (fg[2] as f32 * alpha + bg[2] as f32 * inv) as u8,
        bg[3].max(fg[3]),
    ])
}

/// Copy `img` onto a taller canvas whose extra `band_height` rows at the
/// bottom are filled with `fill`.
pub fn extend_bottom(img: &RgbaImage, band_height: u32, fill: Rgba<u8>) -> RgbaImage {
    let (w, h) = img.dimensions();
    let mut out = RgbaImage::from_pixel(w, h + band_height, fill);
    for (x, y, pixel) in img.enumerate_pixels() {
        out.put_pixel(x, y, *pixel);
    }
    out
}
