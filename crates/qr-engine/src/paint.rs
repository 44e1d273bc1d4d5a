//! Fill styles and per-pixel shape coverage shared by the rasterizer and the
//! finder pattern pass.

use image::{Rgba, RgbaImage};

use crate::style::{Color, ModuleShape, StyleConfig};

/// Foreground fill: a solid color or one linear gradient for the whole symbol.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    Solid(Color),
    Linear(LinearGradient),
}

/// Gradient between two points, clamped outside the segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearGradient {
    start: (f32, f32),
    end: (f32, f32),
    from: Color,
    to: Color,
}

impl LinearGradient {
    pub fn new(start: (f32, f32), end: (f32, f32), from: Color, to: Color) -> Self {
        Self {
            start,
            end,
            from,
            to,
        }
    }

    pub fn color_at(&self, x: f32, y: f32) -> Color {
        let (dx, dy) = (self.end.0 - self.start.0, self.end.1 - self.start.1);
        let len_sq = dx * dx + dy * dy;
        if len_sq <= f32::EPSILON {
            return self.from;
        }
        let t = ((x - self.start.0) * dx + (y - self.start.1) * dy) / len_sq;
        self.from.lerp(self.to, t)
    }
}

impl Paint {
    /// Build the foreground paint for a symbol whose bounding box starts at
    /// `origin` and spans `extent` pixels on each side.
    pub fn for_style(style: &StyleConfig, origin: u32, extent: u32) -> Self {
        match style.gradient_colors {
            Some([from, to]) => {
                let start = origin as f32;
                let end = (origin + extent) as f32;
                Paint::Linear(LinearGradient::new((start, start), (end, end), from, to))
            }
            None => Paint::Solid(style.color_dark),
        }
    }

    /// Color at the center of pixel `(x, y)`.
    pub fn color_at(&self, x: u32, y: u32) -> Rgba<u8> {
        match self {
            Paint::Solid(c) => c.to_rgba(),
            Paint::Linear(g) => g.color_at(x as f32 + 0.5, y as f32 + 0.5).to_rgba(),
        }
    }
}

/// Outline tested against pixel centers inside a `w x h` box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outline {
    Rect,
    RoundedRect { radius: f32 },
    Circle,
    Diamond,
}

impl Outline {
    /// Outline for one module of the given style.
    pub fn for_module(style: &StyleConfig) -> Self {
        match style.shape {
            ModuleShape::Square => Outline::Rect,
            ModuleShape::Rounded => Outline::RoundedRect {
                radius: style.effective_corner_radius(),
            },
            ModuleShape::Circle => Outline::Circle,
            ModuleShape::Diamond => Outline::Diamond,
        }
    }

    /// Whether the point `(x, y)`, relative to the box's top-left, is covered.
    pub fn contains(&self, w: f32, h: f32, x: f32, y: f32) -> bool {
        if x < 0.0 || y < 0.0 || x > w || y > h {
            return false;
        }
        let (cx, cy) = (w / 2.0, h / 2.0);
        match *self {
            Outline::Rect => true,
            Outline::RoundedRect { radius } => {
                let r = radius.clamp(0.0, w.min(h) / 2.0);
                let qx = x.clamp(r, w - r);
                let qy = y.clamp(r, h - r);
                let (ex, ey) = (x - qx, y - qy);
                ex * ex + ey * ey <= r * r
            }
            Outline::Circle => {
                let r = w.min(h) / 2.0;
                let (ex, ey) = (x - cx, y - cy);
                ex * ex + ey * ey <= r * r
            }
            Outline::Diamond => (x - cx).abs() / cx + (y - cy).abs() / cy <= 1.0,
        }
    }
}

/// Fill the covered pixels of an outline box at `(x0, y0)` with `color_at`.
pub fn fill_outline<F>(
    img: &mut RgbaImage,
    x0: u32,
    y0: u32,
    w: u32,
    h: u32,
    outline: Outline,
    color_at: F,
) where
    F: Fn(u32, u32) -> Rgba<u8>,
{
    let (wf, hf) = (w as f32, h as f32);
    for dy in 0..h {
        let y = y0 + dy;
        if y >= img.height() {
            break;
        }
        for dx in 0..w {
            let x = x0 + dx;
            if x >= img.width() {
                break;
            }
            if outline.contains(wf, hf, dx as f32 + 0.5, dy as f32 + 0.5) {
                img.put_pixel(x, y, color_at(x, y));
            }
        }
    }
}
