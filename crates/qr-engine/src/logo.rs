//! Logo compositing: a circular, ringed logo centered on the symbol.
//!
//! The compositor cannot raise the redundancy of an already rasterized
//! symbol; callers embedding a logo are expected to render at ECC level H
//! (see [`crate::style::StyleConfig::prepare`]).

use std::path::Path;

use image::imageops::FilterType;
use image::{DynamicImage, Rgba, RgbaImage};
use tracing::debug;

use crate::compose::blend_onto;
use crate::error::{QrError, Result};
use crate::style::validate_logo_ratio;

/// Ring width as a fraction of the logo diameter.
const RING_WIDTH_RATIO: f32 = 0.05;

/// Source of logo images. Injectable so tests can simulate failures.
pub trait LogoLoader {
    fn load(&self, path: &Path) -> Result<DynamicImage>;
}

/// Reads logos from the filesystem, guessing the format from content.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLogoLoader;

impl LogoLoader for FsLogoLoader {
    fn load(&self, path: &Path) -> Result<DynamicImage> {
        let load = || -> std::result::Result<DynamicImage, image::ImageError> {
            image::ImageReader::open(path)?
                .with_guessed_format()?
                .decode()
        };
        load().map_err(|source| QrError::LogoLoad {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl<L: LogoLoader + ?Sized> LogoLoader for &L {
    fn load(&self, path: &Path) -> Result<DynamicImage> {
        (**self).load(path)
    }
}

/// Load the logo at `logo_path` and composite it onto `canvas`.
///
/// The ratio is checked before the logo is read.
pub fn add_logo(
    canvas: &mut RgbaImage,
    loader: &impl LogoLoader,
    logo_path: &Path,
    logo_size_ratio: f64,
    ring: Rgba<u8>,
) -> Result<()> {
    validate_logo_ratio(logo_size_ratio)?;
    let logo = loader.load(logo_path)?;
    composite_logo(canvas, &logo, logo_size_ratio, ring)
}

/// Composite an already decoded logo, clipped to a circle of diameter
/// `canvas_width * ratio`, with a `ring`-colored border around the clip.
pub fn composite_logo(
    canvas: &mut RgbaImage,
    logo: &DynamicImage,
    logo_size_ratio: f64,
    ring: Rgba<u8>,
) -> Result<()> {
    validate_logo_ratio(logo_size_ratio)?;

    let canvas_size = canvas.width().min(canvas.height());
    let logo_size = ((canvas_size as f64 * logo_size_ratio).round() as u32).max(1);
    let resized = logo
        .resize_exact(logo_size, logo_size, FilterType::Lanczos3)
        .to_rgba8();

    let x0 = (canvas.width() - logo_size) / 2;
    let y0 = (canvas.height() - logo_size) / 2;
    let radius = logo_size as f32 / 2.0;
    let ring_width = (logo_size as f32 * RING_WIDTH_RATIO).max(1.0);
    let (cx, cy) = (x0 as f32 + radius, y0 as f32 + radius);

    // Logo pixels clipped to the circle.
    for (dx, dy, pixel) in resized.enumerate_pixels() {
        let (px, py) = (dx as f32 + 0.5, dy as f32 + 0.5);
        let (ex, ey) = (px - radius, py - radius);
        if ex * ex + ey * ey <= radius * radius {
            blend_onto(canvas, x0 + dx, y0 + dy, *pixel);
        }
    }

    // Ring centered on the clip edge.
    let inner = (radius - ring_width / 2.0).max(0.0);
    let outer = radius + ring_width / 2.0;
    let reach = outer.ceil() as i64 + 1;
    for oy in -reach..=reach {
        for ox in -reach..=reach {
            let x = cx.floor() as i64 + ox;
            let y = cy.floor() as i64 + oy;
            if x < 0 || y < 0 {
                continue;
            }
            let (ex, ey) = (x as f32 + 0.5 - cx, y as f32 + 0.5 - cy);
            let d = (ex * ex + ey * ey).sqrt();
            if d >= inner && d <= outer {
                blend_onto(canvas, x as u32, y as u32, ring);
            }
        }
    }

    debug!(logo_size, ring_width, "Composited logo");
    Ok(())
}
