//! Single-image entry points: symbol, rasterize, finder patterns, logo.

use std::path::Path;

use ab_glyph::PxScale;
use image::RgbaImage;
use tracing::debug;

use crate::compose::extend_bottom;
use crate::error::Result;
use crate::finder::enhance_finder_patterns;
use crate::logo::{FsLogoLoader, LogoLoader, add_logo};
use crate::output::{GeneratedImage, encode_png, write_file};
use crate::raster::rasterize;
use crate::style::StyleConfig;
use crate::symbol::build_symbol;
use crate::text::{LabelFont, draw_centered_label};

/// Label band height in modules.
const LABEL_BAND_MODULES: u32 = 3;

/// Label font size in modules.
const LABEL_FONT_MODULES: f32 = 2.0;

/// Renders styled QR images. Holds no per-call state; safe to reuse.
#[derive(Debug, Clone)]
pub struct Synthesizer<L = FsLogoLoader> {
    loader: L,
    font: LabelFont,
}

impl Synthesizer<FsLogoLoader> {
    /// Filesystem logo loader and the bundled label font.
    pub fn new() -> Result<Self> {
        Ok(Self {
            loader: FsLogoLoader,
            font: LabelFont::bundled()?,
        })
    }
}

impl<L: LogoLoader> Synthesizer<L> {
    pub fn with_logo_loader<M: LogoLoader>(self, loader: M) -> Synthesizer<M> {
        Synthesizer {
            loader,
            font: self.font,
        }
    }

    pub fn with_label_font(mut self, font: LabelFont) -> Self {
        self.font = font;
        self
    }

    /// Render `payload` with `style`, validating the style first.
    pub fn render(&self, payload: &str, style: &StyleConfig) -> Result<RgbaImage> {
        let style = style.clone().prepare()?;
        self.render_prepared(payload, &style)
    }

    /// Render and encode as PNG bytes, for callers that stream the result.
    pub fn render_png(&self, payload: &str, style: &StyleConfig) -> Result<Vec<u8>> {
        encode_png(&self.render(payload, style)?)
    }

    /// Render and write a PNG to `path`. The parent directory must exist.
    pub fn generate_to_path(
        &self,
        payload: &str,
        path: &Path,
        style: &StyleConfig,
    ) -> Result<GeneratedImage> {
        let img = self.render(payload, style)?;
        let png = encode_png(&img)?;
        write_file(path, &png)?;
        debug!(path = %path.display(), bytes = png.len(), "Wrote QR image");
        Ok(GeneratedImage {
            path: path.to_path_buf(),
            png,
            width: img.width(),
            height: img.height(),
        })
    }

    /// Render with a text label in a band beneath the symbol.
    pub fn render_labeled(
        &self,
        payload: &str,
        label: &str,
        style: &StyleConfig,
    ) -> Result<RgbaImage> {
        let style = style.clone().prepare()?;
        self.render_labeled_prepared(payload, label, &style)
    }

    /// Render assuming `style` already went through [`StyleConfig::prepare`].
    pub(crate) fn render_prepared(&self, payload: &str, style: &StyleConfig) -> Result<RgbaImage> {
        let symbol = build_symbol(payload, style.error_correction_level)?;
        let mut canvas = rasterize(&symbol, style);
        enhance_finder_patterns(&mut canvas, &symbol, style);

        if let Some(logo_path) = &style.logo_path {
            add_logo(
                &mut canvas.image,
                &self.loader,
                logo_path,
                style.logo_size_ratio,
                style.color_light.to_rgba(),
            )?;
        }

        Ok(canvas.into_image())
    }

    pub(crate) fn render_labeled_prepared(
        &self,
        payload: &str,
        label: &str,
        style: &StyleConfig,
    ) -> Result<RgbaImage> {
        let symbol_img = self.render_prepared(payload, style)?;
        let band = LABEL_BAND_MODULES * style.scale;
        let mut img = extend_bottom(&symbol_img, band, style.color_light.to_rgba());
        let font_px = LABEL_FONT_MODULES * style.scale as f32;
        draw_centered_label(
            &mut img,
            self.font.font(),
            PxScale::from(font_px),
            symbol_img.height(),
            band,
            label,
            style.color_dark.to_rgba(),
        );
        Ok(img)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QrError;
    use crate::style::{EccLevel, ModuleShape};
    use image::{DynamicImage, Rgba};
    use std::path::PathBuf;

    struct SolidLogo;

    impl LogoLoader for SolidLogo {
        fn load(&self, _path: &Path) -> Result<DynamicImage> {
            Ok(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
                32,
                32,
                Rgba([200, 30, 30, 255]),
            )))
        }
    }

    #[test]
    fn render_matches_canvas_formula() {
        let synth = Synthesizer::new().unwrap();
        let style = StyleConfig {
            scale: 4,
            margin: 2,
            ..StyleConfig::default()
        };
        let payload = "https://qrmenu.example.com/m/abc";
        let img = synth.render(payload, &style).unwrap();
        let n = build_symbol(payload, EccLevel::M).unwrap().width() as u32;
        assert_eq!(img.dimensions(), (n * 4 + 16, n * 4 + 16));
    }

    #[test]
    fn render_is_repeatable_for_every_shape() {
        let synth = Synthesizer::new().unwrap();
        for shape in [
            ModuleShape::Square,
            ModuleShape::Rounded,
            ModuleShape::Circle,
            ModuleShape::Diamond,
        ] {
            let style = StyleConfig {
                shape,
                ..StyleConfig::default()
            };
            let a = synth.render_png("repeat", &style).unwrap();
            let b = synth.render_png("repeat", &style).unwrap();
            assert_eq!(a, b, "{shape:?}");
        }
    }

    #[test]
    fn logo_lands_in_center() {
        let synth = Synthesizer::new().unwrap().with_logo_loader(SolidLogo);
        let style = StyleConfig {
            logo_path: Some(PathBuf::from("logo.png")),
            ..StyleConfig::default()
        };
        let img = synth.render("https://qrmenu.example.com/m/logo", &style).unwrap();
        let c = img.width() / 2;
        assert_eq!(*img.get_pixel(c, c), Rgba([200, 30, 30, 255]));
    }

    #[test]
    fn invalid_ratio_fails_before_loading() {
        let synth = Synthesizer::new().unwrap();
        let style = StyleConfig {
            logo_path: Some(PathBuf::from("/missing/logo.png")),
            logo_size_ratio: 0.31,
            ..StyleConfig::default()
        };
        assert!(matches!(
            synth.render("x", &style),
            Err(QrError::InvalidLogoRatio(_))
        ));
    }

    #[test]
    fn missing_logo_is_load_error() {
        let synth = Synthesizer::new().unwrap();
        let style = StyleConfig {
            logo_path: Some(PathBuf::from("/missing/logo.png")),
            ..StyleConfig::default()
        };
        assert!(matches!(
            synth.render("x", &style),
            Err(QrError::LogoLoad { .. })
        ));
    }

    #[test]
    fn labeled_render_extends_height() {
        let synth = Synthesizer::new().unwrap();
        let style = StyleConfig::default();
        let plain = synth.render("label", &style).unwrap();
        let labeled = synth.render_labeled("label", "Table 3", &style).unwrap();
        assert_eq!(labeled.width(), plain.width());
        assert_eq!(labeled.height(), plain.height() + 3 * style.scale);
        let white = Rgba([255, 255, 255, 255]);
        let band_has_ink = (plain.height()..labeled.height())
            .any(|y| (0..labeled.width()).any(|x| *labeled.get_pixel(x, y) != white));
        assert!(band_has_ink);
    }

    #[test]
    fn generate_to_path_writes_png() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("qr.png");
        let synth = Synthesizer::new().unwrap();
        let out = synth
            .generate_to_path("https://qrmenu.example.com/m/x", &path, &StyleConfig::default())
            .unwrap();
        assert_eq!(out.path, path);
        assert_eq!(std::fs::read(&path).unwrap(), out.png);
        assert_eq!(out.width, out.height);
    }

    #[test]
    fn generate_to_missing_directory_is_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nope/qr.png");
        let synth = Synthesizer::new().unwrap();
        assert!(matches!(
            synth.generate_to_path("x", &path, &StyleConfig::default()),
            Err(QrError::Io { .. })
        ));
    }
}
