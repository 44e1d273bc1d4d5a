//! Style configuration: colors, module shapes, error correction, and the
//! template-base-plus-overrides merge used at every entry point.
//!
//! The JSON wire format is a flat camelCase object. Unknown keys are ignored
//! and missing keys fall back to [`StyleConfig::default`].

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use image::Rgba;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::error::{QrError, Result};
use crate::templates;

/// Largest accepted pixels-per-module value.
pub const MAX_SCALE: u32 = 100;

/// Largest accepted quiet zone, in modules.
pub const MAX_MARGIN: u32 = 64;

/// Upper bound (inclusive) for the logo size ratio.
pub const MAX_LOGO_RATIO: f64 = 0.3;

pub const DEFAULT_SCALE: u32 = 10;
pub const DEFAULT_MARGIN: u32 = 4;
pub const DEFAULT_LOGO_RATIO: f64 = 0.2;

/// An RGBA color, written on the wire as `#RGB`, `#RRGGBB` or `#RRGGBBAA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(pub [u8; 4]);

impl Color {
    pub const BLACK: Color = Color([0, 0, 0, 255]);
    pub const WHITE: Color = Color([255, 255, 255, 255]);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b, 255])
    }

    pub fn to_rgba(self) -> Rgba<u8> {
        Rgba(self.0)
    }

    /// Linear interpolation between two colors, `t` clamped to `[0, 1]`.
    pub fn lerp(self, other: Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mut out = [0u8; 4];
        for (i, channel) in out.iter_mut().enumerate() {
            let a = f32::from(self.0[i]);
            let b = f32::from(other.0[i]);
            *channel = (a + (b - a) * t).round() as u8;
        }
        Color(out)
    }
}

impl FromStr for Color {
    type Err = QrError;

    fn from_str(s: &str) -> Result<Self> {
        let hex = s.trim().trim_start_matches('#');
        let bad = || QrError::InvalidStyle(format!("invalid color {s:?}"));
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(bad());
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| bad());
        match hex.len() {
            3 => {
                let mut out = [255u8; 4];
                for (i, c) in hex.chars().enumerate() {
                    let v = c.to_digit(16).ok_or_else(bad)? as u8;
                    out[i] = v * 17;
                }
                Ok(Color(out))
            }
            6 => Ok(Color([byte(0)?, byte(2)?, byte(4)?, 255])),
            8 => Ok(Color([byte(0)?, byte(2)?, byte(4)?, byte(6)?])),
            _ => Err(bad()),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = QrError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.0;
        if a == 255 {
            write!(f, "#{r:02X}{g:02X}{b:02X}")
        } else {
            write!(f, "#{r:02X}{g:02X}{b:02X}{a:02X}")
        }
    }
}

/// QR error-correction level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EccLevel {
    L,
    #[default]
    M,
    Q,
    H,
}

impl fmt::Display for EccLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EccLevel::L => "L",
            EccLevel::M => "M",
            EccLevel::Q => "Q",
            EccLevel::H => "H",
        };
        f.write_str(s)
    }
}

impl From<EccLevel> for qrcode::EcLevel {
    fn from(level: EccLevel) -> Self {
        match level {
            EccLevel::L => qrcode::EcLevel::L,
            EccLevel::M => qrcode::EcLevel::M,
            EccLevel::Q => qrcode::EcLevel::Q,
            EccLevel::H => qrcode::EcLevel::H,
        }
    }
}

/// Shape used to paint each dark module.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleShape {
    #[default]
    Square,
    Rounded,
    Circle,
    Diamond,
}

/// Fully-typed style for one generation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StyleConfig {
    pub error_correction_level: EccLevel,
    /// Quiet zone width in modules.
    pub margin: u32,
    #[serde(alias = "foreground")]
    pub color_dark: Color,
    #[serde(alias = "background")]
    pub color_light: Color,
    pub shape: ModuleShape,
    /// Corner radius in pixels, only read for [`ModuleShape::Rounded`].
    pub corner_radius: Option<u32>,
    /// Pixels per module.
    pub scale: u32,
    pub gradient_colors: Option<[Color; 2]>,
    pub logo_path: Option<PathBuf>,
    pub logo_size_ratio: f64,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            error_correction_level: EccLevel::M,
            margin: DEFAULT_MARGIN,
            color_dark: Color::BLACK,
            color_light: Color::WHITE,
            shape: ModuleShape::Square,
            corner_radius: None,
            scale: DEFAULT_SCALE,
            gradient_colors: None,
            logo_path: None,
            logo_size_ratio: DEFAULT_LOGO_RATIO,
        }
    }
}

impl StyleConfig {
    /// Parse a stored or caller-supplied JSON style blob.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| QrError::InvalidStyle(e.to_string()))
    }

    /// Start from a catalog template (or the defaults) and apply overrides.
    pub fn from_template_and_overrides(
        template_id: Option<&str>,
        overrides: &StyleOverrides,
    ) -> Result<Self> {
        let base = match template_id {
            Some(id) => templates::find_template(id)
                .ok_or_else(|| QrError::InvalidStyle(format!("unknown template {id:?}")))?
                .style,
            None => StyleConfig::default(),
        };
        Ok(base.merged(overrides))
    }

    /// Return a copy with every key present in `overrides` replacing ours.
    pub fn merged(&self, overrides: &StyleOverrides) -> Self {
        let mut out = self.clone();
        if let Some(v) = overrides.error_correction_level {
            out.error_correction_level = v;
        }
        if let Some(v) = overrides.margin {
            out.margin = v;
        }
        if let Some(v) = overrides.color_dark {
            out.color_dark = v;
        }
        if let Some(v) = overrides.color_light {
            out.color_light = v;
        }
        if let Some(v) = overrides.shape {
            out.shape = v;
        }
        if let Some(v) = overrides.corner_radius {
            out.corner_radius = v;
        }
        if let Some(v) = overrides.scale {
            out.scale = v;
        }
        if let Some(v) = overrides.gradient_colors {
            out.gradient_colors = v;
        }
        if let Some(v) = &overrides.logo_path {
            out.logo_path = v.clone();
        }
        if let Some(v) = overrides.logo_size_ratio {
            out.logo_size_ratio = v;
        }
        out
    }

    /// Check structural constraints without changing anything.
    pub fn validate(&self) -> Result<()> {
        if self.scale == 0 || self.scale > MAX_SCALE {
            return Err(QrError::InvalidStyle(format!(
                "scale must be between 1 and {MAX_SCALE}, got {}",
                self.scale
            )));
        }
        if self.margin > MAX_MARGIN {
            return Err(QrError::InvalidStyle(format!(
                "margin must be at most {MAX_MARGIN}, got {}",
                self.margin
            )));
        }
        if self.logo_path.is_some() {
            validate_logo_ratio(self.logo_size_ratio)?;
        }
        Ok(())
    }

    /// Validate once at the entry point and settle caller-responsibility rules.
    ///
    /// A configured logo forces error correction level H.
    pub fn prepare(mut self) -> Result<Self> {
        self.validate()?;
        if self.logo_path.is_some() && self.error_correction_level != EccLevel::H {
            warn!(
                requested = %self.error_correction_level,
                "Logo requested; upgrading error correction to H"
            );
            self.error_correction_level = EccLevel::H;
        }
        if self.error_correction_level == EccLevel::L
            && matches!(self.shape, ModuleShape::Circle | ModuleShape::Diamond)
        {
            warn!(
                shape = ?self.shape,
                "Reduced-coverage module shape with ECC L may not scan reliably"
            );
        }
        Ok(self)
    }

    /// Corner radius in pixels for rounded modules, clamped to half a module.
    pub fn effective_corner_radius(&self) -> f32 {
        let scale = self.scale as f32;
        let radius = self
            .corner_radius
            .map(|r| r as f32)
            .unwrap_or(scale / 4.0);
        radius.clamp(0.0, scale / 2.0)
    }
}

/// Reject ratios outside `(0, 0.3]`, including NaN.
pub fn validate_logo_ratio(ratio: f64) -> Result<()> {
    if ratio > 0.0 && ratio <= MAX_LOGO_RATIO {
        Ok(())
    } else {
        Err(QrError::InvalidLogoRatio(ratio))
    }
}

/// Caller-supplied partial style. A key that is present always wins over the
/// template value; `null` clears nullable keys.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StyleOverrides {
    pub error_correction_level: Option<EccLevel>,
    pub margin: Option<u32>,
    #[serde(alias = "foreground")]
    pub color_dark: Option<Color>,
    #[serde(alias = "background")]
    pub color_light: Option<Color>,
    pub shape: Option<ModuleShape>,
    #[serde(deserialize_with = "double_option")]
    pub corner_radius: Option<Option<u32>>,
    pub scale: Option<u32>,
    #[serde(deserialize_with = "double_option")]
    pub gradient_colors: Option<Option<[Color; 2]>>,
    #[serde(deserialize_with = "double_option")]
    pub logo_path: Option<Option<PathBuf>>,
    pub logo_size_ratio: Option<f64>,
}

impl StyleOverrides {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| QrError::InvalidStyle(e.to_string()))
    }
}

/// Distinguish an absent key (outer `None`) from an explicit `null`.
fn double_option<'de, T, D>(de: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_parses_short_long_and_alpha_forms() {
        assert_eq!("#fff".parse::<Color>().unwrap(), Color::WHITE);
        assert_eq!(
            "#8B4513".parse::<Color>().unwrap(),
            Color::rgb(0x8B, 0x45, 0x13)
        );
        assert_eq!(
            "#00000080".parse::<Color>().unwrap(),
            Color([0, 0, 0, 0x80])
        );
        assert!("#12345".parse::<Color>().is_err());
        assert!("#gggggg".parse::<Color>().is_err());
    }

    #[test]
    fn color_displays_as_hex() {
        assert_eq!(Color::rgb(0, 0x88, 0xcc).to_string(), "#0088CC");
        assert_eq!(Color([1, 2, 3, 4]).to_string(), "#01020304");
    }

    #[test]
    fn lerp_hits_endpoints() {
        let a = Color::rgb(0, 0, 0);
        let b = Color::rgb(200, 100, 50);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Color::rgb(100, 50, 25));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let style = StyleConfig::from_json("{}").unwrap();
        assert_eq!(style, StyleConfig::default());
        assert_eq!(style.error_correction_level, EccLevel::M);
        assert_eq!(style.margin, 4);
        assert_eq!(style.color_dark, Color::BLACK);
        assert_eq!(style.color_light, Color::WHITE);
        assert_eq!(style.shape, ModuleShape::Square);
        assert!(style.scale >= 4);
    }

    #[test]
    fn unknown_fields_are_ignored_and_aliases_accepted() {
        let style = StyleConfig::from_json(
            r##"{
                "style": "custom",
                "foreground": "#112233",
                "background": "#FFF8DC",
                "shape": "diamond",
                "logo": null
            }"##,
        )
        .unwrap();
        assert_eq!(style.color_dark, Color::rgb(0x11, 0x22, 0x33));
        assert_eq!(style.color_light, Color::rgb(0xFF, 0xF8, 0xDC));
        assert_eq!(style.shape, ModuleShape::Diamond);
    }

    #[test]
    fn overrides_win_over_template_values() {
        let overrides = StyleOverrides::from_json(
            r##"{"shape":"circle","colorDark":"#FF0000","gradientColors":null}"##,
        )
        .unwrap();
        let style =
            StyleConfig::from_template_and_overrides(Some("blue-gradient"), &overrides).unwrap();
        assert_eq!(style.shape, ModuleShape::Circle);
        assert_eq!(style.color_dark, Color::rgb(255, 0, 0));
        assert_eq!(style.gradient_colors, None);
    }

    #[test]
    fn absent_override_keys_keep_template_values() {
        let style = StyleConfig::from_template_and_overrides(
            Some("blue-gradient"),
            &StyleOverrides::default(),
        )
        .unwrap();
        assert!(style.gradient_colors.is_some());
    }

    #[test]
    fn unknown_template_is_rejected() {
        let err = StyleConfig::from_template_and_overrides(Some("neon"), &StyleOverrides::default())
            .unwrap_err();
        assert!(matches!(err, QrError::InvalidStyle(_)));
    }

    #[test]
    fn zero_scale_is_invalid() {
        let style = StyleConfig {
            scale: 0,
            ..StyleConfig::default()
        };
        assert!(matches!(style.validate(), Err(QrError::InvalidStyle(_))));
    }

    #[test]
    fn logo_ratio_bounds() {
        assert!(validate_logo_ratio(0.3).is_ok());
        assert!(validate_logo_ratio(0.01).is_ok());
        assert!(matches!(
            validate_logo_ratio(0.0),
            Err(QrError::InvalidLogoRatio(_))
        ));
        assert!(matches!(
            validate_logo_ratio(0.31),
            Err(QrError::InvalidLogoRatio(_))
        ));
        assert!(validate_logo_ratio(f64::NAN).is_err());
    }

    #[test]
    fn prepare_upgrades_ecc_when_logo_present() {
        let style = StyleConfig {
            logo_path: Some(PathBuf::from("logo.png")),
            ..StyleConfig::default()
        };
        let prepared = style.prepare().unwrap();
        assert_eq!(prepared.error_correction_level, EccLevel::H);
    }

    #[test]
    fn prepare_rejects_bad_logo_ratio_before_rendering() {
        let style = StyleConfig {
            logo_path: Some(PathBuf::from("logo.png")),
            logo_size_ratio: 0.5,
            ..StyleConfig::default()
        };
        assert!(matches!(
            style.prepare(),
            Err(QrError::InvalidLogoRatio(_))
        ));
    }

    #[test]
    fn corner_radius_defaults_to_quarter_module() {
        let style = StyleConfig {
            scale: 12,
            ..StyleConfig::default()
        };
        assert_eq!(style.effective_corner_radius(), 3.0);
        let clamped = StyleConfig {
            scale: 12,
            corner_radius: Some(40),
            ..StyleConfig::default()
        };
        assert_eq!(clamped.effective_corner_radius(), 6.0);
    }
}
