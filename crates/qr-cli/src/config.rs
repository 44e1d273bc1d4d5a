//! Process configuration: environment (via clap `env`) with defaults, validated once.

use std::path::PathBuf;
use std::sync::LazyLock;

use anyhow::{Context, Result, bail};
use qr_engine::{LabelFont, Synthesizer, find_template};
use regex::Regex;

use crate::commands::GlobalArgs;

pub const DEFAULT_BASE_URL: &str = "https://qrmenu.example.com";
pub const DEFAULT_OUTPUT_DIR: &str = "qr_codes";
pub const DEFAULT_TEMPLATE: &str = "classic";

static RE_BASE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://[A-Za-z0-9.\-]+(:[0-9]{1,5})?(/[^\s?#]*)?$").unwrap()
});

/// Resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub base_url: String,
    pub output_dir: PathBuf,
    pub label_font: Option<PathBuf>,
    pub default_template: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            label_font: None,
            default_template: DEFAULT_TEMPLATE.into(),
        }
    }
}

impl AppConfig {
    /// Fill unset values with defaults and validate.
    pub fn resolve(args: &GlobalArgs) -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            base_url: non_empty(args.base_url.clone()).unwrap_or(defaults.base_url),
            output_dir: args.output_dir.clone().unwrap_or(defaults.output_dir),
            label_font: args.label_font.clone(),
            default_template: non_empty(args.default_template.clone())
                .unwrap_or(defaults.default_template),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        validate_base_url(&self.base_url)?;
        if find_template(&self.default_template).is_none() {
            bail!(
                "QRMENU_DEFAULT_TEMPLATE: unknown template {:?}",
                self.default_template
            );
        }
        if let Some(path) = &self.label_font
            && !path.is_file()
        {
            bail!("QRMENU_LABEL_FONT: {} is not a file", path.display());
        }
        Ok(())
    }

    /// Engine with the configured label font, if any.
    pub fn synthesizer(&self) -> Result<Synthesizer> {
        let synth = Synthesizer::new().context("Failed to load bundled label font")?;
        match &self.label_font {
            Some(path) => {
                let bytes = std::fs::read(path)
                    .with_context(|| format!("Failed to read font {}", path.display()))?;
                let font = LabelFont::from_bytes(bytes)
                    .with_context(|| format!("Invalid font {}", path.display()))?;
                Ok(synth.with_label_font(font))
            }
            None => Ok(synth),
        }
    }
}

/// Returns `Ok(())` if `url` looks like an absolute http(s) base URL.
pub fn validate_base_url(url: &str) -> Result<()> {
    if !RE_BASE_URL.is_match(url) {
        bail!("QRMENU_BASE_URL: expected http(s)://host[:port][/path], got {url:?}");
    }
    Ok(())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
