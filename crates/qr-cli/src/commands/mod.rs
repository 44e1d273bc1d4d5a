//! CLI command definitions and handlers.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use qr_engine::{StyleConfig, StyleOverrides};

pub mod batch;
pub mod generate;
pub mod templates;

/// Single path component from user input: ASCII alphanumerics, `-` and `_`
/// are kept, everything else (separators and dots included) becomes `_`.
pub(crate) fn file_stem(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// qrmenu - styled QR codes for restaurant menus and tables
#[derive(Parser)]
#[command(name = "qrmenu")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Settings shared by every command. Flags win over environment values.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Base URL encoded into menu and table links
    #[arg(long, global = true, env = "QRMENU_BASE_URL")]
    pub base_url: Option<String>,

    /// Directory for generated images
    #[arg(long, global = true, env = "QRMENU_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// TTF/OTF font for table labels
    #[arg(long, global = true, env = "QRMENU_LABEL_FONT")]
    pub label_font: Option<PathBuf>,

    /// Template used when --template is not given
    #[arg(long, global = true, env = "QRMENU_DEFAULT_TEMPLATE")]
    pub default_template: Option<String>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Command {
    /// Print the style template catalog as JSON
    Templates(TemplatesArgs),

    /// Generate a single QR image
    Generate(GenerateArgs),

    /// Generate labeled QR images for a range of tables
    Batch(BatchArgs),
}

/// Arguments for the templates command
#[derive(Parser)]
pub struct TemplatesArgs {
    /// Print a single template by id
    #[arg(long)]
    pub id: Option<String>,
}

/// Style selection shared by generate and batch.
#[derive(Args, Debug, Clone, Default)]
pub struct StyleArgs {
    /// Template id from the catalog
    #[arg(short, long)]
    pub template: Option<String>,

    /// JSON style overrides, e.g. '{"colorDark":"#8B4513","scale":12}'
    #[arg(short, long)]
    pub style: Option<String>,

    /// Logo image placed in the center (forces error correction H)
    #[arg(long)]
    pub logo: Option<PathBuf>,
}

impl StyleArgs {
    /// `--style` JSON with `--logo` applied on top.
    pub fn overrides(&self) -> Result<StyleOverrides> {
        let mut overrides = match &self.style {
            Some(json) => StyleOverrides::from_json(json).context("Invalid --style JSON")?,
            None => StyleOverrides::default(),
        };
        if let Some(logo) = &self.logo {
            overrides.logo_path = Some(Some(logo.clone()));
        }
        Ok(overrides)
    }

    /// Template (or `default_template`) merged with `--style` and `--logo`.
    pub fn resolve(&self, default_template: &str) -> Result<StyleConfig> {
        let template = self.template.as_deref().unwrap_or(default_template);
        StyleConfig::from_template_and_overrides(Some(template), &self.overrides()?)
            .with_context(|| format!("Failed to build style from template {template:?}"))
    }
}

/// Arguments for the generate command
#[derive(Parser)]
pub struct GenerateArgs {
    /// Raw payload to encode
    #[arg(long, conflicts_with_all = ["short_code", "random_code", "wifi_ssid", "page"])]
    pub data: Option<String>,

    /// Encode the menu link for this short code
    #[arg(long, conflicts_with_all = ["random_code", "wifi_ssid", "page"])]
    pub short_code: Option<String>,

    /// Encode the menu link for a newly generated short code
    #[arg(long, conflicts_with_all = ["wifi_ssid", "page"])]
    pub random_code: bool,

    /// Wi-Fi network name
    #[arg(long, conflicts_with = "page")]
    pub wifi_ssid: Option<String>,

    /// Wi-Fi password
    #[arg(long, requires = "wifi_ssid")]
    pub wifi_password: Option<String>,

    /// Wi-Fi authentication (wpa, wep, open) [default: wpa]
    #[arg(long, requires = "wifi_ssid")]
    pub wifi_auth: Option<String>,

    /// Restaurant page to link (feedback, reservation, ...); needs --restaurant
    #[arg(long, requires = "restaurant")]
    pub page: Option<String>,

    /// Restaurant id for --page links
    #[arg(long)]
    pub restaurant: Option<String>,

    /// Text label drawn under the code
    #[arg(long)]
    pub label: Option<String>,

    /// Output file (defaults to <output-dir>/<name>.png)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub style: StyleArgs,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the batch command
#[derive(Parser)]
pub struct BatchArgs {
    /// Restaurant id encoded into each table link
    #[arg(long, required_unless_present = "request")]
    pub restaurant: Option<String>,

    /// First table number
    #[arg(long, required_unless_present = "request")]
    pub start: Option<u32>,

    /// Last table number (inclusive)
    #[arg(long, required_unless_present = "request")]
    pub end: Option<u32>,

    /// Batch request JSON file (baseUrl, restaurantId, startIndex, endIndex, outputDir, ...)
    #[arg(long, conflicts_with_all = ["restaurant", "start", "end"])]
    pub request: Option<PathBuf>,

    /// Bundle the generated images into a ZIP archive
    #[arg(long)]
    pub zip: bool,

    #[command(flatten)]
    pub style: StyleArgs,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use qr_engine::{EccLevel, ModuleShape};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn style_args_merge_template_overrides_and_logo() {
        let args = StyleArgs {
            template: Some("dots".into()),
            style: Some(r##"{"colorDark":"#112233","scale":6}"##.into()),
            logo: Some(PathBuf::from("logo.png")),
        };
        let style = args.resolve("classic").unwrap();
        assert_eq!(style.shape, ModuleShape::Circle);
        assert_eq!(style.scale, 6);
        assert_eq!(style.color_dark.to_string(), "#112233");
        assert_eq!(style.logo_path, Some(PathBuf::from("logo.png")));
        assert_eq!(style.error_correction_level, EccLevel::M);
    }

    #[test]
    fn style_args_fall_back_to_default_template() {
        let style = StyleArgs::default().resolve("modern").unwrap();
        assert_eq!(style.shape, ModuleShape::Diamond);
    }

    #[test]
    fn bad_style_json_is_an_error() {
        let args = StyleArgs {
            style: Some("{not json".into()),
            ..StyleArgs::default()
        };
        assert!(args.resolve("classic").is_err());
    }

    #[test]
    fn file_stem_never_yields_separators_or_dots() {
        assert_eq!(file_stem("bistro-1_a"), "bistro-1_a");
        assert_eq!(file_stem("../x"), "___x");
        assert_eq!(file_stem("/tmp/evil"), "_tmp_evil");
    }

    #[test]
    fn batch_requires_range_or_request() {
        assert!(Cli::try_parse_from(["qrmenu", "batch", "--restaurant", "r1"]).is_err());
        assert!(
            Cli::try_parse_from([
                "qrmenu",
                "batch",
                "--restaurant",
                "r1",
                "--start",
                "1",
                "--end",
                "3"
            ])
            .is_ok()
        );
        assert!(Cli::try_parse_from(["qrmenu", "batch", "--request", "req.json"]).is_ok());
    }
}
