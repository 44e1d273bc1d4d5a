//! Generate command implementation.

use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use qr_engine::output::write_file;
use qr_engine::payload::restaurant_page_url;
use qr_engine::{GeneratedImage, WifiAuth, encode_png, generate_short_code, menu_url, wifi_payload};
use tracing::info;

use super::{GenerateArgs, file_stem};
use crate::config::AppConfig;

/// What to encode and the default file stem for it.
#[derive(Debug, PartialEq, Eq)]
struct Target {
    payload: String,
    name: String,
    short_code: Option<String>,
}

/// Run the generate command.
pub async fn run(args: GenerateArgs, config: AppConfig) -> Result<()> {
    let target = resolve_target(&args, &config.base_url)?;
    let style = args.style.resolve(&config.default_template)?;
    let path = args
        .output
        .clone()
        .unwrap_or_else(|| config.output_dir.join(format!("{}.png", target.name)));

    let payload = target.payload.clone();
    let label = args.label.clone();
    let out_path = path.clone();
    let generated = tokio::task::spawn_blocking(move || -> Result<GeneratedImage> {
        ensure_parent(&out_path)?;
        let synth = config.synthesizer()?;
        match label {
            Some(label) => {
                let img = synth.render_labeled(&payload, &label, &style)?;
                let png = encode_png(&img)?;
                write_file(&out_path, &png)?;
                Ok(GeneratedImage {
                    path: out_path,
                    png,
                    width: img.width(),
                    height: img.height(),
                })
            }
            None => Ok(synth.generate_to_path(&payload, &out_path, &style)?),
        }
    })
    .await
    .context("Generation task panicked")?
    .with_context(|| format!("Failed to generate {}", path.display()))?;

    info!(path = %generated.path.display(), "Generated QR code");

    if args.json {
        let output = serde_json::json!({
            "path": generated.path,
            "payload": target.payload,
            "shortCode": target.short_code,
            "width": generated.width,
            "height": generated.height,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", generated.path.display());
        println!("  {}", target.payload);
    }
    Ok(())
}

fn resolve_target(args: &GenerateArgs, base_url: &str) -> Result<Target> {
    if let Some(data) = &args.data {
        return Ok(Target {
            payload: data.clone(),
            name: "qr".into(),
            short_code: None,
        });
    }

    let code = match (&args.short_code, args.random_code) {
        (Some(code), _) => Some(code.clone()),
        (None, true) => Some(generate_short_code()),
        (None, false) => None,
    };
    if let Some(code) = code {
        return Ok(Target {
            payload: menu_url(base_url, &code),
            name: format!("menu-{}", file_stem(&code)),
            short_code: Some(code),
        });
    }

    if let Some(ssid) = &args.wifi_ssid {
        let auth: WifiAuth = args
            .wifi_auth
            .as_deref()
            .unwrap_or("wpa")
            .parse()
            .map_err(|e: String| anyhow!(e))?;
        return Ok(Target {
            payload: wifi_payload(ssid, args.wifi_password.as_deref(), auth),
            name: format!("wifi-{}", file_stem(ssid)),
            short_code: None,
        });
    }

    if let (Some(page), Some(restaurant)) = (&args.page, &args.restaurant) {
        return Ok(Target {
            payload: restaurant_page_url(base_url, restaurant, page),
            name: format!("{}-{}", file_stem(restaurant), file_stem(page)),
            short_code: None,
        });
    }

    bail!("Nothing to encode: pass --data, --short-code, --random-code, --wifi-ssid, or --page")
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    Ok(())
}
