//! Templates command implementation.

use anyhow::{Context, Result, anyhow};
use qr_engine::{find_template, list_templates};

use super::TemplatesArgs;

/// Run the templates command.
pub fn run(args: TemplatesArgs) -> Result<()> {
    let json = match args.id {
        Some(id) => {
            let template = find_template(&id).ok_or_else(|| anyhow!("Unknown template {id:?}"))?;
            serde_json::to_string_pretty(&template)
        }
        None => serde_json::to_string_pretty(&list_templates()),
    }
    .context("Failed to serialize templates")?;

    println!("{json}");
    Ok(())
}
