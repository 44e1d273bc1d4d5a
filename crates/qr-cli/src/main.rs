//! qrmenu - styled QR codes for restaurant menus and tables
//!
//! ```bash
//! # Menu link for a fresh short code
//! qrmenu generate --random-code --template dots
//!
//! # Table codes 1..=20 with a logo, bundled as a ZIP
//! qrmenu batch --restaurant demo --start 1 --end 20 --logo logo.png --zip
//! ```

use anyhow::Result;
use clap::Parser;

mod commands;
mod config;

use commands::{Cli, Command};
use config::AppConfig;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_logging();

    let cli = Cli::parse();
    let config = AppConfig::resolve(&cli.global)?;

    match cli.command {
        Command::Templates(args) => commands::templates::run(args),
        Command::Generate(args) => commands::generate::run(args, config).await,
        Command::Batch(args) => commands::batch::run(args, config).await,
    }
}

fn init_logging() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,qr_engine=info,qrmenu=info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(filter)
        .init();
}
