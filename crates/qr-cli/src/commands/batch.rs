//! Batch command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use qr_engine::{
    BatchError, BatchOutput, BatchRequest, DirSink, StyleConfig, TableBatch, archive_batch,
};
use tracing::{error, info};

use super::{BatchArgs, file_stem};
use crate::config::AppConfig;

/// A fully-resolved batch job.
#[derive(Debug)]
struct Job {
    batch: TableBatch,
    style: StyleConfig,
    output_dir: PathBuf,
}

/// Run the batch command.
pub async fn run(args: BatchArgs, config: AppConfig) -> Result<()> {
    let job = resolve_job(&args, &config)?;
    let zip = args.zip;
    let output_dir = job.output_dir.clone();

    let (outcome, archive) = tokio::task::spawn_blocking(
        move || -> Result<(Result<BatchOutput, BatchError>, Option<PathBuf>)> {
            let synth = config.synthesizer()?;
            let mut sink = DirSink::create(&job.output_dir)?;
            let outcome = synth.generate_sequential_batch(&job.batch, &job.style, &mut sink);
            let archive = match &outcome {
                Ok(output) if zip => {
                    let zip_path = job.output_dir.join(archive_name(&job.batch.restaurant_id));
                    Some(archive_batch(&output.paths, &zip_path)?)
                }
                _ => None,
            };
            Ok((outcome, archive))
        },
    )
    .await
    .context("Batch task panicked")??;

    match outcome {
        Ok(output) => {
            info!(count = output.count, dir = %output_dir.display(), "Batch complete");
            if args.json {
                let json = serde_json::json!({
                    "paths": output.paths,
                    "count": output.count,
                    "archive": archive,
                });
                println!("{}", serde_json::to_string_pretty(&json)?);
            } else {
                for path in &output.paths {
                    println!("{}", path.display());
                }
                if let Some(archive) = archive {
                    println!("Archive: {}", archive.display());
                }
            }
            Ok(())
        }
        Err(err) => {
            report_partial(&err, args.json)?;
            Err(err).context("Batch generation failed")
        }
    }
}

/// Print what was written before the failure so the caller can resume.
fn report_partial(err: &BatchError, json: bool) -> Result<()> {
    let written = err.written();
    let failed_index = match err {
        BatchError::Aborted { index, .. } => Some(*index),
        BatchError::Rejected(_) => None,
    };
    if let Some(index) = failed_index {
        error!(index, written = written.len(), "Batch stopped; earlier images were kept");
    }
    if json {
        let out = serde_json::json!({
            "paths": written,
            "count": written.len(),
            "failedIndex": failed_index,
            "error": err.source_error().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for path in written {
            println!("{}", path.display());
        }
    }
    Ok(())
}

fn resolve_job(args: &BatchArgs, config: &AppConfig) -> Result<Job> {
    if let Some(path) = &args.request {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let request: BatchRequest = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid batch request {}", path.display()))?;
        return job_from_request(request, args);
    }

    // clap requires all three when --request is absent
    let restaurant = args.restaurant.clone().unwrap_or_default();
    let start = args.start.unwrap_or_default();
    let end = args.end.unwrap_or_default();

    Ok(Job {
        batch: TableBatch::new(config.base_url.clone(), restaurant.clone(), start, end),
        style: args.style.resolve(&config.default_template)?,
        output_dir: config.output_dir.join(file_stem(&restaurant)),
    })
}

/// The request defines range, URL and directory; style flags still apply on top.
fn job_from_request(request: BatchRequest, args: &BatchArgs) -> Result<Job> {
    let template = args
        .style
        .template
        .as_deref()
        .or(request.template_id.as_deref());
    let style = StyleConfig::from_template_and_overrides(template, &request.style_overrides)
        .context("Invalid style in batch request")?
        .merged(&args.style.overrides()?);
    Ok(Job {
        batch: request.table_batch(),
        style,
        output_dir: request.output_dir,
    })
}

/// `tables-{restaurant}-{YYYYmmdd-HHMMSS}.zip`
fn archive_name(restaurant_id: &str) -> String {
    let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    format!("tables-{}-{stamp}.zip", file_stem(restaurant_id))
}
