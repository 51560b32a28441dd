//! Batch processing command for many declaration files.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use futures_util::stream::{self, StreamExt};
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use m190_core::models::config::PdfConfig;
use m190_core::{DocumentExtraction, Modelo190Parser, read_pages};

use super::config::load_config;
use super::process::{OutputFormat, document_name, format_records};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern (e.g. "declaraciones/*.pdf")
    #[arg(required = true)]
    input: String,

    /// Consolidated output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (default: from configuration)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Also write a per-file summary CSV to this path
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Add a column listing amounts that were not found
    #[arg(long)]
    include_absent: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct FileResult {
    path: PathBuf,
    extraction: Option<DocumentExtraction>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let mut files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| is_supported(p))
        .collect();
    files.sort();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    eprintln!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let parser = Arc::new(Modelo190Parser::from_config(&config.extraction)?);
    let pdf_config = Arc::new(config.pdf.clone());

    // buffered() yields in input order, so the consolidated output follows the file list
    let mut pending = stream::iter(files)
        .map(|path| {
            let parser = Arc::clone(&parser);
            let pdf_config = Arc::clone(&pdf_config);
            async move {
                let file_start = Instant::now();
                let task_path = path.clone();
                let outcome = tokio::task::spawn_blocking(move || {
                    process_single_file(&task_path, &parser, &pdf_config)
                })
                .await
                .map_err(anyhow::Error::from)
                .and_then(|r| r);
                (path, outcome, file_start.elapsed().as_millis() as u64)
            }
        })
        .buffered(args.jobs.max(1));

    let mut results = Vec::new();
    let mut consolidated = Vec::new();

    while let Some((path, outcome, processing_time_ms)) = pending.next().await {
        match outcome {
            Ok(mut extraction) => {
                debug!(
                    "{}: {} records in {}ms",
                    path.display(),
                    extraction.records.len(),
                    processing_time_ms
                );
                consolidated.append(&mut extraction.records);
                results.push(FileResult {
                    path,
                    extraction: Some(extraction),
                    error: None,
                    processing_time_ms,
                });
            }
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(FileResult {
                        path,
                        extraction: None,
                        error: Some(error_msg),
                        processing_time_ms,
                    });
                } else {
                    overall_pb.abandon();
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed for {}: {}", path.display(), error_msg);
                }
            }
        }

        overall_pb.inc(1);
    }

    overall_pb.finish_and_clear();

    let format = OutputFormat::resolve(args.format, &config);
    let include_absent = args.include_absent || config.output.include_absent_column;
    let output = format_records(&consolidated, format, include_absent)?;

    match &args.output {
        Some(output_path) => {
            fs::write(output_path, &output)?;
            eprintln!(
                "{} {} records written to {}",
                style("✓").green(),
                consolidated.len(),
                output_path.display()
            );
        }
        None => print!("{}", output),
    }

    if let Some(summary_path) = &args.summary {
        write_summary(summary_path, &results)?;
        eprintln!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    eprintln!();
    eprintln!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    eprintln!(
        "   {} successful, {} failed, {} records",
        style(results.len() - failed.len()).green(),
        style(failed.len()).red(),
        consolidated.len()
    );

    if !failed.is_empty() {
        eprintln!();
        eprintln!("{}", style("Failed files:").red());
        for result in &failed {
            eprintln!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn is_supported(path: &Path) -> bool {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    matches!(ext.to_lowercase().as_str(), "pdf" | "txt")
}

fn process_single_file(
    path: &Path,
    parser: &Modelo190Parser,
    pdf_config: &PdfConfig,
) -> anyhow::Result<DocumentExtraction> {
    let pages = read_pages(path, pdf_config)?;
    if pages.iter().all(|p| p.trim().is_empty()) {
        anyhow::bail!("No text extracted from {}", path.display());
    }

    Ok(parser.extract(&pages, &document_name(path)))
}

fn write_summary(path: &Path, results: &[FileResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "records",
        "dropped_blocks",
        "filer_tax_id",
        "filer_name",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = document_name(&result.path);

        if let Some(extraction) = &result.extraction {
            let report = &extraction.report;
            wtr.write_record([
                filename.as_str(),
                "success",
                &report.records.to_string(),
                &report.dropped_blocks.to_string(),
                report.declarant.tax_id.as_deref().unwrap_or(""),
                report.declarant.legal_name.as_deref().unwrap_or(""),
                &result.processing_time_ms.to_string(),
                "",
            ])?;
        } else {
            wtr.write_record([
                filename.as_str(),
                "error",
                "",
                "",
                "",
                "",
                &result.processing_time_ms.to_string(),
                result.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
