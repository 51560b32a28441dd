//! Process command - extract recipient records from a single declaration.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use m190_core::extract::rules::format_spanish_amount;
use m190_core::{AmountField, ExtractionReport, M190Config, Modelo190Parser, RecipientRecord, read_pages};

use super::config::load_config;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF, or .txt with form-feed page breaks)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (default: from configuration)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Add a column listing amounts that were not found
    #[arg(long)]
    include_absent: bool,

    /// Print the extraction report (declarant, block counts, warnings)
    #[arg(long)]
    show_report: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    /// Resolve the command-line choice against the configured default.
    pub fn resolve(choice: Option<Self>, config: &M190Config) -> Self {
        choice.unwrap_or_else(|| match config.output.default_format.to_lowercase().as_str() {
            "json" => Self::Json,
            "text" | "txt" => Self::Text,
            _ => Self::Csv,
        })
    }
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")?
            .progress_chars("##-"),
    );

    pb.set_message("Reading pages...");
    pb.set_position(10);
    let pages = read_pages(&args.input, &config.pdf)?;
    if pages.iter().all(|p| p.trim().is_empty()) {
        pb.abandon();
        anyhow::bail!("No text could be extracted from {}", args.input.display());
    }

    pb.set_message("Extracting recipients...");
    pb.set_position(50);
    let parser = Modelo190Parser::from_config(&config.extraction)?;
    let mut records = Vec::new();
    let report = parser.extract_into(&pages, &document_name(&args.input), &mut records);

    pb.set_position(100);
    pb.finish_and_clear();

    let format = OutputFormat::resolve(args.format, &config);
    let include_absent = args.include_absent || config.output.include_absent_column;
    let output = format_records(&records, format, include_absent)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} {} records written to {}",
            style("✓").green(),
            records.len(),
            output_path.display()
        );
    } else {
        print!("{}", output);
    }

    if args.show_report {
        print_report(&report);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Name stamped on records: the file name of the input.
pub fn document_name(path: &Path) -> String {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}

fn print_report(report: &ExtractionReport) {
    eprintln!();
    eprintln!(
        "{} Declarant: {} {}",
        style("ℹ").blue(),
        report.declarant.tax_id.as_deref().unwrap_or("-"),
        report.declarant.legal_name.as_deref().unwrap_or("-"),
    );
    eprintln!(
        "{} {} pages, {} candidate blocks, {} dropped, {} records in {}ms",
        style("ℹ").blue(),
        report.pages,
        report.candidate_blocks,
        report.dropped_blocks,
        report.records,
        report.processing_time_ms
    );
    for warning in &report.warnings {
        eprintln!("{} {}", style("⚠").yellow(), warning);
    }
}

pub fn format_records(
    records: &[RecipientRecord],
    format: OutputFormat,
    include_absent: bool,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(records)? + "\n"),
        OutputFormat::Csv => format_csv(records, include_absent),
        OutputFormat::Text => Ok(format_text(records)),
    }
}

fn format_csv(records: &[RecipientRecord], include_absent: bool) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    let mut header = vec![
        "Archivo",
        "Página",
        "NIF Declarante",
        "Declarante",
        "NIF",
        "Nombre",
        "Clave",
        "Subclave",
    ];
    header.extend(AmountField::ALL.iter().map(|f| f.column_name()));
    if include_absent {
        header.push("Importes ausentes");
    }
    wtr.write_record(&header)?;

    for record in records {
        let mut row = vec![
            record.source_document.clone(),
            record.page_number.to_string(),
            record.filer_tax_id.clone().unwrap_or_default(),
            record.filer_name.clone().unwrap_or_default(),
            record.recipient_tax_id.clone(),
            record.recipient_name.clone(),
            record.category_code.clone(),
            record.subcategory_code.clone(),
        ];
        row.extend(AmountField::ALL.iter().map(|f| record.amount(*f).to_string()));
        if include_absent {
            let absent: Vec<&str> = record.absent_amounts.iter().map(|f| f.column_name()).collect();
            row.push(absent.join("; "));
        }
        wtr.write_record(&row)?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(records: &[RecipientRecord]) -> String {
    let mut output = String::new();

    for record in records {
        output.push_str(&format!(
            "{} (p. {}): {} {}\n",
            record.source_document, record.page_number, record.recipient_tax_id, record.recipient_name
        ));
        output.push_str(&format!(
            "  Declarante: {} {}\n",
            record.filer_tax_id.as_deref().unwrap_or("-"),
            record.filer_name.as_deref().unwrap_or("-")
        ));
        if !record.category_code.is_empty() || !record.subcategory_code.is_empty() {
            output.push_str(&format!(
                "  Clave: {}  Subclave: {}\n",
                record.category_code, record.subcategory_code
            ));
        }
        for field in AmountField::ALL {
            let value = match record.amount_if_present(field) {
                Some(amount) => format_spanish_amount(amount),
                None => "-".to_string(),
            };
            output.push_str(&format!("  {:<18} {:>15}\n", field.column_name(), value));
        }
        output.push('\n');
    }

    output.push_str(&format!("{} records\n", records.len()));
    output
}
