//! Batch processing of payslip files.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, info};

use bulex_core::pdf::PdfProcessor;
use bulex_core::{PayslipParser, PdfExtractor, PdfType, RuleBasedParser};

use super::{load_config, open_learning};

#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern for input files (e.g. "payslips/*.pdf")
    pub pattern: String,

    /// Output directory for per-file JSON results
    #[arg(short, long, default_value = "output")]
    pub output_dir: PathBuf,

    /// Continue with remaining files after a failure
    #[arg(long)]
    pub continue_on_error: bool,

    /// Do not apply patterns learned from corrections
    #[arg(long)]
    pub no_learned: bool,
}

struct FileSummary {
    file: String,
    status: String,
    period: String,
    gross_salary: String,
    net_paid: String,
    warnings: usize,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> Result<()> {
    let config = load_config(config_path)?;

    let files: Vec<PathBuf> = glob::glob(&args.pattern)
        .context("Invalid glob pattern")?
        .filter_map(|entry| entry.ok())
        .collect();

    if files.is_empty() {
        anyhow::bail!("No files match pattern: {}", args.pattern);
    }

    println!(
        "{} {} file(s)",
        style("Processing").cyan().bold(),
        files.len()
    );

    fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("Failed to create {}", args.output_dir.display()))?;

    let mut parser = RuleBasedParser::new()
        .with_siret_validation(config.extraction.validate_siret)
        .with_nir_validation(config.extraction.validate_nir)
        .with_min_confidence(config.extraction.min_field_confidence);
    if !args.no_learned && config.learning.data_dir.exists() {
        let learning = open_learning(&config)?;
        parser = parser.with_learned_patterns(learning.learned_overrides());
    }

    let progress = ProgressBar::new(files.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("=>-"),
    );

    let mut summaries = Vec::with_capacity(files.len());
    let mut failures = 0usize;

    for file in &files {
        let name = file
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        progress.set_message(name.clone());

        match process_file(file, &parser, config.pdf.min_text_length, &args.output_dir) {
            Ok(summary) => summaries.push(summary),
            Err(e) => {
                failures += 1;
                error!("{}: {:#}", file.display(), e);
                summaries.push(FileSummary {
                    file: name,
                    status: format!("error: {:#}", e),
                    period: String::new(),
                    gross_salary: String::new(),
                    net_paid: String::new(),
                    warnings: 0,
                });
                if !args.continue_on_error {
                    progress.finish_and_clear();
                    return Err(e.context(format!("Failed on {}", file.display())));
                }
            }
        }
        progress.inc(1);
    }
    progress.finish_and_clear();

    let summary_path = args.output_dir.join("summary.csv");
    write_summary(&summary_path, &summaries)?;

    info!("batch done: {} ok, {} failed", files.len() - failures, failures);
    println!(
        "{} {} processed, {} failed, summary in {}",
        style("Done:").green().bold(),
        files.len() - failures,
        failures,
        summary_path.display()
    );

    Ok(())
}

fn process_file(
    file: &PathBuf,
    parser: &RuleBasedParser,
    min_text_length: usize,
    output_dir: &PathBuf,
) -> Result<FileSummary> {
    let document_id = file
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "document".to_string());

    let data = fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;

    let mut extractor = PdfExtractor::new();
    extractor.load(&data)?;
    let content = extractor.extract_content(min_text_length)?;

    if content.pdf_type == PdfType::Empty {
        anyhow::bail!("no embedded text");
    }

    let result = parser.parse(&document_id, &content.text)?;

    let out_path = output_dir.join(format!("{}.json", document_id));
    fs::write(&out_path, serde_json::to_string_pretty(&result.payslip)?)
        .with_context(|| format!("Failed to write {}", out_path.display()))?;

    let payslip = &result.payslip;
    Ok(FileSummary {
        file: file
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default(),
        status: "ok".to_string(),
        period: payslip.period.label.clone().unwrap_or_default(),
        gross_salary: payslip
            .salary
            .gross_salary
            .map(|d| d.to_string())
            .unwrap_or_default(),
        net_paid: payslip
            .salary
            .net_paid
            .map(|d| d.to_string())
            .unwrap_or_default(),
        warnings: result.warnings.len(),
    })
}

fn write_summary(path: &PathBuf, summaries: &[FileSummary]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    writer.write_record(["file", "status", "period", "gross_salary", "net_paid", "warnings"])?;
    for s in summaries {
        writer.write_record([
            s.file.as_str(),
            s.status.as_str(),
            s.period.as_str(),
            s.gross_salary.as_str(),
            s.net_paid.as_str(),
            &s.warnings.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
