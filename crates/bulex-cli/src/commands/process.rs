//! Process a single payslip file.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use console::style;
use tracing::{info, warn};

use bulex_core::{
    ExtractionResult, Payslip, PayslipParser, PdfExtractor, PdfType, RuleBasedParser,
};
use bulex_core::pdf::PdfProcessor;

use super::{load_config, open_learning};

#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF, or plain text with --text)
    pub input: PathBuf,

    /// Treat the input as a plain text file instead of a PDF
    #[arg(long)]
    pub text: bool,

    /// Output file (stdout if not given)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Do not apply patterns learned from corrections
    #[arg(long)]
    pub no_learned: bool,
}

#[derive(ValueEnum, Clone, Copy)]
pub enum OutputFormat {
    Json,
    Csv,
    Text,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> Result<()> {
    let config = load_config(config_path)?;

    let document_id = args
        .input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "document".to_string());

    let raw_text = if args.text {
        fs::read_to_string(&args.input)
            .with_context(|| format!("Failed to read {}", args.input.display()))?
    } else {
        let data = fs::read(&args.input)
            .with_context(|| format!("Failed to read {}", args.input.display()))?;

        let mut extractor = PdfExtractor::new();
        extractor.load(&data)?;
        let content = extractor.extract_content(config.pdf.min_text_length)?;

        match content.pdf_type {
            PdfType::Scanned => warn!(
                "{} looks scanned, embedded text is sparse",
                args.input.display()
            ),
            PdfType::Empty => anyhow::bail!(
                "{} has no embedded text; OCR is required before extraction",
                args.input.display()
            ),
            PdfType::Text => {}
        }
        content.text
    };

    let mut parser = RuleBasedParser::new()
        .with_siret_validation(config.extraction.validate_siret)
        .with_nir_validation(config.extraction.validate_nir)
        .with_min_confidence(config.extraction.min_field_confidence);

    if !args.no_learned && config.learning.data_dir.exists() {
        let learning = open_learning(&config)?;
        let overrides = learning.learned_overrides();
        info!("applying {} learned pattern(s)", overrides.len());
        parser = parser.with_learned_patterns(overrides);
    }

    let result = parser.parse(&document_id, &raw_text)?;

    info!(
        "processed {} in {} ms",
        args.input.display(),
        result.processing_time_ms
    );

    let rendered = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&result.payslip)?,
        OutputFormat::Csv => render_csv(&result.payslip)?,
        OutputFormat::Text => render_text(&result),
    };

    match &args.output {
        Some(path) => {
            fs::write(path, &rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("{} {}", style("Saved:").green().bold(), path.display());
        }
        None => println!("{}", rendered),
    }

    if !result.warnings.is_empty() {
        eprintln!("{}", style("Warnings:").yellow().bold());
        for warning in &result.warnings {
            eprintln!("  - {}", warning);
        }
    }

    Ok(())
}

/// Flatten a payslip to (field, value) rows for tabular output.
pub fn payslip_rows(payslip: &Payslip) -> Vec<(&'static str, String)> {
    fn push_opt<T: ToString>(rows: &mut Vec<(&'static str, String)>, name: &'static str, v: &Option<T>) {
        if let Some(v) = v {
            rows.push((name, v.to_string()));
        }
    }

    let mut rows = Vec::new();
    push_opt(&mut rows, "company_name", &payslip.employer.company_name);
    push_opt(&mut rows, "siret", &payslip.employer.siret);
    push_opt(&mut rows, "siren", &payslip.employer.siren);
    push_opt(&mut rows, "naf_code", &payslip.employer.naf_code);
    push_opt(&mut rows, "urssaf_number", &payslip.employer.urssaf_number);
    push_opt(&mut rows, "full_name", &payslip.employee.full_name);
    push_opt(&mut rows, "matricule", &payslip.employee.matricule);
    push_opt(
        &mut rows,
        "social_security",
        &payslip.employee.social_security_number,
    );
    push_opt(&mut rows, "job_title", &payslip.employment.job_title);
    push_opt(&mut rows, "start_date", &payslip.employment.start_date);
    push_opt(&mut rows, "period", &payslip.period.label);
    push_opt(&mut rows, "base_salary", &payslip.salary.base_salary);
    push_opt(&mut rows, "gross_salary", &payslip.salary.gross_salary);
    push_opt(&mut rows, "net_before_tax", &payslip.salary.net_before_tax);
    push_opt(&mut rows, "net_paid", &payslip.salary.net_paid);
    push_opt(&mut rows, "social_net", &payslip.salary.social_net);
    push_opt(&mut rows, "taxable_net", &payslip.totals.taxable_net);
    push_opt(&mut rows, "payment_date", &payslip.payment.payment_date);
    push_opt(&mut rows, "payment_method", &payslip.payment.payment_method);
    rows
}

fn render_csv(payslip: &Payslip) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["field", "value"])?;
    for (field, value) in payslip_rows(payslip) {
        writer.write_record([field, &value])?;
    }
    let bytes = writer.into_inner().context("Failed to finish CSV output")?;
    Ok(String::from_utf8(bytes).context("CSV output was not valid UTF-8")?)
}

fn render_text(result: &ExtractionResult) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{}\n",
        style(format!(
            "Payslip: {}",
            result.payslip.metadata.document_id
        ))
        .bold()
    ));
    for (field, value) in payslip_rows(&result.payslip) {
        out.push_str(&format!("  {:<18} {}\n", field, value));
    }
    out
}
