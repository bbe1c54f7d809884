//! Submit a field correction to the learning system.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use console::style;

use bulex_core::FIELD_CATALOG;

use super::{load_config, open_learning};

#[derive(Args)]
pub struct LearnArgs {
    /// Field the correction applies to (e.g. net_paid, siret)
    #[arg(long)]
    pub field: String,

    /// Identifier of the document the correction came from
    #[arg(long)]
    pub document: String,

    /// Value the extractor produced (empty if the field was missed)
    #[arg(long, default_value = "")]
    pub original: String,

    /// Correct value for the field
    #[arg(long)]
    pub corrected: String,

    /// File holding the raw text the document was extracted from
    #[arg(long)]
    pub text_file: PathBuf,

    /// Optional free-form note about the correction
    #[arg(long, default_value = "")]
    pub feedback: String,
}

pub async fn run(args: LearnArgs, config_path: Option<&str>) -> Result<()> {
    let config = load_config(config_path)?;

    if !FIELD_CATALOG.contains(&args.field.as_str()) {
        eprintln!(
            "{} '{}' is not a known field; learning anyway. Known fields: {}",
            style("Note:").yellow().bold(),
            args.field,
            FIELD_CATALOG.join(", ")
        );
    }

    let raw_text = fs::read_to_string(&args.text_file)
        .with_context(|| format!("Failed to read {}", args.text_file.display()))?;

    let mut learning = open_learning(&config)?;
    let record = learning.learn_from_correction(
        &args.field,
        &args.document,
        &args.original,
        &args.corrected,
        &raw_text,
        &args.feedback,
    )?;

    println!(
        "{} {} = '{}' (confidence {:.2})",
        style("Learned:").green().bold(),
        record.field_name,
        record.corrected_value,
        record.confidence
    );
    println!("  pattern: {}", record.new_pattern);

    Ok(())
}
