//! Export learned patterns to a JSON file.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use console::style;

use super::{load_config, open_learning};

#[derive(Args)]
pub struct ExportArgs {
    /// Output file for the export
    #[arg(default_value = "learned_patterns.json")]
    pub output: PathBuf,
}

pub async fn run(args: ExportArgs, config_path: Option<&str>) -> Result<()> {
    let config = load_config(config_path)?;
    let learning = open_learning(&config)?;

    learning.export_learned_patterns(&args.output)?;

    let stats = learning.get_learning_stats();
    println!(
        "{} {} pattern(s), {} correction(s) -> {}",
        style("Exported:").green().bold(),
        stats.total_patterns,
        stats.total_corrections,
        args.output.display()
    );

    Ok(())
}
