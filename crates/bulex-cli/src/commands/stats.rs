//! Learning statistics and improvement suggestions.

use anyhow::Result;
use clap::Args;
use console::style;

use super::{load_config, open_learning};

#[derive(Args)]
pub struct StatsArgs {
    /// Remove rules whose success rate is below this threshold before reporting
    #[arg(long)]
    pub prune_below: Option<f64>,
}

pub async fn run(args: StatsArgs, config_path: Option<&str>) -> Result<()> {
    let config = load_config(config_path)?;
    let mut learning = open_learning(&config)?;

    if let Some(threshold) = args.prune_below {
        let removed = learning.prune_weak_rules(threshold)?;
        println!(
            "{} {} rule(s) below {:.2}",
            style("Pruned:").yellow().bold(),
            removed,
            threshold
        );
    }

    let stats = learning.get_learning_stats();

    println!("{}", style("Learning statistics").bold());
    println!("  Total corrections:  {}", stats.total_corrections);
    println!("  Fields learned:     {}", stats.fields_learned);
    println!("  Stored patterns:    {}", stats.total_patterns);
    println!("  Average confidence: {:.2}", stats.average_confidence);
    if let Some(last) = stats.last_learning {
        println!("  Last correction:    {}", last.format("%Y-%m-%d %H:%M UTC"));
    }

    if !stats.field_statistics.is_empty() {
        println!();
        println!("{}", style("Per field").bold());
        for (field, fs) in &stats.field_statistics {
            println!(
                "  {:<18} {:>3} correction(s), confidence {:.2}",
                field, fs.count, fs.average_confidence
            );
        }
    }

    let suggestions = learning.suggest_improvements();
    if !suggestions.is_empty() {
        println!();
        println!("{}", style("Suggestions").bold());
        for suggestion in &suggestions {
            println!("  - {}", suggestion);
        }
    }

    Ok(())
}
