//! Configuration management.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use console::style;

use bulex_core::BulexConfig;

use super::default_config_path;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show,

    /// Write a default config file to the standard location
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Print the config file path
    Path,
}

pub async fn run(args: ConfigArgs) -> Result<()> {
    let path = default_config_path();

    match args.action {
        ConfigAction::Show => {
            let config = if path.exists() {
                BulexConfig::from_file(&path)
                    .with_context(|| format!("Failed to load {}", path.display()))?
            } else {
                BulexConfig::default()
            };
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigAction::Init { force } => {
            if path.exists() && !force {
                anyhow::bail!(
                    "{} already exists, use --force to overwrite",
                    path.display()
                );
            }
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            BulexConfig::default()
                .save(&path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("{} {}", style("Created:").green().bold(), path.display());
        }
        ConfigAction::Path => {
            println!("{}", path.display());
        }
    }

    Ok(())
}
