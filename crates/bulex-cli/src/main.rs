//! CLI application for French payslip extraction and pattern learning.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{batch, config, export, learn, process, stats};

/// French payslip extraction - structured data from bulletins de salaire
#[derive(Parser)]
#[command(name = "bulex")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a single payslip file
    Process(process::ProcessArgs),

    /// Process multiple payslip files
    Batch(batch::BatchArgs),

    /// Submit a field correction so the extractor can learn from it
    Learn(learn::LearnArgs),

    /// Show learning statistics and improvement suggestions
    Stats(stats::StatsArgs),

    /// Export learned patterns and statistics to a JSON file
    Export(export::ExportArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    // Execute command
    match cli.command {
        Commands::Process(args) => process::run(args, cli.config.as_deref()).await,
        Commands::Batch(args) => batch::run(args, cli.config.as_deref()).await,
        Commands::Learn(args) => learn::run(args, cli.config.as_deref()).await,
        Commands::Stats(args) => stats::run(args, cli.config.as_deref()).await,
        Commands::Export(args) => export::run(args, cli.config.as_deref()).await,
        Commands::Config(args) => config::run(args).await,
    }
}
