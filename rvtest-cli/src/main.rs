//! rvtest: rare-variant collapsing and phenotype summaries.
//!
//! CLI entry point using clap for argument parsing.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "rvtest",
    version,
    about = "Rare-variant collapsing for gene-based association tests",
    long_about = "Collapses rare-variant genotypes per gene into burden scores\n\
                   (CMC, Morris-Zeggini, Madsen-Browning, frequency-weighted) and\n\
                   summarizes phenotype and covariate distributions."
)]
struct Cli {
    /// Number of threads to use
    #[arg(long, default_value = "1", global = true)]
    threads: usize,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Collapse the markers of each gene into one burden score per sample
    Collapse(commands::collapse::CollapseArgs),

    /// Write the phenotype and covariate summary header
    Summarize(commands::summarize::SummarizeArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    rayon::ThreadPoolBuilder::new()
        .num_threads(cli.threads)
        .build_global()
        .ok();

    tracing::info!("rvtest v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Using {} threads", cli.threads);

    match cli.command {
        Commands::Collapse(args) => commands::collapse::run(args),
        Commands::Summarize(args) => commands::summarize::run(args),
    }
}
