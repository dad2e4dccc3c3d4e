mod commands;
mod logging;
mod render;
mod utils;

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use icalkit_core::config::IcalKitConfig;

#[derive(Parser)]
#[command(name = "icalkit")]
#[command(version, about = "Split, merge and inspect iCalendar (.ics) files")]
struct Cli {
    /// Increase log verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split a large calendar into smaller files
    Split {
        file: PathBuf,

        /// Events per chunk (default: 1000)
        #[arg(long)]
        chunk_size: Option<usize>,

        /// Directory to write chunks to (default: current directory)
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Event order before splitting: dtstart (default) or original
        #[arg(short, long)]
        sort: Option<String>,

        /// File name pattern with {n} and {total} placeholders
        #[arg(long)]
        pattern: Option<String>,
    },
    /// Merge multiple calendars into one
    Merge {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Duplicate handling: keep-all, remove or warn (default)
        #[arg(short, long)]
        duplicates: Option<String>,

        /// Calendar name for the merged output
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Show calendar information and its events
    View {
        file: PathBuf,

        /// Only show events whose summary, description or location match
        #[arg(short, long)]
        search: Option<String>,

        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,

        /// Show at most this many events
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Remove duplicate events (same UID) from a calendar
    Clean {
        file: PathBuf,

        /// Output file path (default: overwrite the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show the config file location and effective settings
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = IcalKitConfig::load()?;

    logging::init(cli.verbose, config.log_level.as_deref());

    match cli.command {
        Commands::Split {
            file,
            chunk_size,
            output_dir,
            sort,
            pattern,
        } => commands::split::run(&config, file, chunk_size, output_dir, sort, pattern).await,
        Commands::Merge {
            files,
            output,
            duplicates,
            name,
        } => commands::merge::run(&config, files, output, duplicates, name).await,
        Commands::View {
            file,
            search,
            json,
            limit,
        } => commands::view::run(file, search, json, limit).await,
        Commands::Clean { file, output } => commands::clean::run(file, output).await,
        Commands::Config => commands::config::run(&config),
    }
}
