mod commands;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use record_diff::DECISION_TARGET;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "record-diff")]
#[command(about = "Compare two versions of a structured JSON record and show differences")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Compare two JSON records")]
    Diff {
        #[arg(help = "Path to the left (old) record")]
        left: PathBuf,
        #[arg(help = "Path to the right (new) record")]
        right: PathBuf,
        #[arg(long, short, value_enum, default_value = "text", help = "Output format")]
        format: OutputFormat,
        #[arg(long, help = "Use fastest diff preset (no move detection, smaller alignment ceiling)")]
        fast: bool,
        #[arg(long, help = "Use most precise diff preset (larger alignment ceiling)")]
        precise: bool,
        #[arg(long, value_name = "FILE", help = "Load diff configuration from a JSON file")]
        config: Option<PathBuf>,
        #[arg(long, help = "Disable row move detection")]
        no_moves: bool,
        #[arg(long, value_name = "CELLS", help = "Row product above which tables are matched by id")]
        max_align_cells: Option<u64>,
        #[arg(long, help = "Log every row alignment decision to stderr")]
        log_decisions: bool,
        #[arg(long, short, help = "Quiet mode: only show summary")]
        quiet: bool,
        #[arg(long, short, help = "Verbose mode: show unchanged rows and inline spans")]
        verbose: bool,
    },
    #[command(about = "Show the flattened fields and tables of a record")]
    Info {
        #[arg(help = "Path to the JSON record")]
        path: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Jsonl,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Diff {
            left,
            right,
            format,
            fast,
            precise,
            config,
            no_moves,
            max_align_cells,
            log_decisions,
            quiet,
            verbose,
        } => {
            init_logging(verbose, log_decisions);
            commands::diff::run(commands::diff::DiffArgs {
                left,
                right,
                format,
                fast,
                precise,
                config,
                no_moves,
                max_align_cells,
                log_decisions,
                quiet,
                verbose,
            })
        }
        Commands::Info { path } => {
            init_logging(false, false);
            commands::info::run(&path)
        }
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

/// Installs `env_logger`. `RUST_LOG` wins over the flags when set.
fn init_logging(verbose: bool, log_decisions: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let mut filter = default_level.to_string();
    if log_decisions {
        filter.push_str(&format!(",{DECISION_TARGET}=debug"));
    }
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .format_timestamp(None)
        .init();
}
