use crate::OutputFormat;
use crate::output::{json, text};
use anyhow::{Context, Result, bail};
use log::{debug, info};
use record_diff::{DiffConfig, DiffReport, DiffSession, write_json_lines};
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
}

pub struct DiffArgs {
    pub left: PathBuf,
    pub right: PathBuf,
    pub format: OutputFormat,
    pub fast: bool,
    pub precise: bool,
    pub config: Option<PathBuf>,
    pub no_moves: bool,
    pub max_align_cells: Option<u64>,
    pub log_decisions: bool,
    pub quiet: bool,
    pub verbose: bool,
}

pub fn run(args: DiffArgs) -> Result<ExitCode> {
    if args.fast && args.precise {
        bail!("Cannot use both --fast and --precise flags together");
    }
    if args.config.is_some() && (args.fast || args.precise) {
        bail!("Cannot combine --config with --fast or --precise");
    }

    let verbosity = if args.quiet {
        Verbosity::Quiet
    } else if args.verbose {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    };

    let config = build_config(&args)?;
    debug!("diff configuration: {:?}", config);
    let session = DiffSession::with_config(config).context("Invalid diff configuration")?;

    let left_text = read_record(&args.left, "left")?;
    let right_text = read_record(&args.right, "right")?;

    let report = session.diff_json(&left_text, &right_text);
    let summary = report.summary();
    info!(
        "compared {} fields and {} tables: {} changed, {} added, {} removed, {} moved",
        report.fields.len(),
        report.tables.len(),
        summary.changed,
        summary.added,
        summary.removed,
        summary.moved
    );

    print_errors_to_stderr(&report);

    let stdout = io::stdout();
    let mut handle = BufWriter::new(stdout.lock());

    match args.format {
        OutputFormat::Text => {
            text::write_text_report(
                &mut handle,
                &report,
                &args.left.display().to_string(),
                &args.right.display().to_string(),
                verbosity,
            )?;
        }
        OutputFormat::Json => {
            json::write_json_report(&mut handle, &report)?;
        }
        OutputFormat::Jsonl => {
            write_json_lines(&mut handle, &report, verbosity != Verbosity::Verbose)
                .context("Failed to write JSON Lines output")?;
        }
    }
    handle.flush()?;

    Ok(exit_code_from_report(&report))
}

fn read_record(path: &Path, side: &str) -> Result<String> {
    fs::read_to_string(path)
        .with_context(|| format!("Failed to read {} record: {}", side, path.display()))
}

fn build_config(args: &DiffArgs) -> Result<DiffConfig> {
    let mut config = if let Some(path) = &args.config {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_str::<DiffConfig>(&text)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?
    } else if args.fast {
        DiffConfig::fastest()
    } else if args.precise {
        DiffConfig::most_precise()
    } else {
        DiffConfig::default()
    };

    if args.no_moves {
        config.enable_moves = false;
    }
    if let Some(cells) = args.max_align_cells {
        config.max_align_cells = cells;
    }
    if args.log_decisions {
        config.log_decisions = true;
    }
    Ok(config)
}

fn print_errors_to_stderr(report: &DiffReport) {
    for error in &report.errors {
        eprintln!("Warning: {}", error);
    }
}

fn exit_code_from_report(report: &DiffReport) -> ExitCode {
    if !report.has_differences() && report.errors.is_empty() {
        ExitCode::from(0)
    } else {
        ExitCode::from(1)
    }
}
