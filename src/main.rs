//! stalefile - find files that have not been touched for a given age.
//!
//! Usage:
//!   stale [OPTIONS] <DIRECTORIES>...
//!   stale -o 1y:6m -t ctime /srv/data        Files unchanged for 18 months
//!   stale -p rpath,size -e ~/projects        Relative paths with sizes, list errors
//!   stale --help                              Show help

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::{Instant, SystemTime};

use chrono::Local;
use clap::{ArgAction, Parser};
use color_eyre::eyre::{Context, Result};
use tracing_subscriber::EnvFilter;

use stalefile_core::{DEFAULT_AGE_SPEC, ScanConfig, TimeField, resolve};
use stalefile_report::{Action, OutputFormat, ReportConfig, Reporter};
use stalefile_scan::AgeScanner;

#[derive(Parser)]
#[command(
    name = "stale",
    version,
    about = "Find files that have not been accessed or changed for a given age",
    long_about = "stale walks the given directories and reports every file whose \
                  access time (or status change time) is older than a relative age \
                  such as 1y, 6m or 1y:6m.\n\n\
                  Nothing is modified; the output is a list of candidates."
)]
struct Cli {
    /// Directories to explore
    #[arg(required = true)]
    directories: Vec<PathBuf>,

    /// Time to consider: atime or ctime
    #[arg(short, long, default_value = "atime")]
    time: TimeField,

    /// Time limit, format Ny:Mm (e.g. 1y, 6m, 1y:6m)
    #[arg(short, long, default_value = DEFAULT_AGE_SPEC)]
    older: String,

    /// Print the paths that could not be read
    #[arg(short, long)]
    error: bool,

    /// Post actions per file, in order: none, rpath, apath, size
    #[arg(short, long, value_delimiter = ',', default_value = "rpath")]
    post: Vec<Action>,

    /// Skip entries whose name matches this glob (repeatable)
    #[arg(long, value_delimiter = ',')]
    ignore: Vec<String>,

    /// Maximum depth to descend below each directory
    #[arg(long)]
    max_depth: Option<u32>,

    /// Skip hidden files and directories
    #[arg(long)]
    skip_hidden: bool,

    /// Follow symbolic links to directories
    #[arg(short = 'L', long)]
    follow_symlinks: bool,

    /// Threads used to read directories (1 = serial, 0 = auto)
    #[arg(long, default_value = "1")]
    threads: usize,

    /// Output format: text or json
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Print only the per-file lines
    #[arg(short, long)]
    quiet: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let started = Instant::now();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    run(cli, started)
}

/// Install the stderr log subscriber. `RUST_LOG` takes precedence over `-v`.
fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Resolve the cutoff, scan and print the report.
fn run(cli: Cli, started: Instant) -> Result<()> {
    let cutoff = resolve(&cli.older, &Local::now()).context("Invalid time limit")?;
    let cutoff_time = SystemTime::from(cutoff);
    tracing::info!(cutoff = %cutoff, field = %cli.time, "resolved time limit");

    let scan_config = ScanConfig::builder()
        .roots(cli.directories)
        .time_field(cli.time)
        .follow_symlinks(cli.follow_symlinks)
        .include_hidden(!cli.skip_hidden)
        .max_depth(cli.max_depth)
        .ignore_patterns(cli.ignore)
        .threads(cli.threads)
        .build()
        .context("Invalid scan configuration")?;

    let report_config = ReportConfig::builder()
        .actions(cli.post)
        .show_errors(cli.error)
        .format(cli.format)
        .quiet(cli.quiet)
        .build()
        .context("Invalid report configuration")?;
    let reporter = Reporter::new(report_config).context("Cannot resolve current directory")?;

    let mut out = BufWriter::new(io::stdout().lock());
    reporter.write_header(&mut out, cutoff_time)?;
    out.flush()?;

    let mut outcome = AgeScanner::new()
        .scan(&scan_config, cutoff_time)
        .context("Scan failed")?;

    let summary = reporter.emit(&mut outcome, started, &mut out)?;
    out.flush()?;

    tracing::info!(
        kept = summary.kept,
        checked = outcome.stats.checked,
        errors = summary.errors,
        size_errors = summary.size_errors.len(),
        scan_ms = outcome.scan_duration.as_millis(),
        "report written"
    );

    Ok(())
}
