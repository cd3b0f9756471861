//! Report output: per-file lines, error listing and summary.

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant, SystemTime};

use chrono::{DateTime, Local, Utc};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use stalefile_core::EntryError;
use stalefile_scan::ScanOutcome;

use crate::action::{Action, ActionChain};
use crate::size::format_gigabytes;

const START_BANNER: &str = "==== START FILE SYSTEM PROFILING ====";
const END_BANNER: &str = "=========== END FILE SYSTEM PROFILING ==========";
const CLOSING_RULE: &str = "================================================";
const ERROR_HEADER: &str = "---------- File system error path -----------";

/// Report output format.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OutputFormat {
    /// Plain text lines and summary.
    #[default]
    Text,
    /// A single JSON document.
    Json,
}

/// Configuration for report output.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into))]
pub struct ReportConfig {
    /// Actions applied to every kept file, in order.
    #[builder(default = "vec![Action::RelPath]")]
    pub actions: Vec<Action>,

    /// List unreadable paths after the kept files.
    #[builder(default = "false")]
    pub show_errors: bool,

    /// Output format.
    #[builder(default)]
    pub format: OutputFormat,

    /// Print only the per-file lines (and the error listing when requested).
    #[builder(default = "false")]
    pub quiet: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            actions: vec![Action::RelPath],
            show_errors: false,
            format: OutputFormat::Text,
            quiet: false,
        }
    }
}

impl ReportConfig {
    /// Create a new config builder.
    pub fn builder() -> ReportConfigBuilder {
        ReportConfigBuilder::default()
    }
}

/// Figures printed in the summary block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Number of kept files.
    pub kept: usize,
    /// Number of files whose metadata could not be read.
    pub errors: u64,
    /// Number of directories that could not be listed.
    pub dir_errors: u64,
    /// Cumulated size, when the size action ran and found anything.
    pub total_size: Option<u64>,
    /// Size lookups that failed while rendering.
    pub size_errors: Vec<EntryError>,
    /// Wall-clock time since the run started.
    pub elapsed: Duration,
}

#[derive(Serialize)]
struct JsonRecord<'a> {
    path: &'a PathBuf,
    timestamp: DateTime<Utc>,
    line: String,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    cutoff: DateTime<Utc>,
    kept: Vec<JsonRecord<'a>>,
    errored: &'a [EntryError],
    dir_errors: &'a [EntryError],
    size_errors: &'a [EntryError],
    checked: u64,
    errors: u64,
    total_size: Option<u64>,
    elapsed_ms: u128,
}

/// Renders a scan outcome.
#[derive(Debug, Clone)]
pub struct Reporter {
    config: ReportConfig,
    chain: ActionChain,
}

impl Reporter {
    /// Create a reporter resolving relative paths against the current
    /// directory.
    pub fn new(config: ReportConfig) -> io::Result<Self> {
        let chain = ActionChain::new(config.actions.clone())?;
        Ok(Self { config, chain })
    }

    /// Create a reporter resolving relative paths against `cwd`.
    pub fn with_cwd(config: ReportConfig, cwd: impl Into<PathBuf>) -> Self {
        let chain = ActionChain::with_cwd(config.actions.clone(), cwd);
        Self { config, chain }
    }

    /// Write the opening banner and the resolved cutoff.
    pub fn write_header<W: Write>(&self, out: &mut W, cutoff: SystemTime) -> io::Result<()> {
        if self.config.quiet || self.config.format == OutputFormat::Json {
            return Ok(());
        }
        let cutoff: DateTime<Local> = cutoff.into();
        writeln!(out, "{START_BANNER}")?;
        writeln!(out, " ")?;
        writeln!(out, " Time limit: {}", cutoff.format("%a %b %e %H:%M:%S %Y"))?;
        writeln!(out)
    }

    /// Write the report for `outcome`.
    ///
    /// Runs the action chain over every kept file, which updates
    /// `outcome.stats.total_size` when the chain reports sizes. `started` is
    /// the start of the whole run and is used for the elapsed time.
    pub fn emit<W: Write>(
        &self,
        outcome: &mut ScanOutcome,
        started: Instant,
        out: &mut W,
    ) -> io::Result<ReportSummary> {
        match self.config.format {
            OutputFormat::Text => self.emit_text(outcome, started, out),
            OutputFormat::Json => self.emit_json(outcome, started, out),
        }
    }

    fn emit_text<W: Write>(
        &self,
        outcome: &mut ScanOutcome,
        started: Instant,
        out: &mut W,
    ) -> io::Result<ReportSummary> {
        let mut size_errors = Vec::new();
        for record in &outcome.kept {
            let line = self.chain.render(&record.path, &mut outcome.stats);
            size_errors.extend(line.errors);
            writeln!(out, "{}", line.text)?;
        }

        if self.config.show_errors && outcome.has_errors() {
            writeln!(out, "{ERROR_HEADER}")?;
            for err in outcome.errored.iter().chain(&outcome.dir_errors) {
                writeln!(out, "{}", err.path.display())?;
            }
        }

        let summary = self.summarize(outcome, size_errors, started);
        if !self.config.quiet {
            self.write_summary(out, &summary)?;
        }
        Ok(summary)
    }

    fn emit_json<W: Write>(
        &self,
        outcome: &mut ScanOutcome,
        started: Instant,
        out: &mut W,
    ) -> io::Result<ReportSummary> {
        let mut size_errors = Vec::new();
        let mut lines = Vec::with_capacity(outcome.kept.len());
        for record in &outcome.kept {
            let line = self.chain.render(&record.path, &mut outcome.stats);
            size_errors.extend(line.errors);
            lines.push(line.text);
        }

        let summary = self.summarize(outcome, size_errors, started);
        let report = JsonReport {
            cutoff: outcome.cutoff.into(),
            kept: outcome
                .kept
                .iter()
                .zip(lines)
                .map(|(record, line)| JsonRecord {
                    path: &record.path,
                    timestamp: record.timestamp.into(),
                    line,
                })
                .collect(),
            errored: &outcome.errored,
            dir_errors: &outcome.dir_errors,
            size_errors: &summary.size_errors,
            checked: outcome.stats.checked,
            errors: outcome.stats.errors,
            total_size: summary.total_size,
            elapsed_ms: summary.elapsed.as_millis(),
        };

        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
        Ok(summary)
    }

    fn summarize(
        &self,
        outcome: &ScanOutcome,
        size_errors: Vec<EntryError>,
        started: Instant,
    ) -> ReportSummary {
        let total_size = (self.chain.reports_size() && outcome.stats.total_size > 0)
            .then_some(outcome.stats.total_size);
        ReportSummary {
            kept: outcome.kept.len(),
            errors: outcome.stats.errors,
            dir_errors: outcome.stats.dir_errors,
            total_size,
            size_errors,
            elapsed: started.elapsed(),
        }
    }

    fn write_summary<W: Write>(&self, out: &mut W, summary: &ReportSummary) -> io::Result<()> {
        writeln!(out, "{END_BANNER}")?;
        writeln!(out, " #File kept = {}", summary.kept)?;
        writeln!(out, " #File error = {}", summary.errors)?;
        if summary.dir_errors > 0 {
            writeln!(out, " #Directory error = {}", summary.dir_errors)?;
        }
        if summary.errors + summary.dir_errors > 0 && !self.config.show_errors {
            writeln!(out, " To print the list of file system error use -e, --error option")?;
        }
        if let Some(total) = summary.total_size {
            writeln!(out, " Cumulated size: {}", format_gigabytes(total))?;
        }
        writeln!(out, " Time (ms): {}", summary.elapsed.as_millis())?;
        writeln!(out, "{CLOSING_RULE}")
    }
}
