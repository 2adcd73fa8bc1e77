//! Output formatting and display system
//!
//! Console tables (plain or colored), live progress, and the persisted
//! artifacts: the markdown report and the optional JSON summary.

mod colored;
mod formatter;
mod markdown;
mod progress;

pub use colored::{ColorScheme, ColoredFormatter};
pub use formatter::{FormattingOptions, PlainFormatter, ReportFormatter};
pub use markdown::MarkdownReport;
pub use progress::{ConsoleProgress, ProgressReporter, SilentProgress};

use crate::{
    error::{AppError, Result},
    models::CampaignResults,
    stats::CampaignSummary,
    types::IpVersion,
};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::Path;

/// Output formatting factory for creating appropriate formatters
pub struct OutputFormatterFactory;

impl OutputFormatterFactory {
    /// Create a formatter based on color support and preferences
    pub fn create_formatter(enable_color: bool, verbose: bool) -> Box<dyn ReportFormatter> {
        let options = FormattingOptions {
            enable_color,
            verbose_mode: verbose,
        };

        if enable_color {
            Box::new(ColoredFormatter::new(options))
        } else {
            Box::new(PlainFormatter::new(options))
        }
    }

    /// Create a plain text formatter for scripts/logs
    pub fn create_plain_formatter() -> Box<dyn ReportFormatter> {
        Self::create_formatter(false, false)
    }
}

/// JSON document written by `--json`
#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: DateTime<Local>,
    summary: CampaignSummary,
    results: &'a CampaignResults,
}

/// Main output coordinator that handles all result display
pub struct ReportCoordinator {
    formatter: Box<dyn ReportFormatter>,
    verbose: bool,
}

impl ReportCoordinator {
    pub fn new(formatter: Box<dyn ReportFormatter>, verbose: bool) -> Self {
        Self { formatter, verbose }
    }

    pub fn formatter(&self) -> &dyn ReportFormatter {
        self.formatter.as_ref()
    }

    /// Console report: banner, IPv4 tables, IPv6 tables, summary in verbose mode
    pub fn display_results(&self, results: &CampaignResults) -> Result<String> {
        let mut output = String::new();

        output.push('\n');
        output.push_str(&self.formatter.format_header("测试结果")?);
        output.push_str("\n\n");

        for ip_version in IpVersion::ALL {
            output.push_str(&self.formatter.format_pass(ip_version, results.pass(ip_version))?);
        }

        if self.verbose {
            output.push_str(&self.formatter.format_summary(&CampaignSummary::from_results(results))?);
        }

        Ok(output)
    }

    /// Write the markdown artifact
    pub fn write_markdown(&self, results: &CampaignResults, path: &Path, generated_at: DateTime<Local>) -> Result<()> {
        MarkdownReport::new(results, generated_at).write_to(path)
    }

    /// Write results and summary as pretty JSON
    pub fn write_json(&self, results: &CampaignResults, path: &Path, generated_at: DateTime<Local>) -> Result<()> {
        let report = JsonReport {
            generated_at,
            summary: CampaignSummary::from_results(results),
            results,
        };
        let json = serde_json::to_string_pretty(&report)?;

        std::fs::write(path, json).map_err(|e| {
            AppError::report(format!("Failed to write JSON output '{}': {}", path.display(), e))
        })
    }
}
