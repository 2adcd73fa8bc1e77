//! Core formatting traits and the plain text implementation
//!
//! The console report is one table per region:
//!
//! ```text
//! 北京
//! 运营商          最快(ms)     最慢(ms)     平均(ms)     丢包率(%)
//! ----------   --------   --------   --------   ---------
//! 联通-IPv4      19         25         21.75      20.00
//! 移动-IPv4      -          -          -          100.00
//! ```

use crate::{
    error::{AppError, Result},
    models::{ProbeStatistics, RegionResultSet},
    stats::{round2, CampaignSummary, PassSummary},
    types::IpVersion,
};
use std::fmt::Write as _;

pub(crate) const PROVIDER_WIDTH: usize = 12;
pub(crate) const VALUE_WIDTH: usize = 10;
pub(crate) const TABLE_HEADERS: [&str; 5] = ["运营商", "最快(ms)", "最慢(ms)", "平均(ms)", "丢包率(%)"];
pub(crate) const TABLE_RULES: [&str; 5] = ["----------", "--------", "--------", "--------", "---------"];
const BANNER: &str = "========================================";

/// Renders campaign results for the terminal
pub trait ReportFormatter {
    /// Framed title banner
    fn format_header(&self, title: &str) -> Result<String>;

    /// Section title and region tables of one IP version pass
    fn format_pass(&self, ip_version: IpVersion, result_sets: &[RegionResultSet]) -> Result<String>;

    /// Table for one region
    fn format_region_table(&self, result_set: &RegionResultSet) -> Result<String>;

    /// Aggregate campaign view (verbose mode)
    fn format_summary(&self, summary: &CampaignSummary) -> Result<String>;

    /// Format warning messages
    fn format_warning(&self, warning: &str) -> String;

    /// Format informational messages
    fn format_info(&self, message: &str) -> String;

    /// Format success messages
    fn format_success(&self, message: &str) -> String;
}

/// Configuration options for formatting
#[derive(Debug, Clone, Default)]
pub struct FormattingOptions {
    /// Enable colored output
    pub enable_color: bool,
    /// Append the campaign summary to the report
    pub verbose_mode: bool,
}

/// Display cells of one table row: endpoint label, min, max, avg, loss
///
/// Unreachable endpoints show `-` for every latency figure.
pub(crate) fn row_cells(stats: &ProbeStatistics) -> [String; 5] {
    let loss = format!("{:.2}", round2(stats.loss_rate));
    match stats.latency {
        Some(latency) => [
            stats.label(),
            latency.min_ms.to_string(),
            latency.max_ms.to_string(),
            format!("{:.2}", latency.avg_ms),
            loss,
        ],
        None => [
            stats.label(),
            "-".to_string(),
            "-".to_string(),
            "-".to_string(),
            loss,
        ],
    }
}

/// Left-align `text` in a column of `width` characters
pub(crate) fn pad(text: &str, width: usize) -> String {
    format!("{:<width$}", text, width = width)
}

pub(crate) fn column_width(index: usize) -> usize {
    if index == 0 {
        PROVIDER_WIDTH
    } else {
        VALUE_WIDTH
    }
}

pub(crate) fn join_padded<S: AsRef<str>>(cells: &[S]) -> String {
    cells
        .iter()
        .enumerate()
        .map(|(i, cell)| pad(cell.as_ref(), column_width(i)))
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end()
        .to_string()
}

pub(crate) fn write_failed(e: std::fmt::Error) -> AppError {
    AppError::report(format!("Failed to format report: {}", e))
}

/// One summary line per pass
pub(crate) fn pass_summary_line(pass: &PassSummary) -> String {
    let mut line = format!(
        "{}: {} 个节点, {} 个无丢包, {} 个不可达",
        pass.ip_version, pass.endpoints, pass.fully_reachable, pass.unreachable
    );
    if pass.malformed > 0 {
        line.push_str(&format!(" (其中 {} 个地址格式错误)", pass.malformed));
    }
    if pass.endpoints > 0 {
        line.push_str(&format!(", 平均丢包率 {:.2}%", round2(pass.mean_loss_rate)));
    }
    if let Some((ref label, avg_ms)) = pass.fastest {
        line.push_str(&format!(", 最快 {} ({:.2}ms)", label, avg_ms));
    }
    line
}

/// Plain text formatter implementation
pub struct PlainFormatter {
    options: FormattingOptions,
}

impl PlainFormatter {
    /// Create a new plain formatter with options
    pub fn new(options: FormattingOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &FormattingOptions {
        &self.options
    }
}

impl ReportFormatter for PlainFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        let mut output = String::new();
        writeln!(output, "{}", BANNER).map_err(write_failed)?;
        writeln!(output, "  {}", title).map_err(write_failed)?;
        write!(output, "{}", BANNER).map_err(write_failed)?;
        Ok(output)
    }

    fn format_pass(&self, ip_version: IpVersion, result_sets: &[RegionResultSet]) -> Result<String> {
        let mut output = String::new();
        writeln!(output, "=== {} 结果 ===\n", ip_version).map_err(write_failed)?;

        for result_set in result_sets {
            writeln!(output, "{}", self.format_region_table(result_set)?).map_err(write_failed)?;
        }

        Ok(output)
    }

    fn format_region_table(&self, result_set: &RegionResultSet) -> Result<String> {
        let mut output = String::new();

        writeln!(output, "{}", result_set.region).map_err(write_failed)?;
        writeln!(output, "{}", join_padded(&TABLE_HEADERS)).map_err(write_failed)?;
        writeln!(output, "{}", join_padded(&TABLE_RULES)).map_err(write_failed)?;
        for stats in &result_set.results {
            writeln!(output, "{}", join_padded(&row_cells(stats))).map_err(write_failed)?;
        }

        Ok(output)
    }

    fn format_summary(&self, summary: &CampaignSummary) -> Result<String> {
        let mut output = String::new();

        writeln!(output, "=== 统计摘要 ===\n").map_err(write_failed)?;
        writeln!(output, "省份数: {}", summary.regions).map_err(write_failed)?;
        for pass in &summary.passes {
            writeln!(output, "{}", pass_summary_line(pass)).map_err(write_failed)?;
        }

        Ok(output)
    }

    fn format_warning(&self, warning: &str) -> String {
        warning.to_string()
    }

    fn format_info(&self, message: &str) -> String {
        message.to_string()
    }

    fn format_success(&self, message: &str) -> String {
        message.to_string()
    }
}
