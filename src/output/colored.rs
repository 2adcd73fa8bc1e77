//! Colored formatter implementation with terminal color support
//!
//! Same layout as the plain formatter; cells are padded first and colored
//! afterwards so escape codes never disturb column alignment.

use super::formatter::{
    column_width, join_padded, pad, pass_summary_line, row_cells, FormattingOptions,
    ReportFormatter, TABLE_HEADERS, TABLE_RULES, write_failed,
};
use crate::{
    error::Result,
    models::{ProbeStatistics, RegionResultSet},
    stats::CampaignSummary,
    types::{IpVersion, LatencyLevel},
};
use colored::*;
use std::fmt::Write as _;

impl LatencyLevel {
    /// Get color for this latency level
    pub fn color(&self) -> Color {
        match self {
            Self::Good => Color::Green,
            Self::Moderate => Color::Yellow,
            Self::Poor => Color::Red,
        }
    }
}

/// Color scheme configuration
#[derive(Debug, Clone)]
pub struct ColorScheme {
    pub banner: Color,
    pub section: Color,
    pub region: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub muted: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            banner: Color::Cyan,
            section: Color::Green,
            region: Color::Yellow,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            muted: Color::BrightBlack,
        }
    }
}

/// Colored formatter implementation
pub struct ColoredFormatter {
    options: FormattingOptions,
    color_scheme: ColorScheme,
}

impl ColoredFormatter {
    /// Create a new colored formatter with options
    pub fn new(options: FormattingOptions) -> Self {
        Self {
            options,
            color_scheme: ColorScheme::default(),
        }
    }

    /// Apply color to text if colors are enabled
    fn colorize(&self, text: &str, color: Color) -> ColoredString {
        if self.options.enable_color {
            text.color(color)
        } else {
            text.normal()
        }
    }

    fn bold(&self, text: &str) -> ColoredString {
        if self.options.enable_color {
            text.bold()
        } else {
            text.normal()
        }
    }

    /// Color for a loss rate: none, partial, total
    fn loss_color(&self, loss_rate: f64) -> Color {
        if loss_rate <= 0.0 {
            self.color_scheme.success
        } else if loss_rate < 100.0 {
            self.color_scheme.warning
        } else {
            self.color_scheme.error
        }
    }

    fn format_row(&self, stats: &ProbeStatistics) -> String {
        let cells = row_cells(stats);
        let latency_color = match stats.latency {
            Some(latency) => latency.level().color(),
            None => self.color_scheme.muted,
        };

        let mut row = String::new();
        for (index, cell) in cells.iter().enumerate() {
            let is_last = index == cells.len() - 1;
            let padded = if is_last { cell.clone() } else { pad(cell, column_width(index)) };
            let painted = match index {
                0 => padded.normal(),
                4 => self.colorize(&padded, self.loss_color(stats.loss_rate)),
                _ => self.colorize(&padded, latency_color),
            };
            row.push_str(&painted.to_string());
            if !is_last {
                row.push(' ');
            }
        }
        row
    }
}

impl ReportFormatter for ColoredFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        let banner = "=".repeat(40);
        let mut output = String::new();
        writeln!(output, "{}", self.colorize(&banner, self.color_scheme.banner)).map_err(write_failed)?;
        writeln!(output, "  {}", self.bold(title)).map_err(write_failed)?;
        write!(output, "{}", self.colorize(&banner, self.color_scheme.banner)).map_err(write_failed)?;
        Ok(output)
    }

    fn format_pass(&self, ip_version: IpVersion, result_sets: &[RegionResultSet]) -> Result<String> {
        let mut output = String::new();
        let title = format!("=== {} 结果 ===", ip_version);
        writeln!(output, "{}\n", self.colorize(&title, self.color_scheme.section)).map_err(write_failed)?;

        for result_set in result_sets {
            writeln!(output, "{}", self.format_region_table(result_set)?).map_err(write_failed)?;
        }

        Ok(output)
    }

    fn format_region_table(&self, result_set: &RegionResultSet) -> Result<String> {
        let mut output = String::new();

        writeln!(output, "{}", self.colorize(&result_set.region, self.color_scheme.region))
            .map_err(write_failed)?;

        writeln!(output, "{}", self.bold(&join_padded(&TABLE_HEADERS))).map_err(write_failed)?;
        writeln!(output, "{}", self.colorize(&join_padded(&TABLE_RULES), self.color_scheme.muted))
            .map_err(write_failed)?;

        for stats in &result_set.results {
            writeln!(output, "{}", self.format_row(stats)).map_err(write_failed)?;
        }

        Ok(output)
    }

    fn format_summary(&self, summary: &CampaignSummary) -> Result<String> {
        let mut output = String::new();

        writeln!(output, "{}\n", self.colorize("=== 统计摘要 ===", self.color_scheme.section))
            .map_err(write_failed)?;
        writeln!(output, "省份数: {}", summary.regions).map_err(write_failed)?;
        for pass in &summary.passes {
            let color = if pass.unreachable == 0 {
                self.color_scheme.success
            } else {
                self.color_scheme.warning
            };
            writeln!(output, "{}", self.colorize(&pass_summary_line(pass), color)).map_err(write_failed)?;
        }

        Ok(output)
    }

    fn format_warning(&self, warning: &str) -> String {
        self.colorize(warning, self.color_scheme.warning).to_string()
    }

    fn format_info(&self, message: &str) -> String {
        self.colorize(message, self.color_scheme.banner).to_string()
    }

    fn format_success(&self, message: &str) -> String {
        self.colorize(message, self.color_scheme.success).to_string()
    }
}
