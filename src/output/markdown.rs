//! Markdown report artifact

use super::formatter::write_failed;
use crate::{
    error::{AppError, Result},
    models::{CampaignResults, RegionResultSet},
    stats::round2,
    types::IpVersion,
};
use chrono::{DateTime, Local};
use std::fmt::Write as _;
use std::path::Path;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Markdown rendering of a finished campaign
pub struct MarkdownReport<'a> {
    results: &'a CampaignResults,
    generated_at: DateTime<Local>,
}

impl<'a> MarkdownReport<'a> {
    pub fn new(results: &'a CampaignResults, generated_at: DateTime<Local>) -> Self {
        Self { results, generated_at }
    }

    /// Render the full document
    pub fn render(&self) -> Result<String> {
        let mut doc = String::new();

        writeln!(doc, "# TCP Ping 测试结果\n").map_err(write_failed)?;
        writeln!(doc, "**生成时间:** {}\n", self.generated_at.format(TIME_FORMAT)).map_err(write_failed)?;

        for ip_version in IpVersion::ALL {
            writeln!(doc, "## {} 测试结果\n", ip_version).map_err(write_failed)?;
            for result_set in self.results.pass(ip_version) {
                render_region(&mut doc, result_set)?;
            }
            writeln!(doc).map_err(write_failed)?;
        }

        let tested_at = self.results.completed_at.with_timezone(&Local);
        writeln!(doc, "---\n").map_err(write_failed)?;
        writeln!(doc, "**测试说明:**").map_err(write_failed)?;
        writeln!(doc, "- 每个节点测试 {} 次", self.results.sample_count).map_err(write_failed)?;
        writeln!(doc, "- 超时时间: {}秒", self.results.timeout_seconds).map_err(write_failed)?;
        writeln!(doc, "- 测试时间: {}", tested_at.format(TIME_FORMAT)).map_err(write_failed)?;

        Ok(doc)
    }

    /// Render and write the document to `path`
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let doc = self.render()?;
        std::fs::write(path, doc).map_err(|e| {
            AppError::report(format!("Failed to write report '{}': {}", path.display(), e))
        })
    }
}

fn render_region(doc: &mut String, result_set: &RegionResultSet) -> Result<()> {
    writeln!(doc, "| {} | 最快(ms) | 最慢(ms) | 平均(ms) | 丢包率(%) |", result_set.region).map_err(write_failed)?;
    writeln!(doc, "|--------|----------|----------|----------|-----------|").map_err(write_failed)?;

    for stats in &result_set.results {
        let loss = round2(stats.loss_rate);
        match stats.latency {
            Some(latency) => writeln!(
                doc,
                "| {} | {} | {} | {:.2} | {:.2} |",
                stats.label(), latency.min_ms, latency.max_ms, latency.avg_ms, loss
            ),
            None => writeln!(doc, "| {} | - | - | - | {:.2} |", stats.label(), loss),
        }
        .map_err(write_failed)?;
    }

    writeln!(doc).map_err(write_failed)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Endpoint, LatencySummary, ProbeStatistics};
    use crate::types::Provider;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn results() -> CampaignResults {
        let endpoint = |provider, ip_version| Endpoint::new("北京", provider, ip_version, "bj-v4.ip.example:80");
        let v4 = RegionResultSet {
            region: "北京".to_string(),
            results: vec![
                ProbeStatistics::completed(
                    &endpoint(Provider::Unicom, IpVersion::V4),
                    10,
                    8,
                    Some(LatencySummary { min_ms: 19, max_ms: 25, avg_ms: 21.75 }),
                    20.0,
                ),
                ProbeStatistics::malformed(&endpoint(Provider::Telecom, IpVersion::V4)),
            ],
        };
        let v6 = RegionResultSet {
            region: "北京".to_string(),
            results: vec![ProbeStatistics::completed(&endpoint(Provider::Unicom, IpVersion::V6), 10, 0, None, 100.0)],
        };
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();

        CampaignResults {
            ipv4: vec![v4],
            ipv6: vec![v6],
            sample_count: 10,
            timeout_seconds: 5,
            started_at: at,
            completed_at: at,
        }
    }

    fn render(results: &CampaignResults) -> String {
        let generated_at = Local.with_ymd_and_hms(2024, 5, 1, 16, 30, 0).unwrap();
        MarkdownReport::new(results, generated_at).render().unwrap()
    }

    #[test]
    fn test_document_structure() {
        let doc = render(&results());

        assert!(doc.starts_with("# TCP Ping 测试结果\n\n**生成时间:** 2024-05-01 16:30:00\n"));
        let v4_at = doc.find("## IPv4 测试结果").unwrap();
        let v6_at = doc.find("## IPv6 测试结果").unwrap();
        let trailer_at = doc.find("**测试说明:**").unwrap();
        assert!(v4_at < v6_at && v6_at < trailer_at);
        assert!(doc.contains("- 每个节点测试 10 次"));
        assert!(doc.contains("- 超时时间: 5秒"));
    }

    #[test]
    fn test_rows() {
        let doc = render(&results());

        assert!(doc.contains("| 北京 | 最快(ms) | 最慢(ms) | 平均(ms) | 丢包率(%) |"));
        assert!(doc.contains("| 联通-IPv4 | 19 | 25 | 21.75 | 20.00 |"));
        assert!(doc.contains("| 电信-IPv4 | - | - | - | 100.00 |"));
        assert!(doc.contains("| 联通-IPv6 | - | - | - | 100.00 |"));
        assert!(!doc.contains("| 联通 |"));
    }

    #[test]
    fn test_write_to_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.md");
        let results = results();

        MarkdownReport::new(&results, Local::now()).write_to(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("## IPv6 测试结果"));
    }

    #[test]
    fn test_write_to_missing_directory_is_report_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("report.md");
        let results = results();

        let error = MarkdownReport::new(&results, Local::now()).write_to(&path).unwrap_err();
        assert_eq!(error.category(), "REPORT");
        assert_eq!(error.exit_code(), 5);
    }
}
