//! Live progress output while a campaign runs
//!
//! Progress is a side channel: reporters only observe endpoints and
//! statistics, they never feed anything back into the probe.

use crate::{
    models::{Endpoint, ProbeStatistics},
    stats::round2,
    types::IpVersion,
};
use colored::*;
use std::io::{self, Write};

/// Receives campaign progress events
///
/// Every method has an empty default so reporters only implement what
/// they display.
pub trait ProgressReporter: Send + Sync {
    /// A pass over all regions is about to start
    fn pass_started(&self, _ip_version: IpVersion, _regions: usize) {}

    /// Region `index` (1-based) of `total` is about to be probed
    fn region_started(&self, _index: usize, _total: usize, _region: &str) {}

    /// Probing of one endpoint begins
    fn endpoint_started(&self, _endpoint: &Endpoint) {}

    /// `completed` of `total` samples of the endpoint are done
    fn sample_completed(&self, _endpoint: &Endpoint, _completed: u32, _total: u32) {}

    /// The endpoint address could not be split into host and port
    fn malformed_address(&self, _endpoint: &Endpoint) {}

    /// The endpoint probe finished
    fn endpoint_finished(&self, _endpoint: &Endpoint, _stats: &ProbeStatistics) {}
}

/// Reporter that displays nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {}

/// Reporter that rewrites a single status line per endpoint on stdout
#[derive(Debug, Clone)]
pub struct ConsoleProgress {
    use_color: bool,
    verbose: bool,
}

impl ConsoleProgress {
    pub fn new(use_color: bool, verbose: bool) -> Self {
        Self { use_color, verbose }
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.use_color {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn write(&self, text: &str) {
        let mut stdout = io::stdout();
        let _ = write!(stdout, "{}", text);
        let _ = stdout.flush();
    }
}

impl ProgressReporter for ConsoleProgress {
    fn pass_started(&self, ip_version: IpVersion, _regions: usize) {
        let banner = format!("========== {} 测试 ==========", ip_version);
        self.write(&format!("\n{}\n\n", self.paint(&banner, Color::Cyan)));
    }

    fn region_started(&self, index: usize, total: usize, region: &str) {
        let line = format!("[{}/{}] {}", index, total, region);
        self.write(&format!("{}\n", self.paint(&line, Color::Yellow)));
    }

    fn endpoint_started(&self, endpoint: &Endpoint) {
        self.write(&format!("  [{}] 测试中...", endpoint.label()));
    }

    fn sample_completed(&self, endpoint: &Endpoint, completed: u32, total: u32) {
        self.write(&format!("\r  [{}] 测试中... {}/{}", endpoint.label(), completed, total));
    }

    fn malformed_address(&self, endpoint: &Endpoint) {
        let line = format!("  [{}] 地址格式错误", endpoint.label());
        self.write(&format!("\r{}\n", self.paint(&line, Color::Red)));
    }

    fn endpoint_finished(&self, endpoint: &Endpoint, stats: &ProbeStatistics) {
        if stats.is_malformed() {
            return;
        }

        // Clear the progress line
        self.write("\r\x1b[K");

        if self.verbose {
            let detail = match stats.latency {
                Some(latency) => format!(
                    "  [{}] avg {:.2}ms, loss {:.2}%",
                    endpoint.label(),
                    latency.avg_ms,
                    round2(stats.loss_rate)
                ),
                None => format!("  [{}] unreachable, loss {:.2}%", endpoint.label(), stats.loss_rate),
            };
            let color = if stats.is_unreachable() { Color::Red } else { Color::Green };
            self.write(&format!("{}\n", self.paint(&detail, color)));
        }
    }
}
