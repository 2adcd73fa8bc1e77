//! Reduction of raw samples into latency and loss statistics

use crate::{
    models::{CampaignResults, Endpoint, LatencySummary, ProbeStatistics, Sample},
    types::IpVersion,
};
use serde::{Deserialize, Serialize};

/// Collects the samples of one endpoint probe
///
/// Only successful latencies are kept; failures are counted.
#[derive(Debug, Clone, Default)]
pub struct SampleAccumulator {
    attempted: u32,
    latencies: Vec<u64>,
}

impl SampleAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(samples: u32) -> Self {
        Self {
            attempted: 0,
            latencies: Vec::with_capacity(samples as usize),
        }
    }

    /// Record one sample
    pub fn record(&mut self, sample: Sample) {
        self.attempted += 1;
        if let Sample::Success { latency_ms } = sample {
            self.latencies.push(latency_ms);
        }
    }

    pub fn attempted(&self) -> u32 {
        self.attempted
    }

    pub fn succeeded(&self) -> u32 {
        self.latencies.len() as u32
    }

    pub fn failed(&self) -> u32 {
        self.attempted - self.succeeded()
    }

    /// Latency figures over the successful samples, if any
    pub fn latency_summary(&self) -> Option<LatencySummary> {
        summarize_latencies(&self.latencies)
    }

    /// Loss over all recorded attempts; 100.0 when nothing connected
    pub fn loss_rate(&self) -> f64 {
        if self.latencies.is_empty() {
            100.0
        } else {
            loss_rate(self.failed(), self.attempted)
        }
    }

    /// Reduce into the statistics record of `endpoint`
    pub fn finish(self, endpoint: &Endpoint) -> ProbeStatistics {
        ProbeStatistics::completed(
            endpoint,
            self.attempted,
            self.succeeded(),
            self.latency_summary(),
            self.loss_rate(),
        )
    }
}

impl Extend<Sample> for SampleAccumulator {
    fn extend<I: IntoIterator<Item = Sample>>(&mut self, samples: I) {
        for sample in samples {
            self.record(sample);
        }
    }
}

/// Percentage of `failed` out of `total` attempts
///
/// `total` of zero has no defined loss and is reported as 100.0.
pub fn loss_rate(failed: u32, total: u32) -> f64 {
    if total == 0 {
        return 100.0;
    }
    failed as f64 / total as f64 * 100.0
}

/// Integer min/max and floating mean of successful latencies
pub fn summarize_latencies(latencies: &[u64]) -> Option<LatencySummary> {
    let min_ms = *latencies.iter().min()?;
    let max_ms = *latencies.iter().max()?;
    let sum: u64 = latencies.iter().sum();

    Some(LatencySummary {
        min_ms,
        max_ms,
        avg_ms: sum as f64 / latencies.len() as f64,
    })
}

/// Round to two decimals, the precision used in reports
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Aggregate view over one IP version pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassSummary {
    pub ip_version: IpVersion,
    /// Endpoints probed in this pass
    pub endpoints: usize,
    /// Endpoints with no loss at all
    pub fully_reachable: usize,
    /// Endpoints where nothing connected (malformed included)
    pub unreachable: usize,
    /// Endpoints skipped because their address was malformed
    pub malformed: usize,
    /// Mean loss rate over all endpoints of the pass
    pub mean_loss_rate: f64,
    /// Lowest average latency of the pass, as (label, avg ms)
    pub fastest: Option<(String, f64)>,
}

/// Aggregate view over a whole campaign
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignSummary {
    pub regions: usize,
    pub passes: Vec<PassSummary>,
}

impl CampaignSummary {
    pub fn from_results(results: &CampaignResults) -> Self {
        let passes = IpVersion::ALL
            .iter()
            .map(|&ip_version| summarize_pass(results, ip_version))
            .collect();

        Self {
            regions: results.region_count(),
            passes,
        }
    }

    pub fn pass(&self, ip_version: IpVersion) -> Option<&PassSummary> {
        self.passes.iter().find(|p| p.ip_version == ip_version)
    }
}

fn summarize_pass(results: &CampaignResults, ip_version: IpVersion) -> PassSummary {
    let mut summary = PassSummary {
        ip_version,
        endpoints: 0,
        fully_reachable: 0,
        unreachable: 0,
        malformed: 0,
        mean_loss_rate: 0.0,
        fastest: None,
    };
    let mut loss_total = 0.0;

    for stats in results.statistics(ip_version) {
        summary.endpoints += 1;
        loss_total += stats.loss_rate;

        if stats.is_malformed() {
            summary.malformed += 1;
        }

        match stats.latency {
            None => summary.unreachable += 1,
            Some(latency) => {
                if stats.succeeded == stats.attempted {
                    summary.fully_reachable += 1;
                }
                let faster = summary
                    .fastest
                    .as_ref()
                    .map_or(true, |(_, best)| latency.avg_ms < *best);
                if faster {
                    summary.fastest = Some((stats.full_label(), latency.avg_ms));
                }
            }
        }
    }

    if summary.endpoints > 0 {
        summary.mean_loss_rate = loss_total / summary.endpoints as f64;
    }

    summary
}
