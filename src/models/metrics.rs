//! Sample, per-endpoint statistics and campaign result models

use crate::models::endpoint::Endpoint;
use crate::types::{IpVersion, LatencyLevel, Provider};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of one TCP connect attempt
///
/// Refused, unresolvable and timed-out attempts all collapse into `Failure`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sample {
    /// Connection established after `latency_ms` milliseconds
    Success { latency_ms: u64 },
    /// Connection could not be established within the timeout
    Failure,
}

impl Sample {
    pub fn success(latency_ms: u64) -> Self {
        Self::Success { latency_ms }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn latency_ms(&self) -> Option<u64> {
        match self {
            Self::Success { latency_ms } => Some(*latency_ms),
            Self::Failure => None,
        }
    }
}

/// Latency figures over the successful samples of one endpoint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatencySummary {
    /// Fastest successful connect (milliseconds)
    pub min_ms: u64,
    /// Slowest successful connect (milliseconds)
    pub max_ms: u64,
    /// Arithmetic mean of successful connects (milliseconds)
    pub avg_ms: f64,
}

impl LatencySummary {
    pub fn level(&self) -> LatencyLevel {
        LatencyLevel::from_latency_ms(self.avg_ms)
    }
}

/// How an endpoint probe ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProbeStatus {
    /// All samples were attempted
    Completed,
    /// The address did not split into host and port; nothing was attempted
    MalformedAddress,
}

/// Reduced result for one endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeStatistics {
    pub region: String,
    pub provider: Provider,
    pub ip_version: IpVersion,
    /// Address actually probed (the derived one in the IPv6 pass)
    pub address: String,
    pub status: ProbeStatus,
    /// Absent when no sample succeeded
    pub latency: Option<LatencySummary>,
    /// Percentage of attempts without a connection (0.0-100.0)
    pub loss_rate: f64,
    /// Number of connect attempts made
    pub attempted: u32,
    /// Number of attempts that connected
    pub succeeded: u32,
}

impl ProbeStatistics {
    /// Statistics for an endpoint whose address could not be parsed
    pub fn malformed(endpoint: &Endpoint) -> Self {
        Self {
            region: endpoint.region.clone(),
            provider: endpoint.provider,
            ip_version: endpoint.ip_version,
            address: endpoint.address.clone(),
            status: ProbeStatus::MalformedAddress,
            latency: None,
            loss_rate: 100.0,
            attempted: 0,
            succeeded: 0,
        }
    }

    /// Statistics for an endpoint whose samples were all attempted
    pub fn completed(
        endpoint: &Endpoint,
        attempted: u32,
        succeeded: u32,
        latency: Option<LatencySummary>,
        loss_rate: f64,
    ) -> Self {
        Self {
            region: endpoint.region.clone(),
            provider: endpoint.provider,
            ip_version: endpoint.ip_version,
            address: endpoint.address.clone(),
            status: ProbeStatus::Completed,
            latency,
            loss_rate,
            attempted,
            succeeded,
        }
    }

    /// Provider and IP version label, e.g. `电信-IPv6`
    pub fn label(&self) -> String {
        format!("{}-{}", self.provider.label(), self.ip_version.label())
    }

    /// Region, provider and IP version, e.g. `北京/联通-IPv4`
    pub fn full_label(&self) -> String {
        format!("{}/{}", self.region, self.label())
    }

    /// True when not a single connection succeeded
    pub fn is_unreachable(&self) -> bool {
        self.latency.is_none()
    }

    pub fn is_malformed(&self) -> bool {
        self.status == ProbeStatus::MalformedAddress
    }

    pub fn failed(&self) -> u32 {
        self.attempted - self.succeeded
    }
}

/// Results of one region for one IP version, in provider order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionResultSet {
    pub region: String,
    pub results: Vec<ProbeStatistics>,
}

impl RegionResultSet {
    pub fn new<S: Into<String>>(region: S) -> Self {
        Self {
            region: region.into(),
            results: Vec::new(),
        }
    }
}

/// Everything one campaign produced, handed to the report renderers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignResults {
    pub ipv4: Vec<RegionResultSet>,
    pub ipv6: Vec<RegionResultSet>,
    /// Samples requested per endpoint
    pub sample_count: u32,
    /// Per-sample connect timeout (seconds)
    pub timeout_seconds: u64,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl CampaignResults {
    /// Region result sets of one pass
    pub fn pass(&self, ip_version: IpVersion) -> &[RegionResultSet] {
        match ip_version {
            IpVersion::V4 => &self.ipv4,
            IpVersion::V6 => &self.ipv6,
        }
    }

    /// All endpoint statistics of one pass, in probe order
    pub fn statistics(&self, ip_version: IpVersion) -> impl Iterator<Item = &ProbeStatistics> {
        self.pass(ip_version).iter().flat_map(|set| set.results.iter())
    }

    /// Number of regions covered (identical for both passes)
    pub fn region_count(&self) -> usize {
        self.ipv4.len()
    }
}
