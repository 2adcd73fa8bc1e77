//! Type definitions and aliases

use serde::{Deserialize, Serialize};
use std::fmt;

// Re-export commonly used types
pub use crate::error::{AppError, Result};

/// IP protocol version a probe pass runs under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IpVersion {
    #[serde(rename = "IPv4")]
    V4,
    #[serde(rename = "IPv6")]
    V6,
}

impl IpVersion {
    /// Pass order of a campaign
    pub const ALL: [IpVersion; 2] = [IpVersion::V4, IpVersion::V6];

    pub fn label(&self) -> &'static str {
        match self {
            IpVersion::V4 => "IPv4",
            IpVersion::V6 => "IPv6",
        }
    }
}

impl fmt::Display for IpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Network provider an endpoint belongs to
///
/// The three carriers of the region map. Labels are opaque to the prober;
/// they only shape the result label and the presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provider {
    /// China Unicom (联通)
    Unicom,
    /// China Mobile (移动)
    Mobile,
    /// China Telecom (电信)
    Telecom,
}

impl Provider {
    /// Fixed probing and presentation order within a region
    pub const ALL: [Provider; 3] = [Provider::Unicom, Provider::Mobile, Provider::Telecom];

    /// Display label used in reports
    pub fn label(&self) -> &'static str {
        match self {
            Provider::Unicom => "联通",
            Provider::Mobile => "移动",
            Provider::Telecom => "电信",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Latency classification used for color coding
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LatencyLevel {
    /// Good latency (< 50 ms)
    Good,
    /// Moderate latency (50-150 ms)
    Moderate,
    /// Poor latency (>= 150 ms)
    Poor,
}

impl LatencyLevel {
    /// Classify an average connect latency in milliseconds
    pub fn from_latency_ms(latency_ms: f64) -> Self {
        if latency_ms < 50.0 {
            Self::Good
        } else if latency_ms < 150.0 {
            Self::Moderate
        } else {
            Self::Poor
        }
    }
}
