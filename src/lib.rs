//! TCP Ping Tester
//!
//! Measures TCP connection-establishment latency and loss to regional
//! provider endpoints over IPv4 and IPv6, then prints a console report and
//! persists a markdown summary.

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod executor;
pub mod logging;
pub mod models;
pub mod output;
pub mod stats;
pub mod types;

// Re-export commonly used types
pub use client::{Connector, LatencySampler, TcpConnector};
pub use error::{AppError, Result};
pub use executor::{CampaignRunner, EndpointProber, ProbeSettings};
pub use models::{CampaignResults, Config, Endpoint, ProbeStatistics, RegionRecord, RegionResultSet, Sample};
pub use output::{ColoredFormatter, PlainFormatter, ReportCoordinator, ReportFormatter};
pub use stats::{CampaignSummary, SampleAccumulator};

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
pub const BUILD_TIME: Option<&str> = option_env!("BUILD_TIME");
pub const GIT_COMMIT: Option<&str> = option_env!("GIT_COMMIT");
pub const TARGET_TRIPLE: Option<&str> = option_env!("TARGET_TRIPLE");

/// Default configuration values and fixed probing policies
pub mod defaults {
    use std::time::Duration;

    pub const DEFAULT_SAMPLE_COUNT: u32 = 10;
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
    pub const DEFAULT_MAP_FILE: &str = "map.json";
    pub const DEFAULT_REPORT_PREFIX: &str = "tcp-ping-results";
    pub const DEFAULT_ENABLE_COLOR: bool = true;

    /// Regions probed when test mode is on
    pub const TEST_MODE_REGION_LIMIT: usize = 3;

    /// Pause between two samples of the same endpoint. Not configurable.
    pub const SAMPLE_INTERVAL: Duration = Duration::from_millis(100);

    /// Host name marker of IPv4 endpoints, swapped once for the IPv6 pass
    pub const IPV4_HOST_MARKER: &str = "-v4.ip";
    pub const IPV6_HOST_MARKER: &str = "-v6.ip";
}
