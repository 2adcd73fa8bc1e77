//! Data models and structures for the TCP ping tester

pub mod config;
pub mod endpoint;
pub mod metrics;

// Re-export main model types
pub use config::Config;
pub use endpoint::{derive_ipv6_address, Endpoint, ProbeTarget, RegionRecord};
pub use metrics::{
    CampaignResults, LatencySummary, ProbeStatistics, ProbeStatus, RegionResultSet, Sample,
};
