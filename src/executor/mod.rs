//! Probe execution engine
//!
//! This module contains the two drivers of a campaign:
//! - `EndpointProber` samples one endpoint N times and reduces the samples
//! - `CampaignRunner` walks regions × providers for IPv4, then IPv6
//!
//! Everything runs sequentially on the calling task. The only suspension
//! points are the connect attempt and the fixed pause between samples.

pub mod campaign;
pub mod prober;

pub use campaign::CampaignRunner;
pub use prober::EndpointProber;

use crate::{
    defaults,
    error::{AppError, Result},
    models::Config,
};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::time::Duration;

/// Immutable probing parameters, built once per run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProbeSettings {
    /// Connect attempts per endpoint
    pub sample_count: NonZeroU32,
    /// Per-attempt connect timeout
    pub timeout: Duration,
    /// Pause between two attempts on the same endpoint
    pub sample_interval: Duration,
}

impl ProbeSettings {
    /// Settings with the fixed inter-sample pause
    pub fn new(sample_count: u32, timeout: Duration) -> Result<Self> {
        let sample_count = NonZeroU32::new(sample_count)
            .ok_or_else(|| AppError::config("Ping count must be greater than 0"))?;

        if timeout.is_zero() {
            return Err(AppError::config("Timeout must be greater than 0"));
        }

        Ok(Self {
            sample_count,
            timeout,
            sample_interval: defaults::SAMPLE_INTERVAL,
        })
    }

    /// Override the inter-sample pause (used by tests to run at full speed)
    pub fn with_sample_interval(mut self, sample_interval: Duration) -> Self {
        self.sample_interval = sample_interval;
        self
    }

    pub fn samples(&self) -> u32 {
        self.sample_count.get()
    }
}

impl TryFrom<&Config> for ProbeSettings {
    type Error = AppError;

    fn try_from(config: &Config) -> Result<Self> {
        Self::new(config.sample_count, config.timeout())
    }
}
