//! TCP connect client and latency sampler
//!
//! `Connector` is the seam between the prober and the network: the real
//! implementation opens a tokio `TcpStream`, tests substitute a scripted one.
//! `LatencySampler` turns one connect attempt into a `Sample`.

use crate::{
    error::{AppError, Result},
    logging::Logger,
    models::{ProbeTarget, Sample},
};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpStream;
use tokio::time::timeout;

/// Establishes one TCP connection and reports how long it took
#[async_trait]
pub trait Connector: Send + Sync {
    /// Connect to `address` (`host:port`) within `timeout`
    ///
    /// Returns the time from attempt start until the connection was
    /// established. The connection is closed before returning.
    async fn connect(&self, address: &str, timeout: Duration) -> Result<Duration>;
}

/// Connector backed by `tokio::net::TcpStream`
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpConnector;

impl TcpConnector {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Connector for TcpConnector {
    async fn connect(&self, address: &str, connect_timeout: Duration) -> Result<Duration> {
        let start = Instant::now();
        let stream = timeout(connect_timeout, TcpStream::connect(address))
            .await
            .map_err(|_| AppError::timeout(format!(
                "connect to {} exceeded {}s",
                address,
                connect_timeout.as_secs_f64()
            )))?
            .map_err(|e| AppError::network(format!("connect to {} failed: {}", address, e)))?;
        let elapsed = start.elapsed();

        // No payload exchange: close right after the handshake.
        drop(stream);

        Ok(elapsed)
    }
}

/// Measures single connect attempts against one target
pub struct LatencySampler {
    connector: Arc<dyn Connector>,
    timeout: Duration,
    logger: Arc<Logger>,
}

impl LatencySampler {
    /// Create a sampler; `timeout` must be strictly positive
    pub fn new(connector: Arc<dyn Connector>, timeout: Duration, logger: Arc<Logger>) -> Result<Self> {
        if timeout.is_zero() {
            return Err(AppError::validation("Connect timeout must be greater than 0"));
        }

        Ok(Self {
            connector,
            timeout,
            logger,
        })
    }

    /// Sampler over real TCP connections
    pub fn tcp(timeout: Duration, logger: Arc<Logger>) -> Result<Self> {
        Self::new(Arc::new(TcpConnector::new()), timeout, logger)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Make one connect attempt
    ///
    /// Resolution failures, refusals and timeouts all yield
    /// `Sample::Failure`; the cause only reaches the debug log.
    pub async fn sample(&self, target: &ProbeTarget) -> Sample {
        let address = target.connect_address();
        match self.connector.connect(&address, self.timeout).await {
            Ok(elapsed) => Sample::success(elapsed.as_millis() as u64),
            Err(error) => {
                self.logger
                    .debug("connect attempt failed")
                    .field("address", &address)
                    .error_info(&error)
                    .log()
                    .await;
                Sample::Failure
            }
        }
    }
}
