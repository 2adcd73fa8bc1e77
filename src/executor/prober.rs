//! Endpoint prober: N samples against one endpoint, reduced to statistics

use crate::{
    client::{Connector, LatencySampler},
    error::Result,
    executor::ProbeSettings,
    logging::Logger,
    models::{Endpoint, ProbeStatistics},
    output::ProgressReporter,
    stats::SampleAccumulator,
};
use std::sync::Arc;

/// Drives the latency sampler against one endpoint at a time
pub struct EndpointProber {
    sampler: LatencySampler,
    settings: ProbeSettings,
    progress: Arc<dyn ProgressReporter>,
    logger: Arc<Logger>,
}

impl EndpointProber {
    pub fn new(
        connector: Arc<dyn Connector>,
        settings: ProbeSettings,
        progress: Arc<dyn ProgressReporter>,
        logger: Arc<Logger>,
    ) -> Result<Self> {
        let sampler = LatencySampler::new(connector, settings.timeout, logger.clone())?;

        Ok(Self {
            sampler,
            settings,
            progress,
            logger,
        })
    }

    pub fn settings(&self) -> &ProbeSettings {
        &self.settings
    }

    pub fn progress(&self) -> &Arc<dyn ProgressReporter> {
        &self.progress
    }

    pub fn logger(&self) -> &Arc<Logger> {
        &self.logger
    }

    /// Probe one endpoint
    ///
    /// A malformed address yields 100% loss without any connect attempt.
    /// Connect failures are counted, never returned.
    pub async fn probe(&self, endpoint: &Endpoint) -> ProbeStatistics {
        self.progress.endpoint_started(endpoint);

        let target = match endpoint.target() {
            Ok(target) => target,
            Err(error) => {
                self.logger
                    .warn("skipping endpoint with malformed address")
                    .endpoint(endpoint)
                    .error_info(&error)
                    .log()
                    .await;

                let stats = ProbeStatistics::malformed(endpoint);
                self.progress.malformed_address(endpoint);
                self.progress.endpoint_finished(endpoint, &stats);
                return stats;
            }
        };

        let total = self.settings.samples();
        let mut samples = SampleAccumulator::with_capacity(total);

        for completed in 1..=total {
            samples.record(self.sampler.sample(&target).await);
            self.progress.sample_completed(endpoint, completed, total);

            if completed < total && !self.settings.sample_interval.is_zero() {
                tokio::time::sleep(self.settings.sample_interval).await;
            }
        }

        let stats = samples.finish(endpoint);

        self.logger
            .info("endpoint probed")
            .endpoint(endpoint)
            .statistics(&stats)
            .log()
            .await;
        self.progress.endpoint_finished(endpoint, &stats);

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::test_support::ScriptedConnector;
    use crate::models::ProbeStatus;
    use crate::output::SilentProgress;
    use crate::stats::round2;
    use crate::types::{IpVersion, Provider};
    use std::sync::Mutex;
    use std::time::{Duration, Instant};

    fn settings(samples: u32) -> ProbeSettings {
        ProbeSettings::new(samples, Duration::from_secs(5))
            .unwrap()
            .with_sample_interval(Duration::ZERO)
    }

    fn prober(connector: Arc<ScriptedConnector>, settings: ProbeSettings) -> EndpointProber {
        EndpointProber::new(
            connector,
            settings,
            Arc::new(SilentProgress),
            Arc::new(Logger::silent("test")),
        )
        .unwrap()
    }

    fn beijing(address: &str) -> Endpoint {
        Endpoint::new("Beijing", Provider::Unicom, IpVersion::V4, address)
    }

    #[tokio::test]
    async fn test_beijing_scenario() {
        let address = "203.0.113.1:80";
        let connector = Arc::new(ScriptedConnector::new().script(address, &[
            Some(20), Some(22), None, Some(21), Some(25),
            Some(19), Some(23), None, Some(24), Some(20),
        ]));

        let stats = prober(connector.clone(), settings(10)).probe(&beijing(address)).await;

        let latency = stats.latency.unwrap();
        assert_eq!(latency.min_ms, 19);
        assert_eq!(latency.max_ms, 25);
        assert_eq!(latency.avg_ms, 21.75);
        assert_eq!(round2(stats.loss_rate), 20.0);
        assert_eq!(stats.status, ProbeStatus::Completed);
        assert_eq!(connector.call_count(), 10);
    }

    #[tokio::test]
    async fn test_malformed_address_makes_no_attempts() {
        let connector = Arc::new(ScriptedConnector::new());

        let stats = prober(connector.clone(), settings(10))
            .probe(&beijing("bad-format-no-port"))
            .await;

        assert_eq!(stats.loss_rate, 100.0);
        assert!(stats.latency.is_none());
        assert_eq!(stats.status, ProbeStatus::MalformedAddress);
        assert_eq!(stats.attempted, 0);
        assert_eq!(connector.call_count(), 0);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_reports_full_loss() {
        let connector = Arc::new(ScriptedConnector::new());

        let stats = prober(connector.clone(), settings(4))
            .probe(&beijing("198.51.100.1:443"))
            .await;

        assert_eq!(stats.loss_rate, 100.0);
        assert!(stats.latency.is_none());
        assert_eq!(stats.attempted, 4);
        assert_eq!(connector.call_count(), 4);
    }

    #[tokio::test]
    async fn test_sample_count_is_respected() {
        let address = "198.51.100.2:80";
        let connector = Arc::new(ScriptedConnector::new().reachable(address, 8, 3));

        let stats = prober(connector.clone(), settings(3)).probe(&beijing(address)).await;

        assert_eq!(stats.loss_rate, 0.0);
        assert_eq!(stats.succeeded, 3);
        assert_eq!(connector.calls(), vec![address.to_string(); 3]);
    }

    #[tokio::test]
    async fn test_pause_between_samples() {
        let address = "198.51.100.3:80";
        let connector = Arc::new(ScriptedConnector::new().reachable(address, 1, 3));
        let settings = ProbeSettings::new(3, Duration::from_secs(5))
            .unwrap()
            .with_sample_interval(Duration::from_millis(20));

        let start = Instant::now();
        prober(connector, settings).probe(&beijing(address)).await;

        // Two pauses for three samples
        assert!(start.elapsed() >= Duration::from_millis(40));
    }

    #[derive(Default)]
    struct RecordingProgress {
        events: Mutex<Vec<String>>,
    }

    impl ProgressReporter for RecordingProgress {
        fn endpoint_started(&self, endpoint: &Endpoint) {
            self.events.lock().unwrap().push(format!("start {}", endpoint.label()));
        }

        fn sample_completed(&self, _endpoint: &Endpoint, completed: u32, total: u32) {
            self.events.lock().unwrap().push(format!("{}/{}", completed, total));
        }

        fn malformed_address(&self, _endpoint: &Endpoint) {
            self.events.lock().unwrap().push("malformed".to_string());
        }

        fn endpoint_finished(&self, _endpoint: &Endpoint, stats: &ProbeStatistics) {
            self.events.lock().unwrap().push(format!("done {}", stats.loss_rate));
        }
    }

    #[tokio::test]
    async fn test_progress_events_do_not_change_statistics() {
        let address = "198.51.100.4:80";
        let connector = Arc::new(ScriptedConnector::new().script(address, &[Some(10), None]));
        let progress = Arc::new(RecordingProgress::default());

        let prober = EndpointProber::new(
            connector,
            settings(2),
            progress.clone(),
            Arc::new(Logger::silent("test")),
        )
        .unwrap();
        let stats = prober.probe(&beijing(address)).await;

        assert_eq!(stats.loss_rate, 50.0);
        assert_eq!(
            progress.events.lock().unwrap().as_slice(),
            &["start 联通-IPv4", "1/2", "2/2", "done 50"]
        );
    }

    #[tokio::test]
    async fn test_progress_for_malformed_address() {
        let progress = Arc::new(RecordingProgress::default());
        let prober = EndpointProber::new(
            Arc::new(ScriptedConnector::new()),
            settings(5),
            progress.clone(),
            Arc::new(Logger::silent("test")),
        )
        .unwrap();

        prober.probe(&beijing("no-port")).await;

        assert_eq!(
            progress.events.lock().unwrap().as_slice(),
            &["start 联通-IPv4", "malformed", "done 100"]
        );
    }
}
