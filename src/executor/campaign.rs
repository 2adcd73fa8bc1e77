//! Campaign runner: every region and provider, IPv4 pass then IPv6 pass

use crate::{
    executor::EndpointProber,
    models::{CampaignResults, RegionRecord, RegionResultSet},
    types::IpVersion,
};
use chrono::Utc;

/// Runs the endpoint prober over a whole region map
pub struct CampaignRunner {
    prober: EndpointProber,
}

impl CampaignRunner {
    pub fn new(prober: EndpointProber) -> Self {
        Self { prober }
    }

    pub fn prober(&self) -> &EndpointProber {
        &self.prober
    }

    /// Probe all regions, IPv4 first, then IPv6
    ///
    /// Every region appears once in each pass, in input order, whatever
    /// happened to its endpoints.
    pub async fn run(&self, regions: &[RegionRecord]) -> CampaignResults {
        let logger = self.prober.logger();
        let session_id = logger.start_session().await;
        logger
            .info("campaign started")
            .field("session", &session_id)
            .field("regions", regions.len())
            .field("samples", self.prober.settings().samples())
            .log()
            .await;

        let started_at = Utc::now();
        let ipv4 = self.run_pass(regions, IpVersion::V4).await;
        let ipv6 = self.run_pass(regions, IpVersion::V6).await;
        let completed_at = Utc::now();

        logger
            .info("campaign finished")
            .field("duration_ms", (completed_at - started_at).num_milliseconds())
            .log()
            .await;

        CampaignResults {
            ipv4,
            ipv6,
            sample_count: self.prober.settings().samples(),
            timeout_seconds: self.prober.settings().timeout.as_secs(),
            started_at,
            completed_at,
        }
    }

    /// Probe all regions for one IP version
    ///
    /// Providers without an address contribute no entry; IPv6 addresses are
    /// derived from the IPv4 ones.
    pub async fn run_pass(&self, regions: &[RegionRecord], ip_version: IpVersion) -> Vec<RegionResultSet> {
        let progress = self.prober.progress();
        progress.pass_started(ip_version, regions.len());

        let mut result_sets = Vec::with_capacity(regions.len());
        for (index, record) in regions.iter().enumerate() {
            progress.region_started(index + 1, regions.len(), &record.region);

            let mut result_set = RegionResultSet::new(record.region.clone());
            for endpoint in record.endpoints(ip_version) {
                result_set.results.push(self.prober.probe(&endpoint).await);
            }
            result_sets.push(result_set);
        }

        self.prober
            .logger()
            .info("pass finished")
            .field("ip_version", ip_version)
            .field("regions", result_sets.len())
            .field("endpoints", result_sets.iter().map(|set| set.results.len()).sum::<usize>())
            .log()
            .await;

        result_sets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::test_support::ScriptedConnector;
    use crate::executor::ProbeSettings;
    use crate::logging::Logger;
    use crate::output::SilentProgress;
    use crate::types::Provider;
    use std::sync::Arc;
    use std::time::Duration;

    fn runner(connector: Arc<ScriptedConnector>, samples: u32) -> CampaignRunner {
        let settings = ProbeSettings::new(samples, Duration::from_secs(1))
            .unwrap()
            .with_sample_interval(Duration::ZERO);
        let prober = EndpointProber::new(
            connector,
            settings,
            Arc::new(SilentProgress),
            Arc::new(Logger::silent("test")),
        )
        .unwrap();
        CampaignRunner::new(prober)
    }

    fn regions() -> Vec<RegionRecord> {
        vec![
            RegionRecord::new("Beijing")
                .with_address(Provider::Unicom, "bj-cu-v4.ip.example:80")
                .with_address(Provider::Mobile, "bj-cm-v4.ip.example:80")
                .with_address(Provider::Telecom, "bj-ct-v4.ip.example:80"),
            RegionRecord::new("Shanghai")
                .with_address(Provider::Unicom, "sh-cu-v4.ip.example:80")
                .with_address(Provider::Telecom, "sh-ct-v4.ip.example:80"),
        ]
    }

    #[tokio::test]
    async fn test_passes_cover_every_region_in_order() {
        let connector = Arc::new(ScriptedConnector::new());
        let results = runner(connector, 1).run(&regions()).await;

        for ip_version in IpVersion::ALL {
            let names: Vec<&str> = results.pass(ip_version).iter().map(|s| s.region.as_str()).collect();
            assert_eq!(names, vec!["Beijing", "Shanghai"]);
        }
        assert_eq!(results.sample_count, 1);
        assert_eq!(results.timeout_seconds, 1);
    }

    #[tokio::test]
    async fn test_empty_provider_contributes_no_entry() {
        let connector = Arc::new(ScriptedConnector::new());
        let results = runner(connector, 1).run(&regions()).await;

        for ip_version in IpVersion::ALL {
            let shanghai = &results.pass(ip_version)[1];
            let providers: Vec<Provider> = shanghai.results.iter().map(|s| s.provider).collect();
            assert_eq!(providers, vec![Provider::Unicom, Provider::Telecom]);
        }
    }

    #[tokio::test]
    async fn test_ipv4_pass_completes_before_ipv6_with_derived_addresses() {
        let connector = Arc::new(ScriptedConnector::new());
        runner(connector.clone(), 1).run(&regions()).await;

        assert_eq!(
            connector.calls(),
            vec![
                "bj-cu-v4.ip.example:80",
                "bj-cm-v4.ip.example:80",
                "bj-ct-v4.ip.example:80",
                "sh-cu-v4.ip.example:80",
                "sh-ct-v4.ip.example:80",
                "bj-cu-v6.ip.example:80",
                "bj-cm-v6.ip.example:80",
                "bj-ct-v6.ip.example:80",
                "sh-cu-v6.ip.example:80",
                "sh-ct-v6.ip.example:80",
            ]
        );
    }

    #[tokio::test]
    async fn test_address_without_marker_is_probed_unchanged_in_ipv6_pass() {
        let regions = vec![RegionRecord::new("Chengdu").with_address(Provider::Mobile, "203.0.113.9:443")];
        let connector = Arc::new(ScriptedConnector::new());

        let results = runner(connector.clone(), 1).run(&regions).await;

        assert_eq!(connector.calls(), vec!["203.0.113.9:443", "203.0.113.9:443"]);
        assert_eq!(results.ipv6[0].results[0].address, "203.0.113.9:443");
        assert_eq!(results.ipv6[0].results[0].ip_version, IpVersion::V6);
    }

    #[tokio::test]
    async fn test_failures_are_isolated() {
        let regions = vec![
            RegionRecord::new("Beijing")
                .with_address(Provider::Unicom, "bad-format-no-port")
                .with_address(Provider::Mobile, "down-v4.ip.example:80"),
            RegionRecord::new("Shanghai").with_address(Provider::Telecom, "up-v4.ip.example:80"),
        ];
        let connector = Arc::new(
            ScriptedConnector::new()
                .reachable("up-v4.ip.example:80", 12, 2)
                .reachable("up-v6.ip.example:80", 30, 2),
        );

        let results = runner(connector.clone(), 2).run(&regions).await;

        let beijing = &results.ipv4[0].results;
        assert_eq!(beijing.len(), 2);
        assert!(beijing[0].is_malformed());
        assert_eq!(beijing[1].loss_rate, 100.0);
        assert!(beijing[1].latency.is_none());

        let shanghai_v4 = &results.ipv4[1].results[0];
        assert_eq!(shanghai_v4.loss_rate, 0.0);
        assert_eq!(shanghai_v4.latency.unwrap().avg_ms, 12.0);

        let shanghai_v6 = &results.ipv6[1].results[0];
        assert_eq!(shanghai_v6.latency.unwrap().avg_ms, 30.0);

        // Malformed address never reaches the connector in either pass
        assert!(connector.calls().iter().all(|call| call != "bad-format-no-port"));
        assert_eq!(connector.call_count(), 8);
    }

    #[tokio::test]
    async fn test_region_without_providers_is_still_listed() {
        let regions = vec![RegionRecord::new("Lhasa")];
        let connector = Arc::new(ScriptedConnector::new());

        let results = runner(connector.clone(), 3).run(&regions).await;

        assert_eq!(results.ipv4.len(), 1);
        assert_eq!(results.ipv6.len(), 1);
        assert!(results.ipv4[0].results.is_empty());
        assert_eq!(connector.call_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_region_list() {
        let results = runner(Arc::new(ScriptedConnector::new()), 1).run(&[]).await;
        assert!(results.ipv4.is_empty());
        assert!(results.ipv6.is_empty());
    }
}
