//! Performance benchmarks for the TCP ping tester
//!
//! Covers the CPU-side hot paths: sample reduction, region map parsing,
//! and rendering of the console tables and the markdown report.

use chrono::{Local, Utc};
use clap::Parser;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use tcp_ping_tester::{
    cli::Cli,
    config::parse_region_map,
    models::{CampaignResults, Config, Endpoint, LatencySummary, ProbeStatistics, RegionResultSet, Sample},
    output::{MarkdownReport, OutputFormatterFactory},
    stats::{summarize_latencies, CampaignSummary, SampleAccumulator},
    types::{IpVersion, Provider},
    ReportCoordinator,
};

/// Samples with roughly 10% failures
fn create_samples(count: usize) -> Vec<Sample> {
    (0..count)
        .map(|i| {
            if i % 10 == 0 {
                Sample::Failure
            } else {
                Sample::success(15 + (i as u64 * 7) % 90)
            }
        })
        .collect()
}

/// Region map JSON with `count` regions
fn create_region_map(count: usize) -> String {
    let records: Vec<String> = (0..count)
        .map(|i| {
            format!(
                r#"{{"province": "region-{i}", "联通": "r{i}-cu-v4.ip.example:80", "移动": "r{i}-cm-v4.ip.example:80", "电信": "r{i}-ct-v4.ip.example:80"}}"#
            )
        })
        .collect();
    format!("[{}]", records.join(","))
}

/// Campaign results for `regions` regions, one unreachable endpoint per region
fn create_results(regions: usize) -> CampaignResults {
    let pass = |ip_version| {
        (0..regions)
            .map(|i| {
                let region = format!("region-{}", i);
                let results = Provider::ALL
                    .into_iter()
                    .map(|provider| {
                        let endpoint = Endpoint::new(region.clone(), provider, ip_version, "bench-v4.ip.example:80");
                        if provider == Provider::Telecom {
                            ProbeStatistics::completed(&endpoint, 10, 0, None, 100.0)
                        } else {
                            let summary = LatencySummary {
                                min_ms: 10 + i as u64,
                                max_ms: 40 + i as u64,
                                avg_ms: 22.5 + i as f64,
                            };
                            ProbeStatistics::completed(&endpoint, 10, 9, Some(summary), 10.0)
                        }
                    })
                    .collect();
                RegionResultSet { region, results }
            })
            .collect()
    };

    CampaignResults {
        ipv4: pass(IpVersion::V4),
        ipv6: pass(IpVersion::V6),
        sample_count: 10,
        timeout_seconds: 5,
        started_at: Utc::now(),
        completed_at: Utc::now(),
    }
}

fn benchmark_sample_reduction(c: &mut Criterion) {
    let mut group = c.benchmark_group("sample_reduction");

    for size in [10usize, 100, 1000].iter() {
        let samples = create_samples(*size);
        let endpoint = Endpoint::new("bench", Provider::Unicom, IpVersion::V4, "bench-v4.ip.example:80");

        group.bench_with_input(BenchmarkId::new("accumulate", size), size, |b, _| {
            b.iter(|| {
                let mut accumulator = SampleAccumulator::with_capacity(samples.len() as u32);
                accumulator.extend(samples.iter().copied());
                black_box(accumulator.finish(&endpoint))
            });
        });

        let latencies: Vec<u64> = samples.iter().filter_map(Sample::latency_ms).collect();
        group.bench_with_input(BenchmarkId::new("summarize", size), size, |b, _| {
            b.iter(|| black_box(summarize_latencies(black_box(&latencies))));
        });
    }

    group.finish();
}

fn benchmark_config_loading(c: &mut Criterion) {
    let mut group = c.benchmark_group("config_loading");

    group.bench_function("parse_cli_args", |b| {
        b.iter(|| {
            let cli = Cli::try_parse_from(["tcp-ping", "-c", "20", "-t", "3", "-f", "regions.json", "--test"]);
            black_box(cli)
        });
    });

    group.bench_function("validate_config", |b| {
        let config = Config {
            sample_count: 20,
            timeout_seconds: 3,
            ..Default::default()
        };
        b.iter(|| black_box(config.validate()));
    });

    for size in [34usize, 500].iter() {
        let map = create_region_map(*size);
        group.bench_with_input(BenchmarkId::new("parse_region_map", size), size, |b, _| {
            b.iter(|| black_box(parse_region_map(black_box(&map))));
        });
    }

    group.finish();
}

fn benchmark_report_rendering(c: &mut Criterion) {
    let mut group = c.benchmark_group("report_rendering");
    let results = create_results(34);

    group.bench_function("console_plain", |b| {
        let coordinator = ReportCoordinator::new(OutputFormatterFactory::create_plain_formatter(), true);
        b.iter(|| black_box(coordinator.display_results(&results)));
    });

    group.bench_function("console_colored", |b| {
        let coordinator = ReportCoordinator::new(OutputFormatterFactory::create_formatter(true, true), true);
        b.iter(|| black_box(coordinator.display_results(&results)));
    });

    group.bench_function("markdown", |b| {
        let generated_at = Local::now();
        b.iter(|| black_box(MarkdownReport::new(&results, generated_at).render()));
    });

    group.bench_function("campaign_summary", |b| {
        b.iter(|| black_box(CampaignSummary::from_results(&results)));
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_sample_reduction,
    benchmark_config_loading,
    benchmark_report_rendering
);
criterion_main!(benches);
