//! TCP Ping Tester - Main CLI Application
//!
//! Probes TCP connect latency and loss for every region and carrier of a
//! region map, over IPv4 and then IPv6, and saves a markdown report.

use chrono::Local;
use clap::Parser;
use std::process;
use std::sync::Arc;
use tcp_ping_tester::{
    cli::Cli,
    config::{apply_test_mode, display_config_summary, load_config, load_region_map},
    defaults::TEST_MODE_REGION_LIMIT,
    error::{AppError, ErrorReporter, Result},
    logging::Logger,
    output::{ConsoleProgress, OutputFormatterFactory, ReportCoordinator},
    CampaignRunner, EndpointProber, ProbeSettings, TcpConnector, BUILD_TIME, GIT_COMMIT, PKG_NAME, TARGET_TRIPLE,
    VERSION,
};

#[tokio::main]
async fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
        process::exit(99);
    }));

    let cli = Cli::parse();
    let reporter = ErrorReporter::new(cli.use_colors(), cli.verbose || cli.debug);

    if let Err(message) = cli.validate() {
        let error = AppError::validation(message);
        reporter.report_error(&error);
        process::exit(error.exit_code());
    }

    if let Err(e) = run_application(cli).await {
        reporter.report_error(&e);
        process::exit(e.exit_code());
    }
}

/// Main application logic
async fn run_application(cli: Cli) -> Result<()> {
    let use_color = cli.use_colors();
    let config = load_config(cli)?;
    let use_color = use_color && config.enable_color;
    colored::control::set_override(use_color);

    let coordinator = ReportCoordinator::new(
        OutputFormatterFactory::create_formatter(use_color, config.verbose),
        config.verbose,
    );
    let formatter = coordinator.formatter();

    println!("{}\n", formatter.format_header("TCP Ping 测试工具")?);

    if config.debug {
        println!("{}", formatter.format_info(&format!("{} v{}", PKG_NAME, VERSION)));
        if let Some(built) = BUILD_TIME {
            let commit = GIT_COMMIT.unwrap_or("unknown");
            let target = TARGET_TRIPLE.unwrap_or("unknown");
            println!("{}", formatter.format_info(&format!("Built {} ({}, {})", built, commit, target)));
        }
        println!("{}\n", formatter.format_info(&display_config_summary(&config)));
    }

    let mut logger = Logger::with_config("tcp-ping", &config);
    logger.set_color(use_color);
    let logger = Arc::new(logger);

    let regions = load_region_map(&config.map_file)?;
    if config.test_mode && regions.len() > TEST_MODE_REGION_LIMIT {
        println!(
            "{}",
            formatter.format_warning(&format!("测试模式: 只测试前 {} 个省份", TEST_MODE_REGION_LIMIT))
        );
    }
    let regions = apply_test_mode(regions, config.test_mode);

    let settings = ProbeSettings::try_from(&config)?;
    println!(
        "{}",
        formatter.format_success(&format!(
            "开始测试 {} 个省份,每个节点 {} 次",
            regions.len(),
            settings.samples()
        ))
    );

    let prober = EndpointProber::new(
        Arc::new(TcpConnector::new()),
        settings,
        Arc::new(ConsoleProgress::new(use_color, config.verbose)),
        logger.clone(),
    )?;
    let results = CampaignRunner::new(prober).run(&regions).await;

    println!("{}", coordinator.display_results(&results)?);

    let generated_at = Local::now();
    let report_path = config.report_path(results.started_at.with_timezone(&Local));
    coordinator.write_markdown(&results, &report_path, generated_at)?;
    println!("{}\n", formatter.format_success(&format!("结果已保存: {}", report_path.display())));

    if let Some(ref json_path) = config.json_output {
        coordinator.write_json(&results, json_path, generated_at)?;
        println!("{}\n", formatter.format_success(&format!("JSON 结果已保存: {}", json_path.display())));
    }

    logger
        .info("report written")
        .field("markdown", report_path.display().to_string())
        .field("json", config.json_output.as_ref().map(|p| p.display().to_string()))
        .log()
        .await;

    Ok(())
}
