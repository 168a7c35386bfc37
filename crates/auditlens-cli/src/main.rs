use std::env;
use std::fs;

use anyhow::{Context, Result};
use auditlens_cli::cli::load_json;
use auditlens_cli::output::save_report;
use auditlens_cli::report::render;
use auditlens_cli::{Cli, OutputFormat};
use auditlens_core::facts::{BusinessProfile, PerformanceMetrics};
use auditlens_core::{AuditConfig, Auditor, Enriched, HttpCrawler, LlmAugmenter, StaticPage};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // Logs go to stderr so stdout carries only the report
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let cwd = env::current_dir().context("failed to read working directory")?;
    let mut config = AuditConfig::resolve(cli.config.as_deref(), &cwd)
        .context("failed to load configuration")?;
    cli.apply(&mut config);
    config.validate().context("invalid configuration")?;

    let page_url = cli.page_url()?;
    let performance: Option<PerformanceMetrics> =
        cli.performance.as_deref().map(load_json).transpose()?;
    let business: Option<BusinessProfile> = cli.business.as_deref().map(load_json).transpose()?;

    let augmenter = if config.ai.enabled {
        match LlmAugmenter::new(&config.ai) {
            Ok(augmenter) => Some(augmenter),
            Err(err) => {
                info!(error = %err, "AI augmentation unavailable, using deterministic tasks");
                None
            }
        }
    } else {
        None
    };

    let auditor = Auditor::standard(config.clone())
        .context("invalid check catalog")?
        .with_augmenter(augmenter);

    let result = if cli.html {
        let html = fs::read_to_string(&cli.target)
            .with_context(|| format!("failed to read HTML file {}", cli.target))?;
        let crawler = Enriched::new(StaticPage::new(html))
            .performance(performance)
            .business(business);
        auditor.run(&crawler, page_url.as_str()).await
    } else {
        let crawler = Enriched::new(HttpCrawler::new(&config.crawl)?)
            .performance(performance)
            .business(business);
        auditor.run(&crawler, page_url.as_str()).await
    };
    debug!(stages = ?result.stage_history, sources = ?result.data_sources, "audit finished");

    let report = render(&result, cli.format)?;
    print!("{report}");

    if let Some(save_base) = cli.save.as_deref() {
        let path = save_report(save_base, &page_url, cli.format, &report)?;
        match cli.format {
            OutputFormat::Text => println!("\nWrote report to {}", path.display()),
            OutputFormat::Json => eprintln!("Wrote report to {}", path.display()),
        }
    }

    Ok(())
}
