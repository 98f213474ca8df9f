use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use golicense_checkr::buildinfo;
use golicense_checkr::cli::{Cli, ReportFormat};
use golicense_checkr::config::load_config;
use golicense_checkr::license::classifier::TextClassifier;
use golicense_checkr::module::GoModDownload;
use golicense_checkr::report;
use golicense_checkr::scan::{self, UsedBy};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("GOLICENSE_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Load policy config; --allow replaces the configured allow-list
    let mut config = load_config(&std::env::current_dir()?, cli.config.as_deref())?;
    if !cli.allow.is_empty() {
        config.allow = cli.allow.iter().cloned().collect();
    }

    let go = std::env::var("GOLICENSE_GO").unwrap_or_else(|_| "go".to_string());

    // Extract and parse build metadata
    let raw = buildinfo::extract(&go, &cli.binaries).await?;
    let binaries = buildinfo::parse(&raw)?;
    let used_by = UsedBy::from_binaries(&binaries);
    let module_count = used_by.len();

    if !cli.quiet {
        eprintln!(
            "  {} {} binaries, {} modules",
            "→".cyan(),
            binaries.len(),
            module_count
        );
    }

    let mut resolver = GoModDownload::new(go)
        .with_jobs(cli.jobs)
        .with_timeout(Duration::from_secs(cli.timeout));

    let pb = if !cli.quiet && !used_by.is_empty() {
        let pb = ProgressBar::new(module_count as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )?
                .progress_chars("#>-"),
        );
        resolver = resolver.with_progress(pb.clone());
        Some(pb)
    } else {
        None
    };

    // Fetch modules, classify their licenses and apply the policy
    let classifier = TextClassifier::new()?;
    let summary = scan::run(&config, binaries, &resolver, &classifier).await;

    if let Some(pb) = pb {
        pb.finish_with_message("Done");
    }
    let summary = summary?;

    match cli.report {
        ReportFormat::Terminal => report::terminal::render(&summary, cli.verbose, cli.quiet),
        ReportFormat::Json => println!("{}", report::json::render(&summary)?),
    }

    // Exit code: 1 if any module is not allowed
    if !summary.all_allowed() {
        std::process::exit(1);
    }

    Ok(())
}
