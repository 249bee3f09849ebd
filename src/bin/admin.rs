//! CLI administration tool for covid-report-worker.
//!
//! Runs refresh cycles and inspects the snapshot store without going through
//! the HTTP server. Useful when the platform triggers refreshes from cron
//! instead of the built-in scheduler.
//!
//! # Usage
//!
//! ```bash
//! # Run one refresh cycle
//! cargo run --bin admin -- refresh
//!
//! # Print a cached snapshot
//! cargo run --bin admin -- show bc
//!
//! # Cache health and population of every key
//! cargo run --bin admin -- status
//!
//! # List partitions, keys and upstream paths
//! cargo run --bin admin -- partitions
//! ```
//!
//! # Environment Variables
//!
//! Same as the server (`REDIS_URL`, `UPSTREAM_BASE_URL`, ...). Without
//! `REDIS_URL` the commands run against an empty in-memory store, which is
//! only useful for `refresh` smoke tests.

use covid_report_worker::application::services::{RefreshService, SnapshotService};
use covid_report_worker::config;
use covid_report_worker::domain::Partition;
use covid_report_worker::server::{build_report_source, connect_cache};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;

/// CLI tool for managing covid-report-worker.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// Run one refresh cycle now
    Refresh,

    /// Print the cached snapshot of a partition (nation, summary, or a province code)
    Show {
        partition: Partition,
    },

    /// Show cache health and which keys are populated
    Status,

    /// List partitions with their cache keys and upstream paths
    Partitions,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Partitions => list_partitions(),
        Commands::Refresh => {
            let config = config::load_from_env().context("Invalid configuration")?;
            let cache = connect_cache(&config).await?;
            let source = build_report_source(&config)?;
            refresh(RefreshService::new(source, cache)).await?
        }
        Commands::Show { partition } => show(open_snapshots().await?, partition).await?,
        Commands::Status => status(open_snapshots().await?).await?,
    }

    Ok(())
}

/// Connects to the configured snapshot store for read-only commands.
async fn open_snapshots() -> Result<SnapshotService> {
    let config = config::load_from_env().context("Invalid configuration")?;
    let cache = connect_cache(&config).await?;
    Ok(SnapshotService::new(cache))
}

/// Runs a refresh cycle and reports what was written.
///
/// Exits with an error when the cycle aborts, after listing the partitions
/// that were refreshed before the failure.
async fn refresh(service: RefreshService) -> Result<()> {
    println!("{}", "Refreshing snapshots".bright_blue().bold());
    println!();

    match service.run_cycle().await {
        Ok(report) => {
            for partition in &report.written {
                println!("  {} {}", "✓".green(), partition.cache_key().cyan());
            }
            println!();
            println!(
                "{} {} partitions, {} bytes in {} ms",
                "Done:".green().bold(),
                report.written.len().to_string().bright_white().bold(),
                report.bytes_written,
                (report.finished_at - report.started_at).num_milliseconds()
            );
            Ok(())
        }
        Err(e) => {
            for partition in &e.written {
                println!("  {} {}", "✓".green(), partition.cache_key().cyan());
            }
            println!("  {} {}", "✗".red(), e.partition.cache_key().red());
            println!();
            println!(
                "{}",
                "Remaining partitions keep their previous snapshots.".yellow()
            );
            Err(e.into())
        }
    }
}

/// Prints a cached snapshot verbatim.
async fn show(service: SnapshotService, partition: Partition) -> Result<()> {
    let snapshot = service
        .get(partition)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", partition, e))?;

    match snapshot {
        Some(s) => println!("{}", s.as_str()),
        None => eprintln!(
            "{}",
            format!("{} has not been populated yet", partition.cache_key()).yellow()
        ),
    }

    Ok(())
}

/// Prints cache health and per-key population.
///
/// # Output Format
///
/// ```text
/// Snapshot store: OK
///
///   Key               Partition      Size
///   ─────────────────────────────────────────
///   canada_report     nation         48213 B
///   ab_report         province:ab    EMPTY
/// ```
async fn status(service: SnapshotService) -> Result<()> {
    let healthy = service.health_check().await;
    println!(
        "Snapshot store: {}",
        if healthy { "OK".green() } else { "UNREACHABLE".red() }
    );
    println!();

    if !healthy {
        anyhow::bail!("Snapshot store is not reachable");
    }

    println!(
        "  {:<17} {:<14} {}",
        "Key".bright_white().bold(),
        "Partition".bright_white().bold(),
        "Size".bright_white().bold()
    );
    println!("  {}", "─".repeat(41).bright_black());

    let mut populated = 0;
    let partitions = Partition::refresh_order();
    for partition in &partitions {
        let size = match service.get(*partition).await? {
            Some(s) => {
                populated += 1;
                format!("{} B", s.len()).normal()
            }
            None => "EMPTY".yellow(),
        };

        println!(
            "  {:<17} {:<14} {}",
            partition.cache_key().cyan(),
            partition.to_string().bright_black(),
            size
        );
    }

    println!();
    println!(
        "  Populated: {}/{}",
        populated.to_string().bright_white().bold(),
        partitions.len()
    );

    Ok(())
}

/// Prints the static partition table.
fn list_partitions() {
    println!(
        "  {:<14} {:<17} {}",
        "Partition".bright_white().bold(),
        "Key".bright_white().bold(),
        "Upstream".bright_white().bold()
    );
    println!("  {}", "─".repeat(58).bright_black());

    for partition in Partition::refresh_order() {
        println!(
            "  {:<14} {:<17} {}",
            partition.to_string(),
            partition.cache_key().cyan(),
            partition.upstream_path().bright_black()
        );
    }
}
