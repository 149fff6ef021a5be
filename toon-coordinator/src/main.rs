/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::{error, info};

use toon_coordinator::config::ToonConfig;
use toon_coordinator::scheduler::SchedulePlan;
use toon_coordinator::task::tasks_from_config;

// ── CLI argument definition ───────────────────────────────────────────────────

/// Toon coordinator – validates a device configuration and prints the
/// resulting polling plan.
///
/// Example:
///   toon-coordinator --config toon.yaml --ticks 12
#[derive(Debug, Parser)]
#[command(
    name = "toon-coordinator",
    about = "Toon multi-rate poll coordinator – configuration and plan inspector",
    long_about = None,
)]
struct Cli {
    /// Path to the YAML device configuration file.
    #[arg(short = 'c', long = "config")]
    config: PathBuf,

    /// Override the device host from the configuration file.
    #[arg(long = "host")]
    host: Option<String>,

    /// Override the device port from the configuration file.
    #[arg(short = 'p', long = "port")]
    port: Option<u16>,

    /// Number of ticks to preview (default: one full rotation).
    #[arg(short = 't', long = "ticks")]
    ticks: Option<u64>,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Level is controlled by the RUST_LOG env-var (e.g. RUST_LOG=debug).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // ── Load configuration ────────────────────────────────────────────────────
    let mut config = match ToonConfig::load_from_file(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {:#}", e);
            process::exit(1);
        }
    };
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }

    info!(
        name = %config.name,
        url  = %config.base_url(),
        naming = ?config.naming,
        "Configuration"
    );

    // ── Build the plan ────────────────────────────────────────────────────────
    let plan = match SchedulePlan::build(&tasks_from_config(&config.polling)) {
        Ok(plan) => plan,
        Err(e) => {
            error!("Invalid polling configuration: {}", e);
            process::exit(1);
        }
    };

    let ticks = plan.tick_plan();
    info!(
        common_interval_secs = ticks.common_interval_secs(),
        rotation_ticks = ticks.max_relative_interval(),
        "Polling plan"
    );
    for ((subsystem, period), relative) in plan
        .subsystems()
        .iter()
        .zip(plan.periods_secs())
        .zip(ticks.relative_intervals())
    {
        info!("  [{subsystem}]  every {period}s  = every {relative} tick(s)");
    }

    // ── Preview ───────────────────────────────────────────────────────────────
    let preview = cli.ticks.unwrap_or(ticks.max_relative_interval());
    let mut tick = 0;
    for n in 0..preview {
        let due: Vec<String> = plan.due_at(tick).iter().map(|s| s.to_string()).collect();
        info!(
            "  t={:>6}s  tick {:>3}  {}",
            n * ticks.common_interval_secs(),
            tick,
            if due.is_empty() { "-".to_string() } else { due.join(", ") }
        );
        tick = ticks.next_tick(tick);
    }
}
