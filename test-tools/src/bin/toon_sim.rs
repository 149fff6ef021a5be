/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! toon-sim: runs a Toon session against a simulated, flaky device.
//!
//! The simulated Toon answers every fetch after `--latency-ms` and fails
//! every `--fail-every`-th request with a transport error, so the failure
//! and recovery path of the coordinator can be watched in the logs.
//!
//! Usage:
//!   RUST_LOG=debug toon-sim --config toon.yaml --fail-every 7 --latency-ms 150

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::Parser;
use tracing::{info, warn};

use toon_coordinator::config::ToonConfig;
use toon_coordinator::device::{DeviceClient, DeviceError};
use toon_coordinator::session::Session;

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(name = "toon-sim", about = "Drive the Toon coordinator against a simulated device")]
struct Cli {
    /// Path to the YAML device configuration file.
    #[arg(short = 'c', long = "config")]
    config: PathBuf,

    /// Fail every Nth request (0 = never).
    #[arg(short = 'f', long = "fail-every", default_value_t = 0)]
    fail_every: u64,

    /// Artificial round-trip time per request.
    #[arg(short = 'l', long = "latency-ms", default_value_t = 100)]
    latency_ms: u64,
}

// ── Simulated device state ────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
struct SimState {
    thermostat_temp: f64,
    setpoint: f64,
    boiler_pressure_bar: Option<f64>,
    power_usage_w: Option<u64>,
    program_active: Option<bool>,
}

// ── SimulatedToon ─────────────────────────────────────────────────────────────

#[derive(Debug)]
struct SimulatedToon {
    fail_every: u64,
    latency: Duration,
    requests: AtomicU64,
    state: Mutex<Arc<SimState>>,
}

impl SimulatedToon {
    fn new(fail_every: u64, latency: Duration) -> Self {
        Self {
            fail_every,
            latency,
            requests: AtomicU64::new(0),
            state: Mutex::new(Arc::new(SimState {
                thermostat_temp: 19.5,
                setpoint: 20.0,
                ..SimState::default()
            })),
        }
    }

    /// Simulate one round trip and, if it succeeds, apply `update`.
    async fn request(&self, what: &str, update: impl FnOnce(&mut SimState, u64)) -> Result<(), DeviceError> {
        let n = self.requests.fetch_add(1, Ordering::Relaxed) + 1;
        tokio::time::sleep(self.latency).await;

        if self.fail_every > 0 && n % self.fail_every == 0 {
            return Err(DeviceError::Transport(format!(
                "simulated connection reset on request #{n} ({what})"
            )));
        }

        let mut guard = self
            .state
            .lock()
            .map_err(|_| DeviceError::InvalidResponse("simulator state poisoned".into()))?;
        let mut next = SimState::clone(&guard);
        update(&mut next, n);
        *guard = Arc::new(next);
        Ok(())
    }
}

#[async_trait]
impl DeviceClient for SimulatedToon {
    type Snapshot = SimState;

    async fn fetch_boiler(&self) -> Result<(), DeviceError> {
        self.request("boiler", |s, n| {
            s.boiler_pressure_bar = Some(1.5 + (n % 5) as f64 * 0.02);
        })
        .await
    }

    async fn fetch_energy_meter(&self) -> Result<(), DeviceError> {
        self.request("p1_meter", |s, n| {
            s.power_usage_w = Some(250 + (n * 37) % 900);
        })
        .await
    }

    async fn fetch_program(&self) -> Result<(), DeviceError> {
        self.request("program", |s, n| {
            s.program_active = Some(n % 2 == 0);
        })
        .await
    }

    async fn fetch_climate(&self) -> Result<(), DeviceError> {
        self.request("thermostat", |s, _| {
            // Drift towards the setpoint
            s.thermostat_temp += (s.setpoint - s.thermostat_temp) * 0.1;
        })
        .await
    }

    fn snapshot(&self) -> Arc<SimState> {
        match self.state.lock() {
            Ok(state) => Arc::clone(&state),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = ToonConfig::load_from_file(&cli.config)?;

    info!(
        fail_every = cli.fail_every,
        latency_ms = cli.latency_ms,
        "Starting simulated Toon"
    );
    let toon = Arc::new(SimulatedToon::new(
        cli.fail_every,
        Duration::from_millis(cli.latency_ms),
    ));

    let session = Session::setup(&config, toon)
        .await
        .context("Session setup failed")?;

    let mut updates = session.coordinator().subscribe();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = updates.changed() => {
                if changed.is_err() {
                    warn!("Coordinator loop ended unexpectedly");
                    break;
                }
                let state = updates.borrow_and_update().clone();
                match (&state.snapshot, &state.last_error) {
                    (_, Some(err)) => warn!(cycle = state.cycles, error = %err, "update failed, entities unavailable"),
                    (Some(s), None) => info!(
                        cycle = state.cycles,
                        temp = format!("{:.2}", s.thermostat_temp),
                        setpoint = s.setpoint,
                        boiler_bar = ?s.boiler_pressure_bar,
                        power_w = ?s.power_usage_w,
                        program = ?s.program_active,
                        "update"
                    ),
                    (None, None) => {}
                }
            }
        }
    }

    session.unload().await.context("Coordinator loop panicked")?;
    info!("Bye");
    Ok(())
}
