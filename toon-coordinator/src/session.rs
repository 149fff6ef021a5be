/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! One managed Toon: setup, background polling, teardown.
//!
//! A [`Session`] owns its coordinator loop directly.  Whoever sets up the
//! session passes [`Session::coordinator`] down to the consumers that need
//! it; there is no process-wide registry to look sessions up in.
//!
//! # Lifecycle
//! ```text
//! setup ──► build scheduler ──► first refresh ──► spawn loop ──► … ──► unload
//!              │ ConfigurationError    │ UpdateFailed
//!              ▼                       ▼
//!          SetupError::Configuration  SetupError::NotReady  (caller retries later)
//! ```

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::oneshot;
use tokio::task::{JoinError, JoinHandle};
use tracing::{info, warn};

use crate::config::ToonConfig;
use crate::coordinator::{Coordinator, CoordinatorHandle};
use crate::device::DeviceClient;
use crate::scheduler::{ConfigurationError, PollScheduler, UpdateFailed};

/// Why a session could not be set up.
#[derive(Debug, Error)]
pub enum SetupError {
    /// The polling configuration can never be scheduled.  Fix the config.
    #[error("invalid polling configuration: {0}")]
    Configuration(#[from] ConfigurationError),

    /// The device did not answer the first refresh.  Setup may be retried.
    #[error("device not ready: {0}")]
    NotReady(#[from] UpdateFailed),
}

/// A running Toon session.
#[derive(Debug)]
pub struct Session<C: DeviceClient + ?Sized + 'static> {
    name: String,
    coordinator: CoordinatorHandle<C::Snapshot>,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl<C: DeviceClient + ?Sized + 'static> Session<C> {
    /// Build the scheduler, run the first refresh and start polling.
    ///
    /// Nothing is spawned unless the first refresh succeeds.
    ///
    /// # Errors
    /// See [`SetupError`].
    pub async fn setup(config: &ToonConfig, client: Arc<C>) -> Result<Self, SetupError> {
        info!(name = %config.name, url = %config.base_url(), "Setting up Toon session");

        let scheduler = PollScheduler::from_config(client, &config.polling)?;
        let mut coordinator = Coordinator::new(config.name.clone(), scheduler);

        if let Err(err) = coordinator.first_refresh().await {
            warn!(name = %config.name, error = %err, "First refresh failed, session not started");
            return Err(SetupError::NotReady(err));
        }

        let handle = coordinator.handle();
        let (shutdown, rx) = oneshot::channel();
        let task = tokio::spawn(coordinator.run(rx));

        Ok(Self {
            name: config.name.clone(),
            coordinator: handle,
            shutdown,
            task,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Read-only view for the consumers of this session.
    pub fn coordinator(&self) -> &CoordinatorHandle<C::Snapshot> {
        &self.coordinator
    }

    /// Stop polling and wait for the loop to exit.  A cycle in progress is
    /// allowed to finish.
    ///
    /// # Errors
    /// Returns the [`JoinError`] if the loop panicked.
    pub async fn unload(self) -> Result<(), JoinError> {
        info!(name = %self.name, "Unloading Toon session");
        // Err only if the loop is already gone; the join below reports why
        let _ = self.shutdown.send(());
        self.task.await
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SubsystemConfig;
    use crate::task::Subsystem::{Boiler, EnergyMeter, Thermostat};
    use crate::test_support::ScriptedToon;
    use std::time::Duration;

    fn config() -> ToonConfig {
        let mut config = ToonConfig::new("toon.local");
        config.polling.thermostat_scan_interval_secs = 10;
        config.polling.p1_meter = SubsystemConfig {
            enabled: true,
            scan_interval_secs: 10,
        };
        config.polling.boiler = SubsystemConfig {
            enabled: true,
            scan_interval_secs: 30,
        };
        config
    }

    #[tokio::test(start_paused = true)]
    async fn setup_populates_state_and_polls_in_background() {
        let toon = Arc::new(ScriptedToon::new());
        let session = Session::setup(&config(), Arc::clone(&toon)).await.unwrap();

        assert_eq!(session.name(), "Toon");
        assert!(session.coordinator().current_snapshot().is_some());
        assert_eq!(toon.take_calls(), vec![Boiler, EnergyMeter, Thermostat]);

        tokio::time::sleep(Duration::from_secs(35)).await;
        assert_eq!(
            toon.take_calls(),
            vec![
                EnergyMeter,
                Thermostat,
                EnergyMeter,
                Thermostat,
                Boiler,
                EnergyMeter,
                Thermostat
            ]
        );

        session.unload().await.unwrap();
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert!(toon.calls().is_empty());
    }

    #[tokio::test]
    async fn failed_first_refresh_is_not_ready() {
        let toon = Arc::new(ScriptedToon::new());
        toon.fail_next(EnergyMeter);

        let err = Session::setup(&config(), Arc::clone(&toon)).await.unwrap_err();

        assert!(matches!(err, SetupError::NotReady(_)));
        // Thermostat comes after the meter and must not have been fetched
        assert_eq!(toon.calls(), vec![Boiler, EnergyMeter]);
    }

    #[tokio::test]
    async fn invalid_polling_config_is_a_configuration_error() {
        let toon = Arc::new(ScriptedToon::new());
        let mut config = config();
        config.polling.boiler.scan_interval_secs = 0;

        let err = Session::setup(&config, Arc::clone(&toon)).await.unwrap_err();

        assert!(matches!(
            err,
            SetupError::Configuration(ConfigurationError::NonPositivePeriod { subsystem: Boiler })
        ));
        assert!(toon.calls().is_empty());
    }
}
