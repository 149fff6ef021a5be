/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Pollable subsystems and the update tasks built from configuration.
//!
//! ```text
//! ToonConfig ──(tasks_from_config)──►  Vec<UpdateTask>  ──(SchedulePlan::build)──►  due sets per tick
//!                                       ↑ registration order = execution order
//! ```
//!
//! An [`UpdateTask`] is plain data: which subsystem, whether it is enabled and
//! how often it wants to run.  The fetch itself is dispatched through
//! [`Subsystem::fetch`] against the device client, so tasks stay `Copy` and
//! can be compared in tests.

use std::fmt;

use crate::config::PollingConfig;
use crate::device::{DeviceClient, DeviceError};

// ── Subsystem ─────────────────────────────────────────────────────────────────

/// One independently pollable part of the Toon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subsystem {
    /// Boiler module readings.
    Boiler,
    /// P1 smart-meter adapter (electricity / gas).
    EnergyMeter,
    /// Thermostat program (weekly schedule).
    Program,
    /// Thermostat state.  Always polled.
    Thermostat,
}

impl Subsystem {
    /// Stable lowercase name used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Subsystem::Boiler => "boiler",
            Subsystem::EnergyMeter => "p1_meter",
            Subsystem::Program => "program",
            Subsystem::Thermostat => "thermostat",
        }
    }

    /// Invoke the client's fetch operation for this subsystem.
    pub async fn fetch<C>(self, client: &C) -> Result<(), DeviceError>
    where
        C: DeviceClient + ?Sized,
    {
        match self {
            Subsystem::Boiler => client.fetch_boiler().await,
            Subsystem::EnergyMeter => client.fetch_energy_meter().await,
            Subsystem::Program => client.fetch_program().await,
            Subsystem::Thermostat => client.fetch_climate().await,
        }
    }
}

impl fmt::Display for Subsystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── UpdateTask ────────────────────────────────────────────────────────────────

/// One pollable subsystem with its requested cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateTask {
    pub subsystem: Subsystem,

    /// Disabled tasks are dropped from the plan, not skipped at runtime.
    pub enabled: bool,

    /// Requested poll period in seconds.  Must be positive for enabled tasks.
    pub period_secs: u64,
}

impl UpdateTask {
    /// An enabled task.
    pub fn new(subsystem: Subsystem, period_secs: u64) -> Self {
        Self {
            subsystem,
            enabled: true,
            period_secs,
        }
    }

    /// A task whose enabled flag comes from configuration.
    pub fn with_enabled(subsystem: Subsystem, enabled: bool, period_secs: u64) -> Self {
        Self {
            subsystem,
            enabled,
            period_secs,
        }
    }
}

/// Build the task list from configuration.
///
/// Registration order is fixed: boiler, P1 meter, program, thermostat.  The
/// thermostat task has no enable flag and is always enabled.
pub fn tasks_from_config(polling: &PollingConfig) -> Vec<UpdateTask> {
    vec![
        UpdateTask::with_enabled(
            Subsystem::Boiler,
            polling.boiler.enabled,
            polling.boiler.scan_interval_secs,
        ),
        UpdateTask::with_enabled(
            Subsystem::EnergyMeter,
            polling.p1_meter.enabled,
            polling.p1_meter.scan_interval_secs,
        ),
        UpdateTask::with_enabled(
            Subsystem::Program,
            polling.program.enabled,
            polling.program.scan_interval_secs,
        ),
        UpdateTask::new(Subsystem::Thermostat, polling.thermostat_scan_interval_secs),
    ]
}

// ── Tests ─────────────────────────────────────────────────────────────────────
