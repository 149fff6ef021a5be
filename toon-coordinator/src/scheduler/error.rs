/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Structured error types for the poll scheduler.
//!
//! Two failure layers:
//!
//! * [`ConfigurationError`]: the task set cannot be scheduled at all.  Only
//!   produced while building the scheduler; fatal for the session.
//! * [`UpdateFailed`]: one poll cycle failed.  Recoverable: the next tick
//!   polls again.  Wraps the [`DeviceError`] that aborted the cycle.

use thiserror::Error;

use crate::device::DeviceError;
use crate::interval::IntervalError;
use crate::task::Subsystem;

// ── Construction ──────────────────────────────────────────────────────────────

/// Why a scheduler could not be built from its tasks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// Every task was disabled (or none were supplied).
    #[error("no enabled update tasks; at least one subsystem must be polled")]
    NoEnabledTasks,

    /// An enabled task asked for a zero-second period.
    #[error("scan interval for '{subsystem}' must be a positive number of seconds")]
    NonPositivePeriod { subsystem: Subsystem },
}

impl ConfigurationError {
    /// Translate an interval error for the enabled tasks it was computed from.
    ///
    /// `selected` must be the subsystems in the same order as the periods
    /// passed to [`TickPlan::from_periods`](crate::interval::TickPlan::from_periods).
    pub(crate) fn from_interval(err: IntervalError, selected: &[Subsystem]) -> Self {
        match err {
            IntervalError::NoPeriods => ConfigurationError::NoEnabledTasks,
            IntervalError::ZeroPeriod { position } => match selected.get(position) {
                Some(&subsystem) => ConfigurationError::NonPositivePeriod { subsystem },
                None => ConfigurationError::NoEnabledTasks,
            },
        }
    }
}

// ── Cycle failure ─────────────────────────────────────────────────────────────

/// A poll cycle was aborted by a fetch failure.
///
/// Does not say which subsystem failed; inspect [`cause`](Self::cause) (or
/// `source()`) for the underlying device error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid response from device: {source}")]
pub struct UpdateFailed {
    #[source]
    source: DeviceError,
}

impl UpdateFailed {
    pub fn new(source: DeviceError) -> Self {
        Self { source }
    }

    /// The device error that aborted the cycle.
    pub fn cause(&self) -> &DeviceError {
        &self.source
    }
}

impl From<DeviceError> for UpdateFailed {
    fn from(source: DeviceError) -> Self {
        Self::new(source)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
