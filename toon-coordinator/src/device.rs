/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Boundary to the Toon device-API client.
//!
//! The client owns the HTTP transport, response parsing and the aggregated
//! device state.  The coordinator only needs four fetch operations and a way
//! to read the current snapshot, so that is all [`DeviceClient`] exposes.
//!
//! Fetches take `&self`: the client keeps its snapshot behind its own
//! interior mutability and publishes a fresh `Arc` whenever a fetch changes
//! it.  Handing out `Arc<Snapshot>` lets consumers hold on to a snapshot
//! without blocking the next poll.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

/// Failure reported by a single fetch.
///
/// `Clone` so the last failure can be published to every subscriber of the
/// coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeviceError {
    /// The request never produced a response (connection refused, reset,
    /// DNS failure, ...).
    #[error("transport error: {0}")]
    Transport(String),

    /// The client gave up waiting for the device.
    #[error("request timed out after {secs}s")]
    Timeout { secs: u64 },

    /// The device answered, but the body could not be understood.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The device answered with an error status.
    #[error("device rejected request with status {status}: {message}")]
    Rejected { status: u16, message: String },
}

/// Client for one rooted Toon.
///
/// Each fetch refreshes one part of the client's snapshot.  A fetch that
/// returns `Err` must leave the previously published snapshot intact.
#[async_trait]
pub trait DeviceClient: Send + Sync {
    /// Aggregated device state.  Opaque to the coordinator.
    type Snapshot: Send + Sync;

    /// Refresh boiler readings (pressure, temperatures, modulation).
    async fn fetch_boiler(&self) -> Result<(), DeviceError>;

    /// Refresh P1 energy-meter readings.
    async fn fetch_energy_meter(&self) -> Result<(), DeviceError>;

    /// Refresh the thermostat program (schedule).
    async fn fetch_program(&self) -> Result<(), DeviceError>;

    /// Refresh thermostat state (temperatures, setpoint, burner state).
    async fn fetch_climate(&self) -> Result<(), DeviceError>;

    /// The snapshot as of the last successful fetch.
    fn snapshot(&self) -> Arc<Self::Snapshot>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_error_messages() {
        assert_eq!(
            DeviceError::Transport("connection refused".into()).to_string(),
            "transport error: connection refused"
        );
        assert_eq!(
            DeviceError::Timeout { secs: 5 }.to_string(),
            "request timed out after 5s"
        );
        assert_eq!(
            DeviceError::Rejected {
                status: 500,
                message: "boiler module offline".into()
            }
            .to_string(),
            "device rejected request with status 500: boiler module offline"
        );
    }
}
