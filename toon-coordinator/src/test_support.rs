/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Scripted device client shared by the unit tests.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::device::{DeviceClient, DeviceError};
use crate::task::Subsystem;

/// Snapshot produced by [`ScriptedToon`]: bumps on every successful fetch.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct FakeSnapshot {
    pub version: u64,
}

/// Records every fetch in call order and fails the next fetch of any
/// subsystem armed with [`fail_next`](Self::fail_next).
#[derive(Debug)]
pub(crate) struct ScriptedToon {
    calls: Mutex<Vec<Subsystem>>,
    armed: Mutex<HashSet<Subsystem>>,
    snapshot: Mutex<Arc<FakeSnapshot>>,
}

impl ScriptedToon {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            armed: Mutex::new(HashSet::new()),
            snapshot: Mutex::new(Arc::new(FakeSnapshot { version: 0 })),
        }
    }

    /// Make the next fetch of `subsystem` fail with a transport error.
    pub fn fail_next(&self, subsystem: Subsystem) {
        self.armed.lock().unwrap().insert(subsystem);
    }

    /// Every fetch so far, including failed ones.
    pub fn calls(&self) -> Vec<Subsystem> {
        self.calls.lock().unwrap().clone()
    }

    /// Forget recorded calls.
    pub fn take_calls(&self) -> Vec<Subsystem> {
        std::mem::take(&mut *self.calls.lock().unwrap())
    }

    fn record(&self, subsystem: Subsystem) -> Result<(), DeviceError> {
        self.calls.lock().unwrap().push(subsystem);
        if self.armed.lock().unwrap().remove(&subsystem) {
            return Err(DeviceError::Transport(format!("{subsystem} unreachable")));
        }
        let mut snapshot = self.snapshot.lock().unwrap();
        *snapshot = Arc::new(FakeSnapshot {
            version: snapshot.version + 1,
        });
        Ok(())
    }
}

#[async_trait]
impl DeviceClient for ScriptedToon {
    type Snapshot = FakeSnapshot;

    async fn fetch_boiler(&self) -> Result<(), DeviceError> {
        self.record(Subsystem::Boiler)
    }

    async fn fetch_energy_meter(&self) -> Result<(), DeviceError> {
        self.record(Subsystem::EnergyMeter)
    }

    async fn fetch_program(&self) -> Result<(), DeviceError> {
        self.record(Subsystem::Program)
    }

    async fn fetch_climate(&self) -> Result<(), DeviceError> {
        self.record(Subsystem::Thermostat)
    }

    fn snapshot(&self) -> Arc<FakeSnapshot> {
        Arc::clone(&self.snapshot.lock().unwrap())
    }
}
