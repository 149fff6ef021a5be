/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Toon coordinator – multi-rate polling of a rooted Toon
//!
//! Module layout:
//!
//! ```text
//! lib.rs
//! ├── config/       – YAML device configuration
//! ├── interval/     – common interval / relative interval math (GCD)
//! ├── task.rs       – pollable subsystems and update tasks
//! ├── device.rs     – device-client boundary (trait + error)
//! ├── scheduler/    – the multi-rate poll scheduler
//! ├── coordinator.rs – timer loop and published state
//! └── session.rs    – per-device session ownership
//! ```

pub mod config;
pub mod coordinator;
pub mod device;
pub mod interval;
pub mod scheduler;
pub mod session;
pub mod task;

#[cfg(test)]
pub(crate) mod test_support;
