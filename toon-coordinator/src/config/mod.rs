/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Device configuration loading.
//!
//! One file describes one rooted Toon.  The expected YAML structure is:
//! ```yaml
//! name: Toon
//! host: 192.168.1.50
//! port: 80
//! thermostat:
//!   scan_interval: 10
//! boiler:
//!   enabled: true
//!   scan_interval: 60
//! p1_meter:
//!   enabled: true
//!   scan_interval: 10
//! program:
//!   enabled: false
//!   scan_interval: 300
//! naming:
//!   thermostat_prefix: "Living room"
//! ```
//!
//! Only `host` is required.  Scan intervals are in seconds; they are checked
//! when the scheduler is built, not here, so a single place owns that rule.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::{debug, info};

// ── Defaults ──────────────────────────────────────────────────────────────────

/// Device name used when the file does not set one.
pub const DEFAULT_NAME: &str = "Toon";

/// HTTP port of the rooted Toon's local API.
pub const DEFAULT_PORT: u16 = 80;

/// Scan interval applied to any subsystem that does not set one.
pub const DEFAULT_SCAN_INTERVAL_SECS: u64 = 10;

// ── Private YAML deserialization types ────────────────────────────────────────

/// Top-level wrapper that maps directly onto the YAML file layout.
#[derive(Debug, Deserialize)]
struct ToonConfigFile {
    name: Option<String>,
    host: Option<String>,
    port: Option<u16>,
    #[serde(default)]
    thermostat: ThermostatEntry,
    #[serde(default)]
    boiler: SubsystemEntry,
    #[serde(default)]
    p1_meter: SubsystemEntry,
    #[serde(default)]
    program: SubsystemEntry,
    #[serde(default)]
    naming: NamingConfig,
}

#[derive(Debug, Default, Deserialize)]
struct ThermostatEntry {
    scan_interval: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct SubsystemEntry {
    #[serde(default)]
    enabled: bool,
    scan_interval: Option<u64>,
}

impl From<SubsystemEntry> for SubsystemConfig {
    fn from(entry: SubsystemEntry) -> Self {
        Self {
            enabled: entry.enabled,
            scan_interval_secs: entry.scan_interval.unwrap_or(DEFAULT_SCAN_INTERVAL_SECS),
        }
    }
}

// ── Public data structures ────────────────────────────────────────────────────

/// Enable flag and cadence of an optional subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubsystemConfig {
    pub enabled: bool,
    pub scan_interval_secs: u64,
}

impl Default for SubsystemConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            scan_interval_secs: DEFAULT_SCAN_INTERVAL_SECS,
        }
    }
}

/// Poll cadence for every subsystem.
///
/// The thermostat has no enable flag: it is always polled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollingConfig {
    pub thermostat_scan_interval_secs: u64,
    pub boiler: SubsystemConfig,
    pub p1_meter: SubsystemConfig,
    pub program: SubsystemConfig,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            thermostat_scan_interval_secs: DEFAULT_SCAN_INTERVAL_SECS,
            boiler: SubsystemConfig::default(),
            p1_meter: SubsystemConfig::default(),
            program: SubsystemConfig::default(),
        }
    }
}

/// Cosmetic prefixes/suffixes for entity names.  Carried through untouched
/// for the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    pub thermostat_prefix: String,
    pub thermostat_suffix: String,
    pub boiler_prefix: String,
    pub boiler_suffix: String,
    pub p1_meter_prefix: String,
    pub p1_meter_suffix: String,
}

/// Everything needed to set up one Toon session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToonConfig {
    pub name: String,
    pub host: String,
    pub port: u16,
    pub polling: PollingConfig,
    pub naming: NamingConfig,
}

impl ToonConfig {
    /// A config for `host` with every default applied.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            host: host.into(),
            port: DEFAULT_PORT,
            polling: PollingConfig::default(),
            naming: NamingConfig::default(),
        }
    }

    /// Parse a YAML document.
    ///
    /// # Errors
    /// Returns an error if the YAML is structurally invalid or `host` is
    /// missing or blank.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let file: ToonConfigFile =
            serde_yaml::from_str(content).context("Failed to parse Toon configuration")?;

        let host = match file.host.as_deref().map(str::trim) {
            Some(h) if !h.is_empty() => h.to_string(),
            _ => bail!("Toon configuration has no host"),
        };

        let config = Self {
            name: file.name.unwrap_or_else(|| DEFAULT_NAME.to_string()),
            host,
            port: file.port.unwrap_or(DEFAULT_PORT),
            polling: PollingConfig {
                thermostat_scan_interval_secs: file
                    .thermostat
                    .scan_interval
                    .unwrap_or(DEFAULT_SCAN_INTERVAL_SECS),
                boiler: file.boiler.into(),
                p1_meter: file.p1_meter.into(),
                program: file.program.into(),
            },
            naming: file.naming,
        };

        debug!(
            "  thermostat every {}s | boiler {:?} | p1_meter {:?} | program {:?}",
            config.polling.thermostat_scan_interval_secs,
            config.polling.boiler,
            config.polling.p1_meter,
            config.polling.program,
        );

        Ok(config)
    }

    /// Read and parse `path`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or its content is rejected
    /// by [`from_yaml_str`](Self::from_yaml_str).
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading Toon configuration from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot open configuration file: {}", path.display()))?;

        let config = Self::from_yaml_str(&content)
            .with_context(|| format!("Invalid configuration file: {}", path.display()))?;

        info!(
            name = %config.name,
            host = %config.host,
            port = config.port,
            "Loaded Toon configuration"
        );

        Ok(config)
    }

    /// Base URL of the device's local API.
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
