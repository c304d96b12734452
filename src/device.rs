// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device model for cloud-discovered household devices.
//!
//! Devices are owned by the cloud client adapter; the directory and the
//! dispatcher work with the records it returns. The cloud's last-reported
//! data blob travels along as an uninterpreted [`serde_json::Value`]; the
//! only fields the core reads out of it are the climate temperatures.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DeviceError;

/// Raw-state key for the measured room temperature.
const KEY_CURRENT_TEMPERATURE: &str = "current_temperature";

/// Raw-state key for the target (set-point) temperature.
const KEY_TARGET_TEMPERATURE: &str = "temperature";

/// Typed bucket a discovered device is classified into.
///
/// The cloud reports a free-form type tag; everything outside the four
/// known tags maps to [`DeviceKind::Unknown`] and is dropped from the
/// directory (counted, not stored).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceKind {
    /// On/off relay or smart plug.
    Switch,
    /// Color-capable light.
    Light,
    /// Pre-configured multi-device activation sequence.
    Scene,
    /// Thermostat or heater with a target temperature.
    Climate,
    /// Anything the cloud reports that this library does not classify.
    Unknown,
}

impl DeviceKind {
    /// Parses the cloud's type tag into a kind.
    ///
    /// Unrecognized tags map to [`DeviceKind::Unknown`] rather than failing,
    /// so one exotic device never aborts a discovery run.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "switch" => Self::Switch,
            "light" => Self::Light,
            "scene" => Self::Scene,
            "climate" => Self::Climate,
            _ => Self::Unknown,
        }
    }

    /// Returns the wire tag for this kind.
    #[must_use]
    pub const fn as_tag(self) -> &'static str {
        match self {
            Self::Switch => "switch",
            Self::Light => "light",
            Self::Scene => "scene",
            Self::Climate => "climate",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// A household device as reported by the device cloud.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    /// Cloud-assigned device identifier.
    pub id: String,
    /// Human-facing display name; the directory's lookup key.
    pub name: String,
    /// Classified device type.
    pub kind: DeviceKind,
    /// Whether the cloud last saw the device online.
    pub online: bool,
    /// Last-reported device data, uninterpreted except for climate reads.
    #[serde(default)]
    pub raw_state: serde_json::Value,
}

impl Device {
    /// Creates a device record with empty raw state.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: DeviceKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            online: true,
            raw_state: serde_json::Value::Null,
        }
    }

    /// Sets the raw device state.
    #[must_use]
    pub fn with_raw_state(mut self, raw_state: serde_json::Value) -> Self {
        self.raw_state = raw_state;
        self
    }

    /// Marks the device offline.
    #[must_use]
    pub fn offline(mut self) -> Self {
        self.online = false;
        self
    }

    /// Reads the measured room temperature from the raw state.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::InvalidState`] if the field is missing or
    /// not a number.
    pub fn current_temperature(&self) -> Result<f64, DeviceError> {
        self.read_temperature(KEY_CURRENT_TEMPERATURE)
    }

    /// Reads the target (set-point) temperature from the raw state.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::InvalidState`] if the field is missing or
    /// not a number.
    pub fn target_temperature(&self) -> Result<f64, DeviceError> {
        self.read_temperature(KEY_TARGET_TEMPERATURE)
    }

    fn read_temperature(&self, key: &str) -> Result<f64, DeviceError> {
        self.raw_state
            .get(key)
            .and_then(serde_json::Value::as_f64)
            .ok_or_else(|| {
                DeviceError::InvalidState(format!(
                    "device '{}' reported no numeric '{key}' field",
                    self.name
                ))
            })
    }
}

/// Temperature read-out for a climate device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Temperatures {
    /// Measured room temperature.
    pub current: f64,
    /// Target (set-point) temperature.
    pub target: f64,
}
