// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `HomeCloud` library.
//!
//! This module provides the error hierarchy for handling failures across
//! the library: configuration loading, session caching, authentication,
//! device discovery, and command dispatch.

use std::path::PathBuf;

use thiserror::Error;

use crate::ability::AbilityKind;
use crate::device::DeviceKind;

/// The main error type for this library.
///
/// This enum encompasses all possible errors that can occur when managing
/// the device directory and dispatching commands through the device cloud.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred while loading or validating the configuration.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error occurred while persisting or restoring the session cache.
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// Authentication against the device cloud failed.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Device inventory discovery failed.
    ///
    /// A discovery failure aborts directory construction; a partially
    /// built directory is never returned.
    #[error("device discovery failed: {0}")]
    Discovery(String),

    /// An ability was requested on a device type that does not support it.
    ///
    /// This is a programming-contract violation, not a runtime failure,
    /// and must not be retried.
    #[error("ability {ability} is not supported by {kind} devices")]
    UnsupportedAbility {
        /// The requested ability.
        ability: AbilityKind,
        /// The type of the target device.
        kind: DeviceKind,
    },

    /// Error occurred during a device operation.
    #[error("device error: {0}")]
    Device(#[from] DeviceError),
}

/// Errors related to configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file does not exist.
    #[error("configuration file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid JSON.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configuration was parsed but failed validation.
    ///
    /// All validation issues are collected before failing; the list is
    /// never empty.
    #[error("invalid configuration: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

/// Errors related to the persisted session slot.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The cached session exists but could not be decoded.
    ///
    /// The cache never falls back to fresh authentication on its own;
    /// that decision belongs to the caller.
    #[error("session cache is corrupt: {0}")]
    Corrupt(String),

    /// The cache slot could not be read or written.
    #[error("session cache I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to device operations.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// Command was rejected by the remote device or service.
    #[error("command rejected: {0}")]
    Rejected(String),

    /// The device or the cloud service could not be reached.
    #[error("device unreachable: {0}")]
    Unreachable(String),

    /// The device's reported state is missing data the operation needs.
    #[error("invalid device state: {0}")]
    InvalidState(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
