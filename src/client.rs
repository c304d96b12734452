// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The narrow interface to the remote device cloud.
//!
//! The wire protocol is owned entirely by implementations of
//! [`CloudClient`]; this library only assumes that a command is either
//! accepted or rejected, and never polls for device convergence.

use crate::config::{Application, Config};
use crate::device::Device;
use crate::error::{ConfigError, Result};
use crate::session::Session;

/// Credential view over a validated [`Config`], passed to
/// [`CloudClient::authenticate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Credentials<'a> {
    /// Cloud account username.
    pub username: &'a str,
    /// Cloud account password.
    pub password: &'a str,
    /// Account country code.
    pub country_code: &'a str,
    /// Application the account belongs to.
    pub application: Application,
}

impl<'a> Credentials<'a> {
    /// Builds a credential view from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the configuration carries an
    /// application value that would not pass validation.
    pub fn from_config(config: &'a Config) -> std::result::Result<Self, ConfigError> {
        Ok(Self {
            username: &config.username,
            password: &config.password,
            country_code: &config.country_code,
            application: config.application()?,
        })
    }
}

/// A command the core asks the cloud to deliver to a device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Power the device on; activates scene devices.
    TurnOn,
    /// Power the device off.
    TurnOff,
    /// Set a light's HSB color.
    SetColor {
        /// Hue in degrees (0-360).
        hue: u16,
        /// Saturation percent (0-100).
        saturation: u8,
        /// Brightness percent (0-100).
        brightness: u8,
    },
    /// Set a climate device's target temperature.
    SetTemperature(f64),
}

/// Client adapter for the remote device-cloud API.
///
/// Implementations own transport, wire format, and timeouts. The core
/// injects one client instance and a [`Session`] into everything that
/// talks to the cloud; no ambient global session exists.
///
/// # Errors
///
/// Implementations report failures through the crate [`Error`] taxonomy:
/// [`Error::Auth`] from `authenticate`, [`Error::Discovery`] from the
/// inventory calls, and [`Error::Device`] from `send_command`.
///
/// [`Error`]: crate::Error
/// [`Error::Auth`]: crate::Error::Auth
/// [`Error::Discovery`]: crate::Error::Discovery
/// [`Error::Device`]: crate::Error::Device
pub trait CloudClient: Send + Sync {
    /// Authenticates against the cloud, returning a fresh session.
    fn authenticate(
        &self,
        credentials: Credentials<'_>,
    ) -> impl Future<Output = Result<Session>> + Send;

    /// Triggers a server-side inventory refresh.
    fn discover(&self, session: &Session) -> impl Future<Output = Result<()>> + Send;

    /// Lists the full device inventory.
    fn list_devices(&self, session: &Session) -> impl Future<Output = Result<Vec<Device>>> + Send;

    /// Delivers a command to a device. Fire-and-forget: resolution means
    /// the cloud accepted or rejected it, nothing more.
    fn send_command(
        &self,
        session: &Session,
        device: &Device,
        command: &Command,
    ) -> impl Future<Output = Result<()>> + Send;
}
