// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Capability-checked command dispatch.
//!
//! The dispatcher maps an [`Ability`] request onto the cloud command
//! vocabulary after verifying the target device type supports it. An
//! unsupported ability is rejected before any command is issued — that
//! is a contract violation, never a network failure, and must not be
//! retried. Network-dependent dispatches may fail with a device error;
//! retry policy belongs to the caller.

use std::collections::HashMap;
use std::sync::Arc;

use crate::ability::{Ability, supports};
use crate::client::{CloudClient, Command};
use crate::device::{Device, Temperatures};
use crate::error::{Error, Result};
use crate::session::Session;

/// Saturation floor applied to color changes, in percent.
///
/// Values below this wash out on the bulbs this library targets, so the
/// requested saturation is raised to at least 60 before sending.
const SATURATION_FLOOR: u8 = 60;

/// Brightness value sent with every color change, in percent.
const COLOR_BRIGHTNESS: u8 = 100;

/// Result of a successful [`Dispatcher::invoke`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    /// The command was accepted by the cloud.
    Done,
    /// Temperature read-out for a `show_temperatures` request.
    Temperatures(Temperatures),
}

/// Shared, swappable handle to the process-wide session.
///
/// Reads are cheap clones of the inner [`Arc`]; a refresh swaps the whole
/// value under the write lock, so in-flight dispatches keep the session
/// they started with.
pub type SharedSession = Arc<parking_lot::RwLock<Arc<Session>>>;

/// Capability-checked dispatcher over a [`CloudClient`].
///
/// Calls against different devices run in parallel; calls targeting the
/// same device id are serialized through a per-device async mutex so
/// state-changing commands cannot land out of order.
///
/// # Examples
///
/// ```no_run
/// use homecloud_lib::{Ability, Dispatcher};
///
/// # async fn example<C: homecloud_lib::CloudClient>(
/// #     dispatcher: Dispatcher<C>,
/// #     lamp: homecloud_lib::Device,
/// # ) -> homecloud_lib::Result<()> {
/// dispatcher.invoke(&lamp, Ability::PowerOn).await?;
/// dispatcher
///     .invoke(&lamp, Ability::ChangeColor { hue: 200, saturation: 80 })
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Dispatcher<C> {
    client: Arc<C>,
    session: SharedSession,
    /// Per-device serialization locks, created lazily by device id.
    device_locks: parking_lot::Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl<C: CloudClient> Dispatcher<C> {
    /// Creates a dispatcher over a cloud client and a shared session.
    #[must_use]
    pub fn new(client: Arc<C>, session: SharedSession) -> Self {
        Self {
            client,
            session,
            device_locks: parking_lot::Mutex::new(HashMap::new()),
        }
    }

    /// Invokes an ability on a device.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedAbility`] if the device type does not support
    ///   the ability; no command is issued and the call must not be retried.
    /// - [`Error::Device`] for remote rejections or connectivity failures;
    ///   these are scoped to this invocation and may be retried by the
    ///   caller.
    pub async fn invoke(&self, device: &Device, ability: Ability) -> Result<Outcome> {
        if !supports(device.kind, ability.kind()) {
            let err = Error::UnsupportedAbility {
                ability: ability.kind(),
                kind: device.kind,
            };
            tracing::warn!(device = %device.name, kind = %device.kind, error = %err, "dispatch rejected");
            return Err(err);
        }

        let lock = self.device_lock(&device.id);
        let _serialized = lock.lock().await;

        let result = self.perform(device, ability).await;
        if let Err(ref err) = result {
            tracing::warn!(
                device = %device.name,
                ability = %ability.kind(),
                error = %err,
                "dispatch failed"
            );
        }
        result
    }

    async fn perform(&self, device: &Device, ability: Ability) -> Result<Outcome> {
        match ability {
            Ability::PowerOn => self.send(device, Command::TurnOn).await,
            Ability::PowerOff => self.send(device, Command::TurnOff).await,
            Ability::ChangeColor { hue, saturation } => {
                let command = Command::SetColor {
                    hue,
                    saturation: saturation.max(SATURATION_FLOOR),
                    brightness: COLOR_BRIGHTNESS,
                };
                self.send(device, command).await
            }
            Ability::IncrementTargetTemp => self.step_target_temp(device, 1.0).await,
            Ability::DecrementTargetTemp => self.step_target_temp(device, -1.0).await,
            Ability::ShowTemperatures => {
                // Pure read; no command is sent.
                let temperatures = Temperatures {
                    current: device.current_temperature()?,
                    target: device.target_temperature()?,
                };
                Ok(Outcome::Temperatures(temperatures))
            }
        }
    }

    /// Steps the target temperature by exactly one unit.
    ///
    /// No clamping against a device-reported range; an out-of-range value
    /// is the remote service's to reject.
    async fn step_target_temp(&self, device: &Device, delta: f64) -> Result<Outcome> {
        let target = device.target_temperature()?;
        let new_target = target + delta;
        tracing::info!(
            device = %device.name,
            from = target,
            to = new_target,
            "stepping target temperature"
        );
        self.send(device, Command::SetTemperature(new_target)).await
    }

    async fn send(&self, device: &Device, command: Command) -> Result<Outcome> {
        let session = Arc::clone(&self.session.read());
        self.client.send_command(&session, device, &command).await?;
        Ok(Outcome::Done)
    }

    fn device_lock(&self, device_id: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.device_locks.lock();
        Arc::clone(
            locks
                .entry(device_id.to_string())
                .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(()))),
        )
    }
}
