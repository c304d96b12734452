// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Abilities and the per-type capability table.
//!
//! Every device type supports power on/off. Lights additionally support
//! a color change; climate controllers support a temperature read-out and
//! single-unit target temperature stepping. The mapping is a static
//! lookup keyed by [`DeviceKind`], never stored on the device itself.

use std::fmt;

use crate::device::DeviceKind;

/// A capability-scoped action request against a device.
///
/// Parameterized abilities carry their inputs; the dispatcher validates
/// the target device type before any command is issued.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ability {
    /// Turn the device on. On a scene device this activates the scene.
    PowerOn,
    /// Turn the device off.
    PowerOff,
    /// Change a light's color.
    ChangeColor {
        /// Hue in degrees (0-360).
        hue: u16,
        /// Requested saturation percent; floored at 60 before sending.
        saturation: u8,
    },
    /// Raise the target temperature by one unit.
    IncrementTargetTemp,
    /// Lower the target temperature by one unit.
    DecrementTargetTemp,
    /// Read the current and target temperatures. Issues no command.
    ShowTemperatures,
}

impl Ability {
    /// Returns the flat ability identifier used in the capability table.
    #[must_use]
    pub const fn kind(&self) -> AbilityKind {
        match self {
            Self::PowerOn => AbilityKind::PowerOn,
            Self::PowerOff => AbilityKind::PowerOff,
            Self::ChangeColor { .. } => AbilityKind::ChangeColor,
            Self::IncrementTargetTemp => AbilityKind::IncrementTargetTemp,
            Self::DecrementTargetTemp => AbilityKind::DecrementTargetTemp,
            Self::ShowTemperatures => AbilityKind::ShowTemperatures,
        }
    }
}

/// Flat ability identifier, used for capability lookups and error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AbilityKind {
    /// Power on / scene activation.
    PowerOn,
    /// Power off.
    PowerOff,
    /// Light color change.
    ChangeColor,
    /// Target temperature +1.
    IncrementTargetTemp,
    /// Target temperature -1.
    DecrementTargetTemp,
    /// Temperature read-out.
    ShowTemperatures,
}

impl AbilityKind {
    /// Returns the snake_case name of this ability.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PowerOn => "power_on",
            Self::PowerOff => "power_off",
            Self::ChangeColor => "change_color",
            Self::IncrementTargetTemp => "increment_target_temp",
            Self::DecrementTargetTemp => "decrement_target_temp",
            Self::ShowTemperatures => "show_temperatures",
        }
    }
}

impl fmt::Display for AbilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const POWER_ONLY: &[AbilityKind] = &[AbilityKind::PowerOn, AbilityKind::PowerOff];

const LIGHT_ABILITIES: &[AbilityKind] = &[
    AbilityKind::PowerOn,
    AbilityKind::PowerOff,
    AbilityKind::ChangeColor,
];

const CLIMATE_ABILITIES: &[AbilityKind] = &[
    AbilityKind::PowerOn,
    AbilityKind::PowerOff,
    AbilityKind::ShowTemperatures,
    AbilityKind::IncrementTargetTemp,
    AbilityKind::DecrementTargetTemp,
];

/// Returns the abilities a device type supports.
///
/// # Examples
///
/// ```
/// use homecloud_lib::{abilities, AbilityKind, DeviceKind};
///
/// assert!(abilities(DeviceKind::Light).contains(&AbilityKind::ChangeColor));
/// assert!(!abilities(DeviceKind::Switch).contains(&AbilityKind::ChangeColor));
/// ```
#[must_use]
pub const fn abilities(kind: DeviceKind) -> &'static [AbilityKind] {
    match kind {
        DeviceKind::Switch | DeviceKind::Scene => POWER_ONLY,
        DeviceKind::Light => LIGHT_ABILITIES,
        DeviceKind::Climate => CLIMATE_ABILITIES,
        DeviceKind::Unknown => &[],
    }
}

/// Returns whether a device type supports an ability.
#[must_use]
pub fn supports(kind: DeviceKind, ability: AbilityKind) -> bool {
    abilities(kind).contains(&ability)
}
