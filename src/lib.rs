// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `HomeCloud` Lib - A Rust library to manage cloud-connected household devices.
//!
//! This library authenticates once against a remote device-cloud service,
//! caches and reuses the resulting session, discovers the device inventory,
//! classifies it into typed buckets with configurable scene groups, and
//! exposes a capability-checked dispatch surface for any presentation layer
//! to build on.
//!
//! # Supported Features
//!
//! - **Session lifecycle**: One-time authentication with a persisted,
//!   single-slot session cache and an explicit forced-refresh path
//! - **Device directory**: Classification into switches, lights, scenes,
//!   and climate controllers; scenes bucketed by name-pattern groups
//! - **Capability dispatch**: Power control for every type, color changes
//!   for lights, temperature read-out and stepping for climate controllers
//!
//! The remote API itself is an external collaborator reached through the
//! [`CloudClient`] trait; transport, wire format, and timeouts live in its
//! implementations.
//!
//! # Quick Start
//!
//! ```no_run
//! use homecloud_lib::{Ability, Config, HomeManager, SessionCache};
//!
//! # async fn example<C: homecloud_lib::CloudClient>(client: C) -> homecloud_lib::Result<()> {
//! // Load and validate the operator configuration
//! let config = Config::load("config.json")?;
//! let cache = SessionCache::new(".homecloud_session.json");
//!
//! // Reuses the cached session; authenticates only when the slot is empty
//! let manager = HomeManager::connect(config, cache, client).await?;
//!
//! // Discover and classify the inventory
//! let directory = manager.refresh_devices().await?;
//!
//! // Dispatch capability-checked commands
//! if let Some(lamp) = directory.lights().get("Desk Lamp") {
//!     manager.dispatcher().invoke(lamp, Ability::PowerOn).await?;
//!     manager
//!         .dispatcher()
//!         .invoke(lamp, Ability::ChangeColor { hue: 200, saturation: 80 })
//!         .await?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Scene Groups
//!
//! Scenes are bucketed under every configured group label that appears
//! (case-insensitively) in their name; unmatched scenes land in `"other"`.
//! Groups iterate in configuration order for presentation:
//!
//! ```
//! use homecloud_lib::{Device, DeviceKind, Directory};
//!
//! let devices = vec![Device::new("1", "Kitchen Evening Lights", DeviceKind::Scene)];
//! let labels = vec!["Kitchen".to_string(), "Evening".to_string()];
//! let directory = Directory::build(&devices, &labels);
//!
//! // The scene appears in both matching groups
//! assert!(directory.scene_group("kitchen").unwrap().len() == 1);
//! assert!(directory.scene_group("evening").unwrap().len() == 1);
//! ```

pub mod ability;
pub mod client;
mod config;
mod device;
mod directory;
mod dispatch;
pub mod error;
mod manager;
mod session;

pub use ability::{Ability, AbilityKind, abilities, supports};
pub use client::{CloudClient, Command, Credentials};
pub use config::{Application, Config};
pub use device::{Device, DeviceKind, Temperatures};
pub use directory::{Directory, OTHER_GROUP};
pub use dispatch::{Dispatcher, Outcome, SharedSession};
pub use error::{ConfigError, DeviceError, Error, Result, SessionError};
pub use manager::HomeManager;
pub use session::{Session, SessionCache};
