// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Top-level session and directory orchestration.
//!
//! [`HomeManager`] owns the lifecycle the presentation surface builds on:
//! load-or-authenticate the session, discover the inventory, classify it
//! into a [`Directory`] snapshot, and expose the [`Dispatcher`]. The
//! session and the directory are shared immutable values swapped
//! atomically behind locks, so concurrent readers never observe partial
//! state.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::client::{CloudClient, Credentials};
use crate::config::Config;
use crate::directory::Directory;
use crate::dispatch::{Dispatcher, SharedSession};
use crate::error::{Error, Result};
use crate::session::{Session, SessionCache};

/// Central coordinator for the session lifecycle and device directory.
///
/// # Examples
///
/// ```no_run
/// use homecloud_lib::{Config, HomeManager, SessionCache};
///
/// # async fn example<C: homecloud_lib::CloudClient>(client: C) -> homecloud_lib::Result<()> {
/// let config = Config::load("config.json")?;
/// let cache = SessionCache::new(".homecloud_session.json");
///
/// let manager = HomeManager::connect(config, cache, client).await?;
/// manager.refresh_devices().await?;
///
/// let directory = manager.directory();
/// for (name, _) in directory.lights() {
///     println!("light: {name}");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct HomeManager<C> {
    config: Config,
    cache: SessionCache,
    client: Arc<C>,
    session: SharedSession,
    directory: RwLock<Arc<Directory>>,
    dispatcher: Dispatcher<C>,
}

impl<C: CloudClient> HomeManager<C> {
    /// Connects to the device cloud, reusing the cached session when one
    /// exists.
    ///
    /// A corrupt cache slot does not abort startup here: the slot is
    /// invalidated with a warning and a fresh authentication is performed.
    /// Callers that want the strict behavior use
    /// [`SessionCache::load_or_authenticate`] directly.
    ///
    /// # Errors
    ///
    /// Configuration and authentication failures are fatal and surface
    /// unmodified.
    pub async fn connect(config: Config, cache: SessionCache, client: C) -> Result<Self> {
        Self::connect_with_options(config, cache, client, false).await
    }

    /// Connects with an explicit force-refresh choice.
    ///
    /// With `force_refresh` the cache slot is ignored and overwritten by a
    /// fresh authentication.
    ///
    /// # Errors
    ///
    /// Same as [`Self::connect`].
    pub async fn connect_with_options(
        config: Config,
        cache: SessionCache,
        client: C,
        force_refresh: bool,
    ) -> Result<Self> {
        let client = Arc::new(client);

        let session = match cache
            .load_or_authenticate(&config, force_refresh, client.as_ref())
            .await
        {
            Ok(session) => session,
            Err(Error::Session(err)) => {
                // Explicit fallback decision: a bad slot should not strand
                // the operator, but it is logged loudly.
                tracing::warn!(error = %err, "session cache unusable, authenticating fresh");
                cache.invalidate()?;
                cache
                    .load_or_authenticate(&config, true, client.as_ref())
                    .await?
            }
            Err(err) => return Err(err),
        };

        let session: SharedSession = Arc::new(RwLock::new(Arc::new(session)));
        let dispatcher = Dispatcher::new(Arc::clone(&client), Arc::clone(&session));

        Ok(Self {
            config,
            cache,
            client,
            session,
            directory: RwLock::new(Arc::new(Directory::default())),
            dispatcher,
        })
    }

    /// Re-discovers the inventory and atomically swaps in a new directory
    /// snapshot.
    ///
    /// On failure the previous snapshot stays in place; a partially built
    /// directory is never observable.
    ///
    /// # Errors
    ///
    /// [`Error::Discovery`] (or whatever the client surfaces) if the
    /// inventory cannot be fetched.
    pub async fn refresh_devices(&self) -> Result<Arc<Directory>> {
        let session = self.session();

        self.client.discover(&session).await?;
        let devices = self.client.list_devices(&session).await?;

        let directory = Arc::new(Directory::build(&devices, &self.config.scene_group_names));
        *self.directory.write() = Arc::clone(&directory);
        Ok(directory)
    }

    /// Forces a fresh authentication, overwriting the cache slot and
    /// swapping the shared session atomically.
    ///
    /// This is the retry path after a cloud call fails with an
    /// authentication error on a stale cached session.
    ///
    /// # Errors
    ///
    /// [`Error::Auth`] if the fresh authentication fails; the previous
    /// session stays in place.
    pub async fn refresh_session(&self) -> Result<()> {
        let session = self
            .cache
            .load_or_authenticate(&self.config, true, self.client.as_ref())
            .await?;
        *self.session.write() = Arc::new(session);
        Ok(())
    }

    /// Returns the current directory snapshot.
    #[must_use]
    pub fn directory(&self) -> Arc<Directory> {
        Arc::clone(&self.directory.read())
    }

    /// Returns the current session snapshot.
    #[must_use]
    pub fn session(&self) -> Arc<Session> {
        Arc::clone(&self.session.read())
    }

    /// Returns the capability dispatcher for this manager.
    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher<C> {
        &self.dispatcher
    }

    /// Returns the loaded configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the credential view used for authentication.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if the configuration carries an application value
    /// that would not pass validation.
    pub fn credentials(&self) -> Result<Credentials<'_>> {
        Ok(Credentials::from_config(&self.config)?)
    }
}
