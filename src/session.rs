// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Session value and the single-slot session cache.
//!
//! Authentication happens once; the resulting session is persisted to a
//! single slot on disk and restored verbatim on the next run. The cache
//! is last-write-wins with no versioning and no expiry check — staleness
//! only surfaces when a subsequent cloud call fails with an
//! authentication error, at which point the caller retries once with a
//! forced refresh.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::{CloudClient, Credentials};
use crate::config::Config;
use crate::error::{Error, Result, SessionError};

/// Opaque authentication artifact returned by the device cloud.
///
/// The token payload belongs to the [`CloudClient`] implementation; this
/// library only stores and restores it, never inspects it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Uninterpreted token payload owned by the cloud client.
    token: serde_json::Value,
    /// When this session was written to the cache slot, if it ever was.
    /// Observability only; never consulted for expiry.
    #[serde(default)]
    cached_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Wraps a cloud client's token payload in a session.
    #[must_use]
    pub fn new(token: serde_json::Value) -> Self {
        Self {
            token,
            cached_at: None,
        }
    }

    /// Returns the opaque token payload.
    #[must_use]
    pub fn token(&self) -> &serde_json::Value {
        &self.token
    }

    /// Returns when this session was persisted, if restored from disk.
    #[must_use]
    pub fn cached_at(&self) -> Option<DateTime<Utc>> {
        self.cached_at
    }
}

/// Single-slot, last-write-wins store for the authenticated [`Session`].
///
/// # Examples
///
/// ```no_run
/// use homecloud_lib::SessionCache;
///
/// # async fn example<C: homecloud_lib::CloudClient>(
/// #     config: homecloud_lib::Config,
/// #     client: C,
/// # ) -> homecloud_lib::Result<()> {
/// let cache = SessionCache::new(".homecloud_session.json");
/// let session = cache.load_or_authenticate(&config, false, &client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SessionCache {
    path: PathBuf,
}

impl SessionCache {
    /// Creates a cache bound to the given slot path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the slot path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the cached session, or authenticates and persists a fresh one.
    ///
    /// With a readable slot and `force_refresh == false` the remote service
    /// is never contacted. A slot that exists but cannot be decoded is
    /// surfaced as [`SessionError::Corrupt`]; this method never falls back
    /// to fresh authentication on its own — that is the caller's decision.
    ///
    /// # Errors
    ///
    /// [`Error::Session`] for a corrupt or unreadable slot, or whatever
    /// [`CloudClient::authenticate`] returns on a fresh login.
    pub async fn load_or_authenticate<C: CloudClient>(
        &self,
        config: &Config,
        force_refresh: bool,
        client: &C,
    ) -> Result<Session> {
        if !force_refresh && self.path.exists() {
            let session = self.restore()?;
            tracing::info!(path = %self.path.display(), "loaded cached session");
            return Ok(session);
        }

        tracing::info!("initializing new cloud session");
        let credentials = Credentials::from_config(config)?;
        let session = client.authenticate(credentials).await?;

        let persisted = self.persist(&session)?;
        tracing::info!(path = %self.path.display(), "saved session to cache slot");
        Ok(persisted)
    }

    /// Restores the session from the slot without contacting the cloud.
    ///
    /// # Errors
    ///
    /// [`SessionError::Io`] if the slot cannot be read,
    /// [`SessionError::Corrupt`] if its content does not decode.
    pub fn restore(&self) -> Result<Session> {
        let contents = std::fs::read_to_string(&self.path).map_err(SessionError::Io)?;
        let session = serde_json::from_str(&contents)
            .map_err(|e| SessionError::Corrupt(e.to_string()))?;
        Ok(session)
    }

    /// Writes the session to the slot, overwriting any prior content.
    ///
    /// Returns the session as persisted, with `cached_at` stamped.
    ///
    /// # Errors
    ///
    /// [`SessionError::Io`] if the slot cannot be written.
    pub fn persist(&self, session: &Session) -> Result<Session> {
        let stamped = Session {
            token: session.token.clone(),
            cached_at: Some(Utc::now()),
        };
        let contents =
            serde_json::to_string(&stamped).map_err(|e| SessionError::Corrupt(e.to_string()))?;
        std::fs::write(&self.path, contents).map_err(SessionError::Io)?;
        Ok(stamped)
    }

    /// Removes the slot, if present.
    ///
    /// # Errors
    ///
    /// [`SessionError::Io`] if the slot exists but cannot be removed.
    pub fn invalidate(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Session(SessionError::Io(e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn slot_in(dir: &tempfile::TempDir) -> SessionCache {
        SessionCache::new(dir.path().join("session.json"))
    }

    #[test]
    fn persist_then_restore_is_observationally_identical() {
        let dir = tempfile::tempdir().unwrap();
        let cache = slot_in(&dir);

        let session = Session::new(json!({"access_token": "abc", "expires": 3600}));
        cache.persist(&session).unwrap();

        let restored = cache.restore().unwrap();
        assert_eq!(restored.token(), session.token());
        assert!(restored.cached_at().is_some());
    }

    #[test]
    fn persist_overwrites_prior_slot() {
        let dir = tempfile::tempdir().unwrap();
        let cache = slot_in(&dir);

        cache.persist(&Session::new(json!({"t": 1}))).unwrap();
        cache.persist(&Session::new(json!({"t": 2}))).unwrap();

        assert_eq!(cache.restore().unwrap().token(), &json!({"t": 2}));
    }

    #[test]
    fn corrupt_slot_is_reported_not_repaired() {
        let dir = tempfile::tempdir().unwrap();
        let cache = slot_in(&dir);
        std::fs::write(cache.path(), b"not json at all").unwrap();

        let err = cache.restore().unwrap_err();
        assert!(matches!(
            err,
            Error::Session(SessionError::Corrupt(_))
        ));
        // The corrupt slot is left in place for the caller to decide.
        assert!(cache.path().exists());
    }

    #[test]
    fn missing_slot_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let cache = slot_in(&dir);

        assert!(matches!(
            cache.restore().unwrap_err(),
            Error::Session(SessionError::Io(_))
        ));
    }

    #[test]
    fn invalidate_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let cache = slot_in(&dir);

        cache.persist(&Session::new(json!({}))).unwrap();
        cache.invalidate().unwrap();
        assert!(!cache.path().exists());

        // A second invalidate on a missing slot is fine.
        cache.invalidate().unwrap();
    }

    #[test]
    fn token_is_stored_verbatim() {
        let token = json!({
            "nested": {"deep": [1, 2, 3]},
            "unicode": "Ωδε",
        });
        let dir = tempfile::tempdir().unwrap();
        let cache = slot_in(&dir);

        cache.persist(&Session::new(token.clone())).unwrap();
        assert_eq!(cache.restore().unwrap().token(), &token);
    }
}
