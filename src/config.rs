// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Configuration loading and validation.
//!
//! The configuration is a single JSON file carrying the operator's cloud
//! credentials and the scene-grouping rules. Loading is fail-fast and
//! atomic: validation collects every issue before rejecting, and a
//! partially valid configuration is never returned.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Allowed application values, sorted so issue messages are deterministic.
const APPLICATIONS_ALLOWED: &[&str] = &["smart_life", "tuya"];

/// The cloud application a set of credentials belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Application {
    /// The Smart Life app account.
    SmartLife,
    /// The Tuya app account.
    Tuya,
}

impl Application {
    /// Returns the wire string for this application.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SmartLife => "smart_life",
            Self::Tuya => "tuya",
        }
    }

    /// Parses a wire string. Case-sensitive.
    #[must_use]
    pub fn from_str_opt(value: &str) -> Option<Self> {
        match value {
            "smart_life" => Some(Self::SmartLife),
            "tuya" => Some(Self::Tuya),
            _ => None,
        }
    }
}

impl fmt::Display for Application {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Application {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::from_str_opt(value)
            .ok_or_else(|| format!("application type '{value}' is not valid"))
    }
}

/// Operator configuration for the device cloud.
///
/// # Examples
///
/// ```no_run
/// use homecloud_lib::Config;
///
/// let config = Config::load("config.json")?;
/// println!("account: {}", config.username);
/// # Ok::<(), homecloud_lib::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Cloud account username.
    pub username: String,
    /// Cloud account password.
    pub password: String,
    /// Account country code, e.g. `"44"`.
    pub country_code: String,
    /// Application the account belongs to.
    ///
    /// Kept as the raw string through parsing so an invalid value becomes
    /// a collected validation issue instead of a deserialization failure.
    pub application: String,
    /// Ordered scene group labels; scenes are bucketed by case-insensitive
    /// substring match against these.
    #[serde(default)]
    pub scene_group_names: Vec<String>,
}

impl Config {
    /// Loads and validates the configuration file.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::NotFound`] if the file does not exist.
    /// - [`ConfigError::Io`] / [`ConfigError::Parse`] if it cannot be read
    ///   or is not valid JSON.
    /// - [`ConfigError::Invalid`] with every collected issue if validation
    ///   fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound(PathBuf::from(path)));
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;

        let issues = config.verify();
        if issues.is_empty() {
            Ok(config)
        } else {
            Err(ConfigError::Invalid(issues))
        }
    }

    /// Checks the configuration, collecting every issue.
    ///
    /// All rules are applied independently; nothing short-circuits, so the
    /// operator sees the complete list in one pass.
    #[must_use]
    pub fn verify(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.username.is_empty() {
            issues.push("missing username".to_string());
        }
        if self.password.is_empty() {
            issues.push("missing password".to_string());
        }
        if self.country_code.is_empty() {
            issues.push("missing country code".to_string());
        }
        if !APPLICATIONS_ALLOWED.contains(&self.application.as_str()) {
            issues.push(format!(
                "application type '{}' is not valid. must be one of {}",
                self.application,
                APPLICATIONS_ALLOWED.join(", ")
            ));
        }

        issues
    }

    /// Returns the parsed application.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a configuration that never
    /// passed [`Self::verify`]; [`Self::load`] never returns one, but the
    /// fields are public and a hand-built value can carry anything.
    pub fn application(&self) -> Result<Application, ConfigError> {
        Application::from_str_opt(&self.application).ok_or_else(|| {
            ConfigError::Invalid(vec![format!(
                "application type '{}' is not valid. must be one of {}",
                self.application,
                APPLICATIONS_ALLOWED.join(", ")
            )])
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn valid_config() -> Config {
        Config {
            username: "user@example.com".to_string(),
            password: "hunter2".to_string(),
            country_code: "44".to_string(),
            application: "smart_life".to_string(),
            scene_group_names: vec!["Kitchen".to_string(), "Evening".to_string()],
        }
    }

    #[test]
    fn valid_config_has_no_issues() {
        assert!(valid_config().verify().is_empty());
    }

    #[test]
    fn each_missing_scalar_is_an_issue() {
        let mut config = valid_config();
        config.username = String::new();
        assert_eq!(config.verify(), vec!["missing username"]);

        let mut config = valid_config();
        config.password = String::new();
        assert_eq!(config.verify(), vec!["missing password"]);

        let mut config = valid_config();
        config.country_code = String::new();
        assert_eq!(config.verify(), vec!["missing country code"]);
    }

    #[test]
    fn invalid_application_is_an_issue() {
        let mut config = valid_config();
        config.application = "homekit".to_string();
        assert_eq!(
            config.verify(),
            vec!["application type 'homekit' is not valid. must be one of smart_life, tuya"]
        );
    }

    #[test]
    fn application_check_is_case_sensitive() {
        let mut config = valid_config();
        config.application = "Tuya".to_string();
        assert_eq!(config.verify().len(), 1);
    }

    #[test]
    fn issues_are_collected_not_short_circuited() {
        let config = Config {
            username: String::new(),
            password: String::new(),
            country_code: String::new(),
            application: "bad".to_string(),
            scene_group_names: Vec::new(),
        };

        let issues = config.verify();
        assert_eq!(issues.len(), 4);
        assert_eq!(issues[0], "missing username");
        assert_eq!(issues[1], "missing password");
        assert_eq!(issues[2], "missing country code");
        assert!(issues[3].starts_with("application type 'bad'"));
    }

    #[test]
    fn application_on_unvalidated_config_is_an_error() {
        let mut config = valid_config();
        config.application = "homekit".to_string();

        let err = config.application().unwrap_err();
        match err {
            ConfigError::Invalid(issues) => {
                assert_eq!(
                    issues,
                    vec![
                        "application type 'homekit' is not valid. must be one of smart_life, tuya"
                    ]
                );
            }
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn load_missing_file_is_not_found() {
        let err = Config::load("/nonexistent/config.json").unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn load_malformed_json_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_invalid_config_fails_atomically() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"username": "", "password": "p", "country_code": "44", "application": "tuya"}}"#
        )
        .unwrap();

        let err = Config::load(file.path()).unwrap_err();
        match err {
            ConfigError::Invalid(issues) => assert_eq!(issues, vec!["missing username"]),
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn load_valid_file_round_trips() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "username": "user@example.com",
                "password": "hunter2",
                "country_code": "44",
                "application": "smart_life",
                "scene_group_names": ["Kitchen", "Evening"]
            }}"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config, valid_config());
        assert_eq!(config.application().unwrap(), Application::SmartLife);
    }

    #[test]
    fn scene_group_names_default_to_empty() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"username": "u", "password": "p", "country_code": "44", "application": "tuya"}}"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert!(config.scene_group_names.is_empty());
        assert_eq!(config.application().unwrap(), Application::Tuya);
    }
}
