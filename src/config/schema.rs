//! Configuration schema types
//!
//! This module defines the configuration file structure. The `[mongodb]`
//! table deserializes into [`MongoSettings`], the input of the options translator.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure that maps to the TOML file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CarefreeConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// MongoDB connection settings
    #[serde(default)]
    pub mongodb: MongoSettings,
}

impl CarefreeConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.logging.validate()?;
        self.mongodb.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled = true".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

/// What the translator does with a concern string that matches no known form
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnresolvedPolicy {
    /// Abort translation with an error
    #[default]
    Error,
    /// Log a warning and leave the driver default in place
    Warn,
}

/// MongoDB connection settings
///
/// Every field is optional. An absent field leaves the corresponding driver
/// option at its default; a present field is applied as-is or, for the string
/// grammars and component names, resolved first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MongoSettings {
    /// Free-form description of this connection; informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Application name sent to the server in the handshake
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,

    /// Seed list, `host[:port]` entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hosts: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connect_timeout_ms: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_selection_timeout_ms: Option<u64>,

    /// Latency window for choosing among suitable servers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_threshold_ms: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heartbeat_frequency_ms: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_idle_time_ms: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_pool_size: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_pool_size: Option<u32>,

    /// Maximum connections a pool may be establishing concurrently
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_connecting: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_writes: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_reads: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direct_connection: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_balanced: Option<bool>,

    /// Required replica set name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repl_set_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_database: Option<String>,

    /// `true` enables TLS, `false` disables it explicitly
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls_enabled: Option<bool>,

    /// **SECURITY WARNING**: accepts any server certificate. Development only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls_allow_invalid_certificates: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls_ca_file: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls_cert_key_file: Option<PathBuf>,

    /// Registry name of a custom server selector
    ///
    /// Cannot be combined with `read_preference`; both set the driver's selection criteria.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_selector: Option<String>,

    /// Write concern, e.g. `majority`, `w2`, `w2-10000-true`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write_concern: Option<String>,

    /// Read concern: `local`, `majority`, `linearizable` or `snapshot`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_concern: Option<String>,

    /// Read preference, e.g. `nearest`, `secondary-[{dc=east}]-90000`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_preference: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub command_listeners: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cluster_listeners: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub connection_pool_listeners: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub server_listeners: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub server_monitor_listeners: Vec<String>,

    /// Customisation hooks run after all other options, in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub optioned_listeners: Vec<String>,

    /// Handling of write/read concern and read preference strings that match no known form
    #[serde(default)]
    pub on_unresolved: UnresolvedPolicy,
}

impl MongoSettings {
    /// Validates cross-field constraints that the grammars cannot express
    ///
    /// # Errors
    ///
    /// Returns a description of the first violated constraint
    pub fn validate(&self) -> Result<(), String> {
        if self.max_pool_size == Some(0) {
            return Err("mongodb.max_pool_size must be > 0".to_string());
        }

        if let (Some(min), Some(max)) = (self.min_pool_size, self.max_pool_size) {
            if min > max {
                return Err(format!(
                    "mongodb.min_pool_size ({min}) cannot exceed mongodb.max_pool_size ({max})"
                ));
            }
        }

        if self.max_connecting == Some(0) {
            return Err("mongodb.max_connecting must be > 0".to_string());
        }

        let tls_sub_options = self.tls_allow_invalid_certificates.is_some()
            || self.tls_ca_file.is_some()
            || self.tls_cert_key_file.is_some();
        if tls_sub_options && self.tls_enabled != Some(true) {
            return Err(
                "mongodb.tls_* options require mongodb.tls_enabled = true".to_string(),
            );
        }

        if let Some(hosts) = &self.hosts {
            if hosts.is_empty() {
                return Err("mongodb.hosts cannot be an empty list".to_string());
            }
            if hosts.iter().any(|host| host.trim().is_empty()) {
                return Err("mongodb.hosts cannot contain empty entries".to_string());
            }
        }

        if matches!(&self.server_selector, Some(name) if name.trim().is_empty()) {
            return Err("mongodb.server_selector cannot be empty".to_string());
        }

        for (field, names) in self.listener_lists() {
            if names.iter().any(|name| name.trim().is_empty()) {
                return Err(format!("mongodb.{field} cannot contain empty names"));
            }
        }

        Ok(())
    }

    /// Listener name lists, keyed by field name
    pub fn listener_lists(&self) -> [(&'static str, &[String]); 6] {
        [
            ("command_listeners", self.command_listeners.as_slice()),
            ("cluster_listeners", self.cluster_listeners.as_slice()),
            ("connection_pool_listeners", self.connection_pool_listeners.as_slice()),
            ("server_listeners", self.server_listeners.as_slice()),
            ("server_monitor_listeners", self.server_monitor_listeners.as_slice()),
            ("optioned_listeners", self.optioned_listeners.as_slice()),
        ]
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_local_path() -> String {
    "logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_config_validation() {
        let mut config = ApplicationConfig::default();
        assert!(config.validate().is_ok());

        config.log_level = "invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_logging_config_validation() {
        let mut config = LoggingConfig::default();
        assert!(config.validate().is_ok());

        config.local_rotation = "weekly".to_string();
        assert!(config.validate().is_err());

        config.local_rotation = "hourly".to_string();
        config.local_enabled = true;
        config.local_path = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_settings_are_valid() {
        assert!(MongoSettings::default().validate().is_ok());
    }

    #[test]
    fn test_pool_size_validation() {
        let mut settings = MongoSettings {
            max_pool_size: Some(0),
            ..Default::default()
        };
        assert!(settings.validate().is_err());

        settings.max_pool_size = Some(10);
        settings.min_pool_size = Some(20);
        let err = settings.validate().unwrap_err();
        assert!(err.contains("min_pool_size (20)"));

        settings.min_pool_size = Some(10);
        assert!(settings.validate().is_ok());

        settings.max_connecting = Some(0);
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_tls_sub_options_require_tls_enabled() {
        let mut settings = MongoSettings {
            tls_allow_invalid_certificates: Some(true),
            ..Default::default()
        };
        assert!(settings.validate().is_err());

        settings.tls_enabled = Some(false);
        assert!(settings.validate().is_err());

        settings.tls_enabled = Some(true);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_hosts_validation() {
        let mut settings = MongoSettings {
            hosts: Some(vec![]),
            ..Default::default()
        };
        assert!(settings.validate().is_err());

        settings.hosts = Some(vec!["db1:27017".to_string(), " ".to_string()]);
        assert!(settings.validate().is_err());

        settings.hosts = Some(vec!["db1:27017".to_string()]);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_listener_names_cannot_be_empty() {
        let settings = MongoSettings {
            server_listeners: vec!["".to_string()],
            ..Default::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(err.contains("server_listeners"));
    }

    #[test]
    fn test_settings_deserialize_from_toml() {
        let settings: MongoSettings = toml::from_str(
            r#"
app_name = "orders"
max_pool_size = 50
write_concern = "w2-10000-true"
command_listeners = ["audit", "metrics"]
on_unresolved = "warn"
"#,
        )
        .unwrap();

        assert_eq!(settings.app_name.as_deref(), Some("orders"));
        assert_eq!(settings.max_pool_size, Some(50));
        assert_eq!(settings.write_concern.as_deref(), Some("w2-10000-true"));
        assert_eq!(settings.command_listeners, vec!["audit", "metrics"]);
        assert_eq!(settings.on_unresolved, UnresolvedPolicy::Warn);
        assert_eq!(settings.read_concern, None);
        assert!(settings.cluster_listeners.is_empty());
    }

    #[test]
    fn test_unknown_settings_field_is_rejected() {
        let result: Result<MongoSettings, _> = toml::from_str("app_nmae = \"typo\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_on_unresolved_defaults_to_error() {
        let settings: MongoSettings = toml::from_str("").unwrap();
        assert_eq!(settings.on_unresolved, UnresolvedPolicy::Error);
        assert_eq!(settings, MongoSettings::default());
    }
}
