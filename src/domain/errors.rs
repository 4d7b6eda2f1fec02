//! Domain error types
//!
//! This module defines the error hierarchy for carefree-mongodb.
//! All errors are configuration-time errors: they surface synchronously, before
//! any driver client is constructed, and are never retried.

use crate::listeners::Capability;
use thiserror::Error;

/// Boxed error returned by component factories and optioned listeners
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main carefree error type
///
/// This is the primary error type used throughout the crate.
#[derive(Debug, Error)]
pub enum CarefreeError {
    /// Configuration-related errors (file loading, validation, env overrides)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A concern or preference string broke its grammar in a way that cannot be ignored
    #[error("Parse error: {0}")]
    Parse(#[from] ConcernParseError),

    /// A concern or preference string matched none of the known forms
    #[error("Unresolved {field} value '{value}'")]
    Unresolved {
        /// Settings field holding the value
        field: &'static str,
        /// The offending value as configured
        value: String,
    },

    /// Listener or server selector resolution failed
    #[error("Component error: {0}")]
    Component(#[from] ComponentError),

    /// Both a server selector and a read preference were configured
    #[error("server_selector '{selector}' conflicts with read_preference '{read_preference}': both set the selection criteria")]
    ConflictingSelection {
        /// Configured server selector name
        selector: String,
        /// Configured read preference string
        read_preference: String,
    },

    /// An optioned listener rejected the options
    #[error("Optioned listener '{name}' failed: {source}")]
    Listener {
        /// Registry name of the listener
        name: String,
        /// Underlying cause
        #[source]
        source: BoxError,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

/// Hard grammar errors raised by the concern and preference parsers
///
/// Strings that simply match none of the known forms are not errors at
/// this level; the parsers report them as unresolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConcernParseError {
    /// A read preference tag is not a single `name=value` pair
    #[error("invalid tag '{tag}' in read preference '{input}': expected name=value")]
    InvalidTag { input: String, tag: String },

    /// A read preference tag set names the same tag twice
    #[error("duplicate tag '{name}' in read preference '{input}'")]
    DuplicateTag { input: String, name: String },

    /// A numeric component does not fit its target type
    #[error("number '{digits}' out of range in '{input}'")]
    NumberOutOfRange { input: String, digits: String },
}

/// Component registry errors
///
/// Raised while resolving listener, server selector and optioned listener names.
#[derive(Debug, Error)]
pub enum ComponentError {
    /// No factory registered under the name
    #[error("no {capability} registered under '{name}'")]
    NotRegistered { name: String, capability: Capability },

    /// The factory failed to construct the component
    #[error("failed to construct '{name}': {source}")]
    ConstructionFailed {
        name: String,
        #[source]
        source: BoxError,
    },

    /// The factory produced a component of another capability
    #[error("'{name}' is a {actual}, expected a {expected}")]
    CapabilityMismatch {
        name: String,
        expected: Capability,
        actual: Capability,
    },
}

impl ComponentError {
    /// Name of the offending registry entry
    pub fn name(&self) -> &str {
        match self {
            ComponentError::NotRegistered { name, .. }
            | ComponentError::ConstructionFailed { name, .. }
            | ComponentError::CapabilityMismatch { name, .. } => name,
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for CarefreeError {
    fn from(err: std::io::Error) -> Self {
        CarefreeError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for CarefreeError {
    fn from(err: serde_json::Error) -> Self {
        CarefreeError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for CarefreeError {
    fn from(err: toml::de::Error) -> Self {
        CarefreeError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_carefree_error_display() {
        let err = CarefreeError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_unresolved_display_names_field_and_value() {
        let err = CarefreeError::Unresolved {
            field: "write_concern",
            value: "w-many".to_string(),
        };
        assert_eq!(err.to_string(), "Unresolved write_concern value 'w-many'");
    }

    #[test]
    fn test_parse_error_conversion() {
        let parse_err = ConcernParseError::InvalidTag {
            input: "secondary-[{a}]".to_string(),
            tag: "a".to_string(),
        };
        let err: CarefreeError = parse_err.into();
        assert!(matches!(err, CarefreeError::Parse(_)));
        assert!(err.to_string().contains("invalid tag 'a'"));
    }

    #[test]
    fn test_component_error_conversion() {
        let component_err = ComponentError::NotRegistered {
            name: "com.example.Audit".to_string(),
            capability: Capability::CommandListener,
        };
        assert_eq!(component_err.name(), "com.example.Audit");
        let err: CarefreeError = component_err.into();
        assert!(matches!(err, CarefreeError::Component(_)));
        assert!(err.to_string().contains("com.example.Audit"));
    }

    #[test]
    fn test_construction_failure_keeps_source() {
        use std::error::Error as _;

        let err = ComponentError::ConstructionFailed {
            name: "broken".to_string(),
            source: "no zero-argument constructor".into(),
        };
        assert!(err.source().is_some());
        assert!(err.to_string().contains("no zero-argument constructor"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: CarefreeError = io_err.into();
        assert!(matches!(err, CarefreeError::Io(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: CarefreeError = toml_err.into();
        assert!(matches!(err, CarefreeError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_carefree_error_implements_std_error() {
        let err = CarefreeError::Configuration("Test error".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
