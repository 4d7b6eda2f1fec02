//! Configuration management for Carefree.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! Carefree uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `CAREFREE_<SECTION>_<KEY>` environment overrides
//! - Default values for optional settings
//! - Validation before any translation happens
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use carefree_mongodb::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("carefree.toml")?;
//!
//! if let Some(write_concern) = &config.mongodb.write_concern {
//!     println!("Write concern: {}", write_concern);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Application settings (log level)
//! - [`LoggingConfig`] - Local JSON log files
//! - [`MongoSettings`] - The connection settings translated into driver options
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [mongodb]
//! app_name = "inventory"
//! hosts = ["db1.example.com:27017", "db2.example.com:27017"]
//! repl_set_name = "rs0"
//! write_concern = "majority"
//! read_concern = "majority"
//! read_preference = "secondaryPreferred-[{dc=east,rack=1}]-90000"
//! command_listeners = ["tracing-command-logger"]
//! ```

pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use loader::{load_config, parse_config};
pub use schema::{ApplicationConfig, CarefreeConfig, LoggingConfig, MongoSettings, UnresolvedPolicy};
