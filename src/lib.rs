// Carefree MongoDB - settings to driver options translator
// Copyright (c) 2025 Carefree Contributors
// Licensed under the Apache License, Version 2.0

//! # Carefree - MongoDB settings to driver options
//!
//! Carefree turns a flat, declarative description of a MongoDB connection
//! (usually the `[mongodb]` table of a TOML file) into
//! [`mongodb::options::ClientOptions`].
//!
//! ## Overview
//!
//! This library provides:
//! - **Concern grammars** for write concern, read concern and read preference strings
//! - **A component registry** mapping names in the settings to listener and
//!   server selector factories supplied by the host application
//! - **The translator** copying scalar options, resolving concerns and
//!   attaching listeners to the driver's event handlers
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`concern`] - Write concern, read concern and read preference parsers
//! - [`listeners`] - Listener traits, registry and event dispatch
//! - [`options`] - Settings to `ClientOptions` translation
//! - [`domain`] - Error types
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust
//! use carefree_mongodb::config::MongoSettings;
//! use carefree_mongodb::listeners::{CommandListener, ComponentRegistry};
//! use carefree_mongodb::build_client_options;
//! use mongodb::event::command::CommandEvent;
//!
//! struct SlowCommands;
//!
//! impl CommandListener for SlowCommands {
//!     fn on_command_event(&self, event: &CommandEvent) {
//!         if let CommandEvent::Succeeded(done) = event {
//!             if done.duration.as_millis() > 100 {
//!                 eprintln!("slow {}", done.command_name);
//!             }
//!         }
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut registry = ComponentRegistry::with_builtins();
//! registry.register_command_listener("slow-commands", || SlowCommands);
//!
//! let settings: MongoSettings = toml::from_str(
//!     r#"
//!     app_name = "orders"
//!     write_concern = "w2-5000-true"
//!     read_preference = "secondaryPreferred-[{dc=east}]-90000"
//!     command_listeners = ["slow-commands", "tracing-command-logger"]
//!     "#,
//! )?;
//!
//! let options = build_client_options(&settings, &registry)?;
//! assert!(options.command_event_handler.is_some());
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! All fallible operations return [`domain::CarefreeError`]. Strings that break
//! a grammar are hard errors; strings that match no known form are
//! "unresolved" and fail translation unless `on_unresolved = "warn"`.

pub mod cli;
pub mod concern;
pub mod config;
pub mod domain;
pub mod listeners;
pub mod logging;
pub mod options;

pub use options::{build_client_options, OptionsTranslator};
