//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Carefree using clap.

pub mod commands;

use crate::config::{load_config, LoggingConfig};
use clap::{Parser, Subcommand};

/// Carefree - MongoDB settings to driver options translator
#[derive(Parser, Debug)]
#[command(name = "carefree")]
#[command(version, about, long_about = None)]
#[command(author = "Carefree Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "carefree.toml", env = "CAREFREE_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "CAREFREE_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate configuration file and resolve every configured component
    ValidateConfig(commands::validate::ValidateArgs),

    /// Translate the settings and print the resulting client options
    Show(commands::show::ShowArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

impl Cli {
    /// Log level and logging configuration for this run
    ///
    /// `--log-level` wins over `[application].log_level`. When the
    /// configuration file cannot be loaded, console logging at `info` is used
    /// and the command itself reports the load error.
    pub fn logging_settings(&self) -> (String, LoggingConfig) {
        let (file_level, logging) = match load_config(&self.config) {
            Ok(config) => (Some(config.application.log_level), config.logging),
            Err(_) => (None, LoggingConfig::default()),
        };

        let level = self
            .log_level
            .clone()
            .or(file_level)
            .unwrap_or_else(|| "info".to_string());
        (level, logging)
    }
}
