//! Validate config command implementation
//!
//! This module implements the `validate-config` command. Besides loading and
//! validating the file, it translates the `[mongodb]` settings so that grammar
//! errors and unknown component names surface here rather than at startup.

use crate::config::load_config;
use crate::listeners::ComponentRegistry;
use crate::options::OptionsTranslator;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded successfully");
                c
            }
            Err(e) => {
                crate::log_error_with_context!(&e, "Failed to load configuration");
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        // Only the stock listeners are known outside the host application
        let registry = ComponentRegistry::with_builtins();
        match OptionsTranslator::new(&registry).build(&config.mongodb) {
            Ok(_) => {
                println!("✅ MongoDB settings translate to client options");
                println!();
                println!("Configuration Summary:");
                println!("  Log Level: {}", config.application.log_level);
                let mongodb = &config.mongodb;
                if let Some(description) = &mongodb.description {
                    println!("  Description: {description}");
                }
                if let Some(hosts) = &mongodb.hosts {
                    println!("  Hosts: {}", hosts.join(", "));
                }
                println!(
                    "  Write Concern: {}",
                    mongodb.write_concern.as_deref().unwrap_or("(driver default)")
                );
                println!(
                    "  Read Concern: {}",
                    mongodb.read_concern.as_deref().unwrap_or("(driver default)")
                );
                println!(
                    "  Read Preference: {}",
                    mongodb.read_preference.as_deref().unwrap_or("(driver default)")
                );
                for (field, names) in mongodb.listener_lists() {
                    if !names.is_empty() {
                        println!("  {field}: {}", names.join(", "));
                    }
                }
                println!();
                Ok(0)
            }
            Err(e) => {
                crate::log_error_with_context!(&e, "MongoDB settings did not translate");
                println!("❌ MongoDB settings are invalid");
                println!("   Error: {e}");
                println!();
                Ok(2) // Configuration error exit code
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn config_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_validate_missing_file() {
        let code = ValidateArgs {}.execute("does-not-exist.toml").unwrap();
        assert_eq!(code, 2);
    }

    #[test]
    fn test_validate_valid_file() {
        let file = config_file(
            "[mongodb]\nwrite_concern = \"w2\"\ncommand_listeners = [\"tracing-command-logger\"]\n",
        );
        let code = ValidateArgs {}
            .execute(&file.path().to_string_lossy())
            .unwrap();
        assert_eq!(code, 0);
    }

    #[test]
    fn test_validate_unknown_listener() {
        let file = config_file("[mongodb]\ncommand_listeners = [\"audit\"]\n");
        let code = ValidateArgs {}
            .execute(&file.path().to_string_lossy())
            .unwrap();
        assert_eq!(code, 2);
    }
}
