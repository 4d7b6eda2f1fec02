//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "carefree.toml")]
    pub output: String,

    /// Include every option with comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Carefree configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Validate configuration: carefree validate-config");
                println!("  3. Inspect the client options: carefree show");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(5) // Fatal error exit code
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# Carefree Configuration File
# MongoDB settings translated into driver client options

[application]
log_level = "info"

[logging]
local_enabled = false
local_path = "logs"
local_rotation = "daily"

[mongodb]
app_name = "my-service"
hosts = ["localhost:27017"]
write_concern = "majority"
read_concern = "majority"
read_preference = "primaryPreferred"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# Carefree Configuration File
# MongoDB settings translated into driver client options
#
# Every [mongodb] key is optional. An absent key leaves the driver default.
# Values may reference environment variables with ${VAR_NAME}, and any
# CAREFREE_<SECTION>_<KEY> variable overrides the file.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Enable local JSON file logging
local_enabled = false

# Local log directory
local_path = "logs"

# Log rotation (daily, hourly, never)
local_rotation = "daily"

# ============================================================================
# MongoDB Settings
# ============================================================================
[mongodb]
# Informational only
description = "Primary application cluster"

# Application name sent in the connection handshake
app_name = "my-service"

# Seed list, host[:port]
hosts = ["db1.example.com:27017", "db2.example.com:27017"]
repl_set_name = "rs0"
# default_database = "app"

# Timeouts in milliseconds
connect_timeout_ms = 10000
server_selection_timeout_ms = 30000
# local_threshold_ms = 15
# heartbeat_frequency_ms = 10000
# max_idle_time_ms = 600000

# Connection pool
max_pool_size = 100
min_pool_size = 0
# max_connecting = 2

# retry_writes = true
# retry_reads = true
# direct_connection = false
# load_balanced = false

# TLS
# tls_enabled = true
# tls_ca_file = "/etc/ssl/mongodb-ca.pem"
# tls_cert_key_file = "/etc/ssl/mongodb-client.pem"
# tls_allow_invalid_certificates = false  # development only

# Write concern: w0, w1, w2, w3, majority, journal, w<n> or w<n>-<timeout ms>-<journal>
write_concern = "majority"

# Read concern: local, majority, linearizable, snapshot
read_concern = "majority"

# Read preference: <mode>[-[{name=value,...},...]][-<max staleness ms>]
# Modes: primary, primaryPreferred, secondary, secondaryPreferred, nearest
read_preference = "secondaryPreferred-[{dc=east,rack=1}]-90000"

# Registry name of a custom server selector (conflicts with read_preference)
# server_selector = "nearest-datacenter"

# Listener registry names, applied in order
command_listeners = ["tracing-command-logger"]
# cluster_listeners = ["tracing-cluster-logger"]
# connection_pool_listeners = ["tracing-pool-logger"]
# server_listeners = ["tracing-server-logger"]
# server_monitor_listeners = ["tracing-heartbeat-logger"]

# Hooks run after every other option, in order
# optioned_listeners = []

# Unresolved concern strings: "error" (default) or "warn"
on_unresolved = "error"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use tempfile::TempDir;

    #[test]
    fn test_generate_minimal_config() {
        let config = InitArgs::generate_minimal_config();
        assert!(config.contains("[application]"));
        assert!(config.contains("[mongodb]"));
        assert!(parse_config(&config).is_ok());
    }

    #[test]
    fn test_generate_config_with_examples() {
        let config = InitArgs::generate_config_with_examples();
        assert!(config.contains("# Carefree Configuration File"));
        assert!(config.contains("read_preference"));

        let parsed = parse_config(&config).unwrap();
        assert_eq!(parsed.mongodb.repl_set_name.as_deref(), Some("rs0"));
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("carefree.toml");
        fs::write(&output, "# existing").unwrap();

        let args = InitArgs {
            output: output.to_string_lossy().to_string(),
            with_examples: false,
            force: false,
        };
        assert_eq!(args.execute().unwrap(), 2);
        assert_eq!(fs::read_to_string(&output).unwrap(), "# existing");

        let forced = InitArgs { force: true, ..args };
        assert_eq!(forced.execute().unwrap(), 0);
        assert!(fs::read_to_string(&output).unwrap().contains("[mongodb]"));
    }
}
