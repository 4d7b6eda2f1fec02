//! Show command implementation
//!
//! Translates the `[mongodb]` settings with the stock listeners registered and
//! prints the resulting client options.

use crate::config::load_config;
use crate::listeners::ComponentRegistry;
use crate::options::{OptionsSummary, OptionsTranslator};
use clap::Args;

/// Arguments for the show command
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Print the options as JSON
    #[arg(long)]
    pub json: bool,
}

impl ShowArgs {
    /// Execute the show command
    pub fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("❌ Failed to load configuration file: {e}");
                return Ok(2);
            }
        };

        let registry = ComponentRegistry::with_builtins();
        let options = match OptionsTranslator::new(&registry).build(&config.mongodb) {
            Ok(options) => options,
            Err(e) => {
                eprintln!("❌ MongoDB settings are invalid: {e}");
                return Ok(2);
            }
        };

        let summary = OptionsSummary::new(&config.mongodb, &options);
        summary.log_summary();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            print!("{summary}");
        }
        Ok(0)
    }
}
