//! Summary of translated client options
//!
//! Driver option types are not serializable, so the `show` command reports
//! through this flattened view instead.

use crate::config::MongoSettings;
use mongodb::options::{ClientOptions, SelectionCriteria, Tls};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Flattened, serializable view of [`ClientOptions`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionsSummary {
    /// Informational description from the settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub hosts: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub repl_set_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_database: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub connect_timeout_ms: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_selection_timeout_ms: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_pool_size: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_pool_size: Option<u32>,

    /// `enabled`, `disabled` or `default`
    pub tls: &'static str,

    /// Driver write concern, debug-formatted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write_concern: Option<String>,

    /// Driver read concern level, debug-formatted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_concern: Option<String>,

    /// Read preference or `custom selector <name>`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection_criteria: Option<String>,

    /// Listener names by field, only non-empty lists
    pub listeners: Vec<(String, Vec<String>)>,
}

impl OptionsSummary {
    /// Summarises `options` as translated from `settings`
    pub fn new(settings: &MongoSettings, options: &ClientOptions) -> Self {
        let selection_criteria = options
            .selection_criteria
            .as_ref()
            .map(|criteria| match criteria {
                SelectionCriteria::ReadPreference(read_preference) => {
                    format!("{:?}", read_preference)
                }
                _ => format!(
                    "custom selector {}",
                    settings.server_selector.as_deref().unwrap_or("<unnamed>")
                ),
            });

        let tls = match options.tls {
            Some(Tls::Enabled(_)) => "enabled",
            Some(_) => "disabled",
            None => "default",
        };

        let listeners = settings
            .listener_lists()
            .into_iter()
            .filter(|(_, names)| !names.is_empty())
            .map(|(field, names)| (field.to_string(), names.to_vec()))
            .collect();

        Self {
            description: settings.description.clone(),
            hosts: options.hosts.iter().map(ToString::to_string).collect(),
            app_name: options.app_name.clone(),
            repl_set_name: options.repl_set_name.clone(),
            default_database: options.default_database.clone(),
            connect_timeout_ms: options.connect_timeout.map(as_millis),
            server_selection_timeout_ms: options.server_selection_timeout.map(as_millis),
            max_pool_size: options.max_pool_size,
            min_pool_size: options.min_pool_size,
            tls,
            write_concern: options.write_concern.as_ref().map(|wc| format!("{:?}", wc)),
            read_concern: options
                .read_concern
                .as_ref()
                .map(|rc| format!("{:?}", rc.level)),
            selection_criteria,
            listeners,
        }
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            hosts = ?self.hosts,
            app_name = ?self.app_name,
            tls = self.tls,
            write_concern = ?self.write_concern,
            read_concern = ?self.read_concern,
            selection_criteria = ?self.selection_criteria,
            listener_lists = self.listeners.len(),
            "Translated client options"
        );
    }
}

fn as_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl fmt::Display for OptionsSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn line(f: &mut fmt::Formatter<'_>, label: &str, value: &dyn fmt::Display) -> fmt::Result {
            writeln!(f, "  {:<28}{}", format!("{}:", label), value)
        }

        writeln!(f, "MongoDB client options")?;
        if let Some(description) = &self.description {
            line(f, "Description", description)?;
        }
        line(f, "Hosts", &self.hosts.join(", "))?;
        if let Some(app_name) = &self.app_name {
            line(f, "Application name", app_name)?;
        }
        if let Some(repl_set_name) = &self.repl_set_name {
            line(f, "Replica set", repl_set_name)?;
        }
        if let Some(default_database) = &self.default_database {
            line(f, "Default database", default_database)?;
        }
        if let Some(ms) = self.connect_timeout_ms {
            line(f, "Connect timeout (ms)", &ms)?;
        }
        if let Some(ms) = self.server_selection_timeout_ms {
            line(f, "Server selection timeout (ms)", &ms)?;
        }
        if let Some(size) = self.max_pool_size {
            line(f, "Max pool size", &size)?;
        }
        if let Some(size) = self.min_pool_size {
            line(f, "Min pool size", &size)?;
        }
        line(f, "TLS", &self.tls)?;
        if let Some(write_concern) = &self.write_concern {
            line(f, "Write concern", write_concern)?;
        }
        if let Some(read_concern) = &self.read_concern {
            line(f, "Read concern", read_concern)?;
        }
        if let Some(selection_criteria) = &self.selection_criteria {
            line(f, "Selection criteria", selection_criteria)?;
        }
        for (field, names) in &self.listeners {
            line(f, field, &names.join(", "))?;
        }
        Ok(())
    }
}
