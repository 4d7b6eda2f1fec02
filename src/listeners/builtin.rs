//! Stock listeners that report driver events through `tracing`
//!
//! | Name                       | Capability               | Level          |
//! |----------------------------|--------------------------|----------------|
//! | `tracing-command-logger`   | command listener         | debug / warn   |
//! | `tracing-pool-logger`      | connection pool listener | debug          |
//! | `tracing-cluster-logger`   | cluster listener         | info           |
//! | `tracing-server-logger`    | server listener          | debug          |
//! | `tracing-heartbeat-logger` | server monitor listener  | trace          |

use super::{
    ClusterListener, CommandListener, ComponentRegistry, ConnectionPoolListener, ServerListener,
    ServerMonitorListener,
};
use mongodb::event::cmap::CmapEvent;
use mongodb::event::command::CommandEvent;
use mongodb::event::sdam::SdamEvent;

pub const COMMAND_LOGGER: &str = "tracing-command-logger";
pub const POOL_LOGGER: &str = "tracing-pool-logger";
pub const CLUSTER_LOGGER: &str = "tracing-cluster-logger";
pub const SERVER_LOGGER: &str = "tracing-server-logger";
pub const HEARTBEAT_LOGGER: &str = "tracing-heartbeat-logger";

/// Registers every stock listener under its well-known name
pub fn register_builtins(registry: &mut ComponentRegistry) {
    registry
        .register_command_listener(COMMAND_LOGGER, || CommandLogger)
        .register_connection_pool_listener(POOL_LOGGER, || PoolLogger)
        .register_cluster_listener(CLUSTER_LOGGER, || ClusterLogger)
        .register_server_listener(SERVER_LOGGER, || ServerLogger)
        .register_server_monitor_listener(HEARTBEAT_LOGGER, || HeartbeatLogger);
}

/// Logs command names, request ids and durations; never the command bodies
#[derive(Debug, Default, Clone, Copy)]
pub struct CommandLogger;

impl CommandListener for CommandLogger {
    fn on_command_event(&self, event: &CommandEvent) {
        match event {
            CommandEvent::Started(started) => tracing::debug!(
                command = %started.command_name,
                database = %started.db,
                request_id = started.request_id,
                "Command started"
            ),
            CommandEvent::Succeeded(succeeded) => tracing::debug!(
                command = %succeeded.command_name,
                request_id = succeeded.request_id,
                duration_ms = succeeded.duration.as_millis(),
                "Command succeeded"
            ),
            CommandEvent::Failed(failed) => tracing::warn!(
                command = %failed.command_name,
                request_id = failed.request_id,
                duration_ms = failed.duration.as_millis(),
                error = %failed.failure,
                "Command failed"
            ),
            #[allow(unreachable_patterns)]
            _ => {}
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PoolLogger;

impl ConnectionPoolListener for PoolLogger {
    fn on_pool_event(&self, event: &CmapEvent) {
        tracing::debug!(event = ?event, "Connection pool event");
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ClusterLogger;

impl ClusterListener for ClusterLogger {
    fn on_cluster_event(&self, event: &SdamEvent) {
        tracing::info!(event = ?event, "Cluster event");
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ServerLogger;

impl ServerListener for ServerLogger {
    fn on_server_event(&self, event: &SdamEvent) {
        tracing::debug!(event = ?event, "Server event");
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct HeartbeatLogger;

impl ServerMonitorListener for HeartbeatLogger {
    fn on_heartbeat_event(&self, event: &SdamEvent) {
        tracing::trace!(event = ?event, "Server heartbeat");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listeners::Capability;

    #[test]
    fn test_builtins_resolve_with_their_capability() {
        let registry = ComponentRegistry::with_builtins();
        let expected = [
            (COMMAND_LOGGER, Capability::CommandListener),
            (POOL_LOGGER, Capability::ConnectionPoolListener),
            (CLUSTER_LOGGER, Capability::ClusterListener),
            (SERVER_LOGGER, Capability::ServerListener),
            (HEARTBEAT_LOGGER, Capability::ServerMonitorListener),
        ];

        for (name, capability) in expected {
            let component = registry.resolve(name, capability).unwrap();
            assert_eq!(component.capability(), capability, "{name}");
        }
        assert_eq!(registry.names().len(), expected.len());
    }

    #[test]
    fn test_builtin_has_single_capability() {
        let registry = ComponentRegistry::with_builtins();
        assert!(registry
            .resolve(COMMAND_LOGGER, Capability::ServerListener)
            .is_err());
    }
}
