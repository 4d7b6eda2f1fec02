//! Fan-out of driver events to resolved listeners
//!
//! The driver accepts a single handler per event family. Command and pool
//! listeners each get their own handler; cluster, server and server monitor
//! listeners share the SDAM handler and are routed by event kind.

use super::{
    ClusterListener, CommandListener, ConnectionPoolListener, ServerListener,
    ServerMonitorListener,
};
use mongodb::event::cmap::CmapEvent;
use mongodb::event::command::CommandEvent;
use mongodb::event::sdam::SdamEvent;
use mongodb::event::EventHandler;
use std::sync::Arc;

/// Family of an SDAM event, deciding which listeners receive it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SdamEventKind {
    /// Topology opening, closed and description changes
    Cluster,
    /// Server opening, closed and description changes
    Server,
    /// Heartbeat started, succeeded and failed
    Heartbeat,
}

impl SdamEventKind {
    pub fn of(event: &SdamEvent) -> Self {
        match event {
            SdamEvent::TopologyOpening(_)
            | SdamEvent::TopologyClosed(_)
            | SdamEvent::TopologyDescriptionChanged(_) => SdamEventKind::Cluster,
            SdamEvent::ServerHeartbeatStarted(_)
            | SdamEvent::ServerHeartbeatSucceeded(_)
            | SdamEvent::ServerHeartbeatFailed(_) => SdamEventKind::Heartbeat,
            _ => SdamEventKind::Server,
        }
    }
}

/// Listeners sharing the driver's SDAM event handler
#[derive(Clone, Default)]
pub struct SdamListeners {
    pub cluster: Vec<Arc<dyn ClusterListener>>,
    pub server: Vec<Arc<dyn ServerListener>>,
    pub monitor: Vec<Arc<dyn ServerMonitorListener>>,
}

impl SdamListeners {
    pub fn is_empty(&self) -> bool {
        self.cluster.is_empty() && self.server.is_empty() && self.monitor.is_empty()
    }

    /// Delivers `event` to every listener of its kind, in registration order
    pub fn dispatch(&self, event: &SdamEvent) {
        match SdamEventKind::of(event) {
            SdamEventKind::Cluster => self
                .cluster
                .iter()
                .for_each(|listener| listener.on_cluster_event(event)),
            SdamEventKind::Server => self
                .server
                .iter()
                .for_each(|listener| listener.on_server_event(event)),
            SdamEventKind::Heartbeat => self
                .monitor
                .iter()
                .for_each(|listener| listener.on_heartbeat_event(event)),
        }
    }
}

/// Builds a command event handler calling every listener in order
pub fn command_handler(listeners: Vec<Arc<dyn CommandListener>>) -> EventHandler<CommandEvent> {
    EventHandler::callback(move |event: CommandEvent| {
        for listener in &listeners {
            listener.on_command_event(&event);
        }
    })
}

/// Builds a connection pool event handler calling every listener in order
pub fn cmap_handler(listeners: Vec<Arc<dyn ConnectionPoolListener>>) -> EventHandler<CmapEvent> {
    EventHandler::callback(move |event: CmapEvent| {
        for listener in &listeners {
            listener.on_pool_event(&event);
        }
    })
}

/// Builds the SDAM event handler routing events by [`SdamEventKind`]
pub fn sdam_handler(listeners: SdamListeners) -> EventHandler<SdamEvent> {
    EventHandler::callback(move |event: SdamEvent| listeners.dispatch(&event))
}
