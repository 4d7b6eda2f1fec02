//! Driver listeners, server selectors and optioned listeners
//!
//! Settings refer to these components by name. The host application registers
//! a factory per name in a [`ComponentRegistry`]; translation resolves every
//! configured name to a fresh instance and fails on the first name that is
//! unknown, fails to construct, or has the wrong capability.
//!
//! # Example
//!
//! ```rust
//! use carefree_mongodb::listeners::{Capability, CommandListener, ComponentRegistry};
//! use mongodb::event::command::CommandEvent;
//!
//! struct Audit;
//!
//! impl CommandListener for Audit {
//!     fn on_command_event(&self, event: &CommandEvent) {
//!         if let CommandEvent::Failed(failed) = event {
//!             eprintln!("{} failed", failed.command_name);
//!         }
//!     }
//! }
//!
//! let mut registry = ComponentRegistry::new();
//! registry.register_command_listener("audit", || Audit);
//!
//! let listeners = registry
//!     .resolve_command_listeners(&["audit".to_string()])
//!     .unwrap();
//! assert_eq!(listeners.len(), 1);
//! assert!(registry.resolve("audit", Capability::ClusterListener).is_err());
//! ```

pub mod builtin;
pub mod dispatch;
pub mod registry;

use crate::config::MongoSettings;
use crate::domain::BoxError;
use mongodb::event::cmap::CmapEvent;
use mongodb::event::command::CommandEvent;
use mongodb::event::sdam::SdamEvent;
use mongodb::options::ClientOptions;
use mongodb::ServerInfo;
use std::fmt;
use std::sync::Arc;

pub use registry::ComponentRegistry;

/// Receives command started/succeeded/failed events
pub trait CommandListener: Send + Sync {
    fn on_command_event(&self, event: &CommandEvent);
}

/// Receives topology opening/closed/description-changed events
pub trait ClusterListener: Send + Sync {
    fn on_cluster_event(&self, event: &SdamEvent);
}

/// Receives connection pool and connection lifecycle events
pub trait ConnectionPoolListener: Send + Sync {
    fn on_pool_event(&self, event: &CmapEvent);
}

/// Receives server opening/closed/description-changed events
pub trait ServerListener: Send + Sync {
    fn on_server_event(&self, event: &SdamEvent);
}

/// Receives server heartbeat events
pub trait ServerMonitorListener: Send + Sync {
    fn on_heartbeat_event(&self, event: &SdamEvent);
}

/// Custom server selection, applied as the client's selection criteria
pub trait ServerSelector: Send + Sync {
    /// Returns true if `server` may serve the operation
    fn select(&self, server: &ServerInfo<'_>) -> bool;
}

/// Customisation hook run after every built-in option has been applied
///
/// Receives the full settings and the options being built. Returning an error
/// aborts the translation.
pub trait OptionedListener: Send + Sync {
    fn optioned(&self, settings: &MongoSettings, options: &mut ClientOptions)
        -> Result<(), BoxError>;
}

/// What a registered component can be used as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    CommandListener,
    ClusterListener,
    ConnectionPoolListener,
    ServerListener,
    ServerMonitorListener,
    ServerSelector,
    OptionedListener,
}

impl Capability {
    /// Human-readable name used in error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::CommandListener => "command listener",
            Capability::ClusterListener => "cluster listener",
            Capability::ConnectionPoolListener => "connection pool listener",
            Capability::ServerListener => "server listener",
            Capability::ServerMonitorListener => "server monitor listener",
            Capability::ServerSelector => "server selector",
            Capability::OptionedListener => "optioned listener",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A constructed component, tagged with its single capability
#[derive(Clone)]
pub enum Component {
    Command(Arc<dyn CommandListener>),
    Cluster(Arc<dyn ClusterListener>),
    ConnectionPool(Arc<dyn ConnectionPoolListener>),
    Server(Arc<dyn ServerListener>),
    ServerMonitor(Arc<dyn ServerMonitorListener>),
    Selector(Arc<dyn ServerSelector>),
    Optioned(Arc<dyn OptionedListener>),
}

impl Component {
    pub fn capability(&self) -> Capability {
        match self {
            Component::Command(_) => Capability::CommandListener,
            Component::Cluster(_) => Capability::ClusterListener,
            Component::ConnectionPool(_) => Capability::ConnectionPoolListener,
            Component::Server(_) => Capability::ServerListener,
            Component::ServerMonitor(_) => Capability::ServerMonitorListener,
            Component::Selector(_) => Capability::ServerSelector,
            Component::Optioned(_) => Capability::OptionedListener,
        }
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Component").field(&self.capability()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Noop;

    impl ClusterListener for Noop {
        fn on_cluster_event(&self, _event: &SdamEvent) {}
    }

    #[test]
    fn test_component_capability() {
        let component = Component::Cluster(Arc::new(Noop));
        assert_eq!(component.capability(), Capability::ClusterListener);
        assert_eq!(format!("{component:?}"), "Component(ClusterListener)");
    }

    #[test]
    fn test_capability_display() {
        assert_eq!(
            Capability::ConnectionPoolListener.to_string(),
            "connection pool listener"
        );
        assert_eq!(Capability::ServerSelector.to_string(), "server selector");
    }
}
