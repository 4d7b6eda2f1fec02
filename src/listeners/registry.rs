//! Name to factory registry for listeners and selectors

use super::{
    Capability, ClusterListener, CommandListener, Component, ConnectionPoolListener,
    OptionedListener, ServerListener, ServerMonitorListener, ServerSelector,
};
use crate::domain::{BoxError, ComponentError};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

type Factory = Arc<dyn Fn() -> Result<Component, BoxError> + Send + Sync>;

/// Registry of component factories, keyed by the names used in settings
///
/// Every resolution calls the factory again, so two translations of the same
/// settings never share listener instances.
#[derive(Clone, Default)]
pub struct ComponentRegistry {
    factories: HashMap<String, Factory>,
}

impl ComponentRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the [`builtin`](super::builtin) components
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        super::builtin::register_builtins(&mut registry);
        registry
    }

    /// Registers a fallible factory under `name`
    ///
    /// A later registration under the same name replaces the earlier one.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn() -> Result<Component, BoxError> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.factories.insert(name.clone(), Arc::new(factory)).is_some() {
            tracing::warn!(name = %name, "Replacing registered component factory");
        }
        self
    }

    pub fn register_command_listener<L, F>(
        &mut self,
        name: impl Into<String>,
        factory: F,
    ) -> &mut Self
    where
        L: CommandListener + 'static,
        F: Fn() -> L + Send + Sync + 'static,
    {
        self.register(name, move || Ok(Component::Command(Arc::new(factory()))))
    }

    pub fn register_cluster_listener<L, F>(
        &mut self,
        name: impl Into<String>,
        factory: F,
    ) -> &mut Self
    where
        L: ClusterListener + 'static,
        F: Fn() -> L + Send + Sync + 'static,
    {
        self.register(name, move || Ok(Component::Cluster(Arc::new(factory()))))
    }

    pub fn register_connection_pool_listener<L, F>(
        &mut self,
        name: impl Into<String>,
        factory: F,
    ) -> &mut Self
    where
        L: ConnectionPoolListener + 'static,
        F: Fn() -> L + Send + Sync + 'static,
    {
        self.register(name, move || {
            Ok(Component::ConnectionPool(Arc::new(factory())))
        })
    }

    pub fn register_server_listener<L, F>(
        &mut self,
        name: impl Into<String>,
        factory: F,
    ) -> &mut Self
    where
        L: ServerListener + 'static,
        F: Fn() -> L + Send + Sync + 'static,
    {
        self.register(name, move || Ok(Component::Server(Arc::new(factory()))))
    }

    pub fn register_server_monitor_listener<L, F>(
        &mut self,
        name: impl Into<String>,
        factory: F,
    ) -> &mut Self
    where
        L: ServerMonitorListener + 'static,
        F: Fn() -> L + Send + Sync + 'static,
    {
        self.register(name, move || {
            Ok(Component::ServerMonitor(Arc::new(factory())))
        })
    }

    pub fn register_server_selector<S, F>(
        &mut self,
        name: impl Into<String>,
        factory: F,
    ) -> &mut Self
    where
        S: ServerSelector + 'static,
        F: Fn() -> S + Send + Sync + 'static,
    {
        self.register(name, move || Ok(Component::Selector(Arc::new(factory()))))
    }

    pub fn register_optioned_listener<L, F>(
        &mut self,
        name: impl Into<String>,
        factory: F,
    ) -> &mut Self
    where
        L: OptionedListener + 'static,
        F: Fn() -> L + Send + Sync + 'static,
    {
        self.register(name, move || Ok(Component::Optioned(Arc::new(factory()))))
    }

    /// Returns true if a factory is registered under `name`
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Constructs the component registered under `name` and checks that it
    /// has the `expected` capability
    ///
    /// # Errors
    ///
    /// - [`ComponentError::NotRegistered`] if no factory is registered
    /// - [`ComponentError::ConstructionFailed`] if the factory fails
    /// - [`ComponentError::CapabilityMismatch`] if the component has another capability
    pub fn resolve(&self, name: &str, expected: Capability) -> Result<Component, ComponentError> {
        self.resolve_as(name, expected, |component| {
            (component.capability() == expected).then_some(component)
        })
    }

    pub fn resolve_command_listeners(
        &self,
        names: &[String],
    ) -> Result<Vec<Arc<dyn CommandListener>>, ComponentError> {
        self.resolve_all(names, Capability::CommandListener, |component| match component {
            Component::Command(listener) => Some(listener),
            _ => None,
        })
    }

    pub fn resolve_cluster_listeners(
        &self,
        names: &[String],
    ) -> Result<Vec<Arc<dyn ClusterListener>>, ComponentError> {
        self.resolve_all(names, Capability::ClusterListener, |component| match component {
            Component::Cluster(listener) => Some(listener),
            _ => None,
        })
    }

    pub fn resolve_connection_pool_listeners(
        &self,
        names: &[String],
    ) -> Result<Vec<Arc<dyn ConnectionPoolListener>>, ComponentError> {
        self.resolve_all(
            names,
            Capability::ConnectionPoolListener,
            |component| match component {
                Component::ConnectionPool(listener) => Some(listener),
                _ => None,
            },
        )
    }

    pub fn resolve_server_listeners(
        &self,
        names: &[String],
    ) -> Result<Vec<Arc<dyn ServerListener>>, ComponentError> {
        self.resolve_all(names, Capability::ServerListener, |component| match component {
            Component::Server(listener) => Some(listener),
            _ => None,
        })
    }

    pub fn resolve_server_monitor_listeners(
        &self,
        names: &[String],
    ) -> Result<Vec<Arc<dyn ServerMonitorListener>>, ComponentError> {
        self.resolve_all(
            names,
            Capability::ServerMonitorListener,
            |component| match component {
                Component::ServerMonitor(listener) => Some(listener),
                _ => None,
            },
        )
    }

    pub fn resolve_server_selector(
        &self,
        name: &str,
    ) -> Result<Arc<dyn ServerSelector>, ComponentError> {
        self.resolve_as(name, Capability::ServerSelector, |component| match component {
            Component::Selector(selector) => Some(selector),
            _ => None,
        })
    }

    pub fn resolve_optioned_listeners(
        &self,
        names: &[String],
    ) -> Result<Vec<Arc<dyn OptionedListener>>, ComponentError> {
        self.resolve_all(names, Capability::OptionedListener, |component| match component {
            Component::Optioned(listener) => Some(listener),
            _ => None,
        })
    }

    fn resolve_all<T>(
        &self,
        names: &[String],
        expected: Capability,
        extract: fn(Component) -> Option<T>,
    ) -> Result<Vec<T>, ComponentError> {
        names
            .iter()
            .map(|name| self.resolve_as(name, expected, extract))
            .collect()
    }

    fn resolve_as<T>(
        &self,
        name: &str,
        expected: Capability,
        extract: impl FnOnce(Component) -> Option<T>,
    ) -> Result<T, ComponentError> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| ComponentError::NotRegistered {
                name: name.to_string(),
                capability: expected,
            })?;

        let component = factory().map_err(|source| ComponentError::ConstructionFailed {
            name: name.to_string(),
            source,
        })?;

        let actual = component.capability();
        let resolved = extract(component).ok_or_else(|| ComponentError::CapabilityMismatch {
            name: name.to_string(),
            expected,
            actual,
        })?;

        tracing::debug!(name = %name, capability = %expected, "Resolved component");
        Ok(resolved)
    }
}

impl fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("names", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::event::command::CommandEvent;
    use mongodb::event::sdam::SdamEvent;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting;

    impl CommandListener for Counting {
        fn on_command_event(&self, _event: &CommandEvent) {}
    }

    struct Heartbeats;

    impl ServerMonitorListener for Heartbeats {
        fn on_heartbeat_event(&self, _event: &SdamEvent) {}
    }

    #[test]
    fn test_resolve_registered_listener() {
        let mut registry = ComponentRegistry::new();
        registry.register_command_listener("counting", || Counting);

        let component = registry
            .resolve("counting", Capability::CommandListener)
            .unwrap();
        assert_eq!(component.capability(), Capability::CommandListener);
    }

    #[test]
    fn test_unknown_name_identifies_offender() {
        let registry = ComponentRegistry::new();
        let err = registry
            .resolve_command_listeners(&["com.example.Missing".to_string()])
            .err()
            .unwrap();
        assert!(matches!(err, ComponentError::NotRegistered { .. }));
        assert_eq!(err.name(), "com.example.Missing");
        assert!(err.to_string().contains("com.example.Missing"));
        assert!(err.to_string().contains("command listener"));
    }

    #[test]
    fn test_capability_mismatch() {
        let mut registry = ComponentRegistry::new();
        registry.register_server_monitor_listener("heartbeats", || Heartbeats);

        let err = registry
            .resolve_cluster_listeners(&["heartbeats".to_string()])
            .err()
            .unwrap();
        match err {
            ComponentError::CapabilityMismatch {
                name,
                expected,
                actual,
            } => {
                assert_eq!(name, "heartbeats");
                assert_eq!(expected, Capability::ClusterListener);
                assert_eq!(actual, Capability::ServerMonitorListener);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_construction_failure_wraps_cause() {
        let mut registry = ComponentRegistry::new();
        registry.register("broken", || Err("missing credentials".into()));

        let err = registry
            .resolve("broken", Capability::ServerSelector)
            .unwrap_err();
        assert!(matches!(err, ComponentError::ConstructionFailed { .. }));
        assert!(err.to_string().contains("missing credentials"));
    }

    #[test]
    fn test_each_resolution_constructs_a_new_instance() {
        let constructed = Arc::new(AtomicUsize::new(0));
        let counter = constructed.clone();

        let mut registry = ComponentRegistry::new();
        registry.register_command_listener("counting", move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Counting
        });

        let names = vec!["counting".to_string(), "counting".to_string()];
        let listeners = registry.resolve_command_listeners(&names).unwrap();
        assert_eq!(listeners.len(), 2);
        assert!(!Arc::ptr_eq(&listeners[0], &listeners[1]));
        assert_eq!(constructed.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_resolution_stops_at_first_failure() {
        let constructed = Arc::new(AtomicUsize::new(0));
        let counter = constructed.clone();

        let mut registry = ComponentRegistry::new();
        registry.register_command_listener("counting", move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Counting
        });

        let names = vec![
            "counting".to_string(),
            "missing".to_string(),
            "counting".to_string(),
        ];
        assert!(registry.resolve_command_listeners(&names).is_err());
        assert_eq!(constructed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_names_are_sorted() {
        let mut registry = ComponentRegistry::new();
        registry
            .register_command_listener("zeta", || Counting)
            .register_server_monitor_listener("alpha", || Heartbeats);
        assert_eq!(registry.names(), vec!["alpha", "zeta"]);
        assert!(registry.contains("zeta"));
        assert!(!registry.contains("beta"));
    }

    #[test]
    fn test_reregistration_replaces_factory() {
        let mut registry = ComponentRegistry::new();
        registry.register_command_listener("listener", || Counting);
        registry.register_server_monitor_listener("listener", || Heartbeats);

        assert!(registry
            .resolve("listener", Capability::ServerMonitorListener)
            .is_ok());
        assert_eq!(registry.names().len(), 1);
    }
}
