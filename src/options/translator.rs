//! Translation of [`MongoSettings`] into driver [`ClientOptions`]
//!
//! Translation runs in four steps: scalar fields, concerns, listener lists and
//! optioned listeners. Each step resolves everything it needs before touching
//! the options, so a failing step leaves the options exactly as the previous
//! steps left them.

use crate::concern::{parse_read_concern, parse_read_preference, parse_write_concern};
use crate::config::{MongoSettings, UnresolvedPolicy};
use crate::domain::{CarefreeError, Result};
use crate::listeners::dispatch::{cmap_handler, command_handler, sdam_handler, SdamListeners};
use crate::listeners::{ComponentRegistry, ServerSelector};
use mongodb::options::{
    ClientOptions, ReadConcern, ReadPreference, SelectionCriteria, ServerAddress, Tls, TlsOptions,
    WriteConcern,
};
use mongodb::ServerInfo;
use std::sync::Arc;
use std::time::Duration;

/// Applies settings to driver options, resolving component names through a registry
#[derive(Debug, Clone, Copy)]
pub struct OptionsTranslator<'a> {
    registry: &'a ComponentRegistry,
}

impl<'a> OptionsTranslator<'a> {
    pub fn new(registry: &'a ComponentRegistry) -> Self {
        Self { registry }
    }

    /// Applies every present setting to `options`
    ///
    /// Absent settings leave the corresponding option untouched. Applying the
    /// same settings twice yields the same options.
    ///
    /// # Errors
    ///
    /// - [`CarefreeError::Configuration`] if the settings fail validation or a host is malformed
    /// - [`CarefreeError::ConflictingSelection`] if both a server selector and a read
    ///   preference are set
    /// - [`CarefreeError::Parse`] if a concern string breaks its grammar
    /// - [`CarefreeError::Unresolved`] if a concern string matches no known form and
    ///   `on_unresolved` is `error`
    /// - [`CarefreeError::Component`] if a listener or selector name cannot be resolved
    /// - [`CarefreeError::Listener`] if an optioned listener fails
    ///
    /// On error, steps that completed before the failure remain applied.
    pub fn apply(&self, settings: &MongoSettings, options: &mut ClientOptions) -> Result<()> {
        settings.validate().map_err(CarefreeError::Configuration)?;

        if let (Some(selector), Some(read_preference)) =
            (&settings.server_selector, &settings.read_preference)
        {
            return Err(CarefreeError::ConflictingSelection {
                selector: selector.clone(),
                read_preference: read_preference.clone(),
            });
        }

        tracing::debug!(
            app_name = ?settings.app_name,
            description = ?settings.description,
            "Translating MongoDB settings"
        );

        self.apply_scalars(settings, options)?;
        self.apply_concerns(settings, options)?;
        self.apply_listeners(settings, options)?;
        self.apply_optioned_listeners(settings, options)?;

        tracing::info!(
            app_name = ?options.app_name,
            hosts = options.hosts.len(),
            "MongoDB client options ready"
        );
        Ok(())
    }

    /// Builds options from the driver defaults
    ///
    /// Unlike [`apply`](Self::apply), nothing is returned on failure.
    pub fn build(&self, settings: &MongoSettings) -> Result<ClientOptions> {
        let mut options = ClientOptions::default();
        self.apply(settings, &mut options)?;
        Ok(options)
    }

    fn apply_scalars(&self, settings: &MongoSettings, options: &mut ClientOptions) -> Result<()> {
        let hosts = settings
            .hosts
            .as_deref()
            .map(parse_hosts)
            .transpose()?;
        let selector = settings
            .server_selector
            .as_deref()
            .map(|name| self.registry.resolve_server_selector(name))
            .transpose()?;

        if let Some(hosts) = hosts {
            options.hosts = hosts;
        }
        set_if_some(&mut options.app_name, &settings.app_name);
        set_if_some(&mut options.repl_set_name, &settings.repl_set_name);
        set_if_some(&mut options.default_database, &settings.default_database);

        set_if_some(&mut options.connect_timeout, &millis(settings.connect_timeout_ms));
        set_if_some(
            &mut options.server_selection_timeout,
            &millis(settings.server_selection_timeout_ms),
        );
        set_if_some(&mut options.local_threshold, &millis(settings.local_threshold_ms));
        set_if_some(&mut options.heartbeat_freq, &millis(settings.heartbeat_frequency_ms));
        set_if_some(&mut options.max_idle_time, &millis(settings.max_idle_time_ms));

        set_if_some(&mut options.max_pool_size, &settings.max_pool_size);
        set_if_some(&mut options.min_pool_size, &settings.min_pool_size);
        set_if_some(&mut options.max_connecting, &settings.max_connecting);

        set_if_some(&mut options.retry_writes, &settings.retry_writes);
        set_if_some(&mut options.retry_reads, &settings.retry_reads);
        set_if_some(&mut options.direct_connection, &settings.direct_connection);
        set_if_some(&mut options.load_balanced, &settings.load_balanced);

        if let Some(tls) = tls_from(settings) {
            options.tls = Some(tls);
        }

        if let Some(selector) = selector {
            options.selection_criteria = Some(selector_criteria(selector));
        }

        Ok(())
    }

    fn apply_concerns(&self, settings: &MongoSettings, options: &mut ClientOptions) -> Result<()> {
        let policy = settings.on_unresolved;
        let write_concern = resolve_write_concern(settings.write_concern.as_deref(), policy)?;
        let read_concern = resolve_read_concern(settings.read_concern.as_deref(), policy)?;
        let read_preference =
            resolve_read_preference(settings.read_preference.as_deref(), policy)?;

        if let Some(write_concern) = write_concern {
            options.write_concern = Some(write_concern);
        }
        if let Some(read_concern) = read_concern {
            options.read_concern = Some(read_concern);
        }
        if let Some(read_preference) = read_preference {
            options.selection_criteria = Some(SelectionCriteria::ReadPreference(read_preference));
        }

        Ok(())
    }

    fn apply_listeners(&self, settings: &MongoSettings, options: &mut ClientOptions) -> Result<()> {
        let command = self
            .registry
            .resolve_command_listeners(&settings.command_listeners)?;
        let pool = self
            .registry
            .resolve_connection_pool_listeners(&settings.connection_pool_listeners)?;
        let sdam = SdamListeners {
            cluster: self
                .registry
                .resolve_cluster_listeners(&settings.cluster_listeners)?,
            server: self
                .registry
                .resolve_server_listeners(&settings.server_listeners)?,
            monitor: self
                .registry
                .resolve_server_monitor_listeners(&settings.server_monitor_listeners)?,
        };

        tracing::debug!(
            command = command.len(),
            connection_pool = pool.len(),
            cluster = sdam.cluster.len(),
            server = sdam.server.len(),
            server_monitor = sdam.monitor.len(),
            "Resolved listeners"
        );

        if !command.is_empty() {
            options.command_event_handler = Some(command_handler(command));
        }
        if !pool.is_empty() {
            options.cmap_event_handler = Some(cmap_handler(pool));
        }
        if !sdam.is_empty() {
            options.sdam_event_handler = Some(sdam_handler(sdam));
        }

        Ok(())
    }

    fn apply_optioned_listeners(
        &self,
        settings: &MongoSettings,
        options: &mut ClientOptions,
    ) -> Result<()> {
        let listeners = self
            .registry
            .resolve_optioned_listeners(&settings.optioned_listeners)?;

        for (name, listener) in settings.optioned_listeners.iter().zip(listeners) {
            listener
                .optioned(settings, options)
                .map_err(|source| CarefreeError::Listener {
                    name: name.clone(),
                    source,
                })?;
            tracing::debug!(name = %name, "Applied optioned listener");
        }

        Ok(())
    }
}

/// Builds driver options from `settings`, resolving names through `registry`
///
/// # Examples
///
/// ```
/// use carefree_mongodb::build_client_options;
/// use carefree_mongodb::config::MongoSettings;
/// use carefree_mongodb::listeners::ComponentRegistry;
///
/// let settings = MongoSettings {
///     app_name: Some("inventory".to_string()),
///     write_concern: Some("majority".to_string()),
///     ..Default::default()
/// };
///
/// let options = build_client_options(&settings, &ComponentRegistry::new()).unwrap();
/// assert_eq!(options.app_name.as_deref(), Some("inventory"));
/// assert!(options.write_concern.is_some());
/// ```
pub fn build_client_options(
    settings: &MongoSettings,
    registry: &ComponentRegistry,
) -> Result<ClientOptions> {
    OptionsTranslator::new(registry).build(settings)
}

fn set_if_some<T: Clone>(target: &mut Option<T>, value: &Option<T>) {
    if let Some(value) = value {
        *target = Some(value.clone());
    }
}

fn millis(value: Option<u64>) -> Option<Duration> {
    value.map(Duration::from_millis)
}

fn parse_hosts(hosts: &[String]) -> Result<Vec<ServerAddress>> {
    hosts
        .iter()
        .map(|host| {
            ServerAddress::parse(host.trim()).map_err(|e| {
                CarefreeError::Configuration(format!("Invalid host '{}': {}", host, e))
            })
        })
        .collect()
}

fn tls_from(settings: &MongoSettings) -> Option<Tls> {
    match settings.tls_enabled? {
        true => {
            let mut tls = TlsOptions::default();
            tls.allow_invalid_certificates = settings.tls_allow_invalid_certificates;
            tls.ca_file_path = settings.tls_ca_file.clone();
            tls.cert_key_file_path = settings.tls_cert_key_file.clone();
            if tls.allow_invalid_certificates == Some(true) {
                tracing::warn!("TLS certificate validation is disabled");
            }
            Some(Tls::Enabled(tls))
        }
        false => Some(Tls::Disabled),
    }
}

fn selector_criteria(selector: Arc<dyn ServerSelector>) -> SelectionCriteria {
    SelectionCriteria::Predicate(Arc::new(move |server: &ServerInfo| selector.select(server)))
}

fn unresolved(policy: UnresolvedPolicy, field: &'static str, value: &str) -> Result<()> {
    match policy {
        UnresolvedPolicy::Error => Err(CarefreeError::Unresolved {
            field,
            value: value.to_string(),
        }),
        UnresolvedPolicy::Warn => {
            tracing::warn!(field, value, "Ignoring unresolved value; driver default applies");
            Ok(())
        }
    }
}

fn resolve_write_concern(
    value: Option<&str>,
    policy: UnresolvedPolicy,
) -> Result<Option<WriteConcern>> {
    let Some(value) = value else {
        return Ok(None);
    };
    match parse_write_concern(value)? {
        Some(spec) => Ok(Some(spec.to_write_concern())),
        None => unresolved(policy, "write_concern", value).map(|()| None),
    }
}

fn resolve_read_concern(
    value: Option<&str>,
    policy: UnresolvedPolicy,
) -> Result<Option<ReadConcern>> {
    let Some(value) = value else {
        return Ok(None);
    };
    match parse_read_concern(value) {
        Some(spec) => Ok(Some(spec.to_read_concern())),
        None => unresolved(policy, "read_concern", value).map(|()| None),
    }
}

fn resolve_read_preference(
    value: Option<&str>,
    policy: UnresolvedPolicy,
) -> Result<Option<ReadPreference>> {
    let Some(value) = value else {
        return Ok(None);
    };
    match parse_read_preference(value)? {
        Some(spec) => Ok(Some(spec.to_read_preference())),
        None => unresolved(policy, "read_preference", value).map(|()| None),
    }
}
