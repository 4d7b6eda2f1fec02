//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::CarefreeConfig;
use crate::domain::errors::CarefreeError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into CarefreeConfig
/// 4. Applies environment variable overrides (CAREFREE_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - An override variable holds a value of the wrong type
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use carefree_mongodb::config::loader::load_config;
///
/// let config = load_config("carefree.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<CarefreeConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(CarefreeError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        CarefreeError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let config = parse_config(&contents)?;
    tracing::debug!(path = %path.display(), "Configuration loaded");
    Ok(config)
}

/// Parses configuration from TOML text, applying the same substitution,
/// overrides and validation as [`load_config`]
pub fn parse_config(contents: &str) -> Result<CarefreeConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: CarefreeConfig = toml::from_str(&contents)
        .map_err(|e| CarefreeError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        CarefreeError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("environment variable pattern is valid")
    })
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied untouched.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = env_var_pattern();
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(CarefreeError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn env_value<T: FromStr>(name: &str) -> Result<Option<T>> {
    match std::env::var(name) {
        Ok(val) => val.trim().parse().map(Some).map_err(|_| {
            CarefreeError::Configuration(format!("Invalid value '{val}' for {name}"))
        }),
        Err(_) => Ok(None),
    }
}

/// Applies environment variable overrides using the CAREFREE_* prefix
///
/// Variables follow the pattern CAREFREE_<SECTION>_<KEY>, for example
/// CAREFREE_MONGODB_WRITE_CONCERN or CAREFREE_APPLICATION_LOG_LEVEL.
/// Listener lists are not overridable.
fn apply_env_overrides(config: &mut CarefreeConfig) -> Result<()> {
    // Application overrides
    if let Some(val) = env_value("CAREFREE_APPLICATION_LOG_LEVEL")? {
        config.application.log_level = val;
    }

    // Logging overrides
    if let Some(val) = env_value("CAREFREE_LOGGING_LOCAL_ENABLED")? {
        config.logging.local_enabled = val;
    }
    if let Some(val) = env_value("CAREFREE_LOGGING_LOCAL_PATH")? {
        config.logging.local_path = val;
    }

    // MongoDB overrides
    let mongodb = &mut config.mongodb;
    if let Some(val) = env_value("CAREFREE_MONGODB_APP_NAME")? {
        mongodb.app_name = Some(val);
    }
    if let Some(val) = env_value::<String>("CAREFREE_MONGODB_HOSTS")? {
        mongodb.hosts = Some(val.split(',').map(|host| host.trim().to_string()).collect());
    }
    if let Some(val) = env_value("CAREFREE_MONGODB_CONNECT_TIMEOUT_MS")? {
        mongodb.connect_timeout_ms = Some(val);
    }
    if let Some(val) = env_value("CAREFREE_MONGODB_SERVER_SELECTION_TIMEOUT_MS")? {
        mongodb.server_selection_timeout_ms = Some(val);
    }
    if let Some(val) = env_value("CAREFREE_MONGODB_MAX_POOL_SIZE")? {
        mongodb.max_pool_size = Some(val);
    }
    if let Some(val) = env_value("CAREFREE_MONGODB_MIN_POOL_SIZE")? {
        mongodb.min_pool_size = Some(val);
    }
    if let Some(val) = env_value("CAREFREE_MONGODB_REPL_SET_NAME")? {
        mongodb.repl_set_name = Some(val);
    }
    if let Some(val) = env_value("CAREFREE_MONGODB_TLS_ENABLED")? {
        mongodb.tls_enabled = Some(val);
    }
    if let Some(val) = env_value("CAREFREE_MONGODB_WRITE_CONCERN")? {
        mongodb.write_concern = Some(val);
    }
    if let Some(val) = env_value("CAREFREE_MONGODB_READ_CONCERN")? {
        mongodb.read_concern = Some(val);
    }
    if let Some(val) = env_value("CAREFREE_MONGODB_READ_PREFERENCE")? {
        mongodb.read_preference = Some(val);
    }

    Ok(())
}
