use anyhow::{Result, anyhow, bail};
use config::{Config, File, FileFormat};
use serde::Deserialize;

use crate::events::{DEFAULT_CAPACITY, MAX_CAPACITY};

const DEFAULT_CONFIG_PATH: &str = "invalidator.yml";
const EVENT_CAPACITY_ENV: &str = "INVALIDATOR_EVENT_CAPACITY";
const LOG_PROXY_ERRORS_ENV: &str = "INVALIDATOR_LOG_PROXY_ERRORS";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// Capacity of the default event channel, between 1 and [`MAX_CAPACITY`]
    pub event_capacity: usize,
    /// Whether proxy errors raised during flush should be logged
    pub log_proxy_errors: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            event_capacity: DEFAULT_CAPACITY,
            log_proxy_errors: true,
        }
    }
}

impl Settings {
    /// Reject values the event channel cannot be built with
    pub fn validate(&self) -> Result<()> {
        if self.event_capacity == 0 || self.event_capacity > MAX_CAPACITY {
            bail!(
                "event_capacity must be between 1 and {MAX_CAPACITY}, got {}",
                self.event_capacity
            );
        }
        Ok(())
    }
}

fn builder_with_defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
    let defaults = Settings::default();
    Config::builder()
        .set_default("event_capacity", defaults.event_capacity as u64)?
        .set_default("log_proxy_errors", defaults.log_proxy_errors)
        .map_err(Into::into)
}

fn load_file_config(path: &str) -> Result<Settings> {
    let settings = builder_with_defaults()?
        .add_source(File::with_name(path).required(false))
        .build()
        .map_err(|_| anyhow!("Failed to read config file {path}"))?;

    settings
        .try_deserialize::<Settings>()
        .map_err(|_| anyhow!("Failed to deserialize config file {path}"))
}

/// Parse settings from a YAML document, filling in defaults
pub fn from_yaml(document: &str) -> Result<Settings> {
    let settings = builder_with_defaults()?
        .add_source(File::from_str(document, FileFormat::Yaml))
        .build()?
        .try_deserialize::<Settings>()
        .map_err(|e| anyhow!("Failed to deserialize settings: {e}"))?;

    settings.validate()?;
    Ok(settings)
}

/// Try to parse env variable. If it's not set, return None. If it's invalid, treat it as an error.
fn try_from_env<T, F>(env_var: &str, f: F) -> Result<Option<T>>
where
    F: FnOnce(String) -> Result<T>,
{
    match std::env::var(env_var) {
        Ok(raw) => {
            let val = f(raw).map_err(|_| anyhow!("Failed to parse {}", env_var))?;
            Ok(Some(val))
        }
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(_) => bail!("Could not read {env_var} from env"),
    }
}

fn parse_bool(raw: String) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("not a boolean: {other}"),
    }
}

/// Load configuration from env with fallback to the config file, then to defaults.
pub fn load() -> Result<Settings> {
    load_from(DEFAULT_CONFIG_PATH)
}

/// Like [`load`], reading the given config file instead of `invalidator.yml`
pub fn load_from(path: &str) -> Result<Settings> {
    let capacity_opt: Option<usize> = try_from_env(EVENT_CAPACITY_ENV, |env_str| {
        env_str.trim().parse::<usize>().map_err(|e| e.into())
    })?;

    let log_opt: Option<bool> = try_from_env(LOG_PROXY_ERRORS_ENV, parse_bool)?;

    let settings = match (capacity_opt, log_opt) {
        (Some(event_capacity), Some(log_proxy_errors)) => Settings {
            event_capacity,
            log_proxy_errors,
        },
        _ => {
            let file = load_file_config(path)?;

            let event_capacity = capacity_opt.unwrap_or_else(|| {
                tracing::debug!("{EVENT_CAPACITY_ENV} is not set, using {path} or default");
                file.event_capacity
            });

            Settings {
                event_capacity,
                log_proxy_errors: log_opt.unwrap_or(file.log_proxy_errors),
            }
        }
    };

    settings.validate()?;
    Ok(settings)
}
