//! Configuration loading
//!
//! Settings resolve in priority order: environment variable, then TOML config
//! file, then compiled default. The metrics provider section is optional;
//! without credentials the enrichment pipeline runs in disabled mode.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:5850";
const DEFAULT_DATABASE_PATH: &str = "copyflow.db";
const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 15;

/// External keyword-metrics provider settings
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsProviderSettings {
    /// Base URL of the provider's search-volume endpoint
    pub base_url: String,
    /// HTTP basic auth login
    pub login: String,
    /// HTTP basic auth password
    pub password: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_provider_timeout")]
    pub timeout_secs: u64,
}

fn default_provider_timeout() -> u64 {
    DEFAULT_PROVIDER_TIMEOUT_SECS
}

/// Resolved service settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_path: PathBuf,
    pub bind_address: String,
    pub metrics_provider: Option<MetricsProviderSettings>,
}

/// Raw TOML shape before env overrides are applied
#[derive(Debug, Default, Deserialize)]
struct TomlSettings {
    database_path: Option<PathBuf>,
    bind_address: Option<String>,
    metrics_provider: Option<MetricsProviderSettings>,
}

impl Settings {
    /// Load settings from an optional TOML file, with environment overrides.
    ///
    /// Recognized variables: `COPYFLOW_DATABASE`, `COPYFLOW_BIND`,
    /// `COPYFLOW_METRICS_URL`, `COPYFLOW_METRICS_LOGIN`,
    /// `COPYFLOW_METRICS_PASSWORD`, `COPYFLOW_METRICS_TIMEOUT_SECS`.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let file = match config_path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|e| {
                    Error::Config(format!("cannot read {}: {}", path.display(), e))
                })?;
                let parsed: TomlSettings = toml::from_str(&text)
                    .map_err(|e| Error::Config(format!("invalid TOML in {}: {}", path.display(), e)))?;
                info!("Loaded config file: {}", path.display());
                parsed
            }
            None => TomlSettings::default(),
        };

        let database_path = std::env::var("COPYFLOW_DATABASE")
            .map(PathBuf::from)
            .ok()
            .or(file.database_path)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH));

        let bind_address = std::env::var("COPYFLOW_BIND")
            .ok()
            .or(file.bind_address)
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let metrics_provider = Self::provider_from_env()?.or(file.metrics_provider);

        Ok(Settings {
            database_path,
            bind_address,
            metrics_provider,
        })
    }

    /// Build provider settings from environment variables, if all required
    /// pieces are present. A partial set is a configuration error rather than
    /// a silent fallback.
    fn provider_from_env() -> Result<Option<MetricsProviderSettings>> {
        let base_url = std::env::var("COPYFLOW_METRICS_URL").ok();
        let login = std::env::var("COPYFLOW_METRICS_LOGIN").ok();
        let password = std::env::var("COPYFLOW_METRICS_PASSWORD").ok();

        match (base_url, login, password) {
            (Some(base_url), Some(login), Some(password)) => {
                let timeout_secs = match std::env::var("COPYFLOW_METRICS_TIMEOUT_SECS") {
                    Ok(raw) => raw.parse().map_err(|_| {
                        Error::Config(format!(
                            "COPYFLOW_METRICS_TIMEOUT_SECS is not a number: {raw}"
                        ))
                    })?,
                    Err(_) => DEFAULT_PROVIDER_TIMEOUT_SECS,
                };
                Ok(Some(MetricsProviderSettings {
                    base_url,
                    login,
                    password,
                    timeout_secs,
                }))
            }
            (None, None, None) => Ok(None),
            _ => Err(Error::Config(
                "metrics provider env config is incomplete: set COPYFLOW_METRICS_URL, \
                 COPYFLOW_METRICS_LOGIN and COPYFLOW_METRICS_PASSWORD together"
                    .to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_without_config_file() {
        let settings = Settings::load(None).expect("load should succeed");
        assert_eq!(settings.bind_address, DEFAULT_BIND_ADDRESS);
        assert_eq!(settings.database_path, PathBuf::from(DEFAULT_DATABASE_PATH));
    }

    #[test]
    fn toml_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
database_path = "/tmp/flow.db"
bind_address = "0.0.0.0:6000"

[metrics_provider]
base_url = "https://metrics.example.com/v3/search_volume"
login = "acct"
password = "secret"
"#
        )
        .unwrap();

        let settings = Settings::load(Some(file.path())).expect("load should succeed");
        assert_eq!(settings.bind_address, "0.0.0.0:6000");
        assert_eq!(settings.database_path, PathBuf::from("/tmp/flow.db"));
        let provider = settings.metrics_provider.expect("provider configured");
        assert_eq!(provider.timeout_secs, DEFAULT_PROVIDER_TIMEOUT_SECS);
        assert_eq!(provider.login, "acct");
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "bind_address = [not toml").unwrap();
        let err = Settings::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
