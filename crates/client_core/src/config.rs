use std::{collections::HashMap, fs, path::Path, path::PathBuf};

use thiserror::Error;
use tracing::warn;
use url::Url;

pub const DEFAULT_SETTINGS_FILE: &str = "client.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub session_file: Option<PathBuf>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8080/api".into(),
            request_timeout_secs: 15,
            user_agent: concat!("ywave-client/", env!("CARGO_PKG_VERSION")).into(),
            session_file: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid api base url '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("api base url '{0}' must use http or https")]
    UnsupportedScheme(String),
    #[error("request timeout must be greater than zero")]
    ZeroTimeout,
}

/// Defaults, then `client.toml` in the working directory, then environment.
pub fn load_settings() -> Result<ClientSettings, SettingsError> {
    let file = Path::new(DEFAULT_SETTINGS_FILE);
    let settings = if file.exists() {
        load_settings_file(file, ClientSettings::default())?
    } else {
        ClientSettings::default()
    };
    let settings = apply_env_overrides(settings, |key| std::env::var(key).ok());
    validate(&settings)?;
    Ok(settings)
}

pub fn load_settings_file(
    path: &Path,
    mut settings: ClientSettings,
) -> Result<ClientSettings, SettingsError> {
    let raw = fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let file_cfg =
        toml::from_str::<HashMap<String, toml::Value>>(&raw).map_err(|source| {
            SettingsError::Parse {
                path: path.display().to_string(),
                source,
            }
        })?;

    if let Some(v) = file_cfg.get("api_base_url").and_then(toml::Value::as_str) {
        settings.api_base_url = v.to_string();
    }
    if let Some(v) = file_cfg
        .get("request_timeout_secs")
        .and_then(toml::Value::as_integer)
    {
        match u64::try_from(v) {
            Ok(secs) => settings.request_timeout_secs = secs,
            Err(_) => warn!(value = v, "config: ignoring negative request_timeout_secs"),
        }
    }
    if let Some(v) = file_cfg.get("user_agent").and_then(toml::Value::as_str) {
        settings.user_agent = v.to_string();
    }
    if let Some(v) = file_cfg.get("session_file").and_then(toml::Value::as_str) {
        settings.session_file = Some(PathBuf::from(v));
    }

    Ok(settings)
}

/// `YWAVE_*` variables are applied first, `APP__*` variables override them.
pub fn apply_env_overrides(
    mut settings: ClientSettings,
    lookup: impl Fn(&str) -> Option<String>,
) -> ClientSettings {
    for key in ["YWAVE_API_BASE_URL", "APP__API_BASE_URL"] {
        if let Some(v) = lookup(key) {
            settings.api_base_url = v;
        }
    }
    for key in ["YWAVE_REQUEST_TIMEOUT_SECS", "APP__REQUEST_TIMEOUT_SECS"] {
        if let Some(v) = lookup(key) {
            match v.parse::<u64>() {
                Ok(parsed) => settings.request_timeout_secs = parsed,
                Err(_) => warn!(key, value = %v, "config: ignoring unparsable timeout"),
            }
        }
    }
    for key in ["YWAVE_USER_AGENT", "APP__USER_AGENT"] {
        if let Some(v) = lookup(key) {
            settings.user_agent = v;
        }
    }
    for key in ["YWAVE_SESSION_FILE", "APP__SESSION_FILE"] {
        if let Some(v) = lookup(key) {
            settings.session_file = Some(PathBuf::from(v));
        }
    }
    settings
}

/// A blank base url is accepted and leaves the client without a server.
pub fn validate(settings: &ClientSettings) -> Result<(), SettingsError> {
    if settings.request_timeout_secs == 0 {
        return Err(SettingsError::ZeroTimeout);
    }
    if settings.api_base_url.trim().is_empty() {
        return Ok(());
    }
    let url = Url::parse(settings.api_base_url.trim()).map_err(|source| {
        SettingsError::InvalidBaseUrl {
            url: settings.api_base_url.clone(),
            source,
        }
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(SettingsError::UnsupportedScheme(
            settings.api_base_url.clone(),
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
