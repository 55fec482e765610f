//! Configuration file loading.

use std::path::Path;

use log::{debug, info};

use crate::config::types::Settings;
use crate::error_handling::ConfigError;

const ENV_GOOGLE_API_KEY: &str = "LINK_CHECKER_GOOGLE_API_KEY";
const ENV_GOOGLE_ENGINE_ID: &str = "LINK_CHECKER_GOOGLE_SEARCH_ENGINE_ID";
const ENV_BING_API_KEY: &str = "LINK_CHECKER_BING_API_KEY";
const ENV_SMTP_PASSWORD: &str = "LINK_CHECKER_SMTP_PASSWORD";

/// Loads settings from a TOML file.
///
/// A missing file yields the built-in defaults; an unreadable or malformed
/// file is an error. Secrets are then overridden from the environment (see
/// [`apply_env_overrides`]).
///
/// # Errors
///
/// Returns `ConfigError::Read` if the file exists but cannot be read, or
/// `ConfigError::ParseToml` if it is not valid TOML for [`Settings`].
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    let mut settings = if path.exists() {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let parsed = parse_settings(&text).map_err(|source| ConfigError::ParseToml {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Loaded configuration from {}", path.display());
        parsed
    } else {
        debug!(
            "No configuration file at {}, using defaults",
            path.display()
        );
        Settings::default()
    };

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

/// Parses settings from TOML text.
pub fn parse_settings(text: &str) -> Result<Settings, toml::de::Error> {
    toml::from_str(text)
}

/// Overrides secrets from environment variables, when set and non-empty.
///
/// `lookup` is injected so tests don't touch the process environment.
pub fn apply_env_overrides<F>(settings: &mut Settings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    let search = &mut settings.alternative_suggestion;
    if let Some(v) = get(ENV_GOOGLE_API_KEY) {
        search.google_api_key = Some(v);
    }
    if let Some(v) = get(ENV_GOOGLE_ENGINE_ID) {
        search.google_search_engine_id = Some(v);
    }
    if let Some(v) = get(ENV_BING_API_KEY) {
        search.bing_api_key = Some(v);
    }
    if let Some(v) = get(ENV_SMTP_PASSWORD) {
        settings.notifications.email.password = Some(v);
    }
}
