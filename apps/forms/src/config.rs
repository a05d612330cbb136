use std::{collections::HashMap, fs, path::Path};

use serde::Deserialize;

pub const SETTINGS_FILE: &str = "forms.toml";

/// Default cap on all slots together, in line with browser local storage.
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub database_url: String,
    /// `None` disables the quota.
    pub quota_bytes: Option<usize>,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: "sqlite://./data/forms.db".into(),
            quota_bytes: Some(DEFAULT_QUOTA_BYTES),
            log_level: "warn".into(),
        }
    }
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new(SETTINGS_FILE), |name| std::env::var(name).ok())
}

/// Defaults, then the settings file, then environment variables.
pub fn load_settings_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<HashMap<String, toml::Value>>(&raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.get("database_url").and_then(|v| v.as_str()) {
                    settings.database_url = v.to_string();
                }
                if let Some(v) = file_cfg.get("quota_bytes") {
                    let raw = match v {
                        toml::Value::Integer(n) => n.to_string(),
                        other => other.as_str().unwrap_or_default().to_string(),
                    };
                    if let Some(quota) = parse_quota(&raw) {
                        settings.quota_bytes = quota;
                    }
                }
                if let Some(v) = file_cfg.get("log_level").and_then(|v| v.as_str()) {
                    settings.log_level = v.to_string();
                }
            }
            Err(err) => {
                eprintln!("ignoring unreadable {}: {err}", path.display());
            }
        }
    }

    if let Some(v) = env("FORMS_DATABASE_URL") {
        settings.database_url = v;
    }
    if let Some(v) = env("APP__DATABASE_URL") {
        settings.database_url = v;
    }

    if let Some(quota) = env("APP__QUOTA_BYTES").and_then(|v| parse_quota(&v)) {
        settings.quota_bytes = quota;
    }

    if let Some(v) = env("RUST_LOG") {
        settings.log_level = v;
    }
    if let Some(v) = env("APP__LOG_LEVEL") {
        settings.log_level = v;
    }

    settings
}

/// `0` means unlimited; anything unparsable is ignored.
fn parse_quota(raw: &str) -> Option<Option<usize>> {
    match raw.trim().parse::<usize>() {
        Ok(0) => Some(None),
        Ok(n) => Some(Some(n)),
        Err(_) => None,
    }
}

/// Accepts a bare file path as well as a `sqlite:` url.
pub fn normalize_database_url(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return Settings::default().database_url;
    }
    if raw.contains("://") || raw.starts_with("sqlite::memory:") {
        return raw.to_string();
    }
    let path = raw.strip_prefix("sqlite:").unwrap_or(raw).replace('\\', "/");
    format!("sqlite://{path}")
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
