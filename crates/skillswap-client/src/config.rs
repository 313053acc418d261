//! Client configuration loaded from environment variables.
//!
//! All settings have sensible defaults so the client can start with zero
//! configuration.

use std::path::PathBuf;

use skillswap_shared::constants::DEFAULT_AVATAR_URL;

/// Where records are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// Volatile, lost on exit.
    Memory,
    /// SQLite file at `db_path`, or the platform data directory when unset.
    Sqlite,
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Storage backend.
    /// Env: `SKILLSWAP_STORE` (`memory` / `sqlite`)
    /// Default: `sqlite`
    pub backend: StoreBackend,

    /// Explicit SQLite file path.
    /// Env: `SKILLSWAP_DB_PATH`
    /// Default: unset (platform data directory).
    pub db_path: Option<PathBuf>,

    /// Write the demo accounts into a fresh store.
    /// Env: `SKILLSWAP_SEED_SAMPLE_USERS` (true/false)
    /// Default: `true`
    pub seed_sample_users: bool,

    /// Avatar given to new accounts.
    /// Env: `SKILLSWAP_DEFAULT_AVATAR`
    pub default_avatar: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Sqlite,
            db_path: None,
            seed_sample_users: true,
            default_avatar: DEFAULT_AVATAR_URL.to_string(),
        }
    }
}

impl ClientConfig {
    /// In-memory store without sample data.
    pub fn ephemeral() -> Self {
        Self {
            backend: StoreBackend::Memory,
            seed_sample_users: false,
            ..Self::default()
        }
    }

    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(value) = lookup("SKILLSWAP_STORE") {
            match parse_backend(&value) {
                Some(backend) => config.backend = backend,
                None => tracing::warn!(value = %value, "Invalid SKILLSWAP_STORE, using default"),
            }
        }

        if let Some(path) = lookup("SKILLSWAP_DB_PATH") {
            if !path.trim().is_empty() {
                config.db_path = Some(PathBuf::from(path));
            }
        }

        if let Some(value) = lookup("SKILLSWAP_SEED_SAMPLE_USERS") {
            match parse_bool(&value) {
                Some(flag) => config.seed_sample_users = flag,
                None => tracing::warn!(
                    value = %value,
                    "Invalid SKILLSWAP_SEED_SAMPLE_USERS, using default"
                ),
            }
        }

        if let Some(avatar) = lookup("SKILLSWAP_DEFAULT_AVATAR") {
            if !avatar.trim().is_empty() {
                config.default_avatar = avatar.trim().to_string();
            }
        }

        config
    }
}

fn parse_backend(value: &str) -> Option<StoreBackend> {
    match value.trim().to_ascii_lowercase().as_str() {
        "memory" => Some(StoreBackend::Memory),
        "sqlite" => Some(StoreBackend::Sqlite),
        _ => None,
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> ClientConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ClientConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_config() {
        let config = config_from(&[]);
        assert_eq!(config.backend, StoreBackend::Sqlite);
        assert!(config.db_path.is_none());
        assert!(config.seed_sample_users);
        assert_eq!(config.default_avatar, DEFAULT_AVATAR_URL);
    }

    #[test]
    fn test_env_overrides() {
        let config = config_from(&[
            ("SKILLSWAP_STORE", "Memory"),
            ("SKILLSWAP_DB_PATH", "/tmp/skills.db"),
            ("SKILLSWAP_SEED_SAMPLE_USERS", "0"),
            ("SKILLSWAP_DEFAULT_AVATAR", " https://example.com/a.png "),
        ]);
        assert_eq!(config.backend, StoreBackend::Memory);
        assert_eq!(config.db_path, Some(PathBuf::from("/tmp/skills.db")));
        assert!(!config.seed_sample_users);
        assert_eq!(config.default_avatar, "https://example.com/a.png");
    }

    #[test]
    fn test_invalid_values_ignored() {
        let config = config_from(&[
            ("SKILLSWAP_STORE", "postgres"),
            ("SKILLSWAP_SEED_SAMPLE_USERS", "maybe"),
        ]);
        assert_eq!(config.backend, StoreBackend::Sqlite);
        assert!(config.seed_sample_users);
    }
}
