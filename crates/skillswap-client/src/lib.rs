//! # skillswap-client
//!
//! The SkillSwap core: accounts and session, the skill catalog, matching,
//! browsable listings and two-party messaging, all over a
//! [`RecordStore`](skillswap_store::RecordStore).
//!
//! Call [`init_tracing`] once, then [`open`] with a [`ClientConfig`] to get
//! the [`AppState`] every command in [`commands`] operates on.

pub mod commands;
pub mod config;
pub mod error;
pub mod state;

use skillswap_shared::constants::APP_NAME;
use skillswap_store::{seed, Database, KeyValueStore, MemoryStore, RecordStore};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

pub use config::{ClientConfig, StoreBackend};
pub use error::{ClientError, Result};
pub use state::{AppState, Session};

/// Install the fmt subscriber. `RUST_LOG` overrides the default filter.
/// Calling it again is a no-op.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("skillswap_client=debug,skillswap_store=info,warn"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init();
}

/// Open the configured store, seed it if enabled and restore any
/// remembered session.
pub fn open(config: &ClientConfig) -> Result<AppState> {
    let backend: Box<dyn KeyValueStore> = match config.backend {
        StoreBackend::Memory => Box::new(MemoryStore::new()),
        StoreBackend::Sqlite => {
            let db = match &config.db_path {
                Some(path) => Database::open_at(path)?,
                None => Database::new()?,
            };
            info!(path = ?db.path(), "Database opened");
            Box::new(db)
        }
    };

    let mut state = AppState::new(RecordStore::new(backend));
    state.default_avatar = config.default_avatar.clone();

    if config.seed_sample_users {
        seed::initialize_collections(&mut state.store, state.credentials.as_ref())?;
    }

    commands::identity::restore_session(&mut state)?;

    info!(
        backend = ?config.backend,
        authenticated = state.session.is_authenticated(),
        "{APP_NAME} client ready"
    );
    Ok(state)
}

#[cfg(test)]
mod tests {
    use skillswap_store::User;

    use super::*;
    use crate::commands::identity::{log_in, sign_up};

    fn sqlite_config(dir: &tempfile::TempDir) -> ClientConfig {
        ClientConfig {
            backend: StoreBackend::Sqlite,
            db_path: Some(dir.path().join("skillswap.db")),
            ..ClientConfig::default()
        }
    }

    #[test]
    fn test_open_ephemeral_is_empty() {
        let state = open(&ClientConfig::ephemeral()).unwrap();
        assert!(state.store.load_all::<User>().unwrap().is_empty());
        assert!(!state.session.is_authenticated());
    }

    #[test]
    fn test_open_seeds_sample_users() {
        let config = ClientConfig {
            seed_sample_users: true,
            ..ClientConfig::ephemeral()
        };
        let mut state = open(&config).unwrap();
        assert_eq!(state.store.load_all::<User>().unwrap().len(), 3);

        log_in(&mut state, "john@example.com", "password123").unwrap();
    }

    #[test]
    fn test_sqlite_session_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let config = sqlite_config(&dir);

        let created = {
            let mut state = open(&config).unwrap();
            sign_up(&mut state, "Ann", "ann@x.com", "pw", "NYC").unwrap()
        };

        let state = open(&config).unwrap();
        assert_eq!(state.session.current_user_id(), Some(&created.id));
        // sample users plus Ann, seeding did not run twice
        assert_eq!(state.store.load_all::<User>().unwrap().len(), 4);
    }

    #[test]
    fn test_custom_default_avatar() {
        let config = ClientConfig {
            default_avatar: "https://example.com/me.png".to_string(),
            ..ClientConfig::ephemeral()
        };
        let mut state = open(&config).unwrap();
        let profile = sign_up(&mut state, "Ann", "ann@x.com", "pw", "NYC").unwrap();
        assert_eq!(profile.avatar, "https://example.com/me.png");
    }

    #[test]
    fn test_init_tracing_twice() {
        init_tracing();
        init_tracing();
    }
}
