//! # skillswap-store
//!
//! Record storage for SkillSwap.
//!
//! Every collection (users, skills, messages, conversations) is kept as one
//! JSON document under a fixed key in a [`KeyValueStore`]. Callers go through
//! [`RecordStore`], which loads and replaces whole collections. Two backends
//! are provided: [`MemoryStore`] for ephemeral sessions and tests, and the
//! SQLite-backed [`Database`] for persistence.

pub mod backup;
pub mod database;
pub mod kv;
pub mod migrations;
pub mod models;
pub mod records;
pub mod seed;

mod error;

pub use database::Database;
pub use error::{Result, StoreError};
pub use kv::{KeyValueStore, MemoryStore};
pub use models::*;
pub use records::{Collection, Record, RecordStore};
