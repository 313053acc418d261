//! Typed whole-collection access on top of a [`KeyValueStore`].
//!
//! Every operation reads a full collection, and writes replace a full
//! collection. There are no partial updates and no transactions.
//!
//! # Single writer
//!
//! A load-mutate-replace sequence silently overwrites any write that lands
//! between its load and its replace. [`RecordStore`] is therefore only
//! correct with one logical actor at a time. A multi-actor deployment needs
//! per-entity locking, versioned writes, or a transactional backend behind
//! [`KeyValueStore`].

use serde::de::DeserializeOwned;
use serde::Serialize;

use skillswap_shared::constants::{
    CONVERSATIONS_KEY, CURRENT_USER_KEY, MESSAGES_KEY, SKILLS_KEY, USERS_KEY,
};

use crate::error::{Result, StoreError};
use crate::kv::KeyValueStore;
use crate::models::{Conversation, Message, SkillEntry, User};

/// The four named collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Skills,
    Messages,
    Conversations,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::Users,
        Collection::Skills,
        Collection::Messages,
        Collection::Conversations,
    ];

    /// Storage key of the collection.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Users => USERS_KEY,
            Self::Skills => SKILLS_KEY,
            Self::Messages => MESSAGES_KEY,
            Self::Conversations => CONVERSATIONS_KEY,
        }
    }
}

/// A record type stored as one element of a [`Collection`].
pub trait Record: Serialize + DeserializeOwned {
    const COLLECTION: Collection;
}

impl Record for User {
    const COLLECTION: Collection = Collection::Users;
}

impl Record for SkillEntry {
    const COLLECTION: Collection = Collection::Skills;
}

impl Record for Message {
    const COLLECTION: Collection = Collection::Messages;
}

impl Record for Conversation {
    const COLLECTION: Collection = Collection::Conversations;
}

/// The record store adapter. All collection access goes through here.
pub struct RecordStore {
    backend: Box<dyn KeyValueStore>,
}

impl RecordStore {
    pub fn new(backend: Box<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Load a full collection in stored order. Never-written collections
    /// load as empty.
    pub fn load_all<R: Record>(&self) -> Result<Vec<R>> {
        let key = R::COLLECTION.key();
        match self.backend.get(key)? {
            Some(json) => {
                serde_json::from_str(&json).map_err(|source| StoreError::Serialization { key, source })
            }
            None => Ok(Vec::new()),
        }
    }

    /// Overwrite a full collection.
    pub fn replace_all<R: Record>(&mut self, records: &[R]) -> Result<()> {
        let key = R::COLLECTION.key();
        let json = serde_json::to_string(records)
            .map_err(|source| StoreError::Serialization { key, source })?;
        self.backend.set(key, &json)?;
        tracing::debug!(collection = key, count = records.len(), "collection replaced");
        Ok(())
    }

    /// Whether the collection has ever been written.
    pub fn is_initialized(&self, collection: Collection) -> Result<bool> {
        Ok(self.backend.get(collection.key())?.is_some())
    }

    // ------------------------------------------------------------------
    // Persisted session
    // ------------------------------------------------------------------

    /// The last logged-in user, as it was when saved.
    pub fn load_current_user(&self) -> Result<Option<User>> {
        match self.backend.get(CURRENT_USER_KEY)? {
            Some(json) => serde_json::from_str(&json)
                .map(Some)
                .map_err(|source| StoreError::Serialization {
                    key: CURRENT_USER_KEY,
                    source,
                }),
            None => Ok(None),
        }
    }

    pub fn save_current_user(&mut self, user: &User) -> Result<()> {
        let json = serde_json::to_string(user).map_err(|source| StoreError::Serialization {
            key: CURRENT_USER_KEY,
            source,
        })?;
        self.backend.set(CURRENT_USER_KEY, &json)
    }

    pub fn clear_current_user(&mut self) -> Result<()> {
        self.backend.remove(CURRENT_USER_KEY)
    }
}
