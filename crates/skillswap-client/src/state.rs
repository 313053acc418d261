//! Application state shared across all commands.
//!
//! [`AppState`] owns the record store and the volatile [`Session`]. It is
//! created once at startup by [`crate::open`] and handed to every command.

use skillswap_shared::constants::DEFAULT_AVATAR_URL;
use skillswap_shared::credentials::{Blake3Verifier, CredentialVerifier};
use skillswap_shared::{ConversationId, UserId};
use skillswap_store::{MemoryStore, RecordStore, User};

use crate::error::{ClientError, Result};

/// Who is logged in and which conversation is open.
///
/// Only the user survives a restart (through the persisted current-user
/// record); the open conversation is session-only.
#[derive(Debug, Clone, Default)]
pub struct Session {
    current_user: Option<User>,
    current_conversation: Option<ConversationId>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `user` the active account. Any open conversation is closed.
    pub fn begin(&mut self, user: User) {
        self.current_user = Some(user);
        self.current_conversation = None;
    }

    pub fn end(&mut self) {
        self.current_user = None;
        self.current_conversation = None;
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    pub fn current_user_id(&self) -> Option<&UserId> {
        self.current_user.as_ref().map(|u| &u.id)
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user.is_some()
    }

    pub fn current_conversation(&self) -> Option<&ConversationId> {
        self.current_conversation.as_ref()
    }

    pub fn open_conversation(&mut self, id: ConversationId) {
        self.current_conversation = Some(id);
    }

    // replaces the cached copy after a profile edit
    pub(crate) fn refresh_user(&mut self, user: User) {
        if self.current_user_id() == Some(&user.id) {
            self.current_user = Some(user);
        }
    }
}

/// Central application state.
pub struct AppState {
    /// Record store adapter. The only path to persisted data.
    pub store: RecordStore,

    /// Hashes and checks account secrets.
    pub credentials: Box<dyn CredentialVerifier>,

    /// The volatile session.
    pub session: Session,

    /// Avatar assigned at signup.
    pub default_avatar: String,
}

impl AppState {
    pub fn new(store: RecordStore) -> Self {
        Self {
            store,
            credentials: Box::new(Blake3Verifier::new()),
            session: Session::new(),
            default_avatar: DEFAULT_AVATAR_URL.to_string(),
        }
    }

    /// Empty in-memory state with no session.
    pub fn in_memory() -> Self {
        Self::new(RecordStore::new(Box::new(MemoryStore::new())))
    }

    /// The logged-in user, or [`ClientError::NotAuthenticated`].
    pub fn require_user(&self) -> Result<&User> {
        self.session
            .current_user()
            .ok_or(ClientError::NotAuthenticated)
    }
}
