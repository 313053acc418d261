//! First-run data.
//!
//! A fresh store gets three sample accounts so the directory is not empty,
//! and every collection is written once so later loads see an initialized
//! (if empty) document.

use chrono::NaiveDate;

use skillswap_shared::constants::DEFAULT_AVATAR_URL;
use skillswap_shared::credentials::CredentialVerifier;
use skillswap_shared::UserId;

use crate::error::Result;
use crate::models::{Conversation, Message, SkillEntry, User};
use crate::records::{Collection, RecordStore};

const SAMPLE_SECRET: &str = "password123";

/// Write sample users and empty collections for anything never written.
///
/// Existing collections are left untouched.
pub fn initialize_collections(
    store: &mut RecordStore,
    credentials: &dyn CredentialVerifier,
) -> Result<()> {
    if !store.is_initialized(Collection::Users)? {
        let users = sample_users(credentials);
        tracing::info!(count = users.len(), "seeding sample users");
        store.replace_all(&users)?;
    }

    if !store.is_initialized(Collection::Skills)? {
        store.replace_all::<SkillEntry>(&[])?;
    }
    if !store.is_initialized(Collection::Messages)? {
        store.replace_all::<Message>(&[])?;
    }
    if !store.is_initialized(Collection::Conversations)? {
        store.replace_all::<Conversation>(&[])?;
    }

    Ok(())
}

// id, name, email, location, avatar, rating, reviews, joined (y, m, d)
type SampleRow = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    f64,
    u32,
    (i32, u32, u32),
);

const SAMPLES: [SampleRow; 3] = [
    (
        "user1",
        "John Doe",
        "john@example.com",
        "New York, NY",
        DEFAULT_AVATAR_URL,
        4.8,
        36,
        (2025, 1, 15),
    ),
    (
        "user2",
        "Sarah Johnson",
        "sarah@example.com",
        "Los Angeles, CA",
        "https://cdn.pixabay.com/photo/2017/02/16/23/10/smile-2072907_960_720.jpg",
        4.9,
        42,
        (2025, 1, 10),
    ),
    (
        "user3",
        "Mike Chen",
        "mike@example.com",
        "San Francisco, CA",
        "https://cdn.pixabay.com/photo/2016/11/21/12/42/beard-1845166_960_720.jpg",
        4.7,
        28,
        (2025, 1, 20),
    ),
];

/// The built-in demo accounts. All share the secret `password123`.
pub fn sample_users(credentials: &dyn CredentialVerifier) -> Vec<User> {
    SAMPLES
        .iter()
        .map(
            |&(id, name, email, location, avatar, rating, reviews, (y, m, d))| User {
                id: UserId::from(id),
                name: name.to_string(),
                email: email.to_string(),
                credential: credentials.hash(SAMPLE_SECRET),
                location: location.to_string(),
                avatar: avatar.to_string(),
                rating,
                reviews,
                joined_date: NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default(),
            },
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use skillswap_shared::credentials::Blake3Verifier;

    use super::*;
    use crate::kv::MemoryStore;

    #[test]
    fn test_seed_fresh_store() {
        let verifier = Blake3Verifier::new();
        let mut store = RecordStore::new(Box::new(MemoryStore::new()));
        initialize_collections(&mut store, &verifier).unwrap();

        let users: Vec<User> = store.load_all().unwrap();
        assert_eq!(users.len(), 3);
        assert!(verifier.verify("password123", &users[0].credential));
        for collection in Collection::ALL {
            assert!(store.is_initialized(collection).unwrap());
        }
    }

    #[test]
    fn test_seed_keeps_existing_users() {
        let verifier = Blake3Verifier::new();
        let mut store = RecordStore::new(Box::new(MemoryStore::new()));
        store.replace_all::<User>(&[]).unwrap();

        initialize_collections(&mut store, &verifier).unwrap();

        assert!(store.load_all::<User>().unwrap().is_empty());
    }
}
