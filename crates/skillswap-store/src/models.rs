//! Domain records persisted by the store.
//!
//! Field names are serialized in camelCase and every field that older
//! records may lack carries a serde default, so collections written by an
//! earlier version still load.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use skillswap_shared::constants::DEFAULT_AVATAR_URL;
use skillswap_shared::{Category, ConversationId, MessageId, SkillId, SkillKind, UserId};

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// A registered account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    /// Unique across all users, compared case-sensitively.
    pub email: String,
    /// Stored credential (hashed, or plaintext in legacy records).
    #[serde(rename = "password")]
    pub credential: String,
    #[serde(default)]
    pub location: String,
    #[serde(default = "default_avatar")]
    pub avatar: String,
    /// 0.0 to 5.0
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub reviews: u32,
    #[serde(default = "today")]
    pub joined_date: NaiveDate,
}

// ---------------------------------------------------------------------------
// SkillEntry
// ---------------------------------------------------------------------------

/// A skill someone offers to teach or asks to learn.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SkillEntry {
    pub id: SkillId,
    #[serde(rename = "userId")]
    pub owner_id: UserId,
    pub title: String,
    pub category: Category,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(rename = "type")]
    pub kind: SkillKind,
    /// Written as `YYYY-MM-DD`; a full RFC 3339 timestamp is also read.
    #[serde(default = "today", deserialize_with = "date_or_timestamp")]
    pub created_at: NaiveDate,
    /// Only meaningful for offerings; requests carry `None`.
    #[serde(default)]
    pub rating: Option<f64>,
}

impl SkillEntry {
    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.owner_id == user_id
    }

    /// Rating used for ordering, with a missing rating counted as zero.
    pub fn rating_or_zero(&self) -> f64 {
        self.rating.unwrap_or(0.0)
    }
}

// ---------------------------------------------------------------------------
// Conversation
// ---------------------------------------------------------------------------

/// The container for every message exchanged between two users.
///
/// At most one conversation exists per unordered participant pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: ConversationId,
    pub participants: [UserId; 2],
    #[serde(default)]
    pub last_message: String,
    pub last_message_time: DateTime<Utc>,
    /// Unread messages per recipient. Missing entries count as zero.
    #[serde(default)]
    pub unread_count: BTreeMap<UserId, u32>,
}

impl Conversation {
    pub fn new(a: UserId, b: UserId) -> Self {
        Self {
            id: ConversationId::generate(),
            participants: [a, b],
            last_message: String::new(),
            last_message_time: Utc::now(),
            unread_count: BTreeMap::new(),
        }
    }

    pub fn involves(&self, user_id: &UserId) -> bool {
        self.participants.contains(user_id)
    }

    /// True when the participants are `{a, b}` in either order.
    pub fn is_between(&self, a: &UserId, b: &UserId) -> bool {
        let [p, q] = &self.participants;
        (p == a && q == b) || (p == b && q == a)
    }

    /// The participant that is not `user_id`, if `user_id` takes part.
    pub fn other_participant(&self, user_id: &UserId) -> Option<&UserId> {
        let [p, q] = &self.participants;
        if p == user_id {
            Some(q)
        } else if q == user_id {
            Some(p)
        } else {
            None
        }
    }

    pub fn unread_for(&self, user_id: &UserId) -> u32 {
        self.unread_count.get(user_id).copied().unwrap_or(0)
    }

    pub fn has_messages(&self) -> bool {
        !self.last_message.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// A single chat message. Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    pub conversation_id: ConversationId,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn default_avatar() -> String {
    DEFAULT_AVATAR_URL.to_string()
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn date_or_timestamp<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(date) = NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(&raw)
        .map(|ts| ts.with_timezone(&Utc).date_naive())
        .map_err(serde::de::Error::custom)
}
