use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use skillswap_shared::{ConversationId, UserId};

use crate::error::Result;
use crate::models::{Conversation, Message, SkillEntry, User};
use crate::records::{Record, RecordStore};

/// Full copy of every collection, suitable for writing to a JSON file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// ISO 8601 timestamp of when the snapshot was created
    pub created_at: String,
    /// App version that produced the snapshot
    pub version: String,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub skills: Vec<SkillEntry>,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub conversations: Vec<Conversation>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportStats {
    pub users_imported: usize,
    pub skills_imported: usize,
    pub messages_imported: usize,
    pub conversations_imported: usize,
}

impl RecordStore {
    /// Export all four collections.
    pub fn export_snapshot(&self) -> Result<Snapshot> {
        Ok(Snapshot {
            created_at: chrono::Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            users: self.load_all()?,
            skills: self.load_all()?,
            messages: self.load_all()?,
            conversations: self.load_all()?,
        })
    }

    /// Merge a snapshot into the store. Records whose identifier already
    /// exists are skipped, so local data always wins.
    ///
    /// Users are also skipped when their email is already taken, keeping
    /// emails unique. An incoming conversation for a pair that already has
    /// one is folded into the local conversation and its messages follow
    /// it. Skills, conversations and messages that reference a user or
    /// conversation absent after the merge are dropped.
    pub fn import_snapshot(&mut self, snapshot: &Snapshot) -> Result<ImportStats> {
        let mut stats = ImportStats::default();

        let mut users: Vec<User> = self.load_all()?;
        let mut emails: HashSet<String> = users.iter().map(|u| u.email.clone()).collect();
        let mut user_ids: HashSet<UserId> = users.iter().map(|u| u.id.clone()).collect();
        for user in &snapshot.users {
            if user_ids.contains(&user.id) || emails.contains(&user.email) {
                continue;
            }
            user_ids.insert(user.id.clone());
            emails.insert(user.email.clone());
            users.push(user.clone());
            stats.users_imported += 1;
        }
        if stats.users_imported > 0 {
            self.replace_all(&users)?;
        }

        let skills: Vec<SkillEntry> = snapshot
            .skills
            .iter()
            .filter(|s| user_ids.contains(&s.owner_id))
            .cloned()
            .collect();
        stats.skills_imported = self.merge_by_id(&skills, |s| s.id.clone())?;

        let (added, resolved) = self.merge_conversations(&snapshot.conversations, &user_ids)?;
        stats.conversations_imported = added;

        let messages: Vec<Message> = snapshot
            .messages
            .iter()
            .filter(|m| user_ids.contains(&m.sender_id) && user_ids.contains(&m.receiver_id))
            .filter_map(|m| {
                let conversation_id = resolved.get(&m.conversation_id)?.clone();
                Some(Message {
                    conversation_id,
                    ..m.clone()
                })
            })
            .collect();
        stats.messages_imported = self.merge_by_id(&messages, |m| m.id.clone())?;

        tracing::info!(
            users = stats.users_imported,
            skills = stats.skills_imported,
            conversations = stats.conversations_imported,
            messages = stats.messages_imported,
            "snapshot imported"
        );

        Ok(stats)
    }

    // Keeps one conversation per unordered pair. Returns the number added
    // and, for every known conversation id, the id it is stored under.
    fn merge_conversations(
        &mut self,
        incoming: &[Conversation],
        user_ids: &HashSet<UserId>,
    ) -> Result<(usize, HashMap<ConversationId, ConversationId>)> {
        let mut conversations: Vec<Conversation> = self.load_all()?;
        let mut resolved: HashMap<ConversationId, ConversationId> = conversations
            .iter()
            .map(|c| (c.id.clone(), c.id.clone()))
            .collect();

        let mut added = 0;
        for conversation in incoming {
            if resolved.contains_key(&conversation.id) {
                continue;
            }
            let [a, b] = &conversation.participants;
            if a == b || !user_ids.contains(a) || !user_ids.contains(b) {
                continue;
            }
            if let Some(existing) = conversations.iter().find(|c| c.is_between(a, b)) {
                resolved.insert(conversation.id.clone(), existing.id.clone());
                continue;
            }
            resolved.insert(conversation.id.clone(), conversation.id.clone());
            conversations.push(conversation.clone());
            added += 1;
        }

        if added > 0 {
            self.replace_all(&conversations)?;
        }
        Ok((added, resolved))
    }

    // INSERT OR IGNORE, keyed by `id_of`
    fn merge_by_id<R, K, F>(&mut self, incoming: &[R], id_of: F) -> Result<usize>
    where
        R: Record + Clone,
        K: Eq + Hash,
        F: Fn(&R) -> K,
    {
        let mut existing: Vec<R> = self.load_all()?;
        let mut seen: HashSet<K> = existing.iter().map(&id_of).collect();

        let mut added = 0;
        for record in incoming {
            if seen.insert(id_of(record)) {
                existing.push(record.clone());
                added += 1;
            }
        }

        if added > 0 {
            self.replace_all(&existing)?;
        }
        Ok(added)
    }
}
