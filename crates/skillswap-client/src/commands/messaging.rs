//! Two-party conversations, messages and unread counters.
//!
//! A conversation exists at most once per unordered pair of users and is
//! created lazily on first contact. Sending bumps the receiver's unread
//! counter; reading resets the reader's counter to zero.

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};

use skillswap_shared::{ConversationId, MessageId, UserId};
use skillswap_store::{Conversation, Message, User};

use crate::commands::identity::ProfileDto;
use crate::error::{ClientError, Result};
use crate::state::AppState;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    pub conversation: Conversation,
    /// `None` when the other participant's record is gone.
    pub other_user: Option<ProfileDto>,
    /// Unread messages for the viewer.
    pub unread_count: u32,
}

/// What the chat pane shows after opening a conversation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenConversation {
    pub conversation: Conversation,
    pub other_user: Option<ProfileDto>,
    pub messages: Vec<Message>,
}

/// Return the conversation between `user_a` and `user_b`, creating it if
/// none exists yet.
pub fn find_or_create_conversation(
    state: &mut AppState,
    user_a: &UserId,
    user_b: &UserId,
) -> Result<Conversation> {
    if user_a == user_b {
        return Err(ClientError::InvalidParticipant);
    }

    let mut conversations: Vec<Conversation> = state.store.load_all()?;
    if let Some(existing) = conversations.iter().find(|c| c.is_between(user_a, user_b)) {
        debug!(conversation = %existing.id, "conversation already exists");
        return Ok(existing.clone());
    }

    let conversation = Conversation::new(user_a.clone(), user_b.clone());
    conversations.push(conversation.clone());
    state.store.replace_all(&conversations)?;

    info!(
        conversation = %conversation.id,
        a = %user_a,
        b = %user_b,
        "conversation created"
    );
    Ok(conversation)
}

/// Append a message from `sender_id` and bump the receiver's unread count.
///
/// The conversation is written before the message. If the second write
/// fails the snapshot and counter may run ahead of the stored thread, but
/// the conversation still lists and opens normally.
pub fn send_message(
    state: &mut AppState,
    conversation_id: &ConversationId,
    sender_id: &UserId,
    content: &str,
) -> Result<Message> {
    let mut conversations: Vec<Conversation> = state.store.load_all()?;
    let conversation = conversations
        .iter_mut()
        .find(|c| &c.id == conversation_id)
        .ok_or_else(|| ClientError::NotFound(format!("conversation {conversation_id}")))?;

    if content.trim().is_empty() {
        return Err(ClientError::EmptyContent);
    }

    let receiver_id = conversation
        .other_participant(sender_id)
        .cloned()
        .ok_or(ClientError::InvalidSender)?;

    let message = Message {
        id: MessageId::generate(),
        conversation_id: conversation_id.clone(),
        sender_id: sender_id.clone(),
        receiver_id: receiver_id.clone(),
        content: content.to_string(),
        timestamp: Utc::now(),
    };

    conversation.last_message = message.content.clone();
    conversation.last_message_time = message.timestamp;
    *conversation.unread_count.entry(receiver_id).or_insert(0) += 1;

    let mut messages: Vec<Message> = state.store.load_all()?;
    messages.push(message.clone());

    state.store.replace_all(&conversations)?;
    state.store.replace_all(&messages)?;

    info!(
        message = %message.id,
        conversation = %conversation_id,
        sender = %sender_id,
        "message sent"
    );
    Ok(message)
}

/// Reset `user_id`'s unread counter. Unknown conversations are ignored.
pub fn mark_read(
    state: &mut AppState,
    conversation_id: &ConversationId,
    user_id: &UserId,
) -> Result<()> {
    let mut conversations: Vec<Conversation> = state.store.load_all()?;
    let Some(conversation) = conversations.iter_mut().find(|c| &c.id == conversation_id) else {
        debug!(conversation = %conversation_id, "mark_read on unknown conversation ignored");
        return Ok(());
    };

    conversation.unread_count.insert(user_id.clone(), 0);
    state.store.replace_all(&conversations)?;
    Ok(())
}

/// Messages of one conversation, oldest first. Equal timestamps keep
/// insertion order.
pub fn list_messages(state: &AppState, conversation_id: &ConversationId) -> Result<Vec<Message>> {
    let messages: Vec<Message> = state.store.load_all()?;
    Ok(sorted_thread(messages, conversation_id))
}

fn sorted_thread(messages: Vec<Message>, conversation_id: &ConversationId) -> Vec<Message> {
    let mut thread: Vec<Message> = messages
        .into_iter()
        .filter(|m| &m.conversation_id == conversation_id)
        .collect();
    thread.sort_by_key(|m| m.timestamp);
    thread
}

/// Conversations `user_id` takes part in, in stored order.
///
/// A non-empty `search_text` keeps only conversations whose other
/// participant's name or last message contains it, ignoring case.
/// Conversations with a missing other participant never match a search.
pub fn list_conversations(
    state: &AppState,
    user_id: &UserId,
    search_text: &str,
) -> Result<Vec<ConversationSummary>> {
    let conversations: Vec<Conversation> = state.store.load_all()?;
    let users: Vec<User> = state.store.load_all()?;
    let needle = search_text.to_lowercase();

    let summaries = conversations
        .into_iter()
        .filter(|c| c.involves(user_id))
        .filter_map(|conversation| {
            let other = conversation
                .other_participant(user_id)
                .and_then(|other_id| users.iter().find(|u| &u.id == other_id));

            if !needle.is_empty() {
                let name_hit = other.is_some_and(|u| u.name.to_lowercase().contains(&needle));
                let text_hit = conversation.last_message.to_lowercase().contains(&needle);
                if other.is_none() || !(name_hit || text_hit) {
                    return None;
                }
            }

            Some(ConversationSummary {
                unread_count: conversation.unread_for(user_id),
                other_user: other.map(ProfileDto::from),
                conversation,
            })
        })
        .collect();

    Ok(summaries)
}

/// Find or create the conversation with `other_user_id` and open it.
pub fn start_conversation(state: &mut AppState, other_user_id: &UserId) -> Result<OpenConversation> {
    let me = state.require_user()?.id.clone();
    let conversation = find_or_create_conversation(state, &me, other_user_id)?;
    open_conversation(state, &conversation.id)
}

/// Make `conversation_id` the open conversation, mark it read for the
/// current user and return its thread.
pub fn open_conversation(
    state: &mut AppState,
    conversation_id: &ConversationId,
) -> Result<OpenConversation> {
    let me = state.require_user()?.id.clone();

    let conversations: Vec<Conversation> = state.store.load_all()?;
    let conversation = conversations
        .into_iter()
        .find(|c| &c.id == conversation_id)
        .ok_or_else(|| ClientError::NotFound(format!("conversation {conversation_id}")))?;
    if !conversation.involves(&me) {
        return Err(ClientError::Forbidden(format!(
            "not a participant of conversation {conversation_id}"
        )));
    }

    mark_read(state, conversation_id, &me)?;
    state.session.open_conversation(conversation_id.clone());

    let users: Vec<User> = state.store.load_all()?;
    let other_user = conversation
        .other_participant(&me)
        .and_then(|other_id| users.iter().find(|u| &u.id == other_id))
        .map(ProfileDto::from);
    let messages = list_messages(state, conversation_id)?;

    let mut conversation = conversation;
    conversation.unread_count.insert(me, 0);

    Ok(OpenConversation {
        conversation,
        other_user,
        messages,
    })
}

/// Send as the current user into the open conversation.
pub fn send_to_open_conversation(state: &mut AppState, content: &str) -> Result<Message> {
    let me = state.require_user()?.id.clone();
    let conversation_id = state
        .session
        .current_conversation()
        .cloned()
        .ok_or_else(|| ClientError::NotFound("no open conversation".to_string()))?;
    send_message(state, &conversation_id, &me, content)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use skillswap_shared::constants::MESSAGES_KEY;
    use skillswap_store::{KeyValueStore, MemoryStore, RecordStore, StoreError};

    use super::*;

    // refuses every write to the messages collection
    struct MessagesReadOnly(MemoryStore);

    impl KeyValueStore for MessagesReadOnly {
        fn get(&self, key: &str) -> skillswap_store::Result<Option<String>> {
            self.0.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> skillswap_store::Result<()> {
            if key == MESSAGES_KEY {
                return Err(StoreError::Io(std::io::Error::other("disk full")));
            }
            self.0.set(key, value)
        }

        fn remove(&mut self, key: &str) -> skillswap_store::Result<()> {
            self.0.remove(key)
        }
    }

    fn user(id: &str, name: &str) -> User {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": name,
            "email": format!("{id}@x.com"),
            "password": "p",
        }))
        .unwrap()
    }

    fn state_with_users() -> AppState {
        let mut state = AppState::in_memory();
        state
            .store
            .replace_all(&[
                user("a", "Alice"),
                user("b", "Bob"),
                user("c", "Carol"),
            ])
            .unwrap();
        state
    }

    fn ids() -> (UserId, UserId, UserId) {
        (UserId::from("a"), UserId::from("b"), UserId::from("c"))
    }

    #[test]
    fn test_find_or_create_is_order_independent() {
        let mut state = state_with_users();
        let (a, b, _) = ids();

        let first = find_or_create_conversation(&mut state, &a, &b).unwrap();
        let second = find_or_create_conversation(&mut state, &b, &a).unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(state.store.load_all::<Conversation>().unwrap().len(), 1);
        assert!(first.last_message.is_empty());
        assert!(first.unread_count.is_empty());
    }

    #[test]
    fn test_self_conversation_rejected() {
        let mut state = state_with_users();
        let (a, _, _) = ids();
        assert!(matches!(
            find_or_create_conversation(&mut state, &a, &a),
            Err(ClientError::InvalidParticipant)
        ));
        assert!(state.store.load_all::<Conversation>().unwrap().is_empty());
    }

    #[test]
    fn test_send_updates_snapshot_and_unread() {
        let mut state = state_with_users();
        let (a, b, _) = ids();
        let conv = find_or_create_conversation(&mut state, &a, &b).unwrap();

        let msg = send_message(&mut state, &conv.id, &a, "hi Bob").unwrap();
        assert_eq!(msg.receiver_id, b);
        send_message(&mut state, &conv.id, &a, "are you there?").unwrap();

        let stored = &state.store.load_all::<Conversation>().unwrap()[0];
        assert_eq!(stored.unread_for(&b), 2);
        assert_eq!(stored.unread_for(&a), 0);
        assert_eq!(stored.last_message, "are you there?");
        assert!(stored.has_messages());
        assert_eq!(state.store.load_all::<Message>().unwrap().len(), 2);
    }

    #[test]
    fn test_send_writes_conversation_before_message() {
        let mut state = AppState::new(RecordStore::new(Box::new(MessagesReadOnly(
            MemoryStore::new(),
        ))));
        let (a, b, _) = ids();
        let conv = find_or_create_conversation(&mut state, &a, &b).unwrap();

        let err = send_message(&mut state, &conv.id, &a, "hi").unwrap_err();
        assert!(matches!(err, ClientError::Store(StoreError::Io(_))));

        let stored = &state.store.load_all::<Conversation>().unwrap()[0];
        assert_eq!(stored.last_message, "hi");
        assert_eq!(stored.unread_for(&b), 1);
        assert!(list_messages(&state, &conv.id).unwrap().is_empty());
    }

    #[test]
    fn test_mark_read_only_touches_reader() {
        let mut state = state_with_users();
        let (a, b, _) = ids();
        let conv = find_or_create_conversation(&mut state, &a, &b).unwrap();
        send_message(&mut state, &conv.id, &a, "one").unwrap();
        send_message(&mut state, &conv.id, &b, "two").unwrap();
        send_message(&mut state, &conv.id, &b, "three").unwrap();

        mark_read(&mut state, &conv.id, &b).unwrap();

        let stored = &state.store.load_all::<Conversation>().unwrap()[0];
        assert_eq!(stored.unread_for(&b), 0);
        assert_eq!(stored.unread_for(&a), 2);

        mark_read(&mut state, &ConversationId::from("missing"), &a).unwrap();
    }

    #[test]
    fn test_send_errors() {
        let mut state = state_with_users();
        let (a, b, c) = ids();

        let err = send_message(&mut state, &ConversationId::from("nope"), &a, "hi").unwrap_err();
        assert!(matches!(err, ClientError::NotFound(_)));
        assert!(state.store.load_all::<Message>().unwrap().is_empty());

        let conv = find_or_create_conversation(&mut state, &a, &b).unwrap();
        assert!(matches!(
            send_message(&mut state, &conv.id, &a, "   "),
            Err(ClientError::EmptyContent)
        ));
        assert!(matches!(
            send_message(&mut state, &conv.id, &c, "hi"),
            Err(ClientError::InvalidSender)
        ));
        assert!(state.store.load_all::<Message>().unwrap().is_empty());
    }

    #[test]
    fn test_list_messages_sorted_and_stable() {
        let conv = ConversationId::from("conv1");
        let base = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let msg = |id: &str, conversation: &ConversationId, offset: i64| Message {
            id: MessageId::from(id),
            conversation_id: conversation.clone(),
            sender_id: UserId::from("a"),
            receiver_id: UserId::from("b"),
            content: id.to_string(),
            timestamp: base + Duration::seconds(offset),
        };

        let mut state = AppState::in_memory();
        state
            .store
            .replace_all(&[
                msg("late", &conv, 60),
                msg("tie-1", &conv, 0),
                msg("other", &ConversationId::from("conv2"), 0),
                msg("tie-2", &conv, 0),
                msg("early", &conv, -60),
            ])
            .unwrap();

        let thread: Vec<String> = list_messages(&state, &conv)
            .unwrap()
            .into_iter()
            .map(|m| m.id.0)
            .collect();
        assert_eq!(thread, ["early", "tie-1", "tie-2", "late"]);
    }

    #[test]
    fn test_list_conversations_with_search() {
        let mut state = state_with_users();
        let (a, b, c) = ids();
        let with_bob = find_or_create_conversation(&mut state, &a, &b).unwrap();
        let with_carol = find_or_create_conversation(&mut state, &c, &a).unwrap();
        find_or_create_conversation(&mut state, &b, &c).unwrap();
        send_message(&mut state, &with_carol.id, &c, "Knitting lesson tomorrow?").unwrap();

        let all = list_conversations(&state, &a, "").unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].conversation.id, with_bob.id);
        assert_eq!(all[1].unread_count, 1);

        let by_name = list_conversations(&state, &a, "BOB").unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].other_user.as_ref().unwrap().name, "Bob");

        let by_text = list_conversations(&state, &a, "knitting").unwrap();
        assert_eq!(by_text.len(), 1);
        assert_eq!(by_text[0].conversation.id, with_carol.id);

        assert!(list_conversations(&state, &a, "zzz").unwrap().is_empty());
    }

    #[test]
    fn test_missing_other_user_hidden_from_search_only() {
        let mut state = state_with_users();
        let (a, _, _) = ids();
        let ghost = UserId::from("ghost");
        find_or_create_conversation(&mut state, &a, &ghost).unwrap();

        let all = list_conversations(&state, &a, "").unwrap();
        assert_eq!(all.len(), 1);
        assert!(all[0].other_user.is_none());

        assert!(list_conversations(&state, &a, "gho").unwrap().is_empty());
    }

    #[test]
    fn test_start_open_and_send_in_session() {
        let mut state = state_with_users();
        let (a, b, _) = ids();

        assert!(matches!(
            send_to_open_conversation(&mut state, "hi"),
            Err(ClientError::NotAuthenticated)
        ));

        state.session.begin(user("a", "Alice"));
        assert!(matches!(
            send_to_open_conversation(&mut state, "hi"),
            Err(ClientError::NotFound(_))
        ));

        let opened = start_conversation(&mut state, &b).unwrap();
        assert_eq!(opened.other_user.as_ref().unwrap().name, "Bob");
        assert!(opened.messages.is_empty());
        assert_eq!(state.session.current_conversation(), Some(&opened.conversation.id));

        send_to_open_conversation(&mut state, "hello").unwrap();

        // Bob opens it and his counter clears
        state.session.begin(user("b", "Bob"));
        let seen = open_conversation(&mut state, &opened.conversation.id).unwrap();
        assert_eq!(seen.messages.len(), 1);
        assert_eq!(seen.conversation.unread_for(&b), 0);
        let stored = &state.store.load_all::<Conversation>().unwrap()[0];
        assert_eq!(stored.unread_for(&b), 0);
        assert_eq!(stored.unread_for(&a), 0);
    }

    #[test]
    fn test_open_conversation_errors() {
        let mut state = state_with_users();
        let (a, b, _) = ids();
        let conv = find_or_create_conversation(&mut state, &a, &b).unwrap();

        state.session.begin(user("c", "Carol"));
        assert!(matches!(
            open_conversation(&mut state, &conv.id),
            Err(ClientError::Forbidden(_))
        ));
        assert!(matches!(
            open_conversation(&mut state, &ConversationId::from("nope")),
            Err(ClientError::NotFound(_))
        ));
        assert!(matches!(
            start_conversation(&mut state, &UserId::from("c")),
            Err(ClientError::InvalidParticipant)
        ));
    }
}
