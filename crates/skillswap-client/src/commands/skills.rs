//! Skill offerings and requests owned by the current user.

use chrono::Utc;
use tracing::{debug, info};

use skillswap_shared::{Category, SkillId, SkillKind, UserId};
use skillswap_store::SkillEntry;

use crate::error::{ClientError, Result};
use crate::state::AppState;

/// Entries of `kind` owned by `user_id`, in stored order.
///
/// The iterator is lazy and `Clone`, so a caller can walk it more than once.
pub fn owned_by<'a>(
    skills: &'a [SkillEntry],
    user_id: &'a UserId,
    kind: SkillKind,
) -> impl Iterator<Item = &'a SkillEntry> + Clone + 'a {
    skills
        .iter()
        .filter(move |s| s.is_owned_by(user_id) && s.kind == kind)
}

/// Publish something the current user can teach.
pub fn add_skill(
    state: &mut AppState,
    title: &str,
    category: Category,
    description: &str,
    location: &str,
) -> Result<SkillEntry> {
    let owner_id = state.require_user()?.id.clone();
    let entry = SkillEntry {
        id: SkillId::generate(),
        owner_id,
        title: title.to_string(),
        category,
        description: description.to_string(),
        location: location.to_string(),
        kind: SkillKind::Offering,
        created_at: Utc::now().date_naive(),
        rating: Some(0.0),
    };
    append(state, entry)
}

/// Publish something the current user wants to learn. The entry takes the
/// user's stored location.
pub fn add_request(
    state: &mut AppState,
    title: &str,
    category: Category,
    description: &str,
) -> Result<SkillEntry> {
    let user = state.require_user()?;
    let entry = SkillEntry {
        id: SkillId::generate(),
        owner_id: user.id.clone(),
        title: title.to_string(),
        category,
        description: description.to_string(),
        location: user.location.clone(),
        kind: SkillKind::Requesting,
        created_at: Utc::now().date_naive(),
        rating: None,
    };
    append(state, entry)
}

fn append(state: &mut AppState, entry: SkillEntry) -> Result<SkillEntry> {
    let mut skills: Vec<SkillEntry> = state.store.load_all()?;
    skills.push(entry.clone());
    state.store.replace_all(&skills)?;

    info!(
        skill = %entry.id,
        owner = %entry.owner_id,
        kind = %entry.kind,
        category = %entry.category,
        "skill entry added"
    );
    Ok(entry)
}

/// Remove one of the current user's entries.
///
/// Unknown ids are a silent no-op. Entries owned by someone else are
/// refused with [`ClientError::Forbidden`].
pub fn delete_skill(state: &mut AppState, skill_id: &SkillId) -> Result<()> {
    let user_id = state.require_user()?.id.clone();

    let mut skills: Vec<SkillEntry> = state.store.load_all()?;
    let Some(idx) = skills.iter().position(|s| &s.id == skill_id) else {
        debug!(skill = %skill_id, "delete of unknown skill ignored");
        return Ok(());
    };

    if !skills[idx].is_owned_by(&user_id) {
        return Err(ClientError::Forbidden(format!(
            "skill {skill_id} belongs to another user"
        )));
    }

    skills.remove(idx);
    state.store.replace_all(&skills)?;

    info!(skill = %skill_id, "skill entry deleted");
    Ok(())
}

/// Entries of `kind` owned by `user_id`, in insertion order.
pub fn list_owned_skills(
    state: &AppState,
    user_id: &UserId,
    kind: SkillKind,
) -> Result<Vec<SkillEntry>> {
    let skills: Vec<SkillEntry> = state.store.load_all()?;
    Ok(owned_by(&skills, user_id, kind).cloned().collect())
}
