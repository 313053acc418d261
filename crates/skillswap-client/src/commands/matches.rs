//! Complementary-user matching.
//!
//! For the viewer `U`, two scans run in order:
//! 1. every offering of `U` against requests of other users in the same
//!    category (`wants_to_learn`);
//! 2. every request of `U` against offerings of other users in the same
//!    category (`can_teach`).
//!
//! Each other user appears once, tagged with the first pair found, and the
//! list is cut at [`MAX_MATCHES`].

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::debug;

use skillswap_shared::constants::MAX_MATCHES;
use skillswap_shared::{MatchType, SkillKind, UserId};
use skillswap_store::{SkillEntry, User};

use crate::commands::identity::ProfileDto;
use crate::commands::skills::owned_by;
use crate::error::Result;
use crate::state::AppState;

/// A derived pairing between the viewer and another user. Not persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub user: ProfileDto,
    pub offer: SkillEntry,
    pub request: SkillEntry,
    pub match_type: MatchType,
}

/// Compute matches for `viewer` over full collections.
///
/// Candidates whose user record is missing are skipped before
/// deduplication. An empty result means "no matches yet", not an error.
pub fn compute_matches(viewer: &UserId, skills: &[SkillEntry], users: &[User]) -> Vec<Match> {
    let users_by_id: HashMap<&UserId, &User> = users.iter().map(|u| (&u.id, u)).collect();

    let wants_to_learn = owned_by(skills, viewer, SkillKind::Offering).flat_map(|offer| {
        counterparts(skills, viewer, offer)
            .map(move |request| (offer, request, MatchType::WantsToLearn, &request.owner_id))
    });
    let can_teach = owned_by(skills, viewer, SkillKind::Requesting).flat_map(|request| {
        counterparts(skills, viewer, request)
            .map(move |offer| (offer, request, MatchType::CanTeach, &offer.owner_id))
    });

    let mut seen: HashSet<&UserId> = HashSet::new();
    wants_to_learn
        .chain(can_teach)
        .filter_map(|(offer, request, match_type, other_id)| {
            let user = users_by_id.get(other_id)?;
            Some((offer, request, match_type, *user))
        })
        .filter(|&(_, _, _, user)| seen.insert(&user.id))
        .take(MAX_MATCHES)
        .map(|(offer, request, match_type, user)| Match {
            user: ProfileDto::from(user),
            offer: offer.clone(),
            request: request.clone(),
            match_type,
        })
        .collect()
}

// entries of the opposite kind, same category, owned by someone else
fn counterparts<'a>(
    skills: &'a [SkillEntry],
    viewer: &'a UserId,
    entry: &'a SkillEntry,
) -> impl Iterator<Item = &'a SkillEntry> + 'a {
    let wanted = entry.kind.opposite();
    skills.iter().filter(move |s| {
        s.kind == wanted && s.category == entry.category && !s.is_owned_by(viewer)
    })
}

/// Matches for the logged-in user.
pub fn find_matches(state: &AppState) -> Result<Vec<Match>> {
    let viewer = state.require_user()?.id.clone();
    let skills: Vec<SkillEntry> = state.store.load_all()?;
    let users: Vec<User> = state.store.load_all()?;

    let matches = compute_matches(&viewer, &skills, &users);
    debug!(user = %viewer, count = matches.len(), "matches computed");
    Ok(matches)
}
