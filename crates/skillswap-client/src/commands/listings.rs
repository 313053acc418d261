//! Browsable catalog of every skill entry, filtered, sorted and joined with
//! its owner.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use skillswap_shared::{Category, SkillKind, UserId};
use skillswap_store::{SkillEntry, User};

use crate::commands::identity::ProfileDto;
use crate::error::{ClientError, Result};
use crate::state::AppState;

/// Listing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    /// Creation date, most recent first.
    Newest,
    /// Rating, highest first; unrated counts as zero.
    Rating,
    /// Title, alphabetical.
    Name,
}

impl SortBy {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "newest" => Some(Self::Newest),
            "rating" => Some(Self::Rating),
            "name" => Some(Self::Name),
            _ => None,
        }
    }
}

/// Filter configuration for [`browse_listings`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingQuery {
    /// Exact category; `None` keeps every category.
    pub category: Option<Category>,
    /// Entry kind; `None` keeps both.
    pub kind: Option<SkillKind>,
    /// `None` keeps stored order.
    pub sort_by: Option<SortBy>,
}

impl ListingQuery {
    /// Build a query from raw form values.
    ///
    /// An empty `category` means any category, `kind` is `all`, `offering`
    /// or `requesting`, and an unrecognised `sort_by` keeps stored order.
    pub fn from_params(category: &str, kind: &str, sort_by: &str) -> Result<Self> {
        let category = (!category.is_empty()).then(|| Category::from(category));
        let kind = match kind {
            "" | "all" => None,
            other => Some(SkillKind::parse(other).ok_or_else(|| {
                ClientError::Validation(format!("unknown listing type `{other}`"))
            })?),
        };
        let parsed = SortBy::parse(sort_by);
        if parsed.is_none() && !sort_by.is_empty() {
            debug!(sort_by, "unrecognised sort order, keeping stored order");
        }

        Ok(Self {
            category,
            kind,
            sort_by: parsed,
        })
    }
}

/// One row of the catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub skill: SkillEntry,
    pub owner: ProfileDto,
    pub category_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingPage {
    pub listings: Vec<Listing>,
    pub count: usize,
}

/// Filter, sort and join full collections.
///
/// Entries whose owner is missing are dropped after sorting.
pub fn filter_and_sort(skills: &[SkillEntry], users: &[User], query: &ListingQuery) -> ListingPage {
    let mut selected: Vec<&SkillEntry> = skills
        .iter()
        .filter(|s| query.category.as_ref().map_or(true, |c| &s.category == c))
        .filter(|s| query.kind.map_or(true, |k| s.kind == k))
        .collect();

    // slice::sort_by is stable, ties keep stored order
    match query.sort_by {
        Some(SortBy::Newest) => selected.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        Some(SortBy::Rating) => {
            selected.sort_by(|a, b| b.rating_or_zero().total_cmp(&a.rating_or_zero()))
        }
        Some(SortBy::Name) => selected.sort_by(|a, b| collate(&a.title, &b.title)),
        None => {}
    }

    let owners: HashMap<&UserId, &User> = users.iter().map(|u| (&u.id, u)).collect();
    let listings: Vec<Listing> = selected
        .into_iter()
        .filter_map(|skill| {
            let Some(owner) = owners.get(&skill.owner_id) else {
                warn!(skill = %skill.id, owner = %skill.owner_id, "listing owner missing, dropped");
                return None;
            };
            Some(Listing {
                skill: skill.clone(),
                owner: ProfileDto::from(*owner),
                category_label: skill.category.display_name().to_string(),
            })
        })
        .collect();

    ListingPage {
        count: listings.len(),
        listings,
    }
}

/// Case-insensitive title order; on a tie lowercase sorts before uppercase.
pub fn collate(a: &str, b: &str) -> Ordering {
    let primary = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));

    primary.then_with(|| {
        a.chars()
            .zip(b.chars())
            .find(|(x, y)| x != y)
            .map(|(x, y)| match (x.is_lowercase(), y.is_lowercase()) {
                (true, false) => Ordering::Less,
                (false, true) => Ordering::Greater,
                _ => x.cmp(&y),
            })
            .unwrap_or_else(|| a.len().cmp(&b.len()))
    })
}

/// The catalog view. Does not require a session.
pub fn browse_listings(state: &AppState, query: &ListingQuery) -> Result<ListingPage> {
    let skills: Vec<SkillEntry> = state.store.load_all()?;
    let users: Vec<User> = state.store.load_all()?;

    let page = filter_and_sort(&skills, &users, query);
    debug!(count = page.count, "listings computed");
    Ok(page)
}
