//! Signup, login, logout and profile edits.

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};

use skillswap_shared::UserId;
use skillswap_store::User;

use crate::error::{ClientError, Result};
use crate::state::AppState;

/// Public view of a user. Never carries the credential.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDto {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub location: String,
    pub avatar: String,
    pub rating: f64,
    pub reviews: u32,
    pub joined_date: String,
}

impl From<&User> for ProfileDto {
    fn from(u: &User) -> Self {
        Self {
            id: u.id.clone(),
            name: u.name.clone(),
            email: u.email.clone(),
            location: u.location.clone(),
            avatar: u.avatar.clone(),
            rating: u.rating,
            reviews: u.reviews,
            joined_date: u.joined_date.to_string(),
        }
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ClientError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

/// Register a new account and log it in.
pub fn sign_up(
    state: &mut AppState,
    name: &str,
    email: &str,
    secret: &str,
    location: &str,
) -> Result<ProfileDto> {
    require_non_empty("name", name)?;
    require_non_empty("email", email)?;
    require_non_empty("password", secret)?;

    let mut users: Vec<User> = state.store.load_all()?;
    if users.iter().any(|u| u.email == email) {
        debug!(email, "signup rejected, email taken");
        return Err(ClientError::DuplicateEmail);
    }

    let user = User {
        id: UserId::generate(),
        name: name.to_string(),
        email: email.to_string(),
        credential: state.credentials.hash(secret),
        location: location.to_string(),
        avatar: state.default_avatar.clone(),
        rating: 0.0,
        reviews: 0,
        joined_date: Utc::now().date_naive(),
    };

    users.push(user.clone());
    state.store.replace_all(&users)?;
    state.store.save_current_user(&user)?;

    info!(user = %user.id, "account created");

    let dto = ProfileDto::from(&user);
    state.session.begin(user);
    Ok(dto)
}

/// Log in with email and secret.
///
/// A user still holding a plaintext credential has it replaced by a hash on
/// success.
pub fn log_in(state: &mut AppState, email: &str, secret: &str) -> Result<ProfileDto> {
    let mut users: Vec<User> = state.store.load_all()?;

    let idx = users
        .iter()
        .position(|u| u.email == email && state.credentials.verify(secret, &u.credential))
        .ok_or(ClientError::InvalidCredentials)?;

    if state.credentials.needs_rehash(&users[idx].credential) {
        users[idx].credential = state.credentials.hash(secret);
        state.store.replace_all(&users)?;
        info!(user = %users[idx].id, "upgraded legacy credential");
    }

    let user = users.swap_remove(idx);
    state.store.save_current_user(&user)?;

    info!(user = %user.id, "logged in");

    let dto = ProfileDto::from(&user);
    state.session.begin(user);
    Ok(dto)
}

/// End the session and forget the remembered user.
pub fn log_out(state: &mut AppState) -> Result<()> {
    if let Some(id) = state.session.current_user_id() {
        info!(user = %id, "logged out");
    }
    state.session.end();
    state.store.clear_current_user()?;
    Ok(())
}

/// Re-establish the remembered user at startup, without checking
/// credentials again.
pub fn restore_session(state: &mut AppState) -> Result<Option<ProfileDto>> {
    let Some(user) = state.store.load_current_user()? else {
        debug!("no remembered user");
        return Ok(None);
    };

    info!(user = %user.id, "session restored");

    let dto = ProfileDto::from(&user);
    state.session.begin(user);
    Ok(Some(dto))
}

/// Edit the current user's name, location and avatar.
///
/// An empty `avatar` keeps the current one.
pub fn update_profile(
    state: &mut AppState,
    name: &str,
    location: &str,
    avatar: &str,
) -> Result<ProfileDto> {
    let user_id = state.require_user()?.id.clone();

    let name = name.trim();
    let location = location.trim();
    require_non_empty("name", name)?;
    require_non_empty("location", location)?;

    let mut users: Vec<User> = state.store.load_all()?;
    let user = users
        .iter_mut()
        .find(|u| u.id == user_id)
        .ok_or_else(|| ClientError::NotFound(format!("user {user_id}")))?;

    user.name = name.to_string();
    user.location = location.to_string();
    let avatar = avatar.trim();
    if !avatar.is_empty() {
        user.avatar = avatar.to_string();
    }
    let updated = user.clone();

    state.store.replace_all(&users)?;
    state.store.save_current_user(&updated)?;

    info!(user = %updated.id, "profile updated");

    let dto = ProfileDto::from(&updated);
    state.session.refresh_user(updated);
    Ok(dto)
}
