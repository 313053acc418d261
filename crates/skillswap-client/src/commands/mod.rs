//! Operations exposed by the client.
//!
//! Each sub-module groups related commands by domain. Every command takes
//! the [`AppState`](crate::state::AppState) explicitly and returns
//! [`Result`](crate::error::Result).

pub mod backup;
pub mod identity;
pub mod listings;
pub mod matches;
pub mod messaging;
pub mod skills;
