//! # skillswap-shared
//!
//! Vocabulary shared by the store and client crates: identifier newtypes,
//! skill kinds and categories, constants, and credential hashing.

pub mod constants;
pub mod credentials;
pub mod error;
pub mod types;

pub use types::*;
