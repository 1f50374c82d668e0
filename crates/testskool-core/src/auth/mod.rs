//! Session token handling: the in-memory store and its on-disk copies.

mod storage;
mod token;

pub use storage::{StoredTokens, TokenStorage};
pub use token::AccessTokenStore;
