//! CLI command handlers.

pub mod account;
pub mod auth;
pub mod config;
pub mod profile;
