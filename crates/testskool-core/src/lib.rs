//! Core testskool library (session, API client, forms, config).

pub mod api;
pub mod auth;
pub mod common;
pub mod config;
pub mod forms;
pub mod scope;
pub mod session;
pub mod view;
