//! Session token command handlers.

use anyhow::{Context, Result};
use testskool_core::auth::{StoredTokens, TokenStorage};
use testskool_core::session::LOGGED_OUT_MESSAGE;

pub fn login(access: String, refresh: Option<String>) -> Result<()> {
    let access = access.trim().to_string();
    if access.is_empty() {
        anyhow::bail!("Access token cannot be empty");
    }

    let storage = TokenStorage::open_default();
    storage
        .save(&StoredTokens { access, refresh })
        .context("save tokens")?;
    tracing::info!(path = %storage.path().display(), "stored session tokens");
    println!("Logged in. Tokens saved to {}", storage.path().display());
    Ok(())
}

pub fn logout() -> Result<()> {
    let storage = TokenStorage::open_default();
    let removed = storage.clear().context("clear tokens")?;
    tracing::debug!(removed, "cleared stored tokens");
    println!("{LOGGED_OUT_MESSAGE}");
    Ok(())
}
