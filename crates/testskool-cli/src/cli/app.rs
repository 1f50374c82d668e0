//! Composition root: builds the stores and the API client for one command.

use anyhow::{Context, Result, bail};
use testskool_core::api::{ApiClient, FieldErrors, Profile};
use testskool_core::auth::{AccessTokenStore, TokenStorage};
use testskool_core::config::Config;
use testskool_core::forms::SubmitOutcome;
use testskool_core::scope::Scope;
use testskool_core::session::{SessionRuntime, SessionStatus};

const NOT_LOGGED_IN: &str = "Not logged in. Run `testskool login --access <TOKEN>` first.";

pub struct App {
    pub api: ApiClient,
    pub media_url: String,
    scope: Scope,
}

impl App {
    /// Wires the stores together and seeds the access token from storage.
    pub fn load(config: &Config) -> Result<Self> {
        let api = ApiClient::from_config(config)?;
        let media_url = config.effective_media_url()?;

        let storage = TokenStorage::open_default();
        let access = AccessTokenStore::new();
        if let Some(tokens) = storage.load()? {
            access.set(Some(tokens.access));
        }

        let scope = Scope::new()
            .provide_access_token(access)
            .provide_user_session(api.clone(), storage, config.logout_on)?;

        Ok(Self {
            api,
            media_url,
            scope,
        })
    }

    pub fn access(&self) -> Result<AccessTokenStore> {
        Ok(self.scope.access_token()?.clone())
    }

    pub fn session(&mut self) -> Result<&mut SessionRuntime> {
        Ok(self.scope.user_session_mut()?)
    }

    /// Runs the session until the profile is loaded.
    ///
    /// Fails with the session's status message when the session ends
    /// without a profile.
    pub async fn authenticate(&mut self) -> Result<Profile> {
        let session = self.session()?;
        if !session.access_token().is_set() {
            bail!(NOT_LOGGED_IN);
        }

        session.settle().await;
        match session.status() {
            SessionStatus::Authenticated => session
                .profile()
                .cloned()
                .context("session has no profile"),
            status => {
                tracing::debug!(?status, "session ended without a profile");
                let message = session.message();
                if message.is_empty() {
                    bail!(NOT_LOGGED_IN);
                }
                bail!("{message}")
            }
        }
    }

    /// Current bearer token.
    pub fn token(&self) -> Result<String> {
        self.access()?.get().context(NOT_LOGGED_IN)
    }
}

/// Turns a submit outcome into the success message (`saved` when the server
/// sent none), or an error listing what went wrong. `None` means nothing was
/// sent.
pub fn outcome_message(outcome: SubmitOutcome, saved: &str) -> Result<Option<String>> {
    match outcome {
        SubmitOutcome::Saved(message) if message.is_empty() => Ok(Some(saved.to_string())),
        SubmitOutcome::Saved(message) => Ok(Some(message)),
        SubmitOutcome::Skipped => Ok(None),
        SubmitOutcome::Invalid(fields) | SubmitOutcome::Rejected(fields) => {
            bail!("{}", describe_fields(&fields))
        }
        SubmitOutcome::Failed(message) => bail!("{message}"),
    }
}

fn describe_fields(fields: &FieldErrors) -> String {
    fields
        .iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect::<Vec<_>>()
        .join("\n")
}
