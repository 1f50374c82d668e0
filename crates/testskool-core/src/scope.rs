//! Store provisioning.
//!
//! A [`Scope`] holds the stores installed by the composition root. Asking a
//! scope for a store that was never installed is an error, never a silent
//! `None`.

use thiserror::Error;

use crate::api::ApiClient;
use crate::auth::{AccessTokenStore, TokenStorage};
use crate::config::LogoutPolicy;
use crate::session::SessionRuntime;

const ACCESS_TOKEN_PROVIDER: &str = "access token provider";
const USER_SESSION_PROVIDER: &str = "user session provider";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopeError {
    #[error("{consumer} is not available: no {provider} in scope")]
    NotProvided {
        consumer: &'static str,
        provider: &'static str,
    },
}

#[derive(Default)]
pub struct Scope {
    access: Option<AccessTokenStore>,
    session: Option<SessionRuntime>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the access token store.
    pub fn provide_access_token(mut self, store: AccessTokenStore) -> Self {
        self.access = Some(store);
        self
    }

    /// Installs the user session store, bound to the scope's access token.
    ///
    /// # Errors
    /// Returns [`ScopeError::NotProvided`] if no access token store was
    /// installed first.
    pub fn provide_user_session(
        mut self,
        api: ApiClient,
        storage: TokenStorage,
        policy: LogoutPolicy,
    ) -> Result<Self, ScopeError> {
        let access = self
            .access
            .clone()
            .ok_or(ScopeError::NotProvided {
                consumer: "user session",
                provider: ACCESS_TOKEN_PROVIDER,
            })?;
        self.session = Some(SessionRuntime::new(access, api, storage, policy));
        Ok(self)
    }

    /// # Errors
    /// Returns [`ScopeError::NotProvided`] when no access token store is installed.
    pub fn access_token(&self) -> Result<&AccessTokenStore, ScopeError> {
        self.access.as_ref().ok_or(ScopeError::NotProvided {
            consumer: "access token",
            provider: ACCESS_TOKEN_PROVIDER,
        })
    }

    /// # Errors
    /// Returns [`ScopeError::NotProvided`] when no session store is installed.
    pub fn user_session(&self) -> Result<&SessionRuntime, ScopeError> {
        self.session.as_ref().ok_or(ScopeError::NotProvided {
            consumer: "user session",
            provider: USER_SESSION_PROVIDER,
        })
    }

    /// # Errors
    /// Returns [`ScopeError::NotProvided`] when no session store is installed.
    pub fn user_session_mut(&mut self) -> Result<&mut SessionRuntime, ScopeError> {
        self.session.as_mut().ok_or(ScopeError::NotProvided {
            consumer: "user session",
            provider: USER_SESSION_PROVIDER,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api() -> ApiClient {
        ApiClient::new("http://127.0.0.1:1", "/testskool")
    }

    #[test]
    fn test_empty_scope_names_missing_provider() {
        let scope = Scope::new();
        let err = scope.access_token().unwrap_err();
        assert_eq!(
            err.to_string(),
            "access token is not available: no access token provider in scope"
        );
        let err = scope.user_session().err().unwrap();
        assert!(err.to_string().contains("user session provider"));
    }

    #[test]
    fn test_session_without_access_token_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = Scope::new().provide_user_session(
            api(),
            TokenStorage::at(dir.path().join("tokens.json")),
            LogoutPolicy::default(),
        );
        let Err(err) = result else {
            panic!("expected a scope error");
        };
        assert_eq!(
            err,
            ScopeError::NotProvided {
                consumer: "user session",
                provider: ACCESS_TOKEN_PROVIDER,
            }
        );
    }

    #[test]
    fn test_full_scope_shares_token() {
        let dir = tempfile::tempdir().unwrap();
        let store = AccessTokenStore::new();
        let mut scope = Scope::new()
            .provide_access_token(store.clone())
            .provide_user_session(
                api(),
                TokenStorage::at(dir.path().join("tokens.json")),
                LogoutPolicy::default(),
            )
            .unwrap();

        store.set(Some("t".into()));
        assert_eq!(scope.access_token().unwrap().get().as_deref(), Some("t"));
        assert_eq!(
            scope.user_session_mut().unwrap().access_token().get().as_deref(),
            Some("t")
        );
    }
}
