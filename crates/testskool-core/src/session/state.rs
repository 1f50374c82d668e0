use std::fmt;

use crate::api::Profile;
use crate::common::{TaskSeq, TaskState};
use crate::config::LogoutPolicy;

/// Status message shown after the session ends.
pub const LOGGED_OUT_MESSAGE: &str = "Logged out";

/// Application routes the session can navigate to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Entry route, where logged-out users land.
    Landing,
    MyProfile,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Landing => "/",
            Route::MyProfile => "/my-profile",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Logical session status, derived from the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// No token.
    Unauthenticated,
    /// Token present, profile fetch in flight or pending.
    Loading,
    /// Token present, profile loaded.
    Authenticated,
    /// Token present but the last fetch failed without ending the session.
    /// Only reachable with [`LogoutPolicy::AuthError`].
    Failed,
}

/// Session store state. Mutated only by [`super::update`].
#[derive(Debug)]
pub struct SessionState {
    pub(super) token: Option<String>,
    pub(super) profile: Option<Profile>,
    pub(super) message: String,
    pub(super) refresh: bool,
    /// Set when a fetch failed and the policy kept the session; suppresses the
    /// automatic fetch until the token changes or a refetch is requested.
    pub(super) fetch_failed: bool,
    pub(super) fetch: TaskState,
    pub(super) tasks: TaskSeq,
    pub(super) policy: LogoutPolicy,
}

impl SessionState {
    pub fn new(policy: LogoutPolicy) -> Self {
        Self {
            token: None,
            profile: None,
            message: String::new(),
            refresh: true,
            fetch_failed: false,
            fetch: TaskState::default(),
            tasks: TaskSeq::default(),
            policy,
        }
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn needs_refetch(&self) -> bool {
        self.refresh
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub fn is_fetching(&self) -> bool {
        self.fetch.is_running()
    }

    pub fn policy(&self) -> LogoutPolicy {
        self.policy
    }

    pub fn status(&self) -> SessionStatus {
        if self.token.is_none() {
            return SessionStatus::Unauthenticated;
        }
        if self.fetch.is_running() {
            return SessionStatus::Loading;
        }
        match (&self.profile, self.fetch_failed) {
            (Some(_), _) if !self.refresh || self.fetch_failed => SessionStatus::Authenticated,
            (None, true) => SessionStatus::Failed,
            _ => SessionStatus::Loading,
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(LogoutPolicy::default())
    }
}
