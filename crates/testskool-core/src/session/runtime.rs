//! Session runtime.
//!
//! Owns the [`SessionState`], feeds it events and executes the effects the
//! reducer returns. Async results arrive through an inbox channel:
//! - spawned profile fetches send `ProfileFetched` to `inbox_tx`
//! - [`SessionHandle`]s send refetch/logout requests to `inbox_tx`
//! - access token transitions arrive on their own receiver, in order

use tokio::sync::mpsc;

use super::effects::SessionEffect;
use super::events::{FetchFailure, SessionEvent};
use super::reducer::update;
use super::state::{Route, SessionState, SessionStatus};
use crate::api::{ApiClient, Profile};
use crate::auth::{AccessTokenStore, TokenStorage};
use crate::config::LogoutPolicy;

/// Cloneable handle collaborators use to poke the session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::UnboundedSender<SessionEvent>,
}

impl SessionHandle {
    /// Asks the session to reload the profile (after a successful mutation).
    pub fn request_refetch(&self) {
        let _ = self.tx.send(SessionEvent::RefetchRequested);
    }

    pub fn request_logout(&self) {
        let _ = self.tx.send(SessionEvent::LogoutRequested);
    }
}

/// The user session store.
pub struct SessionRuntime {
    state: SessionState,
    route: Route,
    access: AccessTokenStore,
    token_rx: mpsc::UnboundedReceiver<Option<String>>,
    api: ApiClient,
    storage: TokenStorage,
    inbox_tx: mpsc::UnboundedSender<SessionEvent>,
    inbox_rx: mpsc::UnboundedReceiver<SessionEvent>,
}

impl SessionRuntime {
    /// Creates the session store bound to `access`.
    ///
    /// The token value at construction time is the first transition the
    /// runtime sees, so a token that was already set starts a fetch on the
    /// first [`drain`]. Later assignments follow in the order they were made.
    ///
    /// [`drain`]: SessionRuntime::drain
    pub fn new(
        access: AccessTokenStore,
        api: ApiClient,
        storage: TokenStorage,
        policy: LogoutPolicy,
    ) -> Self {
        let token_rx = access.subscribe();
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();

        Self {
            state: SessionState::new(policy),
            route: Route::MyProfile,
            access,
            token_rx,
            api,
            storage,
            inbox_tx,
            inbox_rx,
        }
    }

    pub fn handle(&self) -> SessionHandle {
        SessionHandle {
            tx: self.inbox_tx.clone(),
        }
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.state.profile()
    }

    pub fn message(&self) -> &str {
        self.state.message()
    }

    pub fn status(&self) -> SessionStatus {
        self.state.status()
    }

    pub fn needs_refetch(&self) -> bool {
        self.state.needs_refetch()
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn access_token(&self) -> &AccessTokenStore {
        &self.access
    }

    /// Runs one event through the reducer and executes its effects.
    pub fn dispatch(&mut self, event: SessionEvent) {
        let effects = update(&mut self.state, event);
        for effect in effects {
            self.execute(effect);
        }
    }

    /// Processes every event that is already pending, without waiting.
    ///
    /// Must be called from within a tokio runtime, since fetches are spawned.
    pub fn drain(&mut self) {
        loop {
            if let Ok(token) = self.token_rx.try_recv() {
                self.dispatch(SessionEvent::TokenChanged(token));
                continue;
            }
            match self.inbox_rx.try_recv() {
                Ok(event) => self.dispatch(event),
                Err(_) => break,
            }
        }
    }

    /// Processes events until no profile fetch is in flight.
    pub async fn settle(&mut self) {
        loop {
            self.drain();
            if !self.state.is_fetching() {
                break;
            }

            tokio::select! {
                Some(event) = self.inbox_rx.recv() => self.dispatch(event),
                Some(token) = self.token_rx.recv() => {
                    self.dispatch(SessionEvent::TokenChanged(token));
                }
                else => break,
            }
        }
    }

    fn execute(&mut self, effect: SessionEffect) {
        match effect {
            SessionEffect::FetchProfile {
                task,
                token,
                cancel,
            } => {
                let api = self.api.clone();
                let tx = self.inbox_tx.clone();
                tokio::spawn(async move {
                    let result = tokio::select! {
                        () = cancel.cancelled() => {
                            tracing::debug!(?task, "profile fetch cancelled");
                            return;
                        }
                        result = api.my_profile(&token) => result,
                    };
                    let result = result.map_err(|err| {
                        tracing::warn!(error = %err, "failed to fetch profile");
                        FetchFailure::from(&err)
                    });
                    let _ = tx.send(SessionEvent::ProfileFetched { task, result });
                });
            }
            SessionEffect::CancelFetch { token } => token.cancel(),
            SessionEffect::ClearPersistedTokens => {
                if let Err(e) = self.storage.clear() {
                    tracing::warn!(error = %format!("{e:#}"), "failed to remove stored tokens");
                }
            }
            SessionEffect::ClearAccessToken => {
                self.access.clear();
            }
            SessionEffect::Navigate(route) => {
                tracing::debug!(%route, "navigating");
                self.route = route;
            }
        }
    }
}
