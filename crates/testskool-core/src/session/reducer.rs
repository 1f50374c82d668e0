//! Session reducer.
//!
//! All session state mutations happen here. The runtime calls
//! `update(state, event)` and executes the returned effects.

use tokio_util::sync::CancellationToken;

use super::effects::SessionEffect;
use super::events::{FetchFailure, SessionEvent};
use super::state::{LOGGED_OUT_MESSAGE, Route, SessionState};
use crate::api::Profile;

pub fn update(state: &mut SessionState, event: SessionEvent) -> Vec<SessionEffect> {
    match event {
        SessionEvent::TokenChanged(token) => {
            if state.token == token {
                return vec![];
            }
            state.token = token;
            state.fetch_failed = false;
            reconcile(state)
        }
        SessionEvent::RefetchRequested => {
            state.refresh = true;
            state.fetch_failed = false;
            reconcile(state)
        }
        SessionEvent::LogoutRequested => logout(state, true),
        SessionEvent::ProfileFetched { task, result } => {
            if !state.fetch.finish_if_active(task) {
                tracing::debug!(?task, "ignoring superseded profile fetch");
                return vec![];
            }
            handle_fetch_result(state, result)
        }
    }
}

/// Brings effects in line with the current token/profile/refetch values.
fn reconcile(state: &mut SessionState) -> Vec<SessionEffect> {
    let mut effects = Vec::new();

    let Some(token) = state.token.clone() else {
        if state.profile.is_some() {
            // the store is already empty, and may hold a newer token by now
            return logout(state, false);
        }
        // token went away before the profile arrived
        if let Some(cancel) = state.fetch.take() {
            effects.push(SessionEffect::CancelFetch { token: cancel });
        }
        return effects;
    };

    let wants_fetch = state.refresh || (state.profile.is_none() && !state.fetch_failed);
    if !wants_fetch {
        return effects;
    }

    let task = state.tasks.next_id();
    let cancel = CancellationToken::new();
    if let Some(previous) = state.fetch.start(task, cancel.clone()) {
        effects.push(SessionEffect::CancelFetch { token: previous });
    }
    state.message.clear();
    tracing::debug!(?task, "starting profile fetch");
    effects.push(SessionEffect::FetchProfile {
        task,
        token,
        cancel,
    });
    effects
}

fn handle_fetch_result(
    state: &mut SessionState,
    result: Result<Profile, FetchFailure>,
) -> Vec<SessionEffect> {
    state.refresh = false;
    match result {
        Ok(profile) => {
            tracing::debug!(user = %profile.username, "profile loaded");
            state.profile = Some(profile);
            state.fetch_failed = false;
            vec![]
        }
        Err(failure) if state.policy.should_logout(failure.status) => {
            tracing::warn!(status = ?failure.status, "profile fetch failed, logging out");
            logout(state, true)
        }
        Err(failure) => {
            tracing::warn!(status = ?failure.status, "profile fetch failed, keeping session");
            state.fetch_failed = true;
            state.message = failure.message;
            vec![]
        }
    }
}

/// The logout procedure. Safe to run more than once.
///
/// `clear_access` is false when the logout was caused by the token store
/// itself becoming empty.
fn logout(state: &mut SessionState, clear_access: bool) -> Vec<SessionEffect> {
    let mut effects = Vec::new();
    if let Some(cancel) = state.fetch.take() {
        effects.push(SessionEffect::CancelFetch { token: cancel });
    }

    state.token = None;
    state.profile = None;
    state.fetch_failed = false;
    state.message = LOGGED_OUT_MESSAGE.to_string();
    tracing::info!("session logged out");

    effects.push(SessionEffect::ClearPersistedTokens);
    if clear_access {
        effects.push(SessionEffect::ClearAccessToken);
    }
    effects.push(SessionEffect::Navigate(Route::Landing));
    effects
}
