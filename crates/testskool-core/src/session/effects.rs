//! Session effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! The reducer never performs I/O itself.

use tokio_util::sync::CancellationToken;

use super::state::Route;
use crate::common::TaskId;

#[derive(Debug)]
pub enum SessionEffect {
    /// Fetch the profile with `token`; report back as `ProfileFetched { task }`.
    FetchProfile {
        task: TaskId,
        token: String,
        cancel: CancellationToken,
    },

    /// Abort a superseded or orphaned fetch.
    CancelFetch { token: CancellationToken },

    /// Remove the persisted access/refresh tokens.
    ClearPersistedTokens,

    /// Clear the in-memory access token.
    ClearAccessToken,

    Navigate(Route),
}
