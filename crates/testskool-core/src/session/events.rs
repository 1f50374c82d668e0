use crate::api::{ApiError, Profile};
use crate::common::TaskId;

/// Events the session reducer reacts to.
#[derive(Debug)]
pub enum SessionEvent {
    /// The access token was assigned (or cleared).
    TokenChanged(Option<String>),

    /// A mutation happened elsewhere; reload the profile.
    RefetchRequested,

    /// End the session unconditionally.
    LogoutRequested,

    /// A profile fetch finished.
    ProfileFetched {
        task: TaskId,
        result: Result<Profile, FetchFailure>,
    },
}

/// Why a profile fetch failed, reduced to what the reducer needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    /// HTTP status, if the server answered at all.
    pub status: Option<u16>,
    pub message: String,
}

impl From<&ApiError> for FetchFailure {
    fn from(err: &ApiError) -> Self {
        Self {
            status: err.status(),
            message: err.to_string(),
        }
    }
}
