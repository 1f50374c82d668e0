//! Wire types for the testskool profile endpoints.

use serde::{Deserialize, Serialize};

/// A selectable school subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: i64,
    pub name: String,
}

/// The authenticated user's profile record, as returned by `my-profile/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default)]
    pub is_student: bool,
    #[serde(default)]
    pub is_teacher: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<Vec<Subject>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
    /// Avatar path, relative to the media base URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    pub date_joined: String,
}

/// Success body of `edit-profile/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Success body of `delete-account/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// JSON body of `delete-account/`.
#[derive(Debug, Serialize)]
pub(crate) struct DeleteAccountRequest<'a> {
    pub password: &'a str,
}
