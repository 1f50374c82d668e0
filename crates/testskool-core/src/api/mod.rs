//! REST client for the testskool backend.

mod errors;
mod types;

use anyhow::Result;
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Response, header};
use serde::de::DeserializeOwned;

pub use errors::{ApiError, FieldErrors};
pub use types::{MessageResponse, Profile, StatusResponse, Subject};
use types::DeleteAccountRequest;

use crate::config::Config;

/// Standard User-Agent header for testskool API requests.
pub const USER_AGENT: &str = concat!("testskool/", env!("CARGO_PKG_VERSION"));

/// Endpoint paths, relative to the configured API prefix.
pub mod endpoints {
    // GET
    pub const SUBJECT_LIST: &str = "/subject-list/";
    pub const MY_PROFILE: &str = "/my-profile/";

    // POST (token refresh is not scheduled anywhere)
    pub const TOKEN_REFRESH: &str = "/api/token/refresh/";

    // PUT
    pub const EDIT_PROFILE: &str = "/edit-profile/";

    // DELETE
    pub const DELETE_ACCOUNT: &str = "/delete-account/";
}

/// One part of a multipart `edit-profile/` submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MultipartField {
    Text {
        name: &'static str,
        value: String,
    },
    File {
        name: &'static str,
        file_name: String,
        mime: &'static str,
        bytes: Vec<u8>,
    },
}

impl MultipartField {
    pub fn text(name: &'static str, value: impl Into<String>) -> Self {
        MultipartField::Text {
            name,
            value: value.into(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MultipartField::Text { name, .. } | MultipartField::File { name, .. } => name,
        }
    }
}

/// testskool API client.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    prefix: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str, prefix: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            prefix: prefix.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// Builds a client from the effective config (env overrides applied).
    ///
    /// # Errors
    /// Returns an error if the configured base URL is invalid.
    pub fn from_config(config: &Config) -> Result<Self> {
        let base_url = config.effective_api_url()?;
        Ok(Self::new(&base_url, &config.api_prefix))
    }

    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{}{}", self.base_url, self.prefix, endpoint)
    }

    fn authorized(&self, builder: RequestBuilder, token: &str) -> RequestBuilder {
        builder
            .header(header::USER_AGENT, USER_AGENT)
            .bearer_auth(token)
    }

    /// Fetches the authenticated user's profile.
    ///
    /// # Errors
    /// Any non-success status, network failure or malformed body.
    pub async fn my_profile(&self, token: &str) -> Result<Profile, ApiError> {
        let url = self.url(endpoints::MY_PROFILE);
        tracing::debug!(%url, "fetching profile");
        let response = self
            .authorized(self.http.get(&url), token)
            .send()
            .await
            .map_err(ApiError::Network)?;
        read_json(response).await
    }

    /// Lists the subjects a teacher can pick.
    ///
    /// # Errors
    /// Any non-success status, network failure or malformed body.
    pub async fn subject_list(&self, token: &str) -> Result<Vec<Subject>, ApiError> {
        let url = self.url(endpoints::SUBJECT_LIST);
        tracing::debug!(%url, "fetching subjects");
        let response = self
            .authorized(self.http.get(&url), token)
            .send()
            .await
            .map_err(ApiError::Network)?;
        read_json(response).await
    }

    /// Submits profile edits or a password change as multipart form data.
    ///
    /// # Errors
    /// Field-level rejections come back as [`ApiError::Status`] with
    /// `fields` populated.
    pub async fn edit_profile(
        &self,
        token: &str,
        fields: Vec<MultipartField>,
    ) -> Result<StatusResponse, ApiError> {
        let url = self.url(endpoints::EDIT_PROFILE);
        tracing::debug!(%url, parts = fields.len(), "submitting profile update");
        let form = build_form(fields)?;
        let response = self
            .authorized(self.http.put(&url), token)
            .multipart(form)
            .send()
            .await
            .map_err(ApiError::Network)?;
        read_json_or_default(response).await
    }

    /// Deletes the account after confirming the password.
    ///
    /// # Errors
    /// A wrong password comes back as [`ApiError::Status`] with a
    /// `password` field message.
    pub async fn delete_account(
        &self,
        token: &str,
        password: &str,
    ) -> Result<MessageResponse, ApiError> {
        let url = self.url(endpoints::DELETE_ACCOUNT);
        tracing::debug!(%url, "deleting account");
        let response = self
            .authorized(self.http.delete(&url), token)
            .json(&DeleteAccountRequest { password })
            .send()
            .await
            .map_err(ApiError::Network)?;
        read_json_or_default(response).await
    }
}

fn build_form(fields: Vec<MultipartField>) -> Result<Form, ApiError> {
    let mut form = Form::new();
    for field in fields {
        form = match field {
            MultipartField::Text { name, value } => form.text(name, value),
            MultipartField::File {
                name,
                file_name,
                mime,
                bytes,
            } => {
                let part = Part::bytes(bytes)
                    .file_name(file_name)
                    .mime_str(mime)
                    .map_err(ApiError::Network)?;
                form.part(name, part)
            }
        };
    }
    Ok(form)
}

async fn read_body(response: Response) -> Result<String, ApiError> {
    let status = response.status();
    let body = response.text().await.map_err(ApiError::Network)?;
    if !status.is_success() {
        tracing::debug!(status = status.as_u16(), "request rejected");
        return Err(ApiError::from_response(status.as_u16(), &body));
    }
    Ok(body)
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let body = read_body(response).await?;
    Ok(serde_json::from_str(&body)?)
}

async fn read_json_or_default<T: DeserializeOwned + Default>(
    response: Response,
) -> Result<T, ApiError> {
    let body = read_body(response).await?;
    if body.trim().is_empty() {
        return Ok(T::default());
    }
    Ok(serde_json::from_str(&body)?)
}
