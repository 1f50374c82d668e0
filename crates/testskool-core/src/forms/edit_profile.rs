use std::path::Path;

use anyhow::{Context, Result};

use super::{FormDialog, SubmitOutcome, current_token};
use crate::api::{ApiClient, ApiError, FieldErrors, MultipartField, Profile, Subject};
use crate::auth::AccessTokenStore;
use crate::session::SessionHandle;

/// Image types the backend accepts for avatars.
const SUPPORTED_IMAGE_MIMES: &[&str] = &["image/jpeg", "image/png", "image/gif"];

const PICTURE_TOO_LARGE: &str = "Please select an image under 300 KB.";
const PICTURE_UNSUPPORTED: &str = "Please select a JPEG, PNG or GIF image.";

/// An avatar picked for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PictureUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl PictureUpload {
    pub const MAX_BYTES: usize = 307_200;

    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Reads a picture from disk.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read picture {}", path.display()))?;
        let file_name = path
            .file_name()
            .map_or_else(|| "picture".to_string(), |n| n.to_string_lossy().into_owned());
        Ok(Self::new(file_name, bytes))
    }

    /// Detected image type, if it is one the backend accepts.
    ///
    /// Detection is based on content (magic bytes), not the file name.
    pub fn mime(&self) -> Option<&'static str> {
        let kind = infer::get(&self.bytes)?;
        let mime = kind.mime_type();
        SUPPORTED_IMAGE_MIMES.iter().copied().find(|m| *m == mime)
    }

    fn to_field(&self) -> Result<MultipartField, &'static str> {
        if self.bytes.len() > Self::MAX_BYTES {
            return Err(PICTURE_TOO_LARGE);
        }
        let mime = self.mime().ok_or(PICTURE_UNSUPPORTED)?;
        Ok(MultipartField::File {
            name: "profile_picture",
            file_name: self.file_name.clone(),
            mime,
            bytes: self.bytes.clone(),
        })
    }
}

/// Inputs of the edit-profile dialog. Empty inputs are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditProfileForm {
    pub first_name: String,
    pub last_name: String,
    pub about: String,
    /// Selected subject names.
    pub subjects: Vec<String>,
    pub picture: Option<PictureUpload>,
}

impl EditProfileForm {
    /// Builds the multipart parts to send, skipping empty inputs.
    ///
    /// # Errors
    /// Returns the field errors when the picture is too large or of an
    /// unsupported type.
    pub fn fields(&self) -> Result<Vec<MultipartField>, FieldErrors> {
        let mut fields = Vec::new();
        for (name, value) in [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("about", &self.about),
        ] {
            if !value.is_empty() {
                fields.push(MultipartField::text(name, value.as_str()));
            }
        }
        fields.extend(
            self.subjects
                .iter()
                .filter(|s| !s.is_empty())
                .map(|s| MultipartField::text("subject", s.as_str())),
        );

        if let Some(picture) = &self.picture {
            match picture.to_field() {
                Ok(field) => fields.push(field),
                Err(message) => {
                    let mut errors = FieldErrors::new();
                    errors.insert("profile_picture", message);
                    return Err(errors);
                }
            }
        }
        Ok(fields)
    }
}

/// Subjects offered in the edit dialog. Only teachers pick subjects, so
/// nothing is fetched for anyone else.
///
/// # Errors
/// Propagates the subject-list request failure.
pub async fn available_subjects(
    api: &ApiClient,
    token: &str,
    profile: &Profile,
) -> Result<Vec<Subject>, ApiError> {
    if !profile.is_teacher {
        return Ok(Vec::new());
    }
    api.subject_list(token).await
}

impl FormDialog<EditProfileForm> {
    /// Submits the edited fields. On success the session is asked to reload
    /// the profile.
    pub async fn submit(
        &mut self,
        api: &ApiClient,
        access: &AccessTokenStore,
        session: &SessionHandle,
    ) -> SubmitOutcome {
        self.begin_submit();

        let fields = match self.form().fields() {
            Ok(fields) => fields,
            Err(errors) => return self.finish(SubmitOutcome::Invalid(errors)),
        };
        if fields.is_empty() {
            tracing::debug!("no profile changes to submit");
            return self.finish(SubmitOutcome::Skipped);
        }
        let token = match current_token(access) {
            Ok(token) => token,
            Err(outcome) => return self.finish(outcome),
        };

        let result = api.edit_profile(&token, fields).await;
        let outcome = self.finish_api(result, |body| body.message);
        if outcome.is_saved() {
            tracing::info!("profile updated");
            session.request_refetch();
        }
        outcome
    }
}
