//! Profile mutation dialogs.
//!
//! Each dialog pairs its input values with a [`FormDialog`] holding the
//! open/loading flags and per-field messages. Submitting yields a
//! [`SubmitOutcome`] and leaves the dialog in the matching state.

mod change_password;
mod delete_account;
mod edit_profile;

pub use change_password::ChangePasswordForm;
pub use delete_account::DeleteAccountForm;
pub use edit_profile::{EditProfileForm, PictureUpload, available_subjects};

use crate::api::{ApiError, FieldErrors};
use crate::auth::AccessTokenStore;

/// Minimum length accepted for any password input.
pub const MIN_PASSWORD_LEN: usize = 8;

pub(crate) const REQUIRED_MESSAGE: &str = "This field is required.";
pub(crate) const NOT_LOGGED_IN_MESSAGE: &str = "You are not logged in.";

pub(crate) fn too_short_message() -> String {
    format!("Ensure this field has at least {MIN_PASSWORD_LEN} characters.")
}

/// Result of one submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Nothing to send. The dialog closed without a request.
    Skipped,
    /// Client-side validation failed. No request was sent.
    Invalid(FieldErrors),
    /// The server accepted the change. Carries the server message, if any.
    Saved(String),
    /// The server rejected specific fields.
    Rejected(FieldErrors),
    /// Transport failure or an error without field messages.
    Failed(String),
}

impl SubmitOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, SubmitOutcome::Saved(_))
    }

    fn from_api_error(err: ApiError) -> Self {
        match err {
            ApiError::Status { fields, .. } if !fields.is_empty() => {
                SubmitOutcome::Rejected(fields)
            }
            other => SubmitOutcome::Failed(other.to_string()),
        }
    }
}

/// Dialog state wrapped around a form's input values.
#[derive(Debug, Clone, Default)]
pub struct FormDialog<F> {
    form: F,
    open: bool,
    loading: bool,
    errors: FieldErrors,
    notice: Option<String>,
}

impl<F: Default> FormDialog<F> {
    pub fn new() -> Self {
        Self {
            form: F::default(),
            open: false,
            loading: false,
            errors: FieldErrors::new(),
            notice: None,
        }
    }

    /// Opens the dialog with empty inputs.
    pub fn open(&mut self) {
        self.reset();
        self.open = true;
    }

    /// Closes the dialog. Inputs and messages are discarded.
    pub fn close(&mut self) {
        self.reset();
    }

    fn reset(&mut self) {
        self.form = F::default();
        self.open = false;
        self.loading = false;
        self.errors = FieldErrors::new();
        self.notice = None;
    }
}

impl<F> FormDialog<F> {
    pub fn form(&self) -> &F {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut F {
        &mut self.form
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field)
    }

    /// General message from the last failed submit.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    fn begin_submit(&mut self) {
        self.loading = true;
        self.errors = FieldErrors::new();
        self.notice = None;
    }
}

impl<F: Default> FormDialog<F> {
    /// Applies an outcome to the dialog state and hands it back.
    fn finish(&mut self, outcome: SubmitOutcome) -> SubmitOutcome {
        self.loading = false;
        match &outcome {
            SubmitOutcome::Skipped | SubmitOutcome::Saved(_) => self.reset(),
            SubmitOutcome::Invalid(fields) | SubmitOutcome::Rejected(fields) => {
                self.errors = fields.clone();
            }
            SubmitOutcome::Failed(message) => self.notice = Some(message.clone()),
        }
        outcome
    }

    fn finish_api<T>(
        &mut self,
        result: Result<T, ApiError>,
        message: impl FnOnce(T) -> Option<String>,
    ) -> SubmitOutcome {
        let outcome = match result {
            Ok(body) => SubmitOutcome::Saved(message(body).unwrap_or_default()),
            Err(err) => {
                tracing::debug!(error = %err, "submit failed");
                SubmitOutcome::from_api_error(err)
            }
        };
        self.finish(outcome)
    }
}

fn current_token(access: &AccessTokenStore) -> Result<String, SubmitOutcome> {
    access
        .get()
        .ok_or_else(|| SubmitOutcome::Failed(NOT_LOGGED_IN_MESSAGE.to_string()))
}

/// Checks a required password input.
fn check_password(errors: &mut FieldErrors, key: &str, value: &str) {
    if value.is_empty() {
        errors.insert(key, REQUIRED_MESSAGE);
    } else if value.chars().count() < MIN_PASSWORD_LEN {
        errors.insert(key, too_short_message());
    }
}
