use super::{FormDialog, SubmitOutcome, check_password, current_token};
use crate::api::{ApiClient, FieldErrors};
use crate::auth::AccessTokenStore;

/// Input of the delete-account dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteAccountForm {
    pub password: String,
}

impl DeleteAccountForm {
    /// # Errors
    /// Returns a `password` message when the input is missing or too short.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        check_password(&mut errors, "password", &self.password);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl FormDialog<DeleteAccountForm> {
    /// Deletes the account. On success the access token is cleared, which
    /// ends the session.
    pub async fn submit(&mut self, api: &ApiClient, access: &AccessTokenStore) -> SubmitOutcome {
        self.begin_submit();

        if let Err(errors) = self.form().validate() {
            return self.finish(SubmitOutcome::Invalid(errors));
        }
        let token = match current_token(access) {
            Ok(token) => token,
            Err(outcome) => return self.finish(outcome),
        };

        let result = api.delete_account(&token, &self.form().password).await;
        let outcome = self.finish_api(result, |body| body.message);
        if outcome.is_saved() {
            tracing::info!("account deleted");
            access.clear();
        }
        outcome
    }
}
