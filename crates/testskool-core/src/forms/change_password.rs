use super::{FormDialog, SubmitOutcome, check_password, current_token};
use crate::api::{ApiClient, FieldErrors, MultipartField};
use crate::auth::AccessTokenStore;

/// Inputs of the change-password dialog.
///
/// Messages are keyed the way the backend reports them: `password` for the
/// current password, `new_password` and `confirm_password` for the others.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangePasswordForm {
    pub old_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl ChangePasswordForm {
    /// # Errors
    /// Returns a message per missing or too-short input.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        check_password(&mut errors, "password", &self.old_password);
        check_password(&mut errors, "new_password", &self.new_password);
        check_password(&mut errors, "confirm_password", &self.confirm_password);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn fields(&self) -> Vec<MultipartField> {
        vec![
            MultipartField::text("old_password", self.old_password.as_str()),
            MultipartField::text("password", self.new_password.as_str()),
            MultipartField::text("confirm_password", self.confirm_password.as_str()),
        ]
    }
}

impl FormDialog<ChangePasswordForm> {
    pub async fn submit(&mut self, api: &ApiClient, access: &AccessTokenStore) -> SubmitOutcome {
        self.begin_submit();

        if let Err(errors) = self.form().validate() {
            return self.finish(SubmitOutcome::Invalid(errors));
        }
        let token = match current_token(access) {
            Ok(token) => token,
            Err(outcome) => return self.finish(outcome),
        };

        let result = api.edit_profile(&token, self.form().fields()).await;
        let outcome = self.finish_api(result, |body| body.message);
        if outcome.is_saved() {
            tracing::info!("password changed");
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::forms::{REQUIRED_MESSAGE, too_short_message};

    fn filled() -> ChangePasswordForm {
        ChangePasswordForm {
            old_password: "old-secret".into(),
            new_password: "new-secret".into(),
            confirm_password: "new-secret".into(),
        }
    }

    fn logged_in() -> AccessTokenStore {
        let access = AccessTokenStore::new();
        access.set(Some("tok".into()));
        access
    }

    #[test]
    fn test_validate_reports_each_field() {
        let form = ChangePasswordForm {
            old_password: String::new(),
            new_password: "short".into(),
            confirm_password: "long-enough".into(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("password"), Some(REQUIRED_MESSAGE));
        assert_eq!(errors.get("new_password"), Some(too_short_message().as_str()));
        assert_eq!(errors.get("confirm_password"), None);
    }

    #[tokio::test]
    async fn test_empty_field_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        let api = ApiClient::new(&server.uri(), "/testskool");

        let mut dialog = FormDialog::<ChangePasswordForm>::new();
        dialog.open();
        *dialog.form_mut() = ChangePasswordForm {
            confirm_password: String::new(),
            ..filled()
        };
        let outcome = dialog.submit(&api, &logged_in()).await;

        assert!(matches!(outcome, SubmitOutcome::Invalid(_)));
        assert!(dialog.is_open());
        assert!(!dialog.is_loading());
    }

    #[tokio::test]
    async fn test_valid_form_sends_one_put_with_all_values() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/testskool/edit-profile/"))
            .and(body_string_contains("name=\"old_password\""))
            .and(body_string_contains("name=\"password\""))
            .and(body_string_contains("name=\"confirm_password\""))
            .and(body_string_contains("old-secret"))
            .and(body_string_contains("new-secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "message": "Password updated"
            })))
            .expect(1)
            .mount(&server)
            .await;
        let api = ApiClient::new(&server.uri(), "/testskool");

        let mut dialog = FormDialog::<ChangePasswordForm>::new();
        dialog.open();
        *dialog.form_mut() = filled();
        let outcome = dialog.submit(&api, &logged_in()).await;

        assert_eq!(outcome, SubmitOutcome::Saved("Password updated".into()));
        assert!(!dialog.is_open());
        assert_eq!(dialog.form(), &ChangePasswordForm::default());
    }

    #[tokio::test]
    async fn test_wrong_old_password_stays_open() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/testskool/edit-profile/"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "status": "error",
                "password": "Invalid password."
            })))
            .mount(&server)
            .await;
        let api = ApiClient::new(&server.uri(), "/testskool");

        let mut dialog = FormDialog::<ChangePasswordForm>::new();
        dialog.open();
        *dialog.form_mut() = filled();
        dialog.submit(&api, &logged_in()).await;

        assert!(dialog.is_open());
        assert!(!dialog.is_loading());
        assert_eq!(dialog.error("password"), Some("Invalid password."));
        assert_eq!(dialog.error("new_password"), None);
    }

    #[tokio::test]
    async fn test_logged_out_fails_without_request() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        let api = ApiClient::new(&server.uri(), "/testskool");

        let mut dialog = FormDialog::<ChangePasswordForm>::new();
        dialog.open();
        *dialog.form_mut() = filled();
        let outcome = dialog.submit(&api, &AccessTokenStore::new()).await;

        assert!(matches!(outcome, SubmitOutcome::Failed(_)));
        assert!(dialog.notice().is_some());
    }
}
