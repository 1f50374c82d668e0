//! Account command handlers (password change, deletion).

use anyhow::Result;
use testskool_core::config::Config;
use testskool_core::forms::{ChangePasswordForm, DeleteAccountForm, FormDialog};

use crate::cli::app::{App, outcome_message};

pub async fn change_password(
    config: &Config,
    old_password: String,
    new_password: String,
    confirm_password: String,
) -> Result<()> {
    let mut app = App::load(config)?;
    app.authenticate().await?;

    let mut dialog = FormDialog::<ChangePasswordForm>::new();
    dialog.open();
    *dialog.form_mut() = ChangePasswordForm {
        old_password,
        new_password,
        confirm_password,
    };

    let outcome = dialog.submit(&app.api, &app.access()?).await;
    if let Some(message) = outcome_message(outcome, "Password changed.")? {
        println!("{message}");
    }
    Ok(())
}

pub async fn delete(config: &Config, password: String) -> Result<()> {
    let mut app = App::load(config)?;
    app.authenticate().await?;

    let mut dialog = FormDialog::<DeleteAccountForm>::new();
    dialog.open();
    dialog.form_mut().password = password;

    let outcome = dialog.submit(&app.api, &app.access()?).await;
    let message = outcome_message(outcome, "Account deleted.")?;

    // the cleared token drives the session through logout
    let session = app.session()?;
    session.settle().await;
    if let Some(message) = message {
        println!("{message}");
    }
    println!("{}", session.message());
    Ok(())
}
