//! Profile command handlers.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use testskool_core::config::Config;
use testskool_core::forms::{EditProfileForm, FormDialog, PictureUpload, available_subjects};
use testskool_core::view::ProfileView;

use crate::cli::app::{App, outcome_message};

pub async fn show(config: &Config) -> Result<()> {
    let mut app = App::load(config)?;
    let profile = app.authenticate().await?;
    println!("{}", ProfileView::from_profile(&profile, &app.media_url));
    Ok(())
}

pub async fn subjects(config: &Config) -> Result<()> {
    let mut app = App::load(config)?;
    let profile = app.authenticate().await?;
    if !profile.is_teacher {
        println!("Subjects can only be chosen by teachers.");
        return Ok(());
    }

    let subjects = available_subjects(&app.api, &app.token()?, &profile)
        .await
        .context("fetch subjects")?;
    if subjects.is_empty() {
        println!("No subjects available.");
    }
    for subject in subjects {
        println!("{}", subject.name);
    }
    Ok(())
}

pub struct EditArgs {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub about: Option<String>,
    pub subjects: Vec<String>,
    pub picture: Option<PathBuf>,
}

pub async fn edit(config: &Config, args: EditArgs) -> Result<()> {
    let mut app = App::load(config)?;
    let profile = app.authenticate().await?;
    if !args.subjects.is_empty() && !profile.is_teacher {
        bail!("Only teachers can choose subjects");
    }

    let mut dialog = FormDialog::<EditProfileForm>::new();
    dialog.open();
    let form = dialog.form_mut();
    form.first_name = args.first_name.unwrap_or_default();
    form.last_name = args.last_name.unwrap_or_default();
    form.about = args.about.unwrap_or_default();
    form.subjects = args.subjects;
    if let Some(path) = &args.picture {
        form.picture = Some(PictureUpload::from_path(path)?);
    }

    let access = app.access()?;
    let handle = app.session()?.handle();
    let outcome = dialog.submit(&app.api, &access, &handle).await;
    let Some(message) = outcome_message(outcome, "Profile updated.")? else {
        println!("Nothing to update.");
        return Ok(());
    };

    let profile = app.authenticate().await?;
    println!("{message}");
    println!("{}", ProfileView::from_profile(&profile, &app.media_url));
    Ok(())
}
