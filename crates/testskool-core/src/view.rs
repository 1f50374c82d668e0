//! Display-ready projection of a [`Profile`].

use std::fmt;

use crate::api::Profile;
use crate::common::text::{format_date, title};

/// Placeholder for absent values.
const EMPTY: &str = "-";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileView {
    pub username: String,
    /// Title-cased "first last", or the username when both are empty.
    pub display_name: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Option<&'static str>,
    pub about: Option<String>,
    /// Subject names, title-cased. Only populated for teachers.
    pub subjects: Vec<String>,
    pub is_teacher: bool,
    pub avatar_url: Option<String>,
    /// Join date as `January 5, 2024`; empty when unparseable.
    pub joined: String,
}

impl ProfileView {
    pub fn from_profile(profile: &Profile, media_url: &str) -> Self {
        let first = profile.first_name.as_deref().unwrap_or_default();
        let last = profile.last_name.as_deref().unwrap_or_default();
        let full = title(format!("{first} {last}").trim());
        let display_name = if full.is_empty() {
            profile.username.clone()
        } else {
            full
        };

        let role = match (profile.is_teacher, profile.is_student) {
            (true, true) => Some("Teacher & Student"),
            (true, false) => Some("Teacher"),
            (false, true) => Some("Student"),
            (false, false) => None,
        };

        let subjects = if profile.is_teacher {
            profile
                .subject
                .iter()
                .flatten()
                .map(|s| title(&s.name))
                .collect()
        } else {
            Vec::new()
        };

        Self {
            username: profile.username.clone(),
            display_name,
            first_name: non_empty_or_dash(&title(first)),
            last_name: non_empty_or_dash(&title(last)),
            role,
            about: profile.about.clone().filter(|a| !a.is_empty()),
            subjects,
            is_teacher: profile.is_teacher,
            avatar_url: profile
                .profile_picture
                .as_deref()
                .filter(|p| !p.is_empty())
                .map(|p| media_join(media_url, p)),
            joined: format_date(Some(profile.date_joined.as_str())),
        }
    }

    pub fn handle(&self) -> String {
        format!("@{}", self.username)
    }
}

fn non_empty_or_dash(value: &str) -> String {
    if value.is_empty() {
        EMPTY.to_string()
    } else {
        value.to_string()
    }
}

/// Resolves an avatar path against the media base URL. Absolute URLs pass
/// through unchanged.
fn media_join(media_url: &str, picture: &str) -> String {
    if picture.starts_with("http://") || picture.starts_with("https://") {
        return picture.to_string();
    }
    format!(
        "{}/{}",
        media_url.trim_end_matches('/'),
        picture.trim_start_matches('/')
    )
}

impl fmt::Display for ProfileView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.role {
            Some(role) => writeln!(f, "{} ({}) {role}", self.display_name, self.handle())?,
            None => writeln!(f, "{} ({})", self.display_name, self.handle())?,
        }
        writeln!(f, "First Name: {}", self.first_name)?;
        writeln!(f, "Last Name: {}", self.last_name)?;
        match &self.about {
            Some(about) => writeln!(f, "About:\n{about}")?,
            None => writeln!(f, "About: {EMPTY}")?,
        }
        if self.is_teacher {
            writeln!(f, "Subject(s):")?;
            for subject in &self.subjects {
                writeln!(f, "- {subject}")?;
            }
        }
        if let Some(url) = &self.avatar_url {
            writeln!(f, "Avatar: {url}")?;
        }
        write!(f, "Joined: {}", self.joined)
    }
}
