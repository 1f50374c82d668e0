//! Shared helpers for CLI integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Value, json};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN: &str = "tok-123";
pub const PROFILE_PATH: &str = "/testskool/my-profile/";
pub const EDIT_PATH: &str = "/testskool/edit-profile/";
pub const DELETE_PATH: &str = "/testskool/delete-account/";
pub const SUBJECTS_PATH: &str = "/testskool/subject-list/";

/// Writes a tokens.json into the given home, as `testskool login` would.
pub fn store_tokens(home: &Path) -> PathBuf {
    let tokens_path = home.join("tokens.json");
    fs::write(
        &tokens_path,
        json!({"access": TOKEN, "refresh": "ref-456"}).to_string(),
    )
    .unwrap();
    tokens_path
}

pub fn student() -> Value {
    json!({
        "id": 7,
        "username": "ada",
        "first_name": "ada",
        "last_name": "lovelace",
        "is_student": true,
        "is_teacher": false,
        "about": null,
        "profile_picture": "avatars/ada.png",
        "date_joined": "2024-01-05T10:20:30Z"
    })
}

pub fn teacher() -> Value {
    json!({
        "id": 8,
        "username": "jdoe",
        "first_name": "john",
        "last_name": "doe",
        "is_student": false,
        "is_teacher": true,
        "subject": [{"id": 1, "name": "mathematics"}],
        "date_joined": "2023-09-01"
    })
}

/// Mounts `GET my-profile/` answering with `body` for the stored token.
pub async fn mount_profile(server: &MockServer, body: Value, expect: u64) {
    Mock::given(method("GET"))
        .and(path(PROFILE_PATH))
        .and(header("authorization", format!("Bearer {TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(expect)
        .mount(server)
        .await;
}

/// Mounts a catch-all for `method` on `route` that must never be hit.
pub async fn forbid(server: &MockServer, verb: &str, route: &str) {
    Mock::given(method(verb))
        .and(path(route))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(server)
        .await;
}
