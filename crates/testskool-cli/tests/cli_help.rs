use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help_shows_all_commands() {
    cargo_bin_cmd!("testskool")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("logout"))
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("edit"))
        .stdout(predicate::str::contains("password"))
        .stdout(predicate::str::contains("delete-account"));
}

#[test]
fn test_edit_help_shows_fields() {
    cargo_bin_cmd!("testskool")
        .args(["edit", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--first-name"))
        .stdout(predicate::str::contains("--subject"))
        .stdout(predicate::str::contains("--picture"));
}

#[test]
fn test_password_requires_all_flags() {
    cargo_bin_cmd!("testskool")
        .env_remove("TESTSKOOL_OLD_PASSWORD")
        .env_remove("TESTSKOOL_NEW_PASSWORD")
        .env_remove("TESTSKOOL_CONFIRM_PASSWORD")
        .args(["password", "--old", "old-secret"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--new"));
}
