//! Configuration management for testskool.
//!
//! Loads configuration from ${TESTSKOOL_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// What kind of profile-fetch failure ends the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum LogoutPolicy {
    /// Any failure (network, 4xx, 5xx) logs the session out.
    #[default]
    AnyError,
    /// Only 401/403 responses log out; other failures keep the session.
    AuthError,
}

impl LogoutPolicy {
    /// Returns whether a failed fetch with the given HTTP status should log out.
    ///
    /// `None` means the request never produced a response.
    pub fn should_logout(self, status: Option<u16>) -> bool {
        match self {
            LogoutPolicy::AnyError => true,
            LogoutPolicy::AuthError => matches!(status, Some(401 | 403)),
        }
    }
}

/// Returns the default config template with comments.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

pub mod paths {
    //! Path resolution for testskool configuration and data files.
    //!
    //! TESTSKOOL_HOME resolution order:
    //! 1. TESTSKOOL_HOME environment variable (if set)
    //! 2. ~/.config/testskool (default)

    use std::path::PathBuf;

    /// Returns the testskool home directory.
    ///
    /// Checks TESTSKOOL_HOME env var first, falls back to ~/.config/testskool.
    /// Falls back to a relative `.testskool` directory when no home directory
    /// can be determined.
    pub fn testskool_home() -> PathBuf {
        if let Ok(home) = std::env::var("TESTSKOOL_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".testskool"),
            |h| h.join(".config").join("testskool"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        testskool_home().join("config.toml")
    }

    /// Returns the path to the persisted token file.
    pub fn tokens_path() -> PathBuf {
        testskool_home().join("tokens.json")
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the backend API
    pub api_url: String,

    /// Base URL that avatar paths are resolved against
    pub media_url: String,

    /// Path prefix prepended to every endpoint
    pub api_prefix: String,

    /// Which fetch failures end the session
    pub logout_on: LogoutPolicy,
}

impl Config {
    pub const DEFAULT_API_URL: &'static str = "http://127.0.0.1:8000";
    pub const DEFAULT_MEDIA_URL: &'static str = "http://127.0.0.1:8000/media/";
    pub const DEFAULT_API_PREFIX: &'static str = "/testskool";

    /// Loads configuration from the default config path.
    /// Returns defaults if the file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Effective API base URL.
    ///
    /// Resolution order: `TESTSKOOL_API_URL` > `api_url` > default.
    ///
    /// # Errors
    /// Returns an error if the chosen URL is malformed.
    pub fn effective_api_url(&self) -> Result<String> {
        pick_url(
            std::env::var("TESTSKOOL_API_URL").ok(),
            &self.api_url,
            Self::DEFAULT_API_URL,
            "API",
        )
    }

    /// Effective media base URL.
    ///
    /// Resolution order: `TESTSKOOL_MEDIA_URL` > `media_url` > default.
    ///
    /// # Errors
    /// Returns an error if the chosen URL is malformed.
    pub fn effective_media_url(&self) -> Result<String> {
        pick_url(
            std::env::var("TESTSKOOL_MEDIA_URL").ok(),
            &self.media_url,
            Self::DEFAULT_MEDIA_URL,
            "media",
        )
    }

    /// Creates a default config file at the given path.
    /// Returns an error if the file already exists.
    ///
    /// # Errors
    /// Returns an error if the file exists or cannot be written.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: Self::DEFAULT_API_URL.to_string(),
            media_url: Self::DEFAULT_MEDIA_URL.to_string(),
            api_prefix: Self::DEFAULT_API_PREFIX.to_string(),
            logout_on: LogoutPolicy::default(),
        }
    }
}

/// First non-blank of `env` and `configured`, validated, else `default`.
fn pick_url(env: Option<String>, configured: &str, default: &str, name: &str) -> Result<String> {
    let chosen = env
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .or_else(|| Some(configured.trim()).filter(|url| !url.is_empty()));

    let Some(url) = chosen else {
        return Ok(default.to_string());
    };
    url::Url::parse(url).with_context(|| format!("Invalid {name} base URL: {url}"))?;
    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("nonexistent.toml");

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.api_url, "http://127.0.0.1:8000");
        assert_eq!(config.api_prefix, "/testskool");
        assert_eq!(config.logout_on, LogoutPolicy::AnyError);
    }

    #[test]
    fn test_load_partial_config_merges_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        fs::write(
            &config_path,
            "api_url = \"https://school.example\"\nlogout_on = \"auth-error\"\n",
        )
        .unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.api_url, "https://school.example");
        assert_eq!(config.media_url, Config::DEFAULT_MEDIA_URL);
        assert_eq!(config.logout_on, LogoutPolicy::AuthError);
    }

    #[test]
    fn test_load_rejects_unknown_policy() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "logout_on = \"sometimes\"\n").unwrap();

        assert!(Config::load_from(&config_path).is_err());
    }

    #[test]
    fn test_init_creates_config_with_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("subdir").join("config.toml");

        Config::init(&config_path).unwrap();

        assert!(config_path.exists());
        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.api_prefix, Config::DEFAULT_API_PREFIX);
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "# mine").unwrap();

        let err = Config::init(&config_path).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert_eq!(fs::read_to_string(&config_path).unwrap(), "# mine");
    }

    #[test]
    fn test_pick_url_prefers_env_then_config() {
        let url = pick_url(
            Some("https://env.example".into()),
            "https://config.example",
            "http://default",
            "API",
        )
        .unwrap();
        assert_eq!(url, "https://env.example");

        let url = pick_url(Some("  ".into()), " https://config.example ", "http://default", "API")
            .unwrap();
        assert_eq!(url, "https://config.example");

        let url = pick_url(None, "", "http://default", "API").unwrap();
        assert_eq!(url, "http://default");
    }

    #[test]
    fn test_pick_url_rejects_garbage() {
        let err = pick_url(None, "not a url", "http://default", "API").unwrap_err();
        assert!(err.to_string().contains("Invalid API base URL"));
    }

    #[test]
    fn test_logout_policy() {
        assert!(LogoutPolicy::AnyError.should_logout(None));
        assert!(LogoutPolicy::AnyError.should_logout(Some(500)));
        assert!(LogoutPolicy::AuthError.should_logout(Some(401)));
        assert!(LogoutPolicy::AuthError.should_logout(Some(403)));
        assert!(!LogoutPolicy::AuthError.should_logout(Some(500)));
        assert!(!LogoutPolicy::AuthError.should_logout(None));
    }
}
