//! Client configuration and service factory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use confquiz_core::model::Locale;

use crate::http::{HttpQuizService, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};

/// Top-level confquiz configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfquizConfig {
    /// Root URL of the quiz service.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Language questions are shown in.
    #[serde(default)]
    pub language: Locale,
    /// Where finished sessions are exported.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./confquiz-results")
}

impl Default for ConfquizConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            language: Locale::default(),
            output_dir: default_output_dir(),
        }
    }
}

impl ConfquizConfig {
    /// Build the HTTP service this configuration points at.
    pub fn create_service(&self) -> Result<HttpQuizService> {
        anyhow::ensure!(self.timeout_secs >= 1, "timeout_secs must be at least 1");
        HttpQuizService::new(&self.base_url, self.timeout_secs)
            .with_context(|| format!("failed to create client for {}", self.base_url))
    }
}

/// Expand `${NAME}` references from the environment. Unset variables expand
/// to the empty string; an unterminated `${` is kept as written.
fn expand_env(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(open) = rest.find("${") {
        let Some(close) = rest[open..].find('}') else {
            break;
        };
        out.push_str(&rest[..open]);
        out.push_str(&std::env::var(&rest[open + 2..open + close]).unwrap_or_default());
        rest = &rest[open + close + 1..];
    }
    out.push_str(rest);
    out
}

/// Load configuration from the usual locations: `confquiz.toml` in the
/// working directory, then `~/.config/confquiz/config.toml`, else defaults.
///
/// `CONFQUIZ_BASE_URL` and `CONFQUIZ_LANGUAGE` override the file.
pub fn load_config() -> Result<ConfquizConfig> {
    load_config_from(None)
}

/// Like [`load_config`], but an explicit `path` must exist.
pub fn load_config_from(path: Option<&Path>) -> Result<ConfquizConfig> {
    let source = match path {
        Some(p) if !p.exists() => anyhow::bail!("config file not found: {}", p.display()),
        Some(p) => Some(p.to_path_buf()),
        None => [
            Some(PathBuf::from("confquiz.toml")),
            dirs_path().map(|dir| dir.join("config.toml")),
        ]
        .into_iter()
        .flatten()
        .find(|candidate| candidate.exists()),
    };

    let mut config = match source {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<ConfquizConfig>(&raw)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => ConfquizConfig::default(),
    };

    if let Ok(url) = std::env::var("CONFQUIZ_BASE_URL") {
        config.base_url = url;
    }
    if let Ok(lang) = std::env::var("CONFQUIZ_LANGUAGE") {
        config.language = lang
            .parse::<Locale>()
            .map_err(anyhow::Error::msg)
            .context("invalid CONFQUIZ_LANGUAGE")?;
    }

    config.base_url = expand_env(&config.base_url);
    config.output_dir = PathBuf::from(expand_env(&config.output_dir.to_string_lossy()));

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("confquiz"))
}
