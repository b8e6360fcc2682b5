//! quizcat configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::catalogue::DEFAULT_MEDIA_DIR;

/// Environment variable overriding the configured media directory.
pub const MEDIA_DIR_ENV: &str = "QUIZCAT_MEDIA_DIR";

/// Top-level quizcat configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizcatConfig {
    /// Directory attachments are copied into.
    #[serde(default = "default_media_dir")]
    pub media_dir: PathBuf,
    /// Pretty-print written catalogue files.
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

fn default_media_dir() -> PathBuf {
    PathBuf::from(DEFAULT_MEDIA_DIR)
}

fn default_pretty() -> bool {
    true
}

impl Default for QuizcatConfig {
    fn default() -> Self {
        Self {
            media_dir: default_media_dir(),
            pretty: default_pretty(),
        }
    }
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order without an explicit path:
/// 1. `quizcat.toml` in the current directory
/// 2. `~/.config/quizcat/config.toml`
///
/// `QUIZCAT_MEDIA_DIR` overrides `media_dir`.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizcatConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("quizcat.toml");
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|home| home.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => parse_config_file(&path)?,
        None => QuizcatConfig::default(),
    };

    if let Ok(dir) = std::env::var(MEDIA_DIR_ENV) {
        if !dir.is_empty() {
            config.media_dir = PathBuf::from(dir);
        }
    }

    Ok(config)
}

fn parse_config_file(path: &Path) -> Result<QuizcatConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    toml::from_str::<QuizcatConfig>(&content)
        .with_context(|| format!("failed to parse config: {}", path.display()))
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizcat"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = QuizcatConfig::default();
        assert_eq!(config.media_dir, PathBuf::from("media"));
        assert!(config.pretty);
    }

    #[test]
    fn parse_partial_config() {
        let config: QuizcatConfig = toml::from_str("pretty = false\n").unwrap();
        assert!(!config.pretty);
        assert_eq!(config.media_dir, PathBuf::from("media"));
    }

    #[test]
    fn explicit_path_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quizcat.toml");
        std::fs::write(&path, "media_dir = \"assets\"\npretty = false\n").unwrap();

        let config = parse_config_file(&path).unwrap();
        assert_eq!(config.media_dir, PathBuf::from("assets"));
        assert!(!config.pretty);
    }

    #[test]
    fn missing_explicit_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config_from(Some(dir.path().join("absent.toml").as_path())).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn malformed_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "pretty = \"sometimes\"").unwrap();
        assert!(parse_config_file(&path).is_err());
    }
}
