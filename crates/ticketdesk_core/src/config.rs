//! Desk configuration.
//!
//! # Responsibility
//! - Hold the tunables shared by the store and the view coordinator.
//! - Load them from a JSON document and validate before use.
//!
//! # Invariants
//! - A validated config always has a well-formed storage key, a non-zero
//!   recent limit and a non-blank default actor.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Key the ticket blob is stored under by default.
pub const DEFAULT_STORAGE_KEY: &str = "tickets.v1";
/// Length of the Home panel "recent" list.
pub const DEFAULT_RECENT_LIMIT: usize = 5;
/// Actor recorded on activity entries when no requester is known.
pub const DEFAULT_ACTOR: &str = "system";

static STORAGE_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9][a-z0-9._-]{0,63}$").expect("valid storage key regex"));

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeskConfig {
    pub storage_key: String,
    pub recent_limit: usize,
    pub default_actor: String,
    /// Write the sample tickets when the collection is empty at bootstrap.
    pub seed_samples: bool,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            recent_limit: DEFAULT_RECENT_LIMIT,
            default_actor: DEFAULT_ACTOR.to_string(),
            seed_samples: true,
        }
    }
}

impl DeskConfig {
    /// Parses and validates a JSON config document. Missing keys take defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !STORAGE_KEY_RE.is_match(&self.storage_key) {
            return Err(ConfigError::InvalidStorageKey(self.storage_key.clone()));
        }
        if self.recent_limit == 0 {
            return Err(ConfigError::ZeroRecentLimit);
        }
        if self.default_actor.trim().is_empty() {
            return Err(ConfigError::BlankDefaultActor);
        }
        Ok(())
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
    InvalidStorageKey(String),
    ZeroRecentLimit,
    BlankDefaultActor,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config document: {err}"),
            Self::InvalidStorageKey(key) => write!(
                f,
                "invalid storage_key `{key}`; expected lowercase [a-z0-9._-], at most 64 chars"
            ),
            Self::ZeroRecentLimit => write!(f, "recent_limit must be at least 1"),
            Self::BlankDefaultActor => write!(f, "default_actor must not be blank"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}
