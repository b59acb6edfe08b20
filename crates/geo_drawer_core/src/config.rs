//! Repository configuration loaded from TOML.
//!
//! # Responsibility
//! - Parse the `[metadata]` table consumed by the bootstrapper.
//! - Parse optional `[container]` and `[logging]` tables used by the entry point.
//!
//! # Invariants
//! - Loading never touches the repository directory; path checks belong to
//!   `RepositoryBootstrapper::from_config`.
//! - Unknown keys are ignored.

use crate::container::ExistingContainerPolicy;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(toml::de::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "cannot read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        Self::Parse(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepositoryConfig {
    pub metadata: MetadataSection,
    #[serde(default)]
    pub container: ContainerSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

/// Repository identity: container name and target directory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MetadataSection {
    pub name: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ContainerSection {
    #[serde(default)]
    pub on_existing: ExistingContainerPolicy,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LoggingSection {
    pub level: Option<String>,
    /// Absolute directory for rolling log files; stderr when absent.
    pub dir: Option<PathBuf>,
}

pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<RepositoryConfig> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&text)
}

pub fn parse_config(text: &str) -> ConfigResult<RepositoryConfig> {
    Ok(toml::from_str(text)?)
}
