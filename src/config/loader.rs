use crate::config::schema::{RuleConfig, ValidationError};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Toml {
        path: Option<PathBuf>,
        source: toml_edit::de::Error,
    },
    Validation {
        path: Option<PathBuf>,
        source: ValidationError,
    },
}

impl ConfigError {
    /// The rule file this error refers to, when known.
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigError::Io { path, .. } => Some(path),
            ConfigError::Toml { path, .. } | ConfigError::Validation { path, .. } => {
                path.as_deref()
            }
        }
    }

    fn with_path(self, path: &Path) -> Self {
        match self {
            ConfigError::Toml { path: None, source } => ConfigError::Toml {
                path: Some(path.to_path_buf()),
                source,
            },
            ConfigError::Validation { path: None, source } => ConfigError::Validation {
                path: Some(path.to_path_buf()),
                source,
            },
            other => other,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = match self.path() {
            Some(path) => format!("rule file {}", path.display()),
            None => "rule file".to_string(),
        };
        match self {
            ConfigError::Io { source, .. } => write!(f, "failed to read {file}: {source}"),
            ConfigError::Toml { source, .. } => {
                // toml_edit reports its own line/column and a multi-line excerpt.
                write!(f, "malformed {file}: {}", source.to_string().trim_end())
            }
            ConfigError::Validation { source, .. } => write!(f, "invalid {file}: {source}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Toml { source, .. } => Some(source),
            ConfigError::Validation { source, .. } => Some(source),
        }
    }
}

/// Parse and validate a rule file.
pub fn load_from_str(input: &str) -> Result<RuleConfig, ConfigError> {
    let config: RuleConfig = toml_edit::de::from_str(input)
        .map_err(|source| ConfigError::Toml { path: None, source })?;
    config
        .validate()
        .map_err(|source| ConfigError::Validation { path: None, source })?;
    Ok(config)
}

/// Read, parse and validate a rule file. Errors carry the path.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RuleConfig, ConfigError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_from_str(&contents).map_err(|error| error.with_path(path))
}
