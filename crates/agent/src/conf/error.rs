//! Failures raised while loading configuration files.

use std::io;
use std::path::PathBuf;
use std::string::FromUtf8Error;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no config file specified, and could not find one in {searched}")]
    NoConfigFound { searched: String },

    #[error("error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error parsing {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("error parsing {}: {source}", path.display())]
    Encoding {
        path: PathBuf,
        #[source]
        source: FromUtf8Error,
    },

    #[error("{}: invalid configuration: {reason}", path.display())]
    InvalidConfig { path: PathBuf, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidConfig {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// True for read failures caused by missing permissions.
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, ConfigError::Io { source, .. } if source.kind() == io::ErrorKind::PermissionDenied)
    }
}
