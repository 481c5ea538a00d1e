use std::path::PathBuf;

use thiserror::Error;

/// Failures of the roster provider. The cache turns these into an
/// "unavailable" marker instead of propagating them.
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("people source is unavailable: {0}")]
    Unavailable(String),
    #[error("invalid people source selector `{0}`")]
    InvalidSelector(String),
}

#[derive(Debug, Error)]
pub enum CreateError {
    #[error("note already exists: {}", .0.display())]
    AlreadyExists(PathBuf),
    #[error("cannot create note with an empty name")]
    EmptyName,
    #[error("`{0}` is outside the vault")]
    OutsideVault(String),
    #[error("unable to create {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown setting `{0}`")]
    UnknownKey(String),
    #[error("invalid value `{value}` for `{key}`: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
    #[error(transparent)]
    Parse(#[from] toml::de::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("cannot determine home directory")]
    NoHome,
}
