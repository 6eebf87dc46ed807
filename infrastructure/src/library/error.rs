use council_domain::DomainError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or resolving constitutions and councils
#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("Directory not found: {0}")]
    MissingDirectory(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid definition in {path}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: DomainError,
    },

    #[error("'{id}' is defined twice ({path})")]
    Duplicate { id: String, path: PathBuf },

    #[error("Unknown constitution: {0}")]
    UnknownConstitution(String),

    #[error("Unknown council: {0}")]
    UnknownCouncil(String),
}

impl LibraryError {
    /// Lookup failures caused by the caller rather than by files on disk
    pub fn is_unknown_id(&self) -> bool {
        matches!(
            self,
            LibraryError::UnknownConstitution(_) | LibraryError::UnknownCouncil(_)
        )
    }
}
