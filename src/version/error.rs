use thiserror::Error;

/// Coarse classification of a [`RegistryError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller-correctable input problem, raised before any network call
    InvalidArgument,
    /// The registry answered, but there is nothing to report
    NotFound,
    /// Transport failure, unexpected status or undecodable payload
    Upstream,
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("Unknown package manager '{name}'. Valid options: {valid}")]
    UnknownRegistry { name: String, valid: String },

    #[error("{0}")]
    NotFound(String),

    #[error("{registry} API error {status}: {body}")]
    Upstream {
        registry: String,
        status: u16,
        body: String,
    },

    #[error("Invalid response from {registry}: {message}")]
    InvalidResponse { registry: String, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Failed to create HTTP client: {0}")]
    Client(reqwest::Error),

    #[error("Registry '{0}' is already registered")]
    DuplicateRegistry(String),

    #[error("Alias '{alias}' of '{registry}' is already bound to '{existing}'")]
    DuplicateAlias {
        alias: String,
        existing: String,
        registry: String,
    },
}

impl RegistryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RegistryError::InvalidArgument(_)
            | RegistryError::UnknownRegistry { .. }
            | RegistryError::DuplicateRegistry(_)
            | RegistryError::DuplicateAlias { .. } => ErrorKind::InvalidArgument,
            RegistryError::NotFound(_) => ErrorKind::NotFound,
            RegistryError::Upstream { .. }
            | RegistryError::InvalidResponse { .. }
            | RegistryError::Network(_)
            | RegistryError::Client(_) => ErrorKind::Upstream,
        }
    }
}
