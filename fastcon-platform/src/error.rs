use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("invalid value for '{field}': {message}")]
    Validation { field: &'static str, message: String },

    #[error("unresolved reference '{id}': no controller declared with this id")]
    UnresolvedReference { id: String },

    #[error("duplicate component id '{id}'")]
    DuplicateId { id: String },

    #[error("component '{id}' not found")]
    NotFound { id: String },

    #[error("component '{id}' failed setup: {message}")]
    SetupFailed { id: String, message: String },

    #[error("configuration parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, PlatformError>;
