use thiserror::Error;

#[derive(Error, Debug)]
pub enum MapError {
    #[error("Surface request failed: {0}")]
    SurfaceError(#[from] reqwest::Error),

    #[error("Surface protocol error: {message}")]
    ProtocolError { message: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },
}

pub type Result<T> = std::result::Result<T, MapError>;
