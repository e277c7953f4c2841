use crate::validation::ValidationFailure;

#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    #[error("Validation failed: {0}")]
    ValidationError(ValidationFailure),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Registration error: {0}")]
    RegistrationError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PluginError>;
