use thiserror::Error;

#[derive(Debug, Error)]
pub enum VariationError {
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Analysis error: {0}")]
    AnalysisError(String),
    #[error("Generation error: {0}")]
    GenerationError(String),
    #[error("Import error: {0}")]
    ImportError(String),
    #[error("Request error: {0}")]
    RequestError(String),
    #[error("Response error: {0}")]
    ResponseError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Invalid image: {0}")]
    InvalidImage(String),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl VariationError {
    /// The bare message without the category prefix, as shown to the user.
    pub fn message(&self) -> String {
        match self {
            VariationError::ConfigError(msg)
            | VariationError::AnalysisError(msg)
            | VariationError::GenerationError(msg)
            | VariationError::ImportError(msg)
            | VariationError::RequestError(msg)
            | VariationError::ResponseError(msg)
            | VariationError::SerializationError(msg)
            | VariationError::InvalidImage(msg) => msg.clone(),
            VariationError::IoError(e) => e.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, VariationError>;
