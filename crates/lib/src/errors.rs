use thiserror::Error;

/// Custom error types for the personalization library.
#[derive(Error, Debug)]
pub enum PersonalizeError {
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Request to AI provider failed: {0}")]
    AiRequest(reqwest::Error),
    #[error("Failed to deserialize AI provider response: {0}")]
    AiDeserialization(reqwest::Error),
    #[error("AI provider returned an error: {0}")]
    AiApi(String),
    #[error("An AI provider is required but was not configured: {0}")]
    MissingAiProvider(String),
    #[error("Storage provider connection error: {0}")]
    StorageConnection(String),
    #[error("Storage operation failed: {0}")]
    StorageOperationFailed(String),
    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),
}

impl From<turso::Error> for PersonalizeError {
    fn from(err: turso::Error) -> Self {
        PersonalizeError::StorageOperationFailed(err.to_string())
    }
}
