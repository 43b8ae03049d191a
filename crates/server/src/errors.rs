use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;
use uroki::{store::StoreError, PersonalizeError};

/// A custom error type for the server application.
///
/// Only errors that should surface as HTTP error statuses live here.
/// Not-found outcomes on the personalization endpoint are handled inside the
/// handlers as fail-soft envelopes and never reach this type.
pub enum AppError {
    /// A required request field is missing or invalid.
    Validation(String),
    /// Errors originating from the `uroki` library.
    Personalize(PersonalizeError),
    /// Unexpected persistence failures.
    Store(StoreError),
    /// Generic internal server errors.
    Internal(anyhow::Error),
}

impl From<PersonalizeError> for AppError {
    fn from(err: PersonalizeError) -> Self {
        AppError::Personalize(err)
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Store(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, error_message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Personalize(err) => {
                error!("PersonalizeError: {:?}", err);
                match err {
                    PersonalizeError::MissingAiProvider(_) => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Server is not configured correctly.".to_string(),
                    ),
                    PersonalizeError::AiRequest(e) => (
                        StatusCode::BAD_GATEWAY,
                        format!("Request to AI provider failed: {e}"),
                    ),
                    PersonalizeError::AiDeserialization(e) => (
                        StatusCode::BAD_GATEWAY,
                        format!("Failed to deserialize AI provider response: {e}"),
                    ),
                    PersonalizeError::AiApi(e) => {
                        (StatusCode::BAD_GATEWAY, format!("AI provider error: {e}"))
                    }
                    PersonalizeError::StorageConnection(e) => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("Storage provider connection error: {e}"),
                    ),
                    PersonalizeError::StorageOperationFailed(e) => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("Storage operation failed: {e}"),
                    ),
                    PersonalizeError::JsonSerialization(e) => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("Failed to serialize result: {e}"),
                    ),
                    PersonalizeError::ReqwestClientBuild(e) => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("Failed to build HTTP client: {e}"),
                    ),
                }
            }
            AppError::Store(err) => {
                error!("Store error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A storage error occurred.".to_string(),
                )
            }
            AppError::Internal(err) => {
                error!("Internal server error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred.".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status_code, body).into_response()
    }
}
