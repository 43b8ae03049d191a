use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The request body for `POST /lesson/personalize`.
///
/// `lesson` is the primary reference: a sequence number or a title fragment.
/// `title` is an optional secondary reference tried when `lesson` resolves
/// to nothing. `course` is optional; when absent the course stored on the
/// user's profile is used.
#[derive(Debug, Deserialize)]
pub struct PersonalizeRequest {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub lesson: String,
    pub title: Option<String>,
    pub course: Option<String>,
    #[serde(default)]
    pub flush: bool,
}

/// The fail-soft response envelope for `POST /lesson/personalize`.
///
/// The transport status is always 200 for resolvable requests; `ok` and
/// `status` describe the logical outcome, and `html` always carries a
/// renderable fragment.
#[derive(Debug, Serialize)]
pub struct PersonalizeResponse {
    pub ok: bool,
    pub html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cached: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PersonalizeResponse {
    pub fn ok(html: String, cached: Option<bool>) -> Self {
        Self {
            ok: true,
            html,
            cached,
            status: None,
            error: None,
        }
    }

    pub fn not_found(html: String, error: impl Into<String>) -> Self {
        Self {
            ok: false,
            html,
            cached: None,
            status: Some(404),
            error: Some(error.into()),
        }
    }
}

/// The request body for `POST /survey`.
///
/// Everything besides `course` and `user_id` is treated as a free-form
/// survey answer and stored verbatim on the profile.
#[derive(Debug, Deserialize)]
pub struct SurveyRequest {
    #[serde(default)]
    pub course: String,
    pub user_id: Option<String>,
    #[serde(flatten)]
    pub answers: Map<String, Value>,
}

/// The response body for `POST /survey`.
#[derive(Debug, Serialize)]
pub struct SurveyResponse {
    pub ok: bool,
    pub profile_id: i64,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_html: Option<String>,
}

/// The request body for `POST /personalizations`.
#[derive(Debug, Deserialize)]
pub struct UpsertPersonalizationRequest {
    pub profile_id: i64,
    pub lesson_id: i64,
    pub content: Value,
}
