//! # Manual Personalization CRUD Handlers
//!
//! Maintenance endpoints for creating, reading and deleting a stored
//! personalization by (profile, lesson) id. Reads fall back to the legacy
//! `lesson_descriptions` table so old rows stay reachable.

use crate::{errors::AppError, state::AppState, types::UpsertPersonalizationRequest};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::info;
use uroki::store::{lessons, personalizations, profiles};

/// The handler for `POST /personalizations`.
///
/// A personalization must reference an existing profile and lesson; requests
/// that do not are rejected. The content object is stored verbatim.
pub async fn upsert_personalization_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<UpsertPersonalizationRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let conn = app_state.sqlite_provider.connect()?;

    if profiles::get_by_id(&conn, payload.profile_id).await?.is_none() {
        return Err(AppError::Validation(format!(
            "Profile {} does not exist",
            payload.profile_id
        )));
    }
    if lessons::get_by_id(&conn, payload.lesson_id).await?.is_none() {
        return Err(AppError::Validation(format!(
            "Lesson {} does not exist",
            payload.lesson_id
        )));
    }
    if !payload.content.is_object() {
        return Err(AppError::Validation(
            "content must be a JSON object".to_string(),
        ));
    }

    personalizations::upsert(&conn, payload.profile_id, payload.lesson_id, &payload.content)
        .await?;

    Ok(Json(json!({
        "ok": true,
        "profile_id": payload.profile_id,
        "lesson_id": payload.lesson_id,
    })))
}

/// The handler for `GET /personalizations/{profile_id}/{lesson_id}`.
///
/// Returns the stored content verbatim. When the current table has no row,
/// the legacy table is consulted before reporting 404.
pub async fn get_personalization_handler(
    State(app_state): State<AppState>,
    Path((profile_id, lesson_id)): Path<(i64, i64)>,
) -> Result<Response, AppError> {
    let conn = app_state.sqlite_provider.connect()?;

    if let Some(stored) = personalizations::get(&conn, profile_id, lesson_id).await? {
        return Ok(Json(json!({ "ok": true, "content": stored.content })).into_response());
    }

    if let Some(legacy) = personalizations::get_legacy(&conn, profile_id, lesson_id).await? {
        info!(profile_id, lesson_id, "Serving personalization from legacy table");
        return Ok(Json(json!({ "ok": true, "content": legacy, "legacy": true })).into_response());
    }

    Ok((
        StatusCode::NOT_FOUND,
        Json(json!({ "ok": false, "error": "Personalization not found" })),
    )
        .into_response())
}

/// The handler for `DELETE /personalizations/{profile_id}/{lesson_id}`.
pub async fn delete_personalization_handler(
    State(app_state): State<AppState>,
    Path((profile_id, lesson_id)): Path<(i64, i64)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let conn = app_state.sqlite_provider.connect()?;
    let deleted = personalizations::delete(&conn, profile_id, lesson_id).await?;
    Ok(Json(json!({ "ok": true, "deleted": deleted })))
}
