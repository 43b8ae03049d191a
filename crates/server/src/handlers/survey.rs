//! # Survey Submission Handler
//!
//! Accepts the one-time survey, creates (or refreshes) the student's
//! profile, and eagerly generates a personalization for every lesson in the
//! course. Each lesson is generated independently: one failure never aborts
//! the batch.

use crate::{
    errors::AppError,
    handlers::personalize::generate_and_store,
    state::AppState,
    types::{SurveyRequest, SurveyResponse},
};
use axum::{extract::State, Json};
use serde_json::Value;
use tracing::{info, warn};
use uroki::store::{courses, lessons, profiles};
use uuid::Uuid;

/// The handler for `POST /survey`.
pub async fn survey_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<SurveyRequest>,
) -> Result<Json<SurveyResponse>, AppError> {
    let course_slug = payload.course.trim();
    if course_slug.is_empty() {
        return Err(AppError::Validation("course is required".to_string()));
    }

    let conn = app_state.sqlite_provider.connect()?;
    let course = courses::find_by_slug(&conn, course_slug)
        .await?
        .ok_or_else(|| AppError::Validation(format!("Unknown course '{course_slug}'")))?;

    // Respondents arriving without an external uid get a generated guest
    // identifier, which keys their profile from then on.
    let user_id = payload
        .user_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("guest-{}", Uuid::new_v4()));

    let answers = Value::Object(payload.answers.clone());
    let profile_id = profiles::upsert(&conn, &user_id, &course.slug, &answers).await?;
    let profile = profiles::get_by_id(&conn, profile_id)
        .await?
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Profile vanished after upsert")))?;

    info!(
        user_id = %user_id,
        course = %course.slug,
        profile_id,
        "Survey accepted, starting best-effort generation batch"
    );

    // Best-effort pre-generation for the whole course. The first lesson's
    // rendering doubles as the preview shown right after submission.
    let mut preview_html = None;
    for lesson in lessons::list_by_course(&conn, course.id).await? {
        match generate_and_store(&app_state, &conn, &lesson, &profile).await {
            Ok(html) => {
                if preview_html.is_none() {
                    preview_html = Some(html);
                }
            }
            Err(_) => {
                warn!(
                    lesson_id = lesson.id,
                    profile_id, "Failed to store personalization for lesson, continuing batch"
                );
            }
        }
    }

    Ok(Json(SurveyResponse {
        ok: true,
        profile_id,
        user_id,
        preview_html,
    }))
}
