//! # Lesson Personalization Handler
//!
//! The public HTML-embedding endpoint. The guiding policy is "fail soft":
//! every resolvable outcome, including missing lessons and missing profiles,
//! is answered with HTTP 200 and a renderable HTML fragment, so the
//! embedding page never sees a broken state.

use crate::{
    errors::AppError,
    state::AppState,
    types::{PersonalizeRequest, PersonalizeResponse},
};
use axum::{extract::State, Json};
use tracing::{info, warn};
use uroki::{
    render,
    resolve::{resolve_course, resolve_lesson, resolve_profile},
    store::{lessons::Lesson, personalizations, profiles::Profile},
    StoredContent,
};

/// The handler for `POST /lesson/personalize`.
pub async fn personalize_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<PersonalizeRequest>,
) -> Result<Json<PersonalizeResponse>, AppError> {
    if payload.user_id.trim().is_empty() {
        return Err(AppError::Validation("user_id is required".to_string()));
    }
    if payload.lesson.trim().is_empty() {
        return Err(AppError::Validation("lesson is required".to_string()));
    }
    info!(
        user_id = %payload.user_id,
        lesson = %payload.lesson,
        course = ?payload.course,
        flush = payload.flush,
        "Received personalization request"
    );

    let conn = app_state.sqlite_provider.connect()?;

    // --- Course resolution: explicit slug, then the profile's slug. ---
    let course = match resolve_course(&conn, payload.course.as_deref(), &payload.user_id).await? {
        Some(course) => course,
        None => {
            return Ok(Json(PersonalizeResponse::not_found(
                render::render_error("Курс не найден. Укажите курс или заполните анкету."),
                "course not found",
            )));
        }
    };

    // --- Lesson resolution: `lesson` first, then the `title` hint. ---
    let mut lesson = resolve_lesson(&conn, course.id, &payload.lesson).await?;
    if lesson.is_none() {
        if let Some(title) = payload.title.as_deref() {
            lesson = resolve_lesson(&conn, course.id, title).await?;
        }
    }
    let lesson = match lesson {
        Some(lesson) => lesson,
        None => {
            return Ok(Json(PersonalizeResponse::not_found(
                render::render_not_found(&payload.lesson),
                "lesson not found",
            )));
        }
    };

    // --- Profile resolution, scoped to the (user, course) pair. ---
    let profile = match resolve_profile(&conn, &payload.user_id, &course.slug).await? {
        Some(profile) => profile,
        None => {
            // No survey yet: serve the static template when the author wrote
            // one, otherwise ask the student to fill out the survey.
            let html = match lesson.default_description.as_deref() {
                Some(description) if !description.trim().is_empty() => {
                    render::render_static_description(description)
                }
                _ => render::render_survey_prompt(),
            };
            return Ok(Json(PersonalizeResponse::ok(html, None)));
        }
    };

    if payload.flush {
        let removed = personalizations::delete(&conn, profile.id, lesson.id).await?;
        if removed > 0 {
            info!(profile_id = profile.id, lesson_id = lesson.id, "Flushed personalization");
        }
    } else if let Some(stored) = personalizations::get(&conn, profile.id, lesson.id).await? {
        match StoredContent::from_value(&stored.content) {
            Ok(content) => {
                let html = render::render_content(&content.migrate());
                return Ok(Json(PersonalizeResponse::ok(html, Some(true))));
            }
            Err(e) => {
                // An undecodable row is treated as absent and regenerated.
                warn!(
                    profile_id = profile.id,
                    lesson_id = lesson.id,
                    error = %e,
                    "Stored personalization is undecodable, regenerating"
                );
            }
        }
    }

    let html = generate_and_store(&app_state, &conn, &lesson, &profile).await?;
    Ok(Json(PersonalizeResponse::ok(html, Some(false))))
}

/// Generates a personalization, stores it, and renders it.
///
/// Generation itself never fails (the client falls back internally); only
/// persistence errors propagate.
pub(crate) async fn generate_and_store(
    app_state: &AppState,
    conn: &turso::Connection,
    lesson: &Lesson,
    profile: &Profile,
) -> Result<String, AppError> {
    let content = app_state
        .personalize_client
        .personalize(lesson, &profile.answers)
        .await;
    let content_value = serde_json::to_value(&content).map_err(uroki::PersonalizeError::from)?;
    personalizations::upsert(conn, profile.id, lesson.id, &content_value).await?;
    Ok(render::render_content(&content))
}
