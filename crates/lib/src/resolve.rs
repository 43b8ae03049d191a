//! # Lookup Resolution
//!
//! Deterministic resolution of the records behind a personalization request:
//! course, lesson and profile. The embedding page sends loosely-typed
//! references (a course slug may be absent, a lesson reference may be a
//! sequence number or a title fragment), and this module pins them down to
//! single rows or a well-defined "not found".

use crate::store::{
    courses::{self, Course},
    lessons::{self, Lesson},
    profiles::{self, Profile},
    StoreError,
};
use tracing::debug;
use turso::Connection;

/// Resolves the course for a request.
///
/// An explicit course slug takes precedence. When absent, the slug stored on
/// the user's most recent profile is used. Returns `None` when neither
/// resolves to a stored course.
pub async fn resolve_course(
    conn: &Connection,
    explicit_slug: Option<&str>,
    user_id: &str,
) -> Result<Option<Course>, StoreError> {
    if let Some(slug) = explicit_slug.map(str::trim).filter(|s| !s.is_empty()) {
        return courses::find_by_slug(conn, slug).await;
    }

    match profiles::find_latest_by_user(conn, user_id).await? {
        Some(profile) => {
            debug!(
                user_id,
                course_slug = %profile.course_slug,
                "No explicit course, falling back to profile's course"
            );
            courses::find_by_slug(conn, &profile.course_slug).await
        }
        None => Ok(None),
    }
}

/// Resolves a lesson reference within a course.
///
/// A purely numeric reference is looked up by (course, sequence number);
/// anything else by case-insensitive partial title match. Both lookups are
/// strictly scoped to the given course so that two courses sharing lesson
/// numbers or similar titles never collide.
pub async fn resolve_lesson(
    conn: &Connection,
    course_id: i64,
    reference: &str,
) -> Result<Option<Lesson>, StoreError> {
    let reference = reference.trim();
    if reference.is_empty() {
        return Ok(None);
    }

    if let Ok(position) = reference.parse::<i64>() {
        return lessons::find_by_position(conn, course_id, position).await;
    }
    lessons::find_by_title(conn, course_id, reference).await
}

/// Resolves the profile for a (user, course) pair.
pub async fn resolve_profile(
    conn: &Connection,
    user_id: &str,
    course_slug: &str,
) -> Result<Option<Profile>, StoreError> {
    profiles::find_by_user_and_course(conn, user_id, course_slug).await
}
