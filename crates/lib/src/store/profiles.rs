use super::{integer, text, StoreError};
use serde_json::Value;
use tracing::info;
use turso::{params, Connection, Row};

/// A survey respondent's stored answers, scoped to one course.
#[derive(Debug, Clone)]
pub struct Profile {
    pub id: i64,
    pub user_id: String,
    pub course_slug: String,
    pub answers: Value,
}

fn decode(row: &Row) -> Result<Profile, StoreError> {
    Ok(Profile {
        id: integer(row, 0)?,
        user_id: text(row, 1)?,
        course_slug: text(row, 2)?,
        answers: serde_json::from_str(&text(row, 3)?)?,
    })
}

/// Finds a profile by the (user, course) pair. Profiles are never looked up
/// by user alone: one user may hold one profile per course.
pub async fn find_by_user_and_course(
    conn: &Connection,
    user_id: &str,
    course_slug: &str,
) -> Result<Option<Profile>, StoreError> {
    let mut rows = conn
        .query(
            "SELECT id, user_id, course_slug, answers FROM profiles
             WHERE user_id = ? AND course_slug = ?",
            params![user_id, course_slug],
        )
        .await?;
    match rows.next().await? {
        Some(row) => Ok(Some(decode(&row)?)),
        None => Ok(None),
    }
}

/// Finds the most recently created profile for a user, across courses.
/// Used only to recover a course slug when the request omits one.
pub async fn find_latest_by_user(
    conn: &Connection,
    user_id: &str,
) -> Result<Option<Profile>, StoreError> {
    let mut rows = conn
        .query(
            "SELECT id, user_id, course_slug, answers FROM profiles
             WHERE user_id = ? ORDER BY id DESC LIMIT 1",
            params![user_id],
        )
        .await?;
    match rows.next().await? {
        Some(row) => Ok(Some(decode(&row)?)),
        None => Ok(None),
    }
}

/// Fetches a profile by its primary key.
pub async fn get_by_id(conn: &Connection, profile_id: i64) -> Result<Option<Profile>, StoreError> {
    let mut rows = conn
        .query(
            "SELECT id, user_id, course_slug, answers FROM profiles WHERE id = ?",
            params![profile_id],
        )
        .await?;
    match rows.next().await? {
        Some(row) => Ok(Some(decode(&row)?)),
        None => Ok(None),
    }
}

/// Inserts or updates the profile for a (user, course) pair and returns its
/// id. Resubmitting the survey replaces the stored answers.
pub async fn upsert(
    conn: &Connection,
    user_id: &str,
    course_slug: &str,
    answers: &Value,
) -> Result<i64, StoreError> {
    let mut rows = conn
        .query(
            "INSERT INTO profiles (user_id, course_slug, answers) VALUES (?, ?, ?)
             ON CONFLICT(user_id, course_slug) DO UPDATE SET answers = excluded.answers
             RETURNING id",
            params![user_id, course_slug, answers.to_string()],
        )
        .await?;

    let row = rows.next().await?.ok_or_else(|| {
        StoreError::Decode("profile upsert did not return an id".to_string())
    })?;
    let id = integer(&row, 0)?;
    info!(user_id, course_slug, profile_id = id, "Upserted profile");
    Ok(id)
}
