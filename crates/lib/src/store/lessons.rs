use super::{integer, opt_text, text, StoreError};
use turso::{params, Connection, Row};

/// A lesson within a course. `position` is the sequence number, unique
/// within the course. `default_description` is the static, non-personalized
/// template used as fallback and LLM input.
#[derive(Debug, Clone)]
pub struct Lesson {
    pub id: i64,
    pub course_id: i64,
    pub position: i64,
    pub title: String,
    pub summary: Option<String>,
    pub transcript: Option<String>,
    pub default_description: Option<String>,
}

const LESSON_COLUMNS: &str =
    "id, course_id, position, title, summary, transcript, default_description";

fn decode(row: &Row) -> Result<Lesson, StoreError> {
    Ok(Lesson {
        id: integer(row, 0)?,
        course_id: integer(row, 1)?,
        position: integer(row, 2)?,
        title: text(row, 3)?,
        summary: opt_text(row, 4)?,
        transcript: opt_text(row, 5)?,
        default_description: opt_text(row, 6)?,
    })
}

/// Finds a lesson by its sequence number within a course.
pub async fn find_by_position(
    conn: &Connection,
    course_id: i64,
    position: i64,
) -> Result<Option<Lesson>, StoreError> {
    let sql =
        format!("SELECT {LESSON_COLUMNS} FROM lessons WHERE course_id = ? AND position = ?");
    let mut rows = conn.query(&sql, params![course_id, position]).await?;
    match rows.next().await? {
        Some(row) => Ok(Some(decode(&row)?)),
        None => Ok(None),
    }
}

/// Finds a lesson by case-insensitive partial title match, scoped to one
/// course to avoid cross-course collisions. The earliest matching lesson
/// wins when several titles contain the fragment.
pub async fn find_by_title(
    conn: &Connection,
    course_id: i64,
    title_fragment: &str,
) -> Result<Option<Lesson>, StoreError> {
    let pattern = format!("%{}%", title_fragment.trim().to_lowercase());
    let sql = format!(
        "SELECT {LESSON_COLUMNS} FROM lessons
         WHERE course_id = ? AND LOWER(title) LIKE ?
         ORDER BY position LIMIT 1"
    );
    let mut rows = conn.query(&sql, params![course_id, pattern]).await?;
    match rows.next().await? {
        Some(row) => Ok(Some(decode(&row)?)),
        None => Ok(None),
    }
}

/// Fetches a lesson by its primary key.
pub async fn get_by_id(conn: &Connection, lesson_id: i64) -> Result<Option<Lesson>, StoreError> {
    let sql = format!("SELECT {LESSON_COLUMNS} FROM lessons WHERE id = ?");
    let mut rows = conn.query(&sql, params![lesson_id]).await?;
    match rows.next().await? {
        Some(row) => Ok(Some(decode(&row)?)),
        None => Ok(None),
    }
}

/// Lists all lessons of a course in sequence order.
pub async fn list_by_course(
    conn: &Connection,
    course_id: i64,
) -> Result<Vec<Lesson>, StoreError> {
    let sql = format!(
        "SELECT {LESSON_COLUMNS} FROM lessons WHERE course_id = ? ORDER BY position"
    );
    let mut rows = conn.query(&sql, params![course_id]).await?;
    let mut lessons = Vec::new();
    while let Some(row) = rows.next().await? {
        lessons.push(decode(&row)?);
    }
    Ok(lessons)
}
