use super::{integer, opt_text, text, StoreError};
use turso::{params, Connection};

/// A course: a collection of lessons identified by a slug.
#[derive(Debug, Clone)]
pub struct Course {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
}

/// Finds a course by its slug.
pub async fn find_by_slug(conn: &Connection, slug: &str) -> Result<Option<Course>, StoreError> {
    let mut rows = conn
        .query(
            "SELECT id, slug, title, description FROM courses WHERE slug = ?",
            params![slug],
        )
        .await?;

    match rows.next().await? {
        Some(row) => Ok(Some(Course {
            id: integer(&row, 0)?,
            slug: text(&row, 1)?,
            title: text(&row, 2)?,
            description: opt_text(&row, 3)?,
        })),
        None => Ok(None),
    }
}
