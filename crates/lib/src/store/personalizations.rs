use super::{integer, text, StoreError};
use serde_json::Value;
use tracing::info;
use turso::{params, Connection};

/// The per-profile, per-lesson rewritten description. `content` holds the
/// raw stored JSON object, which may still be in the legacy shape.
#[derive(Debug, Clone)]
pub struct Personalization {
    pub id: i64,
    pub profile_id: i64,
    pub lesson_id: i64,
    pub content: Value,
}

/// Fetches the stored personalization for a (profile, lesson) pair.
pub async fn get(
    conn: &Connection,
    profile_id: i64,
    lesson_id: i64,
) -> Result<Option<Personalization>, StoreError> {
    let mut rows = conn
        .query(
            "SELECT id, profile_id, lesson_id, content
             FROM personalized_lesson_descriptions
             WHERE profile_id = ? AND lesson_id = ?",
            params![profile_id, lesson_id],
        )
        .await?;

    match rows.next().await? {
        Some(row) => Ok(Some(Personalization {
            id: integer(&row, 0)?,
            profile_id: integer(&row, 1)?,
            lesson_id: integer(&row, 2)?,
            content: serde_json::from_str(&text(&row, 3)?)?,
        })),
        None => Ok(None),
    }
}

/// Inserts or replaces the personalization for a (profile, lesson) pair.
///
/// Concurrent writers are resolved by the database's upsert semantics:
/// last write wins.
pub async fn upsert(
    conn: &Connection,
    profile_id: i64,
    lesson_id: i64,
    content: &Value,
) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO personalized_lesson_descriptions (profile_id, lesson_id, content)
         VALUES (?, ?, ?)
         ON CONFLICT(profile_id, lesson_id) DO UPDATE SET
             content = excluded.content,
             updated_at = CURRENT_TIMESTAMP",
        params![profile_id, lesson_id, content.to_string()],
    )
    .await?;
    info!(profile_id, lesson_id, "Upserted personalization");
    Ok(())
}

/// Deletes the personalization for a (profile, lesson) pair. Returns the
/// number of rows removed.
pub async fn delete(
    conn: &Connection,
    profile_id: i64,
    lesson_id: i64,
) -> Result<u64, StoreError> {
    let affected = conn
        .execute(
            "DELETE FROM personalized_lesson_descriptions
             WHERE profile_id = ? AND lesson_id = ?",
            params![profile_id, lesson_id],
        )
        .await?;
    Ok(affected)
}

/// Fetches a description from the legacy `lesson_descriptions` table.
///
/// The legacy table is read-only: it is consulted when the current table has
/// no row, and its rows hold the old 5-field content shape.
pub async fn get_legacy(
    conn: &Connection,
    profile_id: i64,
    lesson_id: i64,
) -> Result<Option<Value>, StoreError> {
    let mut rows = conn
        .query(
            "SELECT description FROM lesson_descriptions
             WHERE profile_id = ? AND lesson_id = ?",
            params![profile_id, lesson_id],
        )
        .await?;

    match rows.next().await? {
        Some(row) => Ok(Some(serde_json::from_str(&text(&row, 0)?)?)),
        None => Ok(None),
    }
}
