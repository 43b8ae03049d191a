//! Tests for course/lesson/profile lookup resolution against an in-memory
//! SQLite database.

use anyhow::Result;
use uroki::providers::db::sqlite::SqliteProvider;
use uroki::resolve::{resolve_course, resolve_lesson, resolve_profile};

/// Two courses sharing lesson positions and similar titles, plus one profile.
const SEED_SQL: &str = "
    INSERT INTO courses (id, slug, title) VALUES (1, 'massazh-shvz', 'Массаж ШВЗ');
    INSERT INTO courses (id, slug, title) VALUES (2, 'massazh-spiny', 'Массаж спины');
    INSERT INTO lessons (id, course_id, position, title) VALUES (10, 1, 1, 'Разогрев зоны');
    INSERT INTO lessons (id, course_id, position, title) VALUES (11, 1, 2, 'Глубокая проработка');
    INSERT INTO lessons (id, course_id, position, title) VALUES (20, 2, 1, 'Разогрев спины');
    INSERT INTO profiles (id, user_id, course_slug, answers)
        VALUES (100, 'user-1', 'massazh-shvz', '{\"real_name\":\"Мария\"}');
";

async fn setup() -> Result<SqliteProvider> {
    let provider = SqliteProvider::new(":memory:").await?;
    provider.initialize_schema().await?;
    provider.initialize_with_data(SEED_SQL).await?;
    Ok(provider)
}

#[tokio::test]
async fn numeric_reference_resolves_by_position_scoped_to_course() -> Result<()> {
    let provider = setup().await?;
    let conn = provider.connect()?;

    // Both courses have a lesson at position 1; the resolved lesson must
    // belong to the requested course.
    let lesson = resolve_lesson(&conn, 1, "1").await?.expect("lesson");
    assert_eq!(lesson.id, 10);
    let lesson = resolve_lesson(&conn, 2, "1").await?.expect("lesson");
    assert_eq!(lesson.id, 20);

    // A position that only exists in the other course must not leak.
    assert!(resolve_lesson(&conn, 2, "2").await?.is_none());
    Ok(())
}

#[tokio::test]
async fn text_reference_resolves_by_partial_title_case_insensitive() -> Result<()> {
    let provider = setup().await?;
    let conn = provider.connect()?;

    let lesson = resolve_lesson(&conn, 1, "глубокая").await?.expect("lesson");
    assert_eq!(lesson.id, 11);

    // "Разогрев" matches a title in both courses; scoping picks the right one.
    let lesson = resolve_lesson(&conn, 2, "разогрев").await?.expect("lesson");
    assert_eq!(lesson.id, 20);

    assert!(resolve_lesson(&conn, 1, "несуществующий").await?.is_none());
    Ok(())
}

#[tokio::test]
async fn blank_reference_resolves_to_nothing() -> Result<()> {
    let provider = setup().await?;
    let conn = provider.connect()?;
    assert!(resolve_lesson(&conn, 1, "   ").await?.is_none());
    Ok(())
}

#[tokio::test]
async fn explicit_course_slug_takes_precedence() -> Result<()> {
    let provider = setup().await?;
    let conn = provider.connect()?;

    // user-1's profile points at massazh-shvz, but the explicit slug wins.
    let course = resolve_course(&conn, Some("massazh-spiny"), "user-1")
        .await?
        .expect("course");
    assert_eq!(course.slug, "massazh-spiny");
    Ok(())
}

#[tokio::test]
async fn course_falls_back_to_profile_slug() -> Result<()> {
    let provider = setup().await?;
    let conn = provider.connect()?;

    let course = resolve_course(&conn, None, "user-1").await?.expect("course");
    assert_eq!(course.slug, "massazh-shvz");

    // Unknown user, no explicit slug: nothing to resolve.
    assert!(resolve_course(&conn, None, "stranger").await?.is_none());
    Ok(())
}

#[tokio::test]
async fn profile_is_scoped_to_user_and_course() -> Result<()> {
    let provider = setup().await?;
    let conn = provider.connect()?;

    let profile = resolve_profile(&conn, "user-1", "massazh-shvz")
        .await?
        .expect("profile");
    assert_eq!(profile.id, 100);
    assert_eq!(profile.answers["real_name"], "Мария");

    // Same user, different course: no profile.
    assert!(resolve_profile(&conn, "user-1", "massazh-spiny")
        .await?
        .is_none());
    Ok(())
}
