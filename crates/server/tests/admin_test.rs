//! # Personalization CRUD Tests
//!
//! End-to-end tests for the manual maintenance endpoints: upsert, verbatim
//! round-trip reads, the legacy-table read fallback, and deletion.

mod common;

use anyhow::Result;
use common::TestApp;
use serde_json::{json, Value};
use uroki_test_utils::{
    seed_course_sql, seed_legacy_description_sql, seed_lesson_sql, seed_profile_sql,
};

async fn seed_base(app: &TestApp) -> Result<()> {
    let mut sql = String::new();
    sql.push_str(&seed_course_sql(1, "massazh-shvz", "Массаж ШВЗ"));
    sql.push_str(&seed_lesson_sql(10, 1, 1, "Разогрев зоны", None));
    sql.push_str(&seed_profile_sql(
        100,
        "user-1",
        "massazh-shvz",
        &json!({"real_name": "Мария"}),
    ));
    app.seed(&sql).await
}

#[tokio::test]
async fn upsert_requires_existing_profile_and_lesson() -> Result<()> {
    let app = TestApp::spawn().await?;
    seed_base(&app).await?;

    let response = app
        .client
        .post(format!("{}/personalizations", app.address))
        .json(&json!({ "profile_id": 999, "lesson_id": 10, "content": {} }))
        .send()
        .await?;
    assert_eq!(response.status(), 400);

    let response = app
        .client
        .post(format!("{}/personalizations", app.address))
        .json(&json!({ "profile_id": 100, "lesson_id": 999, "content": {} }))
        .send()
        .await?;
    assert_eq!(response.status(), 400);
    Ok(())
}

#[tokio::test]
async fn saved_content_round_trips_unchanged() -> Result<()> {
    let app = TestApp::spawn().await?;
    seed_base(&app).await?;

    let content = json!({
        "greeting": "Мария, привет!",
        "why_watch": "Потому что.",
        "key_points": ["раз", "два"],
        "personal_tip": "Совет",
        "practice": "Практика",
        "motivation": "Мотивация",
        "cta": "Вперёд"
    });

    let response = app
        .client
        .post(format!("{}/personalizations", app.address))
        .json(&json!({ "profile_id": 100, "lesson_id": 10, "content": content }))
        .send()
        .await?;
    assert!(response.status().is_success());

    let body: Value = app
        .client
        .get(format!("{}/personalizations/100/10", app.address))
        .send()
        .await?
        .json()
        .await?;

    assert_eq!(body["ok"], true);
    assert_eq!(body["content"], content);
    Ok(())
}

#[tokio::test]
async fn upsert_replaces_previous_content() -> Result<()> {
    let app = TestApp::spawn().await?;
    seed_base(&app).await?;

    for greeting in ["Первая версия", "Вторая версия"] {
        let response = app
            .client
            .post(format!("{}/personalizations", app.address))
            .json(&json!({
                "profile_id": 100,
                "lesson_id": 10,
                "content": { "greeting": greeting }
            }))
            .send()
            .await?;
        assert!(response.status().is_success());
    }

    let body: Value = app
        .client
        .get(format!("{}/personalizations/100/10", app.address))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(body["content"]["greeting"], "Вторая версия");
    assert_eq!(
        app.count_rows("personalized_lesson_descriptions").await?,
        1
    );
    Ok(())
}

#[tokio::test]
async fn missing_row_falls_back_to_legacy_table_then_404() -> Result<()> {
    let app = TestApp::spawn().await?;
    seed_base(&app).await?;

    // Nothing stored anywhere yet.
    let response = app
        .client
        .get(format!("{}/personalizations/100/10", app.address))
        .send()
        .await?;
    assert_eq!(response.status(), 404);

    // A legacy row becomes reachable through the same endpoint.
    let legacy = json!({
        "intro": "Привет!",
        "benefit": "Польза",
        "bullets": "раз\nдва",
        "advice": "Совет",
        "homework": "Домашка"
    });
    app.seed(&seed_legacy_description_sql(10, 100, &legacy)).await?;

    let body: Value = app
        .client
        .get(format!("{}/personalizations/100/10", app.address))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(body["ok"], true);
    assert_eq!(body["legacy"], true);
    assert_eq!(body["content"], legacy);
    Ok(())
}

#[tokio::test]
async fn delete_removes_the_row() -> Result<()> {
    let app = TestApp::spawn().await?;
    seed_base(&app).await?;

    app.client
        .post(format!("{}/personalizations", app.address))
        .json(&json!({ "profile_id": 100, "lesson_id": 10, "content": { "greeting": "x" } }))
        .send()
        .await?;

    let body: Value = app
        .client
        .delete(format!("{}/personalizations/100/10", app.address))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(body["deleted"], 1);

    let response = app
        .client
        .get(format!("{}/personalizations/100/10", app.address))
        .send()
        .await?;
    assert_eq!(response.status(), 404);
    Ok(())
}
