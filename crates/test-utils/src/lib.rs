//! # Shared Test Utilities
//!
//! Helpers used across the `uroki` integration tests: an isolated in-memory
//! database setup, a programmable mock AI provider, and seed-SQL builders
//! for courses, lessons and profiles.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use turso::Database;
use uroki::errors::PersonalizeError;
use uroki::providers::ai::AiProvider;

// --- Test Setup ---

/// A helper struct to manage database creation for each test.
pub struct TestSetup {
    pub db: Database,
}

impl TestSetup {
    /// Creates a new, isolated in-memory database and initializes the schema.
    pub async fn new() -> Result<Self> {
        let db = turso::Builder::new_local(":memory:").build().await?;
        let conn = db.connect()?;

        for statement in uroki::providers::db::sqlite::sql::ALL_TABLE_CREATION_SQL {
            conn.execute(statement, ()).await?;
        }

        Ok(Self { db })
    }
}

// --- Mock AI Provider ---

/// A call recorded by the `MockAiProvider`.
#[derive(Clone, Debug)]
pub struct RecordedCall {
    pub system_prompt: String,
    pub user_prompt: String,
    pub temperature: f32,
}

#[derive(Clone, Debug)]
pub struct MockAiProvider {
    responses: Arc<Mutex<Vec<(String, String)>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockAiProvider {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Pre-programs a response for prompts containing the given key.
    /// The key should be a unique substring of the user prompt.
    pub fn add_response(&self, key: &str, response: &str) {
        let mut responses = self.responses.lock().unwrap();
        responses.push((key.to_string(), response.to_string()));
    }

    /// Retrieves the recorded calls for assertion.
    pub fn get_calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockAiProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AiProvider for MockAiProvider {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        temperature: f32,
    ) -> Result<String, PersonalizeError> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(RecordedCall {
            system_prompt: system_prompt.to_string(),
            user_prompt: user_prompt.to_string(),
            temperature,
        });

        let responses = self.responses.lock().unwrap();
        for (key, response) in responses.iter() {
            if user_prompt.contains(key) {
                return Ok(response.clone());
            }
        }

        Err(PersonalizeError::AiApi(format!(
            "MockAiProvider: No response programmed for user prompt. Got: '{user_prompt}'"
        )))
    }
}

// --- Seed SQL builders ---

/// Escapes a string for embedding in a single-quoted SQL literal.
fn sql_quote(text: &str) -> String {
    text.replace('\'', "''")
}

/// Returns SQL inserting a course row.
pub fn seed_course_sql(id: i64, slug: &str, title: &str) -> String {
    format!(
        "INSERT INTO courses (id, slug, title) VALUES ({id}, '{}', '{}');",
        sql_quote(slug),
        sql_quote(title)
    )
}

/// Returns SQL inserting a lesson row.
pub fn seed_lesson_sql(
    id: i64,
    course_id: i64,
    position: i64,
    title: &str,
    default_description: Option<&str>,
) -> String {
    let description = match default_description {
        Some(d) => format!("'{}'", sql_quote(d)),
        None => "NULL".to_string(),
    };
    format!(
        "INSERT INTO lessons (id, course_id, position, title, default_description)
         VALUES ({id}, {course_id}, {position}, '{}', {description});",
        sql_quote(title)
    )
}

/// Returns SQL inserting a profile row.
pub fn seed_profile_sql(id: i64, user_id: &str, course_slug: &str, answers: &Value) -> String {
    format!(
        "INSERT INTO profiles (id, user_id, course_slug, answers)
         VALUES ({id}, '{}', '{}', '{}');",
        sql_quote(user_id),
        sql_quote(course_slug),
        sql_quote(&answers.to_string())
    )
}

/// Returns SQL inserting a legacy `lesson_descriptions` row.
pub fn seed_legacy_description_sql(lesson_id: i64, profile_id: i64, description: &Value) -> String {
    format!(
        "INSERT INTO lesson_descriptions (lesson_id, profile_id, description)
         VALUES ({lesson_id}, {profile_id}, '{}');",
        sql_quote(&description.to_string())
    )
}
