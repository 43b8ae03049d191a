//! # Store Helpers
//!
//! This module provides a centralized place for handling operations on the
//! application tables (courses, lessons, profiles, personalized lesson
//! descriptions). All functions operate on a borrowed `turso::Connection` so
//! callers control connection lifetime, and all row decoding goes through the
//! small helpers below to keep the query code uniform.

pub mod courses;
pub mod lessons;
pub mod personalizations;
pub mod profiles;

use thiserror::Error;
use turso::{Row, Value as TursoValue};

/// Custom error types for store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] turso::Error),
    #[error("Failed to decode row: {0}")]
    Decode(String),
    #[error("Invalid stored JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Reads a required integer column.
pub(crate) fn integer(row: &Row, idx: usize) -> Result<i64, StoreError> {
    match row.get_value(idx)? {
        TursoValue::Integer(i) => Ok(i),
        other => Err(StoreError::Decode(format!(
            "expected integer in column {idx}, got {other:?}"
        ))),
    }
}

/// Reads a required text column.
pub(crate) fn text(row: &Row, idx: usize) -> Result<String, StoreError> {
    match row.get_value(idx)? {
        TursoValue::Text(s) => Ok(s),
        other => Err(StoreError::Decode(format!(
            "expected text in column {idx}, got {other:?}"
        ))),
    }
}

/// Reads a nullable text column.
pub(crate) fn opt_text(row: &Row, idx: usize) -> Result<Option<String>, StoreError> {
    match row.get_value(idx)? {
        TursoValue::Text(s) => Ok(Some(s)),
        TursoValue::Null => Ok(None),
        other => Err(StoreError::Decode(format!(
            "expected text or null in column {idx}, got {other:?}"
        ))),
    }
}
