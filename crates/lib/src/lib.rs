//! # Uroki Core Library
//!
//! Core logic for the course-personalization service: the lesson content
//! schemas and normalizer, the deterministic fallback, prompt templates, AI
//! providers, the SQLite storage provider and store helpers, lookup
//! resolution, and HTML fragment rendering.

pub mod client;
pub mod content;
pub mod errors;
pub mod prompts;
pub mod providers;
pub mod render;
pub mod resolve;
pub mod store;

pub use client::{PersonalizeClient, PersonalizeClientBuilder};
pub use content::{normalize_content, LegacyContent, LessonContent, StoredContent};
pub use errors::PersonalizeError;
