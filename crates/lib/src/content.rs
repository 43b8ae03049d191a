//! # Lesson Content Schemas
//!
//! This module defines the two historical shapes of personalized lesson
//! content and the logic that keeps the rest of the application on a single
//! shape:
//!
//! - `LessonContent`: the current 7-field shape produced by generation.
//! - `LegacyContent`: the old 5-field flat shape still present in stored rows.
//! - `StoredContent`: a tagged union over both, with an explicit migration
//!   function so that key-presence sniffing happens in exactly one place.
//! - `normalize_content`: coerces whatever JSON the LLM returned into a
//!   complete `LessonContent`, filling gaps from a deterministic fallback.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The current personalized description shape.
///
/// Every field is expected to be non-empty after normalization, except when a
/// value was migrated from the legacy shape, which has no equivalent for
/// `practice`, `motivation` and `cta`. The renderer skips empty fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LessonContent {
    #[serde(default)]
    pub greeting: String,
    #[serde(default)]
    pub why_watch: String,
    #[serde(default)]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub personal_tip: String,
    #[serde(default)]
    pub practice: String,
    #[serde(default)]
    pub motivation: String,
    #[serde(default)]
    pub cta: String,
}

/// The legacy flat shape used before the content schema was extended.
///
/// `bullets` holds what is now `key_points` as a single newline-joined string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegacyContent {
    #[serde(default)]
    pub intro: String,
    #[serde(default)]
    pub benefit: String,
    #[serde(default)]
    pub bullets: String,
    #[serde(default)]
    pub advice: String,
    #[serde(default)]
    pub homework: String,
}

/// A stored content object in either of the two historical shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredContent {
    Current(LessonContent),
    Legacy(LegacyContent),
}

impl StoredContent {
    /// Detects the shape of a stored JSON object by key presence.
    ///
    /// A row is considered legacy when it carries the old `intro` key and
    /// none of the current keys. Anything else is treated as (possibly
    /// partial) current-shape content and left to the normalizer.
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        let is_legacy = value
            .as_object()
            .map(|obj| obj.contains_key("intro") && !obj.contains_key("greeting"))
            .unwrap_or(false);

        if is_legacy {
            Ok(StoredContent::Legacy(serde_json::from_value(
                value.clone(),
            )?))
        } else {
            Ok(StoredContent::Current(serde_json::from_value(
                value.clone(),
            )?))
        }
    }

    /// Migrates either shape to the current one.
    ///
    /// Legacy mapping: `intro` → `greeting`, `benefit` → `why_watch`,
    /// `bullets` → `key_points` (split on line breaks), `advice` →
    /// `personal_tip`. `homework` has no equivalent and is dropped. Fields
    /// introduced after the legacy shape stay empty and are omitted by the
    /// renderer.
    pub fn migrate(self) -> LessonContent {
        match self {
            StoredContent::Current(content) => content,
            StoredContent::Legacy(legacy) => LessonContent {
                greeting: legacy.intro,
                why_watch: legacy.benefit,
                key_points: split_lines(&legacy.bullets),
                personal_tip: legacy.advice,
                ..Default::default()
            },
        }
    }
}

/// Splits a multi-line string into trimmed, non-empty lines.
fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| line.trim_start_matches(['-', '•', '*']).trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

/// Picks a string field from a raw JSON object, falling back when the field
/// is absent, not a string, or blank.
fn string_or(raw: &Value, key: &str, fallback: &str) -> String {
    match raw.get(key).and_then(Value::as_str) {
        Some(s) if !s.trim().is_empty() => s.trim().to_string(),
        _ => fallback.to_string(),
    }
}

/// Coerces a raw JSON field into a list of strings.
///
/// Accepts a proper array (non-string elements are stringified), or a
/// multi-line string which is split on newlines as a best-effort recovery.
/// Anything else yields the fallback list.
fn string_list_or(raw: &Value, key: &str, fallback: &[String]) -> Vec<String> {
    let coerced = match raw.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => {
                    let s = s.trim();
                    (!s.is_empty()).then(|| s.to_string())
                }
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect::<Vec<_>>(),
        Some(Value::String(s)) => split_lines(s),
        _ => Vec::new(),
    };

    if coerced.is_empty() {
        fallback.to_vec()
    } else {
        coerced
    }
}

/// Merges raw LLM output with a deterministic fallback into a complete
/// `LessonContent`.
///
/// Every expected field in the result is present: string fields default to
/// the fallback string when absent or empty, and `key_points` is coerced to
/// an array. The fallback object is expected to be fully populated, so the
/// output is safe to render no matter how partial or malformed the raw
/// object was.
pub fn normalize_content(raw: &Value, fallback: &LessonContent) -> LessonContent {
    LessonContent {
        greeting: string_or(raw, "greeting", &fallback.greeting),
        why_watch: string_or(raw, "why_watch", &fallback.why_watch),
        key_points: string_list_or(raw, "key_points", &fallback.key_points),
        personal_tip: string_or(raw, "personal_tip", &fallback.personal_tip),
        practice: string_or(raw, "practice", &fallback.practice),
        motivation: string_or(raw, "motivation", &fallback.motivation),
        cta: string_or(raw, "cta", &fallback.cta),
    }
}

/// Builds the deterministic fallback content for a lesson and survey.
///
/// This is assembled purely from static template fields (the lesson's
/// title, summary and default description) plus a simple name substitution
/// from the survey answers. It is used both as the merge fallback for
/// partial LLM output and as the final content when generation fails
/// entirely.
pub fn fallback_content(
    lesson_title: &str,
    lesson_summary: Option<&str>,
    default_description: Option<&str>,
    survey: &Value,
) -> LessonContent {
    let name = survey
        .get("real_name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let greeting = match name {
        Some(name) => format!("Здравствуйте, {name}!"),
        None => "Здравствуйте!".to_string(),
    };

    let template = default_description.unwrap_or_default();
    let why_watch = lesson_summary
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| {
            template
                .lines()
                .map(str::trim)
                .find(|line| !line.is_empty())
                .unwrap_or(lesson_title)
                .to_string()
        });

    let mut key_points = split_lines(template);
    key_points.truncate(5);
    if key_points.is_empty() {
        key_points.push(lesson_title.to_string());
    }

    LessonContent {
        greeting,
        why_watch,
        key_points,
        personal_tip: "Смотрите урок внимательно и делайте паузы, чтобы повторить показанное."
            .to_string(),
        practice: "Сразу после просмотра повторите основные приёмы из урока.".to_string(),
        motivation: "Каждый пройденный урок приближает вас к результату.".to_string(),
        cta: format!("Переходите к уроку «{lesson_title}»."),
    }
}
