//! # Default Prompt Templates
//!
//! This module contains the default prompt templates used by the
//! `PersonalizeClient`. These can be overridden at runtime through the
//! server's `generation` configuration section.

/// The default system prompt for the personalization task.
///
/// This prompt sets the persona and the strict output contract: a single JSON
/// object in the current content shape, nothing else.
pub const PERSONALIZE_SYSTEM_PROMPT: &str = "You are a course methodologist who rewrites lesson descriptions for one specific student. \
    You will receive the lesson material and the student's survey answers. \
    Write in the same language as the lesson material, address the student personally, and keep every claim grounded in the lesson material. \
    Your entire output must be a single JSON object with exactly these keys: \
    \"greeting\" (string), \"why_watch\" (string), \"key_points\" (array of short strings), \
    \"personal_tip\" (string), \"practice\" (string), \"motivation\" (string), \"cta\" (string). \
    Do not add any explanations, introductory text, or markdown formatting.";

/// The default user prompt for the personalization task.
///
/// Placeholders: `{lesson_title}`, `{lesson_material}`, `{survey}`
pub const PERSONALIZE_USER_PROMPT: &str = r#"# Lesson title
{lesson_title}

# Lesson material
{lesson_material}

# Student survey answers (JSON)
{survey}
"#;

/// Builds the user prompt from a template and the lesson/survey inputs.
///
/// The lesson material is the transcript when one exists, otherwise the
/// static template description ("рыба") the course author wrote.
pub fn build_user_prompt(
    template: &str,
    lesson_title: &str,
    lesson_material: &str,
    survey: &serde_json::Value,
) -> String {
    template
        .replace("{lesson_title}", lesson_title)
        .replace("{lesson_material}", lesson_material)
        .replace("{survey}", &survey.to_string())
}
