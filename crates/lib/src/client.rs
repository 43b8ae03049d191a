//! # Personalization Client
//!
//! Wires an `AiProvider` to the prompt/normalize/fallback pipeline. The
//! client is deliberately fail-soft: `personalize` always returns a complete,
//! renderable content object, substituting the deterministic fallback when
//! the model misbehaves.

use crate::{
    content::{fallback_content, normalize_content, LessonContent},
    errors::PersonalizeError,
    prompts::{build_user_prompt, PERSONALIZE_SYSTEM_PROMPT, PERSONALIZE_USER_PROMPT},
    providers::ai::AiProvider,
    store::lessons::Lesson,
};
use serde_json::Value;
use tracing::{debug, warn};

/// Sampling temperature for the first generation attempt.
const DEFAULT_TEMPERATURE: f32 = 0.7;
/// Sampling temperature for the single retry after an unusable response.
const RETRY_TEMPERATURE: f32 = 0.2;

/// A client that generates personalized lesson descriptions.
pub struct PersonalizeClient {
    ai_provider: Box<dyn AiProvider>,
    system_prompt: String,
    user_prompt_template: String,
}

/// A builder for creating `PersonalizeClient` instances.
#[derive(Default)]
pub struct PersonalizeClientBuilder {
    ai_provider: Option<Box<dyn AiProvider>>,
    system_prompt: Option<String>,
    user_prompt_template: Option<String>,
}

impl PersonalizeClientBuilder {
    /// Creates a new `PersonalizeClientBuilder`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the AI provider.
    pub fn ai_provider(mut self, provider: Box<dyn AiProvider>) -> Self {
        self.ai_provider = Some(provider);
        self
    }

    /// Overrides the default system prompt.
    pub fn system_prompt(mut self, prompt: String) -> Self {
        self.system_prompt = Some(prompt);
        self
    }

    /// Overrides the default user prompt template.
    pub fn user_prompt_template(mut self, template: String) -> Self {
        self.user_prompt_template = Some(template);
        self
    }

    /// Builds the `PersonalizeClient`.
    pub fn build(self) -> Result<PersonalizeClient, PersonalizeError> {
        let ai_provider = self.ai_provider.ok_or_else(|| {
            PersonalizeError::MissingAiProvider(
                "PersonalizeClient requires an AI provider".to_string(),
            )
        })?;
        Ok(PersonalizeClient {
            ai_provider,
            system_prompt: self
                .system_prompt
                .unwrap_or_else(|| PERSONALIZE_SYSTEM_PROMPT.to_string()),
            user_prompt_template: self
                .user_prompt_template
                .unwrap_or_else(|| PERSONALIZE_USER_PROMPT.to_string()),
        })
    }
}

/// Strips markdown code fences from an LLM response.
fn clean_json_response(raw: &str) -> &str {
    let trimmed = raw.trim();
    let trimmed = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    trimmed.strip_suffix("```").unwrap_or(trimmed).trim()
}

impl PersonalizeClient {
    /// Builds the deterministic fallback content for a lesson and survey.
    ///
    /// Exposed so callers can reuse the exact object the pipeline would fall
    /// back to.
    pub fn fallback_for(&self, lesson: &Lesson, survey: &Value) -> LessonContent {
        fallback_content(
            &lesson.title,
            lesson.summary.as_deref(),
            lesson.default_description.as_deref(),
            survey,
        )
    }

    /// Generates a personalized description for one lesson and one survey.
    ///
    /// The lesson material sent to the model is the transcript when one
    /// exists, otherwise the static template description. A response that
    /// fails transport or does not parse as a JSON object triggers one retry
    /// at a lower temperature; a second failure yields the fallback object
    /// unchanged. This method never fails the request.
    pub async fn personalize(&self, lesson: &Lesson, survey: &Value) -> LessonContent {
        let fallback = self.fallback_for(lesson, survey);

        let material = lesson
            .transcript
            .as_deref()
            .or(lesson.default_description.as_deref())
            .or(lesson.summary.as_deref())
            .unwrap_or(&lesson.title);
        let user_prompt =
            build_user_prompt(&self.user_prompt_template, &lesson.title, material, survey);

        for temperature in [DEFAULT_TEMPERATURE, RETRY_TEMPERATURE] {
            match self
                .ai_provider
                .generate(&self.system_prompt, &user_prompt, temperature)
                .await
            {
                Ok(response) => {
                    let cleaned = clean_json_response(&response);
                    match serde_json::from_str::<Value>(cleaned) {
                        Ok(raw) if raw.is_object() => {
                            debug!(lesson_id = lesson.id, "Parsed generated content");
                            return normalize_content(&raw, &fallback);
                        }
                        Ok(_) => {
                            warn!(
                                lesson_id = lesson.id,
                                temperature, "Model returned non-object JSON, retrying"
                            );
                        }
                        Err(e) => {
                            warn!(
                                lesson_id = lesson.id,
                                temperature,
                                error = %e,
                                "Model returned unparsable JSON, retrying"
                            );
                        }
                    }
                }
                Err(e) => {
                    warn!(
                        lesson_id = lesson.id,
                        temperature,
                        error = %e,
                        "AI provider call failed, retrying"
                    );
                }
            }
        }

        warn!(
            lesson_id = lesson.id,
            "Generation failed twice, using fallback content"
        );
        fallback
    }
}
