pub mod gemini;
pub mod local;

use crate::errors::PersonalizeError;
use async_trait::async_trait;
use dyn_clone::DynClone;
use std::fmt::Debug;

/// A trait for interacting with an AI provider.
///
/// This trait defines a common interface for generating personalized lesson
/// content using different Large Language Models (e.g., Gemini, local
/// OpenAI-compatible models).
#[async_trait]
pub trait AiProvider: Send + Sync + Debug + DynClone {
    /// Generates a response from a given system and user prompt.
    ///
    /// `temperature` controls sampling: the generation pipeline calls this
    /// once at its default temperature and retries once at a lower one when
    /// the first response is unusable.
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        temperature: f32,
    ) -> Result<String, PersonalizeError>;
}

dyn_clone::clone_trait_object!(AiProvider);
