//! # Application State
//!
//! This module defines the shared application state (`AppState`) and the
//! logic for building it at startup. The `AppState` holds all shared
//! resources: the configuration, the database provider, and the
//! personalization client wired to the configured AI provider.

use crate::config::AppConfig;
use std::sync::Arc;
use uroki::{
    providers::{
        ai::{gemini::GeminiProvider, local::LocalAiProvider, AiProvider},
        db::sqlite::SqliteProvider,
    },
    PersonalizeClient, PersonalizeClientBuilder,
};

/// The shared application state, accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The application's configuration, loaded from `config.yml`.
    pub config: Arc<AppConfig>,
    /// The primary database provider.
    pub sqlite_provider: Arc<SqliteProvider>,
    /// The personalization client used by the generation endpoints.
    pub personalize_client: Arc<PersonalizeClient>,
}

/// Instantiates the AI provider named by the generation task.
fn build_ai_provider(config: &AppConfig) -> anyhow::Result<Box<dyn AiProvider>> {
    let provider_name = &config.generation.provider;
    let provider_config = config.providers.get(provider_name).ok_or_else(|| {
        anyhow::anyhow!("Generation provider '{provider_name}' not found in the providers map")
    })?;

    let provider: Box<dyn AiProvider> = match provider_config.provider.as_str() {
        "gemini" => {
            let api_key = provider_config.api_key.clone().ok_or_else(|| {
                anyhow::anyhow!("api_key is required for gemini provider '{provider_name}'")
            })?;
            // If api_url is not provided in config, construct it from the model name.
            let api_url = provider_config.api_url.clone().unwrap_or_else(|| {
                format!(
                    "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent",
                    provider_config.model_name
                )
            });
            Box::new(GeminiProvider::new(api_url, api_key)?)
        }
        "local" => {
            // For local providers, the URL is always required.
            let api_url = provider_config.api_url.clone().ok_or_else(|| {
                anyhow::anyhow!("api_url is required for local provider '{provider_name}'")
            })?;
            Box::new(LocalAiProvider::new(
                api_url,
                provider_config.api_key.clone(),
                Some(provider_config.model_name.clone()),
            )?)
        }
        other => {
            return Err(anyhow::anyhow!(
                "Unsupported AI provider type '{other}' for provider '{provider_name}'"
            ));
        }
    };
    Ok(provider)
}

/// Builds the shared application state from the configuration.
///
/// This initializes the SQLite database (creating the schema when missing)
/// and the personalization client for the configured AI provider.
pub async fn build_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let ai_provider = build_ai_provider(&config)?;

    let personalize_client = PersonalizeClientBuilder::new()
        .ai_provider(ai_provider)
        .system_prompt(config.generation.system_prompt.clone())
        .user_prompt_template(config.generation.user_prompt.clone())
        .build()?;

    let sqlite_provider = SqliteProvider::new(&config.db_url).await?;
    tracing::info!(db_path = %config.db_url, "Initialized local storage provider (SQLite).");
    // Ensure the database schema is up-to-date on startup.
    sqlite_provider.initialize_schema().await?;

    Ok(AppState {
        config: Arc::new(config),
        sqlite_provider: Arc::new(sqlite_provider),
        personalize_client: Arc::new(personalize_client),
    })
}
