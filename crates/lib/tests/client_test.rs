//! Tests for the generation pipeline: prompt construction, the single
//! lower-temperature retry, and the fallback policy.

use async_trait::async_trait;
use serde_json::json;
use std::sync::{Arc, Mutex};
use uroki::errors::PersonalizeError;
use uroki::providers::ai::AiProvider;
use uroki::store::lessons::Lesson;
use uroki::PersonalizeClientBuilder;

/// A scripted provider: each call pops the next canned outcome and records
/// the (user_prompt, temperature) it was called with.
#[derive(Clone, Debug)]
struct ScriptedProvider {
    script: Arc<Mutex<Vec<Result<String, String>>>>,
    calls: Arc<Mutex<Vec<(String, f32)>>>,
}

impl ScriptedProvider {
    fn new(script: Vec<Result<String, String>>) -> Self {
        Self {
            script: Arc::new(Mutex::new(script)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn calls(&self) -> Vec<(String, f32)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AiProvider for ScriptedProvider {
    async fn generate(
        &self,
        _system_prompt: &str,
        user_prompt: &str,
        temperature: f32,
    ) -> Result<String, PersonalizeError> {
        self.calls
            .lock()
            .unwrap()
            .push((user_prompt.to_string(), temperature));
        let mut script = self.script.lock().unwrap();
        if script.is_empty() {
            return Err(PersonalizeError::AiApi("script exhausted".to_string()));
        }
        script.remove(0).map_err(PersonalizeError::AiApi)
    }
}

fn sample_lesson() -> Lesson {
    Lesson {
        id: 1,
        course_id: 1,
        position: 1,
        title: "Разогрев зоны".to_string(),
        summary: Some("Подготовка к основной работе.".to_string()),
        transcript: Some("Полная расшифровка урока про разогрев.".to_string()),
        default_description: Some("Подготовка\nРазогрев\nКонтроль".to_string()),
    }
}

fn client_with(provider: &ScriptedProvider) -> uroki::PersonalizeClient {
    PersonalizeClientBuilder::new()
        .ai_provider(Box::new(provider.clone()))
        .build()
        .expect("client builds")
}

#[tokio::test]
async fn valid_response_is_normalized_in_one_call() {
    let provider = ScriptedProvider::new(vec![Ok(json!({
        "greeting": "Мария, привет!",
        "why_watch": "Потому что.",
        "key_points": ["раз", "два"],
        "personal_tip": "Совет",
        "practice": "Практика",
        "motivation": "Мотивация",
        "cta": "Вперёд"
    })
    .to_string())]);
    let client = client_with(&provider);

    let content = client
        .personalize(&sample_lesson(), &json!({"real_name": "Мария"}))
        .await;

    assert_eq!(content.greeting, "Мария, привет!");
    let calls = provider.calls();
    assert_eq!(calls.len(), 1);
    // The prompt carries the transcript and the survey answers.
    assert!(calls[0].0.contains("расшифровка"));
    assert!(calls[0].0.contains("Мария"));
}

#[tokio::test]
async fn fenced_response_is_accepted() {
    let body = json!({ "greeting": "Привет!" }).to_string();
    let provider = ScriptedProvider::new(vec![Ok(format!("```json\n{body}\n```"))]);
    let client = client_with(&provider);

    let content = client.personalize(&sample_lesson(), &json!({})).await;
    assert_eq!(content.greeting, "Привет!");
    assert_eq!(provider.calls().len(), 1);
}

#[tokio::test]
async fn unparsable_response_retries_once_at_lower_temperature() {
    let provider = ScriptedProvider::new(vec![
        Ok("this is not json".to_string()),
        Ok(json!({ "greeting": "Со второй попытки" }).to_string()),
    ]);
    let client = client_with(&provider);

    let content = client.personalize(&sample_lesson(), &json!({})).await;

    assert_eq!(content.greeting, "Со второй попытки");
    let calls = provider.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls[1].1 < calls[0].1, "retry must lower the temperature");
}

#[tokio::test]
async fn two_failures_yield_the_fallback_unchanged() {
    let provider = ScriptedProvider::new(vec![
        Err("upstream 500".to_string()),
        Err("upstream 500".to_string()),
    ]);
    let client = client_with(&provider);
    let lesson = sample_lesson();
    let survey = json!({"real_name": "Мария"});

    let content = client.personalize(&lesson, &survey).await;

    assert_eq!(content, client.fallback_for(&lesson, &survey));
    assert_eq!(provider.calls().len(), 2);
}

#[tokio::test]
async fn partial_response_is_completed_from_fallback() {
    let provider = ScriptedProvider::new(vec![Ok(
        json!({ "why_watch": "Только одно поле" }).to_string()
    )]);
    let client = client_with(&provider);
    let lesson = sample_lesson();
    let survey = json!({});

    let content = client.personalize(&lesson, &survey).await;
    let fallback = client.fallback_for(&lesson, &survey);

    assert_eq!(content.why_watch, "Только одно поле");
    assert_eq!(content.greeting, fallback.greeting);
    assert_eq!(content.key_points, fallback.key_points);
    assert_eq!(content.cta, fallback.cta);
}
