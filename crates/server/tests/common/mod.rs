//! # Common Test Utilities
//!
//! Centralizes the test harness used across the `uroki-server` integration
//! tests: `TestApp` spawns a real server on a random port with a temporary
//! SQLite database and an `httpmock::MockServer` standing in for the
//! OpenAI-compatible LLM endpoint.

#![allow(unused)]

use anyhow::Result;
use httpmock::{Method, Mock, MockServer};
use reqwest::Client;
use serde_json::json;
use std::{fs::File, io::Write, path::PathBuf};
use tempfile::{tempdir, NamedTempFile, TempDir};
use tokio::{net::TcpListener, task::JoinHandle};
use uroki_server::{config::get_config, run, state::AppState};

/// A harness for end-to-end testing of the Axum server.
pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub mock_server: MockServer,
    pub app_state: AppState,
    _db_file: NamedTempFile,
    _config_dir: TempDir,
    _server_handle: JoinHandle<()>,
}

impl TestApp {
    /// Spawns the application server and returns a `TestApp` instance.
    pub async fn spawn() -> Result<Self> {
        let _ = tracing_subscriber_init();

        let mock_server = MockServer::start();
        let db_file = NamedTempFile::new()?;
        let db_path = db_file.path().to_path_buf();

        let config_dir = tempdir()?;
        let config_path = config_dir.path().join("config.yml");
        let config_content = format!(
            r#"
port: 0
db_url: "{}"
providers:
  default:
    provider: "local"
    api_url: "{}"
    api_key: null
    model_name: "mock-chat-model"
generation:
  provider: "default"
"#,
            db_path.to_str().unwrap(),
            mock_server.url("/v1/chat/completions"),
        );
        let mut file = File::create(&config_path)?;
        file.write_all(config_content.as_bytes())?;

        let config = get_config(Some(config_path.to_str().unwrap()))?;
        let app_state = uroki_server::state::build_app_state(config).await?;

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let port = listener.local_addr()?.port();
        let address = format!("http://127.0.0.1:{port}");

        let state_for_server = app_state.clone();
        let server_handle = tokio::spawn(async move {
            if let Err(e) = run(listener, state_for_server).await {
                eprintln!("Server error: {e}");
            }
        });

        Ok(Self {
            address,
            client: Client::new(),
            mock_server,
            app_state,
            _db_file: db_file,
            _config_dir: config_dir,
            _server_handle: server_handle,
        })
    }

    /// Executes seed SQL against the application database.
    pub async fn seed(&self, sql: &str) -> Result<()> {
        self.app_state.sqlite_provider.initialize_with_data(sql).await?;
        Ok(())
    }

    /// Counts the rows of a table in the application database.
    pub async fn count_rows(&self, table: &str) -> Result<i64> {
        let conn = self.app_state.sqlite_provider.connect()?;
        let mut rows = conn
            .query(&format!("SELECT COUNT(*) FROM {table}"), ())
            .await?;
        let row = rows.next().await?.expect("count row");
        match row.get_value(0)? {
            turso::Value::Integer(n) => Ok(n),
            other => anyhow::bail!("unexpected count value: {other:?}"),
        }
    }

    /// Mounts a mock LLM endpoint returning the given content JSON for every
    /// chat completion call, and returns the mock for hit assertions.
    pub fn mock_llm_content(&self, content: &serde_json::Value) -> Mock<'_> {
        self.mock_server.mock(|when, then| {
            when.method(Method::POST).path("/v1/chat/completions");
            then.status(200).json_body(json!({
                "choices": [
                    { "message": { "role": "assistant", "content": content.to_string() } }
                ]
            }));
        })
    }

    /// Mounts a mock LLM endpoint that always fails with a 500.
    pub fn mock_llm_failure(&self) -> Mock<'_> {
        self.mock_server.mock(|when, then| {
            when.method(Method::POST).path("/v1/chat/completions");
            then.status(500).body("upstream unavailable");
        })
    }
}

fn tracing_subscriber_init() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .compact()
        .try_init()
        .map_err(Into::into)
}

/// A complete current-shape content object for mock LLM responses.
pub fn full_content_json(greeting: &str) -> serde_json::Value {
    json!({
        "greeting": greeting,
        "why_watch": "Этот урок подобран под ваши ответы.",
        "key_points": ["Первый приём", "Второй приём"],
        "personal_tip": "Не торопитесь.",
        "practice": "Повторите приёмы.",
        "motivation": "У вас получится.",
        "cta": "Смотрите урок."
    })
}
