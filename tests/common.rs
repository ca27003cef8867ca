use team_booking::{
    api::router::create_router,
    state::AppState,
    config::Config,
    infra::factory::run_sqlite_migrations,
    infra::repositories::{
        sqlite_booking_repo::SqliteBookingRepo,
        sqlite_member_repo::SqliteMemberRepo,
        sqlite_resource_repo::SqliteResourceRepo,
    },
    domain::ports::LlmService,
    domain::services::{prompts::load_prompt_templates, scheduling_assistant::SchedulingAssistant},
    error::AppError,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions}, Pool, Sqlite};
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};
use uuid::Uuid;
use axum::{
    body::Body,
    http::{Request, header},
    response::Response,
    Router,
};
use std::str::FromStr;
use async_trait::async_trait;
use tower::ServiceExt;
use serde_json::Value;

/// Provider stand-in that replays a fixed answer and counts calls.
pub struct StubLlmService {
    reply: Result<Value, String>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl StubLlmService {
    pub fn new(reply: Result<Value, String>) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    #[allow(dead_code)]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    #[allow(dead_code)]
    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl LlmService for StubLlmService {
    async fn generate_structured(
        &self,
        prompt: &str,
        _system_instruction: &str,
        _response_schema: &Value,
    ) -> Result<Value, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply.clone().map_err(AppError::ExternalCall)
    }
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
    pub llm: Arc<StubLlmService>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_llm_reply(Ok(serde_json::json!({
            "suggestedTimes": ["2030-01-07T14:00:00Z", "2030-01-09T14:00:00Z", "2030-01-09T15:00:00Z"],
            "reasoning": "Mock AI Response: afternoons overlap."
        }))).await
    }

    pub async fn with_llm_reply(reply: Result<Value, String>) -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(std::time::Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        run_sqlite_migrations(&pool).await;

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            gemini_api_key: "test-key".to_string(),
            gemini_model: "stub".to_string(),
            gemini_base_url: "http://localhost".to_string(),
            ai_timeout_secs: 1,
            min_suggested_times: 3,
            calendar_timezone: chrono_tz::UTC,
        };

        let llm = Arc::new(StubLlmService::new(reply));
        let prompts = Arc::new(load_prompt_templates().unwrap());
        let assistant = Arc::new(SchedulingAssistant::new(llm.clone(), prompts, config.min_suggested_times));

        let state = Arc::new(AppState {
            config,
            resource_repo: Arc::new(SqliteResourceRepo::new(pool.clone())),
            member_repo: Arc::new(SqliteMemberRepo::new(pool.clone())),
            booking_repo: Arc::new(SqliteBookingRepo::new(pool.clone())),
            assistant,
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
            llm,
        }
    }

    #[allow(dead_code)]
    pub async fn get(&self, uri: &str) -> Response {
        self.router.clone().oneshot(
            Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
        ).await.unwrap()
    }

    pub async fn post_json(&self, uri: &str, payload: &Value) -> Response {
        self.router.clone().oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap()
        ).await.unwrap()
    }
}

#[allow(dead_code)]
pub async fn parse_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}
