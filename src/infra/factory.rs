use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{ConnectOptions, SqlitePool};
use tracing::{info, warn};
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::state::AppState;
use crate::infra::ai::gemini_service::GeminiService;
use crate::domain::services::prompts::load_prompt_templates;
use crate::domain::services::scheduling_assistant::SchedulingAssistant;
use crate::infra::repositories::{
    sqlite_booking_repo::SqliteBookingRepo,
    sqlite_member_repo::SqliteMemberRepo,
    sqlite_resource_repo::SqliteResourceRepo,
};

pub async fn bootstrap_state(config: &Config) -> AppState {
    if config.gemini_api_key.is_empty() {
        warn!("GEMINI_API_KEY is not set. AI suggestions will be unavailable.");
    }

    let llm_service = Arc::new(GeminiService::new(
        config.gemini_api_key.clone(),
        config.gemini_model.clone(),
        config.gemini_base_url.clone(),
        Duration::from_secs(config.ai_timeout_secs),
    ));

    let prompts = Arc::new(load_prompt_templates().expect("Failed to load prompt templates"));
    let assistant = Arc::new(SchedulingAssistant::new(llm_service, prompts, config.min_suggested_times));

    info!("Initializing SQLite connection with WAL Mode...");

    let opts = SqliteConnectOptions::from_str(&config.database_url)
        .expect("Invalid SQLite connection string")
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5))
        .log_statements(LevelFilter::Debug)
        .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(opts)
        .await
        .expect("Failed to connect to SQLite");

    run_sqlite_migrations(&pool).await;

    AppState {
        config: config.clone(),
        resource_repo: Arc::new(SqliteResourceRepo::new(pool.clone())),
        member_repo: Arc::new(SqliteMemberRepo::new(pool.clone())),
        booking_repo: Arc::new(SqliteBookingRepo::new(pool.clone())),
        assistant,
    }
}

pub async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
