use std::env;
use chrono_tz::Tz;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub ai_timeout_secs: u64,
    /// Lower bound on `suggestedTimes`, used in the prompt and when checking the model output.
    pub min_suggested_times: usize,
    pub calendar_timezone: Tz,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://team-booking.db?mode=rwc".to_string()),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            gemini_api_key: env::var("GEMINI_API_KEY").unwrap_or_default(),
            gemini_model: env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-2.5-flash".to_string()),
            gemini_base_url: env::var("GEMINI_BASE_URL").unwrap_or_else(|_| "https://generativelanguage.googleapis.com/v1beta".to_string()),
            ai_timeout_secs: env::var("AI_TIMEOUT_SECS").unwrap_or_else(|_| "30".to_string()).parse().expect("AI_TIMEOUT_SECS must be a number"),
            min_suggested_times: env::var("MIN_SUGGESTED_TIMES")
                .unwrap_or_else(|_| "3".to_string())
                .parse::<usize>()
                .expect("MIN_SUGGESTED_TIMES must be a number")
                .max(1),
            calendar_timezone: parse_calendar_timezone(
                &env::var("CALENDAR_TIMEZONE").unwrap_or_else(|_| "UTC".to_string()),
            )
            .expect("CALENDAR_TIMEZONE must be an IANA timezone name"),
        }
    }
}

fn parse_calendar_timezone(name: &str) -> Option<Tz> {
    name.trim().parse().ok()
}
