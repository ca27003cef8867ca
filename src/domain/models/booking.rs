use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use rand::{distributions::Alphanumeric, Rng};

pub const STATUS_CONFIRMED: &str = "CONFIRMED";
pub const STATUS_PENDING: &str = "PENDING";
pub const STATUS_CANCELLED: &str = "CANCELLED";

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Booking {
    pub id: String,
    pub resource_id: String,
    pub member_id: Option<String>,
    pub title: String,
    pub organizer: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: String,
    pub reference_code: String,
    pub created_at: DateTime<Utc>,
}

pub struct NewBookingParams {
    pub resource_id: String,
    pub member_id: Option<String>,
    pub title: String,
    pub organizer: String,
    pub start: DateTime<Utc>,
    pub duration_min: i32,
    pub status: &'static str,
}

impl Booking {
    pub fn new(params: NewBookingParams) -> Self {
        let end_time = params.start + chrono::Duration::minutes(params.duration_min as i64);

        let code: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(8)
            .map(char::from)
            .collect();

        Self {
            id: Uuid::new_v4().to_string(),
            resource_id: params.resource_id,
            member_id: params.member_id,
            title: params.title,
            organizer: params.organizer,
            start_time: params.start,
            end_time,
            status: params.status.to_string(),
            reference_code: format!("BK-{}", code.to_uppercase()),
            created_at: Utc::now(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == STATUS_CANCELLED
    }

    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        !self.is_cancelled() && self.start_time < end && self.end_time > start
    }
}
