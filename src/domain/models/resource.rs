use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Resource {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub capacity: i32,
    pub is_paid: bool,
}

impl Resource {
    /// Paid resources need an explicit confirmation before the booking holds.
    pub fn initial_booking_status(&self) -> &'static str {
        if self.is_paid {
            super::booking::STATUS_PENDING
        } else {
            super::booking::STATUS_CONFIRMED
        }
    }
}
