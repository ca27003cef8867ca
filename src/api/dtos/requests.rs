use serde::Deserialize;

#[derive(Deserialize)]
pub struct CreateBookingRequest {
    pub resource_id: String,
    pub title: String,
    pub organizer: String,
    pub member_id: Option<String>,
    pub date: String,
    pub time: String,
    pub duration_min: Option<i32>,
}

#[derive(Deserialize)]
pub struct SlotsQuery {
    pub date: String,
    pub duration_min: Option<i64>,
}

#[derive(Deserialize)]
pub struct ListBookingsQuery {
    pub resource_id: Option<String>,
}
