use serde::Serialize;

#[derive(Serialize)]
pub struct SlotsResponse {
    pub date: String,
    pub resource_id: String,
    pub duration_min: i64,
    pub slots: Vec<String>,
}
