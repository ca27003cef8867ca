use axum::{extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use crate::error::AppError;
use std::sync::Arc;

pub async fn list_members(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let members = state.member_repo.list().await?;
    Ok(Json(members))
}
