use axum::{extract::{rejection::JsonRejection, State}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::domain::models::suggestion::{ExplanationRequest, SuggestionRequest};
use crate::error::AppError;
use std::sync::Arc;

/// Body rejections (missing field, wrong type) are reported as validation
/// errors, like every other bad request.
pub async fn suggest_times(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SuggestionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(request) = payload?;
    let response = state.assistant.suggest_times(&request).await?;
    Ok(Json(response))
}

/// Same body handling as [`suggest_times`].
pub async fn explain_times(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ExplanationRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(request) = payload?;
    let response = state.assistant.explain_times(&request).await?;
    Ok(Json(response))
}
