use axum::{extract::{Path, Query, State}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::SlotsQuery;
use crate::api::dtos::responses::SlotsResponse;
use crate::domain::services::availability::{calculate_slots, day_bounds, MAX_DURATION_MIN};
use crate::error::AppError;
use std::sync::Arc;
use chrono::{NaiveDate, Utc};

const DEFAULT_DURATION_MIN: i64 = 60;

pub async fn list_resources(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let resources = state.resource_repo.list().await?;
    Ok(Json(resources))
}

pub async fn get_resource(
    State(state): State<Arc<AppState>>,
    Path(resource_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let resource = state.resource_repo.find_by_id(&resource_id).await?
        .ok_or(AppError::NotFound("Resource not found".into()))?;
    Ok(Json(resource))
}

pub async fn get_slots(
    State(state): State<Arc<AppState>>,
    Path(resource_id): Path<String>,
    Query(query): Query<SlotsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let resource = state.resource_repo.find_by_id(&resource_id).await?
        .ok_or(AppError::NotFound("Resource not found".into()))?;

    let date = NaiveDate::parse_from_str(&query.date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date format".into()))?;

    let duration_min = query.duration_min.unwrap_or(DEFAULT_DURATION_MIN);
    if duration_min <= 0 {
        return Err(AppError::Validation("duration_min must be positive".into()));
    }
    if duration_min > MAX_DURATION_MIN {
        return Err(AppError::Validation(format!("duration_min must not exceed {}", MAX_DURATION_MIN)));
    }

    let tz = state.config.calendar_timezone;
    let (day_start, day_end) = day_bounds(tz, date)
        .ok_or(AppError::Validation("Date cannot be represented in the calendar timezone".into()))?;

    let existing = state.booking_repo.list_by_range(&resource.id, day_start, day_end).await?;
    let slots = calculate_slots(tz, date, duration_min, &existing, Utc::now());

    Ok(Json(SlotsResponse {
        date: query.date,
        resource_id: resource.id,
        duration_min,
        slots,
    }))
}
