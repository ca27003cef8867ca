use axum::{extract::{rejection::JsonRejection, Path, Query, State}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::{CreateBookingRequest, ListBookingsQuery};
use crate::domain::models::booking::{Booking, NewBookingParams, STATUS_CANCELLED, STATUS_CONFIRMED, STATUS_PENDING};
use crate::domain::services::availability::{calculate_slots, day_bounds, MAX_DURATION_MIN};
use crate::error::AppError;
use std::sync::Arc;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc, TimeZone};
use tracing::{info, warn};

const DEFAULT_DURATION_MIN: i32 = 60;

/// Books a resource. `time` is either `HH:MM` local to the calendar timezone
/// or an RFC 3339 instant, which must fall on `date` in that timezone.
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateBookingRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    info!("create_booking: Starting for resource {}", payload.resource_id);

    let title = payload.title.trim().to_string();
    let organizer = payload.organizer.trim().to_string();
    if title.is_empty() {
        return Err(AppError::Validation("Title must not be empty".into()));
    }
    if organizer.is_empty() {
        return Err(AppError::Validation("Organizer must not be empty".into()));
    }

    let duration_min = payload.duration_min.unwrap_or(DEFAULT_DURATION_MIN);
    if duration_min <= 0 {
        return Err(AppError::Validation("duration_min must be positive".into()));
    }
    if i64::from(duration_min) > MAX_DURATION_MIN {
        return Err(AppError::Validation(format!("duration_min must not exceed {}", MAX_DURATION_MIN)));
    }

    let resource = state.resource_repo.find_by_id(&payload.resource_id).await?
        .ok_or(AppError::NotFound("Resource not found".into()))?;

    if let Some(member_id) = &payload.member_id
        && state.member_repo.find_by_id(member_id).await?.is_none() {
        return Err(AppError::NotFound("Member not found".into()));
    }

    let tz = state.config.calendar_timezone;

    let date = NaiveDate::parse_from_str(&payload.date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date format".into()))?;

    let start_time = if payload.time.contains('T') {
        let dt = DateTime::parse_from_rfc3339(&payload.time)
            .map_err(|_| AppError::Validation("Invalid ISO time format".into()))?;
        if dt.with_timezone(&tz).date_naive() != date {
            return Err(AppError::Validation("time does not fall on the requested date".into()));
        }
        dt.with_timezone(&Utc)
    } else {
        let time = NaiveTime::parse_from_str(&payload.time, "%H:%M")
            .map_err(|_| AppError::Validation("Invalid time format (HH:MM)".into()))?;
        tz.from_local_datetime(&date.and_time(time))
            .single()
            .ok_or(AppError::Validation("Invalid local time (ambiguous or skipped due to DST)".into()))?
            .with_timezone(&Utc)
    };

    if start_time < Utc::now() {
        return Err(AppError::Validation("Cannot book in the past".into()));
    }

    let (day_start, day_end) = day_bounds(tz, date)
        .ok_or(AppError::Validation("Date cannot be represented in the calendar timezone".into()))?;
    let existing = state.booking_repo.list_by_range(&resource.id, day_start, day_end).await?;

    let valid_slots = calculate_slots(tz, date, duration_min as i64, &existing, Utc::now());
    let requested_iso = start_time.to_rfc3339();

    if !valid_slots.contains(&requested_iso) {
        warn!("Booking rejected: Slot {} (UTC) not available for {}. Valid slots: {:?}", requested_iso, resource.id, valid_slots);
        return Err(AppError::Conflict("Selected time slot is not available or valid".into()));
    }

    let booking = Booking::new(NewBookingParams {
        resource_id: resource.id.clone(),
        member_id: payload.member_id,
        title,
        organizer,
        start: start_time,
        duration_min,
        status: resource.initial_booking_status(),
    });

    let created = state.booking_repo.create(&booking).await?;
    info!("Booking {} created for {} at {} ({})", created.reference_code, resource.name, created.start_time, created.status);

    Ok(Json(created))
}

pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListBookingsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let bookings = state.booking_repo.list(query.resource_id.as_deref()).await?;
    Ok(Json(bookings))
}

pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.booking_repo.find_by_id(&booking_id).await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;
    Ok(Json(booking))
}

pub async fn confirm_booking(
    State(state): State<Arc<AppState>>,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.booking_repo.find_by_id(&booking_id).await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;

    if booking.status != STATUS_PENDING {
        return Err(AppError::Conflict(format!("Booking is {}, only pending bookings can be confirmed", booking.status)));
    }

    let updated = state.booking_repo.update_status(&booking.id, STATUS_CONFIRMED).await?;
    info!("Booking {} confirmed", updated.reference_code);
    Ok(Json(updated))
}

pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.booking_repo.find_by_id(&booking_id).await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;

    if booking.is_cancelled() {
        return Err(AppError::Conflict("Booking already cancelled".into()));
    }

    let updated = state.booking_repo.update_status(&booking.id, STATUS_CANCELLED).await?;
    info!("Booking {} cancelled", updated.reference_code);
    Ok(Json(updated))
}
