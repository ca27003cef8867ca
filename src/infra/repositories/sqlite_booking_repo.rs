use crate::domain::{models::booking::{Booking, STATUS_CANCELLED}, ports::BookingRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;
use chrono::{DateTime, Utc};

pub struct SqliteBookingRepo {
    pool: SqlitePool,
}

impl SqliteBookingRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for SqliteBookingRepo {
    async fn create(&self, booking: &Booking) -> Result<Booking, AppError> {
        // One statement, so the overlap check and the insert share SQLite's write lock.
        sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (id, resource_id, member_id, title, organizer, start_time, end_time, status, reference_code, created_at)
             SELECT ?, ?, ?, ?, ?, ?, ?, ?, ?, ?
             WHERE NOT EXISTS (
                 SELECT 1 FROM bookings
                 WHERE resource_id = ? AND start_time < ? AND end_time > ? AND status != ?
             )
             RETURNING *"
        )
            .bind(&booking.id).bind(&booking.resource_id).bind(&booking.member_id).bind(&booking.title)
            .bind(&booking.organizer).bind(booking.start_time).bind(booking.end_time).bind(&booking.status)
            .bind(&booking.reference_code).bind(booking.created_at)
            .bind(&booking.resource_id).bind(booking.end_time).bind(booking.start_time).bind(STATUS_CANCELLED)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)?
            .ok_or(AppError::Conflict("Selected time slot is not available or valid".into()))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = ?").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list(&self, resource_id: Option<&str>) -> Result<Vec<Booking>, AppError> {
        match resource_id {
            Some(resource_id) => {
                sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE resource_id = ? ORDER BY start_time ASC")
                    .bind(resource_id)
                    .fetch_all(&self.pool).await.map_err(AppError::Database)
            }
            None => {
                sqlx::query_as::<_, Booking>("SELECT * FROM bookings ORDER BY start_time ASC")
                    .fetch_all(&self.pool).await.map_err(AppError::Database)
            }
        }
    }

    async fn list_by_range(&self, resource_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE resource_id = ? AND start_time < ? AND end_time > ? AND status != ?")
            .bind(resource_id).bind(end).bind(start).bind(STATUS_CANCELLED)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn update_status(&self, id: &str, status: &str) -> Result<Booking, AppError> {
        sqlx::query_as::<_, Booking>("UPDATE bookings SET status = ? WHERE id = ? RETURNING *")
            .bind(status).bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Booking not found".into()))
    }
}
