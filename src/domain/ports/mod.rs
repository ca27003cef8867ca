use crate::domain::models::{booking::Booking, member::Member, resource::Resource};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Language-model provider. Implementations make one attempt per call and
/// return whatever JSON value the model produced for `response_schema`;
/// callers are responsible for checking it.
#[async_trait]
pub trait LlmService: Send + Sync {
    async fn generate_structured(
        &self,
        prompt: &str,
        system_instruction: &str,
        response_schema: &Value,
    ) -> Result<Value, AppError>;
}

#[async_trait]
pub trait ResourceRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Resource>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Resource>, AppError>;
}

#[async_trait]
pub trait MemberRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Member>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Member>, AppError>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Stores `booking` unless a non-cancelled booking of the same resource
    /// overlaps it, in which case `AppError::Conflict` is returned. The check
    /// and the write are atomic.
    async fn create(&self, booking: &Booking) -> Result<Booking, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError>;
    async fn list(&self, resource_id: Option<&str>) -> Result<Vec<Booking>, AppError>;
    async fn list_by_range(&self, resource_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Booking>, AppError>;
    async fn update_status(&self, id: &str, status: &str) -> Result<Booking, AppError>;
}
