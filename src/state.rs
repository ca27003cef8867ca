use std::sync::Arc;
use crate::domain::ports::{BookingRepository, MemberRepository, ResourceRepository};
use crate::domain::services::scheduling_assistant::SchedulingAssistant;
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub resource_repo: Arc<dyn ResourceRepository>,
    pub member_repo: Arc<dyn MemberRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub assistant: Arc<SchedulingAssistant>,
}
