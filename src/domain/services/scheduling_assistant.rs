use std::sync::Arc;
use tera::{Context, Tera};
use tracing::{info, instrument};

use crate::domain::models::suggestion::{
    ExplanationRequest, ExplanationResponse, SuggestionRequest, SuggestionResponse,
};
use crate::domain::ports::LlmService;
use crate::domain::services::prompts::{
    EXPLAIN_TIMES_SYSTEM_INSTRUCTION, EXPLAIN_TIMES_TEMPLATE, SUGGEST_TIMES_SYSTEM_INSTRUCTION,
    SUGGEST_TIMES_TEMPLATE,
};
use crate::error::AppError;

/// Meeting-time assistant backed by a language model.
///
/// Both flows validate the request, render a fixed prompt, make a single
/// provider call and check the returned value against the output shape.
/// Nothing is cached between calls.
pub struct SchedulingAssistant {
    llm: Arc<dyn LlmService>,
    prompts: Arc<Tera>,
    min_suggested_times: usize,
}

impl SchedulingAssistant {
    pub fn new(llm: Arc<dyn LlmService>, prompts: Arc<Tera>, min_suggested_times: usize) -> Self {
        Self {
            llm,
            prompts,
            min_suggested_times: min_suggested_times.max(1),
        }
    }

    pub fn min_suggested_times(&self) -> usize {
        self.min_suggested_times
    }

    #[instrument(skip_all, fields(duration_min = request.meeting_duration_minutes))]
    pub async fn suggest_times(&self, request: &SuggestionRequest) -> Result<SuggestionResponse, AppError> {
        request.validate()?;

        let mut ctx = Context::new();
        ctx.insert("team_availability", &request.team_availability);
        ctx.insert("meeting_duration_minutes", &request.meeting_duration_minutes);
        ctx.insert("preferred_days", &request.preferred_days);
        ctx.insert("preferred_time_of_day", &request.preferred_time_of_day);
        ctx.insert("min_suggested_times", &self.min_suggested_times);
        let prompt = self.render(SUGGEST_TIMES_TEMPLATE, &ctx)?;

        let raw = self.llm
            .generate_structured(&prompt, SUGGEST_TIMES_SYSTEM_INSTRUCTION, &SuggestionResponse::output_schema())
            .await?;

        let response = SuggestionResponse::from_model_output(raw, self.min_suggested_times)?;
        info!(count = response.suggested_times.len(), "Meeting times suggested");
        Ok(response)
    }

    #[instrument(skip_all)]
    pub async fn explain_times(&self, request: &ExplanationRequest) -> Result<ExplanationResponse, AppError> {
        request.validate()?;

        let mut ctx = Context::new();
        ctx.insert("team_availability", &request.team_availability);
        ctx.insert("user_preferences", &request.user_preferences);
        ctx.insert("suggested_times", &request.suggested_times);
        let prompt = self.render(EXPLAIN_TIMES_TEMPLATE, &ctx)?;

        let raw = self.llm
            .generate_structured(&prompt, EXPLAIN_TIMES_SYSTEM_INSTRUCTION, &ExplanationResponse::output_schema())
            .await?;

        let response = ExplanationResponse::from_model_output(raw)?;
        info!(explanation_len = response.explanation.len(), "Suggested times explained");
        Ok(response)
    }

    fn render(&self, template: &str, ctx: &Context) -> Result<String, AppError> {
        self.prompts.render(template, ctx)
            .map_err(|e| AppError::InternalWithMsg(format!("Prompt render error ({}): {}", template, e)))
    }
}
