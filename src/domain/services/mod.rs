pub mod availability;
pub mod prompts;
pub mod scheduling_assistant;
