use tera::Tera;

pub const SUGGEST_TIMES_TEMPLATE: &str = "suggest_times.txt";
pub const EXPLAIN_TIMES_TEMPLATE: &str = "explain_times.txt";

pub const SUGGEST_TIMES_SYSTEM_INSTRUCTION: &str =
    "You are an AI assistant that suggests optimal meeting times for a team. Answer only with JSON matching the requested schema.";
pub const EXPLAIN_TIMES_SYSTEM_INSTRUCTION: &str =
    "You are an AI assistant helping to explain suggested meeting times. Answer only with JSON matching the requested schema.";

pub fn load_prompt_templates() -> Result<Tera, tera::Error> {
    let mut tera = Tera::default();
    tera.add_raw_template(SUGGEST_TIMES_TEMPLATE, include_str!("../../templates/prompts/suggest_times.txt"))?;
    tera.add_raw_template(EXPLAIN_TIMES_TEMPLATE, include_str!("../../templates/prompts/explain_times.txt"))?;
    Ok(tera)
}
