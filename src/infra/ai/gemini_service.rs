use crate::domain::ports::LlmService;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{error, info, warn, instrument};
use std::time::Duration;

pub struct GeminiService {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiService {
    pub fn new(api_key: String, model: String, base_url: String, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| Client::new()),
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    fn build_payload(prompt: &str, system_instruction: &str, response_schema: &Value) -> Value {
        json!({
            "contents": [{
                "role": "user",
                "parts": [{"text": prompt}]
            }],
            "systemInstruction": {
                "parts": [{"text": system_instruction}]
            },
            "generationConfig": {
                "temperature": 0.7,
                "maxOutputTokens": 2048,
                "responseMimeType": "application/json",
                "responseSchema": response_schema
            }
        })
    }

    async fn send_request(&self, payload: &Value) -> Result<Value, AppError> {
        let response = self.client.post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                error!("Gemini network error: {:?}", e);
                AppError::ExternalCall(format!("network error: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            error!("Gemini API error {}: {}", status, text);
            return Err(AppError::ExternalCall(format!("{} - {}", status, text)));
        }

        response.json::<Value>().await.map_err(|e| {
            error!("Failed to parse Gemini response JSON: {:?}", e);
            AppError::ExternalCall(format!("malformed provider response: {}", e))
        })
    }
}

/// Pulls the structured JSON answer out of a `generateContent` response body.
pub(crate) fn extract_structured(body: &Value) -> Result<Value, AppError> {
    let Some(first) = body.get("candidates")
        .and_then(|c| c.as_array())
        .and_then(|c| c.first())
    else {
        if let Some(reason) = body.pointer("/promptFeedback/blockReason").and_then(|r| r.as_str()) {
            warn!("Gemini rejected the prompt. Reason: {}", reason);
            return Err(AppError::ExternalCall(format!("prompt blocked: {}", reason)));
        }
        error!("Gemini response has no candidates: {:?}", body);
        return Err(AppError::OutputSchema("response contains no candidates".into()));
    };

    if let Some(finish_reason) = first.get("finishReason").and_then(|s| s.as_str())
        && finish_reason != "STOP" {
            warn!("AI generation stopped abnormally. Reason: {}", finish_reason);
            if finish_reason == "SAFETY" {
                return Err(AppError::ExternalCall("content generation blocked by safety filters".into()));
            }
        }

    let Some(text) = first.pointer("/content/parts/0/text").and_then(|t| t.as_str()) else {
        error!("Invalid or unexpected response structure from Gemini: {:?}", body);
        return Err(AppError::OutputSchema("response missing content".into()));
    };

    // Clean up markdown code fences if present
    let cleaned = text.trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    serde_json::from_str(cleaned)
        .map_err(|e| AppError::OutputSchema(format!("response is not valid JSON: {}", e)))
}

#[async_trait]
impl LlmService for GeminiService {
    #[instrument(skip_all, fields(model = %self.model, prompt_len = prompt.len()))]
    async fn generate_structured(
        &self,
        prompt: &str,
        system_instruction: &str,
        response_schema: &Value,
    ) -> Result<Value, AppError> {
        if self.api_key.is_empty() {
            return Err(AppError::ExternalCall("AI API key not configured".into()));
        }

        let payload = Self::build_payload(prompt, system_instruction, response_schema);

        info!("Sending generation request to Gemini...");
        let body = self.send_request(&payload).await?;
        let result = extract_structured(&body)?;
        info!("Successfully generated content from AI.");
        Ok(result)
    }
}
