//! Generation backend client
//!
//! [`GenerationClient`] is the port through which the core asks a
//! backend to turn a prompt into a form description. The client returns
//! the backend's output as an opaque `serde_json::Value`; interpreting
//! that value is the normalizer's job, never the client's.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::env;

use crate::config::GenerationSettings;
use crate::domain::TransportError;

/// Instructions prepended to every user prompt. The backend is told to
/// answer with the canonical schema object only; responses that stray
/// from this are reconciled downstream.
const SCHEMA_INSTRUCTIONS: &str = r#"You are a form schema generator.

STRICT OUTPUT FORMAT (MANDATORY):
Return a JSON OBJECT with EXACTLY this structure:

{
  "title": "string",
  "fields": [
    {
      "label": "string",
      "name": "string",
      "type": "text | number | email | textarea",
      "required": boolean,
      "meta": ["string"]
    }
  ]
}

RULES:
- Do NOT return an array at top level
- Do NOT return markdown
- Do NOT return explanations
- JSON only"#;

/// Port for the generation backend.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Send one prompt and return the backend's raw, uninterpreted
    /// output. No automatic retries.
    async fn generate(&self, prompt: &str) -> Result<Value, TransportError>;
}

/// Google Gemini generation client.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl GeminiClient {
    /// Create a client from configuration. The API key is resolved from
    /// the configured environment variable (`GEMINI_API_KEY` default).
    pub fn new(config: &GenerationSettings) -> Result<Self, TransportError> {
        let env_var = config.api_key_env.as_deref().unwrap_or("GEMINI_API_KEY");
        let api_key = env::var(env_var).map_err(|_| {
            TransportError::Authentication(format!("environment variable {} not set", env_var))
        })?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| "https://generativelanguage.googleapis.com/v1beta".to_string());

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            base_url,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    fn build_request_body(&self, prompt: &str) -> Value {
        let full_prompt = format!("{}\n\nUSER REQUEST:\n{}", SCHEMA_INSTRUCTIONS, prompt);

        let mut body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": full_prompt }]
            }],
        });

        let mut generation_config = json!({});
        if let Some(temp) = self.temperature {
            generation_config["temperature"] = json!(temp);
        }
        if let Some(max_tokens) = self.max_tokens {
            generation_config["maxOutputTokens"] = json!(max_tokens);
        }
        if generation_config.as_object().map_or(false, |o| !o.is_empty()) {
            body["generationConfig"] = generation_config;
        }

        body
    }

    /// Pull the generated text out of the response envelope.
    fn extract_text(&self, response: &GeminiResponse) -> Result<String, TransportError> {
        let candidate = response
            .candidates
            .first()
            .ok_or_else(|| TransportError::Parse("no candidates in response".to_string()))?;

        let mut text = String::new();
        if let Some(parts) = &candidate.content.parts {
            for part in parts {
                if let Some(t) = &part.text {
                    text.push_str(t);
                }
            }
        }

        if text.is_empty() {
            return Err(TransportError::Parse("empty completion".to_string()));
        }
        Ok(text)
    }
}

#[async_trait]
impl GenerationClient for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<Value, TransportError> {
        let body = self.build_request_body(prompt);
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(TransportError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| TransportError::Parse(format!("failed to parse response: {}", e)))?;

        let text = self.extract_text(&gemini_response)?;
        let text = strip_code_fence(&text);

        // Model output that parses as JSON is handed over structured;
        // anything else is passed through verbatim for the normalizer
        // to report.
        Ok(serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string())))
    }
}

/// Models routinely wrap JSON answers in a markdown code fence despite
/// instructions not to. Peel one layer off before parsing.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    if let Some(rest) = trimmed.strip_prefix("```") {
        let rest = rest.strip_prefix("json").unwrap_or(rest);
        if let Some(inner) = rest.strip_suffix("```") {
            return inner.trim();
        }
    }
    trimmed
}

// Gemini API response envelope (subset we consume)

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    parts: Option<Vec<GeminiPart>>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    text: Option<String>,
}
