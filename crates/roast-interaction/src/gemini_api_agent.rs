//! GeminiApiAgent - Direct REST API implementation for Gemini.
//!
//! One `generateContent` call per roast. The request carries the sampling
//! parameters from `config.toml` and disables the provider's safety
//! filters, since every reply is meant to be rude.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use roast_core::config::GenerationSettings;
use roast_core::generation::{GenerationError, Generator};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const SAFETY_CATEGORIES: &[&str] = &[
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];
const SAFETY_THRESHOLD: &str = "BLOCK_NONE";

/// Generator implementation that talks to the Gemini HTTP API.
#[derive(Clone)]
pub struct GeminiApiAgent {
    client: Client,
    api_key: String,
    model: String,
    endpoint: Option<String>,
    generation_config: GenerationConfig,
}

impl GeminiApiAgent {
    /// Creates a new agent with the provided API key and model, using the
    /// default sampling parameters.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        let defaults = GenerationSettings::default();
        Self::from_settings(api_key, &defaults).with_model(model)
    }

    /// Creates an agent from `[generation]` settings.
    pub fn from_settings(api_key: impl Into<String>, settings: &GenerationSettings) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: settings.model.clone(),
            endpoint: settings.api_url.clone(),
            generation_config: GenerationConfig::from(settings),
        }
    }

    /// Overrides the model after construction.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sends requests to `endpoint` verbatim instead of the model URL.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    fn request_url(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.clone(),
            None => format!("{}/{}:generateContent", BASE_URL, self.model),
        }
    }

    fn build_request(&self, prompt: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: self.generation_config.clone(),
            safety_settings: SAFETY_CATEGORIES
                .iter()
                .map(|category| SafetySetting {
                    category: category.to_string(),
                    threshold: SAFETY_THRESHOLD.to_string(),
                })
                .collect(),
        }
    }

    async fn send_request(&self, body: &GenerateContentRequest) -> Result<String, GenerationError> {
        let response = self
            .client
            .post(self.request_url())
            .query(&[("key", self.api_key.as_str())])
            .timeout(REQUEST_TIMEOUT)
            .json(body)
            .send()
            .await
            .map_err(|err| {
                GenerationError::Transport(format!("Gemini API request failed: {err}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            return Err(map_http_error(status, body_text));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|err| {
            GenerationError::Malformed(format!("Failed to parse Gemini response: {err}"))
        })?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl Generator for GeminiApiAgent {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        debug!(model = %self.model, prompt_chars = prompt.chars().count(), "Calling Gemini");
        let request = self.build_request(prompt);
        self.send_request(&request).await
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
    safety_settings: Vec<SafetySetting>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_k: u32,
    top_p: f32,
    max_output_tokens: u32,
}

impl From<&GenerationSettings> for GenerationConfig {
    fn from(settings: &GenerationSettings) -> Self {
        Self {
            temperature: settings.temperature,
            top_k: settings.top_k,
            top_p: settings.top_p,
            max_output_tokens: settings.max_output_tokens,
        }
    }
}

#[derive(Serialize)]
struct SafetySetting {
    category: String,
    threshold: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

/// Text of the first part of the first candidate.
fn extract_text_response(response: GenerateContentResponse) -> Result<String, GenerationError> {
    response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().find_map(|part| part.text))
        .filter(|text| !text.trim().is_empty())
        .ok_or(GenerationError::EmptyResponse)
}

fn map_http_error(status: StatusCode, body: String) -> GenerationError {
    let message = serde_json::from_str::<ErrorWrapper>(&body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.clone());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|_| body.clone());

    GenerationError::Http {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_body_shape() {
        let agent = GeminiApiAgent::new("k", "gemini-2.5-flash");
        let body = serde_json::to_value(agent.build_request("roast me")).unwrap();

        assert_eq!(body["contents"][0]["parts"][0]["text"], "roast me");
        assert_eq!(body["generationConfig"]["topK"], 40);
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 1024);
        let safety = body["safetySettings"].as_array().unwrap();
        assert_eq!(safety.len(), 4);
        assert!(safety.iter().all(|s| s["threshold"] == "BLOCK_NONE"));
    }

    #[test]
    fn test_request_url() {
        let agent = GeminiApiAgent::new("k", "gemini-2.5-flash");
        assert_eq!(
            agent.request_url(),
            format!("{BASE_URL}/gemini-2.5-flash:generateContent")
        );
        let agent = agent.with_endpoint("http://localhost:1234/x");
        assert_eq!(agent.request_url(), "http://localhost:1234/x");
    }

    #[test]
    fn test_extract_first_candidate_text() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [
                {"content": {"parts": [{"text": "first"}]}},
                {"content": {"parts": [{"text": "second"}]}}
            ]
        }))
        .unwrap();
        assert_eq!(extract_text_response(response).unwrap(), "first");
    }

    #[test]
    fn test_extract_missing_text_is_empty_response() {
        for value in [
            json!({}),
            json!({"candidates": []}),
            json!({"candidates": [{"finishReason": "SAFETY"}]}),
            json!({"candidates": [{"content": {"parts": [{"text": "   "}]}}]}),
        ] {
            let response: GenerateContentResponse = serde_json::from_value(value).unwrap();
            assert_eq!(
                extract_text_response(response),
                Err(GenerationError::EmptyResponse)
            );
        }
    }

    #[test]
    fn test_map_http_error_uses_error_body() {
        let body = r#"{"error":{"code":429,"message":"quota","status":"RESOURCE_EXHAUSTED"}}"#;
        let err = map_http_error(StatusCode::TOO_MANY_REQUESTS, body.to_string());
        assert_eq!(
            err,
            GenerationError::Http {
                status: 429,
                message: "RESOURCE_EXHAUSTED: quota".to_string()
            }
        );
        assert!(err.is_transient());

        let err = map_http_error(StatusCode::BAD_REQUEST, "plain".to_string());
        assert_eq!(
            err,
            GenerationError::Http {
                status: 400,
                message: "plain".to_string()
            }
        );
    }
}
