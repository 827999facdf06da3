//! OpenAI chat-completions summarizer.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{parse_summary, Summarizer, SummaryError};
use crate::models::Summary;
use crate::utils::HttpClient;

const SYSTEM_PROMPT: &str = "You are a scientific summarizer. \
Return exactly three lines:\n\
1) Problem: <one sentence>\n\
2) Result: <one sentence>\n\
3) Method: <one sentence>";

const TEMPERATURE: f32 = 0.3;
const MAX_TOKENS: u32 = 120;

/// OpenAI API request message
#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

/// OpenAI API request
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

/// OpenAI API response
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// OpenAI API error response
#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiError,
}

/// Summarizer backed by an OpenAI-compatible chat-completions endpoint
pub struct OpenAiSummarizer {
    client: HttpClient,
    api_key: String,
    model: String,
    endpoint: String,
}

impl std::fmt::Debug for OpenAiSummarizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiSummarizer")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl OpenAiSummarizer {
    /// `base_url` is the API root, e.g. `https://api.openai.com/v1`
    pub fn new(
        client: HttpClient,
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: &str,
    ) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
        }
    }

    fn request<'a>(&'a self, title: &str, abstract_text: &str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: format!("TITLE: {}\nTEXT: {}", title, abstract_text),
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        }
    }
}

#[async_trait]
impl Summarizer for OpenAiSummarizer {
    async fn summarize(&self, title: &str, abstract_text: &str) -> Result<Summary, SummaryError> {
        let response = self
            .client
            .client()
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.request(title, abstract_text))
            .send()
            .await
            .map_err(|e| SummaryError::Request(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SummaryError::Request(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            if let Ok(error) = serde_json::from_str::<ApiErrorResponse>(&body) {
                return Err(SummaryError::Api(error.error.message));
            }
            return Err(SummaryError::Api(format!("{}: {}", status, body)));
        }

        let parsed: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| SummaryError::Malformed(format!("Failed to parse response: {}", e)))?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| SummaryError::Malformed("reply had no content".to_string()))?;

        parse_summary(&text)
    }
}
