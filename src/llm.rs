//! Optional summarization through an OpenAI-compatible chat-completions endpoint.
//!
//! The whole export document is sent as one user message. Its size is not
//! negotiated or chunked: an endpoint that rejects the input simply produces
//! an error, which [`summarize_or_message`] turns into displayable text.

use crate::config::LlmConfig;
use crate::constants::USER_AGENT;
use log::{debug, warn};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix of the text shown in place of a summary when the call fails.
pub const SUMMARY_UNAVAILABLE_PREFIX: &str = "Summary unavailable:";

/// Failures of the completion endpoint.
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("authentication failed (check the API key)")]
    Authentication,

    #[error("rate limit exceeded")]
    RateLimit,

    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("the endpoint returned no summary")]
    EmptyResponse,
}

/// Something that can summarize a repository document.
pub trait Summarizer: Send + Sync {
    fn summarize(&self, document: &str) -> Result<String, LlmError>;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Blocking client for `POST {api_base_url}/chat/completions`.
pub struct ChatCompletionsClient {
    client: Client,
    config: LlmConfig,
}

impl ChatCompletionsClient {
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|_| LlmError::Authentication)?;
        headers.insert(AUTHORIZATION, bearer);

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.api_base_url.trim_end_matches('/'))
    }
}

impl Summarizer for ChatCompletionsClient {
    fn summarize(&self, document: &str) -> Result<String, LlmError> {
        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &self.config.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: document,
                },
            ],
            max_tokens: self.config.max_tokens,
        };

        let url = self.endpoint();
        debug!(
            "POST {} (model {}, {} bytes of input)",
            url,
            self.config.model,
            document.len()
        );
        let response = self.client.post(&url).json(&body).send()?;
        let status = response.status();
        let text = response.text()?;

        if !status.is_success() {
            return Err(match status.as_u16() {
                401 | 403 => LlmError::Authentication,
                429 => LlmError::RateLimit,
                code => LlmError::Api {
                    status: code,
                    message: serde_json::from_str::<ApiErrorBody>(&text)
                        .map(|e| e.error.message)
                        .unwrap_or(text),
                },
            });
        }

        let parsed: ChatResponse = serde_json::from_str(&text).map_err(|e| LlmError::Api {
            status: status.as_u16(),
            message: format!("unreadable response: {}", e),
        })?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or(LlmError::EmptyResponse)
    }
}

/// Summarizes `document`, converting any failure into `"Summary unavailable: {reason}"`.
pub fn summarize_or_message(summarizer: &dyn Summarizer, document: &str) -> String {
    match summarizer.summarize(document) {
        Ok(summary) => summary,
        Err(e) => {
            warn!("Summarization failed: {}", e);
            format!("{} {}", SUMMARY_UNAVAILABLE_PREFIX, e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn client_for(server: &Server) -> ChatCompletionsClient {
        let mut config = LlmConfig::new("sk-test");
        config.api_base_url = format!("{}/v1", server.url());
        config.model = "test-model".to_string();
        ChatCompletionsClient::new(config).expect("client builds")
    }

    #[test]
    fn test_successful_summary() {
        let mut server = Server::new();
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_body(Matcher::AllOf(vec![
                Matcher::PartialJson(json!({"model": "test-model"})),
                Matcher::Regex(r##""role":"user","content":"# Analysis of x""##.to_string()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({"choices": [{"message": {"role": "assistant", "content": " A tiny repo. "}}]})
                    .to_string(),
            )
            .create();

        let client = client_for(&server);
        assert_eq!(client.summarize("# Analysis of x").unwrap(), "A tiny repo.");
        mock.assert();
    }

    #[test]
    fn test_error_statuses() {
        let mut server = Server::new();
        let _auth = server
            .mock("POST", "/v1/chat/completions")
            .with_status(401)
            .create();
        let client = client_for(&server);
        assert!(matches!(client.summarize("doc"), Err(LlmError::Authentication)));

        server.reset();
        let _limit = server
            .mock("POST", "/v1/chat/completions")
            .with_status(429)
            .create();
        assert!(matches!(client.summarize("doc"), Err(LlmError::RateLimit)));

        server.reset();
        let _big = server
            .mock("POST", "/v1/chat/completions")
            .with_status(400)
            .with_body(json!({"error": {"message": "context length exceeded"}}).to_string())
            .create();
        match client.summarize("doc") {
            Err(LlmError::Api { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "context length exceeded");
            }
            other => panic!("Expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_choices() {
        let mut server = Server::new();
        let _m = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body(json!({"choices": []}).to_string())
            .create();
        let client = client_for(&server);
        assert!(matches!(client.summarize("doc"), Err(LlmError::EmptyResponse)));
    }

    #[test]
    fn test_failure_becomes_message() {
        struct Failing;
        impl Summarizer for Failing {
            fn summarize(&self, _document: &str) -> Result<String, LlmError> {
                Err(LlmError::RateLimit)
            }
        }
        assert_eq!(
            summarize_or_message(&Failing, "doc"),
            "Summary unavailable: rate limit exceeded"
        );
    }
}
