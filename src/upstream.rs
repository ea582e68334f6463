//! Streaming completion client for the upstream chat-completion provider.
//!
//! One POST per request, no retries. A non-2xx answer is read (size-capped)
//! into a structured error for server-side logging; the response stream is
//! handed to the caller untouched on success.

use dialogue_protocol::{ChatCompletionRequest, ChatMessage};
use thiserror::Error;
use tracing::debug;

/// Maximum error response body size read from the upstream (1 MB).
const MAX_ERROR_RESPONSE_SIZE: usize = 1024 * 1024;

/// Failure to obtain a streaming completion.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The provider answered with a non-success status.
    #[error("upstream returned status {status}: {message}")]
    Status { status: u16, message: String },
    /// The request never produced a response.
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Client for the provider's `/v1/chat/completions` endpoint.
#[derive(Clone)]
pub struct CompletionClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl CompletionClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            http,
            base_url,
            api_key: api_key.into(),
        }
    }

    /// Issue a streaming chat-completion request.
    ///
    /// On success the returned response's byte stream carries the raw
    /// `data: {...}` lines from the provider.
    pub async fn stream_chat(
        &self,
        model_id: &str,
        prompt: String,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<reqwest::Response, UpstreamError> {
        let body = ChatCompletionRequest {
            model: model_id.to_string(),
            messages: vec![ChatMessage::user(prompt)],
            stream: true,
            temperature,
            max_tokens,
        };

        let url = format!("{}/v1/chat/completions", self.base_url);
        debug!(model = %model_id, url = %url, "Sending streaming completion request");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = read_body_limited(response).await;
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }
}

/// Read an error body, truncated to [`MAX_ERROR_RESPONSE_SIZE`].
async fn read_body_limited(response: reqwest::Response) -> String {
    match response.text().await {
        Ok(mut text) => {
            if text.len() > MAX_ERROR_RESPONSE_SIZE {
                let mut end = MAX_ERROR_RESPONSE_SIZE;
                while !text.is_char_boundary(end) {
                    end -= 1;
                }
                text.truncate(end);
            }
            text
        }
        Err(e) => format!("<failed to read error body: {e}>"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_normalized() {
        let client = CompletionClient::new(
            reqwest::Client::new(),
            "https://api.example.com/",
            "key",
        );
        assert_eq!(client.base_url, "https://api.example.com");
    }
}
