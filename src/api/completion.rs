use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use crate::api::{ChatCompletionResponse, ChatRequest};
use crate::core::message::{Message, Role};
use crate::utils::url::construct_api_url;

/// Failure of a single completion round trip.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("API request failed with status {status}: {summary}")]
    Status {
        status: reqwest::StatusCode,
        summary: String,
    },

    #[error("Failed to decode completion response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Completion response contained no choices")]
    NoChoices,

    #[error("Completion response has unexpected role `{0}`")]
    UnexpectedRole(String),

    #[error("Completion response message has no content")]
    MissingContent,
}

/// Something that can turn a transcript into the next assistant message.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, model: &str, messages: &[Message])
        -> Result<Message, CompletionError>;
}

/// Client for OpenAI-compatible `/chat/completions` endpoints.
pub struct OpenAiClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl OpenAiClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, token)
    }

    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            token: token.into(),
        }
    }

    pub fn endpoint(&self) -> String {
        construct_api_url(&self.base_url, "chat/completions")
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(
        &self,
        model: &str,
        messages: &[Message],
    ) -> Result<Message, CompletionError> {
        let url = self.endpoint();
        debug!(url = %url, model = %model, messages = messages.len(), "Sending completion request");

        let transport = |source| CompletionError::Transport {
            url: url.clone(),
            source,
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Content-Type", "application/json")
            .json(&ChatRequest { model, messages })
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        let body = response.text().await.map_err(transport)?;
        debug!(status = %status, bytes = body.len(), "Received completion response");

        if !status.is_success() {
            return Err(CompletionError::Status {
                status,
                summary: summarize_error_body(&body),
            });
        }

        parse_completion(&body)
    }
}

/// Validate a completion body and pull out the first choice's message.
pub fn parse_completion(body: &str) -> Result<Message, CompletionError> {
    let response: ChatCompletionResponse = serde_json::from_str(body)?;
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or(CompletionError::NoChoices)?;

    if let Some(reason) = &choice.finish_reason {
        debug!(finish_reason = %reason, "Completion finished");
    }

    match Role::try_from(choice.message.role.as_str()) {
        Ok(Role::Assistant) => {}
        _ => return Err(CompletionError::UnexpectedRole(choice.message.role)),
    }

    let content = choice.message.content.ok_or(CompletionError::MissingContent)?;
    Ok(Message::assistant(content))
}

/// One-line summary of an error body, preferring the provider's own message.
fn summarize_error_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    let summary = serde_json::from_str::<serde_json::Value>(trimmed)
        .ok()
        .and_then(|value| {
            value
                .pointer("/error/message")
                .and_then(|v| v.as_str())
                .or_else(|| value.get("error").and_then(|v| v.as_str()))
                .or_else(|| value.get("message").and_then(|v| v.as_str()))
                .map(str::to_owned)
        })
        .unwrap_or_else(|| trimmed.to_string());

    summary.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::Mutex;

    type CapturedRequest = Arc<Mutex<Option<(String, String)>>>;

    /// Serve exactly one HTTP exchange on a local port and capture the
    /// request head and body.
    async fn serve_once(status_line: &'static str, body: String) -> (String, CapturedRequest) {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("listener should bind");
        let addr = listener.local_addr().expect("local addr should resolve");
        let captured: CapturedRequest = Arc::new(Mutex::new(None));
        let captured_for_server = Arc::clone(&captured);

        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.expect("accept");
            let mut raw = Vec::new();
            let mut chunk = [0u8; 4096];
            let (head, body_start) = loop {
                let read = stream.read(&mut chunk).await.expect("read");
                assert!(read > 0, "client closed before sending headers");
                raw.extend_from_slice(&chunk[..read]);
                if let Some(end) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
                    break (String::from_utf8_lossy(&raw[..end]).to_string(), end + 4);
                }
            };
            let content_length = head
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            while raw.len() < body_start + content_length {
                let read = stream.read(&mut chunk).await.expect("read body");
                if read == 0 {
                    break;
                }
                raw.extend_from_slice(&chunk[..read]);
            }
            let request_body = String::from_utf8_lossy(&raw[body_start..]).to_string();
            *captured_for_server.lock().await = Some((head, request_body));

            let response = format!(
                "{status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            stream
                .write_all(response.as_bytes())
                .await
                .expect("write response");
        });

        (format!("http://{addr}/v1/"), captured)
    }

    fn local_client(base_url: &str) -> OpenAiClient {
        let client = reqwest::Client::builder()
            .no_proxy()
            .build()
            .expect("client should build");
        OpenAiClient::with_client(client, base_url, "sk-test")
    }

    #[tokio::test]
    async fn sends_bearer_token_and_transcript() {
        let reply = serde_json::json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "finish_reason": "stop",
                "message": { "role": "assistant", "content": "Hello!" }
            }]
        })
        .to_string();
        let (base_url, captured) = serve_once("HTTP/1.1 200 OK", reply).await;
        let client = local_client(&base_url);

        let messages = vec![Message::system("be brief"), Message::user("hi")];
        let message = client
            .complete("gpt-3.5-turbo", &messages)
            .await
            .expect("completion should succeed");
        assert_eq!(message, Message::assistant("Hello!"));

        let (head, body) = captured.lock().await.clone().expect("request captured");
        assert!(head.starts_with("POST /v1/chat/completions "));
        assert!(head
            .lines()
            .any(|line| line.eq_ignore_ascii_case("authorization: Bearer sk-test")));
        let body: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body["model"], "gpt-3.5-turbo");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "hi");
    }

    #[tokio::test]
    async fn non_success_status_is_summarized() {
        let reply = r#"{"error":{"message":"Incorrect API key   provided","type":"invalid_request_error"}}"#;
        let (base_url, _captured) =
            serve_once("HTTP/1.1 401 Unauthorized", reply.to_string()).await;

        let err = local_client(&base_url)
            .complete("m", &[Message::user("hi")])
            .await
            .expect_err("expected status error");
        match err {
            CompletionError::Status { status, summary } => {
                assert_eq!(status.as_u16(), 401);
                assert_eq!(summary, "Incorrect API key provided");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let (base_url, _captured) =
            serve_once("HTTP/1.1 200 OK", "not json".to_string()).await;
        let err = local_client(&base_url)
            .complete("m", &[Message::user("hi")])
            .await
            .expect_err("expected decode error");
        assert!(matches!(err, CompletionError::Decode(_)));
    }

    #[test]
    fn response_shape_is_validated() {
        assert!(matches!(
            parse_completion(r#"{"choices":[]}"#),
            Err(CompletionError::NoChoices)
        ));
        assert!(matches!(
            parse_completion(r#"{"id":"x"}"#),
            Err(CompletionError::NoChoices)
        ));
        assert!(matches!(
            parse_completion(r#"{"choices":[{"message":{"role":"user","content":"x"}}]}"#),
            Err(CompletionError::UnexpectedRole(role)) if role == "user"
        ));
        assert!(matches!(
            parse_completion(r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#),
            Err(CompletionError::MissingContent)
        ));
        assert!(matches!(
            parse_completion(r#"{"choices":[{"message":{"content":"x"}}]}"#),
            Err(CompletionError::Decode(_))
        ));
    }

    #[test]
    fn error_summaries_fall_back_to_raw_text() {
        assert_eq!(summarize_error_body("  "), "<empty>");
        assert_eq!(summarize_error_body("Bad\n gateway"), "Bad gateway");
        assert_eq!(summarize_error_body(r#"{"error":"quota"}"#), "quota");
    }
}
