//! Chat completion client
//!
//! Streaming responses arrive as newline-delimited Server-Sent-Events
//! frames. Each `data: ` payload is parsed as JSON and its incremental
//! delta appended to the accumulator and handed to the caller's sink; the
//! literal `[DONE]` payload terminates the stream. Malformed frames are
//! skipped without failing the stream.

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use crate::{ChatConfig, ChatMessage, LlmError, Result};

/// Per-request sampling parameters
#[derive(Debug, Clone, Copy)]
pub struct CompletionOptions {
    /// Maximum tokens to generate
    pub max_tokens: usize,
    /// Sampling temperature
    pub temperature: f32,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self { max_tokens: 4096, temperature: 0.7 }
    }
}

impl CompletionOptions {
    /// Preset used for analysis runs: long output, low temperature
    pub fn analysis() -> Self {
        Self { max_tokens: 4096, temperature: 0.4 }
    }
}

/// Seam between agent execution and the network
///
/// [`ChatClient`] is the production implementation; tests substitute
/// scripted fakes to drive chunk interleavings deterministically.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Issue one request and return the first choice's content
    async fn complete(&self, messages: &[ChatMessage], options: &CompletionOptions)
    -> Result<String>;

    /// Issue one streaming request, delivering each delta to `on_chunk`
    ///
    /// Returns the fully accumulated text on normal completion. When
    /// `cancel` fires the transport is dropped and the call resolves with
    /// whatever had accumulated; no further chunks are delivered and no
    /// error is raised.
    async fn stream_complete(
        &self,
        messages: &[ChatMessage],
        options: &CompletionOptions,
        cancel: &CancellationToken,
        on_chunk: &mut (dyn for<'a> FnMut(&'a str) + Send),
    ) -> Result<String>;
}

/// HTTP client for an OpenAI-compatible chat-completions endpoint
pub struct ChatClient {
    client: Client,
    config: ChatConfig,
}

impl ChatClient {
    /// Create a client with the given configuration
    pub fn new(config: ChatConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    /// Create a client from environment variables (see [`ChatConfig::from_env`])
    pub fn from_env() -> Result<Self> {
        Self::new(ChatConfig::from_env()?)
    }

    /// Current configuration
    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    fn request(
        &self,
        messages: &[ChatMessage],
        options: &CompletionOptions,
        stream: bool,
    ) -> reqwest::RequestBuilder {
        let body = ChatRequest {
            model: &self.config.model,
            messages,
            stream,
            max_tokens: options.max_tokens,
            temperature: options.temperature,
        };
        self.client
            .post(format!("{}/chat/completions", self.config.api_base))
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
    }
}

#[async_trait]
impl CompletionBackend for ChatClient {
    #[instrument(skip(self, messages, options), fields(model = %self.config.model))]
    async fn complete(
        &self,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<String> {
        debug!("sending completion request ({} messages)", messages.len());

        let response = self.request(messages, options, false).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api { status: status.as_u16(), body });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::UnexpectedResponse(format!("failed to parse response: {e}")))?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::UnexpectedResponse("no choices in response".to_string()))?;

        Ok(choice.message.content.unwrap_or_default())
    }

    #[instrument(skip_all, fields(model = %self.config.model))]
    async fn stream_complete(
        &self,
        messages: &[ChatMessage],
        options: &CompletionOptions,
        cancel: &CancellationToken,
        on_chunk: &mut (dyn for<'a> FnMut(&'a str) + Send),
    ) -> Result<String> {
        if cancel.is_cancelled() {
            return Ok(String::new());
        }

        let request = self.request(messages, options, true);
        let response = tokio::select! {
            () = cancel.cancelled() => return Ok(String::new()),
            response = request.send() => response?,
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api { status: status.as_u16(), body });
        }

        let mut stream = response.bytes_stream();
        let mut buffer = String::new();
        let mut full = String::new();

        loop {
            let chunk = tokio::select! {
                () = cancel.cancelled() => {
                    debug!("stream cancelled after {} bytes", full.len());
                    return Ok(full);
                }
                next = stream.next() => match next {
                    Some(chunk) => chunk?,
                    None => break,
                },
            };

            buffer.push_str(&String::from_utf8_lossy(&chunk));

            // Frames are newline-delimited; hold back the trailing partial line
            while let Some(pos) = buffer.find('\n') {
                let line = buffer[..pos].to_string();
                buffer.drain(..=pos);

                match parse_sse_line(&line) {
                    SseLine::Delta(text) => {
                        full.push_str(&text);
                        on_chunk(&text);
                    }
                    SseLine::Done => return Ok(full),
                    SseLine::Skip => {}
                }
            }
        }

        warn!("stream ended without [DONE] sentinel");
        Ok(full)
    }
}

/// Outcome of parsing one SSE line
#[derive(Debug, PartialEq)]
enum SseLine {
    /// Incremental delta text
    Delta(String),
    /// The `[DONE]` terminator
    Done,
    /// Empty, non-data, contentless, or malformed line
    Skip,
}

fn parse_sse_line(line: &str) -> SseLine {
    let trimmed = line.trim();
    let Some(payload) = trimmed.strip_prefix("data: ") else {
        return SseLine::Skip;
    };

    if payload == "[DONE]" {
        return SseLine::Done;
    }

    match serde_json::from_str::<StreamFrame>(payload) {
        Ok(frame) => frame
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.delta.content)
            .filter(|content| !content.is_empty())
            .map_or(SseLine::Skip, SseLine::Delta),
        Err(_) => SseLine::Skip,
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
    max_tokens: usize,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct StreamFrame {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: StreamDelta,
}

#[derive(Deserialize, Default)]
struct StreamDelta {
    content: Option<String>,
}
