use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::env;
use tracing::{debug, error};

use super::{MessageRequest, ModelClient, ModelEvent, ModelStream, ToolCall};
use crate::config::ModelConfig;
use crate::error::{VotaError, VotaResult};
use crate::streaming::{sse_events, SseEvent};

pub struct ClaudeClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
    temperature: Option<f32>,
}

impl ClaudeClient {
    pub fn new(config: &ModelConfig) -> VotaResult<Self> {
        let api_key = env::var("ANTHROPIC_API_KEY")
            .or_else(|_| env::var("CLAUDE_API_KEY"))
            .map_err(|_| VotaError::config("ANTHROPIC_API_KEY or CLAUDE_API_KEY environment variable not set"))?;

        Self::with_api_key(api_key, config)
    }

    pub fn with_api_key(api_key: String, config: &ModelConfig) -> VotaResult<Self> {
        // Connect and per-read limits; a streamed reply has no total deadline
        let client = Client::builder()
            .connect_timeout(config.timeout())
            .read_timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.name.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }
}

#[async_trait]
impl ModelClient for ClaudeClient {
    async fn stream_message(&self, request: &MessageRequest) -> VotaResult<ModelStream> {
        let url = format!("{}/v1/messages", self.base_url);

        let mut payload = serde_json::to_value(request)?;
        payload["stream"] = json!(true);
        if request.temperature.is_none() {
            if let Some(temperature) = self.temperature {
                payload["temperature"] = json!(temperature);
            }
        }

        debug!("Sending request to Claude: {} ({} messages)", url, request.messages.len());

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .header("anthropic-version", "2023-06-01")
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            error!("Claude API error ({}): {}", status, error_text);
            return Err(VotaError::provider(format!("Claude API error ({}): {}", status, error_text)));
        }

        let mut events = sse_events(response.bytes_stream());
        let stream = async_stream::stream! {
            let mut assembler = StreamAssembler::new();
            while let Some(event) = events.next().await {
                let outcome = event.and_then(|e| assembler.push(&e));
                match outcome {
                    Ok(model_events) => {
                        for model_event in model_events {
                            yield Ok(model_event);
                        }
                    }
                    Err(e) => {
                        yield Err(e);
                        return;
                    }
                }
            }
        };

        Ok(Box::pin(stream))
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn max_tokens(&self) -> u32 {
        self.max_tokens
    }
}

enum PartialBlock {
    Text,
    ToolUse { id: String, name: String, json: String },
}

/// Folds Messages API stream events into [`ModelEvent`]s, buffering tool
/// input fragments until their content block closes.
#[derive(Default)]
pub struct StreamAssembler {
    blocks: HashMap<u64, PartialBlock>,
    stop_reason: Option<String>,
}

impl StreamAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: &SseEvent) -> VotaResult<Vec<ModelEvent>> {
        if event.data.is_empty() {
            return Ok(Vec::new());
        }

        let data: Value = serde_json::from_str(&event.data)?;
        let kind = data["type"].as_str().or(event.event.as_deref()).unwrap_or_default();
        let index = data["index"].as_u64().unwrap_or(0);

        let mut out = Vec::new();
        match kind {
            "content_block_start" => {
                let block = &data["content_block"];
                match block["type"].as_str() {
                    Some("tool_use") => {
                        self.blocks.insert(index, PartialBlock::ToolUse {
                            id: block["id"].as_str().unwrap_or_default().to_string(),
                            name: block["name"].as_str().unwrap_or_default().to_string(),
                            json: String::new(),
                        });
                    }
                    _ => {
                        self.blocks.insert(index, PartialBlock::Text);
                        if let Some(text) = block["text"].as_str().filter(|t| !t.is_empty()) {
                            out.push(ModelEvent::TextDelta(text.to_string()));
                        }
                    }
                }
            }
            "content_block_delta" => {
                let delta = &data["delta"];
                match delta["type"].as_str() {
                    Some("text_delta") => {
                        if let Some(text) = delta["text"].as_str() {
                            out.push(ModelEvent::TextDelta(text.to_string()));
                        }
                    }
                    Some("input_json_delta") => {
                        if let Some(PartialBlock::ToolUse { json, .. }) = self.blocks.get_mut(&index) {
                            json.push_str(delta["partial_json"].as_str().unwrap_or_default());
                        }
                    }
                    other => debug!("Ignoring delta type {:?}", other),
                }
            }
            "content_block_stop" => {
                if let Some(PartialBlock::ToolUse { id, name, json }) = self.blocks.remove(&index) {
                    let input = if json.trim().is_empty() {
                        json!({})
                    } else {
                        serde_json::from_str(&json)?
                    };
                    out.push(ModelEvent::ToolUse(ToolCall { id, name, input }));
                }
            }
            "message_delta" => {
                if let Some(reason) = data["delta"]["stop_reason"].as_str() {
                    self.stop_reason = Some(reason.to_string());
                }
            }
            "message_stop" => {
                out.push(ModelEvent::Stop {
                    reason: self.stop_reason.take(),
                });
            }
            "error" => {
                let message = data["error"]["message"].as_str().unwrap_or("unknown stream error");
                return Err(VotaError::provider(format!("Claude stream error: {}", message)));
            }
            // message_start, ping
            _ => {}
        }

        Ok(out)
    }
}
