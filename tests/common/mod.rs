#![allow(dead_code)]

use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

use vota::contracts::{str_to_bytes32, ProposalReader, RawProposal};
use vota::error::{VotaError, VotaResult};
use vota::providers::{MessageRequest, ModelClient, ModelEvent, ModelStream, ToolCall};
use vota::tools::{Tool, ToolOutput};

/// Model that replays canned replies and records every request it receives.
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Vec<ModelEvent>>>,
    requests: Mutex<Vec<MessageRequest>>,
}

impl ScriptedModel {
    pub fn new(replies: Vec<Vec<ModelEvent>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<MessageRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelClient for ScriptedModel {
    async fn stream_message(&self, request: &MessageRequest) -> VotaResult<ModelStream> {
        self.requests.lock().unwrap().push(request.clone());
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| VotaError::provider("script exhausted"))?;

        Ok(Box::pin(futures::stream::iter(reply.into_iter().map(Ok))))
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

pub fn text_reply(text: &str) -> Vec<ModelEvent> {
    vec![
        ModelEvent::TextDelta(text.to_string()),
        ModelEvent::Stop {
            reason: Some("end_turn".to_string()),
        },
    ]
}

pub fn tool_reply(id: &str, name: &str, input: Value) -> Vec<ModelEvent> {
    vec![
        ModelEvent::ToolUse(ToolCall {
            id: id.to_string(),
            name: name.to_string(),
            input,
        }),
        ModelEvent::Stop {
            reason: Some("tool_use".to_string()),
        },
    ]
}

/// In-memory stand-in for a deployed voting contract.
pub struct FakeContract {
    proposals: Vec<RawProposal>,
}

impl FakeContract {
    pub fn new(entries: &[(&str, u64)]) -> Self {
        let proposals = entries
            .iter()
            .map(|(name, votes)| RawProposal {
                name: str_to_bytes32(name).unwrap(),
                votes: U256::from(*votes),
            })
            .collect();
        Self { proposals }
    }

    pub fn seeded() -> Self {
        Self::new(&[("hello", 0), ("world", 0), ("sigmaboy", 0)])
    }
}

#[async_trait]
impl ProposalReader for FakeContract {
    async fn raw_proposals(&self) -> VotaResult<Vec<RawProposal>> {
        Ok(self.proposals.clone())
    }

    fn address(&self) -> Address {
        Address::ZERO
    }
}

/// Web search stand-in that answers every query with one fixed hit.
pub struct StubSearch;

#[async_trait]
impl Tool for StubSearch {
    async fn execute(&self, _input: Value) -> VotaResult<ToolOutput> {
        Ok(ToolOutput::new(json!([
            { "url": "https://weather.example/birmingham", "content": "Light rain, 12C" }
        ])))
    }

    fn name(&self) -> &str {
        "tavily_search_results_json"
    }

    fn description(&self) -> &str {
        "Canned web search."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": { "query": { "type": "string" } },
            "required": ["query"]
        })
    }
}

/// Formats one server-sent event.
pub fn sse(event: &str, data: Value) -> String {
    format!("event: {}\ndata: {}\n\n", event, data)
}

/// Accepts a single HTTP request on localhost and answers it with `status`,
/// writing each body chunk after `delay`. The connection is closed after the
/// last chunk, which ends the body. Returns the base URL and the raw request.
pub async fn serve_once(
    status: u16,
    content_type: &str,
    chunks: Vec<String>,
    delay: Duration,
) -> std::io::Result<(String, oneshot::Receiver<String>)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let base_url = format!("http://{}", listener.local_addr()?);
    let head = format!(
        "HTTP/1.1 {} Test\r\ncontent-type: {}\r\nconnection: close\r\n\r\n",
        status, content_type
    );
    let (request_tx, request_rx) = oneshot::channel();

    tokio::spawn(async move {
        let Ok((mut socket, _)) = listener.accept().await else {
            return;
        };
        let Ok(request) = read_request(&mut socket).await else {
            return;
        };
        let _ = request_tx.send(request);

        if socket.write_all(head.as_bytes()).await.is_err() {
            return;
        }
        for chunk in chunks {
            tokio::time::sleep(delay).await;
            if socket.write_all(chunk.as_bytes()).await.is_err() {
                return;
            }
            let _ = socket.flush().await;
        }
        let _ = socket.shutdown().await;
    });

    Ok((base_url, request_rx))
}

async fn read_request(socket: &mut TcpStream) -> std::io::Result<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
            let body_len = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + body_len {
                break;
            }
        }
        let n = socket.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
