// Agent system - tool-calling agent loop and conversation memory
pub mod memory;
pub mod react;

use async_trait::async_trait;
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

use crate::error::VotaResult;
use crate::providers::{ContentBlock, Message, ToolCall};

pub use memory::{Checkpoint, Checkpointer, MemorySaver};
pub use react::{create_react_agent, ReactAgent};

/// Graph node that produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Node {
    Agent,
    Tools,
}

impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Node::Agent => write!(f, "agent"),
            Node::Tools => write!(f, "tools"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamMode {
    /// One event per completed node step
    #[default]
    Updates,
    /// One event per message fragment as it arrives
    Messages,
}

#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    /// Conversation thread; history is kept only when set and the agent has a checkpointer
    pub thread_id: Option<String>,
    pub recursion_limit: Option<usize>,
}

impl RunConfig {
    pub fn with_thread(thread_id: impl Into<String>) -> Self {
        Self {
            thread_id: Some(thread_id.into()),
            recursion_limit: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepMetadata {
    pub node: Node,
    pub step: usize,
    pub thread_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    Text(String),
    ToolCall(ToolCall),
    ToolResult {
        tool_use_id: String,
        name: String,
        content: String,
        is_error: bool,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum AgentEvent {
    Message {
        fragment: Fragment,
        metadata: StepMetadata,
    },
    Update {
        node: Node,
        messages: Vec<Message>,
    },
}

impl AgentEvent {
    /// Text carried by an `agent`-node message fragment.
    pub fn agent_text(&self) -> Option<&str> {
        match self {
            AgentEvent::Message {
                fragment: Fragment::Text(text),
                metadata,
            } if metadata.node == Node::Agent && !text.is_empty() => Some(text.as_str()),
            _ => None,
        }
    }
}

impl std::fmt::Display for AgentEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgentEvent::Message { fragment, metadata } => match fragment {
                Fragment::Text(text) => write!(f, "[{}] {}", metadata.node, text),
                Fragment::ToolCall(call) => write!(f, "[{}] call {}({})", metadata.node, call.name, call.input),
                Fragment::ToolResult { name, content, is_error, .. } => {
                    let label = if *is_error { "failed" } else { "returned" };
                    write!(f, "[{}] {} {}: {}", metadata.node, name, label, content)
                }
            },
            AgentEvent::Update { node, messages } => {
                write!(f, "{}:", node)?;
                for message in messages {
                    for block in &message.content {
                        match block {
                            ContentBlock::Text { text } => write!(f, " {}", text)?,
                            ContentBlock::ToolUse { name, input, .. } => write!(f, " call {}({})", name, input)?,
                            ContentBlock::ToolResult { content, is_error, .. } => {
                                if *is_error {
                                    write!(f, " error: {}", content)?
                                } else {
                                    write!(f, " result: {}", content)?
                                }
                            }
                        }
                    }
                }
                Ok(())
            }
        }
    }
}

pub type AgentStream = Pin<Box<dyn Stream<Item = VotaResult<AgentEvent>> + Send>>;

/// Submit a conversation turn, receive the ordered response events.
#[async_trait]
pub trait Agent: Send + Sync {
    async fn stream(&self, input: Vec<Message>, config: RunConfig, mode: StreamMode) -> VotaResult<AgentStream>;
}
