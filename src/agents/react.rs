use async_trait::async_trait;
use futures::StreamExt;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::{Agent, AgentEvent, AgentStream, Checkpointer, Fragment, Node, RunConfig, StepMetadata, StreamMode};
use crate::error::{VotaError, VotaResult};
use crate::providers::{ContentBlock, Message, MessageRequest, ModelClient, ModelEvent, Role};
use crate::tools::ToolRegistry;

pub const DEFAULT_RECURSION_LIMIT: usize = 25;

/// Alternates model calls and tool execution until the model answers
/// without requesting a tool.
pub struct ReactAgent {
    model: Arc<dyn ModelClient>,
    tools: ToolRegistry,
    checkpointer: Option<Arc<dyn Checkpointer>>,
    system_prompt: Option<String>,
    recursion_limit: usize,
}

pub fn create_react_agent(
    model: Arc<dyn ModelClient>,
    tools: ToolRegistry,
    checkpointer: Option<Arc<dyn Checkpointer>>,
) -> ReactAgent {
    ReactAgent {
        model,
        tools,
        checkpointer,
        system_prompt: None,
        recursion_limit: DEFAULT_RECURSION_LIMIT,
    }
}

impl ReactAgent {
    pub fn with_system_prompt(mut self, prompt: Option<String>) -> Self {
        self.system_prompt = prompt;
        self
    }

    pub fn with_recursion_limit(mut self, limit: usize) -> Self {
        self.recursion_limit = limit;
        self
    }

    async fn load_history(&self, thread_id: Option<&str>) -> VotaResult<Vec<Message>> {
        match (&self.checkpointer, thread_id) {
            (Some(checkpointer), Some(thread_id)) => Ok(checkpointer
                .get(thread_id)
                .await?
                .map(|cp| cp.messages)
                .unwrap_or_default()),
            _ => Ok(Vec::new()),
        }
    }
}

/// Appends `message`, folding it into the previous message when both come
/// from the same role so user turns stay alternating.
fn push_message(messages: &mut Vec<Message>, message: Message) {
    match messages.last_mut() {
        Some(last) if last.role == message.role => last.content.extend(message.content),
        _ => messages.push(message),
    }
}

#[async_trait]
impl Agent for ReactAgent {
    async fn stream(&self, input: Vec<Message>, config: RunConfig, mode: StreamMode) -> VotaResult<AgentStream> {
        let mut messages = self.load_history(config.thread_id.as_deref()).await?;
        if !messages.is_empty() {
            debug!("Resuming thread with {} messages", messages.len());
        }
        for message in input {
            push_message(&mut messages, message);
        }

        let model = self.model.clone();
        let tools = self.tools.clone();
        let checkpointer = self.checkpointer.clone();
        let system = self.system_prompt.clone();
        let limit = config.recursion_limit.unwrap_or(self.recursion_limit);
        let thread_id = config.thread_id;

        let stream = async_stream::try_stream! {
            let mut step = 0usize;
            let meta = |node: Node, step: usize| StepMetadata {
                node,
                step,
                thread_id: thread_id.clone(),
            };

            loop {
                step += 1;
                if step > limit {
                    Err::<(), _>(VotaError::agent(format!("recursion limit of {} reached", limit)))?;
                }

                let request = MessageRequest {
                    model: model.model_name().to_string(),
                    max_tokens: model.max_tokens(),
                    system: system.clone(),
                    messages: messages.clone(),
                    tools: tools.specs(),
                    temperature: None,
                    stream: true,
                };

                let mut reply = model.stream_message(&request).await?;
                let mut text = String::new();
                let mut calls = Vec::new();

                while let Some(event) = reply.next().await {
                    match event? {
                        ModelEvent::TextDelta(delta) => {
                            text.push_str(&delta);
                            if mode == StreamMode::Messages {
                                yield AgentEvent::Message {
                                    fragment: Fragment::Text(delta),
                                    metadata: meta(Node::Agent, step),
                                };
                            }
                        }
                        ModelEvent::ToolUse(call) => {
                            if mode == StreamMode::Messages {
                                yield AgentEvent::Message {
                                    fragment: Fragment::ToolCall(call.clone()),
                                    metadata: meta(Node::Agent, step),
                                };
                            }
                            calls.push(call);
                        }
                        ModelEvent::Stop { reason } => {
                            debug!("Model stopped: {:?}", reason);
                        }
                    }
                }

                let mut content = Vec::new();
                if !text.is_empty() {
                    content.push(ContentBlock::Text { text });
                }
                for call in &calls {
                    content.push(ContentBlock::ToolUse {
                        id: call.id.clone(),
                        name: call.name.clone(),
                        input: call.input.clone(),
                    });
                }
                // The Messages API rejects empty assistant turns in history
                if content.is_empty() {
                    debug!("Model reply was empty; nothing to record");
                } else {
                    let reply_message = Message::assistant(content);
                    push_message(&mut messages, reply_message.clone());

                    if mode == StreamMode::Updates {
                        yield AgentEvent::Update {
                            node: Node::Agent,
                            messages: vec![reply_message],
                        };
                    }
                }

                if calls.is_empty() {
                    break;
                }

                step += 1;
                if step > limit {
                    Err::<(), _>(VotaError::agent(format!("recursion limit of {} reached", limit)))?;
                }

                let mut results = Vec::new();
                let mut all_direct = true;

                for call in &calls {
                    info!("🔧 Tool call: {}", call.name);
                    let direct = tools.get(&call.name).map(|t| t.return_direct()).unwrap_or(false);

                    // Tool failures go back to the model instead of ending the run
                    let (output, is_error) = match tools.execute_tool(&call.name, call.input.clone()).await {
                        Ok(output) => (output.to_text(), false),
                        Err(e) => {
                            warn!("Tool {} failed: {}", call.name, e);
                            (format!("Error: {}", e), true)
                        }
                    };
                    all_direct &= direct && !is_error;

                    if mode == StreamMode::Messages {
                        yield AgentEvent::Message {
                            fragment: Fragment::ToolResult {
                                tool_use_id: call.id.clone(),
                                name: call.name.clone(),
                                content: output.clone(),
                                is_error,
                            },
                            metadata: meta(Node::Tools, step),
                        };
                    }

                    results.push(ContentBlock::ToolResult {
                        tool_use_id: call.id.clone(),
                        content: output,
                        is_error,
                    });
                }

                let tool_message = Message {
                    role: Role::User,
                    content: results,
                };
                push_message(&mut messages, tool_message.clone());

                if mode == StreamMode::Updates {
                    yield AgentEvent::Update {
                        node: Node::Tools,
                        messages: vec![tool_message],
                    };
                }

                if all_direct {
                    debug!("Return-direct tool ended the turn");
                    break;
                }
            }

            if let (Some(checkpointer), Some(thread_id)) = (&checkpointer, &thread_id) {
                checkpointer.put(thread_id, messages.clone()).await?;
            }
        };

        Ok(boxed(stream))
    }
}

fn boxed<S>(stream: S) -> AgentStream
where
    S: futures::Stream<Item = VotaResult<AgentEvent>> + Send + 'static,
{
    Box::pin(stream)
}
