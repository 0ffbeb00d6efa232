// Scripted agent interactions run from the command line
use futures::StreamExt;
use std::io::Write;
use std::sync::Arc;
use tracing::info;

use crate::agents::{create_react_agent, Agent, AgentStream, Checkpointer, ReactAgent, RunConfig, StreamMode};
use crate::config::AgentConfig;
use crate::contracts::ProposalReader;
use crate::error::VotaResult;
use crate::providers::{Message, ModelClient};
use crate::tools::{GetProposalsTool, SupermultiplyTool, Tool, ToolRegistry};

pub const WEATHER_PROMPT: &str = "whats the weather in uk birmingham?";
pub const GREETING_PROMPT: &str = "hi im bob!";
pub const RECALL_PROMPT: &str = "whats my name?";
pub const CUSTOM_PROMPT: &str = "what is the supermultiply of 2 and 3??";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    Weather,
    Memory,
    Custom,
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scenario::Weather => write!(f, "weather"),
            Scenario::Memory => write!(f, "memory"),
            Scenario::Custom => write!(f, "custom"),
        }
    }
}

/// Everything the scenarios need, passed in explicitly.
pub struct ScenarioContext {
    pub model: Arc<dyn ModelClient>,
    pub search: Arc<dyn Tool>,
    pub contract: Arc<dyn ProposalReader>,
    pub memory: Arc<dyn Checkpointer>,
    pub agent: AgentConfig,
}

impl ScenarioContext {
    pub fn base_tools(&self) -> ToolRegistry {
        ToolRegistry::new().with_tool(self.search.clone())
    }

    /// Search plus the arithmetic and proposal tools.
    pub fn custom_tools(&self) -> ToolRegistry {
        self.base_tools()
            .with_tool(Arc::new(SupermultiplyTool::new()))
            .with_tool(Arc::new(GetProposalsTool::new(self.contract.clone())))
    }

    fn build_agent(&self, tools: ToolRegistry, with_memory: bool) -> ReactAgent {
        let checkpointer = with_memory.then(|| self.memory.clone());
        create_react_agent(self.model.clone(), tools, checkpointer)
            .with_system_prompt(self.agent.system_prompt.clone())
            .with_recursion_limit(self.agent.recursion_limit)
    }

    pub async fn run<W: Write>(&self, scenario: Scenario, out: &mut W) -> VotaResult<()> {
        info!("▶️  Running {} scenario", scenario);
        match scenario {
            Scenario::Weather => weather(&self.build_agent(self.base_tools(), false), out).await,
            Scenario::Memory => {
                multi_turn(&self.build_agent(self.base_tools(), true), &self.agent.thread_id, out).await
            }
            Scenario::Custom => custom_tool(&self.build_agent(self.custom_tools(), false), out).await,
        }
    }
}

/// Writes `agent`-node text fragments, each followed by `separator`.
async fn print_agent_text<W: Write>(mut stream: AgentStream, separator: &str, out: &mut W) -> VotaResult<()> {
    while let Some(event) = stream.next().await {
        if let Some(text) = event?.agent_text() {
            write!(out, "{}{}", text, separator)?;
            out.flush()?;
        }
    }
    Ok(())
}

pub async fn weather<W: Write>(agent: &dyn Agent, out: &mut W) -> VotaResult<()> {
    let stream = agent
        .stream(vec![Message::user(WEATHER_PROMPT)], RunConfig::default(), StreamMode::Messages)
        .await?;
    print_agent_text(stream, "", out).await?;
    writeln!(out)?;
    Ok(())
}

/// Two turns on one thread; the second only works if the first was remembered.
pub async fn multi_turn<W: Write>(agent: &dyn Agent, thread_id: &str, out: &mut W) -> VotaResult<()> {
    let config = RunConfig::with_thread(thread_id);

    let stream = agent
        .stream(vec![Message::user(GREETING_PROMPT)], config.clone(), StreamMode::Messages)
        .await?;
    print_agent_text(stream, "|", out).await?;
    writeln!(out)?;

    let mut stream = agent
        .stream(vec![Message::user(RECALL_PROMPT)], config, StreamMode::Updates)
        .await?;
    while let Some(event) = stream.next().await {
        writeln!(out, "{}", event?)?;
        writeln!(out, "----")?;
    }
    Ok(())
}

pub async fn custom_tool<W: Write>(agent: &dyn Agent, out: &mut W) -> VotaResult<()> {
    let mut stream = agent
        .stream(vec![Message::user(CUSTOM_PROMPT)], RunConfig::default(), StreamMode::Messages)
        .await?;
    while let Some(event) = stream.next().await {
        writeln!(out, "{}", event?)?;
    }
    Ok(())
}
