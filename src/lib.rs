//! # vota - a tool-calling chat agent with a voting contract to talk about
//!
//! vota deploys a throwaway `Ballot` contract to an ephemeral anvil chain and
//! exposes it, together with a web search tool and a small arithmetic tool,
//! to a Claude-backed agent. A handful of scripted conversations show the
//! agent streaming, remembering a thread, and calling custom tools.
//!
//! ## Layout
//!
//! - [`contracts`]: `bytes32` name encoding, proposal decoding, `solc`
//!   compilation, anvil chain and deployment
//! - [`tools`]: the `Tool` trait, registry and tool adapters
//! - [`providers`]: streaming model client
//! - [`agents`]: the tool-calling agent loop and conversation memory
//! - [`scenarios`]: the scripted interactions
//!
//! ## Usage
//!
//! ```rust
//! use vota::contracts::{proposal_from_raw, str_to_bytes32};
//! use vota::alloy_primitives::U256;
//!
//! let name = str_to_bytes32("hello")?;
//! let proposal = proposal_from_raw(&name, U256::from(5))?;
//! assert_eq!(proposal.to_string(), "hello with 5 votes!");
//! # Ok::<(), vota::VotaError>(())
//! ```

pub mod agents;
pub mod cli;
pub mod config;
pub mod contracts;
pub mod error;
pub mod providers;
pub mod scenarios;
pub mod streaming;
pub mod tools;

// Re-export commonly used types
pub use agents::{Agent, AgentEvent, ReactAgent, StreamMode};
pub use config::VotaConfig;
pub use contracts::{Proposal, ProposalReader};
pub use error::{VotaError, VotaResult};
pub use providers::{Message, ModelClient};
pub use tools::{Tool, ToolOutput, ToolRegistry};

pub use alloy::primitives as alloy_primitives;

/// The current version of vota
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
