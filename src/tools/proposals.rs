use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

use super::{Tool, ToolOutput};
use crate::contracts::{proposal_from_raw, ProposalReader};
use crate::error::VotaResult;

/// Lists the proposals held by a deployed voting contract.
pub struct GetProposalsTool {
    contract: Arc<dyn ProposalReader>,
}

impl GetProposalsTool {
    pub fn new(contract: Arc<dyn ProposalReader>) -> Self {
        Self { contract }
    }

    /// Index → `"{name} with {votes} votes!"`, in on-chain order.
    pub async fn proposals(&self) -> VotaResult<BTreeMap<usize, String>> {
        let raw = self.contract.raw_proposals().await?;

        raw.iter()
            .enumerate()
            .map(|(i, p)| Ok((i, proposal_from_raw(&p.name, p.votes)?.to_string())))
            .collect()
    }
}

#[async_trait]
impl Tool for GetProposalsTool {
    async fn execute(&self, _input: Value) -> VotaResult<ToolOutput> {
        let proposals = self.proposals().await?;
        Ok(ToolOutput::new(json!(proposals)))
    }

    fn name(&self) -> &str {
        "get_proposals"
    }

    fn description(&self) -> &str {
        "Get proposals from the smart contract. Returns key pairs of proposal indexes and name and vote counts."
    }

    fn input_schema(&self) -> Value {
        json!({ "type": "object", "properties": {} })
    }
}
