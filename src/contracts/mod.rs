// Voting contract: name encoding, compilation, deployment and reads
use alloy::primitives::{Address, B256, U256};
use alloy::sol;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::VotaResult;

pub mod chain;
pub mod compiler;
pub mod deploy;
pub mod encoding;
pub mod source;

pub use chain::TestChain;
pub use compiler::{CompiledContract, SolcCompiler};
pub use deploy::{VotingContract, VotingDeployer};
pub use encoding::{proposal_from_raw, str_to_bytes32};
pub use source::contract_source;

/// Proposal names the contract is seeded with.
pub const PROPOSALS: [&str; 3] = ["hello", "world", "sigmaboy"];

sol! {
    #[sol(rpc)]
    contract Ballot {
        struct Proposal {
            bytes32 name;
            uint256 voteCount;
        }

        constructor(bytes32[] memory proposalNames);

        function vote(uint256 proposal) external;

        function getProposals() external view returns (Proposal[] memory);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    /// Name of the proposal
    pub name: String,
    /// Number of votes for the proposal
    pub votes: u64,
}

impl std::fmt::Display for Proposal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} with {} votes!", self.name, self.votes)
    }
}

/// A `(name, voteCount)` tuple as returned by the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawProposal {
    pub name: B256,
    pub votes: U256,
}

impl From<Ballot::Proposal> for RawProposal {
    fn from(p: Ballot::Proposal) -> Self {
        Self {
            name: p.name,
            votes: p.voteCount,
        }
    }
}

/// Read side of a deployed voting contract.
#[async_trait]
pub trait ProposalReader: Send + Sync {
    async fn raw_proposals(&self) -> VotaResult<Vec<RawProposal>>;
    fn address(&self) -> Address;
}
