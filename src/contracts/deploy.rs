use alloy::network::{ReceiptResponse, TransactionBuilder};
use alloy::primitives::{Address, B256};
use alloy::providers::{DynProvider, Provider};
use alloy::rpc::types::TransactionRequest;
use alloy::sol_types::SolConstructor;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info};

use super::{contract_source, str_to_bytes32, Ballot, ProposalReader, RawProposal, SolcCompiler, TestChain};
use crate::config::ChainConfig;
use crate::error::{VotaError, VotaResult};

/// Deploys fresh voting contracts seeded with a fixed list of proposals.
pub struct VotingDeployer {
    compiler: SolcCompiler,
    proposals: Vec<String>,
    confirmation_timeout: Duration,
}

impl VotingDeployer {
    pub fn new(compiler: SolcCompiler, proposals: Vec<String>, confirmation_timeout: Duration) -> Self {
        Self {
            compiler,
            proposals,
            confirmation_timeout,
        }
    }

    pub fn from_config(config: &ChainConfig) -> Self {
        let compiler = SolcCompiler::new(&config.solc_path).with_contract_name(config.contract_name.clone());
        Self::new(compiler, config.proposals.clone(), config.confirmation_timeout())
    }

    /// Compiles, deploys and binds a new contract. Every call creates an
    /// independent contract with its own vote state.
    pub async fn deploy(&self, chain: &TestChain) -> VotaResult<VotingContract> {
        let compiled = self.compiler.compile(contract_source()).await?;
        if compiled.abi.function("getProposals").is_none() {
            return Err(VotaError::compiler(format!("{} has no getProposals()", compiled.id)));
        }

        let names = self
            .proposals
            .iter()
            .map(|p| str_to_bytes32(p))
            .collect::<VotaResult<Vec<B256>>>()?;

        let constructor = Ballot::constructorCall { proposalNames: names };
        let mut code = compiled.bytecode.to_vec();
        code.extend_from_slice(&constructor.abi_encode());

        let tx = TransactionRequest::default()
            .with_from(chain.deployer())
            .with_deploy_code(code);

        let provider = chain.provider().clone();
        let pending = provider
            .send_transaction(tx)
            .await
            .map_err(|e| VotaError::chain(format!("Deployment transaction rejected: {}", e)))?;
        debug!("Deployment tx {}", pending.tx_hash());

        let receipt = pending
            .with_timeout(Some(self.confirmation_timeout))
            .get_receipt()
            .await
            .map_err(|e| VotaError::chain(format!("Deployment not confirmed: {}", e)))?;

        if !receipt.status() {
            return Err(VotaError::chain(format!(
                "Deployment reverted in tx {}",
                receipt.transaction_hash()
            )));
        }

        let address = receipt
            .contract_address()
            .ok_or_else(|| VotaError::chain("Receipt carries no contract address"))?;

        info!("📜 Deployed {} at {}", compiled.name(), address);

        Ok(VotingContract {
            address,
            provider,
        })
    }
}

/// A deployed voting contract bound to a provider.
#[derive(Clone)]
pub struct VotingContract {
    address: Address,
    provider: DynProvider,
}

impl VotingContract {
    fn instance(&self) -> Ballot::BallotInstance<DynProvider> {
        Ballot::new(self.address, self.provider.clone())
    }

    /// Casts a vote from the provider's default signer.
    pub async fn vote(&self, proposal: u64) -> VotaResult<()> {
        let receipt = self
            .instance()
            .vote(alloy::primitives::U256::from(proposal))
            .send()
            .await
            .map_err(|e| VotaError::chain(e.to_string()))?
            .get_receipt()
            .await
            .map_err(|e| VotaError::chain(e.to_string()))?;

        if !receipt.status() {
            return Err(VotaError::chain(format!("vote({}) reverted", proposal)));
        }
        Ok(())
    }
}

#[async_trait]
impl ProposalReader for VotingContract {
    async fn raw_proposals(&self) -> VotaResult<Vec<RawProposal>> {
        let proposals = self
            .instance()
            .getProposals()
            .call()
            .await
            .map_err(|e| VotaError::chain(format!("getProposals() failed: {}", e)))?;

        Ok(proposals.into_iter().map(RawProposal::from).collect())
    }

    fn address(&self) -> Address {
        self.address
    }
}
