use alloy::node_bindings::{Anvil, AnvilInstance};
use alloy::primitives::Address;
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use tracing::info;

use crate::config::ChainConfig;
use crate::error::{VotaError, VotaResult};

/// An ephemeral anvil node and a signing provider connected to it.
///
/// The node process is killed when this handle is dropped.
pub struct TestChain {
    provider: DynProvider,
    deployer: Address,
    _anvil: AnvilInstance,
}

impl TestChain {
    pub fn spawn(config: &ChainConfig) -> VotaResult<Self> {
        let mut anvil = Anvil::new();
        if let Some(path) = &config.anvil_path {
            anvil = anvil.path(path);
        }

        let anvil = anvil
            .try_spawn()
            .map_err(|e| VotaError::chain(format!("Failed to spawn anvil: {}", e)))?;

        let key = anvil
            .keys()
            .first()
            .cloned()
            .ok_or_else(|| VotaError::chain("anvil exposed no dev accounts"))?;
        let signer = PrivateKeySigner::from(key);
        let deployer = signer.address();

        let provider = ProviderBuilder::new()
            .wallet(signer)
            .connect_http(anvil.endpoint_url())
            .erased();

        info!("⛓️  Test chain up at {} (chain id {})", anvil.endpoint(), anvil.chain_id());

        Ok(Self {
            provider,
            deployer,
            _anvil: anvil,
        })
    }

    pub fn provider(&self) -> &DynProvider {
        &self.provider
    }

    /// Account that signs deployments.
    pub fn deployer(&self) -> Address {
        self.deployer
    }
}
