use alloy::json_abi::JsonAbi;
use alloy::primitives::{hex, Bytes};
use serde_json::Value;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{VotaError, VotaResult};

/// Output of compiling a single contract.
#[derive(Debug, Clone)]
pub struct CompiledContract {
    /// Fully qualified id as reported by solc, e.g. `<stdin>:Ballot`
    pub id: String,
    pub abi: JsonAbi,
    pub bytecode: Bytes,
}

impl CompiledContract {
    pub fn name(&self) -> &str {
        self.id.rsplit(':').next().unwrap_or(&self.id)
    }
}

pub struct SolcCompiler {
    solc_path: PathBuf,
    contract_name: Option<String>,
}

impl SolcCompiler {
    pub fn new(solc_path: impl Into<PathBuf>) -> Self {
        Self {
            solc_path: solc_path.into(),
            contract_name: None,
        }
    }

    pub fn with_contract_name(mut self, name: Option<String>) -> Self {
        self.contract_name = name;
        self
    }

    pub async fn compile(&self, source: &str) -> VotaResult<CompiledContract> {
        info!("🔨 Compiling contract with {}", self.solc_path.display());

        let mut child = Command::new(&self.solc_path)
            .args(["--combined-json", "abi,bin", "-"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                VotaError::compiler(format!("Failed to launch '{}': {}", self.solc_path.display(), e))
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(source.as_bytes())
                .await
                .map_err(|e| VotaError::compiler(format!("Failed to feed source to solc: {}", e)))?;
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VotaError::compiler(format!(
                "solc exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_combined_json(&stdout, self.contract_name.as_deref())
    }
}

/// Picks a contract out of `solc --combined-json abi,bin` output.
///
/// With `contract_name` set, the contract with that name is required;
/// otherwise the last contract in the output is taken.
pub fn parse_combined_json(raw: &str, contract_name: Option<&str>) -> VotaResult<CompiledContract> {
    let parsed: Value = serde_json::from_str(raw)?;
    let contracts = parsed
        .get("contracts")
        .and_then(Value::as_object)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| VotaError::compiler("solc produced no contracts"))?;

    let (id, iface) = match contract_name {
        Some(name) => contracts
            .iter()
            .find(|(id, _)| id.rsplit(':').next() == Some(name))
            .ok_or_else(|| VotaError::compiler(format!("contract '{}' not found in solc output", name)))?,
        None => contracts
            .iter()
            .last()
            .ok_or_else(|| VotaError::compiler("solc produced no contracts"))?,
    };
    debug!("Selected compiled contract {}", id);

    // solc emits the ABI as an array in recent releases and as a string before that
    let abi: JsonAbi = match iface.get("abi") {
        Some(Value::String(s)) => serde_json::from_str(s)?,
        Some(v) => serde_json::from_value(v.clone())?,
        None => return Err(VotaError::compiler(format!("no ABI for {}", id))),
    };

    let bin = iface.get("bin").and_then(Value::as_str).unwrap_or_default();
    if bin.is_empty() {
        return Err(VotaError::compiler(format!("no bytecode for {} (abstract contract?)", id)));
    }
    let bytecode = hex::decode(bin).map_err(|e| VotaError::compiler(format!("bad bytecode hex: {}", e)))?;

    Ok(CompiledContract {
        id: id.clone(),
        abi,
        bytecode: Bytes::from(bytecode),
    })
}
