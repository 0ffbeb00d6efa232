// Configuration: optional TOML file plus environment overrides
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{VotaError, VotaResult};

pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";
pub const DEFAULT_THREAD_ID: &str = "08c55a1c-eddd-40e6-9979-593e0326ad7b";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VotaConfig {
    pub model: ModelConfig,
    pub search: SearchConfig,
    pub chain: ChainConfig,
    pub agent: AgentConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub name: String,
    pub base_url: String,
    /// Connect and per-read timeout in seconds
    pub timeout_secs: u64,
    pub max_tokens: u32,
    pub temperature: Option<f32>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_MODEL.to_string(),
            base_url: "https://api.anthropic.com".to_string(),
            timeout_secs: 10,
            max_tokens: 1024,
            temperature: None,
        }
    }
}

impl ModelConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub base_url: String,
    pub max_results: u32,
    pub timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.tavily.com".to_string(),
            max_results: 2,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    pub solc_path: PathBuf,
    /// Uses `anvil` from PATH when unset
    pub anvil_path: Option<PathBuf>,
    /// Contract to pick from the compiler output; the last one when unset
    pub contract_name: Option<String>,
    pub proposals: Vec<String>,
    pub confirmation_timeout_secs: u64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            solc_path: PathBuf::from("solc"),
            anvil_path: None,
            contract_name: Some("Ballot".to_string()),
            proposals: crate::contracts::PROPOSALS.iter().map(|s| s.to_string()).collect(),
            confirmation_timeout_secs: 30,
        }
    }
}

impl ChainConfig {
    pub fn confirmation_timeout(&self) -> Duration {
        Duration::from_secs(self.confirmation_timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub recursion_limit: usize,
    pub thread_id: String,
    pub system_prompt: Option<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            recursion_limit: 25,
            thread_id: DEFAULT_THREAD_ID.to_string(),
            system_prompt: None,
        }
    }
}

impl VotaConfig {
    pub fn from_toml_str(raw: &str) -> VotaResult<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Applies `VOTA_MODEL`, `VOTA_SOLC` and `VOTA_ANVIL` when set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(model) = std::env::var("VOTA_MODEL") {
            self.model.name = model;
        }
        if let Ok(solc) = std::env::var("VOTA_SOLC") {
            self.chain.solc_path = PathBuf::from(solc);
        }
        if let Ok(anvil) = std::env::var("VOTA_ANVIL") {
            self.chain.anvil_path = Some(PathBuf::from(anvil));
        }
    }
}

/// Loads the `.env` file into the process environment.
pub fn load_dotenv() -> VotaResult<PathBuf> {
    dotenvy::dotenv().map_err(|e| VotaError::config(format!(".env required: {}", e)))
}

pub struct ConfigManager {
    path: Option<PathBuf>,
}

impl ConfigManager {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("vota").join("config.toml"))
    }

    pub async fn load_config(&self) -> VotaResult<VotaConfig> {
        let mut config = match &self.path {
            Some(path) => Self::read_file(path).await?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::read_file(&path).await?,
                _ => {
                    debug!("No config file found, using defaults");
                    VotaConfig::default()
                }
            },
        };

        config.apply_env_overrides();
        Ok(config)
    }

    async fn read_file(path: &Path) -> VotaResult<VotaConfig> {
        info!("📄 Loading config from {}", path.display());
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            VotaError::config(format!("Failed to read config '{}': {}", path.display(), e))
        })?;
        VotaConfig::from_toml_str(&raw)
    }
}
