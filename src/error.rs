use thiserror::Error;

pub type VotaResult<T> = Result<T, VotaError>;

#[derive(Error, Debug)]
pub enum VotaError {
    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Compiler error: {0}")]
    Compiler(String),

    #[error("Chain error: {0}")]
    Chain(String),

    #[error("Arithmetic error: {0}")]
    Arithmetic(String),

    #[error("Agent error: {0}")]
    Agent(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl VotaError {
    pub fn provider<T: Into<String>>(msg: T) -> Self {
        VotaError::Provider(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        VotaError::Config(msg.into())
    }

    pub fn encoding<T: Into<String>>(msg: T) -> Self {
        VotaError::Encoding(msg.into())
    }

    pub fn decode<T: Into<String>>(msg: T) -> Self {
        VotaError::Decode(msg.into())
    }

    pub fn compiler<T: Into<String>>(msg: T) -> Self {
        VotaError::Compiler(msg.into())
    }

    pub fn chain<T: Into<String>>(msg: T) -> Self {
        VotaError::Chain(msg.into())
    }

    pub fn arithmetic<T: Into<String>>(msg: T) -> Self {
        VotaError::Arithmetic(msg.into())
    }

    pub fn agent<T: Into<String>>(msg: T) -> Self {
        VotaError::Agent(msg.into())
    }

    pub fn invalid_input<T: Into<String>>(msg: T) -> Self {
        VotaError::InvalidInput(msg.into())
    }
}
