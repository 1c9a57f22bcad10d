use thiserror::Error;

/// SDK-specific error types for governance Squads operations
#[derive(Debug, Error)]
pub enum SquadsSdkError {
    /// Connection or RPC error
    #[error("Connection error: {0}")]
    Connection(String),

    /// String does not parse as an on-chain address
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Invalid account data or deserialization error
    #[error("Invalid account data: {0}")]
    InvalidAccountData(String),

    /// A registered slot produced an invalid instruction
    #[error("Instruction at slot {0} is invalid")]
    InvalidInstruction(usize),

    /// Malformed configuration
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    /// Borsh serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] std::io::Error),

    /// Serialized instruction is not valid base64
    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type alias for SDK operations
pub type Result<T> = std::result::Result<T, SquadsSdkError>;
