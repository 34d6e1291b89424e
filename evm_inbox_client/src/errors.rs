// Error types for EVM operations

#[derive(thiserror::Error, Debug)]
pub enum EvmError {
    #[error("rpc: {0}")]
    Rpc(String),

    #[error("signing: {0}")]
    Signing(String),

    #[error("confirmation timed out after {0}s")]
    Timeout(u64),

    #[error("other: {0}")]
    Other(String),
}

impl From<alloy::transports::RpcError<alloy::transports::TransportErrorKind>> for EvmError {
    fn from(e: alloy::transports::RpcError<alloy::transports::TransportErrorKind>) -> Self {
        EvmError::Rpc(e.to_string())
    }
}

impl From<alloy::contract::Error> for EvmError {
    fn from(e: alloy::contract::Error) -> Self {
        EvmError::Rpc(e.to_string())
    }
}

impl From<alloy::providers::PendingTransactionError> for EvmError {
    fn from(e: alloy::providers::PendingTransactionError) -> Self {
        EvmError::Other(e.to_string())
    }
}
