// Configuration structures for EVM client

#[derive(Debug, Clone)]
pub struct RpcConfig {
    pub rpc_url: String,
    // None = ask the node at connect time
    pub chain_id: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct TxPolicyConfig {
    // Bound on the confirmation wait, in seconds
    pub confirm_timeout_secs: u64,
}

impl Default for TxPolicyConfig {
    fn default() -> Self {
        Self {
            confirm_timeout_secs: 300,
        }
    }
}
