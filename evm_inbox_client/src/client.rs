// Core EVM client: wallet-bound provider plus submission policy

use crate::{config::*, errors::EvmError, types::*};
use alloy::{
    network::EthereumWallet,
    providers::{DynProvider, ProviderBuilder},
};
use tracing::debug;

#[derive(Clone)]
pub struct EvmClient {
    pub provider: DynProvider,
    pub from: Address,
    pub chain_id: u64,
    pub policy: TxPolicyConfig,
    pub wallet: EthereumWallet,
}

impl EvmClient {
    /// Connects to the RPC endpoint with the signer attached. When the
    /// config carries no chain id, the node is asked for it.
    pub async fn connect(rpc: RpcConfig, signer: PrivateKeySigner, policy: TxPolicyConfig) -> Result<Self, EvmError> {
        let from = signer.address();
        let wallet = EthereumWallet::from(signer);
        let provider = ProviderBuilder::new()
            .wallet(wallet.clone())
            .connect_http(rpc.rpc_url.parse().map_err(|e| EvmError::Other(format!("{e}")))?)
            .erased();

        let chain_id = match rpc.chain_id {
            Some(id) => id,
            None => provider.get_chain_id().await?,
        };
        debug!(chain_id, %from, "EVM client connected");

        Ok(Self {
            provider,
            from,
            chain_id,
            policy,
            wallet,
        })
    }
}
