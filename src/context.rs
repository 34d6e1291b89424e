use std::path::Path;
use std::sync::Arc;

use bridge_pacer_commons::secret_store::{EnvSecretStore, SecretStore};
use evm_inbox_client::{EvmClient, EvmError, GasOracle, InboxClient, RpcConfig, TxPolicyConfig};
use evm_inbox_client::types::PrivateKeySigner;
use tracing::info;

use crate::config::Config;
use crate::error::AppError;

const PRIVATE_KEY_ENV: &str = "PRIVATE_KEY";

/// Everything a run needs, built once at startup.
pub struct AppContext {
    pub config: Arc<Config>,
    pub inbox: InboxClient,
    pub oracle: GasOracle,
}

pub async fn init_context(config_path: &Path) -> Result<AppContext, AppError> {
    let config = Config::load(config_path)?;
    let inbox_address = config.inbox_address()?;

    let secrets = EnvSecretStore;
    let raw_key = secrets.get_secret(PRIVATE_KEY_ENV).await?;
    let signer: PrivateKeySigner = raw_key
        .parse()
        .map_err(|_| AppError::Evm(EvmError::Signing("PRIVATE_KEY is not a valid secp256k1 key".to_string())))?;

    let client = EvmClient::connect(
        RpcConfig {
            rpc_url: config.rpc_url.clone(),
            chain_id: config.chain_id,
        },
        signer,
        TxPolicyConfig {
            confirm_timeout_secs: config.confirm_timeout_secs,
        },
    )
    .await?;

    info!(
        from = %client.from,
        chain_id = client.chain_id,
        inbox = %inbox_address,
        "Connected to RPC endpoint"
    );

    let oracle = GasOracle::new(client.clone());
    let inbox = InboxClient::new(inbox_address, client);

    Ok(AppContext { config, inbox, oracle })
}
