// Fee quoting against the current fee market

use crate::{client::EvmClient, errors::EvmError};
use alloy::eips::BlockNumberOrTag;

/// Priced parameters for one submission.
///
/// Quotes are computed fresh before every attempt and never reused; the fee
/// market moves too fast for a stale quote to stay safe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeQuote {
    pub base_fee_per_gas: Option<u128>,
    pub max_priority_fee_per_gas: u128,
    pub max_fee_per_gas: u128,
}

impl FeeQuote {
    /// EIP-1559 quote with 2x base-fee headroom against growth over the
    /// next few blocks.
    pub fn eip1559(base_fee_per_gas: u128, priority_fee_per_gas: u128) -> Self {
        Self {
            base_fee_per_gas: Some(base_fee_per_gas),
            max_priority_fee_per_gas: priority_fee_per_gas,
            max_fee_per_gas: 2 * base_fee_per_gas + priority_fee_per_gas,
        }
    }

    /// Legacy fee market fallback: pay the quoted gas price outright and
    /// treat an eighth of it as the tip approximation.
    pub fn legacy(gas_price: u128) -> Self {
        Self {
            base_fee_per_gas: None,
            max_priority_fee_per_gas: gas_price / 8,
            max_fee_per_gas: gas_price,
        }
    }
}

/// Quotes fees from the head block of the connected chain.
#[derive(Clone)]
pub struct GasOracle {
    client: EvmClient,
}

impl GasOracle {
    pub fn new(client: EvmClient) -> Self {
        Self { client }
    }

    /// Returns an EIP-1559 quote when the head block reports a base fee,
    /// otherwise falls back to the node's legacy gas price.
    pub async fn quote(&self, priority_fee_per_gas: u128) -> Result<FeeQuote, EvmError> {
        use alloy::providers::Provider as _;

        let block = self.client.provider.get_block_by_number(BlockNumberOrTag::Latest).await?;

        if let Some(base_fee) = block.and_then(|b| b.header.base_fee_per_gas) {
            return Ok(FeeQuote::eip1559(base_fee as u128, priority_fee_per_gas));
        }

        let gas_price = self.client.provider.get_gas_price().await?;
        Ok(FeeQuote::legacy(gas_price))
    }
}
