use alloy::primitives::{
    B256, U256,
    utils::{format_ether, parse_ether},
};
use async_trait::async_trait;
use evm_inbox_client::{EvmError, FeeQuote, GasOracle, InboxClient, InboxMessage};
use tracing::{info, warn};

use crate::window::draw_amount_eth;

/// Tagged result of one deposit attempt. Attempt-scoped failures come back
/// as values; nothing unwinds past the executor boundary.
#[derive(Debug, Clone)]
pub enum AttemptOutcome {
    /// Included and succeeded on-chain.
    Confirmed {
        amount_wei: U256,
        fee: FeeQuote,
        tx_hash: B256,
        events: Vec<InboxMessage>,
    },
    /// Included but reverted.
    OnChainFailure {
        amount_wei: U256,
        fee: FeeQuote,
        tx_hash: B256,
    },
    /// Anything that went wrong before or while awaiting inclusion.
    TransportError { reason: String },
}

/// Runs a single deposit attempt. Mockable seam for the scheduler.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DepositRunner: Send + Sync {
    async fn attempt(&self) -> AttemptOutcome;
}

pub struct DepositExecutor {
    inbox: InboxClient,
    oracle: GasOracle,
    min_amount_eth: f64,
    max_amount_eth: f64,
    priority_fee_wei: u128,
}

impl DepositExecutor {
    pub fn new(
        inbox: InboxClient,
        oracle: GasOracle,
        min_amount_eth: f64,
        max_amount_eth: f64,
        priority_fee_wei: u128,
    ) -> Self {
        Self {
            inbox,
            oracle,
            min_amount_eth,
            max_amount_eth,
            priority_fee_wei,
        }
    }

    async fn try_attempt(&self) -> Result<AttemptOutcome, EvmError> {
        let amount_eth = draw_amount_eth(self.min_amount_eth, self.max_amount_eth);
        let amount_wei = amount_to_wei(amount_eth)?;

        // Fee quotes are never reused across attempts.
        let fee = self.oracle.quote(self.priority_fee_wei).await?;

        match self.inbox.estimate_deposit_gas(amount_wei, &fee).await {
            Ok(gas) => info!(gas_estimate = gas, "Gas estimated"),
            Err(err) => warn!("Gas estimate unavailable: {err}"),
        }

        info!(
            from = %self.inbox.client.from,
            inbox = %self.inbox.inbox,
            amount = %format_ether(amount_wei),
            max_fee_per_gas = fee.max_fee_per_gas,
            max_priority_fee_per_gas = fee.max_priority_fee_per_gas,
            "Sending deposit"
        );

        let receipt = self.inbox.deposit_eth(amount_wei, &fee).await?;
        let tx_hash = receipt.transaction_hash;

        if !receipt.status() {
            return Ok(AttemptOutcome::OnChainFailure {
                amount_wei,
                fee,
                tx_hash,
            });
        }

        let events = self.inbox.delivered_messages(&receipt);
        for event in &events {
            info!(message_num = %event.message_num, data = %event.data, "Inbox message delivered");
        }

        Ok(AttemptOutcome::Confirmed {
            amount_wei,
            fee,
            tx_hash,
            events,
        })
    }
}

#[async_trait]
impl DepositRunner for DepositExecutor {
    async fn attempt(&self) -> AttemptOutcome {
        match self.try_attempt().await {
            Ok(outcome) => outcome,
            Err(err) => AttemptOutcome::TransportError {
                reason: err.to_string(),
            },
        }
    }
}

fn amount_to_wei(amount_eth: f64) -> Result<U256, EvmError> {
    parse_ether(&format!("{amount_eth:.18}")).map_err(|e| EvmError::Other(e.to_string()))
}
