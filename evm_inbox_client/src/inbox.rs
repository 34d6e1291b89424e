// Bridge inbox integration: payable ETH deposits and delivered-message events

use std::time::Duration;

use crate::{client::EvmClient, errors::EvmError, gas::FeeQuote, types::*};
use alloy::{providers::DynProvider, rpc::types::Log, sol};

sol! {
    #[sol(rpc)]
    contract Inbox {
        event InboxMessageDelivered(uint256 indexed messageNum, bytes data);

        function depositEth() external payable;
    }
}

/// Decoded `InboxMessageDelivered` event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboxMessage {
    pub message_num: U256,
    pub data: Bytes,
}

#[derive(Clone)]
pub struct InboxClient {
    pub inbox: Address,
    pub client: EvmClient,
}

impl InboxClient {
    pub fn new(inbox: Address, client: EvmClient) -> Self {
        Self { inbox, client }
    }

    fn contract(&self) -> Inbox::InboxInstance<DynProvider> {
        Inbox::new(self.inbox, self.client.provider.clone())
    }

    /// Informational gas estimate for a deposit. Callers treat failure as
    /// "no estimate", never as a reason to skip submission.
    pub async fn estimate_deposit_gas(&self, wei: U256, fee: &FeeQuote) -> Result<u64, EvmError> {
        let estimate = self
            .contract()
            .depositEth()
            .value(wei)
            .max_fee_per_gas(fee.max_fee_per_gas)
            .max_priority_fee_per_gas(fee.max_priority_fee_per_gas)
            .estimate_gas()
            .await?;

        Ok(estimate)
    }

    /// Submits a deposit and waits for its receipt. The wait is bounded by
    /// the client's confirmation timeout.
    pub async fn deposit_eth(&self, wei: U256, fee: &FeeQuote) -> Result<TransactionReceipt, EvmError> {
        let pending = self
            .contract()
            .depositEth()
            .value(wei)
            .max_fee_per_gas(fee.max_fee_per_gas)
            .max_priority_fee_per_gas(fee.max_priority_fee_per_gas)
            .send()
            .await?;

        let timeout_secs = self.client.policy.confirm_timeout_secs;
        let receipt = tokio::time::timeout(Duration::from_secs(timeout_secs), pending.get_receipt())
            .await
            .map_err(|_| EvmError::Timeout(timeout_secs))??;

        Ok(receipt)
    }

    /// Decodes delivered-message events out of a confirmed receipt.
    pub fn delivered_messages(&self, receipt: &TransactionReceipt) -> Vec<InboxMessage> {
        decode_inbox_messages(self.inbox, receipt.inner.logs())
    }
}

/// Keeps only logs emitted by the inbox itself; logs from other contracts
/// in the same receipt and logs that fail to decode are skipped.
pub fn decode_inbox_messages(inbox: Address, logs: &[Log]) -> Vec<InboxMessage> {
    let mut messages = Vec::new();

    for log in logs {
        if log.address() != inbox {
            continue;
        }

        if let Ok(event) = log.log_decode::<Inbox::InboxMessageDelivered>() {
            messages.push(InboxMessage {
                message_num: event.data().messageNum,
                data: event.data().data.clone(),
            });
        }
    }

    messages
}
