//! # EVM Inbox Client
//!
//! Thin alloy-based access to a bridge inbox contract: a wallet-bound
//! [`EvmClient`], a [`GasOracle`] that quotes EIP-1559 fees from the head
//! block (with a legacy gas-price fallback), and an [`InboxClient`] for
//! payable `depositEth` submissions with a bounded confirmation wait and
//! `InboxMessageDelivered` event decoding.

pub mod client;
pub mod config;
pub mod errors;
pub mod gas;
pub mod inbox;
pub mod types;

pub use client::EvmClient;
pub use config::{RpcConfig, TxPolicyConfig};
pub use errors::EvmError;
pub use gas::{FeeQuote, GasOracle};
pub use inbox::{InboxClient, InboxMessage, decode_inbox_messages};
pub use types::*;
