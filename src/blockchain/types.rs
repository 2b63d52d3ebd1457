//! Chain-specific types and error definitions.

use alloy::primitives::{Address, Bytes, Log, TxHash, B256, U256};
use thiserror::Error;

// Re-export BlockchainConfig from config module to avoid duplication
pub use crate::config::schema::BlockchainConfig;

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// Transaction was not confirmed within expected time.
    #[error("Transaction not confirmed after {0} blocks")]
    ConfirmationTimeout(u32),

    /// Invalid private key format or signing error.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Gas price exceeded maximum allowed.
    #[error("Gas price {current_gwei} gwei exceeds maximum {max_gwei} gwei")]
    GasPriceTooHigh { current_gwei: u64, max_gwei: u64 },

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },

    /// Return data could not be decoded against the expected ABI.
    #[error("ABI decode error: {0}")]
    Decode(String),
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// Outcome of waiting on a mined transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationStatus {
    /// Mined and buried under the required number of blocks.
    Confirmed { block_number: u64 },
    /// Mined but reverted.
    Failed(String),
}

/// A read-only contract call (`eth_call`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractRead {
    /// Contract address.
    pub to: Address,
    /// ABI-encoded call data.
    pub data: Bytes,
    /// Gas price the call is simulated at; some views price in `tx.gasprice`.
    pub gas_price: Option<u128>,
}

/// A state-changing contract call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractWrite {
    /// Contract address.
    pub to: Address,
    /// ABI-encoded call data.
    pub data: Bytes,
    /// Native value attached to the call.
    pub value: U256,
    /// Gas price to use; fetched from the chain when absent.
    pub gas_price: Option<u128>,
}

/// The parts of a transaction receipt the casino needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptSummary {
    pub tx_hash: TxHash,
    /// `false` when the transaction reverted.
    pub success: bool,
    pub block_number: Option<u64>,
    pub logs: Vec<Log>,
}

/// An event log query scoped to one contract and one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogQuery {
    pub address: Address,
    /// `topic0`, the event signature hash.
    pub event_signature: B256,
    /// First indexed argument, when filtering on it.
    pub topic1: Option<B256>,
    /// Inclusive block range.
    pub from_block: u64,
    pub to_block: u64,
}
