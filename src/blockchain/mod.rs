//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Environment Variables (private key) + config (RPC URLs)
//!     → wallet.rs (key loading, nonce reservation)
//!     → client.rs (RPC connection with timeouts and read failover)
//!     → transaction.rs (price, build, sign, broadcast, confirm)
//!     → evm.rs (EvmWalletClient: the surface the casino talks to)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts

pub mod client;
pub mod evm;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::BlockchainClient;
pub use evm::{ChainWallet, EvmWalletClient};
pub use types::{
    BlockchainConfig, BlockchainError, BlockchainResult, ConfirmationStatus, ContractRead,
    ContractWrite, LogQuery, ReceiptSummary,
};
pub use wallet::Wallet;
