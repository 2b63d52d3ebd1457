//! The betting account: signer plus its outgoing nonce counter.
//!
//! Wagers return before they are mined, so the counter runs ahead of the
//! chain's mined count. Each send raises it to the node's pending count
//! when the node knows of more transactions, then reserves the next value.
//! A nonce the node rejected is handed back so the next send reuses it.

use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::blockchain::types::{BlockchainError, BlockchainResult};

/// Environment variable holding the hex private key.
pub const PRIVATE_KEY_ENV_VAR: &str = "BETSWIRL_PRIVATE_KEY";

/// Signing account. Clones share the nonce counter.
#[derive(Debug, Clone)]
pub struct Wallet {
    signer: PrivateKeySigner,
    chain_id: u64,
    next_nonce: Arc<AtomicU64>,
}

impl Wallet {
    /// Parse a hex private key, `0x` prefix optional.
    pub fn from_private_key(private_key_hex: &str, chain_id: u64) -> BlockchainResult<Self> {
        let key_hex = private_key_hex.strip_prefix("0x").unwrap_or(private_key_hex);
        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| BlockchainError::Wallet(format!("Invalid private key format: {}", e)))?;

        Ok(Self {
            signer,
            chain_id,
            next_nonce: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Load the key from `BETSWIRL_PRIVATE_KEY`.
    pub fn from_env(chain_id: u64) -> BlockchainResult<Self> {
        let private_key = std::env::var(PRIVATE_KEY_ENV_VAR).map_err(|_| {
            BlockchainError::Wallet(format!("Environment variable {} not set", PRIVATE_KEY_ENV_VAR))
        })?;
        Self::from_private_key(&private_key, chain_id)
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Network wallet used to sign transaction envelopes.
    pub fn network_wallet(&self) -> EthereumWallet {
        EthereumWallet::from(self.signer.clone())
    }

    /// Raise the counter to `pending` if the node has seen more transactions
    /// than this process sent (another signer, a restart). Never lowers it.
    pub fn observe_pending_nonce(&self, pending: u64) {
        self.next_nonce.fetch_max(pending, Ordering::SeqCst);
    }

    /// Reserve the next nonce.
    pub fn get_and_increment_nonce(&self) -> u64 {
        self.next_nonce.fetch_add(1, Ordering::SeqCst)
    }

    /// Give back `nonce` after the node rejected the transaction using it.
    ///
    /// Callers must hold the send lock so no later nonce was reserved.
    pub fn release_nonce(&self, nonce: u64) {
        self.next_nonce.store(nonce, Ordering::SeqCst);
    }

    pub fn current_nonce(&self) -> u64 {
        self.next_nonce.load(Ordering::SeqCst)
    }
}
