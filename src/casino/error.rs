//! Casino error types.

use thiserror::Error;

use crate::blockchain::BlockchainError;

/// Errors raised while preparing, placing or reading bets.
#[derive(Debug, Error)]
pub enum CasinoError {
    /// A player input or bet parameter is out of range or malformed.
    #[error("Invalid bet: {0}")]
    InvalidInput(String),

    /// The wallet is connected to a chain without casino contracts.
    #[error("Chain id {0} is not supported by the casino")]
    UnsupportedChain(u64),

    /// The game has no contract on the wallet's chain.
    #[error("{game} isn't available on the chain id {chain_id}")]
    GameUnavailable { game: String, chain_id: u64 },

    /// The requested token is not a bankroll token on this chain.
    #[error("Token {token} is not available on chain id {chain_id}, available tokens: {available}")]
    TokenNotFound {
        token: String,
        chain_id: u64,
        available: String,
    },

    /// The bank refuses the bet (token paused, amount or count too high).
    #[error("Bet rejected by the bank: {0}")]
    BetRequirements(String),

    /// A contract view the bet depends on could not be read.
    #[error("An error occurred while reading the {what}: {cause}")]
    ContractRead { what: &'static str, cause: String },

    /// Reading or quoting the VRF cost failed.
    #[error("An error occurred while getting the chainlink vrf cost: {0}")]
    VrfCost(String),

    /// The ERC-20 approval could not be sent or did not confirm.
    #[error("An error occurred while approving the bet token: {0}")]
    Approval(String),

    /// Sending the wager failed.
    #[error("An error occurred while placing the bet: {0}")]
    PlaceBet(String),

    /// The transaction does not exist, is pending, or holds no bet.
    #[error("Bet not found: {0}")]
    BetNotFound(String),

    /// Any other wallet/RPC failure.
    #[error(transparent)]
    Blockchain(#[from] BlockchainError),
}

/// Result type for casino operations.
pub type CasinoResult<T> = Result<T, CasinoError>;
