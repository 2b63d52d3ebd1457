//! Casino chain registry.
//!
//! The set of chains the casino runs on is fixed; which contracts are
//! deployed where comes from configuration (`[[casino.chains]]`).

use std::collections::HashMap;

use alloy::primitives::Address;
use serde::Serialize;

use crate::casino::error::{CasinoError, CasinoResult};
use crate::casino::games::CasinoGame;
use crate::config::CasinoChainConfig;

/// Static description of a chain the casino is deployed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CasinoChainInfo {
    pub id: u64,
    pub name: &'static str,
    /// Symbol of the gas token, reported as the default bet token.
    pub native_symbol: &'static str,
    pub testnet: bool,
}

/// Chains the casino supports.
pub const CASINO_CHAINS: &[CasinoChainInfo] = &[
    CasinoChainInfo { id: 42161, name: "Arbitrum One", native_symbol: "ETH", testnet: false },
    CasinoChainInfo { id: 43114, name: "Avalanche", native_symbol: "AVAX", testnet: false },
    CasinoChainInfo { id: 137, name: "Polygon", native_symbol: "POL", testnet: false },
    CasinoChainInfo { id: 56, name: "BNB Smart Chain", native_symbol: "BNB", testnet: false },
    CasinoChainInfo { id: 8453, name: "Base", native_symbol: "ETH", testnet: false },
    CasinoChainInfo { id: 421614, name: "Arbitrum Sepolia", native_symbol: "ETH", testnet: true },
    CasinoChainInfo { id: 43113, name: "Avalanche Fuji", native_symbol: "AVAX", testnet: true },
    CasinoChainInfo { id: 80002, name: "Polygon Amoy", native_symbol: "POL", testnet: true },
    CasinoChainInfo { id: 84532, name: "Base Sepolia", native_symbol: "ETH", testnet: true },
];

/// Look up a casino chain by ID.
pub fn casino_chain_by_id(id: u64) -> Option<&'static CasinoChainInfo> {
    CASINO_CHAINS.iter().find(|chain| chain.id == id)
}

/// Kind of chain a host runtime can hand a plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainKind {
    Evm,
    Solana,
    Other,
}

/// Chain descriptor as seen by the host runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Chain {
    pub kind: ChainKind,
    pub id: u64,
}

impl Chain {
    pub fn evm(id: u64) -> Self {
        Self { kind: ChainKind::Evm, id }
    }
}

/// True iff the chain is an EVM chain the casino runs on.
pub fn supports_chain(chain: &Chain) -> bool {
    chain.kind == ChainKind::Evm && casino_chain_by_id(chain.id).is_some()
}

/// A casino chain with its deployed contracts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CasinoChain {
    pub info: CasinoChainInfo,
    pub bank: Address,
    games: HashMap<CasinoGame, Address>,
}

impl CasinoChain {
    pub fn new(info: CasinoChainInfo, bank: Address, games: HashMap<CasinoGame, Address>) -> Self {
        Self { info, bank, games }
    }

    /// Contract address of `game`, if deployed on this chain.
    pub fn game_address(&self, game: CasinoGame) -> Option<Address> {
        self.games.get(&game).copied()
    }

    /// Same as [`game_address`](Self::game_address) but a missing game is an error.
    pub fn require_game(&self, game: CasinoGame) -> CasinoResult<Address> {
        self.game_address(game).ok_or_else(|| CasinoError::GameUnavailable {
            game: game.to_string(),
            chain_id: self.info.id,
        })
    }

    /// Game deployed at `address`, if any.
    pub fn game_at(&self, address: Address) -> Option<CasinoGame> {
        self.games
            .iter()
            .find(|(_, a)| **a == address)
            .map(|(game, _)| *game)
    }

    /// Games deployed on this chain, in [`CasinoGame::ALL`] order.
    pub fn games(&self) -> Vec<(CasinoGame, Address)> {
        CasinoGame::ALL
            .iter()
            .filter_map(|game| self.game_address(*game).map(|a| (*game, a)))
            .collect()
    }
}

/// All configured casino deployments, keyed by chain ID.
#[derive(Debug, Clone, Default)]
pub struct ChainRegistry {
    chains: HashMap<u64, CasinoChain>,
}

impl ChainRegistry {
    /// Build the registry from configuration.
    ///
    /// Unknown chains and malformed addresses are errors; configuration
    /// validation normally catches them first.
    pub fn from_config(deployments: &[CasinoChainConfig]) -> CasinoResult<Self> {
        let mut chains = HashMap::new();
        for deployment in deployments {
            let info = casino_chain_by_id(deployment.chain_id)
                .ok_or(CasinoError::UnsupportedChain(deployment.chain_id))?;
            let bank = parse_address("bank", &deployment.bank)?;

            let mut games = HashMap::new();
            for (game, address) in [
                (CasinoGame::CoinToss, &deployment.coin_toss),
                (CasinoGame::Dice, &deployment.dice),
                (CasinoGame::Roulette, &deployment.roulette),
            ] {
                if let Some(address) = address {
                    games.insert(game, parse_address(game.as_str(), address)?);
                }
            }

            chains.insert(info.id, CasinoChain::new(*info, bank, games));
        }
        Ok(Self { chains })
    }

    /// Deployment on `chain_id`.
    pub fn get(&self, chain_id: u64) -> CasinoResult<&CasinoChain> {
        self.chains
            .get(&chain_id)
            .ok_or(CasinoError::UnsupportedChain(chain_id))
    }
}

fn parse_address(what: &str, value: &str) -> CasinoResult<Address> {
    value
        .parse()
        .map_err(|e| CasinoError::InvalidInput(format!("invalid {} address '{}': {}", what, value, e)))
}
