//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the tool server.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the BetSwirl tool server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP surface exposed to the agent runtime.
    pub server: ServerConfig,

    /// Blockchain RPC and signing settings.
    pub blockchain: BlockchainConfig,

    /// Casino contracts and betting defaults.
    pub casino: CasinoConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:8090").
    pub bind_address: String,

    /// Total time allowed for a single tool call, in seconds.
    ///
    /// Bets on ERC-20 tokens may wait for an approval to confirm, so this
    /// should exceed `casino.confirmation_timeout_secs`.
    pub request_timeout_secs: u64,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8090".to_string(),
            request_timeout_secs: 180,
            max_body_bytes: 64 * 1024,
        }
    }
}

/// Blockchain integration configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BlockchainConfig {
    /// JSON-RPC endpoint URL. Transactions are always sent through this one.
    pub rpc_url: String,

    /// Failover JSON-RPC endpoint URLs, used for reads only.
    #[serde(default)]
    pub failover_urls: Vec<String>,

    /// Chain ID (e.g., 42161 for Arbitrum One, 84532 for Base Sepolia).
    pub chain_id: u64,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Number of block confirmations required for finality.
    pub confirmation_blocks: u32,

    /// Gas price multiplier (1.0 = estimated, 1.2 = 20% buffer).
    pub gas_price_multiplier: f64,

    /// Maximum gas price in gwei (protection against spikes).
    pub max_gas_price_gwei: u64,

    /// Gas limit multiplier applied on top of `eth_estimateGas`.
    pub gas_limit_multiplier: f64,
}

impl Default for BlockchainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            failover_urls: Vec::new(),
            chain_id: 42161,
            rpc_timeout_secs: 10,
            confirmation_blocks: 1,
            gas_price_multiplier: 1.2,
            max_gas_price_gwei: 500,
            gas_limit_multiplier: 1.2,
        }
    }
}

/// Casino configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CasinoConfig {
    /// Affiliate address credited on every bet unless a call overrides it.
    pub affiliate: String,

    /// Highest house edge (basis points) the player accepts.
    pub max_house_edge_bps: u16,

    /// How long to wait for an ERC-20 approval to confirm, in seconds.
    pub confirmation_timeout_secs: u64,

    /// Blocks after the wager searched for its `Roll` event.
    pub roll_lookup_blocks: u64,

    /// Contract deployments, one entry per casino chain.
    pub chains: Vec<CasinoChainConfig>,

    /// VRF cost estimation.
    pub vrf: VrfConfig,
}

impl Default for CasinoConfig {
    fn default() -> Self {
        Self {
            affiliate: "0x0000000000000000000000000000000000000000".to_string(),
            max_house_edge_bps: 350,
            confirmation_timeout_secs: 120,
            roll_lookup_blocks: 2_000,
            chains: Vec::new(),
            vrf: VrfConfig::default(),
        }
    }
}

/// Contract addresses of the casino on one chain.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CasinoChainConfig {
    /// Chain ID these contracts live on.
    pub chain_id: u64,

    /// Bank contract (token list, bet requirements).
    pub bank: String,

    /// CoinToss game contract.
    #[serde(default)]
    pub coin_toss: Option<String>,

    /// Dice game contract.
    #[serde(default)]
    pub dice: Option<String>,

    /// Roulette game contract.
    #[serde(default)]
    pub roulette: Option<String>,
}

/// VRF fee estimation settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct VrfConfig {
    /// Base URL of the HTTP fee API. When unset, the game contract is read.
    pub fee_api_url: Option<String>,

    /// Fee API request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for VrfConfig {
    fn default() -> Self {
        Self {
            fee_api_url: None,
            timeout_secs: 10,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
