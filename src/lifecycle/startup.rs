//! Startup orchestration.
//!
//! Subsystems initialize in order, not concurrently; the first failure is fatal.

use std::sync::Arc;

use thiserror::Error;

use crate::blockchain::{BlockchainClient, BlockchainError, ChainWallet, EvmWalletClient, Wallet};
use crate::casino::{BetSwirlService, CasinoError, Chain, ChainRegistry};
use crate::config::{AppConfig, BlockchainConfig};
use crate::http::AppState;
use crate::tools::BetSwirlPlugin;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Blockchain(#[from] BlockchainError),

    #[error(transparent)]
    Casino(#[from] CasinoError),

    /// The wallet's chain has no casino.
    #[error("The {plugin} plugin does not support chain id {chain_id}")]
    UnsupportedChain { plugin: &'static str, chain_id: u64 },
}

/// Everything the HTTP server needs.
pub struct App {
    pub service: Arc<BetSwirlService>,
    pub state: AppState,
}

/// Connect to the RPC, load the signer from the environment and check the chain.
pub async fn connect_wallet(config: &BlockchainConfig) -> Result<ChainWallet, StartupError> {
    let client = BlockchainClient::new(config.clone()).await?;
    client.verify_chain_id().await?;
    if !client.is_healthy().await {
        tracing::warn!(rpc_url = %config.rpc_url, "RPC endpoint did not report a block number");
    }

    let wallet = Wallet::from_env(config.chain_id)?;
    tracing::info!(address = %wallet.address(), chain_id = config.chain_id, "Wallet loaded");

    Ok(ChainWallet::new(client, wallet))
}

/// Build the casino service on top of `wallet`.
pub fn build_service(
    config: &AppConfig,
    wallet: Arc<dyn EvmWalletClient>,
) -> Result<Arc<BetSwirlService>, StartupError> {
    let chain_id = wallet.chain_id();
    if !crate::casino::supports_chain(&Chain::evm(chain_id)) {
        return Err(StartupError::UnsupportedChain {
            plugin: BetSwirlPlugin::NAME,
            chain_id,
        });
    }

    let registry = ChainRegistry::from_config(&config.casino.chains)?;
    let service = BetSwirlService::new(wallet, registry, config.casino.clone())?;

    // Fails early when no contracts are configured for the wallet's chain.
    let chain = service.chain()?;
    tracing::info!(
        chain = chain.info.name,
        chain_id,
        games = ?chain.games().iter().map(|(game, _)| game.as_str()).collect::<Vec<_>>(),
        "Casino ready"
    );

    Ok(Arc::new(service))
}

/// Build the service, the plugin's tools and the HTTP state.
pub fn build_app(config: &AppConfig, wallet: Arc<dyn EvmWalletClient>) -> Result<App, StartupError> {
    let chain_id = wallet.chain_id();
    let wallet_address = wallet.address().to_string();

    let service = build_service(config, wallet)?;
    let plugin = BetSwirlPlugin::new(service.clone());
    let tools = plugin.registry();
    tracing::info!(plugin = plugin.name(), tools = tools.len(), "Tools registered");

    Ok(App {
        service,
        state: AppState {
            tools: Arc::new(tools),
            chain_id,
            wallet_address,
        },
    })
}
