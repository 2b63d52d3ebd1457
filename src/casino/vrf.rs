//! Chainlink VRF cost lookup.
//!
//! The cost is normally read from the game contract, simulated at the gas
//! price the wager will be sent with. When a fee API is configured it is
//! asked instead.

use std::time::Duration;

use alloy::primitives::{Address, U256};
use alloy::sol_types::SolCall;
use serde::Deserialize;
use url::Url;

use crate::blockchain::{ContractRead, EvmWalletClient};
use crate::casino::abi::ICasinoGame;
use crate::casino::error::{CasinoError, CasinoResult};
use crate::casino::games::CasinoGame;
use crate::config::VrfConfig;

/// Read `getChainlinkVRFCost(token, betCount)` from the game contract.
///
/// Empty return data counts as a zero cost.
pub async fn get_chainlink_vrf_cost(
    wallet: &dyn EvmWalletClient,
    game_address: Address,
    token: Address,
    bet_count: u16,
    gas_price: u128,
) -> CasinoResult<U256> {
    let call = ICasinoGame::getChainlinkVRFCostCall {
        token,
        betCount: bet_count,
    };

    let raw = wallet
        .read(ContractRead {
            to: game_address,
            data: call.abi_encode().into(),
            gas_price: Some(gas_price),
        })
        .await
        .map_err(|e| CasinoError::VrfCost(e.to_string()))?;

    if raw.is_empty() {
        return Ok(U256::ZERO);
    }

    ICasinoGame::getChainlinkVRFCostCall::abi_decode_returns(&raw)
        .map_err(|e| CasinoError::VrfCost(e.to_string()))
}

/// Body returned by the fee API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VrfFeeResponse {
    vrf_fee: String,
}

/// Client for the HTTP VRF fee API.
#[derive(Debug, Clone)]
pub struct VrfFeeClient {
    http: reqwest::Client,
    base_url: Url,
}

/// One fee quote request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VrfFeeQuery {
    pub chain_id: u64,
    pub game: CasinoGame,
    pub token: Address,
    pub bet_count: u16,
    pub gas_price: u128,
}

impl VrfFeeClient {
    /// Build a client from `[casino.vrf]`. Returns `None` when no API URL is set.
    pub fn from_config(config: &VrfConfig) -> CasinoResult<Option<Self>> {
        let Some(url) = config.fee_api_url.as_deref() else {
            return Ok(None);
        };
        let base_url = Url::parse(url)
            .map_err(|e| CasinoError::VrfCost(format!("invalid fee API URL '{}': {}", url, e)))?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CasinoError::VrfCost(e.to_string()))?;
        Ok(Some(Self { http, base_url }))
    }

    /// URL of the quote for `query`.
    pub fn fee_url(&self, query: &VrfFeeQuery) -> Url {
        let mut url = self.base_url.clone();
        let path = format!("{}/vrf-fees", url.path().trim_end_matches('/'));
        url.set_path(&path);
        url.query_pairs_mut()
            .clear()
            .append_pair("chainId", &query.chain_id.to_string())
            .append_pair("game", query.game.as_str())
            .append_pair("token", &query.token.to_string())
            .append_pair("betCount", &query.bet_count.to_string())
            .append_pair("gasPrice", &query.gas_price.to_string());
        url
    }

    /// Ask the API for the VRF fee, in wei.
    pub async fn fetch_fee(&self, query: &VrfFeeQuery) -> CasinoResult<U256> {
        let url = self.fee_url(query);
        tracing::debug!(url = %url, "Fetching VRF fee");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| CasinoError::VrfCost(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CasinoError::VrfCost(format!("fee API returned {}", status)));
        }

        let body: VrfFeeResponse = response
            .json()
            .await
            .map_err(|e| CasinoError::VrfCost(e.to_string()))?;

        body.vrf_fee
            .trim()
            .parse::<U256>()
            .map_err(|e| CasinoError::VrfCost(format!("invalid vrfFee '{}': {}", body.vrf_fee, e)))
    }
}
