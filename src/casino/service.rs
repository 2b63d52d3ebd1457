//! The betting flow.
//!
//! # Data Flow
//! ```text
//! place_bet(input, request)
//!     → chains.rs (wallet chain → deployment → game contract)
//!     → token.rs (bet token, amount in wei)
//!     → Bank.getBetRequirements (allowed token, max amount, max count)
//!     → ERC-20 allowance / approve (token bets only)
//!     → gas price → vrf.rs (VRF cost at that gas price)
//!     → bet.rs (wager call data, transaction value)
//!     → EvmWalletClient::send_transaction
//! ```

use std::sync::Arc;

use alloy::primitives::{Address, Log, TxHash, B256, U256};
use alloy::sol_types::{SolCall, SolEvent};

use crate::blockchain::{
    ConfirmationStatus, ContractRead, ContractWrite, EvmWalletClient, LogQuery,
};
use crate::casino::abi::{IBank, ICoinToss, IDice, IERC20, IRoulette};
use crate::casino::bet::{
    generate_play_game_function_data, transaction_value, BetChoice, BetParams, BetStatus,
    CasinoBet, PlacedBet, RolledValues,
};
use crate::casino::chains::{CasinoChain, ChainRegistry};
use crate::casino::error::{CasinoError, CasinoResult};
use crate::casino::games::{CasinoGame, CoinTossFace, GameInput, RouletteNumbers};
use crate::casino::token::{get_bet_amount_in_wei, get_bet_token, get_casino_tokens, parse_token_amount, Token};
use crate::casino::vrf::{get_chainlink_vrf_cost, VrfFeeClient, VrfFeeQuery};
use crate::config::CasinoConfig;
use crate::observability::metrics;

/// Bet parameters as the player expresses them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BetRequest {
    /// Amount per bet in token units, e.g. `"0.01"`.
    pub bet_amount: String,
    /// Token symbol or address; the gas token when absent.
    pub token: Option<String>,
    /// Defaults to 1.
    pub bet_count: Option<u16>,
    /// Token units.
    pub stop_gain: Option<String>,
    /// Token units.
    pub stop_loss: Option<String>,
    /// Defaults to the wallet address.
    pub receiver: Option<Address>,
    /// Defaults to the configured affiliate.
    pub affiliate: Option<Address>,
}

/// Casino operations on the wallet's chain.
pub struct BetSwirlService {
    wallet: Arc<dyn EvmWalletClient>,
    registry: ChainRegistry,
    config: CasinoConfig,
    affiliate: Address,
    fee_client: Option<VrfFeeClient>,
}

impl BetSwirlService {
    pub fn new(
        wallet: Arc<dyn EvmWalletClient>,
        registry: ChainRegistry,
        config: CasinoConfig,
    ) -> CasinoResult<Self> {
        let affiliate = config.affiliate.parse::<Address>().map_err(|e| {
            CasinoError::InvalidInput(format!("invalid affiliate '{}': {}", config.affiliate, e))
        })?;
        let fee_client = VrfFeeClient::from_config(&config.vrf)?;

        Ok(Self {
            wallet,
            registry,
            config,
            affiliate,
            fee_client,
        })
    }

    pub fn wallet(&self) -> &dyn EvmWalletClient {
        self.wallet.as_ref()
    }

    /// Deployment on the wallet's chain.
    pub fn chain(&self) -> CasinoResult<&CasinoChain> {
        self.registry.get(self.wallet.chain_id())
    }

    /// Bettable tokens on the wallet's chain, gas token first.
    pub async fn get_bet_tokens(&self) -> CasinoResult<Vec<Token>> {
        let chain = self.chain()?;
        get_casino_tokens(self.wallet(), chain).await
    }

    /// Place a wager and return as soon as the node accepted it.
    pub async fn place_bet(&self, input: GameInput, request: BetRequest) -> CasinoResult<PlacedBet> {
        let game = input.game();
        let chain = self.chain()?;
        let game_address = chain.require_game(game)?;

        let token = get_bet_token(self.wallet(), chain, request.token.as_deref()).await?;
        let params = self.bet_params(&token, &request)?;
        params.validate(game)?;

        self.check_bet_requirements(chain, &input, &params).await?;

        let function_data = generate_play_game_function_data(&input, &params);
        if !token.is_gas_token() {
            self.ensure_allowance(&token, game_address, function_data.total_bet_amount)
                .await?;
        }

        let gas_price = self.wallet.gas_price().await?;
        let vrf_cost = self
            .vrf_cost(chain, game, game_address, &token, params.bet_count, gas_price)
            .await?;
        let value = transaction_value(&token, function_data.total_bet_amount, vrf_cost);

        tracing::info!(
            game = %game,
            chain_id = chain.info.id,
            token = %token.symbol,
            bet_amount = %params.bet_amount,
            bet_count = params.bet_count,
            vrf_cost = %vrf_cost,
            value = %value,
            "Placing bet"
        );

        let hash = self
            .wallet
            .send_transaction(ContractWrite {
                to: game_address,
                data: function_data.data,
                value,
                gas_price: Some(gas_price),
            })
            .await
            .map_err(|e| CasinoError::PlaceBet(e.to_string()))?;

        metrics::record_bet_placed(game.as_str(), chain.info.id);
        tracing::info!(game = %game, tx_hash = %hash, "Bet placed");

        Ok(PlacedBet {
            hash,
            game,
            chain_id: chain.info.id,
            game_address,
            formatted_bet_amount: token.format_amount(params.bet_amount),
            bet_amount: params.bet_amount,
            token,
            bet_count: params.bet_count,
            receiver: params.receiver,
            multiplier: input.multiplier(),
            vrf_cost,
            value,
        })
    }

    /// Look a bet up by the hash of its wager transaction.
    pub async fn get_bet(&self, hash: TxHash) -> CasinoResult<CasinoBet> {
        let chain = self.chain()?;

        let receipt = self
            .wallet
            .transaction_receipt(hash)
            .await?
            .ok_or_else(|| CasinoError::BetNotFound(format!("transaction {} is pending or unknown", hash)))?;
        if !receipt.success {
            return Err(CasinoError::BetNotFound(format!("transaction {} reverted", hash)));
        }

        let (game, game_address, placed) = receipt
            .logs
            .iter()
            .find_map(|log| {
                let game = chain.game_at(log.address)?;
                decode_place_bet(game, log).map(|placed| (game, log.address, placed))
            })
            .ok_or_else(|| {
                CasinoError::BetNotFound(format!("transaction {} did not place a bet", hash))
            })?;

        // Providers cap eth_getLogs ranges; a roll outside the window reads as pending
        let from_block = receipt.block_number.unwrap_or_default();
        let head = self.wallet.block_number().await?;
        let to_block = head.min(from_block.saturating_add(self.config.roll_lookup_blocks));

        let roll = self
            .wallet
            .logs(LogQuery {
                address: game_address,
                event_signature: roll_signature(game),
                topic1: Some(B256::from(placed.id.to_be_bytes::<32>())),
                from_block,
                to_block,
            })
            .await?
            .iter()
            .find_map(|log| decode_roll(game, log));

        let mut bet = CasinoBet {
            id: placed.id,
            hash,
            game,
            game_address,
            status: BetStatus::Pending,
            receiver: placed.receiver,
            token: placed.token,
            amount: placed.amount,
            bet_count: placed.bet_count,
            stop_gain: placed.stop_gain,
            stop_loss: placed.stop_loss,
            vrf_cost: placed.vrf_cost,
            choice: placed.choice,
            block_number: receipt.block_number,
            rolled: None,
            total_bet_amount: None,
            payout: None,
            is_win: None,
        };

        if let Some(roll) = roll {
            bet.status = BetStatus::Resolved;
            bet.is_win = Some(roll.payout > roll.total_bet_amount);
            bet.rolled = Some(roll.rolled);
            bet.total_bet_amount = Some(roll.total_bet_amount);
            bet.payout = Some(roll.payout);
        }

        Ok(bet)
    }

    fn bet_params(&self, token: &Token, request: &BetRequest) -> CasinoResult<BetParams> {
        let optional_amount = |what: &str, amount: &Option<String>| match amount.as_deref() {
            Some(amount) if !amount.trim().is_empty() => parse_token_amount(what, amount, token),
            _ => Ok(U256::ZERO),
        };

        Ok(BetParams {
            bet_amount: get_bet_amount_in_wei(&request.bet_amount, token)?,
            token: token.clone(),
            bet_count: request.bet_count.unwrap_or(1),
            receiver: request.receiver.unwrap_or_else(|| self.wallet.address()),
            stop_gain: optional_amount("stop gain", &request.stop_gain)?,
            stop_loss: optional_amount("stop loss", &request.stop_loss)?,
            affiliate: request.affiliate.unwrap_or(self.affiliate),
            max_house_edge_bps: self.config.max_house_edge_bps,
        })
    }

    async fn check_bet_requirements(
        &self,
        chain: &CasinoChain,
        input: &GameInput,
        params: &BetParams,
    ) -> CasinoResult<()> {
        let call = IBank::getBetRequirementsCall {
            token: params.token.address,
            multiplier: U256::from(input.multiplier()),
        };
        let raw = self
            .wallet
            .read(ContractRead {
                to: chain.bank,
                data: call.abi_encode().into(),
                gas_price: None,
            })
            .await
            .map_err(|e| CasinoError::ContractRead {
                what: "bet requirements",
                cause: e.to_string(),
            })?;
        let requirements = IBank::getBetRequirementsCall::abi_decode_returns(&raw).map_err(|e| {
            CasinoError::ContractRead {
                what: "bet requirements",
                cause: e.to_string(),
            }
        })?;

        let token = &params.token;
        if !requirements.isAllowedToken {
            return Err(CasinoError::BetRequirements(format!(
                "{} is not allowed for {}",
                token.symbol,
                input.game()
            )));
        }
        if params.bet_amount > requirements.maxBetAmount {
            return Err(CasinoError::BetRequirements(format!(
                "bet amount {} {} exceeds the maximum of {} {}",
                token.format_amount(params.bet_amount),
                token.symbol,
                token.format_amount(requirements.maxBetAmount),
                token.symbol
            )));
        }
        if U256::from(params.bet_count) > requirements.maxBetCount {
            return Err(CasinoError::BetRequirements(format!(
                "bet count {} exceeds the maximum of {}",
                params.bet_count, requirements.maxBetCount
            )));
        }
        Ok(())
    }

    /// Approve `game_address` to pull `amount` of `token` if it cannot already.
    async fn ensure_allowance(
        &self,
        token: &Token,
        game_address: Address,
        amount: U256,
    ) -> CasinoResult<()> {
        let owner = self.wallet.address();
        let raw = self
            .wallet
            .read(ContractRead {
                to: token.address,
                data: IERC20::allowanceCall {
                    owner,
                    spender: game_address,
                }
                .abi_encode()
                .into(),
                gas_price: None,
            })
            .await
            .map_err(|e| CasinoError::ContractRead {
                what: "token allowance",
                cause: e.to_string(),
            })?;
        let allowance = IERC20::allowanceCall::abi_decode_returns(&raw).map_err(|e| {
            CasinoError::ContractRead {
                what: "token allowance",
                cause: e.to_string(),
            }
        })?;

        if allowance >= amount {
            return Ok(());
        }

        tracing::info!(
            token = %token.symbol,
            spender = %game_address,
            allowance = %allowance,
            required = %amount,
            "Approving bet token"
        );

        let hash = self
            .wallet
            .send_transaction(ContractWrite {
                to: token.address,
                data: IERC20::approveCall {
                    spender: game_address,
                    amount,
                }
                .abi_encode()
                .into(),
                value: U256::ZERO,
                gas_price: None,
            })
            .await
            .map_err(|e| CasinoError::Approval(e.to_string()))?;

        match self
            .wallet
            .wait_for_confirmation(hash, self.config.confirmation_timeout_secs)
            .await
            .map_err(|e| CasinoError::Approval(e.to_string()))?
        {
            ConfirmationStatus::Confirmed { .. } => Ok(()),
            ConfirmationStatus::Failed(reason) => Err(CasinoError::Approval(reason)),
        }
    }

    async fn vrf_cost(
        &self,
        chain: &CasinoChain,
        game: CasinoGame,
        game_address: Address,
        token: &Token,
        bet_count: u16,
        gas_price: u128,
    ) -> CasinoResult<U256> {
        match &self.fee_client {
            Some(client) => {
                client
                    .fetch_fee(&VrfFeeQuery {
                        chain_id: chain.info.id,
                        game,
                        token: token.address,
                        bet_count,
                        gas_price,
                    })
                    .await
            }
            None => {
                get_chainlink_vrf_cost(self.wallet(), game_address, token.address, bet_count, gas_price)
                    .await
            }
        }
    }
}

/// Fields of a `PlaceBet` event, whatever the game.
struct PlacedEvent {
    id: U256,
    receiver: Address,
    token: Address,
    amount: U256,
    vrf_cost: U256,
    choice: BetChoice,
    bet_count: u16,
    stop_gain: U256,
    stop_loss: U256,
}

/// Fields of a `Roll` event, whatever the game.
struct RollEvent {
    total_bet_amount: U256,
    rolled: RolledValues,
    payout: U256,
}

fn decode_place_bet(game: CasinoGame, log: &Log) -> Option<PlacedEvent> {
    let event = match game {
        CasinoGame::CoinToss => {
            let e = ICoinToss::PlaceBet::decode_log_data(&log.data).ok()?;
            PlacedEvent {
                id: e.id,
                receiver: e.receiver,
                token: e.token,
                amount: e.amount,
                vrf_cost: e.chainlinkVRFCost,
                choice: BetChoice::Face(CoinTossFace::decode(e.face)),
                bet_count: e.betCount,
                stop_gain: e.stopGain,
                stop_loss: e.stopLoss,
            }
        }
        CasinoGame::Dice => {
            let e = IDice::PlaceBet::decode_log_data(&log.data).ok()?;
            PlacedEvent {
                id: e.id,
                receiver: e.receiver,
                token: e.token,
                amount: e.amount,
                vrf_cost: e.chainlinkVRFCost,
                choice: BetChoice::Cap(e.cap),
                bet_count: e.betCount,
                stop_gain: e.stopGain,
                stop_loss: e.stopLoss,
            }
        }
        CasinoGame::Roulette => {
            let e = IRoulette::PlaceBet::decode_log_data(&log.data).ok()?;
            PlacedEvent {
                id: e.id,
                receiver: e.receiver,
                token: e.token,
                amount: e.amount,
                vrf_cost: e.chainlinkVRFCost,
                choice: BetChoice::Numbers(RouletteNumbers::decode(e.numbers.to::<u64>())),
                bet_count: e.betCount,
                stop_gain: e.stopGain,
                stop_loss: e.stopLoss,
            }
        }
    };
    Some(event)
}

fn decode_roll(game: CasinoGame, log: &Log) -> Option<RollEvent> {
    let event = match game {
        CasinoGame::CoinToss => {
            let e = ICoinToss::Roll::decode_log_data(&log.data).ok()?;
            RollEvent {
                total_bet_amount: e.totalBetAmount,
                rolled: RolledValues::Faces(e.rolled.into_iter().map(CoinTossFace::decode).collect()),
                payout: e.payout,
            }
        }
        CasinoGame::Dice => {
            let e = IDice::Roll::decode_log_data(&log.data).ok()?;
            RollEvent {
                total_bet_amount: e.totalBetAmount,
                rolled: RolledValues::Numbers(e.rolled),
                payout: e.payout,
            }
        }
        CasinoGame::Roulette => {
            let e = IRoulette::Roll::decode_log_data(&log.data).ok()?;
            RollEvent {
                total_bet_amount: e.totalBetAmount,
                rolled: RolledValues::Numbers(e.rolled),
                payout: e.payout,
            }
        }
    };
    Some(event)
}

fn roll_signature(game: CasinoGame) -> B256 {
    match game {
        CasinoGame::CoinToss => ICoinToss::Roll::SIGNATURE_HASH,
        CasinoGame::Dice => IDice::Roll::SIGNATURE_HASH,
        CasinoGame::Roulette => IRoulette::Roll::SIGNATURE_HASH,
    }
}
