//! Bet parameters and `wager` call generation.

use alloy::primitives::aliases::U40;
use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::sol_types::SolCall;
use serde::Serialize;

use crate::casino::abi::{BetData, ICoinToss, IDice, IRoulette};
use crate::casino::error::{CasinoError, CasinoResult};
use crate::casino::games::{CasinoGame, CoinTossFace, GameInput};
use crate::casino::token::Token;

/// Everything about a bet besides the player's choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BetParams {
    /// Amount per bet, in the token's smallest unit.
    pub bet_amount: U256,
    pub token: Token,
    pub bet_count: u16,
    pub receiver: Address,
    /// Stop after this much profit (0 = never). Only meaningful with `bet_count > 1`.
    pub stop_gain: U256,
    /// Stop after this much loss (0 = never).
    pub stop_loss: U256,
    pub affiliate: Address,
    pub max_house_edge_bps: u16,
}

impl BetParams {
    /// Check the parameters against the game's limits.
    pub fn validate(&self, game: CasinoGame) -> CasinoResult<()> {
        if self.bet_amount.is_zero() {
            return Err(CasinoError::InvalidInput(
                "bet amount must be greater than 0".to_string(),
            ));
        }
        if self.bet_count == 0 || self.bet_count > game.max_bet_count() {
            return Err(CasinoError::InvalidInput(format!(
                "bet count must be between 1 and {} for {}, got {}",
                game.max_bet_count(),
                game,
                self.bet_count
            )));
        }
        if self.receiver == Address::ZERO {
            return Err(CasinoError::InvalidInput(
                "receiver must not be the zero address".to_string(),
            ));
        }
        Ok(())
    }

    /// Amount wagered across all bets.
    pub fn total_bet_amount(&self) -> U256 {
        self.bet_amount * U256::from(self.bet_count)
    }

    fn bet_data(&self) -> BetData {
        BetData {
            token: self.token.address,
            betAmount: self.bet_amount,
            betCount: self.bet_count,
            stopGain: self.stop_gain,
            stopLoss: self.stop_loss,
            maxHouseEdge: self.max_house_edge_bps,
        }
    }
}

/// Encoded `wager` call for one game contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayGameFunctionData {
    pub data: Bytes,
    pub total_bet_amount: U256,
}

/// Encode `wager(input, receiver, affiliate, betData)` for the input's game.
pub fn generate_play_game_function_data(
    input: &GameInput,
    params: &BetParams,
) -> PlayGameFunctionData {
    let receiver = params.receiver;
    let affiliate = params.affiliate;
    let bet_data = params.bet_data();

    let data = match input {
        GameInput::CoinToss(face) => ICoinToss::wagerCall {
            face: face.encode(),
            receiver,
            affiliate,
            betData: bet_data,
        }
        .abi_encode(),
        GameInput::Dice(cap) => IDice::wagerCall {
            cap: cap.get(),
            receiver,
            affiliate,
            betData: bet_data,
        }
        .abi_encode(),
        GameInput::Roulette(numbers) => IRoulette::wagerCall {
            numbers: U40::from(numbers.encode()),
            receiver,
            affiliate,
            betData: bet_data,
        }
        .abi_encode(),
    };

    PlayGameFunctionData {
        data: data.into(),
        total_bet_amount: params.total_bet_amount(),
    }
}

/// Native value to attach to the wager.
///
/// Gas-token bets carry the stake; every bet carries the VRF fee.
pub fn transaction_value(token: &Token, total_bet_amount: U256, vrf_cost: U256) -> U256 {
    if token.is_gas_token() {
        total_bet_amount + vrf_cost
    } else {
        vrf_cost
    }
}

/// Outcome of a successfully broadcast wager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedBet {
    pub hash: TxHash,
    pub game: CasinoGame,
    pub chain_id: u64,
    pub game_address: Address,
    pub token: Token,
    pub bet_amount: U256,
    /// `bet_amount` in token units, e.g. `"0.010000000000000000"`.
    pub formatted_bet_amount: String,
    pub bet_count: u16,
    pub receiver: Address,
    /// Gross multiplier in basis points.
    pub multiplier: u32,
    pub vrf_cost: U256,
    /// Native value sent with the transaction.
    pub value: U256,
}

/// Lifecycle of a bet on-chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BetStatus {
    /// Wager accepted, waiting for the VRF callback.
    Pending,
    /// The `Roll` event was emitted.
    Resolved,
}

/// Player's choice as recorded by the contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum BetChoice {
    Face(CoinTossFace),
    Cap(u8),
    Numbers(Vec<u8>),
}

/// Values drawn by the VRF, one per bet actually played.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RolledValues {
    Faces(Vec<CoinTossFace>),
    Numbers(Vec<u8>),
}

/// A bet read back from the chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CasinoBet {
    pub id: U256,
    pub hash: TxHash,
    pub game: CasinoGame,
    pub game_address: Address,
    pub status: BetStatus,
    pub receiver: Address,
    pub token: Address,
    pub amount: U256,
    pub bet_count: u16,
    pub stop_gain: U256,
    pub stop_loss: U256,
    pub vrf_cost: U256,
    pub choice: BetChoice,
    pub block_number: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rolled: Option<RolledValues>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_bet_amount: Option<U256>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payout: Option<U256>,
    /// `Some(true)` when the payout exceeds the amount wagered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_win: Option<bool>,
}
