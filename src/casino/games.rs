//! Casino games: player inputs, contract encodings and payout multipliers.
//!
//! Multipliers are expressed in basis points where [`BP_VALUE`] is 1x.
//! They are the gross multipliers of a winning bet; the house edge is
//! taken by the contract and capped per bet by `maxHouseEdge`.

use std::collections::BTreeSet;
use std::fmt;

use alloy::primitives::U256;
use serde::{Deserialize, Serialize};

use crate::casino::error::{CasinoError, CasinoResult};

/// Basis points of a 1x multiplier.
pub const BP_VALUE: u32 = 10_000;

pub const MIN_SELECTABLE_DICE_NUMBER: u8 = 1;
pub const MAX_SELECTABLE_DICE_NUMBER: u8 = 99;

pub const MIN_SELECTABLE_ROULETTE_NUMBER: u8 = 0;
pub const MAX_SELECTABLE_ROULETTE_NUMBER: u8 = 36;
/// Pockets on the wheel (0..=36).
pub const ROULETTE_POCKETS: u32 = 37;

/// Games offered by the casino.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CasinoGame {
    CoinToss,
    Dice,
    Roulette,
}

impl CasinoGame {
    pub const ALL: [CasinoGame; 3] = [CasinoGame::CoinToss, CasinoGame::Dice, CasinoGame::Roulette];

    /// Name used in tool names, logs and the fee API.
    pub fn as_str(&self) -> &'static str {
        match self {
            CasinoGame::CoinToss => "coinToss",
            CasinoGame::Dice => "dice",
            CasinoGame::Roulette => "roulette",
        }
    }

    /// Highest number of bets one wager may chain.
    pub fn max_bet_count(&self) -> u16 {
        match self {
            CasinoGame::CoinToss => 100,
            CasinoGame::Dice => 100,
            CasinoGame::Roulette => 100,
        }
    }
}

impl fmt::Display for CasinoGame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coin face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CoinTossFace {
    Heads,
    Tails,
}

impl CoinTossFace {
    /// Contract encoding: heads is `true`.
    pub fn encode(self) -> bool {
        matches!(self, CoinTossFace::Heads)
    }

    pub fn decode(face: bool) -> Self {
        if face {
            CoinTossFace::Heads
        } else {
            CoinTossFace::Tails
        }
    }
}

/// A dice cap: the bet wins when the roll (1..=100) is strictly above it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DiceNumber(u8);

impl DiceNumber {
    pub fn new(cap: u8) -> CasinoResult<Self> {
        if !(MIN_SELECTABLE_DICE_NUMBER..=MAX_SELECTABLE_DICE_NUMBER).contains(&cap) {
            return Err(CasinoError::InvalidInput(format!(
                "dice number must be between {} and {}, got {}",
                MIN_SELECTABLE_DICE_NUMBER, MAX_SELECTABLE_DICE_NUMBER, cap
            )));
        }
        Ok(Self(cap))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for DiceNumber {
    type Error = CasinoError;

    fn try_from(cap: u8) -> Result<Self, Self::Error> {
        Self::new(cap)
    }
}

impl From<DiceNumber> for u8 {
    fn from(n: DiceNumber) -> Self {
        n.0
    }
}

/// A non-empty set of distinct roulette numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouletteNumbers(Vec<u8>);

impl RouletteNumbers {
    /// Validate a selection. Order is not significant; the stored list is sorted.
    pub fn new(numbers: &[u8]) -> CasinoResult<Self> {
        if numbers.is_empty() {
            return Err(CasinoError::InvalidInput(
                "at least one roulette number must be selected".to_string(),
            ));
        }
        if let Some(n) = numbers.iter().find(|n| **n > MAX_SELECTABLE_ROULETTE_NUMBER) {
            return Err(CasinoError::InvalidInput(format!(
                "roulette numbers must be between {} and {}, got {}",
                MIN_SELECTABLE_ROULETTE_NUMBER, MAX_SELECTABLE_ROULETTE_NUMBER, n
            )));
        }
        let unique: BTreeSet<u8> = numbers.iter().copied().collect();
        if unique.len() != numbers.len() {
            return Err(CasinoError::InvalidInput(
                "roulette numbers must not repeat".to_string(),
            ));
        }
        if unique.len() > MAX_SELECTABLE_ROULETTE_NUMBER as usize {
            return Err(CasinoError::InvalidInput(format!(
                "at most {} roulette numbers can be selected",
                MAX_SELECTABLE_ROULETTE_NUMBER
            )));
        }
        Ok(Self(unique.into_iter().collect()))
    }

    /// Contract encoding: bit `n` set for every selected number.
    pub fn encode(&self) -> u64 {
        self.0.iter().fold(0u64, |mask, n| mask | (1u64 << n))
    }

    /// Inverse of [`encode`](Self::encode), ignoring bits above 36.
    pub fn decode(mask: u64) -> Vec<u8> {
        (MIN_SELECTABLE_ROULETTE_NUMBER..=MAX_SELECTABLE_ROULETTE_NUMBER)
            .filter(|n| mask & (1u64 << n) != 0)
            .collect()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

/// A validated player choice for one of the games.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "game", content = "choice", rename_all = "camelCase")]
pub enum GameInput {
    CoinToss(CoinTossFace),
    Dice(DiceNumber),
    Roulette(RouletteNumbers),
}

impl GameInput {
    pub fn game(&self) -> CasinoGame {
        match self {
            GameInput::CoinToss(_) => CasinoGame::CoinToss,
            GameInput::Dice(_) => CasinoGame::Dice,
            GameInput::Roulette(_) => CasinoGame::Roulette,
        }
    }

    /// Gross payout multiplier in basis points.
    pub fn multiplier(&self) -> u32 {
        match self {
            GameInput::CoinToss(_) => 2 * BP_VALUE,
            GameInput::Dice(cap) => BP_VALUE * 100 / (100 - u32::from(cap.get())),
            GameInput::Roulette(numbers) => {
                BP_VALUE * ROULETTE_POCKETS / numbers.as_slice().len() as u32
            }
        }
    }

    /// Gross payout of a single winning bet of `amount`.
    pub fn gross_payout(&self, amount: U256) -> U256 {
        amount * U256::from(self.multiplier()) / U256::from(BP_VALUE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coin_toss_encoding() {
        assert!(CoinTossFace::Heads.encode());
        assert!(!CoinTossFace::Tails.encode());
        assert_eq!(CoinTossFace::decode(true), CoinTossFace::Heads);
        let face: CoinTossFace = serde_json::from_str("\"TAILS\"").unwrap();
        assert_eq!(face, CoinTossFace::Tails);
    }

    #[test]
    fn test_multipliers() {
        assert_eq!(GameInput::CoinToss(CoinTossFace::Heads).multiplier(), 20_000);
        assert_eq!(GameInput::Dice(DiceNumber::new(50).unwrap()).multiplier(), 20_000);
        assert_eq!(GameInput::Dice(DiceNumber::new(1).unwrap()).multiplier(), 10_101);
        assert_eq!(GameInput::Dice(DiceNumber::new(99).unwrap()).multiplier(), 1_000_000);

        let single = RouletteNumbers::new(&[17]).unwrap();
        assert_eq!(GameInput::Roulette(single).multiplier(), 370_000);
        let dozen: Vec<u8> = (1..=12).collect();
        let dozen = RouletteNumbers::new(&dozen).unwrap();
        assert_eq!(GameInput::Roulette(dozen).multiplier(), 30_833);
    }

    #[test]
    fn test_gross_payout() {
        let input = GameInput::CoinToss(CoinTossFace::Tails);
        assert_eq!(input.gross_payout(U256::from(1_000u64)), U256::from(2_000u64));
    }

    #[test]
    fn test_dice_bounds() {
        assert!(DiceNumber::new(0).is_err());
        assert!(DiceNumber::new(100).is_err());
        assert!(serde_json::from_str::<DiceNumber>("100").is_err());
        assert_eq!(serde_json::from_str::<DiceNumber>("42").unwrap().get(), 42);
    }

    #[test]
    fn test_roulette_validation() {
        assert!(RouletteNumbers::new(&[]).is_err());
        assert!(RouletteNumbers::new(&[37]).is_err());
        assert!(RouletteNumbers::new(&[3, 3]).is_err());
        let all: Vec<u8> = (0..=36).collect();
        assert!(RouletteNumbers::new(&all).is_err());

        let numbers = RouletteNumbers::new(&[36, 0, 7]).unwrap();
        assert_eq!(numbers.as_slice(), &[0, 7, 36]);
    }

    #[test]
    fn test_roulette_mask() {
        let numbers = RouletteNumbers::new(&[0, 1, 36]).unwrap();
        let mask = numbers.encode();
        assert_eq!(mask, 1 | 2 | (1u64 << 36));
        assert_eq!(RouletteNumbers::decode(mask), vec![0, 1, 36]);
    }

    #[test]
    fn test_game_names() {
        assert_eq!(CasinoGame::CoinToss.to_string(), "coinToss");
        let game: CasinoGame = serde_json::from_str("\"roulette\"").unwrap();
        assert_eq!(game, CasinoGame::Roulette);
    }
}
