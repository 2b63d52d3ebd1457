//! BetSwirl casino.
//!
//! # Data Flow
//! ```text
//! tools
//!     → service.rs (place_bet, get_bet, get_bet_tokens)
//!         → chains.rs (casino chains + configured contracts)
//!         → games.rs (player input, encoding, multipliers)
//!         → token.rs (bank tokens, units)
//!         → bet.rs (BetData, wager call data, tx value)
//!         → vrf.rs (VRF cost)
//!         → abi.rs (contract interfaces)
//!     → blockchain::EvmWalletClient
//! ```

pub mod abi;
pub mod bet;
pub mod chains;
pub mod error;
pub mod games;
pub mod service;
pub mod token;
pub mod vrf;

pub use bet::{BetParams, BetStatus, CasinoBet, PlacedBet};
pub use chains::{supports_chain, CasinoChain, Chain, ChainKind, ChainRegistry};
pub use error::{CasinoError, CasinoResult};
pub use games::{CasinoGame, CoinTossFace, DiceNumber, GameInput, RouletteNumbers, BP_VALUE};
pub use service::{BetRequest, BetSwirlService};
pub use token::Token;
pub use vrf::VrfFeeClient;
