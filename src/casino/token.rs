//! Bankroll tokens: listing, resolution and amount conversion.

use alloy::primitives::utils::{format_units, parse_units};
use alloy::primitives::{Address, U256};
use alloy::sol_types::SolCall;
use serde::Serialize;

use crate::blockchain::{BlockchainError, ContractRead, EvmWalletClient};
use crate::casino::abi::IBank;
use crate::casino::chains::CasinoChain;
use crate::casino::error::{CasinoError, CasinoResult};

/// Address standing for the chain's gas token.
pub const GAS_TOKEN_ADDRESS: Address = Address::ZERO;

/// Decimals of every supported chain's gas token.
pub const GAS_TOKEN_DECIMALS: u8 = 18;

/// A token that can be wagered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
}

impl Token {
    /// Gas token of `chain`.
    pub fn gas_token(chain: &CasinoChain) -> Self {
        Self {
            address: GAS_TOKEN_ADDRESS,
            symbol: chain.info.native_symbol.to_string(),
            decimals: GAS_TOKEN_DECIMALS,
        }
    }

    pub fn is_gas_token(&self) -> bool {
        self.address == GAS_TOKEN_ADDRESS
    }

    /// Render a raw amount with this token's decimals.
    pub fn format_amount(&self, amount: U256) -> String {
        format_units(amount, self.decimals).unwrap_or_else(|_| amount.to_string())
    }
}

/// Tokens the bank currently accepts on `chain`, gas token first.
///
/// The bank may list the gas token itself (as the zero address); it is
/// reported once.
pub async fn get_casino_tokens(
    wallet: &dyn EvmWalletClient,
    chain: &CasinoChain,
) -> CasinoResult<Vec<Token>> {
    let raw = wallet
        .read(ContractRead {
            to: chain.bank,
            data: IBank::getTokensCall {}.abi_encode().into(),
            gas_price: None,
        })
        .await
        .map_err(|e| CasinoError::ContractRead {
            what: "bank tokens",
            cause: e.to_string(),
        })?;

    let listed = IBank::getTokensCall::abi_decode_returns(&raw)
        .map_err(|e| BlockchainError::Decode(e.to_string()))?;

    let mut tokens = vec![Token::gas_token(chain)];
    let mut gas_token_allowed = true;
    for token in listed {
        if token.tokenAddress == GAS_TOKEN_ADDRESS {
            gas_token_allowed = token.allowed && !token.paused;
            continue;
        }
        if !token.allowed || token.paused {
            tracing::debug!(token = %token.symbol, "Skipping disabled bank token");
            continue;
        }
        tokens.push(Token {
            address: token.tokenAddress,
            symbol: token.symbol,
            decimals: token.decimals,
        });
    }
    if !gas_token_allowed {
        tokens.remove(0);
    }

    Ok(tokens)
}

/// Pick the bet token from user input.
///
/// `None` (or an empty string) selects the gas token. Otherwise the input
/// is matched against addresses and, case-insensitively, against symbols.
pub fn select_bet_token(
    tokens: &[Token],
    chain: &CasinoChain,
    input: Option<&str>,
) -> CasinoResult<Token> {
    let input = input.map(str::trim).filter(|s| !s.is_empty());

    let found = match input {
        None => tokens.iter().find(|t| t.is_gas_token()),
        Some(input) => match input.parse::<Address>() {
            Ok(address) => tokens.iter().find(|t| t.address == address),
            Err(_) => tokens.iter().find(|t| t.symbol.eq_ignore_ascii_case(input)),
        },
    };

    found.cloned().ok_or_else(|| CasinoError::TokenNotFound {
        token: input
            .map(str::to_string)
            .unwrap_or_else(|| chain.info.native_symbol.to_string()),
        chain_id: chain.info.id,
        available: tokens
            .iter()
            .map(|t| t.symbol.as_str())
            .collect::<Vec<_>>()
            .join(", "),
    })
}

/// Resolve the bet token for `input` on `chain`.
pub async fn get_bet_token(
    wallet: &dyn EvmWalletClient,
    chain: &CasinoChain,
    input: Option<&str>,
) -> CasinoResult<Token> {
    let tokens = get_casino_tokens(wallet, chain).await?;
    select_bet_token(&tokens, chain, input)
}

/// Convert a decimal amount such as `"0.05"` to the token's smallest unit.
///
/// Zero, negative and malformed amounts are rejected.
pub fn get_bet_amount_in_wei(amount: &str, token: &Token) -> CasinoResult<U256> {
    let wei = parse_token_amount("bet amount", amount, token)?;
    if wei.is_zero() {
        return Err(CasinoError::InvalidInput(format!(
            "bet amount must be greater than 0 {}",
            token.symbol
        )));
    }
    Ok(wei)
}

/// Parse a non-negative decimal amount with the token's decimals.
///
/// Digits beyond the token's precision are an error, not rounded away.
pub fn parse_token_amount(what: &str, amount: &str, token: &Token) -> CasinoResult<U256> {
    let amount = amount.trim();
    if let Some((_, fraction)) = amount.split_once('.') {
        if fraction.trim_end_matches('0').len() > usize::from(token.decimals) {
            return Err(CasinoError::InvalidInput(format!(
                "{} '{}' has more than {} decimals, the precision of {}",
                what, amount, token.decimals, token.symbol
            )));
        }
    }
    let parsed = parse_units(amount, token.decimals).map_err(|e| {
        CasinoError::InvalidInput(format!("invalid {} '{}': {}", what, amount, e))
    })?;
    if parsed.is_negative() {
        return Err(CasinoError::InvalidInput(format!(
            "{} must not be negative, got {}",
            what, amount
        )));
    }
    Ok(parsed.get_absolute())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::casino::chains::casino_chain_by_id;
    use std::collections::HashMap;

    fn chain() -> CasinoChain {
        CasinoChain::new(
            *casino_chain_by_id(137).unwrap(),
            Address::repeat_byte(0x11),
            HashMap::new(),
        )
    }

    fn usdc() -> Token {
        Token {
            address: Address::repeat_byte(0xaa),
            symbol: "USDC".to_string(),
            decimals: 6,
        }
    }

    #[test]
    fn test_select_defaults_to_gas_token() {
        let chain = chain();
        let tokens = vec![Token::gas_token(&chain), usdc()];
        let token = select_bet_token(&tokens, &chain, None).unwrap();
        assert!(token.is_gas_token());
        assert_eq!(token.symbol, "POL");

        let token = select_bet_token(&tokens, &chain, Some("  ")).unwrap();
        assert!(token.is_gas_token());
    }

    #[test]
    fn test_select_by_symbol_or_address() {
        let chain = chain();
        let tokens = vec![Token::gas_token(&chain), usdc()];
        assert_eq!(select_bet_token(&tokens, &chain, Some("usdc")).unwrap(), usdc());

        let address = format!("{}", Address::repeat_byte(0xaa));
        assert_eq!(select_bet_token(&tokens, &chain, Some(&address)).unwrap(), usdc());
    }

    #[test]
    fn test_select_unknown_token() {
        let chain = chain();
        let tokens = vec![Token::gas_token(&chain), usdc()];
        let err = select_bet_token(&tokens, &chain, Some("DOGE")).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("DOGE"));
        assert!(msg.contains("POL, USDC"));
    }

    #[test]
    fn test_bet_amount_in_wei() {
        let chain = chain();
        let gas = Token::gas_token(&chain);
        assert_eq!(
            get_bet_amount_in_wei("0.05", &gas).unwrap(),
            U256::from(50_000_000_000_000_000u64)
        );
        assert_eq!(get_bet_amount_in_wei("12.5", &usdc()).unwrap(), U256::from(12_500_000u64));
    }

    #[test]
    fn test_bet_amount_rejections() {
        let token = usdc();
        assert!(get_bet_amount_in_wei("0", &token).is_err());
        assert!(get_bet_amount_in_wei("-1", &token).is_err());
        assert!(get_bet_amount_in_wei("abc", &token).is_err());
    }

    #[test]
    fn test_excess_decimals_rejected() {
        let token = usdc();
        let err = get_bet_amount_in_wei("1.0000009", &token).unwrap_err();
        assert!(err.to_string().contains("more than 6 decimals"), "{err}");

        let err = get_bet_amount_in_wei("0.0000001", &token).unwrap_err();
        assert!(err.to_string().contains("more than 6 decimals"), "{err}");

        // Trailing zeros add no precision
        assert_eq!(
            get_bet_amount_in_wei("1.50000000", &token).unwrap(),
            U256::from(1_500_000u64)
        );
        assert!(parse_token_amount("stop loss", "0.1234567", &token).is_err());
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(usdc().format_amount(U256::from(1_500_000u64)), "1.500000");
    }
}
