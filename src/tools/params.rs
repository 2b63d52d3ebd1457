//! Tool argument parsing and JSON schemas.

use alloy::primitives::{Address, TxHash};
use serde::de::{DeserializeOwned, Deserializer, Error as _};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::casino::{BetRequest, CasinoGame};
use crate::tools::{ToolError, ToolResult};

/// Deserialize tool arguments. `null` counts as an empty object.
pub fn parse_args<T: DeserializeOwned>(args: Value) -> ToolResult<T> {
    let args = if args.is_null() {
        Value::Object(Map::new())
    } else {
        args
    };
    serde_json::from_value(args).map_err(|e| ToolError::InvalidParameters(e.to_string()))
}

/// `0x` followed by 40 hex digits.
pub fn is_hex_address(value: &str) -> bool {
    is_prefixed_hex(value, 40)
}

/// `0x` followed by 64 hex digits.
pub fn is_tx_hash(value: &str) -> bool {
    is_prefixed_hex(value, 64)
}

fn is_prefixed_hex(value: &str, digits: usize) -> bool {
    value
        .strip_prefix("0x")
        .is_some_and(|hex| hex.len() == digits && hex.bytes().all(|b| b.is_ascii_hexdigit()))
}

pub fn parse_address(field: &str, value: &str) -> ToolResult<Address> {
    if !is_hex_address(value) {
        return Err(ToolError::InvalidParameters(format!(
            "{field}: the address must be a valid EVM address"
        )));
    }
    value
        .parse()
        .map_err(|e| ToolError::InvalidParameters(format!("{field}: {e}")))
}

pub fn parse_tx_hash(value: &str) -> ToolResult<TxHash> {
    if !is_tx_hash(value) {
        return Err(ToolError::InvalidParameters(
            "hash: transaction hash must be a valid hex string".to_string(),
        ));
    }
    value
        .parse()
        .map_err(|e| ToolError::InvalidParameters(format!("hash: {e}")))
}

/// Parameters shared by every game tool.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CasinoBetParams {
    /// Decimal amount per bet, in token units.
    #[serde(deserialize_with = "amount")]
    pub bet_amount: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub bet_count: Option<u16>,
    #[serde(default, deserialize_with = "optional_amount")]
    pub stop_gain: Option<String>,
    #[serde(default, deserialize_with = "optional_amount")]
    pub stop_loss: Option<String>,
    #[serde(default)]
    pub receiver: Option<String>,
    #[serde(default)]
    pub affiliate: Option<String>,
}

impl CasinoBetParams {
    /// Validate the shared parameters for `game`.
    pub fn into_request(self, game: CasinoGame) -> ToolResult<BetRequest> {
        if let Some(count) = self.bet_count {
            if count == 0 || count > game.max_bet_count() {
                return Err(ToolError::InvalidParameters(format!(
                    "betCount: must be between 1 and {}",
                    game.max_bet_count()
                )));
            }
        }

        Ok(BetRequest {
            bet_amount: self.bet_amount,
            token: self.token,
            bet_count: self.bet_count,
            stop_gain: self.stop_gain,
            stop_loss: self.stop_loss,
            receiver: self
                .receiver
                .as_deref()
                .map(|r| parse_address("receiver", r))
                .transpose()?,
            affiliate: self
                .affiliate
                .as_deref()
                .map(|a| parse_address("affiliate", a))
                .transpose()?,
        })
    }
}

/// Amounts may be sent as JSON strings or numbers; both become decimal strings.
fn amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    optional_amount(deserializer)?
        .ok_or_else(|| D::Error::custom("expected a decimal string or number, got null"))
}

fn optional_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => {
            // Very small or large floats print in exponent form
            let digits = n.to_string();
            if digits.contains(|c: char| c == 'e' || c == 'E') {
                return Err(D::Error::custom(format!(
                    "amount {digits} must be sent as a decimal string, e.g. \"0.0000001\""
                )));
            }
            Ok(Some(digits))
        }
        other => Err(D::Error::custom(format!(
            "expected a decimal string or number, got {other}"
        ))),
    }
}

/// Schema of a game tool: the game's own properties plus the shared bet parameters.
pub fn bet_tool_schema(game: CasinoGame, properties: Value, required: &[&str]) -> Value {
    let address = json!({
        "type": "string",
        "pattern": "^0x[a-fA-F0-9]{40}$"
    });

    let mut all = match properties {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    all.insert(
        "betAmount".into(),
        json!({ "type": "string", "description": "The bet amount, in token units (e.g. \"0.01\")" }),
    );
    all.insert(
        "token".into(),
        json!({ "type": "string", "description": "The token to bet with (symbol or address), by default the gas token" }),
    );
    all.insert(
        "betCount".into(),
        json!({
            "type": "integer",
            "minimum": 1,
            "maximum": game.max_bet_count(),
            "default": 1,
            "description": "The number of bets to place"
        }),
    );
    all.insert(
        "stopGain".into(),
        json!({ "type": "string", "description": "The profit amount to stop betting" }),
    );
    all.insert(
        "stopLoss".into(),
        json!({ "type": "string", "description": "The loss amount to stop betting" }),
    );
    let mut receiver = address.clone();
    receiver["description"] = json!("The payout receiver address, by default the wallet");
    all.insert("receiver".into(), receiver);
    let mut affiliate = address;
    affiliate["description"] = json!("The affiliate address");
    all.insert("affiliate".into(), affiliate);

    let mut required: Vec<&str> = required.to_vec();
    required.push("betAmount");

    json!({
        "type": "object",
        "properties": all,
        "required": required,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_checks() {
        assert!(is_hex_address("0x000000000000000000000000000000000000dEaD"));
        assert!(!is_hex_address("000000000000000000000000000000000000dEaD"));
        assert!(!is_hex_address("0x123"));
        assert!(!is_hex_address("0xZZ0000000000000000000000000000000000dEaD"));
        assert!(is_tx_hash(&format!("0x{}", "ab".repeat(32))));
        assert!(!is_tx_hash(&format!("0x{}", "ab".repeat(20))));
    }

    #[test]
    fn test_bet_params_defaults() {
        let params: CasinoBetParams = parse_args(json!({ "betAmount": "0.5" })).unwrap();
        let request = params.into_request(CasinoGame::Dice).unwrap();
        assert_eq!(request.bet_amount, "0.5");
        assert_eq!(request.bet_count, None);
        assert_eq!(request.receiver, None);
    }

    #[test]
    fn test_numeric_amounts() {
        let params: CasinoBetParams =
            parse_args(json!({ "betAmount": 2, "stopLoss": 1.5 })).unwrap();
        assert_eq!(params.bet_amount, "2");
        assert_eq!(params.stop_loss.as_deref(), Some("1.5"));
    }

    #[test]
    fn test_exponent_amounts_rejected() {
        let err = parse_args::<CasinoBetParams>(json!({ "betAmount": 1e-7 })).unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert!(err.to_string().contains("decimal string"), "{err}");

        let err = parse_args::<CasinoBetParams>(json!({ "betAmount": "1", "stopGain": 1e21 }))
            .unwrap_err();
        assert!(err.to_string().contains("decimal string"), "{err}");

        let params: CasinoBetParams = parse_args(json!({ "betAmount": "0.0000001" })).unwrap();
        assert_eq!(params.bet_amount, "0.0000001");
    }

    #[test]
    fn test_bet_params_rejections() {
        assert!(parse_args::<CasinoBetParams>(json!({})).is_err());
        assert!(parse_args::<CasinoBetParams>(json!({ "betAmount": true })).is_err());

        let params: CasinoBetParams =
            parse_args(json!({ "betAmount": "1", "receiver": "0x1234" })).unwrap();
        assert!(params.into_request(CasinoGame::CoinToss).is_err());

        let params: CasinoBetParams =
            parse_args(json!({ "betAmount": "1", "betCount": 0 })).unwrap();
        assert!(params.into_request(CasinoGame::CoinToss).is_err());
    }

    #[test]
    fn test_schema_lists_required() {
        let schema = bet_tool_schema(
            CasinoGame::CoinToss,
            json!({ "face": { "type": "string" } }),
            &["face"],
        );
        assert_eq!(schema["required"], json!(["face", "betAmount"]));
        assert!(schema["properties"]["receiver"]["pattern"].is_string());
    }
}
