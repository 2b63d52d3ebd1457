//! `betswirl.coinToss`.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::casino::{BetSwirlService, CasinoGame, CoinTossFace, GameInput};
use crate::tools::params::{bet_tool_schema, parse_args, CasinoBetParams};
use crate::tools::{Tool, ToolError, ToolResult};

#[derive(Debug, Deserialize)]
struct CoinTossParams {
    face: CoinTossFace,
    #[serde(flatten)]
    bet: CasinoBetParams,
}

/// Flip a coin.
pub struct CoinTossTool {
    service: Arc<BetSwirlService>,
}

impl CoinTossTool {
    pub fn new(service: Arc<BetSwirlService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for CoinTossTool {
    fn name(&self) -> &'static str {
        "betswirl.coinToss"
    }

    fn description(&self) -> &'static str {
        "Flip a coin on BetSwirl. The player is betting that the rolled face will be the one chosen."
    }

    fn parameters(&self) -> Value {
        bet_tool_schema(
            CasinoGame::CoinToss,
            json!({
                "face": {
                    "type": "string",
                    "enum": ["HEADS", "TAILS"],
                    "description": "The face of the coin"
                }
            }),
            &["face"],
        )
    }

    async fn execute(&self, args: Value) -> ToolResult<Value> {
        let params: CoinTossParams = parse_args(args)?;
        let request = params.bet.into_request(CasinoGame::CoinToss)?;

        let placed = self
            .service
            .place_bet(GameInput::CoinToss(params.face), request)
            .await?;
        serde_json::to_value(placed).map_err(|e| ToolError::Internal(e.to_string()))
    }
}
