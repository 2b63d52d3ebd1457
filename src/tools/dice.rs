//! `betswirl.dice`.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::casino::games::{MAX_SELECTABLE_DICE_NUMBER, MIN_SELECTABLE_DICE_NUMBER};
use crate::casino::{BetSwirlService, CasinoGame, DiceNumber, GameInput};
use crate::tools::params::{bet_tool_schema, parse_args, CasinoBetParams};
use crate::tools::{Tool, ToolError, ToolResult};

#[derive(Debug, Deserialize)]
struct DiceParams {
    #[serde(alias = "cap")]
    number: u8,
    #[serde(flatten)]
    bet: CasinoBetParams,
}

/// Roll a dice; wins when the roll is above the chosen number.
pub struct DiceTool {
    service: Arc<BetSwirlService>,
}

impl DiceTool {
    pub fn new(service: Arc<BetSwirlService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for DiceTool {
    fn name(&self) -> &'static str {
        "betswirl.dice"
    }

    fn description(&self) -> &'static str {
        "Play the BetSwirl Dice. The player is betting that the rolled number will be above this chosen number."
    }

    fn parameters(&self) -> Value {
        bet_tool_schema(
            CasinoGame::Dice,
            json!({
                "number": {
                    "type": "integer",
                    "minimum": MIN_SELECTABLE_DICE_NUMBER,
                    "maximum": MAX_SELECTABLE_DICE_NUMBER,
                    "description": "The number to bet on"
                }
            }),
            &["number"],
        )
    }

    async fn execute(&self, args: Value) -> ToolResult<Value> {
        let params: DiceParams = parse_args(args)?;
        let number = DiceNumber::new(params.number)
            .map_err(|e| ToolError::InvalidParameters(format!("number: {e}")))?;
        let request = params.bet.into_request(CasinoGame::Dice)?;

        let placed = self
            .service
            .place_bet(GameInput::Dice(number), request)
            .await?;
        serde_json::to_value(placed).map_err(|e| ToolError::Internal(e.to_string()))
    }
}
