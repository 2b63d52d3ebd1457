//! `betswirl.roulette`.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::casino::games::{MAX_SELECTABLE_ROULETTE_NUMBER, MIN_SELECTABLE_ROULETTE_NUMBER};
use crate::casino::{BetSwirlService, CasinoGame, GameInput, RouletteNumbers};
use crate::tools::params::{bet_tool_schema, parse_args, CasinoBetParams};
use crate::tools::{Tool, ToolError, ToolResult};

#[derive(Debug, Deserialize)]
struct RouletteParams {
    numbers: Vec<u8>,
    #[serde(flatten)]
    bet: CasinoBetParams,
}

/// Bet on a set of roulette numbers.
pub struct RouletteTool {
    service: Arc<BetSwirlService>,
}

impl RouletteTool {
    pub fn new(service: Arc<BetSwirlService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for RouletteTool {
    fn name(&self) -> &'static str {
        "betswirl.roulette"
    }

    fn description(&self) -> &'static str {
        "Play the BetSwirl Roulette. The player is betting that the rolled number will be one of the chosen numbers."
    }

    fn parameters(&self) -> Value {
        bet_tool_schema(
            CasinoGame::Roulette,
            json!({
                "numbers": {
                    "type": "array",
                    "items": {
                        "type": "integer",
                        "minimum": MIN_SELECTABLE_ROULETTE_NUMBER,
                        "maximum": MAX_SELECTABLE_ROULETTE_NUMBER
                    },
                    "minItems": 1,
                    "maxItems": MAX_SELECTABLE_ROULETTE_NUMBER,
                    "uniqueItems": true,
                    "description": "The numbers to bet on"
                }
            }),
            &["numbers"],
        )
    }

    async fn execute(&self, args: Value) -> ToolResult<Value> {
        let params: RouletteParams = parse_args(args)?;
        let numbers = RouletteNumbers::new(&params.numbers)
            .map_err(|e| ToolError::InvalidParameters(format!("numbers: {e}")))?;
        let request = params.bet.into_request(CasinoGame::Roulette)?;

        let placed = self
            .service
            .place_bet(GameInput::Roulette(numbers), request)
            .await?;
        serde_json::to_value(placed).map_err(|e| ToolError::Internal(e.to_string()))
    }
}
