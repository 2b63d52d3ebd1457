//! `betswirl.getBet`.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::casino::BetSwirlService;
use crate::tools::params::{parse_args, parse_tx_hash};
use crate::tools::{Tool, ToolError, ToolResult};

#[derive(Debug, Deserialize)]
struct GetBetParams {
    hash: String,
}

/// Look a bet up by the hash of its wager transaction.
pub struct GetBetTool {
    service: Arc<BetSwirlService>,
}

impl GetBetTool {
    pub fn new(service: Arc<BetSwirlService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for GetBetTool {
    fn name(&self) -> &'static str {
        "betswirl.getBet"
    }

    fn description(&self) -> &'static str {
        "Get a BetSwirl bet from its transaction hash, including the rolled values and payout once resolved."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "hash": {
                    "type": "string",
                    "pattern": "^0x[a-fA-F0-9]{64}$",
                    "description": "Transaction hash of the bet"
                }
            },
            "required": ["hash"]
        })
    }

    async fn execute(&self, args: Value) -> ToolResult<Value> {
        let params: GetBetParams = parse_args(args)?;
        let hash = parse_tx_hash(&params.hash)?;

        let bet = self.service.get_bet(hash).await?;
        serde_json::to_value(bet).map_err(|e| ToolError::Internal(e.to_string()))
    }
}
