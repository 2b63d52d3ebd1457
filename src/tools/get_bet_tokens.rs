//! `betswirl.getBetTokens`.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::casino::BetSwirlService;
use crate::tools::{Tool, ToolError, ToolResult};

/// List the tokens that can be wagered on the wallet's chain.
pub struct GetBetTokensTool {
    service: Arc<BetSwirlService>,
}

impl GetBetTokensTool {
    pub fn new(service: Arc<BetSwirlService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for GetBetTokensTool {
    fn name(&self) -> &'static str {
        "betswirl.getBetTokens"
    }

    fn description(&self) -> &'static str {
        "List the tokens that can be used to bet on BetSwirl on the current chain."
    }

    fn parameters(&self) -> Value {
        json!({ "type": "object", "properties": {} })
    }

    async fn execute(&self, _args: Value) -> ToolResult<Value> {
        let tokens = self.service.get_bet_tokens().await?;
        serde_json::to_value(tokens).map_err(|e| ToolError::Internal(e.to_string()))
    }
}
