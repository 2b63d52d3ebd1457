//! Agent-facing tools.
//!
//! # Data Flow
//! ```text
//! POST /tools/{name} (JSON arguments)
//!     → ToolRegistry::call (lookup, metrics, logging)
//!     → Tool::execute (params.rs parses and validates arguments)
//!     → casino::BetSwirlService
//!     → JSON result
//! ```
//!
//! # Design Decisions
//! - Tools are registered once at startup; the registry is immutable afterwards
//! - Every tool is `Send + Sync` and shared behind `Arc`
//! - Argument errors never reach the chain

pub mod coin_toss;
pub mod dice;
pub mod get_bet;
pub mod get_bet_tokens;
pub mod params;
pub mod roulette;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::casino::{supports_chain, BetSwirlService, CasinoError, Chain};
use crate::observability::metrics;

pub use coin_toss::CoinTossTool;
pub use dice::DiceTool;
pub use get_bet::GetBetTool;
pub use get_bet_tokens::GetBetTokensTool;
pub use roulette::RouletteTool;

/// Errors returned by tool calls.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Arguments do not match the tool's schema.
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// No tool is registered under this name.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error(transparent)]
    Casino(#[from] CasinoError),

    /// The result could not be serialized.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ToolError {
    /// HTTP status code the error maps to.
    pub fn status_code(&self) -> u16 {
        match self {
            ToolError::InvalidParameters(_) => 400,
            ToolError::UnknownTool(_) => 404,
            ToolError::Internal(_) => 500,
            ToolError::Casino(e) => match e {
                CasinoError::InvalidInput(_) | CasinoError::TokenNotFound { .. } => 400,
                CasinoError::BetNotFound(_) => 404,
                CasinoError::UnsupportedChain(_)
                | CasinoError::GameUnavailable { .. }
                | CasinoError::BetRequirements(_) => 422,
                CasinoError::ContractRead { .. }
                | CasinoError::VrfCost(_)
                | CasinoError::Approval(_)
                | CasinoError::PlaceBet(_)
                | CasinoError::Blockchain(_) => 502,
            },
        }
    }

    /// Short label used in metrics and error bodies.
    pub fn kind(&self) -> &'static str {
        match self.status_code() {
            400 => "invalid_parameters",
            404 => "not_found",
            422 => "unprocessable",
            502 => "upstream_error",
            _ => "internal_error",
        }
    }
}

/// Result type for tool calls.
pub type ToolResult<T> = Result<T, ToolError>;

/// A named, self-describing operation an agent can invoke.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// JSON schema of the argument object.
    fn parameters(&self) -> Value;

    async fn execute(&self, args: Value) -> ToolResult<Value>;
}

/// What `GET /tools` reports for one tool.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: Value,
}

/// Registered tools, in registration order.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    by_name: HashMap<&'static str, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tool. A tool with the same name is replaced.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name();
        match self.by_name.get(name) {
            Some(&index) => self.tools[index] = tool,
            None => {
                self.by_name.insert(name, self.tools.len());
                self.tools.push(tool);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.by_name.get(name).map(|&index| &self.tools[index])
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .iter()
            .map(|tool| ToolDefinition {
                name: tool.name(),
                description: tool.description(),
                parameters: tool.parameters(),
            })
            .collect()
    }

    /// Invoke `name` with `args`.
    pub async fn call(&self, name: &str, args: Value) -> ToolResult<Value> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;

        let start = Instant::now();
        tracing::debug!(tool = name, "Calling tool");
        let result = tool.execute(args).await;

        match &result {
            Ok(_) => {
                metrics::record_tool_call(name, "ok", start);
                tracing::info!(
                    tool = name,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Tool call succeeded"
                );
            }
            Err(e) => {
                metrics::record_tool_call(name, e.kind(), start);
                tracing::warn!(tool = name, error = %e, "Tool call failed");
            }
        }

        result
    }
}

/// The BetSwirl plugin: its name, chain support and tools.
pub struct BetSwirlPlugin {
    service: Arc<BetSwirlService>,
}

impl BetSwirlPlugin {
    pub const NAME: &'static str = "betswirl";

    pub fn new(service: Arc<BetSwirlService>) -> Self {
        Self { service }
    }

    pub fn name(&self) -> &'static str {
        Self::NAME
    }

    pub fn supports_chain(&self, chain: &Chain) -> bool {
        supports_chain(chain)
    }

    pub fn tools(&self) -> Vec<Arc<dyn Tool>> {
        vec![
            Arc::new(CoinTossTool::new(self.service.clone())),
            Arc::new(DiceTool::new(self.service.clone())),
            Arc::new(RouletteTool::new(self.service.clone())),
            Arc::new(GetBetTool::new(self.service.clone())),
            Arc::new(GetBetTokensTool::new(self.service.clone())),
        ]
    }

    /// Registry holding every tool of the plugin.
    pub fn registry(&self) -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        for tool in self.tools() {
            registry.register(tool);
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Echo;

    #[async_trait]
    impl Tool for Echo {
        fn name(&self) -> &'static str {
            "test.echo"
        }

        fn description(&self) -> &'static str {
            "Echo the arguments"
        }

        fn parameters(&self) -> Value {
            json!({ "type": "object" })
        }

        async fn execute(&self, args: Value) -> ToolResult<Value> {
            if args.get("fail").is_some() {
                return Err(ToolError::InvalidParameters("fail".to_string()));
            }
            Ok(args)
        }
    }

    #[tokio::test]
    async fn test_registry_call() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(Echo));
        assert_eq!(registry.len(), 1);

        let out = registry.call("test.echo", json!({ "a": 1 })).await.unwrap();
        assert_eq!(out, json!({ "a": 1 }));

        let err = registry.call("test.echo", json!({ "fail": true })).await.unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let registry = ToolRegistry::new();
        let err = registry.call("nope", Value::Null).await.unwrap_err();
        assert!(matches!(err, ToolError::UnknownTool(_)));
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn test_register_replaces_same_name() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(Echo));
        registry.register(Arc::new(Echo));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.definitions()[0].name, "test.echo");
    }

    #[test]
    fn test_casino_error_status() {
        let unavailable = ToolError::from(CasinoError::GameUnavailable {
            game: "roulette".to_string(),
            chain_id: 137,
        });
        assert_eq!(unavailable.status_code(), 422);
        assert_eq!(ToolError::from(CasinoError::VrfCost("x".into())).status_code(), 502);
        assert_eq!(ToolError::from(CasinoError::UnsupportedChain(1)).kind(), "unprocessable");
    }
}
