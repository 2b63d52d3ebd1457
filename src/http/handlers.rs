//! Request handlers.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::http::server::AppState;
use crate::tools::{ToolDefinition, ToolError};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
    pub chain_id: u64,
    pub wallet: String,
    pub tools: usize,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        chain_id: state.chain_id,
        wallet: state.wallet_address.clone(),
        tools: state.tools.len(),
    })
}

pub async fn list_tools(State(state): State<AppState>) -> Json<Vec<ToolDefinition>> {
    Json(state.tools.definitions())
}

/// `POST /tools/{name}`: the body is the argument object; an empty body means no arguments.
pub async fn call_tool(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Bytes,
) -> Response {
    let args = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Null
    } else {
        match serde_json::from_slice::<Value>(&body) {
            Ok(args) => args,
            Err(e) => {
                return ApiError(ToolError::InvalidParameters(format!("malformed JSON body: {e}")))
                    .into_response()
            }
        }
    };

    match state.tools.call(&name, args).await {
        Ok(result) => Json(json!({ "tool": name, "result": result })).into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}

/// A tool error rendered as a JSON error body.
pub struct ApiError(pub ToolError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = json!({
            "error": {
                "kind": self.0.kind(),
                "message": self.0.to_string(),
            }
        });
        (status, Json(body)).into_response()
    }
}
