//! HTTP surface for the host agent runtime.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing, timeout, body limit)
//!     → handlers.rs (health, tool listing, tool calls)
//!     → tools::ToolRegistry
//!     → JSON response
//! ```

pub mod handlers;
pub mod server;

pub use server::{AppState, HttpServer, X_REQUEST_ID};
