//! BetSwirl casino tools for agent runtimes.

pub mod blockchain;
pub mod casino;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod tools;

pub use config::AppConfig;
pub use http::HttpServer;
pub use tools::{BetSwirlPlugin, Tool, ToolRegistry};
