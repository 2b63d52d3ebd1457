//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Config → Wallet (RPC + signer) → Chain check → Service → Tools
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Stop accepting → Drain in-flight calls → Exit
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listeners start last (traffic only when ready)

pub mod signals;
pub mod startup;

pub use signals::shutdown_signal;
pub use startup::{build_app, build_service, connect_wallet, App, StartupError};
