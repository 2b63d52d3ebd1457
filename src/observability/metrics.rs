//! Metrics collection and exposition.
//!
//! # Metrics
//! - `betswirl_tool_calls_total` (counter): tool invocations by tool, status
//! - `betswirl_tool_call_duration_seconds` (histogram): tool latency by tool
//! - `betswirl_bets_placed_total` (counter): wagers broadcast by game, chain
//! - `betswirl_rpc_health` (gauge): 1=healthy, 0=unhealthy
//!
//! Without an installed recorder every call here is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one tool invocation.
pub fn record_tool_call(tool: &str, status: &'static str, start: Instant) {
    ::metrics::counter!(
        "betswirl_tool_calls_total",
        "tool" => tool.to_string(),
        "status" => status
    )
    .increment(1);
    ::metrics::histogram!("betswirl_tool_call_duration_seconds", "tool" => tool.to_string())
        .record(start.elapsed().as_secs_f64());
}

/// Record a wager accepted by the node.
pub fn record_bet_placed(game: &'static str, chain_id: u64) {
    ::metrics::counter!(
        "betswirl_bets_placed_total",
        "game" => game,
        "chain_id" => chain_id.to_string()
    )
    .increment(1);
}

pub fn record_rpc_health(healthy: bool) {
    ::metrics::gauge!("betswirl_rpc_health").set(if healthy { 1.0 } else { 0.0 });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_without_recorder() {
        record_tool_call("betswirl.dice", "ok", Instant::now());
        record_bet_placed("dice", 137);
        record_rpc_health(false);
    }
}
