//! Prometheus Metrics Module
//!
//! Application-wide metrics collection.
//!
//! # Metrics Collected
//! - Active WebSocket connection gauge
//! - Messages fanned out to rooms
//! - Voice signaling events relayed

use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounter, IntGauge, Opts, Registry, TextEncoder};

/// Global metrics registry
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// Active WebSocket connections gauge
pub static WS_CONNECTIONS_ACTIVE: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::with_opts(
        Opts::new(
            "ws_connections_active",
            "Number of active WebSocket connections",
        )
        .namespace("parley"),
    )
    .expect("Failed to create WS_CONNECTIONS_ACTIVE metric")
});

/// Messages delivered through the fan-out engine
pub static MESSAGES_DELIVERED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::with_opts(
        Opts::new(
            "messages_delivered_total",
            "Total number of messages fanned out to rooms",
        )
        .namespace("parley"),
    )
    .expect("Failed to create MESSAGES_DELIVERED_TOTAL metric")
});

/// Voice signaling events relayed between peers
pub static VOICE_SIGNALS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::with_opts(
        Opts::new(
            "voice_signals_total",
            "Total number of voice signaling events relayed",
        )
        .namespace("parley"),
    )
    .expect("Failed to create VOICE_SIGNALS_TOTAL metric")
});

/// Register all metrics with the registry
fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(WS_CONNECTIONS_ACTIVE.clone()))
        .expect("Failed to register WS_CONNECTIONS_ACTIVE");
    registry
        .register(Box::new(MESSAGES_DELIVERED_TOTAL.clone()))
        .expect("Failed to register MESSAGES_DELIVERED_TOTAL");
    registry
        .register(Box::new(VOICE_SIGNALS_TOTAL.clone()))
        .expect("Failed to register VOICE_SIGNALS_TOTAL");
}

/// Render all registered metrics in the Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gather_metrics_includes_registered_families() {
        WS_CONNECTIONS_ACTIVE.set(0);
        let output = gather_metrics();

        assert!(output.contains("parley_ws_connections_active"));
    }
}
