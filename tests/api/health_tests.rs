//! Health Check API Tests
//!
//! The stateless probes are exercised directly; readiness needs a live
//! database pool and is covered by deployment smoke tests.

use parley::presentation::http::handlers::health;

#[tokio::test]
async fn test_health_check_reports_healthy() {
    let response = health::health_check().await;

    assert_eq!(response.0.status, "healthy");
    assert_eq!(response.0.version, env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_liveness_reports_alive() {
    let response = health::liveness().await;

    assert_eq!(response.0.status, "alive");
}
