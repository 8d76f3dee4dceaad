//! Prometheus metrics for the feature access API (default registry).

use axum::http::StatusCode;
use once_cell::sync::Lazy;
use prometheus::{register_int_counter_vec, Encoder, IntCounterVec, TextEncoder};

pub static FEATURE_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "feature_access_requests_total",
        "Total feature access requests by operation",
        &["op"]
    )
    .expect("register feature_access_requests_total")
});

pub static FEATURE_ERRORS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "feature_access_errors_total",
        "Feature access requests answered with an error, by operation",
        &["op"]
    )
    .expect("register feature_access_errors_total")
});

/// Count one request for `op`, and one error if `ok` is false.
pub fn record_request(op: &str, ok: bool) {
    FEATURE_REQUESTS_TOTAL.with_label_values(&[op]).inc();
    if !ok {
        FEATURE_ERRORS_TOTAL.with_label_values(&[op]).inc();
    }
}

pub fn encode_metrics() -> (StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (StatusCode::OK, String::from_utf8(buffer).unwrap_or_default())
}
