//! Process-wide counters plus the structured query and audit lines.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::query::QueryExpression;
use crate::types::ListingId;

pub const AUDIT_TARGET: &str = "affito::audit";
pub const METRICS_TARGET: &str = "affito::metrics";

#[derive(Default)]
pub struct Metrics {
    pub queries_total: AtomicU64,
    pub queries_slow_total: AtomicU64,
    pub post_filter_dropped_total: AtomicU64,
    pub state_updates_total: AtomicU64,
    pub state_rejections_total: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub queries_total: u64,
    pub queries_slow_total: u64,
    pub post_filter_dropped_total: u64,
    pub state_updates_total: u64,
    pub state_rejections_total: u64,
}

pub struct Telemetry {
    pub metrics: Metrics,
    slow_query_ms: AtomicU64,
}

impl Default for Telemetry {
    fn default() -> Self {
        Self { metrics: Metrics::default(), slow_query_ms: AtomicU64::new(500) }
    }
}

pub(crate) static TELEMETRY: std::sync::LazyLock<Telemetry> = std::sync::LazyLock::new(Telemetry::default);

pub fn set_slow_query_ms(ms: u64) {
    TELEMETRY.slow_query_ms.store(ms, Ordering::Relaxed);
}

fn now_ts() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

fn sha256_hex(input: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut h = Sha256::new();
    h.update(input.as_bytes());
    hex::encode(h.finalize())
}

/// Stable hash of the rendered Mongo pipeline; identical option sets hash
/// identically, so query lines can be grouped without logging caller text.
#[must_use]
pub fn pipeline_hash(expr: &QueryExpression) -> String {
    let rendered = serde_json::to_string(&expr.to_pipeline()).unwrap_or_default();
    sha256_hex(&rendered)
}

/// Record one executed query. `dropped` counts documents the post-filter removed.
pub fn log_query(op: &str, expr: &QueryExpression, returned: usize, dropped: usize, duration_ms: u128) {
    let m = &TELEMETRY.metrics;
    m.queries_total.fetch_add(1, Ordering::Relaxed);
    let dropped = u64::try_from(dropped).unwrap_or(u64::MAX);
    m.post_filter_dropped_total.fetch_add(dropped, Ordering::Relaxed);
    let duration_ms = u64::try_from(duration_ms).unwrap_or(u64::MAX);
    let slow = duration_ms >= TELEMETRY.slow_query_ms.load(Ordering::Relaxed);
    if slow {
        m.queries_slow_total.fetch_add(1, Ordering::Relaxed);
    }
    let line = serde_json::json!({
        "ts": now_ts(),
        "op": op,
        "pipeline_hash": pipeline_hash(expr),
        "returned": returned,
        "post_filter_dropped": dropped,
        "duration_ms": duration_ms,
        "slow": slow,
    })
    .to_string();
    crate::utils::devlog::record(&line);
    log::info!(target: METRICS_TARGET, "{line}");
}

/// Record one state-change attempt and its outcome (`"ok"` or the error text).
pub fn log_state_change(id: Option<ListingId>, user: Option<&str>, requested: &str, outcome: Result<(), &str>) {
    let m = &TELEMETRY.metrics;
    match outcome {
        Ok(()) => m.state_updates_total.fetch_add(1, Ordering::Relaxed),
        Err(_) => m.state_rejections_total.fetch_add(1, Ordering::Relaxed),
    };
    let line = serde_json::json!({
        "ts": now_ts(),
        "op": "set_state",
        "doc_id": id,
        "user": user,
        "requested": requested,
        "outcome": outcome.err().unwrap_or("ok"),
    })
    .to_string();
    crate::utils::devlog::record(&line);
    if outcome.is_ok() {
        log::info!(target: AUDIT_TARGET, "{line}");
    } else {
        log::warn!(target: AUDIT_TARGET, "{line}");
    }
}

#[must_use]
pub fn snapshot() -> MetricsSnapshot {
    let m = &TELEMETRY.metrics;
    MetricsSnapshot {
        queries_total: m.queries_total.load(Ordering::Relaxed),
        queries_slow_total: m.queries_slow_total.load(Ordering::Relaxed),
        post_filter_dropped_total: m.post_filter_dropped_total.load(Ordering::Relaxed),
        state_updates_total: m.state_updates_total.load(Ordering::Relaxed),
        state_rejections_total: m.state_rejections_total.load(Ordering::Relaxed),
    }
}

#[must_use]
pub fn metrics_text() -> String {
    // OpenMetrics/Prometheus exposition format (no types/HELP for brevity)
    let s = snapshot();
    format!(
        "affito_queries_total {}\n\
         affito_queries_slow_total {}\n\
         affito_post_filter_dropped_total {}\n\
         affito_state_updates_total {}\n\
         affito_state_rejections_total {}\n",
        s.queries_total,
        s.queries_slow_total,
        s.post_filter_dropped_total,
        s.state_updates_total,
        s.state_rejections_total,
    )
}
