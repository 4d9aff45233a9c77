//! # Prometheus Metrics
//!
//! HTTP-level metrics (request counts, latency, errors) are recorded in
//! middleware, labelled by route template rather than raw URI. Step outcomes and PIN code lookups are recorded by the
//! handlers. The pending step-order gauge is refreshed on each `/metrics`
//! scrape (pull model), see the metrics handler in `lib.rs`.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;
use prometheus::{
    core::Collector, Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts,
    Registry, TextEncoder,
};

/// Shared metrics state backed by a per-instance Prometheus registry.
#[derive(Clone)]
pub struct ApiMetrics {
    inner: Arc<Inner>,
}

struct Inner {
    registry: Registry,

    // -- HTTP middleware metrics (push model) --
    http_requests_total: IntCounterVec,
    http_request_duration_seconds: HistogramVec,
    http_errors_total: IntCounterVec,

    // -- Domain metrics --
    step_outcomes_total: IntCounterVec,
    pincode_lookups_total: IntCounterVec,
    pending_submissions: IntGauge,
}

impl std::fmt::Debug for ApiMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiMetrics")
            .field("requests", &self.requests())
            .field("errors", &self.errors())
            .finish()
    }
}

impl ApiMetrics {
    /// Create a new metrics instance with a fresh Prometheus registry.
    ///
    /// # Errors
    ///
    /// Returns the Prometheus error if a metric definition is rejected.
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total = IntCounterVec::new(
            Opts::new("udyam_http_requests_total", "Total HTTP requests"),
            &["method", "path", "status"],
        )?;

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "udyam_http_request_duration_seconds",
                "HTTP request duration in seconds",
            )
            .buckets(vec![
                0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ]),
            &["method", "path"],
        )?;

        let http_errors_total = IntCounterVec::new(
            Opts::new("udyam_http_errors_total", "Total HTTP errors (4xx and 5xx)"),
            &["method", "path", "status"],
        )?;

        let step_outcomes_total = IntCounterVec::new(
            Opts::new("udyam_step_outcomes_total", "Wizard step submissions by outcome"),
            &["step", "outcome"],
        )?;

        let pincode_lookups_total = IntCounterVec::new(
            Opts::new("udyam_pincode_lookups_total", "PIN code lookups by outcome"),
            &["outcome"],
        )?;

        let pending_submissions = IntGauge::new(
            "udyam_pending_submissions",
            "Submissions that passed step 1 and await step 2",
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(http_errors_total.clone()))?;
        registry.register(Box::new(step_outcomes_total.clone()))?;
        registry.register(Box::new(pincode_lookups_total.clone()))?;
        registry.register(Box::new(pending_submissions.clone()))?;

        Ok(Self {
            inner: Arc::new(Inner {
                registry,
                http_requests_total,
                http_request_duration_seconds,
                http_errors_total,
                step_outcomes_total,
                pincode_lookups_total,
                pending_submissions,
            }),
        })
    }

    /// Total request count (sum across all labels).
    pub fn requests(&self) -> u64 {
        sum_counter(&self.inner.http_requests_total)
    }

    /// Total error count (sum across all labels).
    pub fn errors(&self) -> u64 {
        sum_counter(&self.inner.http_errors_total)
    }

    /// Count of step submissions with the given step and outcome.
    pub fn step_outcomes(&self, step: &str, outcome: &str) -> u64 {
        self.inner
            .step_outcomes_total
            .with_label_values(&[step, outcome])
            .get()
    }

    /// Count of PIN code lookups with the given outcome.
    pub fn pincode_lookups(&self, outcome: &str) -> u64 {
        self.inner
            .pincode_lookups_total
            .with_label_values(&[outcome])
            .get()
    }

    /// Record an HTTP request (called by the middleware).
    fn record_request(&self, method: &str, path: &str, status: u16, duration_secs: f64) {
        let status_str = status.to_string();
        self.inner
            .http_requests_total
            .with_label_values(&[method, path, &status_str])
            .inc();

        self.inner
            .http_request_duration_seconds
            .with_label_values(&[method, path])
            .observe(duration_secs);

        if status >= 400 {
            self.inner
                .http_errors_total
                .with_label_values(&[method, path, &status_str])
                .inc();
        }
    }

    /// Record a wizard step outcome.
    pub fn record_step(&self, step: &str, outcome: &str) {
        self.inner
            .step_outcomes_total
            .with_label_values(&[step, outcome])
            .inc();
    }

    /// Record a PIN code lookup outcome.
    pub fn record_lookup(&self, outcome: &str) {
        self.inner
            .pincode_lookups_total
            .with_label_values(&[outcome])
            .inc();
    }

    /// Set the pending-submissions gauge.
    pub fn set_pending_submissions(&self, count: usize) {
        self.inner
            .pending_submissions
            .set(i64::try_from(count).unwrap_or(i64::MAX));
    }

    /// Gather all metrics and encode to Prometheus text format.
    pub fn gather_and_encode(&self) -> Result<String, String> {
        let encoder = TextEncoder::new();
        let metric_families = self.inner.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|e| format!("failed to encode metrics: {e}"))?;
        String::from_utf8(buffer).map_err(|e| format!("metrics encoding produced invalid UTF-8: {e}"))
    }
}

fn sum_counter(counter: &IntCounterVec) -> u64 {
    counter
        .collect()
        .iter()
        .flat_map(|mf| mf.get_metric())
        .map(|m| m.get_counter().get_value() as u64)
        .sum()
}

/// Path label for requests that matched no route.
pub const UNMATCHED_PATH: &str = "unmatched";

/// Metric label for a request path.
///
/// Uses the route template (`/api/pincode/{pin}`) so every PIN code shares
/// one series. Requests that hit no route all share [`UNMATCHED_PATH`].
fn path_label(matched: Option<&MatchedPath>) -> String {
    matched.map_or_else(|| UNMATCHED_PATH.to_string(), |m| m.as_str().to_string())
}

/// Middleware that records HTTP request metrics via Prometheus.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let metrics = request.extensions().get::<ApiMetrics>().cloned();
    let method = request.method().to_string();
    let path = path_label(request.extensions().get::<MatchedPath>());
    let start = Instant::now();

    let response = next.run(request).await;

    if let Some(m) = metrics {
        let duration = start.elapsed().as_secs_f64();
        let status = response.status().as_u16();
        m.record_request(&method, &path, status, duration);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics() -> ApiMetrics {
        ApiMetrics::new().unwrap()
    }

    #[test]
    fn api_metrics_new_starts_at_zero() {
        let m = metrics();
        assert_eq!(m.requests(), 0);
        assert_eq!(m.errors(), 0);
    }

    #[test]
    fn separate_instances_do_not_share_registries() {
        let a = metrics();
        let b = metrics();
        a.record_request("GET", "/api/test", 200, 0.01);
        assert_eq!(a.requests(), 1);
        assert_eq!(b.requests(), 0);
    }

    #[test]
    fn request_and_error_counts_independent() {
        let m = metrics();
        for _ in 0..5 {
            m.record_request("GET", "/api/form-schema", 200, 0.01);
        }
        m.record_request("POST", "/api/validate-step1", 400, 0.05);
        m.record_request("GET", "/api/pincode/{pin}", 500, 0.1);
        assert_eq!(m.requests(), 7);
        assert_eq!(m.errors(), 2);
    }

    #[test]
    fn clone_shares_underlying_counters() {
        let m = metrics();
        let clone = m.clone();

        m.record_request("GET", "/api/test", 200, 0.01);
        assert_eq!(clone.requests(), 1, "clone should see the same counter");

        clone.record_request("GET", "/api/test", 500, 0.01);
        assert_eq!(m.errors(), 1, "original should see clone's increment");
    }

    #[test]
    fn domain_counters_are_labelled() {
        let m = metrics();
        m.record_step("1", "accepted");
        m.record_step("1", "accepted");
        m.record_step("1", "business_rule_failed");
        m.record_lookup("found");
        assert_eq!(m.step_outcomes("1", "accepted"), 2);
        assert_eq!(m.step_outcomes("1", "business_rule_failed"), 1);
        assert_eq!(m.step_outcomes("2", "accepted"), 0);
        assert_eq!(m.pincode_lookups("found"), 1);
    }

    #[test]
    fn gather_and_encode_produces_text() {
        let m = metrics();
        m.record_request("GET", "/api/test", 200, 0.01);
        m.record_step("2", "accepted");
        m.set_pending_submissions(3);
        let output = m.gather_and_encode().unwrap();
        assert!(output.contains("udyam_http_requests_total"));
        assert!(output.contains("udyam_http_request_duration_seconds"));
        assert!(output.contains("udyam_step_outcomes_total"));
        assert!(output.contains("udyam_pending_submissions 3"));
    }

    #[test]
    fn path_label_without_route_is_fixed() {
        assert_eq!(path_label(None), UNMATCHED_PATH);
    }

    #[tokio::test]
    async fn middleware_labels_by_route_template() {
        use axum::body::Body;
        use axum::http::Request;
        use axum::routing::get;
        use axum::{Extension, Router};
        use tower::ServiceExt;

        let m = metrics();
        let app = Router::new()
            .route("/api/pincode/{pin}", get(|| async { "ok" }))
            .layer(axum::middleware::from_fn(metrics_middleware))
            .layer(Extension(m.clone()));

        for uri in ["/api/pincode/110001", "/api/pincode/400001", "/scan/1", "/scan/2"] {
            let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
            app.clone().oneshot(request).await.unwrap();
        }

        let count = |path: &str, status: &str| {
            m.inner
                .http_requests_total
                .with_label_values(&["GET", path, status])
                .get()
        };
        assert_eq!(count("/api/pincode/{pin}", "200"), 2);
        assert_eq!(count(UNMATCHED_PATH, "404"), 2);

        let output = m.gather_and_encode().unwrap();
        assert!(!output.contains("110001"));
        assert!(!output.contains("/scan/"));
    }
}
