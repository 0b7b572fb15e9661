//! Client-wide and per-call configuration.

use reqwest::Method;
use serde_json::Value;

use crate::{redact::RedactionRules, retry::RetryRoute};

/// Configures timeout, retry routing and redaction for a client.
///
/// Built once, read-only afterwards; concurrent calls share it without
/// synchronization.
#[derive(Clone, Debug)]
pub struct ClientOptions {
    /// Per-request timeout in milliseconds. The default is sized for
    /// long-running generation backends.
    pub timeout_ms: u64,
    /// Routes whose retry limits are seeded by default, and which opt
    /// non-idempotent methods into retry.
    pub retry_routes: Vec<RetryRoute>,
    /// Retry limit seeded onto whitelisted routes.
    pub route_retry_limit: u32,
    /// Backoff base in milliseconds seeded onto outgoing requests.
    pub route_retry_delay_ms: u64,
    /// Key denylists applied before anything reaches the log.
    pub redaction: RedactionRules,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_ms: 600_000,
            retry_routes: vec![
                RetryRoute::new(Method::GET, "/ai-configs"),
                RetryRoute::new(Method::POST, "/ai/optimize-prompt"),
            ],
            route_retry_limit: 2,
            route_retry_delay_ms: 300,
            redaction: RedactionRules::default(),
        }
    }
}

/// Per-call overrides passed to the `*_with` client methods.
#[derive(Clone, Debug, Default)]
pub struct RequestConfig {
    /// Flat query parameter mapping (a JSON object).
    pub params: Option<Value>,
    /// Extra headers for this call.
    pub headers: Vec<(String, String)>,
    /// Explicit retry limit; wins over route seeding.
    pub retry_limit: Option<u32>,
    /// Explicit backoff base in milliseconds; wins over route seeding.
    pub retry_delay_base_ms: Option<u64>,
}

impl RequestConfig {
    pub fn with_params(mut self, params: Value) -> Self {
        self.params = Some(params);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_retry(mut self, limit: u32, delay_base_ms: u64) -> Self {
        self.retry_limit = Some(limit);
        self.retry_delay_base_ms = Some(delay_base_ms);
        self
    }
}
