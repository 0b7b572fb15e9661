//! Per-route retry eligibility and backoff.

use reqwest::Method;

use crate::context::RequestContext;

/// A `(method, path fragment)` pair whitelisted for retry.
///
/// Idempotent methods (GET/HEAD/OPTIONS) are always eligible; the whitelist
/// exists to opt specific non-idempotent routes in, and to mark which routes
/// get retry limits seeded by default.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryRoute {
    pub method: Method,
    /// Substring matched against the relative request path.
    pub path_fragment: String,
}

impl RetryRoute {
    pub fn new(method: Method, path_fragment: impl Into<String>) -> Self {
        Self {
            method,
            path_fragment: path_fragment.into(),
        }
    }

    fn matches(&self, method: &Method, url: &str) -> bool {
        self.method == *method && url.contains(self.path_fragment.as_str())
    }
}

/// Decides whether a failed attempt may be retried and with what delay.
#[derive(Clone, Debug)]
pub struct RetryPolicy {
    routes: Vec<RetryRoute>,
    route_retry_limit: u32,
    route_retry_delay_ms: u64,
}

impl RetryPolicy {
    pub fn new(routes: Vec<RetryRoute>, route_retry_limit: u32, route_retry_delay_ms: u64) -> Self {
        Self {
            routes,
            route_retry_limit,
            route_retry_delay_ms,
        }
    }

    fn is_whitelisted(&self, method: &Method, url: &str) -> bool {
        self.routes.iter().any(|route| route.matches(method, url))
    }

    /// Seeds the context's retry limit and delay base for known-retryable
    /// routes, unless the caller already set explicit values.
    ///
    /// Runs once, at outgoing time. Routes outside the whitelist keep the
    /// zero limit they start with.
    pub fn seed_route_defaults(
        &self,
        ctx: &mut RequestContext,
        explicit_limit: Option<u32>,
        explicit_delay_ms: Option<u64>,
    ) {
        let whitelisted = self.is_whitelisted(&ctx.method, &ctx.url);
        ctx.retry_limit = explicit_limit.unwrap_or(if whitelisted {
            self.route_retry_limit
        } else {
            0
        });
        ctx.retry_delay_base_ms = explicit_delay_ms.unwrap_or(self.route_retry_delay_ms);
    }

    /// Whether a failure with the given status (None for pure transport
    /// failures) is retry-eligible on this route.
    ///
    /// Client errors (4xx) are never retried, whitelisted or not.
    pub fn should_retry(&self, method: &Method, url: &str, status: Option<u16>) -> bool {
        let idempotent =
            *method == Method::GET || *method == Method::HEAD || *method == Method::OPTIONS;
        let route_allowed = idempotent || self.is_whitelisted(method, url);
        let failure_retryable = match status {
            None => true,
            Some(code) => code >= 500,
        };
        route_allowed && failure_retryable
    }

    /// Delay before the context's Nth retry, N 1-indexed.
    ///
    /// Deliberately linear (`base × N`), not exponential: the backend's
    /// long-running generation routes make doubling delays pile up fast.
    pub fn next_delay_ms(ctx: &RequestContext) -> u64 {
        ctx.retry_delay_base_ms.saturating_mul(ctx.retry_count as u64)
    }
}
