//! Per-call request state, owned and re-passed across retry attempts.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::{distributions::Alphanumeric, Rng};
use reqwest::Method;
use serde_json::Value;

/// Header carrying the correlation id to the backend.
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// State of one logical call.
///
/// Created once at the client façade boundary and threaded by value through
/// every retry attempt, so retry bookkeeping is explicit rather than hidden
/// shared state. Discarded when the call settles.
#[derive(Clone, Debug)]
pub struct RequestContext {
    /// Correlation id, assigned once and stable across retries.
    pub id: String,
    pub method: Method,
    /// Path relative to the client's base URL.
    pub url: String,
    pub base_url: String,
    pub headers: Vec<(String, String)>,
    /// Flat query parameter mapping, `Value::Null` when absent.
    pub params: Value,
    /// JSON request body, `Value::Null` when absent.
    pub body: Value,
    /// Maximum additional attempts after the first.
    pub retry_limit: u32,
    pub retry_delay_base_ms: u64,
    /// Retries already performed; always `<= retry_limit`.
    pub retry_count: u32,
    /// Wall-clock millis of the first attempt, used only for duration logging.
    pub started_at_ms: u64,
}

impl RequestContext {
    pub fn new(method: Method, base_url: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            method,
            url: url.into(),
            base_url: base_url.into(),
            headers: Vec::new(),
            params: Value::Null,
            body: Value::Null,
            retry_limit: 0,
            retry_delay_base_ms: 0,
            retry_count: 0,
            started_at_ms: now_ms(),
        }
    }

    /// Absolute URL the request is sent to.
    pub fn full_url(&self) -> String {
        format!("{}{}", self.base_url, self.url)
    }

    /// Milliseconds elapsed since the first attempt.
    pub fn elapsed_ms(&self) -> u64 {
        now_ms().saturating_sub(self.started_at_ms)
    }
}

/// Assigns a correlation id if the context does not have one yet.
///
/// Idempotent: retries of the same logical call keep their id. Also injects
/// the [`REQUEST_ID_HEADER`] so the id travels with the request and shows up
/// in logged headers.
pub fn assign_request_id(ctx: &mut RequestContext) {
    if ctx.id.is_empty() {
        ctx.id = new_request_id();
    }
    let already_set = ctx
        .headers
        .iter()
        .any(|(name, _)| name.eq_ignore_ascii_case(REQUEST_ID_HEADER));
    if !already_set {
        ctx.headers
            .push((REQUEST_ID_HEADER.to_owned(), ctx.id.clone()));
    }
}

/// Builds a `<epoch millis>-<random suffix>` identifier, unique with
/// overwhelming probability across the process lifetime.
fn new_request_id() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(char::from)
        .collect();
    format!("{}-{}", now_ms(), suffix)
}

pub(crate) fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}
