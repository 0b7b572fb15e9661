//! Structured request/response/error records.
//!
//! Every attempt of a call emits one request record, and one response or
//! error record, all joined by the correlation id. Headers, params and bodies
//! go through the redactor first; the raw error message does not, since it is
//! diagnostic text rather than a credential field.

use serde_json::Value;

use crate::{
    context::RequestContext,
    redact::{redact_headers, redact_value, RedactionRules},
};

pub fn log_request(ctx: &RequestContext, rules: &RedactionRules) {
    tracing::info!(
        request_id = %ctx.id,
        url = %ctx.full_url(),
        method = %ctx.method,
        headers = %redact_headers(&ctx.headers, &rules.header_keys),
        params = %redact_value(&ctx.params, &rules.body_keys),
        data = %redact_value(&ctx.body, &rules.body_keys),
        "api request"
    );
}

pub fn log_response(
    ctx: &RequestContext,
    status: u16,
    headers: &[(String, String)],
    data: &Value,
    rules: &RedactionRules,
) {
    tracing::info!(
        request_id = %ctx.id,
        url = %ctx.full_url(),
        method = %ctx.method,
        status = u64::from(status),
        duration_ms = ctx.elapsed_ms(),
        headers = %redact_headers(headers, &rules.header_keys),
        data = %redact_value(data, &rules.body_keys),
        "api response"
    );
}

/// Duration always measures from the first attempt, so a retried call's
/// logged duration is total elapsed time, not the latest attempt alone.
pub fn log_error(
    ctx: &RequestContext,
    status: Option<u16>,
    response_headers: Option<&[(String, String)]>,
    response_data: Option<&Value>,
    message: &str,
    rules: &RedactionRules,
) {
    tracing::error!(
        request_id = %ctx.id,
        url = %ctx.full_url(),
        method = %ctx.method,
        status = status.map(u64::from),
        duration_ms = ctx.elapsed_ms(),
        response_headers = %response_headers
            .map(|headers| redact_headers(headers, &rules.header_keys))
            .unwrap_or(serde_json::Value::Null),
        response_data = %response_data
            .map(|data| redact_value(data, &rules.body_keys))
            .unwrap_or(serde_json::Value::Null),
        error = %message,
        "api error"
    );
}
