use std::time::Duration;

use reqwest::{header, Method};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio::time::sleep;

use crate::{
    context::{assign_request_id, RequestContext},
    diag,
    envelope::{error_message_from_body, unwrap_envelope},
    normalize::normalize_error_message,
    retry::RetryPolicy,
    ClientOptions, PropStageError, RequestConfig, Result,
};

/// HTTP client for the PropStage production API.
///
/// Every call gets a correlation id, redacted structured diagnostics, and
/// per-route retry with linear backoff; responses are unwrapped from the
/// uniform `{success, data, error}` envelope before the caller sees them.
///
/// The client is a plain value: construct it once from [`ClientOptions`] and
/// hand clones to callers. Configuration is read-only after construction, so
/// concurrent calls share nothing mutable.
#[derive(Clone, Debug)]
pub struct PropStageClient {
    http: reqwest::Client,
    base_url: String,
    options: ClientOptions,
    retry: RetryPolicy,
}

impl PropStageClient {
    /// Creates a client rooted at the given API base URL.
    ///
    /// Example: `PropStageClient::new("http://localhost:8080/api/v1")`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let options = ClientOptions::default();
        let retry = policy_from(&options);
        Self {
            http: reqwest::Client::new(),
            base_url: trim_base_url(base_url.into()),
            options,
            retry,
        }
    }

    /// Applies client options such as timeout, retry routes and redaction.
    pub fn with_options(mut self, options: ClientOptions) -> Self {
        self.retry = policy_from(&options);
        self.options = options;
        self
    }

    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        self.get_with(url, RequestConfig::default()).await
    }

    pub async fn get_with<T: DeserializeOwned>(&self, url: &str, config: RequestConfig) -> Result<T> {
        self.request(Method::GET, url, None, config).await
    }

    pub async fn post<T, B>(&self, url: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.post_with(url, body, RequestConfig::default()).await
    }

    pub async fn post_with<T, B>(&self, url: &str, body: &B, config: RequestConfig) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, url, Some(encode_body(body)?), config)
            .await
    }

    pub async fn put<T, B>(&self, url: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.put_with(url, body, RequestConfig::default()).await
    }

    pub async fn put_with<T, B>(&self, url: &str, body: &B, config: RequestConfig) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PUT, url, Some(encode_body(body)?), config)
            .await
    }

    pub async fn patch<T, B>(&self, url: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.patch_with(url, body, RequestConfig::default()).await
    }

    pub async fn patch_with<T, B>(&self, url: &str, body: &B, config: RequestConfig) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PATCH, url, Some(encode_body(body)?), config)
            .await
    }

    pub async fn delete<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        self.delete_with(url, RequestConfig::default()).await
    }

    pub async fn delete_with<T: DeserializeOwned>(
        &self,
        url: &str,
        config: RequestConfig,
    ) -> Result<T> {
        self.request(Method::DELETE, url, None, config).await
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        body: Option<Value>,
        config: RequestConfig,
    ) -> Result<T> {
        let mut ctx = RequestContext::new(method, self.base_url.clone(), url);
        ctx.headers = config.headers;
        ctx.params = config.params.unwrap_or(Value::Null);
        ctx.body = body.unwrap_or(Value::Null);
        assign_request_id(&mut ctx);
        self.retry
            .seed_route_defaults(&mut ctx, config.retry_limit, config.retry_delay_base_ms);

        let value = self.dispatch(ctx).await?;
        serde_json::from_value(value)
            .map_err(|err| PropStageError::Decode(format!("unexpected payload shape: {err}")))
    }

    /// Runs the attempt loop for one logical call.
    ///
    /// The context is owned here and re-passed around the loop; each retry
    /// increments its counter, sleeps the linear backoff delay, and re-issues
    /// the same request with the same correlation id.
    async fn dispatch(&self, mut ctx: RequestContext) -> Result<Value> {
        loop {
            diag::log_request(&ctx, &self.options.redaction);

            let mut request = self
                .http
                .request(ctx.method.clone(), ctx.full_url())
                .timeout(Duration::from_millis(self.options.timeout_ms))
                .header(header::CONTENT_TYPE, "application/json");
            for (name, value) in &ctx.headers {
                request = request.header(name.as_str(), value.as_str());
            }
            if !ctx.params.is_null() {
                request = request.query(&ctx.params);
            }
            if !ctx.body.is_null() {
                request = request.json(&ctx.body);
            }

            let response = match request.send().await {
                Ok(response) => response,
                Err(err) => {
                    let raw_message = err.to_string();
                    diag::log_error(&ctx, None, None, None, &raw_message, &self.options.redaction);
                    if self.may_retry(&ctx, None) {
                        self.back_off(&mut ctx).await;
                        continue;
                    }
                    let message = normalize_error_message(&raw_message);
                    return Err(if ctx.retry_count > 0 {
                        PropStageError::RetryExhausted {
                            attempts: ctx.retry_count,
                            message,
                        }
                    } else {
                        PropStageError::Transport {
                            message,
                            source: Some(err),
                        }
                    });
                }
            };

            let status = response.status();
            let response_headers = header_pairs(response.headers());
            let body = match response.text().await {
                Ok(body) => body,
                Err(err) => {
                    // Losing the body mid-read is a transport failure like
                    // any other, even though a status line arrived.
                    let raw_message = err.to_string();
                    diag::log_error(
                        &ctx,
                        Some(status.as_u16()),
                        Some(&response_headers),
                        None,
                        &raw_message,
                        &self.options.redaction,
                    );
                    if self.may_retry(&ctx, None) {
                        self.back_off(&mut ctx).await;
                        continue;
                    }
                    let message = normalize_error_message(&raw_message);
                    return Err(if ctx.retry_count > 0 {
                        PropStageError::RetryExhausted {
                            attempts: ctx.retry_count,
                            message,
                        }
                    } else {
                        PropStageError::Transport {
                            message,
                            source: Some(err),
                        }
                    });
                }
            };

            if status.is_success() {
                let data: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
                diag::log_response(
                    &ctx,
                    status.as_u16(),
                    &response_headers,
                    &data,
                    &self.options.redaction,
                );
                // A 2xx response can still carry a failure envelope; that
                // path rejects without retry, presentation is up to callers.
                return unwrap_envelope(&body);
            }

            let raw_message = error_message_from_body(&body).unwrap_or_else(|| {
                format!("request failed with status code {}", status.as_u16())
            });
            let data: Value =
                serde_json::from_str(&body).unwrap_or_else(|_| Value::String(body.clone()));
            diag::log_error(
                &ctx,
                Some(status.as_u16()),
                Some(&response_headers),
                Some(&data),
                &raw_message,
                &self.options.redaction,
            );

            if self.may_retry(&ctx, Some(status.as_u16())) {
                self.back_off(&mut ctx).await;
                continue;
            }

            let message = normalize_error_message(&raw_message);
            return Err(if ctx.retry_count > 0 {
                PropStageError::RetryExhausted {
                    attempts: ctx.retry_count,
                    message,
                }
            } else {
                PropStageError::Http {
                    status: status.as_u16(),
                    message,
                }
            });
        }
    }

    fn may_retry(&self, ctx: &RequestContext, status: Option<u16>) -> bool {
        self.retry.should_retry(&ctx.method, &ctx.url, status) && ctx.retry_count < ctx.retry_limit
    }

    async fn back_off(&self, ctx: &mut RequestContext) {
        ctx.retry_count += 1;
        let delay_ms = RetryPolicy::next_delay_ms(ctx);
        tracing::debug!(
            request_id = %ctx.id,
            attempt = ctx.retry_count,
            delay_ms,
            "retrying request"
        );
        sleep(Duration::from_millis(delay_ms)).await;
    }
}

fn policy_from(options: &ClientOptions) -> RetryPolicy {
    RetryPolicy::new(
        options.retry_routes.clone(),
        options.route_retry_limit,
        options.route_retry_delay_ms,
    )
}

fn trim_base_url(base_url: String) -> String {
    base_url.trim_end_matches('/').to_owned()
}

fn encode_body<B: Serialize + ?Sized>(body: &B) -> Result<Value> {
    serde_json::to_value(body)
        .map_err(|err| PropStageError::Decode(format!("failed to encode request body: {err}")))
}

fn header_pairs(headers: &header::HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_owned(),
                value.to_str().unwrap_or("<binary>").to_owned(),
            )
        })
        .collect()
}
