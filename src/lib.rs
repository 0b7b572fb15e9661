//! `propstage-http` is an async HTTP client for the PropStage production API.
//!
//! The crate wraps the backend's REST surface with a resilient, observable
//! transport layer:
//! - correlation ids stable across retries ([`REQUEST_ID_HEADER`])
//! - secret redaction before anything reaches the diagnostic log
//! - per-route retry with linear backoff
//! - unwrapping of the uniform `{success, data, error}` response envelope
//! - normalization of raw failure text into actionable messages
//!
//! Entry point is [`PropStageClient`] with `get`/`post`/`put`/`patch`/`delete`.

mod client;
mod context;
mod diag;
mod envelope;
mod error;
mod normalize;
mod options;
mod redact;
mod retry;

pub use client::PropStageClient;
pub use context::{RequestContext, REQUEST_ID_HEADER};
pub use envelope::{EnvelopeError, ResponseEnvelope};
pub use error::PropStageError;
pub use normalize::{
    normalize_error_message, MSG_ADDRESS_UNRESOLVED, MSG_AUTH_FAILED, MSG_NO_ACTIVE_CONFIG,
    MSG_REQUEST_FAILED,
};
pub use options::{ClientOptions, RequestConfig};
pub use redact::{redact_value, RedactionRules, MASK};
pub use retry::{RetryPolicy, RetryRoute};

pub type Result<T> = std::result::Result<T, PropStageError>;
