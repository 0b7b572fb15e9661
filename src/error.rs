/// Error type returned by this crate.
///
/// The `Display` text of every variant is the normalized, user-presentable
/// message. Raw diagnostic detail (status lines, response headers, bodies) is
/// only ever written to the diagnostic log records, never carried here.
#[derive(Debug, thiserror::Error)]
pub enum PropStageError {
    /// No HTTP response was obtained (DNS failure, connection refused,
    /// timeout).
    #[error("{message}")]
    Transport {
        /// Normalized message derived from the transport error text.
        message: String,
        /// Underlying `reqwest` error, when one exists.
        #[source]
        source: Option<reqwest::Error>,
    },
    /// Non-2xx HTTP status without a `success = false` envelope body.
    #[error("{message}")]
    Http {
        /// HTTP status code of the failing response.
        status: u16,
        /// Normalized message, sourced from the envelope error when present.
        message: String,
    },
    /// `success = false` envelope returned by the backend.
    #[error("{message}")]
    Application {
        /// Normalized message sourced from the envelope's `error.message`.
        message: String,
        /// Optional backend-specific error code.
        code: Option<String>,
    },
    /// A retry-eligible failure whose attempt count reached its limit.
    #[error("{message}")]
    RetryExhausted {
        /// Retries performed after the initial attempt.
        attempts: u32,
        /// Normalized message of the final failing attempt.
        message: String,
    },
    /// Response decoding or envelope-shape validation error.
    #[error("decode error: {0}")]
    Decode(String),
}
