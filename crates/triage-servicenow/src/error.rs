use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceNowError {
    /// Connection, TLS or timeout failure before a response arrived.
    #[error("request to ServiceNow failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The instance answered with a non-2xx status.
    #[error("ServiceNow returned {status}: {body}")]
    Api { status: u16, body: String },

    /// A 2xx body that is not the expected JSON shape.
    #[error("unexpected response body: {0}")]
    Parse(String),

    /// HTTP 429. The delay comes from `Retry-After` when the instance sends it.
    #[error("ServiceNow throttled the request (retry in {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },
}
