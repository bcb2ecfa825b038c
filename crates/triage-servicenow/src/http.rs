//! Response decoding for Table API calls.
//!
//! Every call funnels its response through [`into_json`]: a 2xx body is
//! decoded, a 429 becomes [`ServiceNowError::RateLimited`], and anything
//! else becomes [`ServiceNowError::Api`] carrying the raw body so the
//! caller can log exactly what the instance said.

use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::ServiceNowError;

const DEFAULT_RETRY_SECS: u64 = 60;
const BODY_SNIPPET: usize = 120;

/// Decode a response body as `T`, mapping failure statuses to errors.
pub async fn into_json<T: DeserializeOwned>(resp: Response) -> Result<T, ServiceNowError> {
    let status = resp.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(ServiceNowError::RateLimited {
            retry_after_secs: retry_after(resp.headers()),
        });
    }

    let body = resp.text().await?;
    if !status.is_success() {
        return Err(ServiceNowError::Api {
            status: status.as_u16(),
            body,
        });
    }

    serde_json::from_str(&body)
        .map_err(|e| ServiceNowError::Parse(format!("{e} (body starts: {})", snippet(&body))))
}

/// `Retry-After` in whole seconds. HTTP-date values are not honoured.
fn retry_after(headers: &HeaderMap) -> u64 {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(DEFAULT_RETRY_SECS)
}

fn snippet(body: &str) -> String {
    body.chars().take(BODY_SNIPPET).collect()
}
