//! Response handling shared by every endpoint.

use crate::error::{ClientError, Result};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::warn;

/// Classify a failed `send()`.
pub(crate) fn send_error(e: reqwest::Error) -> ClientError {
    if e.is_connect() || e.is_timeout() {
        ClientError::ServerUnreachable(e.to_string())
    } else {
        ClientError::Request(e)
    }
}

/// Turn a non-2xx response into the matching error.
pub(crate) async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let path = response.url().path().to_string();
    let retry_after = response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());
    let error_text = response.text().await.unwrap_or_default();

    match status {
        StatusCode::UNAUTHORIZED => {
            warn!(path = %path, "Request rejected: authentication required");
            Err(ClientError::AuthRequired)
        }
        StatusCode::NOT_FOUND => Err(ClientError::NotFound(path)),
        StatusCode::TOO_MANY_REQUESTS => Err(ClientError::RateLimited {
            retry_after_secs: retry_after.unwrap_or(1),
        }),
        _ => Err(ClientError::ServerError {
            status: status.as_u16(),
            message: error_text,
        }),
    }
}

/// Check the status and parse a JSON body.
pub(crate) async fn read_json<T: DeserializeOwned>(response: Response, what: &str) -> Result<T> {
    let response = check_status(response).await?;
    response
        .json()
        .await
        .map_err(|e| ClientError::ParseError(format!("Failed to parse {}: {}", what, e)))
}

/// Check the status and parse a JSON body that a mutation may leave empty.
pub(crate) async fn read_json_opt<T: DeserializeOwned>(
    response: Response,
    what: &str,
) -> Result<Option<T>> {
    let response = check_status(response).await?;
    let body = response
        .bytes()
        .await
        .map_err(|e| ClientError::ParseError(format!("Failed to read {}: {}", what, e)))?;

    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    serde_json::from_slice(&body)
        .map(Some)
        .map_err(|e| ClientError::ParseError(format!("Failed to parse {}: {}", what, e)))
}

/// Check the status of a mutation whose body (if any) is ignored.
pub(crate) async fn expect_success(response: Response) -> Result<()> {
    check_status(response).await.map(|_| ())
}
