//! HTTP client shared by the cloud speech services

use std::time::Duration;

use crate::Result;

/// Upper bound on a single STT or TTS request, including the response body
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Bound on establishing the connection
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Build a client whose requests fail after `timeout`
///
/// # Errors
///
/// Returns error if the TLS backend cannot be initialized
pub fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(CONNECT_TIMEOUT.min(timeout))
        .build()?;
    Ok(client)
}
