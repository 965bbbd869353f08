use anyhow::{anyhow, Context, Result};
use futures_util::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::de::DeserializeOwned;
use std::time::Duration;

pub const MAX_BODY_BYTES: usize = 2_000_000;

pub fn build_client(timeout: Duration, follow_redirects: bool) -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    headers.insert(
        USER_AGENT,
        HeaderValue::from_static("TuRadio/0.1 (+https://turadio.lat)"),
    );
    let redirect = if follow_redirects {
        reqwest::redirect::Policy::limited(5)
    } else {
        reqwest::redirect::Policy::none()
    };
    reqwest::ClientBuilder::new()
        .default_headers(headers)
        .connect_timeout(Duration::from_secs(5))
        .timeout(timeout)
        .redirect(redirect)
        .build()
        .context("Failed to build HTTP client")
}

pub async fn read_limited(resp: reqwest::Response, limit: usize) -> Result<Vec<u8>> {
    if let Some(len) = resp.content_length() {
        if len as usize > limit {
            return Err(anyhow!("HTTP response too large ({len} bytes)"));
        }
    }

    let mut data: Vec<u8> = Vec::new();
    let mut stream = resp.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.context("HTTP body read error")?;
        if data.len().saturating_add(chunk.len()) > limit {
            return Err(anyhow!("HTTP response exceeded size limit"));
        }
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}

/// Reads a successful response as JSON. Any non-2xx status is an error.
pub async fn read_json<T: DeserializeOwned>(resp: reqwest::Response, what: &str) -> Result<T> {
    let status = resp.status();
    if !status.is_success() {
        return Err(anyhow!("{what}: upstream answered {status}"));
    }
    let bytes = read_limited(resp, MAX_BODY_BYTES).await?;
    serde_json::from_slice(&bytes).with_context(|| format!("Invalid {what} response"))
}
