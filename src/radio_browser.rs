use crate::http::{build_client, read_limited, MAX_BODY_BYTES};
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Radio Browser is only consulted for what the directory API lacks:
/// a favicon when a station has no logo, and a stream address when the
/// record carries none.
#[derive(Debug, Clone)]
pub struct RadioBrowserClient {
    http: reqwest::Client,
    base: String,
}

#[derive(Debug, Deserialize)]
struct RbStation {
    #[serde(default)]
    favicon: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UrlResponse {
    url: String,
}

impl RadioBrowserClient {
    pub fn new(base: &str, timeout: Duration) -> Result<Self> {
        Url::parse(base).with_context(|| format!("Invalid Radio Browser URL: {base}"))?;
        Ok(Self {
            http: build_client(timeout, false)?,
            base: base.trim_end_matches('/').to_string(),
        })
    }

    pub async fn favicon(&self, stationuuid: &str) -> Result<Option<String>> {
        let mut url = Url::parse(&format!("{}/json/stations/search", self.base))
            .context("Invalid Radio Browser base URL")?;
        url.query_pairs_mut()
            .append_pair("limit", "1")
            .append_pair("byuuid", stationuuid);
        debug!(%url, "GET favicon");
        let resp = self.http.get(url).send().await.context("Favicon lookup failed")?;
        if !resp.status().is_success() {
            return Err(anyhow!("Favicon lookup answered {}", resp.status()));
        }
        let bytes = read_limited(resp, MAX_BODY_BYTES).await?;
        let stations: Vec<RbStation> =
            serde_json::from_slice(&bytes).context("Invalid station search response")?;
        Ok(stations
            .into_iter()
            .next()
            .and_then(|s| s.favicon)
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty()))
    }

    pub async fn resolve_station_url(&self, stationuuid: &str) -> Result<Url> {
        let stationuuid = stationuuid.trim();
        if stationuuid.is_empty() {
            return Err(anyhow!("Missing station UUID"));
        }

        let url = format!("{}/json/url/{}", self.base, urlencoding::encode(stationuuid));
        debug!(%url, "GET stream url");
        let resp = self.http.get(&url).send().await.context("Stream lookup failed")?;
        if resp.status().is_redirection() {
            if let Some(loc) = resp.headers().get(reqwest::header::LOCATION) {
                let loc = loc.to_str().context("Invalid redirect Location header")?;
                return parse_stream_url(loc);
            }
        }
        if !resp.status().is_success() {
            return Err(anyhow!("Stream lookup answered {}", resp.status()));
        }
        let bytes = read_limited(resp, 64 * 1024).await?;
        let text = String::from_utf8_lossy(&bytes);
        if let Ok(json) = serde_json::from_str::<UrlResponse>(&text) {
            return parse_stream_url(&json.url);
        }
        parse_stream_url(text.trim())
    }
}

pub fn parse_stream_url(s: &str) -> Result<Url> {
    let url = Url::parse(s.trim()).context("Invalid stream URL")?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(anyhow!("Unsupported stream URL scheme: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> RadioBrowserClient {
        RadioBrowserClient::new(&server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn validates_stream_url_schemes() {
        assert!(parse_stream_url("https://example.com/stream").is_ok());
        assert!(parse_stream_url("http://example.com/stream").is_ok());
        assert!(parse_stream_url("file:///etc/passwd").is_err());
        assert!(parse_stream_url("").is_err());
    }

    #[tokio::test]
    async fn finds_favicon() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json/stations/search"))
            .and(query_param("byuuid", "u1"))
            .and(query_param("limit", "1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([{"favicon": "https://img.example/u1.png"}])),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/json/stations/search"))
            .and(query_param("byuuid", "u2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"favicon": ""}])))
            .mount(&server)
            .await;

        let rb = client(&server);
        assert_eq!(
            rb.favicon("u1").await.unwrap().as_deref(),
            Some("https://img.example/u1.png")
        );
        assert_eq!(rb.favicon("u2").await.unwrap(), None);
    }

    #[tokio::test]
    async fn resolves_stream_from_json_and_redirect() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json/url/u1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"ok": true, "url": "https://live.example/u1"})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/json/url/u2"))
            .respond_with(
                ResponseTemplate::new(302).insert_header("Location", "http://live.example/u2.mp3"),
            )
            .mount(&server)
            .await;

        let rb = client(&server);
        assert_eq!(
            rb.resolve_station_url("u1").await.unwrap().as_str(),
            "https://live.example/u1"
        );
        assert_eq!(
            rb.resolve_station_url("u2").await.unwrap().as_str(),
            "http://live.example/u2.mp3"
        );
        assert!(rb.resolve_station_url(" ").await.is_err());
    }
}
