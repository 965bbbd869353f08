use crate::http::{build_client, read_json};
use crate::models::{Country, Genre, SearchPage, Station};
use crate::query::{FilterState, PAGE_SIZE};
use anyhow::{anyhow, Context, Result};
use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Stations shown in the "recommended" strip of a detail page.
pub const RECOMMENDED_LIMIT: u32 = 10;

/// Client for the station directory REST API. Requests are one-shot: no
/// retries, failures go back to the caller.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: String,
}

impl ApiClient {
    pub fn new(base: &str, timeout: Duration) -> Result<Self> {
        Url::parse(base).with_context(|| format!("Invalid API base URL: {base}"))?;
        Ok(Self {
            http: build_client(timeout, true)?,
            base: base.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Url::parse(&format!("{}/{path}", self.base)).context("Invalid API endpoint URL")
    }

    pub async fn countries(&self) -> Result<Vec<Country>> {
        let url = self.endpoint("radio/paises")?;
        debug!(%url, "GET countries");
        let resp = self.http.get(url).send().await.context("Country list request failed")?;
        read_json(resp, "country list").await
    }

    pub async fn genres(&self) -> Result<Vec<Genre>> {
        let url = self.endpoint("radio/generos")?;
        debug!(%url, "GET genres");
        let resp = self.http.get(url).send().await.context("Genre list request failed")?;
        read_json(resp, "genre list").await
    }

    pub async fn search(&self, filter: &FilterState) -> Result<SearchPage> {
        let mut url = self.endpoint("radio/buscar")?;
        url.set_query(Some(&filter.outbound_query(PAGE_SIZE)));
        debug!(%url, "GET station search");
        let resp = self.http.get(url).send().await.context("Station search request failed")?;
        read_json(resp, "station search").await
    }

    /// Other stations from the same country, excluding `station` itself.
    pub async fn recommended(&self, station: &Station) -> Result<Vec<Station>> {
        let mut url = self.endpoint("radio/buscar")?;
        url.query_pairs_mut()
            .append_pair("pais", &station.country_code)
            .append_pair("excludeUuid", &station.uuid)
            .append_pair("limite", &RECOMMENDED_LIMIT.to_string());
        debug!(%url, "GET recommended stations");
        let resp = self.http.get(url).send().await.context("Recommended request failed")?;
        let page: SearchPage = read_json(resp, "recommended stations").await?;
        Ok(page.stations)
    }

    /// `Ok(None)` when the API does not know the station.
    pub async fn station(&self, uuid: &str) -> Result<Option<Station>> {
        let uuid = uuid.trim();
        if uuid.is_empty() {
            return Err(anyhow!("Missing station UUID"));
        }
        let mut url = self.endpoint("radio")?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("API base URL cannot have path segments"))?
            .push(uuid);
        debug!(%url, "GET station");
        let resp = self.http.get(url).send().await.context("Station request failed")?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        read_json(resp, "station").await.map(Some)
    }
}
