use crate::api::ApiClient;
use crate::models::{Country, Genre};
use anyhow::Result;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::warn;

struct Cached<T> {
    value: T,
    fetched: Instant,
}

/// Country and genre lists change rarely; they are refreshed at most once
/// per `ttl`. Failed refreshes are not stored.
pub struct Catalog {
    api: ApiClient,
    ttl: Duration,
    countries: RwLock<Option<Cached<Vec<Country>>>>,
    genres: RwLock<Option<Cached<Vec<Genre>>>>,
}

impl Catalog {
    pub fn new(api: ApiClient, ttl: Duration) -> Self {
        Self {
            api,
            ttl,
            countries: RwLock::new(None),
            genres: RwLock::new(None),
        }
    }

    /// Countries sorted by display name.
    pub async fn countries(&self) -> Result<Vec<Country>> {
        if let Some(c) = fresh(&self.countries, self.ttl).await {
            return Ok(c);
        }
        let mut countries = self.api.countries().await.inspect_err(|e| {
            warn!(error = %format!("{e:#}"), "country list refresh failed");
        })?;
        countries.sort_by(|a, b| a.name.cmp(&b.name));
        store(&self.countries, countries.clone()).await;
        Ok(countries)
    }

    pub async fn genres(&self) -> Result<Vec<Genre>> {
        if let Some(g) = fresh(&self.genres, self.ttl).await {
            return Ok(g);
        }
        let genres = self.api.genres().await.inspect_err(|e| {
            warn!(error = %format!("{e:#}"), "genre list refresh failed");
        })?;
        store(&self.genres, genres.clone()).await;
        Ok(genres)
    }
}

async fn fresh<T: Clone>(slot: &RwLock<Option<Cached<T>>>, ttl: Duration) -> Option<T> {
    let guard = slot.read().await;
    guard
        .as_ref()
        .filter(|c| c.fetched.elapsed() < ttl)
        .map(|c| c.value.clone())
}

async fn store<T>(slot: &RwLock<Option<Cached<T>>>, value: T) {
    *slot.write().await = Some(Cached {
        value,
        fetched: Instant::now(),
    });
}
