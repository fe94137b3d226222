use anyhow::{Context, Result};
use async_trait::async_trait;
use rand::Rng;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::DiscoveryError;
use crate::models::{clamp_score, parse_release_date, Movie, WatchAvailability};

const TMDB_BASE: &str = "https://api.themoviedb.org/3";
/// TMDB refuses discover pages past 500.
pub const MAX_DISCOVER_PAGE: u32 = 500;

#[async_trait]
pub trait DiscoveryApi: Send + Sync {
    async fn fetch_random(&self) -> Result<Movie, DiscoveryError>;
}

#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    pub base_url: String,
    pub language: String,
    pub certification_country: String,
    pub certification_ceiling: String,
    pub region: String,
    pub max_page: u32,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            base_url: TMDB_BASE.to_string(),
            language: "en-US".to_string(),
            certification_country: "US".to_string(),
            certification_ceiling: "R".to_string(),
            region: "US".to_string(),
            max_page: MAX_DISCOVER_PAGE,
        }
    }
}

impl DiscoveryConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: Client,
    api_key: String,
    config: DiscoveryConfig,
}

impl TmdbClient {
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("TMDB_API_KEY").context("TMDB_API_KEY not set")?;
        Self::new(api_key, DiscoveryConfig::default())
    }

    pub fn new(api_key: impl Into<String>, config: DiscoveryConfig) -> Result<Self> {
        let user_agent = format!("justpick/{}", env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(30))
            .user_agent(user_agent)
            .build()
            .context("Failed to build TMDB HTTP client")?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            config,
        })
    }

    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    /// One page of the filtered discover listing.
    pub async fn discover_page(&self, page: u32) -> Result<Vec<Candidate>, DiscoveryError> {
        let cfg = &self.config;
        let url = format!(
            "{}/discover/movie?api_key={}&language={}&certification_country={}&certification.lte={}&include_adult=false&page={page}",
            cfg.base_url,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(&cfg.language),
            urlencoding::encode(&cfg.certification_country),
            urlencoding::encode(&cfg.certification_ceiling),
        );
        let listing: DiscoverResponse = self
            .get_json(&url, "/discover/movie", DiscoveryError::ListingUnavailable)
            .await?;
        Ok(listing.results)
    }

    /// Availability for the configured region. `Ok(None)` when TMDB knows the
    /// title but nothing is offered there.
    pub async fn watch_providers(
        &self,
        movie_id: i64,
    ) -> Result<Option<WatchAvailability>, DiscoveryError> {
        let url = format!(
            "{}/movie/{movie_id}/watch/providers?api_key={}",
            self.config.base_url,
            urlencoding::encode(&self.api_key),
        );
        let path = format!("/movie/{movie_id}/watch/providers");
        let mut data: ProvidersResponse = self
            .get_json(&url, &path, DiscoveryError::ProvidersUnavailable)
            .await?;
        Ok(data.results.remove(&self.config.region))
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        path: &str,
        on_status: fn(StatusCode) -> DiscoveryError,
    ) -> Result<T, DiscoveryError> {
        let res = self.client.get(url).send().await?;
        let status = res.status();
        let text = res.text().await?;
        if !status.is_success() {
            warn!("TMDB {} -> {}: {}", path, status, text);
            return Err(on_status(status));
        }
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl DiscoveryApi for TmdbClient {
    async fn fetch_random(&self) -> Result<Movie, DiscoveryError> {
        let page = random_page(&mut rand::thread_rng(), self.config.max_page);
        debug!(page, "Requesting discover page");

        let mut candidates: Vec<(i64, Candidate)> = self
            .discover_page(page)
            .await?
            .into_iter()
            .filter(|c| !c.title.trim().is_empty())
            .filter_map(|c| c.id.map(|id| (id, c)))
            .collect();
        let index = pick_index(&mut rand::thread_rng(), candidates.len())
            .ok_or(DiscoveryError::EmptyListing)?;
        let (id, candidate) = candidates.swap_remove(index);
        debug!(
            page,
            index,
            tmdb_id = id,
            title = %candidate.title,
            "Picked candidate"
        );

        let providers = self.watch_providers(id).await?;
        info!(
            "Recommending '{}' (tmdb id {}), providers: {}",
            candidate.title,
            id,
            if providers.is_some() { "yes" } else { "none" }
        );
        Ok(candidate.into_movie(id, providers))
    }
}

/// Uniform page number in `1..=max_page`.
pub fn random_page<R: Rng + ?Sized>(rng: &mut R, max_page: u32) -> u32 {
    rng.gen_range(1..=max_page.max(1))
}

/// Uniform index into a listing of `len` items, `None` when it is empty.
pub fn pick_index<R: Rng + ?Sized>(rng: &mut R, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(rng.gen_range(0..len))
}

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    /// Entries without an id cannot be looked up and are skipped.
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub overview: String,
    pub poster_path: Option<String>,
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: f32,
}

impl Candidate {
    pub fn into_movie(self, id: i64, watch_providers: Option<WatchAvailability>) -> Movie {
        Movie {
            id,
            title: self.title.trim().to_string(),
            overview: self.overview,
            poster_path: self.poster_path.unwrap_or_default(),
            release_date: parse_release_date(self.release_date.as_deref()),
            vote_average: clamp_score(self.vote_average),
            watch_providers,
        }
    }
}

#[derive(Debug, Deserialize)]
struct DiscoverResponse {
    #[serde(default)]
    results: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct ProvidersResponse {
    #[serde(default)]
    results: HashMap<String, WatchAvailability>,
}
