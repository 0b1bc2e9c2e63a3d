// src/services/source.rs

//! Remote vacancy API access.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{ApiConfig, Area, EncodedQuery, ListingPage, RawDetail};
use crate::utils::http::create_async_client;

/// The two remote calls the collector depends on.
#[async_trait]
pub trait VacancySource: Send + Sync {
    /// Fetch one page of the listing for `query`.
    async fn fetch_page(&self, query: &EncodedQuery, page: u32) -> Result<ListingPage>;

    /// Fetch the full detail of vacancy `id`.
    async fn fetch_detail(&self, id: &str) -> Result<RawDetail>;
}

/// [`VacancySource`] backed by the hh.ru HTTP API.
#[derive(Clone)]
pub struct HttpSource {
    client: Client,
    base_url: Url,
    areas_url: Url,
}

impl HttpSource {
    /// Create a source using an existing client.
    pub fn new(client: Client, config: &ApiConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::config(format!(
                "api.base_url cannot hold a path: {}",
                config.base_url
            )));
        }
        Ok(Self {
            client,
            base_url,
            areas_url: Url::parse(&config.areas_url)?,
        })
    }

    /// Create a source with its own configured client.
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        Self::new(create_async_client(config)?, config)
    }

    /// Download the area (region/city) tree.
    pub async fn fetch_areas(&self) -> Result<Vec<Area>> {
        self.get_json(self.areas_url.clone(), "area tree").await
    }

    fn listing_url(&self, query: &EncodedQuery, page: u32) -> Url {
        let mut url = self.base_url.clone();
        url.set_query(Some(query.as_str()));
        url.query_pairs_mut().append_pair("page", &page.to_string());
        url
    }

    fn detail_url(&self, id: &str) -> Url {
        let mut url = self.base_url.clone();
        url.set_query(None);
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(id);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, context: &str) -> Result<T> {
        log::debug!("GET {url}");
        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        serde_json::from_str(&body).map_err(|e| AppError::malformed(context, e))
    }
}

#[async_trait]
impl VacancySource for HttpSource {
    async fn fetch_page(&self, query: &EncodedQuery, page: u32) -> Result<ListingPage> {
        let url = self.listing_url(query, page);
        self.get_json(url, &format!("listing page {page}")).await
    }

    async fn fetch_detail(&self, id: &str) -> Result<RawDetail> {
        let url = self.detail_url(id);
        self.get_json(url, &format!("vacancy {id}")).await
    }
}
