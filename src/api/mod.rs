pub mod model;

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use colored::Colorize;
use futures::stream::{self, StreamExt, TryStreamExt};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use indicatif::ProgressBar;
use reqwest::{StatusCode, Url};
use thiserror::Error;

pub use model::{NamedResource, Pokemon, ResourcePage};

pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";
pub const DEFAULT_RESOURCE: &str = "pokemon";
pub const DEFAULT_USER_AGENT: &str = concat!("pokedex/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid URL: {url}: {message}")]
    InvalidUrl { url: String, message: String },

    #[error("failed to build HTTP client: {source}")]
    HttpClientBuild {
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to setup proxy: {proxy}: {source}")]
    ProxySetup {
        proxy: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("no entry named '{name}'")]
    NotFound { name: String },

    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

#[derive(Clone, Debug)]
pub struct ClientOptions {
    pub base_url: String,
    pub resource: String,
    pub timeout_seconds: u64,
    pub rate: u32,
    pub proxy: Option<String>,
    pub user_agent: String,
    pub follow_redirects: bool,
    pub verbose: u8,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            resource: DEFAULT_RESOURCE.to_string(),
            timeout_seconds: 10,
            rate: 20,
            proxy: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            follow_redirects: true,
            verbose: 0,
        }
    }
}

/// HTTP client for a paginated REST collection shaped like PokeAPI v2.
#[derive(Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    collection_url: Url,
    limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
    verbose: u8,
}

impl CatalogClient {
    pub fn new(options: ClientOptions) -> Result<Self, ApiError> {
        let collection_url = collection_url(&options.base_url, &options.resource)?;

        let mut headers = reqwest::header::HeaderMap::new();
        let user_agent = reqwest::header::HeaderValue::from_str(&options.user_agent)
            .unwrap_or_else(|_| reqwest::header::HeaderValue::from_static(DEFAULT_USER_AGENT));
        headers.insert(reqwest::header::USER_AGENT, user_agent);

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .redirect(if options.follow_redirects {
                reqwest::redirect::Policy::limited(10)
            } else {
                reqwest::redirect::Policy::none()
            })
            .timeout(Duration::from_secs(options.timeout_seconds.max(1)));
        if let Some(proxy) = options.proxy.as_deref().filter(|p| !p.trim().is_empty()) {
            let proxy_cfg = reqwest::Proxy::all(proxy).map_err(|e| ApiError::ProxySetup {
                proxy: proxy.to_string(),
                source: e,
            })?;
            builder = builder.proxy(proxy_cfg);
        }
        let http = builder
            .build()
            .map_err(|e| ApiError::HttpClientBuild { source: e })?;

        let rate = NonZeroU32::new(options.rate).unwrap_or(NonZeroU32::MIN);
        let limiter = Arc::new(RateLimiter::direct(Quota::per_second(rate)));

        Ok(Self {
            http,
            collection_url,
            limiter,
            verbose: options.verbose,
        })
    }

    pub fn collection_url(&self) -> &Url {
        &self.collection_url
    }

    pub fn page_url(&self, limit: u64, offset: u64) -> Url {
        let mut url = self.collection_url.clone();
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string())
            .append_pair("offset", &offset.to_string());
        url
    }

    /// URL of a single entry. The name is percent-encoded as one path segment.
    pub fn item_url(&self, name: &str) -> Url {
        let mut url = self.collection_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(name);
        }
        url
    }

    pub async fn list_page(&self, limit: u64, offset: u64) -> Result<ResourcePage, ApiError> {
        let url = self.page_url(limit, offset);
        let page: ResourcePage = self.get_json(url).await?;
        if self.verbose > 0 {
            debug_line(&format!(
                "page offset={offset} limit={limit} -> {} of {}",
                page.results.len(),
                page.count
            ));
        }
        Ok(page)
    }

    pub async fn fetch_by_name(&self, name: &str) -> Result<Pokemon, ApiError> {
        let url = self.item_url(name);
        match self.get_json(url).await {
            Err(ApiError::Status { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                Err(ApiError::NotFound {
                    name: name.to_string(),
                })
            }
            other => other,
        }
    }

    pub async fn fetch_by_url(&self, url: &str) -> Result<Pokemon, ApiError> {
        let parsed = Url::parse(url).map_err(|e| ApiError::InvalidUrl {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        self.get_json(parsed).await
    }

    /// Resolves list entries to full records, keeping list order.
    pub async fn fetch_cards(
        &self,
        entries: &[NamedResource],
        concurrency: usize,
        pb: &ProgressBar,
    ) -> Result<Vec<Pokemon>, ApiError> {
        pb.set_length(entries.len() as u64);
        let cards = stream::iter(entries.iter())
            .map(|entry| async move {
                let card = self.fetch_by_url(&entry.url).await;
                pb.inc(1);
                card
            })
            .buffered(concurrency.max(1))
            .try_collect::<Vec<_>>()
            .await;
        pb.finish_and_clear();
        cards
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        self.limiter.until_ready().await;
        if self.verbose > 1 {
            debug_line(&format!("GET {url}"));
        }
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| ApiError::Request {
                url: url.to_string(),
                source: e,
            })?;
        let status = response.status();
        if self.verbose > 1 {
            debug_line(&format!("{} {url}", status.as_u16()));
        }
        if !status.is_success() {
            return Err(ApiError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        response.json::<T>().await.map_err(|e| ApiError::Decode {
            url: url.to_string(),
            source: e,
        })
    }
}

fn collection_url(base_url: &str, resource: &str) -> Result<Url, ApiError> {
    let invalid = |message: String| ApiError::InvalidUrl {
        url: base_url.to_string(),
        message,
    };
    let mut url = Url::parse(base_url.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    url.set_query(None);
    url.set_fragment(None);
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| invalid("cannot be a base URL".to_string()))?;
        segments.pop_if_empty();
        for part in resource.split('/').filter(|p| !p.is_empty()) {
            segments.push(part);
        }
    }
    Ok(url)
}

fn debug_line(message: &str) {
    eprintln!("{} {}", "::".dimmed(), message.dimmed());
}
