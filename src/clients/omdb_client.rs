use std::future::Future;

use reqwest::{header, Client};
use serde::Deserialize;
use thiserror::Error;
use tokio_retry::{
    strategy::{jitter, ExponentialBackoff},
    Retry,
};

use crate::config::Config;

/// Metadata the lookup service returns for a title.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieDetails {
    pub title: String,
    pub year: i32,
    pub rating: f64,
    pub poster: String,
}

#[derive(Error, Debug)]
pub enum LookupError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("lookup service answered {status} for {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
}

/// Resolves a title to movie metadata. `Ok(None)` means the service has no
/// match for it.
pub trait MovieLookup {
    fn lookup(
        &self,
        title: &str,
    ) -> impl Future<Output = Result<Option<MovieDetails>, LookupError>>;
}

#[derive(Debug, Deserialize)]
struct OmdbResponse {
    #[serde(rename = "Response", default)]
    response: String,
    #[serde(rename = "Title", default)]
    title: Option<String>,
    #[serde(rename = "Year", default)]
    year: Option<String>,
    #[serde(rename = "imdbRating", default)]
    imdb_rating: Option<String>,
    #[serde(rename = "Poster", default)]
    poster: Option<String>,
}

impl OmdbResponse {
    fn into_details(self, requested_title: &str) -> Option<MovieDetails> {
        if self.response != "True" {
            return None;
        }

        let year = self
            .year
            .as_deref()
            .map(|y| {
                y.trim()
                    .chars()
                    .take_while(|c| c.is_ascii_digit())
                    .collect::<String>()
            })
            .and_then(|digits| digits.parse().ok())
            .unwrap_or(0);

        let rating = self
            .imdb_rating
            .as_deref()
            .and_then(|r| r.trim().parse::<f64>().ok())
            .filter(|r| r.is_finite())
            .unwrap_or(0.0);

        let poster = self
            .poster
            .filter(|p| p != "N/A")
            .unwrap_or_default();

        Some(MovieDetails {
            title: self
                .title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| requested_title.to_string()),
            year,
            rating,
            poster,
        })
    }
}

#[derive(Debug, Clone)]
pub struct OmdbClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl OmdbClient {
    pub fn new(config: &Config) -> Result<Self, LookupError> {
        let user_agent = header::HeaderValue::from_static(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(config.api_timeout)
            .build()
            .map_err(|source| LookupError::Http {
                url: config.api_url.clone(),
                source,
            })?;

        Ok(Self {
            client,
            base_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    async fn fetch_with_retry(
        &self,
        title: &str,
        api_key: &str,
    ) -> Result<OmdbResponse, LookupError> {
        let retry_strategy = ExponentialBackoff::from_millis(10).map(jitter).take(3);
        Retry::spawn(retry_strategy, || async move {
            self.fetch_no_retry(title, api_key).await
        })
        .await
    }

    async fn fetch_no_retry(&self, title: &str, api_key: &str) -> Result<OmdbResponse, LookupError> {
        let http_error = |source: reqwest::Error| LookupError::Http {
            url: self.base_url.clone(),
            source,
        };

        let resp = self
            .client
            .get(&self.base_url)
            .query(&[("t", title), ("apikey", api_key)])
            .send()
            .await
            .map_err(http_error)?;

        if !resp.status().is_success() {
            return Err(LookupError::Status {
                url: self.base_url.clone(),
                status: resp.status(),
            });
        }

        resp.json::<OmdbResponse>().await.map_err(http_error)
    }
}

impl MovieLookup for OmdbClient {
    async fn lookup(&self, title: &str) -> Result<Option<MovieDetails>, LookupError> {
        let Some(api_key) = self.api_key.as_deref() else {
            log::warn!("No API key configured, skipping lookup for {}", title);
            return Ok(None);
        };

        log::info!("Looking up movie {}", title);
        let details = self.fetch_with_retry(title, api_key).await?.into_details(title);
        if details.is_none() {
            log::info!("Lookup service has no match for {}", title);
        }
        Ok(details)
    }
}
