//! Catalogue API client
//!
//! Fetches the used-car category listing from the marketplace's public
//! catalogue endpoint. Decoding is tolerant in exactly one way: a 2xx body
//! whose shape does not match the expected listing decodes to an empty
//! listing with a warning, because the endpoint serves `{}` for categories
//! with no subcategories. Transport failures and non-2xx statuses are real
//! errors.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::reporter::Reporter;

/// A failure fetching or decoding a catalogue resource.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The HTTP request could not be sent or the response not read.
    #[error("http transport failure")]
    Http(#[from] reqwest::Error),

    /// Simulated or wrapped transport failure with no underlying
    /// `reqwest` error available.
    #[error("transport failure: {message}")]
    Transport {
        /// What went wrong on the wire.
        message: String,
    },

    /// The server answered outside the 2xx range.
    #[error("unexpected status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, for diagnostics.
        body: String,
    },

    /// The body was not valid JSON at all.
    #[error("response body is not valid json")]
    Decode(#[from] serde_json::Error),
}

/// Fetches a URL and returns its decoded JSON body.
///
/// The indirection exists so scenarios can run against canned responses.
#[async_trait]
pub trait JsonFetcher: Send + Sync {
    /// GET `url` and decode the 2xx body as JSON.
    async fn fetch_json(&self, url: &str) -> Result<serde_json::Value, FetchError>;
}

/// `reqwest`-backed fetcher.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpFetcher {
    /// Build a fetcher with a default client.
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
        }
    }
}

#[async_trait]
impl JsonFetcher for HttpFetcher {
    async fn fetch_json(&self, url: &str) -> Result<serde_json::Value, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(serde_json::from_str(&body)?)
    }
}

/// One subcategory of a catalogue category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subcategory {
    /// Display name, e.g. a car brand.
    #[serde(rename = "Name")]
    pub name: String,
}

/// A category listing as served by the catalogue endpoint.
///
/// The endpoint serves `{}` for categories with no subcategories, so the
/// field defaults to empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryListing {
    /// Subcategories, possibly absent.
    #[serde(rename = "Subcategories", default)]
    pub subcategories: Vec<Subcategory>,
}

impl CategoryListing {
    /// Subcategory names in server order.
    #[must_use]
    pub fn brand_names(&self) -> Vec<&str> {
        self.subcategories.iter().map(|s| s.name.as_str()).collect()
    }
}

/// Client for the marketplace catalogue endpoints.
pub struct CategoriesApi {
    fetcher: Box<dyn JsonFetcher>,
    base_url: String,
    reporter: Reporter,
}

impl std::fmt::Debug for CategoriesApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CategoriesApi")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl CategoriesApi {
    /// Create a client against `base_url` using the given fetcher.
    #[must_use]
    pub fn new(
        fetcher: impl JsonFetcher + 'static,
        base_url: impl Into<String>,
        reporter: Reporter,
    ) -> Self {
        Self {
            fetcher: Box::new(fetcher),
            base_url: base_url.into(),
            reporter,
        }
    }

    /// Fetch the used-car category listing.
    ///
    /// A 2xx body that is valid JSON but not listing-shaped decodes to an
    /// empty listing with a warning.
    pub async fn used_car_categories(&self) -> Result<CategoryListing, FetchError> {
        let url = format!("{}/Categories/UsedCars.json", self.base_url);
        self.reporter
            .info(format!("fetching used car categories from {url}"));
        let value = self.fetcher.fetch_json(&url).await?;
        let listing = match serde_json::from_value::<CategoryListing>(value) {
            Ok(listing) => listing,
            Err(err) => {
                self.reporter.warn(format!(
                    "used car categories response did not match listing shape: {err}"
                ));
                CategoryListing::default()
            }
        };
        self.reporter.record_with(
            crate::reporter::EventLevel::Info,
            format!("received {} used car subcategories", listing.subcategories.len()),
            &listing.brand_names(),
        );
        Ok(listing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockFetcher;

    #[tokio::test]
    async fn test_empty_object_is_empty_listing() {
        let api = CategoriesApi::new(
            MockFetcher::with_body(serde_json::json!({})),
            "https://api.example.test/v1",
            Reporter::new(),
        );
        let listing = api.used_car_categories().await.unwrap();
        assert!(listing.subcategories.is_empty());
    }

    #[tokio::test]
    async fn test_brand_names_preserve_server_order() {
        let api = CategoriesApi::new(
            MockFetcher::with_body(serde_json::json!({
                "Subcategories": [
                    { "Name": "Honda" },
                    { "Name": "Toyota" },
                    { "Name": "Mazda" },
                ]
            })),
            "https://api.example.test/v1",
            Reporter::new(),
        );
        let listing = api.used_car_categories().await.unwrap();
        assert_eq!(listing.brand_names(), vec!["Honda", "Toyota", "Mazda"]);
    }

    #[tokio::test]
    async fn test_transport_failure_is_fatal() {
        let api = CategoriesApi::new(
            MockFetcher::failing("connection refused"),
            "https://api.example.test/v1",
            Reporter::new(),
        );
        let err = api.used_car_categories().await.unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }));
    }

    #[tokio::test]
    async fn test_non_success_status_is_fatal() {
        let api = CategoriesApi::new(
            MockFetcher::with_status(503, "service unavailable"),
            "https://api.example.test/v1",
            Reporter::new(),
        );
        match api.used_car_categories().await.unwrap_err() {
            FetchError::Status { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "service unavailable");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_mismatched_shape_warns_and_returns_empty() {
        let reporter = Reporter::new();
        let api = CategoriesApi::new(
            MockFetcher::with_body(serde_json::json!({ "Subcategories": "oops" })),
            "https://api.example.test/v1",
            reporter.clone(),
        );
        let listing = api.used_car_categories().await.unwrap();
        assert!(listing.subcategories.is_empty());
        assert_eq!(
            reporter.count_at(crate::reporter::EventLevel::Warn),
            1
        );
    }

    #[tokio::test]
    async fn test_request_targets_used_cars_endpoint() {
        let fetcher = MockFetcher::with_body(serde_json::json!({}));
        let urls = fetcher.requested_urls();
        let api = CategoriesApi::new(fetcher, "https://api.example.test/v1", Reporter::new());
        let _ = api.used_car_categories().await.unwrap();
        let requested = urls.lock().unwrap().clone();
        assert_eq!(
            requested,
            vec!["https://api.example.test/v1/Categories/UsedCars.json"]
        );
    }
}
