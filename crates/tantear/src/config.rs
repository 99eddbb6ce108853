//! Suite configuration
//!
//! Base URLs and expectations come from the environment with sandbox
//! defaults, so scenarios run against the sandbox unless told otherwise.

/// Environment-derived settings for a scenario run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteConfig {
    /// Marketplace UI base URL.
    pub base_url: String,
    /// Catalogue API base URL.
    pub api_base_url: String,
    /// Expected number of used-car brands, when the run asserts on it.
    pub expected_total_car_brands: Option<usize>,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.tmsandbox.co.nz".into(),
            api_base_url: "https://api.trademe.co.nz/v1".into(),
            expected_total_car_brands: None,
        }
    }
}

impl SuiteConfig {
    /// Load configuration from the environment, falling back to sandbox
    /// defaults. A `.env` file in the working directory is honoured.
    #[must_use]
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let defaults = Self::default();
        Self {
            base_url: std::env::var("BASE_URL").unwrap_or(defaults.base_url),
            api_base_url: std::env::var("API_BASE_URL").unwrap_or(defaults.api_base_url),
            expected_total_car_brands: std::env::var("EXPECTED_TOTAL_CAR_BRANDS")
                .ok()
                .and_then(|raw| raw.parse().ok()),
        }
    }
}
