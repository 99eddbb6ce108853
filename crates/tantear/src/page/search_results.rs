//! General search results page.

use regex::Regex;
use std::sync::OnceLock;

use crate::locator::Locator;
use crate::page::{
    CategoryDropdown, ListingDetails, LocationDropdown, PageContext, INTERACTION_TIMEOUT_MS,
    PAGE_LOAD_TIMEOUT_MS,
};
use crate::result::{TantearError, TantearResult};

fn digit_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+").expect("digit pattern is valid"))
}

/// Extract a count from header text like `"25,061 results"`.
///
/// Digit runs are concatenated, so thousands separators drop out. Text with
/// no digits at all is an [`TantearError::InvalidCount`].
pub fn parse_result_count(text: &str) -> TantearResult<u64> {
    let digits: String = digit_runs()
        .find_iter(text)
        .map(|m| m.as_str())
        .collect();
    digits.parse().map_err(|_| TantearError::InvalidCount {
        text: text.to_string(),
    })
}

/// Locators for the search results page.
#[derive(Debug, Clone)]
pub struct SearchResultsLocators {
    /// Heading carrying `"N results for 'item'"`.
    pub result_count: Locator,
    /// First non-advertisement listing card.
    pub first_listing: Locator,
}

impl Default for SearchResultsLocators {
    fn default() -> Self {
        Self {
            result_count: Locator::css(
                "h3.tm-search-header-result-count__heading",
                "Search Result Count",
            ),
            first_listing: Locator::xpath(
                r#"(//tg-col[contains(@class, "l-col l-col--has-flex-contents") and not(contains(@class, "ad-card"))])[1]"#,
                "First Listing",
            ),
        }
    }
}

/// The search results page with its refinement dropdowns.
#[derive(Debug, Clone)]
pub struct SearchResultsPage {
    ctx: PageContext,
    locators: SearchResultsLocators,
}

impl SearchResultsPage {
    /// Create the page over a context with default locators.
    #[must_use]
    pub fn new(ctx: PageContext) -> Self {
        Self {
            ctx,
            locators: SearchResultsLocators::default(),
        }
    }

    /// Override the locators.
    #[must_use]
    pub fn with_locators(mut self, locators: SearchResultsLocators) -> Self {
        self.locators = locators;
        self
    }

    /// The page's locators.
    #[must_use]
    pub const fn locators(&self) -> &SearchResultsLocators {
        &self.locators
    }

    /// The category refinement dropdown on this page.
    #[must_use]
    pub fn category_dropdown(&self) -> CategoryDropdown {
        CategoryDropdown::new(self.ctx.clone())
    }

    /// The location refinement dropdown on this page.
    #[must_use]
    pub fn location_dropdown(&self) -> LocationDropdown {
        LocationDropdown::new(self.ctx.clone())
    }

    /// The listing details page reached by clicking a listing.
    #[must_use]
    pub fn listing_details(&self) -> ListingDetails {
        ListingDetails::new(self.ctx.clone())
    }

    /// Whether the results page for `item` is showing: the count heading is
    /// visible and mentions the item.
    pub async fn is_loaded_for(&self, item: &str) -> TantearResult<bool> {
        let text = match self
            .ctx
            .read_text_when_visible(&self.locators.result_count, PAGE_LOAD_TIMEOUT_MS)
            .await
        {
            Ok(text) => text,
            Err(TantearError::ConditionTimeout { .. }) => {
                self.ctx.reporter().error(format!(
                    "search results page for {item:?} did not load"
                ));
                return Ok(false);
            }
            Err(err) => return Err(err),
        };

        let expected = format!("results for '{item}'");
        if text.contains(&expected) {
            self.ctx
                .reporter()
                .info(format!("search results page for {item:?} loaded"));
            Ok(true)
        } else {
            self.ctx.reporter().error(format!(
                "search results page for {item:?} is showing {text:?}"
            ));
            Ok(false)
        }
    }

    /// Read the total listings count from the header. A missing header or
    /// unparseable text is an error; count checks are load-bearing.
    pub async fn listings_count(&self) -> TantearResult<u64> {
        let text = self
            .ctx
            .read_text_when_visible(&self.locators.result_count, INTERACTION_TIMEOUT_MS)
            .await?;
        let count = parse_result_count(&text)?;
        self.ctx
            .reporter()
            .info(format!("listings count retrieved: {count}"));
        Ok(count)
    }

    /// Whether the header's count equals `expected`.
    pub async fn validate_results_count(&self, expected: u64) -> TantearResult<bool> {
        let actual = self.listings_count().await?;
        self.ctx.reporter().info(format!(
            "expected count: {expected}, actual count: {actual}"
        ));
        Ok(actual == expected)
    }

    /// Click the first non-advertisement listing.
    pub async fn click_first_listing(&self) -> TantearResult<()> {
        self.ctx
            .click_when_clickable(&self.locators.first_listing)
            .await?;
        self.ctx.reporter().info("clicked the first listing");
        Ok(())
    }
}
