//! Property listing details page.

use serde::Serialize;

use crate::locator::Locator;
use crate::page::{search_results::parse_result_count, PageContext, INTERACTION_TIMEOUT_MS};
use crate::reporter::EventLevel;
use crate::result::{TantearError, TantearResult};

/// Details collected from a property listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingSummary {
    /// Street address shown in the listing body.
    pub address: String,
    /// Bedroom count from the bedroom tag.
    pub bedrooms: u32,
    /// Listing agent's name.
    pub agent_name: String,
}

/// Locators for the listing details page.
#[derive(Debug, Clone)]
pub struct ListingLocators {
    /// Key element proving the details page rendered.
    pub title: Locator,
    /// The listing address heading.
    pub address: Locator,
    /// The bedroom-count tag.
    pub bedrooms: Locator,
    /// The agent name heading.
    pub agent_name: Locator,
}

impl Default for ListingLocators {
    fn default() -> Self {
        Self {
            title: Locator::xpath(
                r#"//h2[contains(@class, "tm-property-listing-body__title")]"#,
                "Listing Title",
            ),
            address: Locator::xpath(
                r#"//tm-property-listing-body //h1[contains(@class, "tm-property-listing-body__location")]"#,
                "Property Address",
            ),
            bedrooms: Locator::xpath(
                r#"//div[contains(@class, "tag--content") and .//tg-icon[@name="bedroom"]]"#,
                "Bedroom Count",
            ),
            agent_name: Locator::xpath(
                r#"//tm-agents-summary //h3[contains(@class, "pt-agent-summary__agent-name")]"#,
                "Agent Name",
            ),
        }
    }
}

/// The listing details page.
#[derive(Debug, Clone)]
pub struct ListingDetails {
    ctx: PageContext,
    locators: ListingLocators,
}

impl ListingDetails {
    /// Create the page over a context with default locators.
    #[must_use]
    pub fn new(ctx: PageContext) -> Self {
        Self {
            ctx,
            locators: ListingLocators::default(),
        }
    }

    /// Override the locators.
    #[must_use]
    pub fn with_locators(mut self, locators: ListingLocators) -> Self {
        self.locators = locators;
        self
    }

    /// The page's locators.
    #[must_use]
    pub const fn locators(&self) -> &ListingLocators {
        &self.locators
    }

    /// Whether the details page title is visible.
    pub async fn is_loaded(&self) -> TantearResult<bool> {
        self.ctx
            .is_page_loaded(&self.locators.title, "Listing Details")
            .await
    }

    /// Collect the address, bedroom count, and agent name. Fails when the
    /// page never loads or the bedroom tag carries no number.
    pub async fn collect(&self) -> TantearResult<ListingSummary> {
        if !self.is_loaded().await? {
            return Err(TantearError::PageNotLoaded {
                page: "Listing Details".into(),
            });
        }

        let address = self
            .ctx
            .read_text_when_visible(&self.locators.address, INTERACTION_TIMEOUT_MS)
            .await?;
        let bedroom_text = self
            .ctx
            .read_text_when_visible(&self.locators.bedrooms, INTERACTION_TIMEOUT_MS)
            .await?;
        let agent_name = self
            .ctx
            .read_text_when_visible(&self.locators.agent_name, INTERACTION_TIMEOUT_MS)
            .await?;

        let bedrooms =
            u32::try_from(parse_result_count(&bedroom_text)?).map_err(|_| {
                TantearError::InvalidCount {
                    text: bedroom_text.clone(),
                }
            })?;

        let summary = ListingSummary {
            address,
            bedrooms,
            agent_name,
        };
        self.ctx.reporter().record_with(
            EventLevel::Info,
            "collected listing details",
            &summary,
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockDriver, MockElement};
    use crate::reporter::Reporter;
    use std::sync::Arc;

    fn page(driver: &MockDriver) -> ListingDetails {
        ListingDetails::new(PageContext::new(
            Arc::new(driver.clone()),
            Reporter::new(),
        ))
    }

    fn install_listing(driver: &MockDriver, locators: &ListingLocators) {
        driver.install(
            &locators.title,
            MockElement::new().with_text("Sunny family home"),
        );
        driver.install(
            &locators.address,
            MockElement::new().with_text("12 Example Street, Porirua"),
        );
        driver.install(&locators.bedrooms, MockElement::new().with_text("3 bedrooms"));
        driver.install(
            &locators.agent_name,
            MockElement::new().with_text("Jordan Example"),
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_collect_details() {
        let driver = MockDriver::new();
        let page = page(&driver);
        install_listing(&driver, &page.locators);

        let summary = page.collect().await.unwrap();
        assert_eq!(
            summary,
            ListingSummary {
                address: "12 Example Street, Porirua".into(),
                bedrooms: 3,
                agent_name: "Jordan Example".into(),
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_collect_without_page_is_error() {
        let driver = MockDriver::new();
        let page = page(&driver);
        let err = page.collect().await.unwrap_err();
        assert!(matches!(
            err,
            TantearError::PageNotLoaded { page } if page == "Listing Details"
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_collect_with_unparseable_bedrooms() {
        let driver = MockDriver::new();
        let page = page(&driver);
        install_listing(&driver, &page.locators);
        driver.install(
            &page.locators.bedrooms,
            MockElement::new().with_text("studio"),
        );

        let err = page.collect().await.unwrap_err();
        assert!(matches!(err, TantearError::InvalidCount { .. }));
    }
}
