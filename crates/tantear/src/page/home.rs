//! Marketplace homepage.

use crate::locator::Locator;
use crate::page::PageContext;
use crate::result::{TantearError, TantearResult};

/// Locators for the homepage, parameterized so markup drift is a data edit.
#[derive(Debug, Clone)]
pub struct HomeLocators {
    /// Key element proving the homepage rendered.
    pub header: Locator,
    /// The main search input.
    pub search_input: Locator,
    /// The search submit button.
    pub search_button: Locator,
}

impl Default for HomeLocators {
    fn default() -> Self {
        Self {
            header: Locator::css(
                "tm-dynamic-homepage tm-homepage-in-with-the-new-campaign-header",
                "Homepage Header",
            ),
            search_input: Locator::css(
                "tm-homepage-in-with-the-new-campaign-header input",
                "Search Input",
            ),
            search_button: Locator::css(
                r#"button[aria-label="Search all of Trade Me"]"#,
                "Search Button",
            ),
        }
    }
}

/// The marketplace homepage: entry point of UI flows.
#[derive(Debug, Clone)]
pub struct HomePage {
    ctx: PageContext,
    locators: HomeLocators,
}

impl HomePage {
    /// Create the page over a context with default locators.
    #[must_use]
    pub fn new(ctx: PageContext) -> Self {
        Self {
            ctx,
            locators: HomeLocators::default(),
        }
    }

    /// Override the locators.
    #[must_use]
    pub fn with_locators(mut self, locators: HomeLocators) -> Self {
        self.locators = locators;
        self
    }

    /// The page's locators.
    #[must_use]
    pub const fn locators(&self) -> &HomeLocators {
        &self.locators
    }

    /// Navigate to the homepage and require it to load.
    pub async fn open(&self, base_url: &str) -> TantearResult<()> {
        self.ctx.open_url(base_url).await?;
        if self.is_loaded().await? {
            Ok(())
        } else {
            Err(TantearError::PageNotLoaded {
                page: "Home".into(),
            })
        }
    }

    /// Whether the homepage header is visible.
    pub async fn is_loaded(&self) -> TantearResult<bool> {
        self.ctx.is_page_loaded(&self.locators.header, "Home").await
    }

    /// Type a query into the search input and submit it.
    pub async fn search_item(&self, item: &str) -> TantearResult<()> {
        self.ctx
            .set_value_when_visible(&self.locators.search_input, item)
            .await?;
        self.click_search().await?;
        self.ctx
            .reporter()
            .info(format!("searching for item: {item}"));
        Ok(())
    }

    /// Click the search button.
    pub async fn click_search(&self) -> TantearResult<()> {
        self.ctx
            .click_when_clickable(&self.locators.search_button)
            .await?;
        Ok(())
    }
}
