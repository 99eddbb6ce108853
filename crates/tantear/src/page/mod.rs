//! Page objects for the marketplace UI.
//!
//! Every page object composes one [`PageContext`]: the driver handle, the
//! reporter, the wait engine, and the verified-action runner of the current
//! flow. Pages own their locators as plain data, so each page has exactly one
//! canonical definition, and all interaction goes through the context's
//! wait-guarded helpers.

pub mod category_dropdown;
pub mod home;
pub mod listing_details;
pub mod location_dropdown;
pub mod probes;
pub mod property_results;
pub mod search_results;

pub use category_dropdown::CategoryDropdown;
pub use home::HomePage;
pub use listing_details::{ListingDetails, ListingSummary};
pub use location_dropdown::LocationDropdown;
pub use property_results::PropertyResultsPage;
pub use search_results::SearchResultsPage;

use std::sync::Arc;

use crate::action::{ActionOutcome, ActionRunner, ActionSpec};
use crate::driver::{resolve_required, QueryResolver};
use crate::locator::Locator;
use crate::reporter::Reporter;
use crate::result::TantearResult;
use crate::wait::{Cancellation, Probe, WaitOutcome, WaitSpec, Waiter};

/// Budget for a page's key element to show up after navigation.
pub const PAGE_LOAD_TIMEOUT_MS: u64 = 10_000;

/// Budget for element-level conditions (clickable, expanded, enabled).
pub const INTERACTION_TIMEOUT_MS: u64 = 5_000;

/// Poll interval for page-level waits.
pub const POLL_INTERVAL_MS: u64 = 1_000;

/// Shared collaborators of one page-driven flow.
///
/// Cheap to clone; clones share the driver, the reporter stream, and the
/// cancellation flag.
#[derive(Clone)]
pub struct PageContext {
    driver: Arc<dyn QueryResolver>,
    reporter: Reporter,
    waiter: Waiter,
    runner: ActionRunner,
    cancel: Cancellation,
}

impl std::fmt::Debug for PageContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageContext")
            .field("flow", &self.reporter.flow())
            .finish_non_exhaustive()
    }
}

impl PageContext {
    /// Create a context over a driver, reporting into `reporter`.
    #[must_use]
    pub fn new(driver: Arc<dyn QueryResolver>, reporter: Reporter) -> Self {
        Self {
            driver,
            waiter: Waiter::new(reporter.clone()),
            runner: ActionRunner::new(reporter.clone()),
            reporter,
            cancel: Cancellation::new(),
        }
    }

    /// Share an externally owned cancellation flag.
    #[must_use]
    pub fn with_cancellation(mut self, cancel: Cancellation) -> Self {
        self.cancel = cancel;
        self
    }

    /// The driver collaborator.
    #[must_use]
    pub fn driver(&self) -> Arc<dyn QueryResolver> {
        Arc::clone(&self.driver)
    }

    /// The flow's reporter.
    #[must_use]
    pub const fn reporter(&self) -> &Reporter {
        &self.reporter
    }

    /// The flow's cancellation flag.
    #[must_use]
    pub const fn cancellation(&self) -> &Cancellation {
        &self.cancel
    }

    /// Element-level wait spec with the page-layer timeout and interval.
    #[must_use]
    pub fn interaction_spec(&self, description: impl Into<String>) -> WaitSpec {
        WaitSpec::new(description)
            .with_timeout(INTERACTION_TIMEOUT_MS)
            .with_interval(POLL_INTERVAL_MS)
    }

    /// Navigate the session to `url`.
    pub async fn open_url(&self, url: &str) -> TantearResult<()> {
        self.driver.goto(url).await?;
        self.reporter.info(format!("navigated to {url}"));
        Ok(())
    }

    /// Run a wait against the flow's engine and cancellation flag.
    pub async fn wait_for<P>(&self, probe: &P, spec: &WaitSpec) -> TantearResult<WaitOutcome>
    where
        P: Probe + ?Sized,
    {
        Ok(self.waiter.wait(probe, spec, &self.cancel).await?)
    }

    /// Run a verified action against the flow's runner.
    pub async fn perform(&self, spec: ActionSpec) -> TantearResult<ActionOutcome> {
        Ok(self.runner.perform(spec, &self.cancel).await?)
    }

    /// Whether a page's key element becomes visible within the page-load
    /// budget. A missing page is a `false`, not an error.
    pub async fn is_page_loaded(&self, key_element: &Locator, page: &str) -> TantearResult<bool> {
        let probe = probes::visible(self.driver(), key_element.clone());
        let spec = WaitSpec::new(format!("{page} page key element visible"))
            .with_timeout(PAGE_LOAD_TIMEOUT_MS)
            .with_interval(POLL_INTERVAL_MS);
        let outcome = self.wait_for(&probe, &spec).await?;
        if outcome.is_satisfied() {
            self.reporter.info(format!("{page} page is loaded"));
            Ok(true)
        } else {
            self.reporter.error(format!("{page} page is NOT loaded"));
            Ok(false)
        }
    }

    /// Click once the element is both visible and enabled.
    pub async fn click_when_clickable(&self, locator: &Locator) -> TantearResult<ActionOutcome> {
        let driver = self.driver();
        let target = locator.clone();
        let spec = ActionSpec::new(format!("click {}", locator.name()), move || async move {
            let handle = resolve_required(driver.as_ref(), &target).await?;
            handle.click().await
        })
        .with_precondition(
            probes::clickable(self.driver(), locator.clone()),
            self.interaction_spec(format!("{} is clickable", locator.name())),
        );
        self.perform(spec).await
    }

    /// Replace an input's value once the element is visible.
    pub async fn set_value_when_visible(
        &self,
        locator: &Locator,
        value: impl Into<String>,
    ) -> TantearResult<ActionOutcome> {
        let driver = self.driver();
        let target = locator.clone();
        let value = value.into();
        let spec = ActionSpec::new(format!("set {}", locator.name()), move || async move {
            let handle = resolve_required(driver.as_ref(), &target).await?;
            handle.set_value(&value).await
        })
        .with_precondition(
            probes::visible(self.driver(), locator.clone()),
            self.interaction_spec(format!("{} is visible", locator.name())),
        );
        self.perform(spec).await
    }

    /// Select a dropdown option by visible text once the select is enabled.
    pub async fn select_when_enabled(
        &self,
        locator: &Locator,
        option: impl Into<String>,
    ) -> TantearResult<ActionOutcome> {
        let driver = self.driver();
        let target = locator.clone();
        let option = option.into();
        let name = format!("select {:?} in {}", option, locator.name());
        let spec = ActionSpec::new(name, move || async move {
            let handle = resolve_required(driver.as_ref(), &target).await?;
            handle.select_by_visible_text(&option).await
        })
        .with_precondition(
            probes::enabled(self.driver(), locator.clone()),
            self.interaction_spec(format!("{} is enabled", locator.name())),
        );
        self.perform(spec).await
    }

    /// Wait for the element to be visible, then read its text.
    pub async fn read_text_when_visible(
        &self,
        locator: &Locator,
        timeout_ms: u64,
    ) -> TantearResult<String> {
        let probe = probes::visible(self.driver(), locator.clone());
        let spec = WaitSpec::new(format!("{} is visible", locator.name()))
            .with_timeout(timeout_ms)
            .with_interval(POLL_INTERVAL_MS);
        self.wait_for(&probe, &spec).await?.require()?;
        let handle = resolve_required(self.driver.as_ref(), locator).await?;
        Ok(handle.text().await?)
    }
}
