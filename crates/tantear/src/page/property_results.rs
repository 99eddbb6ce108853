//! Property results page reached through the "View Results" footer button.

use crate::action::ActionSpec;
use crate::catalog::{Category, Region};
use crate::driver::resolve_required;
use crate::locator::Locator;
use crate::page::{probes, PageContext};
use crate::result::TantearResult;

/// The header text the results page shows for a region/district choice.
///
/// "All Locations" collapses to plain "Properties"; an "All of {region}"
/// district is the same as the region itself.
#[must_use]
pub fn expected_results_header(region: &str, district: Option<&str>) -> String {
    if region == "All Locations" {
        return "Properties".to_string();
    }
    match district {
        Some(district) if district != format!("All of {region}") => {
            format!("{district} Properties")
        }
        _ => format!("{region} Properties"),
    }
}

/// The property search results page.
#[derive(Debug, Clone)]
pub struct PropertyResultsPage {
    ctx: PageContext,
    view_results_button: Locator,
    results_header: Locator,
}

impl PropertyResultsPage {
    /// Create the page over a context with default locators.
    #[must_use]
    pub fn new(ctx: PageContext) -> Self {
        Self {
            ctx,
            view_results_button: Locator::xpath(
                r#"//button[contains(@class, "tm-drop-down-tag__dropdown-footer-button") and contains(text(), "View")]"#,
                "View Results Button",
            ),
            results_header: Locator::css("tm-search-header-heading h1", "Results Header"),
        }
    }

    /// The "View Results" footer button's locator.
    #[must_use]
    pub const fn view_results_button(&self) -> &Locator {
        &self.view_results_button
    }

    /// The results header's locator.
    #[must_use]
    pub const fn results_header(&self) -> &Locator {
        &self.results_header
    }

    /// The locator of the `<h1>` carrying a category display name.
    #[must_use]
    pub fn header_locator(label: &str) -> Locator {
        Locator::xpath(
            format!(r#"//h1[contains(text(), "{label}")]"#),
            format!("{label} Header"),
        )
    }

    /// Whether the results page header carries one of the category's display
    /// names. Labels are tried in order, each with its own budget.
    pub async fn is_category_results_loaded(&self, category: Category) -> TantearResult<bool> {
        let labels = category.display_names();
        self.ctx.reporter().info(format!(
            "expected labels for category {:?}: {}",
            category.menu_label(),
            labels.join(", ")
        ));

        for label in labels {
            let probe = probes::visible(self.ctx.driver(), Self::header_locator(label));
            let spec = self
                .ctx
                .interaction_spec(format!("results header shows {label:?}"));
            if self.ctx.wait_for(&probe, &spec).await?.is_satisfied() {
                self.ctx
                    .reporter()
                    .info(format!("results page for category {label:?} loaded"));
                return Ok(true);
            }
            self.ctx
                .reporter()
                .info(format!("{label:?} not found, checking next label"));
        }

        self.ctx.reporter().error(format!(
            "none of the expected labels ({}) found on the results page",
            labels.join(", ")
        ));
        Ok(false)
    }

    /// Click "View Results" and verify the header matches the chosen
    /// region/district before returning.
    pub async fn click_view_results(
        &self,
        region: Region,
        district: Option<&str>,
    ) -> TantearResult<()> {
        let expected = expected_results_header(region.label(), district);
        self.ctx.reporter().info(format!(
            "waiting for the results page header {expected:?}"
        ));

        let driver = self.ctx.driver();
        let target = self.view_results_button.clone();
        let spec = ActionSpec::new("click view results", move || async move {
            let handle = resolve_required(driver.as_ref(), &target).await?;
            handle.click().await
        })
        .with_precondition(
            probes::clickable(self.ctx.driver(), self.view_results_button.clone()),
            self.ctx
                .interaction_spec("view results button is clickable"),
        )
        .with_postcondition(
            probes::text_equals(self.ctx.driver(), self.results_header.clone(), expected.clone()),
            self.ctx
                .interaction_spec(format!("results header equals {expected:?}")),
        );
        self.ctx.perform(spec).await?;

        self.ctx
            .reporter()
            .info(format!("results page loaded with header {expected:?}"));
        Ok(())
    }
}
