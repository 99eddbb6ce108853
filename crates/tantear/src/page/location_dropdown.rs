//! Location dropdown of the search refinement bar.

use crate::action::ActionSpec;
use crate::catalog::Region;
use crate::driver::resolve_required;
use crate::locator::Locator;
use crate::page::{probes, PageContext};
use crate::result::TantearResult;

/// Locators for the location dropdown and its nested selects.
#[derive(Debug, Clone)]
pub struct LocationLocators {
    /// The "All Locations" dropdown toggle.
    pub button: Locator,
    /// The region `<select>`.
    pub region_select: Locator,
    /// The district `<select>`, disabled until a region with districts is
    /// chosen.
    pub district_select: Locator,
}

impl Default for LocationLocators {
    fn default() -> Self {
        Self {
            button: Locator::xpath(
                r#"//button[contains(@class, "tm-drop-down-tag__dropdown-button") and contains(.,"All Locations")]"#,
                "All Locations Dropdown Button",
            ),
            region_select: Locator::xpath(
                r#"//label[contains(text(), "Region")]/following-sibling::div/select"#,
                "Region Select",
            ),
            district_select: Locator::xpath(
                r#"//label[contains(text(), "District")]/following-sibling::div/select"#,
                "District Select",
            ),
        }
    }
}

/// The location dropdown: region select plus dependent district select.
#[derive(Debug, Clone)]
pub struct LocationDropdown {
    ctx: PageContext,
    locators: LocationLocators,
}

impl LocationDropdown {
    /// Create the component over a context with default locators.
    #[must_use]
    pub fn new(ctx: PageContext) -> Self {
        Self {
            ctx,
            locators: LocationLocators::default(),
        }
    }

    /// Override the locators.
    #[must_use]
    pub fn with_locators(mut self, locators: LocationLocators) -> Self {
        self.locators = locators;
        self
    }

    /// The component's locators.
    #[must_use]
    pub const fn locators(&self) -> &LocationLocators {
        &self.locators
    }

    /// Expand the dropdown, select `region`, and when `district` is given,
    /// wait for the district select to become enabled before selecting it.
    pub async fn select(&self, region: Region, district: Option<&str>) -> TantearResult<()> {
        let reporter = self.ctx.reporter().clone();
        reporter.info(format!(
            "selecting location region {:?} from the dropdown",
            region.label()
        ));

        self.expand().await?;

        self.ctx
            .click_when_clickable(&self.locators.region_select)
            .await?;
        self.ctx
            .select_when_enabled(&self.locators.region_select, region.label())
            .await?;
        reporter.info(format!("region {:?} selected", region.label()));

        if let Some(district) = district {
            reporter.info(format!("selecting district {district:?}"));
            let enabled = probes::enabled(self.ctx.driver(), self.locators.district_select.clone());
            let spec = self.ctx.interaction_spec(format!(
                "district select is enabled for region {:?}",
                region.label()
            ));
            self.ctx.wait_for(&enabled, &spec).await?.require()?;

            self.ctx
                .click_when_clickable(&self.locators.district_select)
                .await?;
            self.ctx
                .select_when_enabled(&self.locators.district_select, district)
                .await?;
            reporter.info(format!("district {district:?} selected"));
        } else {
            reporter.info("no district specified for location selection");
        }
        Ok(())
    }

    async fn expand(&self) -> TantearResult<()> {
        let driver = self.ctx.driver();
        let target = self.locators.button.clone();
        let spec = ActionSpec::new("expand location dropdown", move || async move {
            let handle = resolve_required(driver.as_ref(), &target).await?;
            handle.click().await
        })
        .with_precondition(
            probes::clickable(self.ctx.driver(), self.locators.button.clone()),
            self.ctx.interaction_spec("location dropdown button is clickable"),
        )
        .with_postcondition(
            probes::attribute_eq(
                self.ctx.driver(),
                self.locators.button.clone(),
                "aria-expanded",
                "true",
            ),
            self.ctx.interaction_spec("location dropdown is open"),
        );
        self.ctx.perform(spec).await?;
        self.ctx.reporter().info("location dropdown expanded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{ClickEffect, MockDriver, MockElement};
    use crate::reporter::Reporter;
    use crate::result::TantearError;
    use std::sync::Arc;

    fn component(driver: &MockDriver) -> LocationDropdown {
        LocationDropdown::new(PageContext::new(
            Arc::new(driver.clone()),
            Reporter::new(),
        ))
    }

    #[tokio::test(start_paused = true)]
    async fn test_region_only_selection() {
        let driver = MockDriver::new();
        let component = component(&driver);
        let locators = component.locators.clone();
        driver.install(&locators.button, MockElement::new());
        driver.on_click(
            &locators.button,
            vec![ClickEffect::set_attribute(&locators.button, "aria-expanded", "true")],
        );
        driver.install(
            &locators.region_select,
            MockElement::new().with_options(["New Zealand", "North Island", "Northland", "Wellington"]),
        );

        component.select(Region::NewZealand, None).await.unwrap();
        assert_eq!(
            driver.selected_values(&locators.region_select),
            vec!["New Zealand"]
        );
        assert!(driver.selected_values(&locators.district_select).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_district_waits_for_enablement() {
        let driver = MockDriver::new();
        let component = component(&driver);
        let locators = component.locators.clone();
        driver.install(&locators.button, MockElement::new());
        driver.on_click(
            &locators.button,
            vec![ClickEffect::set_attribute(&locators.button, "aria-expanded", "true")],
        );
        driver.install(
            &locators.region_select,
            MockElement::new().with_options(["Wellington"]),
        );
        // district select starts disabled; choosing a region enables it
        driver.install(
            &locators.district_select,
            MockElement::new()
                .disabled()
                .with_options(Region::Wellington.districts().iter().copied().map(String::from)),
        );
        driver.on_select(
            &locators.region_select,
            vec![ClickEffect::enable(&locators.district_select)],
        );

        component
            .select(Region::Wellington, Some("All of Wellington"))
            .await
            .unwrap();
        assert_eq!(
            driver.selected_values(&locators.district_select),
            vec!["All of Wellington"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_district_never_enabled_times_out() {
        let driver = MockDriver::new();
        let component = component(&driver);
        let locators = component.locators.clone();
        driver.install(&locators.button, MockElement::new());
        driver.on_click(
            &locators.button,
            vec![ClickEffect::set_attribute(&locators.button, "aria-expanded", "true")],
        );
        driver.install(
            &locators.region_select,
            MockElement::new().with_options(["Wellington"]),
        );
        driver.install(&locators.district_select, MockElement::new().disabled());

        let err = component
            .select(Region::Wellington, Some("Porirua"))
            .await
            .unwrap_err();
        assert!(matches!(err, TantearError::ConditionTimeout { .. }));
        assert!(driver.selected_values(&locators.district_select).is_empty());
    }
}
