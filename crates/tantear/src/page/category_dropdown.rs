//! Category dropdown of the search refinement bar.

use crate::catalog::Category;
use crate::locator::Locator;
use crate::page::{probes, PageContext};
use crate::result::{TantearError, TantearResult};

/// The category dropdown on the search results page.
///
/// Expanding is a verified action: the click only counts once the button's
/// `aria-expanded` attribute reads `"true"`.
#[derive(Debug, Clone)]
pub struct CategoryDropdown {
    ctx: PageContext,
    button: Locator,
}

impl CategoryDropdown {
    /// Create the component over a context with the default button locator.
    #[must_use]
    pub fn new(ctx: PageContext) -> Self {
        Self {
            ctx,
            button: Locator::xpath(
                r#"//button[contains(@class, "tm-drop-down-tag__dropdown-button") and contains(.,"Category")]"#,
                "Category Dropdown Button",
            ),
        }
    }

    /// The dropdown toggle's locator.
    #[must_use]
    pub const fn button(&self) -> &Locator {
        &self.button
    }

    /// The locator of the option row for `category`.
    #[must_use]
    pub fn option_locator(category: Category) -> Locator {
        let label = category.menu_label();
        Locator::xpath(
            format!(r#"//span[contains(text(), "{label}")]"#),
            format!("{label} Option"),
        )
    }

    /// Expand the dropdown and click the option for `category`.
    pub async fn select(&self, category: Category) -> TantearResult<()> {
        let label = category.menu_label();
        self.ctx
            .reporter()
            .info(format!("selecting category {label:?} from the dropdown"));

        self.expand().await?;

        let option = Self::option_locator(category);
        let displayed = match self.ctx.driver().resolve(&option).await? {
            Some(handle) => handle.is_visible().await?,
            None => false,
        };
        if !displayed {
            self.ctx
                .reporter()
                .error(format!("option {label:?} is NOT displayed in the dropdown"));
            return Err(TantearError::OptionNotFound {
                option: label.to_string(),
            });
        }

        self.ctx.click_when_clickable(&option).await?;
        self.ctx
            .reporter()
            .info(format!("category option {label:?} selected"));
        Ok(())
    }

    /// Click the dropdown button and verify it reports itself expanded.
    async fn expand(&self) -> TantearResult<()> {
        let driver = self.ctx.driver();
        let target = self.button.clone();
        let spec = crate::action::ActionSpec::new(
            "expand category dropdown",
            move || async move {
                let handle = crate::driver::resolve_required(driver.as_ref(), &target).await?;
                handle.click().await
            },
        )
        .with_precondition(
            probes::clickable(self.ctx.driver(), self.button.clone()),
            self.ctx.interaction_spec("category dropdown button is clickable"),
        )
        .with_postcondition(
            probes::attribute_eq(self.ctx.driver(), self.button.clone(), "aria-expanded", "true"),
            self.ctx.interaction_spec("category dropdown is open"),
        );
        self.ctx.perform(spec).await?;
        self.ctx.reporter().info("category dropdown expanded");
        Ok(())
    }
}
