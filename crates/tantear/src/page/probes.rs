//! Element-state probes used as wait conditions and action guards.
//!
//! Each probe re-resolves its locator on every poll, so a stale handle never
//! leaks across iterations. An absent element is `false`, not an error.

use std::sync::Arc;

use crate::driver::QueryResolver;
use crate::locator::Locator;
use crate::wait::{FnProbe, Probe};

/// The element resolves and is displayed.
pub fn visible(driver: Arc<dyn QueryResolver>, locator: Locator) -> impl Probe {
    FnProbe::new(move || {
        let driver = Arc::clone(&driver);
        let locator = locator.clone();
        async move {
            match driver.resolve(&locator).await? {
                Some(handle) => handle.is_visible().await,
                None => Ok(false),
            }
        }
    })
}

/// The element resolves and accepts interaction.
pub fn enabled(driver: Arc<dyn QueryResolver>, locator: Locator) -> impl Probe {
    FnProbe::new(move || {
        let driver = Arc::clone(&driver);
        let locator = locator.clone();
        async move {
            match driver.resolve(&locator).await? {
                Some(handle) => handle.is_enabled().await,
                None => Ok(false),
            }
        }
    })
}

/// The element is both displayed and enabled.
pub fn clickable(driver: Arc<dyn QueryResolver>, locator: Locator) -> impl Probe {
    FnProbe::new(move || {
        let driver = Arc::clone(&driver);
        let locator = locator.clone();
        async move {
            match driver.resolve(&locator).await? {
                Some(handle) => Ok(handle.is_visible().await? && handle.is_enabled().await?),
                None => Ok(false),
            }
        }
    })
}

/// The element's attribute equals `expected` (absent attribute is `false`).
pub fn attribute_eq(
    driver: Arc<dyn QueryResolver>,
    locator: Locator,
    attribute: impl Into<String>,
    expected: impl Into<String>,
) -> impl Probe {
    let attribute = attribute.into();
    let expected = expected.into();
    FnProbe::new(move || {
        let driver = Arc::clone(&driver);
        let locator = locator.clone();
        let attribute = attribute.clone();
        let expected = expected.clone();
        async move {
            match driver.resolve(&locator).await? {
                Some(handle) => {
                    Ok(handle.attribute(&attribute).await?.as_deref() == Some(expected.as_str()))
                }
                None => Ok(false),
            }
        }
    })
}

/// The element's text equals `expected` exactly.
pub fn text_equals(
    driver: Arc<dyn QueryResolver>,
    locator: Locator,
    expected: impl Into<String>,
) -> impl Probe {
    let expected = expected.into();
    FnProbe::new(move || {
        let driver = Arc::clone(&driver);
        let locator = locator.clone();
        let expected = expected.clone();
        async move {
            match driver.resolve(&locator).await? {
                Some(handle) => Ok(handle.text().await? == expected),
                None => Ok(false),
            }
        }
    })
}

/// The element's text contains `needle`.
pub fn text_contains(
    driver: Arc<dyn QueryResolver>,
    locator: Locator,
    needle: impl Into<String>,
) -> impl Probe {
    let needle = needle.into();
    FnProbe::new(move || {
        let driver = Arc::clone(&driver);
        let locator = locator.clone();
        let needle = needle.clone();
        async move {
            match driver.resolve(&locator).await? {
                Some(handle) => Ok(handle.text().await?.contains(&needle)),
                None => Ok(false),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockDriver, MockElement};

    fn arc(driver: MockDriver) -> Arc<dyn QueryResolver> {
        Arc::new(driver)
    }

    #[tokio::test]
    async fn test_visible_absent_is_false() {
        let driver = arc(MockDriver::new());
        let probe = visible(driver, Locator::css("h1", "Header"));
        assert!(!probe.check().await.unwrap());
    }

    #[tokio::test]
    async fn test_clickable_requires_visible_and_enabled() {
        let driver = MockDriver::new();
        let button = Locator::css("button", "Button");
        driver.install(&button, MockElement::new().disabled());
        let probe = clickable(arc(driver.clone()), button.clone());
        assert!(!probe.check().await.unwrap());

        driver.install(&button, MockElement::new());
        assert!(probe.check().await.unwrap());
    }

    #[tokio::test]
    async fn test_attribute_eq_absent_attribute_is_false() {
        let driver = MockDriver::new();
        let button = Locator::css("button", "Button");
        driver.install(&button, MockElement::new());
        let probe = attribute_eq(
            arc(driver.clone()),
            button.clone(),
            "aria-expanded",
            "true",
        );
        assert!(!probe.check().await.unwrap());

        driver.install(
            &button,
            MockElement::new().with_attribute("aria-expanded", "true"),
        );
        assert!(probe.check().await.unwrap());
    }

    #[tokio::test]
    async fn test_text_probes() {
        let driver = MockDriver::new();
        let header = Locator::css("h1", "Header");
        driver.install(
            &header,
            MockElement::new().with_text("Wellington Properties"),
        );
        let exact = text_equals(
            arc(driver.clone()),
            header.clone(),
            "Wellington Properties",
        );
        let partial = text_contains(arc(driver.clone()), header.clone(), "Properties");
        let wrong = text_equals(arc(driver), header, "Properties");
        assert!(exact.check().await.unwrap());
        assert!(partial.check().await.unwrap());
        assert!(!wrong.check().await.unwrap());
    }

    #[tokio::test]
    async fn test_probe_surfaces_resolver_failure() {
        let driver = MockDriver::new();
        driver.fail_resolves("session lost");
        let probe = visible(arc(driver), Locator::css("h1", "Header"));
        assert!(probe.check().await.is_err());
    }
}
