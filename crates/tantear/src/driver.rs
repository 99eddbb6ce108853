//! Query Resolver - Abstract Browser Collaborator Boundary
//!
//! The browser is an external collaborator: this crate consumes element
//! query/click/read/navigate capabilities through the [`QueryResolver`] and
//! [`ElementHandle`] traits and never implements a browser engine. The trait
//! boundary lets tests run against the in-process [`crate::mock::MockDriver`]
//! while a real deployment binds a WebDriver- or CDP-backed implementation.
//!
//! Resolution distinguishes "element absent" (`Ok(None)`, an expected
//! non-exceptional state) from "query mechanism broken" (`Err`, which the
//! wait engine surfaces as a probe failure).

use async_trait::async_trait;
use thiserror::Error;

use crate::locator::Locator;

/// Failures at the browser-driver boundary, surfaced unchanged to the core.
#[derive(Debug, Error)]
pub enum DriverError {
    /// Navigation to a URL failed.
    #[error("navigation to {url} failed: {message}")]
    Navigation {
        /// The URL that failed to load.
        url: String,
        /// Driver-level failure message.
        message: String,
    },

    /// An element that a previous wait established is no longer present.
    #[error("element {name} not present")]
    NotFound {
        /// The element's descriptive name.
        name: String,
    },

    /// A handle refers to an element that has been detached.
    #[error("stale element handle for {name}")]
    Stale {
        /// The element's descriptive name.
        name: String,
    },

    /// An interaction (click, set value, select) failed.
    #[error("error interacting with {name}: {message}")]
    Interaction {
        /// The element's descriptive name.
        name: String,
        /// Driver-level failure message.
        message: String,
    },

    /// The browser session itself is broken.
    #[error("browser session error: {message}")]
    Session {
        /// Driver-level failure message.
        message: String,
    },
}

/// A live handle to a resolved element.
///
/// Each capability may fail with a [`DriverError`], which the wait engine
/// treats as "condition unevaluable" and the action layer as an effect
/// failure.
#[async_trait]
pub trait ElementHandle: Send + Sync + std::fmt::Debug {
    /// Whether the element is currently displayed.
    async fn is_visible(&self) -> Result<bool, DriverError>;

    /// Whether the element accepts interaction.
    async fn is_enabled(&self) -> Result<bool, DriverError>;

    /// Click the element.
    async fn click(&self) -> Result<(), DriverError>;

    /// Read the element's text content.
    async fn text(&self) -> Result<String, DriverError>;

    /// Replace the element's value (input fields).
    async fn set_value(&self, text: &str) -> Result<(), DriverError>;

    /// Select the option with the given visible text (select elements).
    async fn select_by_visible_text(&self, text: &str) -> Result<(), DriverError>;

    /// Read an attribute, `None` when the attribute is absent.
    async fn attribute(&self, name: &str) -> Result<Option<String>, DriverError>;
}

/// The query-resolution capability of the browser collaborator.
#[async_trait]
pub trait QueryResolver: Send + Sync {
    /// Navigate the session to a URL.
    async fn goto(&self, url: &str) -> Result<(), DriverError>;

    /// Resolve a locator to zero-or-one live handle.
    ///
    /// `Ok(None)` means the element is currently absent; `Err` means the
    /// query mechanism itself failed.
    async fn resolve(&self, locator: &Locator)
        -> Result<Option<Box<dyn ElementHandle>>, DriverError>;
}

/// Resolve a locator that an earlier wait established as present, converting
/// absence into [`DriverError::NotFound`].
pub async fn resolve_required(
    driver: &dyn QueryResolver,
    locator: &Locator,
) -> Result<Box<dyn ElementHandle>, DriverError> {
    driver
        .resolve(locator)
        .await?
        .ok_or_else(|| DriverError::NotFound {
            name: locator.name().to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockDriver, MockElement};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_resolve_required_present() {
        let driver = MockDriver::new();
        let locator = Locator::css("h1", "Header");
        driver.install(&locator, MockElement::new().with_text("hello"));

        let driver: Arc<dyn QueryResolver> = Arc::new(driver);
        let handle = resolve_required(driver.as_ref(), &locator).await.unwrap();
        assert_eq!(handle.text().await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn test_resolve_required_absent_is_not_found() {
        let driver = MockDriver::new();
        let locator = Locator::css("h1", "Header");
        let err = resolve_required(&driver, &locator).await.unwrap_err();
        assert!(matches!(err, DriverError::NotFound { name } if name == "Header"));
    }

    #[test]
    fn test_error_messages() {
        let err = DriverError::Interaction {
            name: "Search Button".into(),
            message: "element intercepted".into(),
        };
        assert_eq!(
            err.to_string(),
            "error interacting with Search Button: element intercepted"
        );
    }
}
