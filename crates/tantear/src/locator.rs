//! Declarative element locators.
//!
//! A [`Locator`] pairs a selector with the human-readable element name used
//! in reporter messages ("Search Button", "Category Dropdown Button"). Page
//! objects keep their locators in plain configuration structs so a page has
//! exactly one canonical definition, parameterized by selectors.

use serde::{Deserialize, Serialize};

/// Selector for locating an element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Selector {
    /// CSS selector (e.g., `button.primary`).
    Css(String),
    /// XPath selector.
    XPath(String),
    /// First element whose text content contains the given string.
    TextContains(String),
    /// CSS selector filtered by text content.
    CssWithText {
        /// Base CSS selector.
        css: String,
        /// Text content to match.
        text: String,
    },
}

impl Selector {
    /// Create a CSS selector.
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Create an XPath selector.
    #[must_use]
    pub fn xpath(selector: impl Into<String>) -> Self {
        Self::XPath(selector.into())
    }

    /// Create a text-content selector.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::TextContains(text.into())
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Css(s) => write!(f, "css={s}"),
            Self::XPath(s) => write!(f, "xpath={s}"),
            Self::TextContains(t) => write!(f, "text*={t}"),
            Self::CssWithText { css, text } => write!(f, "css={css} text*={text}"),
        }
    }
}

/// A named element locator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locator {
    selector: Selector,
    name: String,
}

impl Locator {
    /// Create a locator from a selector and a descriptive name.
    #[must_use]
    pub fn new(selector: Selector, name: impl Into<String>) -> Self {
        Self {
            selector,
            name: name.into(),
        }
    }

    /// Shorthand for a named CSS locator.
    #[must_use]
    pub fn css(selector: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(Selector::css(selector), name)
    }

    /// Shorthand for a named XPath locator.
    #[must_use]
    pub fn xpath(selector: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(Selector::xpath(selector), name)
    }

    /// Filter this locator by text content (CSS selectors only).
    #[must_use]
    pub fn with_text(self, text: impl Into<String>) -> Self {
        let selector = match self.selector {
            Selector::Css(css) => Selector::CssWithText {
                css,
                text: text.into(),
            },
            other => other,
        };
        Self {
            selector,
            name: self.name,
        }
    }

    /// The underlying selector.
    #[must_use]
    pub const fn selector(&self) -> &Selector {
        &self.selector
    }

    /// The human-readable element name used in reports.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}]", self.name, self.selector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_constructors() {
        assert_eq!(Selector::css("button"), Selector::Css("button".into()));
        assert_eq!(Selector::xpath("//h1"), Selector::XPath("//h1".into()));
        assert_eq!(
            Selector::text("View"),
            Selector::TextContains("View".into())
        );
    }

    #[test]
    fn test_selector_display() {
        assert_eq!(format!("{}", Selector::css("h1.title")), "css=h1.title");
        assert_eq!(format!("{}", Selector::xpath("//h1")), "xpath=//h1");
        assert_eq!(format!("{}", Selector::text("View")), "text*=View");
    }

    #[test]
    fn test_locator_name_and_display() {
        let locator = Locator::css("button[type='submit']", "Search Button");
        assert_eq!(locator.name(), "Search Button");
        assert_eq!(
            format!("{locator}"),
            "Search Button [css=button[type='submit']]"
        );
    }

    #[test]
    fn test_with_text_combines_css() {
        let locator = Locator::css("span", "Property Option").with_text("Property");
        assert_eq!(
            locator.selector(),
            &Selector::CssWithText {
                css: "span".into(),
                text: "Property".into()
            }
        );
    }

    #[test]
    fn test_with_text_keeps_non_css() {
        let locator = Locator::xpath("//span", "Option").with_text("ignored");
        assert_eq!(locator.selector(), &Selector::XPath("//span".into()));
    }
}
