//! In-process fakes for the browser and HTTP collaborators
//!
//! [`MockDriver`] implements [`QueryResolver`] over a shared element table
//! keyed by selector. Scenarios script the page: install elements, attach
//! click/select side effects, then assert on interaction counts and
//! navigations afterwards. [`MockFetcher`] serves canned JSON for the
//! catalogue client.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::api::{FetchError, JsonFetcher};
use crate::driver::{DriverError, ElementHandle, QueryResolver};
use crate::locator::Locator;

/// A scripted element in the mock page.
#[derive(Debug, Clone)]
pub struct MockElement {
    visible: bool,
    enabled: bool,
    text: String,
    value: String,
    attributes: HashMap<String, String>,
    options: Vec<String>,
}

impl Default for MockElement {
    fn default() -> Self {
        Self::new()
    }
}

impl MockElement {
    /// A visible, enabled element with no text.
    #[must_use]
    pub fn new() -> Self {
        Self {
            visible: true,
            enabled: true,
            text: String::new(),
            value: String::new(),
            attributes: HashMap::new(),
            options: Vec::new(),
        }
    }

    /// Set the element's text content.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Start the element hidden.
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Start the element disabled.
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Set an attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Restrict the options a select accepts, in dropdown order.
    #[must_use]
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }
}

/// A page mutation triggered by clicking or selecting a scripted element.
#[derive(Debug, Clone)]
pub enum ClickEffect {
    /// Make an element visible.
    Show {
        /// Selector key of the target element.
        selector: String,
    },
    /// Hide an element.
    Hide {
        /// Selector key of the target element.
        selector: String,
    },
    /// Enable an element.
    Enable {
        /// Selector key of the target element.
        selector: String,
    },
    /// Replace an element's text.
    SetText {
        /// Selector key of the target element.
        selector: String,
        /// New text content.
        text: String,
    },
    /// Set an attribute on an element.
    SetAttribute {
        /// Selector key of the target element.
        selector: String,
        /// Attribute name.
        name: String,
        /// Attribute value.
        value: String,
    },
}

impl ClickEffect {
    /// Show the element behind `locator`.
    #[must_use]
    pub fn show(locator: &Locator) -> Self {
        Self::Show {
            selector: locator.selector().to_string(),
        }
    }

    /// Hide the element behind `locator`.
    #[must_use]
    pub fn hide(locator: &Locator) -> Self {
        Self::Hide {
            selector: locator.selector().to_string(),
        }
    }

    /// Enable the element behind `locator`.
    #[must_use]
    pub fn enable(locator: &Locator) -> Self {
        Self::Enable {
            selector: locator.selector().to_string(),
        }
    }

    /// Replace the text of the element behind `locator`.
    #[must_use]
    pub fn set_text(locator: &Locator, text: impl Into<String>) -> Self {
        Self::SetText {
            selector: locator.selector().to_string(),
            text: text.into(),
        }
    }

    /// Set an attribute on the element behind `locator`.
    #[must_use]
    pub fn set_attribute(
        locator: &Locator,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::SetAttribute {
            selector: locator.selector().to_string(),
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Default)]
struct DriverState {
    elements: HashMap<String, MockElement>,
    on_click: HashMap<String, Vec<ClickEffect>>,
    on_select: HashMap<String, Vec<ClickEffect>>,
    clicks: HashMap<String, usize>,
    selections: HashMap<String, Vec<String>>,
    navigations: Vec<String>,
    resolve_failure: Option<String>,
}

impl DriverState {
    fn apply(&mut self, effect: &ClickEffect) {
        match effect {
            ClickEffect::Show { selector } => {
                if let Some(element) = self.elements.get_mut(selector) {
                    element.visible = true;
                }
            }
            ClickEffect::Hide { selector } => {
                if let Some(element) = self.elements.get_mut(selector) {
                    element.visible = false;
                }
            }
            ClickEffect::Enable { selector } => {
                if let Some(element) = self.elements.get_mut(selector) {
                    element.enabled = true;
                }
            }
            ClickEffect::SetText { selector, text } => {
                if let Some(element) = self.elements.get_mut(selector) {
                    element.text.clone_from(text);
                }
            }
            ClickEffect::SetAttribute {
                selector,
                name,
                value,
            } => {
                if let Some(element) = self.elements.get_mut(selector) {
                    element.attributes.insert(name.clone(), value.clone());
                }
            }
        }
    }
}

/// Scripted in-process browser.
#[derive(Debug, Clone, Default)]
pub struct MockDriver {
    state: Arc<Mutex<DriverState>>,
}

impl MockDriver {
    /// An empty page with no elements.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DriverState> {
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Install an element under the locator's selector.
    pub fn install(&self, locator: &Locator, element: MockElement) {
        self.lock()
            .elements
            .insert(locator.selector().to_string(), element);
    }

    /// Remove an element, making later handle calls stale.
    pub fn remove(&self, locator: &Locator) {
        self.lock().elements.remove(&locator.selector().to_string());
    }

    /// Script page mutations applied when the element is clicked.
    pub fn on_click(&self, locator: &Locator, effects: Vec<ClickEffect>) {
        self.lock()
            .on_click
            .insert(locator.selector().to_string(), effects);
    }

    /// Script page mutations applied when an option is selected.
    pub fn on_select(&self, locator: &Locator, effects: Vec<ClickEffect>) {
        self.lock()
            .on_select
            .insert(locator.selector().to_string(), effects);
    }

    /// Make every resolve fail with a session error.
    pub fn fail_resolves(&self, message: impl Into<String>) {
        self.lock().resolve_failure = Some(message.into());
    }

    /// How many times the element was clicked.
    #[must_use]
    pub fn click_count(&self, locator: &Locator) -> usize {
        self.lock()
            .clicks
            .get(&locator.selector().to_string())
            .copied()
            .unwrap_or(0)
    }

    /// Option texts selected on the element, in order.
    #[must_use]
    pub fn selected_values(&self, locator: &Locator) -> Vec<String> {
        self.lock()
            .selections
            .get(&locator.selector().to_string())
            .cloned()
            .unwrap_or_default()
    }

    /// URLs navigated to, in order.
    #[must_use]
    pub fn navigations(&self) -> Vec<String> {
        self.lock().navigations.clone()
    }
}

#[async_trait]
impl QueryResolver for MockDriver {
    async fn goto(&self, url: &str) -> Result<(), DriverError> {
        self.lock().navigations.push(url.to_string());
        Ok(())
    }

    async fn resolve(
        &self,
        locator: &Locator,
    ) -> Result<Option<Box<dyn ElementHandle>>, DriverError> {
        let state = self.lock();
        if let Some(message) = &state.resolve_failure {
            return Err(DriverError::Session {
                message: message.clone(),
            });
        }
        let key = locator.selector().to_string();
        if state.elements.contains_key(&key) {
            Ok(Some(Box::new(MockHandle {
                selector: key,
                name: locator.name().to_string(),
                state: Arc::clone(&self.state),
            })))
        } else {
            Ok(None)
        }
    }
}

/// Handle into the shared element table; goes stale when the element is
/// removed.
#[derive(Debug)]
pub struct MockHandle {
    selector: String,
    name: String,
    state: Arc<Mutex<DriverState>>,
}

impl MockHandle {
    fn with_element<T>(
        &self,
        f: impl FnOnce(&MockElement) -> T,
    ) -> Result<T, DriverError> {
        let state = self
            .state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        state
            .elements
            .get(&self.selector)
            .map(f)
            .ok_or_else(|| DriverError::Stale {
                name: self.name.clone(),
            })
    }
}

#[async_trait]
impl ElementHandle for MockHandle {
    async fn is_visible(&self) -> Result<bool, DriverError> {
        self.with_element(|e| e.visible)
    }

    async fn is_enabled(&self) -> Result<bool, DriverError> {
        self.with_element(|e| e.enabled)
    }

    async fn click(&self) -> Result<(), DriverError> {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let element = state
            .elements
            .get(&self.selector)
            .ok_or_else(|| DriverError::Stale {
                name: self.name.clone(),
            })?;
        if !element.enabled {
            return Err(DriverError::Interaction {
                name: self.name.clone(),
                message: "element is disabled".into(),
            });
        }
        *state.clicks.entry(self.selector.clone()).or_insert(0) += 1;
        let effects = state.on_click.get(&self.selector).cloned().unwrap_or_default();
        for effect in &effects {
            state.apply(effect);
        }
        Ok(())
    }

    async fn text(&self) -> Result<String, DriverError> {
        self.with_element(|e| e.text.clone())
    }

    async fn set_value(&self, text: &str) -> Result<(), DriverError> {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let element = state
            .elements
            .get_mut(&self.selector)
            .ok_or_else(|| DriverError::Stale {
                name: self.name.clone(),
            })?;
        if !element.enabled {
            return Err(DriverError::Interaction {
                name: self.name.clone(),
                message: "element is disabled".into(),
            });
        }
        element.value = text.to_string();
        Ok(())
    }

    async fn select_by_visible_text(&self, text: &str) -> Result<(), DriverError> {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let element = state
            .elements
            .get_mut(&self.selector)
            .ok_or_else(|| DriverError::Stale {
                name: self.name.clone(),
            })?;
        if !element.enabled {
            return Err(DriverError::Interaction {
                name: self.name.clone(),
                message: "element is disabled".into(),
            });
        }
        if !element.options.is_empty() && !element.options.iter().any(|o| o == text) {
            return Err(DriverError::Interaction {
                name: self.name.clone(),
                message: format!("no option with text {text:?}"),
            });
        }
        element.value = text.to_string();
        state
            .selections
            .entry(self.selector.clone())
            .or_default()
            .push(text.to_string());
        let effects = state.on_select.get(&self.selector).cloned().unwrap_or_default();
        for effect in &effects {
            state.apply(effect);
        }
        Ok(())
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>, DriverError> {
        if name == "value" {
            return self.with_element(|e| Some(e.value.clone()));
        }
        self.with_element(|e| e.attributes.get(name).cloned())
    }
}

/// Canned-response implementation of [`JsonFetcher`].
#[derive(Debug, Clone)]
pub struct MockFetcher {
    response: MockResponse,
    urls: Arc<Mutex<Vec<String>>>,
}

#[derive(Debug, Clone)]
enum MockResponse {
    Body(serde_json::Value),
    Status { status: u16, body: String },
    Fail(String),
}

impl MockFetcher {
    /// Serve a fixed 2xx JSON body.
    #[must_use]
    pub fn with_body(body: serde_json::Value) -> Self {
        Self {
            response: MockResponse::Body(body),
            urls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Serve a fixed non-2xx status.
    #[must_use]
    pub fn with_status(status: u16, body: impl Into<String>) -> Self {
        Self {
            response: MockResponse::Status {
                status,
                body: body.into(),
            },
            urls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Fail every request at the transport level.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            response: MockResponse::Fail(message.into()),
            urls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Shared log of requested URLs.
    #[must_use]
    pub fn requested_urls(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.urls)
    }
}

#[async_trait]
impl JsonFetcher for MockFetcher {
    async fn fetch_json(&self, url: &str) -> Result<serde_json::Value, FetchError> {
        if let Ok(mut urls) = self.urls.lock() {
            urls.push(url.to_string());
        }
        match &self.response {
            MockResponse::Body(body) => Ok(body.clone()),
            MockResponse::Status { status, body } => Err(FetchError::Status {
                status: *status,
                body: body.clone(),
            }),
            MockResponse::Fail(message) => Err(FetchError::Transport {
                message: message.clone(),
            }),
        }
    }
}
