//! Tantear: Wait-and-Verify Test Automation for Classifieds Marketplaces
//!
//! Tantear (Spanish: "to probe / test the waters") drives a classifieds
//! marketplace site through page objects and exercises its public categories
//! API, built around one reusable mechanism: wait for a condition to hold
//! within a bounded time budget, perform an action, then verify its expected
//! post-condition.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                    TANTEAR Architecture                          │
//! ├──────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌──────────────────┐       │
//! │   │ Scenario   │───►│ Verified   │───►│ Query Resolver   │       │
//! │   │ (test)     │    │ Action     │    │ (browser driver) │       │
//! │   └────────────┘    └─────┬──────┘    └──────────────────┘       │
//! │                           │                                      │
//! │                     ┌─────▼──────┐    ┌──────────────────┐       │
//! │                     │ Condition- │    │ Outcome Reporter │       │
//! │                     │ Wait Engine│───►│ (event stream)   │       │
//! │                     └────────────┘    └──────────────────┘       │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The browser driver and HTTP client are external collaborators behind the
//! [`driver::QueryResolver`] and [`api::JsonFetcher`] traits; this crate
//! implements the polling and verification contract, the page objects, and
//! the categories API wrapper, never a browser engine or HTTP stack.

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

pub mod action;
pub mod api;
pub mod catalog;
pub mod config;
pub mod driver;
pub mod locator;
pub mod mock;
pub mod page;
pub mod reporter;
pub mod result;
pub mod wait;

pub use action::{ActionError, ActionOutcome, ActionRunner, ActionSpec};
pub use api::{CategoriesApi, CategoryListing, FetchError, HttpFetcher, JsonFetcher, Subcategory};
pub use catalog::{Category, Region};
pub use config::SuiteConfig;
pub use driver::{DriverError, ElementHandle, QueryResolver};
pub use locator::{Locator, Selector};
pub use page::{
    CategoryDropdown, HomePage, ListingDetails, ListingSummary, LocationDropdown, PageContext,
    PropertyResultsPage, SearchResultsPage,
};
pub use reporter::{Event, EventLevel, Reporter};
pub use result::{TantearError, TantearResult};
pub use wait::{
    Cancellation, FnProbe, Probe, WaitOutcome, WaitSpec, Waiter, DEFAULT_POLL_INTERVAL_MS,
    DEFAULT_WAIT_TIMEOUT_MS,
};
