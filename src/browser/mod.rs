//! Browser abstraction.
//!
//! The page processor only talks to these traits, so the pipeline can run
//! against headless Chromium in production and against an in-memory fake in
//! tests.

mod chromium;

use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::config::ScreenshotSettings;
use crate::error_handling::PageError;

pub use chromium::{BrowserSettings, ChromiumSession};

/// Per-page navigation limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageOptions {
    pub navigation_timeout: Duration,
    /// Largest declared response size in bytes; 0 disables the guard
    pub max_page_size: u64,
}

/// Opens pages on a shared browser.
#[async_trait]
pub trait PageProvider: Send + Sync {
    /// Opens a fresh blank page. The caller owns it and must close it.
    async fn open_page(&self) -> Result<Box<dyn AuditPage>, PageError>;

    /// Closes the browser. Safe to call more than once.
    async fn shutdown(&self);
}

/// One open page.
#[async_trait]
pub trait AuditPage: Send {
    /// Navigates to `url` and waits for the load to finish.
    ///
    /// Fails with `NavigationTimeout` when the load exceeds the timeout,
    /// `NotHtml` when the main document is not HTML and `PageTooLarge` when a
    /// response declares more bytes than the limit.
    async fn navigate(&mut self, url: &Url, options: &PageOptions) -> Result<(), PageError>;

    /// Captures a full-page screenshot.
    async fn screenshot(&mut self, settings: &ScreenshotSettings) -> Result<Vec<u8>, PageError>;

    /// Evaluates a script expression, awaiting a returned promise, and returns
    /// its JSON value.
    async fn evaluate(&mut self, expression: &str) -> Result<serde_json::Value, PageError>;

    /// Declared size of the first response that exceeded the page size limit
    /// since navigation started, if any.
    fn size_violation(&self) -> Option<u64>;

    /// Closes the page and stops watching its responses.
    async fn close(&mut self) -> Result<(), PageError>;
}
