// Shared test helpers: an in-memory page provider and run configuration.
//
// The fake provider records when each page is opened and how many pages are
// open at once, so scheduling limits can be checked without a browser.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::{json, Value};
use url::Url;

use a11y_reporter::browser::{AuditPage, PageOptions, PageProvider};
use a11y_reporter::config::{Config, ScreenshotSettings};
use a11y_reporter::error_handling::PageError;

/// What the fake browser observed during a run.
#[derive(Default)]
pub struct FakeState {
    /// Navigations, in order
    pub opened: Mutex<Vec<(String, Instant)>>,
    pub max_in_flight: AtomicUsize,
    pub max_per_host: AtomicUsize,
    /// Pages closed, whether or not their navigation succeeded
    pub closed: AtomicUsize,
    pub shutdowns: AtomicUsize,
    in_flight: AtomicUsize,
    per_host: Mutex<HashMap<String, usize>>,
}

impl FakeState {
    fn enter(&self, host: &str) {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        let mut per_host = self.per_host.lock().unwrap();
        let count = per_host.entry(host.to_string()).or_insert(0);
        *count += 1;
        self.max_per_host.fetch_max(*count, Ordering::SeqCst);
    }

    fn leave(&self, host: &str) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        if let Some(count) = self.per_host.lock().unwrap().get_mut(host) {
            *count -= 1;
        }
    }

    /// Open timestamps for one URL, in the order pages were opened.
    pub fn opened_at(&self, url: &str) -> Vec<Instant> {
        self.opened
            .lock()
            .unwrap()
            .iter()
            .filter(|(u, _)| u == url)
            .map(|(_, at)| *at)
            .collect()
    }

    pub fn open_count(&self) -> usize {
        self.opened.lock().unwrap().len()
    }

    pub fn closed_count(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }
}

/// Per-URL behaviour of the fake browser.
#[derive(Default, Clone)]
struct Script {
    results: HashMap<String, Value>,
    failing: HashSet<String>,
    oversized: HashSet<String>,
    close_failing: HashSet<String>,
    screenshot_failing: bool,
    panic_on_open: bool,
    hold: Duration,
}

/// In-memory stand-in for headless Chromium.
#[derive(Default)]
pub struct FakeBrowser {
    pub state: Arc<FakeState>,
    script: Arc<Script>,
}

impl FakeBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    fn script(&mut self) -> &mut Script {
        Arc::make_mut(&mut self.script)
    }

    /// axe-core result returned for `url`; others get no violations.
    pub fn with_result(mut self, url: &str, result: Value) -> Self {
        self.script().results.insert(url.to_string(), result);
        self
    }

    /// Navigation to `url` fails.
    pub fn failing(mut self, url: &str) -> Self {
        self.script().failing.insert(url.to_string());
        self
    }

    /// `url` loads, but a response declared more bytes than the size limit.
    pub fn oversized(mut self, url: &str) -> Self {
        self.script().oversized.insert(url.to_string());
        self
    }

    /// Closing the page opened for `url` fails.
    pub fn close_failing(mut self, url: &str) -> Self {
        self.script().close_failing.insert(url.to_string());
        self
    }

    /// Every screenshot fails.
    pub fn screenshot_failing(mut self) -> Self {
        self.script().screenshot_failing = true;
        self
    }

    /// Opening a page panics, outside any page-level panic guard.
    pub fn panicking_on_open(mut self) -> Self {
        self.script().panic_on_open = true;
        self
    }

    /// Time each analysis takes.
    pub fn holding(mut self, hold: Duration) -> Self {
        self.script().hold = hold;
        self
    }
}

#[async_trait]
impl PageProvider for FakeBrowser {
    async fn open_page(&self) -> Result<Box<dyn AuditPage>, PageError> {
        if self.script.panic_on_open {
            panic!("browser connection lost");
        }
        Ok(Box::new(FakePage {
            script: Arc::clone(&self.script),
            state: Arc::clone(&self.state),
            url: None,
            host: None,
            result: json!({"violations": []}),
            oversized: None,
            open: true,
        }))
    }

    async fn shutdown(&self) {
        self.state.shutdowns.fetch_add(1, Ordering::SeqCst);
    }
}

struct FakePage {
    script: Arc<Script>,
    state: Arc<FakeState>,
    url: Option<String>,
    /// Set once navigation succeeds
    host: Option<String>,
    result: Value,
    oversized: Option<u64>,
    open: bool,
}

#[async_trait]
impl AuditPage for FakePage {
    async fn navigate(&mut self, url: &Url, options: &PageOptions) -> Result<(), PageError> {
        self.state
            .opened
            .lock()
            .unwrap()
            .push((url.to_string(), Instant::now()));
        self.url = Some(url.to_string());
        if self.script.failing.contains(url.as_str()) {
            return Err(PageError::Navigation("net::ERR_NAME_NOT_RESOLVED".to_string()));
        }

        let host = url.host_str().unwrap_or_default().to_string();
        self.state.enter(&host);
        self.host = Some(host);
        if self.script.oversized.contains(url.as_str()) {
            self.oversized = Some(options.max_page_size + 1);
        }
        let mut result = self
            .script
            .results
            .get(url.as_str())
            .cloned()
            .unwrap_or_else(|| json!({"violations": []}));
        if result.is_object() {
            result["url"] = json!(url.as_str());
        }
        self.result = result;
        Ok(())
    }

    async fn screenshot(&mut self, _settings: &ScreenshotSettings) -> Result<Vec<u8>, PageError> {
        if self.script.screenshot_failing {
            return Err(PageError::Screenshot("target crashed".to_string()));
        }
        Ok(vec![0xFF, 0xD8, 0xFF, 0xD9])
    }

    async fn evaluate(&mut self, expression: &str) -> Result<Value, PageError> {
        if expression.ends_with("typeof window.axe") {
            return Ok(json!("object"));
        }
        tokio::time::sleep(self.script.hold).await;
        Ok(self.result.clone())
    }

    fn size_violation(&self) -> Option<u64> {
        self.oversized
    }

    async fn close(&mut self) -> Result<(), PageError> {
        if !self.open {
            return Ok(());
        }
        self.open = false;
        if let Some(host) = self.host.take() {
            self.state.leave(&host);
        }
        self.state.closed.fetch_add(1, Ordering::SeqCst);

        let fails = self
            .url
            .as_deref()
            .is_some_and(|url| self.script.close_failing.contains(url));
        if fails {
            return Err(PageError::Browser("target already detached".to_string()));
        }
        Ok(())
    }
}

/// Writes the URL list and a stub axe-core script under `dir` and returns a
/// configuration pointing at them, with no domain delay.
pub fn test_config(dir: &Path, urls: &[&str]) -> Config {
    let url_list = dir.join("urls.txt");
    std::fs::write(&url_list, urls.join("\n")).unwrap();
    let axe_script = dir.join("axe.min.js");
    std::fs::write(&axe_script, "window.axe = window.axe || {};").unwrap();

    Config {
        url_list,
        axe_script_path: axe_script,
        output_directory: dir.join("results"),
        domain_delay_ms: 0,
        enable_csv: true,
        ..Default::default()
    }
}

/// One violation with a single node of the given impact.
pub fn single_node_result(impact: &str) -> Value {
    json!({
        "violations": [{
            "id": "image-alt",
            "description": "Ensures <img> elements have alternate text",
            "help": "Images must have alternate text",
            "helpUrl": "https://dequeuniversity.com/rules/axe/4.10/image-alt",
            "tags": ["wcag2a", "wcag111"],
            "nodes": [{
                "impact": impact,
                "html": "<img src=\"logo.png\">",
                "target": ["img"],
                "failureSummary": "Fix any of the following:\n  Element has no alt attribute",
                "any": [{"message": "Element has no alt attribute"}],
                "all": [],
                "none": []
            }]
        }]
    })
}
