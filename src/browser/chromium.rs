//! Headless Chromium over the DevTools protocol.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::network::{
    EnableParams, EventResponseReceived, ResourceType,
};
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use log::{debug, info, warn};
use tokio::sync::{Notify, RwLock};
use tokio::task::JoinHandle;
use url::Url;

use super::{AuditPage, PageOptions, PageProvider};
use crate::config::{
    Config, ScreenshotFormat, ScreenshotSettings, ViewportMode, BROWSER_LAUNCH_ARGS,
    BROWSER_REQUEST_SLACK, UNSANDBOXED_LAUNCH_ARGS,
};
use crate::error_handling::{AuditError, PageError};

/// Launch settings for the shared browser.
#[derive(Debug, Clone)]
pub struct BrowserSettings {
    pub mode: ViewportMode,
    pub sandbox: bool,
    pub navigation_timeout: Duration,
}

impl BrowserSettings {
    pub fn from_config(config: &Config) -> Self {
        BrowserSettings {
            mode: config.mode,
            sandbox: config.enable_sandbox,
            navigation_timeout: config.navigation_timeout(),
        }
    }
}

/// Shared Chromium instance.
///
/// Owns the browser process, the task that drives its DevTools connection and
/// a throwaway profile directory.
pub struct ChromiumSession {
    browser: RwLock<Option<Browser>>,
    handler: Mutex<Option<JoinHandle<()>>>,
    profile_dir: PathBuf,
}

impl ChromiumSession {
    /// Launches headless Chromium.
    ///
    /// # Errors
    ///
    /// Returns `AuditError::BrowserLaunch` if the configuration is rejected or
    /// the browser cannot be started.
    pub async fn launch(settings: &BrowserSettings) -> Result<Self, AuditError> {
        let (width, height) = settings.mode.dimensions();
        let profile_dir =
            std::env::temp_dir().join(format!("a11y_reporter-profile-{}", std::process::id()));

        let mut builder = BrowserConfig::builder()
            .viewport(Viewport {
                width,
                height,
                device_scale_factor: None,
                emulating_mobile: settings.mode.is_mobile(),
                is_landscape: false,
                has_touch: settings.mode.is_mobile(),
            })
            .window_size(width, height)
            .request_timeout(settings.navigation_timeout + BROWSER_REQUEST_SLACK)
            .user_data_dir(&profile_dir)
            .args(launch_args(settings.sandbox));

        if !settings.sandbox {
            builder = builder.no_sandbox();
            warn!("Browser sandbox is disabled; only run this inside a trusted container");
        }

        let config = builder.build().map_err(AuditError::BrowserLaunch)?;
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| AuditError::BrowserLaunch(e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("DevTools handler error: {}", e);
                }
            }
        });

        info!(
            "Launched headless Chromium ({:?} viewport {}x{})",
            settings.mode, width, height
        );

        Ok(ChromiumSession {
            browser: RwLock::new(Some(browser)),
            handler: Mutex::new(Some(handler)),
            profile_dir,
        })
    }
}

#[async_trait]
impl PageProvider for ChromiumSession {
    async fn open_page(&self) -> Result<Box<dyn AuditPage>, PageError> {
        let browser = self.browser.read().await;
        let browser = browser
            .as_ref()
            .ok_or_else(|| PageError::Browser("browser is closed".to_string()))?;
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| PageError::Browser(e.to_string()))?;
        Ok(Box::new(ChromiumPage::new(page)))
    }

    async fn shutdown(&self) {
        let browser = self.browser.write().await.take();
        if let Some(mut browser) = browser {
            if let Err(e) = browser.close().await {
                warn!("Failed to close browser cleanly: {}", e);
            }
            if let Err(e) = browser.wait().await {
                debug!("Browser process wait failed: {}", e);
            }
            info!("Browser closed");
        }
        let handler = self.handler.lock().ok().and_then(|mut h| h.take());
        if let Some(handler) = handler {
            handler.abort();
        }
        if self.profile_dir.exists() {
            if let Err(e) = tokio::fs::remove_dir_all(&self.profile_dir).await {
                debug!(
                    "Could not remove browser profile {}: {}",
                    self.profile_dir.display(),
                    e
                );
            }
        }
    }
}

/// Chromium flags for a session, without `--no-sandbox` itself.
fn launch_args(sandbox: bool) -> Vec<&'static str> {
    let mut args = BROWSER_LAUNCH_ARGS.to_vec();
    if !sandbox {
        args.extend_from_slice(UNSANDBOXED_LAUNCH_ARGS);
    }
    args
}

/// Response facts gathered while a page loads.
#[derive(Default)]
struct ResponseWatch {
    /// Declared size of the first oversized response, 0 when none
    oversized: AtomicU64,
    document_mime: Mutex<Option<String>>,
    tripped: Notify,
}

impl ResponseWatch {
    fn record(&self, event: &EventResponseReceived, limit: u64) {
        if event.r#type == ResourceType::Document {
            if let Ok(mut mime) = self.document_mime.lock() {
                if mime.is_none() {
                    *mime = Some(event.response.mime_type.to_ascii_lowercase());
                }
            }
        }
        if limit == 0 {
            return;
        }
        if let Some(size) = declared_length(event.response.headers.inner()) {
            if size > limit
                && self
                    .oversized
                    .compare_exchange(0, size, Ordering::SeqCst, Ordering::SeqCst)
                    .is_ok()
            {
                self.tripped.notify_one();
            }
        }
    }

    fn violation(&self) -> Option<u64> {
        match self.oversized.load(Ordering::SeqCst) {
            0 => None,
            size => Some(size),
        }
    }
}

fn declared_length(headers: &serde_json::Value) -> Option<u64> {
    headers.as_object()?.iter().find_map(|(name, value)| {
        if !name.eq_ignore_ascii_case("content-length") {
            return None;
        }
        match value {
            serde_json::Value::String(s) => s.trim().parse().ok(),
            serde_json::Value::Number(n) => n.as_u64(),
            _ => None,
        }
    })
}

fn is_html_mime(mime: &str) -> bool {
    mime.starts_with("text/html") || mime.starts_with("application/xhtml+xml")
}

struct ChromiumPage {
    page: Option<Page>,
    watch: Arc<ResponseWatch>,
    watcher: Option<JoinHandle<()>>,
}

impl ChromiumPage {
    fn new(page: Page) -> Self {
        ChromiumPage {
            page: Some(page),
            watch: Arc::new(ResponseWatch::default()),
            watcher: None,
        }
    }

    fn page(&self) -> Result<&Page, PageError> {
        self.page
            .as_ref()
            .ok_or_else(|| PageError::Browser("page already closed".to_string()))
    }
}

#[async_trait]
impl AuditPage for ChromiumPage {
    async fn navigate(&mut self, url: &Url, options: &PageOptions) -> Result<(), PageError> {
        let page = self.page()?.clone();

        if let Err(e) = page.execute(EnableParams::default()).await {
            warn!("Failed to enable network events for {}: {}", url, e);
        }
        let mut responses = page
            .event_listener::<EventResponseReceived>()
            .await
            .map_err(|e| PageError::Browser(e.to_string()))?;

        let watch = Arc::clone(&self.watch);
        let limit = options.max_page_size;
        self.watcher = Some(tokio::spawn(async move {
            while let Some(event) = responses.next().await {
                watch.record(&event, limit);
            }
        }));

        let navigation = tokio::time::timeout(options.navigation_timeout, page.goto(url.as_str()));
        tokio::select! {
            result = navigation => match result {
                Err(_) => return Err(PageError::NavigationTimeout(options.navigation_timeout)),
                Ok(Err(e)) => return Err(PageError::Navigation(e.to_string())),
                Ok(Ok(_)) => {}
            },
            _ = self.watch.tripped.notified() => {}
        }

        if let Some(size) = self.watch.violation() {
            return Err(PageError::PageTooLarge {
                size,
                limit: options.max_page_size,
            });
        }

        let mime = self
            .watch
            .document_mime
            .lock()
            .ok()
            .and_then(|m| m.clone());
        match mime {
            Some(mime) if !is_html_mime(&mime) => Err(PageError::NotHtml(mime)),
            _ => Ok(()),
        }
    }

    async fn screenshot(&mut self, settings: &ScreenshotSettings) -> Result<Vec<u8>, PageError> {
        let format = match settings.format {
            ScreenshotFormat::Png => CaptureScreenshotFormat::Png,
            ScreenshotFormat::Jpeg => CaptureScreenshotFormat::Jpeg,
            ScreenshotFormat::Webp => CaptureScreenshotFormat::Webp,
        };
        let mut params = ScreenshotParams::builder().format(format).full_page(true);
        if let Some(quality) = settings.quality {
            params = params.quality(i64::from(quality));
        }
        self.page()?
            .screenshot(params.build())
            .await
            .map_err(|e| PageError::Screenshot(e.to_string()))
    }

    async fn evaluate(&mut self, expression: &str) -> Result<serde_json::Value, PageError> {
        let params = EvaluateParams::builder()
            .expression(expression)
            .await_promise(true)
            .return_by_value(true)
            .build()
            .map_err(PageError::Analyzer)?;
        let result = self
            .page()?
            .evaluate_expression(params)
            .await
            .map_err(|e| PageError::Analyzer(e.to_string()))?;
        Ok(result.value().cloned().unwrap_or(serde_json::Value::Null))
    }

    fn size_violation(&self) -> Option<u64> {
        self.watch.violation()
    }

    async fn close(&mut self) -> Result<(), PageError> {
        if let Some(watcher) = self.watcher.take() {
            watcher.abort();
        }
        match self.page.take() {
            Some(page) => page
                .close()
                .await
                .map_err(|e| PageError::Browser(e.to_string())),
            None => Ok(()),
        }
    }
}

impl Drop for ChromiumPage {
    fn drop(&mut self) {
        if let Some(watcher) = self.watcher.take() {
            watcher.abort();
        }
        if let Some(page) = self.page.take() {
            if let Ok(handle) = tokio::runtime::Handle::try_current() {
                handle.spawn(async move {
                    if let Err(e) = page.close().await {
                        debug!("Deferred page close failed: {}", e);
                    }
                });
            }
        }
    }
}
