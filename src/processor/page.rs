//! Audits one URL: open, capture, analyze, persist, release.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use log::{debug, error, info, warn};

use super::filename::derive_base_filename;
use super::outcome::ProcessingOutcome;
use super::run_dir::{write_artifact, RunDirectory};
use crate::analyzer::AxeAnalyzer;
use crate::browser::{AuditPage, PageOptions, PageProvider};
use crate::config::{Config, ScreenshotSettings};
use crate::error_handling::{InfoType, PageError, ProcessingStats, WarningType};
use crate::intake::TargetUrl;
use crate::report::{CsvReport, ReportRenderer};
use crate::scheduler::Dispatch;
use crate::utils::panic_message;

/// Per-page settings resolved from the configuration.
#[derive(Debug, Clone)]
pub struct PageSettings {
    pub options: PageOptions,
    /// `None` disables screenshots
    pub screenshot: Option<ScreenshotSettings>,
    pub locale: String,
    pub json_indentation: usize,
}

impl PageSettings {
    pub fn from_config(config: &Config) -> Self {
        PageSettings {
            options: PageOptions {
                navigation_timeout: config.navigation_timeout(),
                max_page_size: config.max_page_size,
            },
            screenshot: config.screenshot_settings(),
            locale: config.locale.clone(),
            json_indentation: config.json_indentation,
        }
    }
}

/// Everything a page task shares with the rest of the run.
pub struct PageContext {
    pub provider: Arc<dyn PageProvider>,
    pub analyzer: AxeAnalyzer,
    pub renderer: ReportRenderer,
    pub run_dir: RunDirectory,
    pub csv: Option<CsvReport>,
    pub stats: Arc<ProcessingStats>,
    pub settings: PageSettings,
}

struct PageReport {
    violations: usize,
    screenshot: bool,
}

/// Processes one URL and always returns its outcome.
///
/// Once opened, the page is closed and counted on every path, including a
/// failed navigation and a panic while it is open. Errors and panics are
/// turned into a failure outcome and counted.
pub async fn process_page(ctx: &PageContext, url: TargetUrl, dispatch: Dispatch) -> ProcessingOutcome {
    info!(
        "Processing {}/{}: {}",
        dispatch.index, dispatch.total, url
    );

    let result = match ctx.provider.open_page().await {
        Ok(mut page) => {
            let audited = AssertUnwindSafe(audit(ctx, &url, page.as_mut()))
                .catch_unwind()
                .await;
            release(ctx, &url, page.as_mut()).await;
            audited.unwrap_or_else(|panic| Err(PageError::Panic(panic_message(&*panic))))
        }
        Err(e) => Err(e),
    };

    match result {
        Ok(report) => {
            info!(
                "Completed {}/{}: {} ({} violations)",
                dispatch.index, dispatch.total, url, report.violations
            );
            ProcessingOutcome::Success {
                url: url.as_str().to_string(),
                violations: report.violations,
                screenshot: report.screenshot,
            }
        }
        Err(e) => {
            ctx.stats.increment_error(e.error_type());
            error!("Failed to process {}: {}", url, e);
            ProcessingOutcome::failure(url.as_str(), &e)
        }
    }
}

async fn release(ctx: &PageContext, url: &TargetUrl, page: &mut dyn AuditPage) {
    if let Err(e) = page.close().await {
        ctx.stats.increment_warning(WarningType::PageCloseFailed);
        warn!("Failed to close page for {}: {}", url, e);
    }
}

fn check_size(ctx: &PageContext, page: &dyn AuditPage) -> Result<(), PageError> {
    match page.size_violation() {
        Some(size) => Err(PageError::PageTooLarge {
            size,
            limit: ctx.settings.options.max_page_size,
        }),
        None => Ok(()),
    }
}

async fn audit(
    ctx: &PageContext,
    url: &TargetUrl,
    page: &mut dyn AuditPage,
) -> Result<PageReport, PageError> {
    page.navigate(url.url(), &ctx.settings.options).await?;
    check_size(ctx, page)?;

    let screenshot = match &ctx.settings.screenshot {
        Some(settings) => match page.screenshot(settings).await {
            Ok(bytes) => {
                ctx.stats.increment_info(InfoType::ScreenshotCaptured);
                Some((bytes, settings.format.extension()))
            }
            Err(e) => {
                ctx.stats.increment_warning(WarningType::ScreenshotUnavailable);
                warn!("Continuing without screenshot for {}: {}", url, e);
                None
            }
        },
        None => None,
    };

    let analysis = ctx.analyzer.analyze(page).await?;
    check_size(ctx, page)?;

    let base = derive_base_filename(url.url())?;
    debug!("Writing artifacts for {} as {}", url, base);

    let json = to_indented_json(analysis.raw(), ctx.settings.json_indentation)?;
    write_artifact(&ctx.run_dir.json_path(&base), json).await?;

    let mut image_href = None;
    if let Some((bytes, extension)) = &screenshot {
        if let Some(path) = ctx.run_dir.image_path(&base, extension) {
            write_artifact(&path, bytes).await?;
            image_href = Some(RunDirectory::image_href(&base, extension));
        }
    }

    let html = ctx.renderer.render(
        url.as_str(),
        &analysis,
        image_href.as_deref(),
        &ctx.settings.locale,
    );
    write_artifact(&ctx.run_dir.html_path(&base), html).await?;

    if let Some(csv) = &ctx.csv {
        if let Err(e) = csv.append(url.as_str(), &analysis).await {
            ctx.stats.increment_warning(WarningType::CsvWriteFailed);
            warn!("Failed to append CSV rows for {}: {}", url, e);
        }
    }

    let violations = analysis.violation_count();
    if violations == 0 {
        ctx.stats.increment_info(InfoType::NoViolations);
    }
    Ok(PageReport {
        violations,
        screenshot: image_href.is_some(),
    })
}

/// Serializes with `indent` spaces; 0 produces compact JSON.
pub fn to_indented_json(value: &serde_json::Value, indent: usize) -> Result<Vec<u8>, PageError> {
    let to_error = |e: serde_json::Error| PageError::InvalidResult(e.to_string());
    if indent == 0 {
        return serde_json::to_vec(value).map_err(to_error);
    }
    let indent = " ".repeat(indent);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
    let mut out = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    serde::Serialize::serialize(value, &mut serializer).map_err(to_error)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_indented_json() {
        let value = json!({"a": [1]});
        assert_eq!(to_indented_json(&value, 0).unwrap(), br#"{"a":[1]}"#.to_vec());
        assert_eq!(
            String::from_utf8(to_indented_json(&value, 4).unwrap()).unwrap(),
            "{\n    \"a\": [\n        1\n    ]\n}"
        );
    }
}
