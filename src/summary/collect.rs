//! Reads the per-page JSON results of a run.

use std::path::{Path, PathBuf};

use log::{debug, warn};
use strum::IntoEnumIterator;

use crate::analyzer::{AnalysisResult, Impact, ImpactCounts};
use crate::config::{SUMMARY_MAX_FILES, SUMMARY_MAX_FILE_BYTES, SUMMARY_MAX_TOTAL_BYTES};
use crate::error_handling::SummaryError;
use crate::processor::is_valid_filename;

/// Bounds on how much of `json/` is read.
#[derive(Debug, Clone, Copy)]
pub struct CollectLimits {
    pub max_files: usize,
    pub max_file_bytes: u64,
    pub max_total_bytes: u64,
}

impl Default for CollectLimits {
    fn default() -> Self {
        CollectLimits {
            max_files: SUMMARY_MAX_FILES,
            max_file_bytes: SUMMARY_MAX_FILE_BYTES,
            max_total_bytes: SUMMARY_MAX_TOTAL_BYTES,
        }
    }
}

/// One row of the summary table.
#[derive(Debug, Clone)]
pub struct PageSummary {
    /// `url` field of the result, if present
    pub url: Option<String>,
    pub counts: ImpactCounts,
    /// `../html/<stem>.html`, where `stem` is the name of the JSON file
    pub report_href: Option<String>,
}

impl PageSummary {
    /// Builds a row for the result stored as `<stem>.json`.
    ///
    /// The `url` field is the final URL after redirects, so the report link
    /// comes from the file name the result was written under.
    pub fn from_result(result: &AnalysisResult, stem: &str) -> Self {
        let url = result.url().map(str::to_string);
        let report_href = is_valid_filename(stem).then(|| format!("../html/{}.html", stem));

        PageSummary {
            url,
            counts: result.impact_counts(),
            report_href,
        }
    }
}

/// Occurrences and affected pages for one impact level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImpactTotal {
    pub occurrences: usize,
    pub pages_affected: usize,
}

/// Totals across every collected page.
#[derive(Debug, Clone, Default)]
pub struct SummaryTotals {
    pub pages: usize,
    totals: [ImpactTotal; 4],
}

impl SummaryTotals {
    pub fn from_pages(pages: &[PageSummary]) -> Self {
        let mut summary = SummaryTotals {
            pages: pages.len(),
            ..Default::default()
        };
        for page in pages {
            for (slot, impact) in summary.totals.iter_mut().zip(Impact::iter()) {
                let count = page.counts.get(impact);
                slot.occurrences += count;
                if count > 0 {
                    slot.pages_affected += 1;
                }
            }
        }
        summary
    }

    pub fn get(&self, impact: Impact) -> ImpactTotal {
        Impact::iter()
            .zip(self.totals)
            .find(|(i, _)| *i == impact)
            .map(|(_, total)| total)
            .unwrap_or_default()
    }

    /// Share of pages with at least one node of `impact`, in percent.
    pub fn percent_affected(&self, impact: Impact) -> f64 {
        if self.pages == 0 {
            return 0.0;
        }
        self.get(impact).pages_affected as f64 * 100.0 / self.pages as f64
    }
}

async fn list_json_files(json_dir: &Path) -> Result<Vec<PathBuf>, SummaryError> {
    let io_error = |action: &'static str| {
        move |source: std::io::Error| SummaryError::Io {
            action,
            path: json_dir.to_path_buf(),
            source,
        }
    };

    let mut entries = tokio::fs::read_dir(json_dir)
        .await
        .map_err(io_error("read directory"))?;
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(io_error("read directory"))? {
        let path = entry.path();
        let is_json = path.extension().is_some_and(|ext| ext == "json");
        let is_file = entry.file_type().await.is_ok_and(|t| t.is_file());
        if is_json && is_file {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Reads `json_dir/*.json` in name order within `limits`.
///
/// Oversized, unreadable and malformed files are skipped with a warning.
/// Files past the count or total-size limit are not read at all.
///
/// # Errors
///
/// Returns an error only if the directory itself cannot be listed.
pub async fn collect_pages(
    json_dir: &Path,
    limits: &CollectLimits,
) -> Result<Vec<PageSummary>, SummaryError> {
    let mut files = list_json_files(json_dir).await?;
    if files.len() > limits.max_files {
        warn!(
            "{} result files found, only the first {} are summarized",
            files.len(),
            limits.max_files
        );
        files.truncate(limits.max_files);
    }

    let mut pages = Vec::with_capacity(files.len());
    let mut total_bytes = 0u64;
    for path in files {
        let size = match tokio::fs::metadata(&path).await {
            Ok(meta) => meta.len(),
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                continue;
            }
        };
        if size > limits.max_file_bytes {
            warn!(
                "Skipping {}: {} bytes exceeds the {} byte file limit",
                path.display(),
                size,
                limits.max_file_bytes
            );
            continue;
        }
        if total_bytes + size > limits.max_total_bytes {
            warn!(
                "Stopping at {}: total size limit of {} bytes reached",
                path.display(),
                limits.max_total_bytes
            );
            break;
        }
        total_bytes += size;

        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                continue;
            }
        };
        let result = serde_json::from_str::<serde_json::Value>(&text)
            .map_err(|e| e.to_string())
            .and_then(|value| AnalysisResult::from_value(value).map_err(|e| e.to_string()));
        match result {
            Ok(result) => {
                debug!("Read {}", path.display());
                let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
                pages.push(PageSummary::from_result(&result, stem));
            }
            Err(e) => warn!("Skipping malformed result {}: {}", path.display(), e),
        }
    }

    Ok(pages)
}
