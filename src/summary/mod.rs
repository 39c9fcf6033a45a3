//! Offline summary builder.
//!
//! Reads the `json/` results of a finished run and writes
//! `summary/index.html`: impact totals and a sortable per-page table linking
//! to each page's report.

mod collect;
mod render;

use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::error_handling::SummaryError;
use crate::initialization::builtin_styles;
use crate::report::translations;

pub use collect::{collect_pages, CollectLimits, ImpactTotal, PageSummary, SummaryTotals};
pub use render::render_summary;

/// What to summarize and how.
#[derive(Debug, Clone)]
pub struct SummaryOptions {
    /// Run directory, `<output>/<timestamp>/`
    pub path: PathBuf,
    pub locale: String,
    /// Replaces the built-in stylesheet
    pub styles: Option<PathBuf>,
    pub limits: CollectLimits,
}

/// Canonicalizes `path` and checks that it lies inside `cwd`.
///
/// # Errors
///
/// Returns an error if either path cannot be resolved, the target is not a
/// directory, or it resolves outside `cwd`.
pub async fn resolve_run_directory(path: &Path, cwd: &Path) -> Result<PathBuf, SummaryError> {
    let canonical = |p: &Path| {
        let p = p.to_path_buf();
        async move {
            tokio::fs::canonicalize(&p)
                .await
                .map_err(|source| SummaryError::Resolve { path: p, source })
        }
    };
    let cwd = canonical(cwd).await?;
    let resolved = canonical(&cwd.join(path)).await?;

    if !resolved.starts_with(&cwd) {
        return Err(SummaryError::OutsideWorkingDirectory {
            path: resolved,
            cwd,
        });
    }
    let is_dir = tokio::fs::metadata(&resolved)
        .await
        .is_ok_and(|meta| meta.is_dir());
    if !is_dir {
        return Err(SummaryError::NotADirectory(resolved));
    }
    Ok(resolved)
}

async fn load_styles(path: Option<&Path>) -> String {
    match path {
        Some(path) => match tokio::fs::read_to_string(path).await {
            Ok(styles) => styles,
            Err(e) => {
                warn!(
                    "Could not read stylesheet {}: {}. Using the built-in styles",
                    path.display(),
                    e
                );
                builtin_styles().to_string()
            }
        },
        None => builtin_styles().to_string(),
    }
}

/// Builds `summary/index.html` for the run directory in `options`.
///
/// `options.path` is resolved relative to `cwd` and must stay inside it.
/// Returns the path of the written page.
///
/// # Errors
///
/// Returns an error if the run directory is rejected, `json/` cannot be
/// listed, or the page cannot be written. Individual bad result files are
/// skipped, not fatal.
pub async fn build_summary(options: &SummaryOptions, cwd: &Path) -> Result<PathBuf, SummaryError> {
    let run_dir = resolve_run_directory(&options.path, cwd).await?;
    let json_dir = run_dir.join("json");

    let pages = collect_pages(&json_dir, &options.limits).await?;
    if pages.is_empty() {
        warn!("No readable results found in {}", json_dir.display());
    }
    let totals = SummaryTotals::from_pages(&pages);
    let styles = load_styles(options.styles.as_deref()).await;
    let html = render_summary(&pages, &totals, translations(&options.locale), &styles);

    let summary_dir = run_dir.join("summary");
    tokio::fs::create_dir_all(&summary_dir)
        .await
        .map_err(|source| SummaryError::Io {
            action: "create",
            path: summary_dir.clone(),
            source,
        })?;
    let index = summary_dir.join("index.html");
    tokio::fs::write(&index, html)
        .await
        .map_err(|source| SummaryError::Io {
            action: "write",
            path: index.clone(),
            source,
        })?;

    info!(
        "Summary of {} page{} written to {}",
        pages.len(),
        if pages.len() == 1 { "" } else { "s" },
        index.display()
    );
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn options(path: &str) -> SummaryOptions {
        SummaryOptions {
            path: PathBuf::from(path),
            locale: "en".to_string(),
            styles: None,
            limits: CollectLimits::default(),
        }
    }

    #[tokio::test]
    async fn test_resolve_rejects_paths_outside_cwd() {
        let tmp = tempfile::tempdir().unwrap();
        let cwd = tmp.path().join("work");
        std::fs::create_dir_all(cwd.join("run")).unwrap();
        std::fs::create_dir_all(tmp.path().join("elsewhere")).unwrap();

        assert!(resolve_run_directory(Path::new("run"), &cwd).await.is_ok());
        assert!(matches!(
            resolve_run_directory(Path::new("../elsewhere"), &cwd).await,
            Err(SummaryError::OutsideWorkingDirectory { .. })
        ));
        assert!(matches!(
            resolve_run_directory(&tmp.path().join("elsewhere"), &cwd).await,
            Err(SummaryError::OutsideWorkingDirectory { .. })
        ));
        assert!(matches!(
            resolve_run_directory(Path::new("missing"), &cwd).await,
            Err(SummaryError::Resolve { .. })
        ));
    }

    #[tokio::test]
    async fn test_resolve_rejects_files() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("file"), "x").unwrap();
        assert!(matches!(
            resolve_run_directory(Path::new("file"), tmp.path()).await,
            Err(SummaryError::NotADirectory(_))
        ));
    }

    #[tokio::test]
    async fn test_build_summary_writes_index() {
        let tmp = tempfile::tempdir().unwrap();
        let json_dir = tmp.path().join("run").join("json");
        std::fs::create_dir_all(&json_dir).unwrap();
        std::fs::write(
            json_dir.join("example.com.json"),
            json!({
                "url": "https://example.com/",
                "violations": [{"nodes": [{"impact": "serious"}]}]
            })
            .to_string(),
        )
        .unwrap();

        let index = build_summary(&options("run"), tmp.path()).await.unwrap();
        assert!(index.ends_with("run/summary/index.html"));
        let html = std::fs::read_to_string(&index).unwrap();
        assert!(html.contains("href=\"../html/example.com.html\""));
        assert!(html.contains("data-impact=\"serious\" data-value=\"1\""));
    }

    #[tokio::test]
    async fn test_build_summary_links_redirected_page_to_its_report() {
        let tmp = tempfile::tempdir().unwrap();
        let run = tmp.path().join("run");
        std::fs::create_dir_all(run.join("json")).unwrap();
        std::fs::create_dir_all(run.join("html")).unwrap();
        std::fs::write(
            run.join("json").join("example.com.json"),
            json!({"url": "https://www.example.com/", "violations": []}).to_string(),
        )
        .unwrap();
        std::fs::write(run.join("html").join("example.com.html"), "<html></html>").unwrap();

        let index = build_summary(&options("run"), tmp.path()).await.unwrap();
        let html = std::fs::read_to_string(&index).unwrap();
        assert!(html.contains("href=\"../html/example.com.html\""));
        assert!(!html.contains("www.example.com.html"));
        assert!(index.parent().unwrap().join("../html/example.com.html").exists());
    }

    #[tokio::test]
    async fn test_build_summary_without_json_dir_fails() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("run")).unwrap();
        assert!(matches!(
            build_summary(&options("run"), tmp.path()).await,
            Err(SummaryError::Io { .. })
        ));
    }
}
