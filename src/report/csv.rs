//! Run-wide CSV log of violating nodes.
//!
//! One row per node, across every page of the run. Pages finish concurrently,
//! so all rows go through a single writer behind an async mutex.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use csv::{Terminator, Writer, WriterBuilder};
use tokio::sync::Mutex;

use super::translations::{translations, Translations};
use crate::analyzer::AnalysisResult;

const LIST_SEPARATOR: &str = " | ";

/// Writer for `<run>/report.csv`.
pub struct CsvReport {
    path: PathBuf,
    text: &'static Translations,
    writer: Mutex<Option<Writer<File>>>,
}

impl CsvReport {
    /// Creates the file and writes the localized header row.
    pub fn create(path: &Path, locale: &str) -> Result<Self> {
        let text = translations(locale);
        let mut writer = WriterBuilder::new()
            .terminator(Terminator::CRLF)
            .from_path(path)
            .with_context(|| format!("Failed to create CSV report {}", path.display()))?;
        writer
            .write_record(text.csv_headers)
            .with_context(|| format!("Failed to write CSV header to {}", path.display()))?;

        Ok(CsvReport {
            path: path.to_path_buf(),
            text,
            writer: Mutex::new(Some(writer)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one row per violating node of `result`.
    ///
    /// Returns the number of rows written.
    pub async fn append(&self, url: &str, result: &AnalysisResult) -> Result<usize, csv::Error> {
        let rows = self.rows(url, result);
        if rows.is_empty() {
            return Ok(0);
        }

        let mut guard = self.writer.lock().await;
        let writer = guard.as_mut().ok_or_else(|| {
            csv::Error::from(io::Error::other("CSV report is already closed"))
        })?;
        for row in &rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(rows.len())
    }

    fn rows(&self, url: &str, result: &AnalysisResult) -> Vec<[String; 9]> {
        let mut rows = Vec::new();
        for violation in result.violations() {
            let tags = violation.tags.join(LIST_SEPARATOR);
            for node in &violation.nodes {
                rows.push([
                    url.to_string(),
                    violation.summary().to_string(),
                    violation.help_url.clone(),
                    tags.clone(),
                    node.impact
                        .map(|impact| self.text.impact_label(impact).to_string())
                        .unwrap_or_default(),
                    node.failure_messages().collect::<Vec<_>>().join("\n"),
                    node.failure_summary.clone(),
                    node.html.clone(),
                    node.selectors().join(LIST_SEPARATOR),
                ]);
            }
        }
        rows
    }

    /// Flushes and closes the file. Later calls do nothing.
    pub async fn finish(&self) -> Result<()> {
        if let Some(mut writer) = self.writer.lock().await.take() {
            writer
                .flush()
                .with_context(|| format!("Failed to flush CSV report {}", self.path.display()))?;
        }
        Ok(())
    }
}
