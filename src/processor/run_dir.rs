//! Per-run output directory layout.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use crate::error_handling::PageError;

const JSON_DIR: &str = "json";
const HTML_DIR: &str = "html";
const IMAGES_DIR: &str = "images";
const CSV_FILE: &str = "report.csv";

/// Formats the run directory name, e.g. `2026-03-01_09-30-00`.
pub fn run_directory_name(started: DateTime<Utc>) -> String {
    started.format("%Y-%m-%d_%H-%M-%S").to_string()
}

/// `<output>/<timestamp>/` with `json/`, `html/` and optionally `html/images/`.
#[derive(Debug, Clone)]
pub struct RunDirectory {
    root: PathBuf,
    images: bool,
}

impl RunDirectory {
    /// Creates the run directory tree.
    ///
    /// Two runs started in the same second share one directory.
    pub async fn create(output: &Path, started: DateTime<Utc>, images: bool) -> Result<Self> {
        let root = output.join(run_directory_name(started));
        let run_dir = RunDirectory { root, images };

        let mut dirs = vec![run_dir.root.join(JSON_DIR), run_dir.root.join(HTML_DIR)];
        if images {
            dirs.push(run_dir.images_dir());
        }
        for dir in dirs {
            tokio::fs::create_dir_all(&dir)
                .await
                .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
        }
        Ok(run_dir)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn images_dir(&self) -> PathBuf {
        self.root.join(HTML_DIR).join(IMAGES_DIR)
    }

    pub fn json_path(&self, base: &str) -> PathBuf {
        self.root.join(JSON_DIR).join(format!("{}.json", base))
    }

    pub fn html_path(&self, base: &str) -> PathBuf {
        self.root.join(HTML_DIR).join(format!("{}.html", base))
    }

    /// Screenshot path, or `None` when the run has no images directory.
    pub fn image_path(&self, base: &str, extension: &str) -> Option<PathBuf> {
        self.images
            .then(|| self.images_dir().join(format!("{}.{}", base, extension)))
    }

    /// Screenshot reference relative to the HTML report.
    pub fn image_href(base: &str, extension: &str) -> String {
        format!("{}/{}.{}", IMAGES_DIR, base, extension)
    }

    pub fn csv_path(&self) -> PathBuf {
        self.root.join(CSV_FILE)
    }
}

/// Writes one artifact, mapping failures to `PageError::ArtifactWrite`.
pub async fn write_artifact(path: &Path, contents: impl AsRef<[u8]>) -> Result<(), PageError> {
    tokio::fs::write(path, contents)
        .await
        .map_err(|source| PageError::ArtifactWrite {
            path: path.to_path_buf(),
            source,
        })
}
