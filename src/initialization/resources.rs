//! Run resources loaded once at startup.
//!
//! The report template and stylesheet are compiled in and can be replaced
//! through the configuration. The axe-core script is always read from disk.

use anyhow::{Context, Result};
use std::path::Path;

use crate::config::Config;

const BUILTIN_TEMPLATE: &str = include_str!("../../template/template.html");
const BUILTIN_STYLES: &str = include_str!("../../template/styles.css");

/// Static inputs shared by every page task.
#[derive(Debug, Clone)]
pub struct RunResources {
    pub template: String,
    pub styles: String,
    pub axe_source: String,
    /// axe-core locale JSON, passed verbatim to `axe.configure`
    pub axe_locale: Option<String>,
}

impl RunResources {
    /// Built-in template and stylesheet with the given axe-core source.
    pub fn builtin(axe_source: impl Into<String>) -> Self {
        RunResources {
            template: BUILTIN_TEMPLATE.to_string(),
            styles: BUILTIN_STYLES.to_string(),
            axe_source: axe_source.into(),
            axe_locale: None,
        }
    }
}

/// Returns the built-in stylesheet.
pub fn builtin_styles() -> &'static str {
    BUILTIN_STYLES
}

async fn read_text(path: &Path, what: &str) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {} from {}", what, path.display()))
}

/// Loads the template, stylesheet, axe-core script and optional axe-core locale.
///
/// # Errors
///
/// Returns an error if any configured file cannot be read or the locale file
/// is not a JSON object.
pub async fn load_resources(config: &Config) -> Result<RunResources> {
    let template = match &config.template_path {
        Some(path) => read_text(path, "report template").await?,
        None => BUILTIN_TEMPLATE.to_string(),
    };
    let styles = match &config.styles_path {
        Some(path) => read_text(path, "report stylesheet").await?,
        None => BUILTIN_STYLES.to_string(),
    };
    let axe_source = read_text(&config.axe_script_path, "axe-core script").await?;
    if axe_source.trim().is_empty() {
        anyhow::bail!(
            "axe-core script {} is empty",
            config.axe_script_path.display()
        );
    }

    let axe_locale = match &config.axe_locale_path {
        Some(path) => {
            let text = read_text(path, "axe-core locale").await?;
            let value: serde_json::Value = serde_json::from_str(&text)
                .with_context(|| format!("Invalid axe-core locale JSON in {}", path.display()))?;
            if !value.is_object() {
                anyhow::bail!("axe-core locale {} is not a JSON object", path.display());
            }
            Some(value.to_string())
        }
        None => None,
    };

    log::debug!(
        "Loaded resources: template {} bytes, styles {} bytes, axe-core {} bytes",
        template.len(),
        styles.len(),
        axe_source.len()
    );

    Ok(RunResources {
        template,
        styles,
        axe_source,
        axe_locale,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[tokio::test]
    async fn test_load_resources_builtin_template() {
        let dir = tempfile::tempdir().unwrap();
        let axe = dir.path().join("axe.min.js");
        std::fs::write(&axe, "window.axe = {};").unwrap();

        let config = Config {
            axe_script_path: axe,
            ..Default::default()
        };
        let resources = load_resources(&config).await.unwrap();
        assert!(resources.template.contains("{{CONTENT}}"));
        assert!(!resources.styles.is_empty());
        assert!(resources.axe_locale.is_none());
    }

    #[tokio::test]
    async fn test_load_resources_missing_script() {
        let config = Config {
            axe_script_path: PathBuf::from("/nonexistent/axe.min.js"),
            ..Default::default()
        };
        let err = load_resources(&config).await.unwrap_err();
        assert!(format!("{:#}", err).contains("axe-core script"));
    }

    #[tokio::test]
    async fn test_load_resources_rejects_non_object_locale() {
        let dir = tempfile::tempdir().unwrap();
        let axe = dir.path().join("axe.min.js");
        let locale = dir.path().join("ja.json");
        std::fs::write(&axe, "window.axe = {};").unwrap();
        std::fs::write(&locale, "[1, 2]").unwrap();

        let config = Config {
            axe_script_path: axe,
            axe_locale_path: Some(locale),
            ..Default::default()
        };
        assert!(load_resources(&config).await.is_err());
    }
}
