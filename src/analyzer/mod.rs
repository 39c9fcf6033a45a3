//! axe-core integration.
//!
//! The engine is injected into each page as a script, optionally configured
//! with locale rule text, and run against the document with the configured
//! rule tags.

mod result;

use std::sync::Arc;

use log::debug;

use crate::browser::AuditPage;
use crate::error_handling::PageError;

pub use result::{AnalysisResult, CheckResult, Impact, ImpactCounts, Violation, ViolationNode};

/// Runs axe-core inside an open page.
#[derive(Clone)]
pub struct AxeAnalyzer {
    source: Arc<str>,
    run_script: String,
}

impl AxeAnalyzer {
    /// `locale_json` is an axe-core locale object serialized as JSON.
    pub fn new(source: impl Into<Arc<str>>, locale_json: Option<&str>, tags: &[String]) -> Self {
        // Serializing a Vec<String> cannot fail
        let tags = serde_json::to_string(tags).unwrap_or_else(|_| "[]".to_string());
        let run_script = format!(
            r#"(async () => {{
    if (typeof window.axe !== 'object') {{
        throw new Error('axe-core is not loaded');
    }}
    const locale = {locale};
    if (locale) {{
        window.axe.configure({{ locale }});
    }}
    return await window.axe.run(document, {{ runOnly: {{ type: 'tag', values: {tags} }} }});
}})()"#,
            locale = locale_json.unwrap_or("null"),
            tags = tags,
        );
        AxeAnalyzer {
            source: source.into(),
            run_script,
        }
    }

    /// Expression that loads the engine and reports whether `window.axe` exists.
    fn injection_script(&self) -> String {
        format!("{}\n;typeof window.axe", self.source)
    }

    /// Injects axe-core, runs it and validates the result.
    ///
    /// # Errors
    ///
    /// `PageError::Analyzer` when the engine cannot be loaded or throws,
    /// `PageError::InvalidResult` when the result is not a usable object.
    pub async fn analyze(&self, page: &mut dyn AuditPage) -> Result<AnalysisResult, PageError> {
        let loaded = page.evaluate(&self.injection_script()).await?;
        if loaded.as_str() != Some("object") {
            return Err(PageError::Analyzer(format!(
                "axe-core did not load (window.axe is {})",
                loaded
            )));
        }
        debug!("axe-core injected");

        let raw = page.evaluate(&self.run_script).await?;
        AnalysisResult::from_value(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_script_embeds_tags_and_locale() {
        let analyzer = AxeAnalyzer::new(
            "/* axe */",
            Some(r#"{"lang":"ja"}"#),
            &["wcag2a".to_string(), "best-practice".to_string()],
        );
        assert!(analyzer
            .run_script
            .contains(r#"values: ["wcag2a","best-practice"]"#));
        assert!(analyzer.run_script.contains(r#"const locale = {"lang":"ja"};"#));
    }

    #[test]
    fn test_run_script_without_locale() {
        let analyzer = AxeAnalyzer::new("/* axe */", None, &["wcag2aa".to_string()]);
        assert!(analyzer.run_script.contains("const locale = null;"));
    }

    #[test]
    fn test_injection_script_ends_with_probe() {
        let analyzer = AxeAnalyzer::new("var axe = {} // no newline", None, &[]);
        assert!(analyzer
            .injection_script()
            .ends_with("// no newline\n;typeof window.axe"));
    }
}
