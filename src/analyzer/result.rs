//! Typed view over an axe-core result.
//!
//! Only the fields reports and the CSV log read are typed. Everything else
//! stays in the raw value, which is persisted untouched.

use serde::{Deserialize, Deserializer};
use strum_macros::{EnumIter, EnumString};

use crate::error_handling::PageError;

/// Severity assigned by axe-core to a violating node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Impact {
    Minor,
    Moderate,
    Serious,
    Critical,
}

impl Impact {
    pub fn as_str(&self) -> &'static str {
        match self {
            Impact::Minor => "minor",
            Impact::Moderate => "moderate",
            Impact::Serious => "serious",
            Impact::Critical => "critical",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// Unknown impact strings are kept as "no impact" instead of rejecting the result
fn lenient_impact<'de, D>(deserializer: D) -> Result<Option<Impact>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(|v| v.as_str())
        .and_then(|s| s.parse().ok()))
}

/// One failed check on a node (`any`, `all` or `none` entry).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
}

/// A DOM node that violates a rule.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationNode {
    #[serde(default, deserialize_with = "lenient_impact")]
    pub impact: Option<Impact>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub html: String,
    /// Selectors; nested arrays appear for nodes inside shadow roots
    #[serde(default, deserialize_with = "null_as_default")]
    pub target: Vec<serde_json::Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub failure_summary: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub any: Vec<CheckResult>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub all: Vec<CheckResult>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub none: Vec<CheckResult>,
}

impl ViolationNode {
    /// Selector strings, with shadow DOM paths joined by ` >> `.
    pub fn selectors(&self) -> Vec<String> {
        self.target.iter().map(selector_text).collect()
    }

    /// Non-empty messages from `any`, then `none`, then `all`.
    pub fn failure_messages(&self) -> impl Iterator<Item = &str> {
        self.any
            .iter()
            .chain(self.none.iter())
            .chain(self.all.iter())
            .map(|check| check.message.as_str())
            .filter(|message| !message.is_empty())
    }
}

fn selector_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Array(parts) => parts
            .iter()
            .map(selector_text)
            .collect::<Vec<_>>()
            .join(" >> "),
        other => other.to_string(),
    }
}

/// A failed rule and the nodes that fail it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub help: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub help_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nodes: Vec<ViolationNode>,
}

impl Violation {
    /// Text used to name the check: description, else help, else rule id.
    pub fn summary(&self) -> &str {
        [&self.description, &self.help, &self.id]
            .into_iter()
            .find(|s| !s.is_empty())
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// Node counts per impact level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImpactCounts([usize; 4]);

impl ImpactCounts {
    pub fn from_violations(violations: &[Violation]) -> Self {
        let mut counts = ImpactCounts::default();
        for impact in violations
            .iter()
            .flat_map(|v| v.nodes.iter())
            .filter_map(|n| n.impact)
        {
            counts.add(impact, 1);
        }
        counts
    }

    pub fn add(&mut self, impact: Impact, count: usize) {
        self.0[impact.index()] += count;
    }

    pub fn get(&self, impact: Impact) -> usize {
        self.0[impact.index()]
    }

    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }
}

/// An axe-core result: the raw JSON plus the typed violations.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    raw: serde_json::Value,
    violations: Vec<Violation>,
}

impl AnalysisResult {
    /// Validates and wraps a raw result.
    ///
    /// # Errors
    ///
    /// Returns `PageError::InvalidResult` if the value is not an object, has no
    /// `violations` array or the violations do not have the expected shape.
    pub fn from_value(raw: serde_json::Value) -> Result<Self, PageError> {
        let object = raw.as_object().ok_or_else(|| {
            PageError::InvalidResult(format!(
                "expected an object, got {}",
                json_type_name(&raw)
            ))
        })?;
        let violations = match object.get("violations") {
            Some(v @ serde_json::Value::Array(_)) => Vec::<Violation>::deserialize(v)
                .map_err(|e| PageError::InvalidResult(format!("malformed violations: {}", e)))?,
            Some(other) => {
                return Err(PageError::InvalidResult(format!(
                    "violations is {}, not an array",
                    json_type_name(other)
                )))
            }
            None => {
                return Err(PageError::InvalidResult(
                    "result has no violations".to_string(),
                ))
            }
        };
        Ok(AnalysisResult { raw, violations })
    }

    pub fn raw(&self) -> &serde_json::Value {
        &self.raw
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// URL recorded by axe-core, if any.
    pub fn url(&self) -> Option<&str> {
        self.raw.get("url").and_then(|u| u.as_str())
    }

    pub fn impact_counts(&self) -> ImpactCounts {
        ImpactCounts::from_violations(&self.violations)
    }

    /// Total violating nodes.
    pub fn violation_count(&self) -> usize {
        self.violations.iter().map(|v| v.nodes.len()).sum()
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
