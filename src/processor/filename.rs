//! Report filename derivation.
//!
//! Every artifact for a page shares one base name built from the URL's host,
//! path and query. The name is safe to use on any filesystem: ASCII only, no
//! `..`, no separators, no control characters and no reserved device names.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use url::Url;

use crate::config::{MAX_BASE_FILENAME_LENGTH, MAX_FILENAME_LENGTH, MAX_FILENAME_PART_LENGTH};

/// Compiles a hardcoded pattern, panicking with context if it is malformed.
fn compile_regex_unsafe(pattern: &str, context: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| {
        panic!(
            "Failed to compile regex pattern '{}' in {}: {}. This is a programming error.",
            pattern, context, e
        )
    })
}

static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(r#"[<>:"/\\|?*\x00-\x1F]"#, "UNSAFE_CHARS"));
static RESERVED_NAME: LazyLock<Regex> = LazyLock::new(|| {
    compile_regex_unsafe(
        r"(?i)^(CON|PRN|AUX|NUL|COM[1-9]|LPT[1-9])$",
        "RESERVED_NAME",
    )
});
static NON_PORTABLE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(r"[^a-zA-Z0-9\-_.]", "NON_PORTABLE"));
static UNDERSCORE_RUN: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(r"_{2,}", "UNDERSCORE_RUN"));

/// Why a base filename could not be derived.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilenameError {
    #[error("URL has no host")]
    MissingHost,

    #[error("derived name '{0}' is not a safe filename")]
    Unsafe(String),
}

/// Sanitizes one component of a filename.
///
/// The result contains only `[A-Za-z0-9._-]`, never `..`, never runs of
/// underscores, and is at most 100 characters long.
pub fn sanitize_filename_part(part: &str) -> String {
    let without_traversal = part.replace("..", "");
    let safe = UNSAFE_CHARS.replace_all(&without_traversal, "_");
    let safe = RESERVED_NAME.replace(&safe, "_reserved_");
    let portable = NON_PORTABLE.replace_all(&safe, "_");
    let mut collapsed = UNDERSCORE_RUN.replace_all(&portable, "_").into_owned();
    // Only ASCII remains, so byte truncation is safe
    collapsed.truncate(MAX_FILENAME_PART_LENGTH);
    collapsed
}

/// Derives the base filename (no extension) for a page URL.
///
/// `https://example.com/a/b/?q=1` becomes `example.com_a_b_q_1`. Names longer
/// than 200 characters are cut and suffixed with `_truncated`.
///
/// # Errors
///
/// Returns `FilenameError::MissingHost` for URLs without a host and
/// `FilenameError::Unsafe` if the result fails [`is_valid_filename`].
pub fn derive_base_filename(url: &Url) -> Result<String, FilenameError> {
    let host = url.host_str().ok_or(FilenameError::MissingHost)?;
    let host = sanitize_filename_part(host);
    let host = if host.is_empty() {
        "unknown_host".to_string()
    } else {
        host
    };

    let path = url.path().strip_prefix('/').unwrap_or(url.path());
    let path = sanitize_filename_part(path.trim_end_matches('/'));
    let query = sanitize_filename_part(url.query().unwrap_or(""));

    let mut name = host;
    for part in [path, query] {
        if !part.is_empty() {
            name.push('_');
            name.push_str(&part);
        }
    }

    if name.len() > MAX_BASE_FILENAME_LENGTH {
        name.truncate(MAX_BASE_FILENAME_LENGTH);
        name.push_str("_truncated");
    }

    if is_valid_filename(&name) {
        Ok(name)
    } else {
        Err(FilenameError::Unsafe(name))
    }
}

/// Returns `true` if `name` can be used as a filename as-is.
pub fn is_valid_filename(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= MAX_FILENAME_LENGTH
        && !name.contains("..")
        && !name.contains('/')
        && !name.contains('\\')
        && !RESERVED_NAME.is_match(name)
        && !UNSAFE_CHARS.is_match(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn derive(url: &str) -> String {
        derive_base_filename(&Url::parse(url).unwrap()).unwrap()
    }

    #[test]
    fn test_host_path_and_query() {
        assert_eq!(derive("https://example.com/"), "example.com");
        assert_eq!(derive("https://example.com/about/"), "example.com_about");
        assert_eq!(
            derive("https://example.com/a/b/index.html?q=1&lang=ja"),
            "example.com_a_b_index.html_q_1_lang_ja"
        );
    }

    #[test]
    fn test_traversal_removed() {
        let name = derive("https://example.com/%2e%2e/%2e%2e/etc/passwd");
        assert!(!name.contains(".."));
        assert!(!name.contains('/'));
    }

    #[test]
    fn test_non_ascii_path_is_replaced() {
        let name = derive("https://example.com/日本語/ページ");
        assert!(name.starts_with("example.com_"));
        assert!(name.is_ascii());
    }

    #[test]
    fn test_reserved_part_is_renamed() {
        assert_eq!(sanitize_filename_part("con"), "_reserved_");
        assert_eq!(sanitize_filename_part("LPT1"), "_reserved_");
        assert_eq!(sanitize_filename_part("console"), "console");
    }

    #[test]
    fn test_parts_and_total_are_capped() {
        let long = "a".repeat(300);
        assert_eq!(sanitize_filename_part(&long).len(), 100);

        let url = format!(
            "https://{}.example.com/{}?{}",
            "h".repeat(60),
            "p".repeat(150),
            "q".repeat(150)
        );
        let name = derive(&url);
        assert!(name.ends_with("_truncated"));
        assert_eq!(name.len(), 200 + "_truncated".len());
    }

    #[test]
    fn test_is_valid_filename() {
        assert!(is_valid_filename("example.com_about"));
        assert!(!is_valid_filename(""));
        assert!(!is_valid_filename("a..b"));
        assert!(!is_valid_filename("a/b"));
        assert!(!is_valid_filename("a\\b"));
        assert!(!is_valid_filename("NUL"));
        assert!(!is_valid_filename("tab\there"));
        assert!(!is_valid_filename(&"x".repeat(256)));
    }

    proptest! {
        #[test]
        fn prop_derived_names_are_safe_and_deterministic(
            path in "[ -~]{0,120}",
            query in "[ -~]{0,120}"
        ) {
            let raw = format!("https://example.com/{}?{}", path, query);
            if let Ok(url) = Url::parse(&raw) {
                let first = derive_base_filename(&url);
                let second = derive_base_filename(&url);
                prop_assert_eq!(&first, &second);
                let name = first.unwrap();
                prop_assert!(!name.contains(".."));
                prop_assert!(!name.contains('/') && !name.contains('\\'));
                prop_assert!(!RESERVED_NAME.is_match(&name));
                prop_assert!(name.len() <= MAX_BASE_FILENAME_LENGTH + "_truncated".len());
            }
        }
    }
}
