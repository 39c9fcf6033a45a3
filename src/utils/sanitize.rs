//! Utilities for sanitizing error messages.
//!
//! Failure messages come from the browser, the page and the analyzer, so they
//! are cleaned of control characters and capped before they are logged or
//! stored in an outcome.

use crate::config::MAX_ERROR_MESSAGE_LENGTH;

/// Sanitizes an error message by removing control characters.
///
/// Control characters (0x00-0x1F, except newline/tab/carriage return) are
/// dropped; everything else, including non-ASCII text, is preserved.
pub fn sanitize_error_message(message: &str) -> String {
    message
        .chars()
        .filter(|c| !c.is_ascii_control() || matches!(c, '\t' | '\n' | '\r'))
        .collect()
}

/// Sanitizes and truncates an error message to `MAX_ERROR_MESSAGE_LENGTH` bytes.
///
/// Truncation happens on a character boundary and appends an indicator with
/// the original length.
pub fn sanitize_and_truncate_error_message(message: &str) -> String {
    let sanitized = sanitize_error_message(message);

    if sanitized.len() <= MAX_ERROR_MESSAGE_LENGTH {
        return sanitized;
    }

    // Leave room for the truncation message
    let mut cut = MAX_ERROR_MESSAGE_LENGTH.saturating_sub(50);
    while !sanitized.is_char_boundary(cut) {
        cut -= 1;
    }
    format!(
        "{}... (truncated, original length: {} chars)",
        &sanitized[..cut],
        sanitized.len()
    )
}

/// Extracts a readable message from a panic payload.
pub fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_error_message_removes_control_chars() {
        let input = "Error\x00message\x01with\x02control\x1bchars";
        assert_eq!(sanitize_error_message(input), "Errormessagewithcontrolchars");
    }

    #[test]
    fn test_sanitize_error_message_preserves_whitespace_and_unicode() {
        let input = "Error\nmessage\twith 影響度 🚀\r";
        assert_eq!(sanitize_error_message(input), input);
    }

    #[test]
    fn test_truncate_short_message_untouched() {
        assert_eq!(sanitize_and_truncate_error_message("short"), "short");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let input = "あ".repeat(MAX_ERROR_MESSAGE_LENGTH);
        let output = sanitize_and_truncate_error_message(&input);
        assert!(output.len() <= MAX_ERROR_MESSAGE_LENGTH);
        assert!(output.contains("truncated"));
    }

    #[test]
    fn test_panic_message_variants() {
        let boxed: Box<dyn std::any::Any + Send> = Box::new("static str");
        assert_eq!(panic_message(&*boxed), "static str");
        let boxed: Box<dyn std::any::Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(&*boxed), "owned");
        let boxed: Box<dyn std::any::Any + Send> = Box::new(42u32);
        assert_eq!(panic_message(&*boxed), "unknown panic");
    }
}
