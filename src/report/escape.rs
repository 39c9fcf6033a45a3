//! HTML escaping and template substitution.

/// Escapes `& < > " '` for use in element content and quoted attributes.
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Escapes like [`escape_html`] and turns line breaks into `<br>`.
pub fn escape_multiline(raw: &str) -> String {
    escape_html(&raw.replace("\r\n", "\n")).replace('\n', "<br>")
}

/// Returns `true` for absolute http(s) URLs, the only links reports emit.
pub fn is_http_url(raw: &str) -> bool {
    url::Url::parse(raw.trim()).is_ok_and(|u| matches!(u.scheme(), "http" | "https"))
}

/// Replaces `{{NAME}}` placeholders in one left-to-right pass.
///
/// Substituted values are copied verbatim and never scanned again, so a value
/// containing `{{...}}` stays literal. Unknown placeholders are left as-is.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let extra: usize = values.iter().map(|(_, value)| value.len()).sum();
    let mut out = String::with_capacity(template.len() + extra);
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let name = &after[..end];
        match values.iter().find(|(key, _)| *key == name) {
            Some((_, value)) => out.push_str(value),
            None => {
                out.push_str("{{");
                out.push_str(name);
                out.push_str("}}");
            }
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_escape_html_all_five() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#039;Jerry&#039;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_escape_multiline() {
        assert_eq!(escape_multiline("a<b\r\nc\nd"), "a&lt;b<br>c<br>d");
    }

    #[test]
    fn test_is_http_url() {
        assert!(is_http_url("https://dequeuniversity.com/rules/axe/4.10/image-alt"));
        assert!(is_http_url("http://example.com"));
        assert!(!is_http_url("javascript:alert(1)"));
        assert!(!is_http_url("data:text/html,hi"));
        assert!(!is_http_url("/relative/path"));
        assert!(!is_http_url(""));
    }

    #[test]
    fn test_fill_template_single_pass() {
        let out = fill_template(
            "<title>{{TITLE}}</title><p>{{BODY}}</p>",
            &[("TITLE", "{{BODY}}"), ("BODY", "text")],
        );
        assert_eq!(out, "<title>{{BODY}}</title><p>text</p>");
    }

    #[test]
    fn test_fill_template_unknown_and_unterminated() {
        assert_eq!(fill_template("{{NOPE}} {{X}}", &[("X", "1")]), "{{NOPE}} 1");
        assert_eq!(fill_template("a {{X", &[("X", "1")]), "a {{X");
        assert_eq!(fill_template("{{X}}{{X}}", &[("X", "ab")]), "abab");
    }

    proptest! {
        #[test]
        fn prop_escaped_text_has_no_raw_specials(raw in "\\PC{0,64}") {
            let escaped = escape_html(&raw);
            prop_assert!(!escaped.contains('<'));
            prop_assert!(!escaped.contains('>'));
            prop_assert!(!escaped.contains('"'));
            prop_assert!(!escaped.contains('\''));
            // Every '&' starts one of the five entities
            for (i, _) in escaped.match_indices('&') {
                let tail = &escaped[i..];
                prop_assert!(
                    ["&amp;", "&lt;", "&gt;", "&quot;", "&#039;"]
                        .iter()
                        .any(|entity| tail.starts_with(entity))
                );
            }
        }
    }
}
