//! Per-page HTML reports.
//!
//! The template and stylesheet are loaded once per run. Rendering is a pure
//! function of the URL, the analysis result, the screenshot reference and the
//! locale.

pub mod csv;
mod escape;
mod translations;

use std::fmt::Write;

use strum::IntoEnumIterator;

use crate::analyzer::{AnalysisResult, Impact, Violation, ViolationNode};

pub use self::csv::CsvReport;
pub use escape::{escape_html, escape_multiline, fill_template, is_http_url};
pub use translations::{translations, Translations};

const ICON_CHECK: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" fill="none" viewBox="0 0 24 24" stroke-width="1.5" stroke="currentColor"><path stroke-linecap="round" stroke-linejoin="round" d="M4.5 12.75l6 6 9-13.5" /></svg>"#;
const ICON_ALERT: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" fill="none" viewBox="0 0 24 24" stroke-width="1.5" stroke="currentColor"><path stroke-linecap="round" stroke-linejoin="round" d="M12 9v3.75m9-.75a9 9 0 11-18 0 9 9 0 0118 0zm-9 3.75h.008v.008H12v-.008z" /></svg>"#;

/// Renders HTML reports from a template with `{{STYLE}}`, `{{LOCALE}}`,
/// `{{PAGE_TITLE}}`, `{{URL}}`, `{{HEADER}}` and `{{CONTENT}}` placeholders.
#[derive(Debug, Clone)]
pub struct ReportRenderer {
    template: String,
    styles: String,
}

impl ReportRenderer {
    pub fn new(template: impl Into<String>, styles: impl Into<String>) -> Self {
        ReportRenderer {
            template: template.into(),
            styles: styles.into(),
        }
    }

    /// Renders one report.
    ///
    /// `screenshot` is the image reference relative to the report, if one was
    /// captured.
    pub fn render(
        &self,
        url: &str,
        result: &AnalysisResult,
        screenshot: Option<&str>,
        locale: &str,
    ) -> String {
        let text = translations(locale);
        let url = escape_html(url);
        let style = format!("<style>{}</style>", self.styles);
        let header = render_header(text, &url);
        let content = render_content(text, result, screenshot);

        fill_template(
            &self.template,
            &[
                ("STYLE", &style),
                ("LOCALE", text.lang),
                ("PAGE_TITLE", text.title),
                ("URL", &url),
                ("HEADER", &header),
                ("CONTENT", &content),
            ],
        )
    }
}

fn render_header(text: &Translations, escaped_url: &str) -> String {
    format!(
        r#"<hgroup class="title">
            <h1>{title}</h1>
            <p class="testUrl"><span class="urlLabel">URL:</span> {url}</p>
        </hgroup>"#,
        title = text.title,
        url = escaped_url,
    )
}

fn render_content(text: &Translations, result: &AnalysisResult, screenshot: Option<&str>) -> String {
    let screenshot = match screenshot {
        Some(src) => format!(
            r#"<img src="{}" alt="{}">"#,
            escape_html(src),
            text.screenshot_alt
        ),
        None => format!(r#"<div class="no-screenshot">{}</div>"#, text.no_screenshot),
    };

    let mut body = String::new();
    if result.violation_count() == 0 {
        let _ = write!(
            body,
            r#"<div class="violationBody">
                <p class="noIssues"><span class="icon" aria-hidden="true">{icon}</span>{label}</p>
            </div>"#,
            icon = ICON_CHECK,
            label = text.no_issues,
        );
    } else {
        body.push_str(&render_filter(text, result));
        for violation in result.violations().iter().filter(|v| !v.nodes.is_empty()) {
            body.push_str(&render_violation(text, violation));
        }
    }

    format!(
        r#"<div class="main-contents">
            <div class="screenshot">{screenshot}</div>
            <div class="violation">
                <div class="violationHeader"><h2>{heading}</h2></div>
                {body}
            </div>
        </div>"#,
        screenshot = screenshot,
        heading = text.violations,
        body = body,
    )
}

fn render_filter(text: &Translations, result: &AnalysisResult) -> String {
    let counts = result.impact_counts();
    let mut items = String::new();
    for impact in Impact::iter() {
        let key = impact.as_str();
        let _ = write!(
            items,
            r#"<li class="impactCount" data-impact="{key}" data-count="{count}">
                <input class="sr-only" type="checkbox" name="filter-{key}" id="filter-{key}" checked>
                <label class="violationFilterBtn" for="filter-{key}">
                    <span class="violationLabel {key}">{label}</span>
                    <span class="violationFilterNum">{count}</span>
                </label>
            </li>"#,
            key = key,
            count = counts.get(impact),
            label = text.impact_label(impact),
        );
    }

    format!(
        r#"<div class="violationSummary">
            <dl class="violationFilter">
                <dt>{filter}<span class="sr-only">{note}</span></dt>
                <dd>
                    <ul>
                        {items}
                        <li class="violationFilterReset">
                            <button type="button" class="violationFilterResetBtn" id="filter-reset" aria-label="{reset_aria}">{reset}</button>
                        </li>
                    </ul>
                </dd>
            </dl>
        </div>"#,
        filter = text.filter,
        note = text.filter_note,
        items = items,
        reset_aria = text.filter_reset_aria,
        reset = text.filter_reset,
    )
}

fn render_violation(text: &Translations, violation: &Violation) -> String {
    let help = if is_http_url(&violation.help_url) {
        format!(
            r#"<div class="helpUrl"><dl><dt>{label}</dt><dd><a href="{href}" target="_blank" rel="noopener">{help}</a></dd></dl></div>"#,
            label = text.help_page,
            href = escape_html(violation.help_url.trim()),
            help = escape_html(&violation.help),
        )
    } else {
        format!(
            r#"<div class="helpUrl"><dl><dt>{}</dt><dd>{}</dd></dl></div>"#,
            text.help_page,
            escape_html(&violation.help)
        )
    };

    let tags: String = violation
        .tags
        .iter()
        .map(|tag| format!("<li><span>{}</span></li>", escape_html(tag)))
        .collect();
    let nodes: String = violation
        .nodes
        .iter()
        .map(|node| render_node(text, node))
        .collect();

    format!(
        r#"<div class="violationBody">
            <div class="violationBodyHeader">
                <h3>{title}</h3>
                {help}
                <div class="tagList"><ul>{tags}</ul></div>
            </div>
            <div class="violationItem"><ul>{nodes}</ul></div>
        </div>"#,
        title = escape_html(violation.summary()),
        help = help,
        tags = tags,
        nodes = nodes,
    )
}

fn render_node(text: &Translations, node: &ViolationNode) -> String {
    let (impact_key, impact_label) = match node.impact {
        Some(impact) => (impact.as_str(), text.impact_label(impact)),
        None => ("unknown", "-"),
    };
    let messages: String = node
        .failure_messages()
        .map(|message| {
            format!(
                r#"<li><span class="failureListIcon" aria-hidden="true">{}</span>{}</li>"#,
                ICON_ALERT,
                escape_multiline(message)
            )
        })
        .collect();
    let selector = node.selectors().into_iter().next().unwrap_or_default();

    format!(
        r#"<li data-impact="{impact_key}">
            <dl>
                <div class="failureMessage">
                    <dt>{failure_message} <span class="impact">{impact} <span class="impactLabel {impact_key}">{impact_label}</span></span></dt>
                    <dd class="failureList"><ul>{messages}</ul></dd>
                </div>
                <div class="failureSummary">
                    <dt>{failure_summary}</dt>
                    <dd>{summary}</dd>
                </div>
                <div class="targetHTML">
                    <dt>{target_html}</dt>
                    <dd><code tabindex="0">{html}</code></dd>
                </div>
                <div class="targetDom">
                    <dt>DOM</dt>
                    <dd><code tabindex="0">{selector}</code></dd>
                </div>
            </dl>
        </li>"#,
        impact_key = impact_key,
        failure_message = text.failure_message,
        impact = text.impact,
        impact_label = impact_label,
        messages = messages,
        failure_summary = text.failure_summary,
        summary = escape_multiline(&node.failure_summary),
        target_html = text.target_html,
        html = escape_html(&node.html),
        selector = escape_html(&selector),
    )
}
