//! Localized report text.
//!
//! English and Japanese are built in. Any other locale uses English.

use crate::analyzer::Impact;

/// Every user-facing string in reports, the CSV log and the summary page.
#[derive(Debug)]
pub struct Translations {
    pub lang: &'static str,
    pub title: &'static str,
    pub violations: &'static str,
    pub failure_message: &'static str,
    pub failure_summary: &'static str,
    pub screenshot_alt: &'static str,
    pub no_screenshot: &'static str,
    pub target_html: &'static str,
    pub help_page: &'static str,
    pub no_issues: &'static str,
    pub impact: &'static str,
    pub filter: &'static str,
    pub filter_note: &'static str,
    pub filter_reset: &'static str,
    pub filter_reset_aria: &'static str,
    /// minor, moderate, serious, critical
    impact_labels: [&'static str; 4],
    pub csv_headers: [&'static str; 9],
    pub summary_title: &'static str,
    pub summary_issues: &'static str,
    pub summary_pages: &'static str,
    pub summary_total: &'static str,
    pub summary_pages_affected: &'static str,
    pub summary_open_report: &'static str,
    pub summary_open_page: &'static str,
    pub unknown_url: &'static str,
}

impl Translations {
    pub fn impact_label(&self, impact: Impact) -> &'static str {
        self.impact_labels[impact as usize]
    }
}

static EN: Translations = Translations {
    lang: "en",
    title: "Accessibility Report",
    violations: "Test Result",
    failure_message: "Failure Message",
    failure_summary: "Failure Summary",
    screenshot_alt: "Screenshot of the page",
    no_screenshot: "No screenshot available",
    target_html: "Target HTML",
    help_page: "More Information",
    no_issues: "You have (0) automatic issues, nice!",
    impact: "Impact",
    filter: "Impact Filter",
    filter_note: "(Uncheck to hide failures of the corresponding impact level)",
    filter_reset: "Reset Filter",
    filter_reset_aria: "Reset the impact filter to display all failures.",
    impact_labels: ["Minor", "Moderate", "Serious", "Critical"],
    csv_headers: [
        "url",
        "Check",
        "helpUrl",
        "tag",
        "Impact",
        "Failure Message",
        "Failure Summary",
        "Target HTML",
        "DOM",
    ],
    summary_title: "Accessibility Audit Summary",
    summary_issues: "Identified Issues",
    summary_pages: "Pages",
    summary_total: "Occurrences",
    summary_pages_affected: "Pages affected",
    summary_open_report: "Open the detailed report for",
    summary_open_page: "Open the live page in a new window:",
    unknown_url: "Unknown URL",
};

static JA: Translations = Translations {
    lang: "ja",
    title: "アクセシビリティレポート",
    violations: "試験結果",
    failure_message: "発見された問題点",
    failure_summary: "修正提案",
    screenshot_alt: "ページのスクリーンショット",
    no_screenshot: "スクリーンショットはありません",
    target_html: "対象 HTML",
    help_page: "参考情報",
    no_issues: "問題点は発見されませんでした！",
    impact: "影響度",
    filter: "影響度フィルター",
    filter_note: "（チェックを外すと該当する影響度の問題点が非表示になります）",
    filter_reset: "フィルターをリセット",
    filter_reset_aria: "影響度フィルターをリセットしてすべての問題点を表示",
    impact_labels: ["軽度", "中程度", "深刻", "重大"],
    csv_headers: [
        "url",
        "チェック内容",
        "helpUrl",
        "tag",
        "影響度",
        "発見された問題点",
        "修正提案",
        "対象HTML",
        "DOM",
    ],
    summary_title: "アクセシビリティ試験結果サマリー",
    summary_issues: "発見された問題点",
    summary_pages: "ページ数",
    summary_total: "件数",
    summary_pages_affected: "該当ページ",
    summary_open_report: "詳細レポートを開く:",
    summary_open_page: "実際のページを別窓で開く:",
    unknown_url: "URL 不明",
};

/// Looks up text for a locale tag such as `ja`, `ja-JP` or `en_US`.
pub fn translations(locale: &str) -> &'static Translations {
    let language = locale
        .split(['-', '_'])
        .next()
        .unwrap_or("")
        .to_ascii_lowercase();
    match language.as_str() {
        "ja" => &JA,
        _ => &EN,
    }
}
