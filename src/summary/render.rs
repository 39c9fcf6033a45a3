//! Summary page rendering.

use std::fmt::Write;

use strum::IntoEnumIterator;

use super::collect::{PageSummary, SummaryTotals};
use crate::analyzer::Impact;
use crate::report::{escape_html, is_http_url, Translations};

const SORT_SCRIPT: &str = r#"(function () {
  var table = document.getElementById('summary-table');
  if (!table) { return; }
  var headers = table.querySelectorAll('thead th');
  headers.forEach(function (th, column) {
    var button = th.querySelector('button');
    if (!button) { return; }
    button.addEventListener('click', function () {
      var ascending = th.getAttribute('aria-sort') !== 'ascending';
      headers.forEach(function (other) { other.setAttribute('aria-sort', 'none'); });
      th.setAttribute('aria-sort', ascending ? 'ascending' : 'descending');
      var numeric = button.dataset.sort === 'number';
      var body = table.tBodies[0];
      var rows = Array.prototype.slice.call(body.rows);
      rows.sort(function (a, b) {
        var x = a.cells[column].dataset.value;
        var y = b.cells[column].dataset.value;
        var order = numeric ? Number(x) - Number(y) : x.localeCompare(y);
        return ascending ? order : -order;
      });
      rows.forEach(function (row) { body.appendChild(row); });
    });
  });
})();"#;

const EXTERNAL_ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" fill="none" viewBox="0 0 24 24" stroke-width="1.5" stroke="currentColor" class="report-link-ex-icon" aria-hidden="true"><path stroke-linecap="round" stroke-linejoin="round" d="M13.5 6H5.25A2.25 2.25 0 0 0 3 8.25v10.5A2.25 2.25 0 0 0 5.25 21h10.5A2.25 2.25 0 0 0 18 18.75V10.5m-10.5 6L21 3m0 0h-5.25M21 3v5.25" /></svg>"#;

/// Renders `summary/index.html`.
pub fn render_summary(
    pages: &[PageSummary],
    totals: &SummaryTotals,
    text: &Translations,
    styles: &str,
) -> String {
    let title = escape_html(text.summary_title);
    let mut html = String::new();
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"{lang}\">\n<head>\n<meta charset=\"UTF-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width\">\n<title>{title}</title>\n\
         <style>\n{styles}\n</style>\n</head>\n<body>\n<header>\n<h1>{title}</h1>\n</header>\n<main>\n",
        lang = text.lang,
    );
    html.push_str(&render_cards(totals, text));
    html.push_str(&render_table(pages, text));
    let _ = write!(
        html,
        "</main>\n<script>\n{}\n</script>\n</body>\n</html>\n",
        SORT_SCRIPT
    );
    html
}

fn render_cards(totals: &SummaryTotals, text: &Translations) -> String {
    let mut html = String::from("<ul class=\"summary-cards\">\n");
    let _ = writeln!(
        html,
        "<li class=\"summary-card\"><h2>{}</h2><dl><dt>{}</dt><dd data-count=\"{}\">{}</dd></dl></li>",
        escape_html(text.summary_issues),
        escape_html(text.summary_pages),
        totals.pages,
        totals.pages
    );
    for impact in Impact::iter() {
        let total = totals.get(impact);
        let _ = writeln!(
            html,
            "<li class=\"summary-card\" data-impact=\"{key}\"><h2><span class=\"violationLabel {key}\">{label}</span></h2>\
             <dl><dt>{occurrences_label}</dt><dd data-count=\"{occurrences}\">{occurrences}</dd>\
             <dt>{pages_label}</dt><dd data-pages=\"{affected}\">{affected} / {pages} ({percent:.1}%)</dd></dl></li>",
            key = impact.as_str(),
            label = escape_html(text.impact_label(impact)),
            occurrences_label = escape_html(text.summary_total),
            occurrences = total.occurrences,
            pages_label = escape_html(text.summary_pages_affected),
            affected = total.pages_affected,
            pages = totals.pages,
            percent = totals.percent_affected(impact),
        );
    }
    html.push_str("</ul>\n");
    html
}

fn render_table(pages: &[PageSummary], text: &Translations) -> String {
    let mut html = String::from(
        "<div class=\"summary-table\">\n<div class=\"overflow-table\" tabindex=\"0\">\n\
         <table id=\"summary-table\">\n<thead>\n<tr>\n",
    );
    html.push_str(
        "<th scope=\"col\" aria-sort=\"none\"><button type=\"button\" data-sort=\"text\">URL</button></th>\n",
    );
    for impact in Impact::iter() {
        let _ = writeln!(
            html,
            "<th scope=\"col\" aria-sort=\"none\"><button type=\"button\" data-sort=\"number\">{}</button></th>",
            escape_html(text.impact_label(impact))
        );
    }
    html.push_str("</tr>\n</thead>\n<tbody>\n");
    for page in pages {
        html.push_str(&render_row(page, text));
    }
    html.push_str("</tbody>\n</table>\n</div>\n</div>\n");
    html
}

fn render_row(page: &PageSummary, text: &Translations) -> String {
    let url = page.url.as_deref().unwrap_or("");
    let escaped_url = escape_html(url);
    let shown = if url.is_empty() {
        escape_html(text.unknown_url)
    } else {
        escaped_url.clone()
    };

    let mut cell = String::from("<div class=\"report-link\">");
    match &page.report_href {
        Some(href) => {
            let label = escape_html(&format!("{} {}", text.summary_open_report, url));
            let _ = write!(
                cell,
                "<a href=\"{}\" title=\"{label}\" aria-label=\"{label}\">{}</a>",
                escape_html(href),
                shown
            );
        }
        None => cell.push_str(&shown),
    }
    if is_http_url(url) {
        let label = escape_html(&format!("{} {}", text.summary_open_page, url));
        let _ = write!(
            cell,
            "<a class=\"report-link-ex\" href=\"{escaped_url}\" target=\"_blank\" rel=\"noopener\" \
             title=\"{label}\" aria-label=\"{label}\">{EXTERNAL_ICON}</a>"
        );
    }
    cell.push_str("</div>");

    let mut row = format!(
        "<tr>\n<th scope=\"row\" data-value=\"{}\">{}</th>\n",
        escaped_url, cell
    );
    for impact in Impact::iter() {
        let count = page.counts.get(impact);
        let _ = writeln!(
            row,
            "<td class=\"count\" data-impact=\"{}\" data-value=\"{}\">{}</td>",
            impact.as_str(),
            count,
            count
        );
    }
    row.push_str("</tr>\n");
    row
}
