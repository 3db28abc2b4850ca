//! Markdown rendering
//!
//! One `# <page>` heading per page followed by an HTML table, because
//! markdown tables cannot hold the links and notes comfortably.

use super::{PageReport, Report, ReportRow};
use quick_xml::escape::escape;

pub fn to_markdown(report: &Report) -> String {
    let mut out = String::new();
    for page in &report.pages {
        render_page(&mut out, page);
    }
    out
}

fn render_page(out: &mut String, page: &PageReport) {
    out.push_str(&format!(
        "\n# {}\n\n<table>\n  <tr>\n    <th>Term</th>\n    <th>Supported</th>\n    <th>Search</th>\n    <th>Notes</th>\n  </tr>\n",
        escape(page.page.as_str())
    ));
    for row in &page.rows {
        render_row(out, row);
    }
    out.push_str("</table>\n");
}

fn render_row(out: &mut String, row: &ReportRow) {
    out.push_str(&format!(
        "<tr>\n  <td><a href=\"{}\">{}</a></td>\n  <td>{}</td>\n  <td><a href=\"{}\">Search</a></td>\n  <td>{}</td>\n</tr>\n",
        escape(row.docs_link.as_str()),
        escape(row.display_term.as_str()),
        row.icon(),
        escape(row.search_link.as_str()),
        escape(row.note.as_str()),
    ));
}
