//! Server-rendered moderation pages.

use crate::models::Report;

pub const LIST_PATH: &str = "/reports/admin/reports";

/// Escape text for inclusion in HTML element content or attribute values.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
body {{ font-family: sans-serif; margin: 2rem; color: #1f2937; }}
table {{ border-collapse: collapse; width: 100%; }}
th, td {{ border: 1px solid #d1d5db; padding: 0.4rem 0.6rem; text-align: left; }}
th {{ background: #f3f4f6; }}
.status-pending {{ color: #b45309; }}
.status-approved {{ color: #047857; }}
.status-rejected {{ color: #b91c1c; }}
dt {{ font-weight: bold; margin-top: 0.6rem; }}
</style>
</head>
<body>
{body}
</body>
</html>
"#,
        title = escape(title),
        body = body
    )
}

fn optional(value: &Option<String>) -> String {
    value.as_deref().map(escape).unwrap_or_else(|| "&mdash;".to_string())
}

/// Listing of reports, newest first, with a language filter form.
pub fn report_list(reports: &[Report], language: Option<&str>) -> String {
    let language = language.unwrap_or_default();
    let mut body = String::new();

    body.push_str(&format!(
        r#"<h1>Incident Reports</h1>
<form method="get" action="{LIST_PATH}">
<label for="language">Language</label>
<input id="language" name="language" value="{language}" placeholder="e.g. en">
<button type="submit">Filter</button>
<a href="{LIST_PATH}">Clear</a>
</form>
<p>{count} report(s)</p>
"#,
        language = escape(language),
        count = reports.len()
    ));

    if reports.is_empty() {
        body.push_str("<p>No reports found.</p>\n");
        return layout("Incident Reports", &body);
    }

    body.push_str(
        "<table>\n<thead><tr><th>Submitted</th><th>Type</th><th>Language</th><th>Location</th><th>Status</th><th></th></tr></thead>\n<tbody>\n",
    );
    for report in reports {
        let id = escape(&report.id);
        let action = if report.finalized {
            format!(r#"<a href="{LIST_PATH}/{id}/view">View</a>"#)
        } else {
            format!(
                r#"<a href="{LIST_PATH}/{id}/view">View</a> | <a href="{LIST_PATH}/{id}/finalize">Finalize</a>"#
            )
        };
        body.push_str(&format!(
            "<tr><td>{timestamp}</td><td>{report_type}</td><td>{language}</td><td>{location}</td><td class=\"status-{status}\">{status}</td><td>{action}</td></tr>\n",
            timestamp = report.timestamp.format("%Y-%m-%d %H:%M UTC"),
            report_type = escape(&report.report_type),
            language = escape(&report.language),
            location = optional(&report.location),
            status = report.status,
        ));
    }
    body.push_str("</tbody>\n</table>\n");

    layout("Incident Reports", &body)
}

fn details(report: &Report) -> String {
    format!(
        r#"<dl>
<dt>ID</dt><dd>{id}</dd>
<dt>Submitted</dt><dd>{timestamp}</dd>
<dt>Type</dt><dd>{report_type}</dd>
<dt>Description</dt><dd>{description}</dd>
<dt>Location</dt><dd>{location}</dd>
<dt>Language</dt><dd>{language}</dd>
<dt>Status</dt><dd class="status-{status}">{status}</dd>
<dt>Finalized</dt><dd>{finalized}</dd>
<dt>Notes</dt><dd>{notes}</dd>
</dl>
"#,
        id = escape(&report.id),
        timestamp = report.timestamp.to_rfc3339(),
        report_type = escape(&report.report_type),
        description = escape(&report.description),
        location = optional(&report.location),
        language = escape(&report.language),
        status = report.status,
        finalized = if report.finalized { "yes" } else { "no" },
        notes = optional(&report.notes),
    )
}

fn back_link() -> String {
    format!("<p><a href=\"{LIST_PATH}\">Back to reports</a></p>\n")
}

/// Read-only detail page.
pub fn report_detail(report: &Report) -> String {
    let mut body = String::from("<h1>Report Details</h1>\n");
    body.push_str(&details(report));
    if !report.finalized {
        body.push_str(&format!(
            "<p><a href=\"{LIST_PATH}/{id}/finalize\">Finalize this report</a></p>\n",
            id = escape(&report.id)
        ));
    }
    body.push_str(&back_link());
    layout("Report Details", &body)
}

/// Detail page with the approve/reject form.
pub fn finalize_form(report: &Report) -> String {
    let id = escape(&report.id);
    let mut body = String::from("<h1>Finalize Report</h1>\n");
    body.push_str(&details(report));

    if report.finalized {
        body.push_str("<p>This report has already been finalized.</p>\n");
    } else {
        body.push_str(&format!(
            r#"<form method="post" action="{LIST_PATH}/{id}/finalize">
<label for="action">Decision</label>
<select id="action" name="action">
<option value="approve">Approve</option>
<option value="reject">Reject</option>
</select>
<br>
<label for="notes">Notes</label><br>
<textarea id="notes" name="notes" rows="4" cols="60"></textarea>
<br>
<button type="submit">Submit</button>
</form>
"#
        ));
    }
    body.push_str(&back_link());
    layout("Finalize Report", &body)
}
