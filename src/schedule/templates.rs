//! Notification templates: problems found, all clear, and run error.

use crate::config::NOTIFICATION_PREVIEW_LIMIT;
use crate::models::CheckResult;

/// A rendered notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub html_body: String,
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Lists the first problem links; the rest are summarized as a count.
pub fn problems_notification(
    problem_links: &[CheckResult],
    checked_at: &str,
    report_path: &str,
) -> Notification {
    let mut body = vec![
        "<h1>Link Check Report</h1>".to_string(),
        format!("<p>Checked at: {}</p>", escape(checked_at)),
        format!("<p>Found {} problem links</p>", problem_links.len()),
        "<h2>Problem links</h2>".to_string(),
        "<ul>".to_string(),
    ];
    for link in problem_links.iter().take(NOTIFICATION_PREVIEW_LIMIT) {
        body.push(format!(
            "<li><strong>{}</strong>: {} - {}</li>",
            escape(&link.title),
            escape(&link.link),
            link.status
        ));
    }
    if problem_links.len() > NOTIFICATION_PREVIEW_LIMIT {
        body.push(format!(
            "<li>... and {} more</li>",
            problem_links.len() - NOTIFICATION_PREVIEW_LIMIT
        ));
    }
    body.push("</ul>".to_string());
    body.push(format!(
        "<p>Full report: {}</p>",
        escape(report_path)
    ));

    Notification {
        subject: format!("[Link Checker] Found {} problem links", problem_links.len()),
        html_body: body.join("\n"),
    }
}

pub fn success_notification(total_links: usize, checked_at: &str) -> Notification {
    Notification {
        subject: "[Link Checker] Check complete - all links are valid".to_string(),
        html_body: [
            "<h1>Link Check Report</h1>".to_string(),
            format!("<p>Checked at: {}</p>", escape(checked_at)),
            "<p>Every link is working.</p>".to_string(),
            format!("<p>{total_links} links checked.</p>"),
        ]
        .join("\n"),
    }
}

/// `error_chain` is the full cause chain of the failure.
pub fn error_notification(error_chain: &str, checked_at: &str) -> Notification {
    Notification {
        subject: "[Link Checker] Error during link check".to_string(),
        html_body: [
            "<h1>Link Check Error</h1>".to_string(),
            format!("<p>Checked at: {}</p>", escape(checked_at)),
            "<p>The scheduled link check failed:</p>".to_string(),
            format!("<pre>{}</pre>", escape(error_chain)),
        ]
        .join("\n"),
    }
}
