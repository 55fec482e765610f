//! Markdown rendering of an [`AlternativesReport`].

use crate::config::UNCATEGORIZED;
use crate::loader::COLLECTIONS;

use super::AlternativesReport;

/// Renders `report` as Markdown, ending with instructions for updating the
/// content store.
pub fn render_alternatives_markdown(report: &AlternativesReport) -> String {
    let mut lines = vec![
        "# Alternative Link Suggestions".to_string(),
        format!("Generated: {}", report.timestamp),
        String::new(),
        "## Summary".to_string(),
        format!("- Problem links: {}", report.total_problem_links),
        format!("- Links with suggestions: {}", report.alternatives_found),
        format!("- Links without suggestions: {}", report.without_alternatives),
        format!(
            "- Source report: {} ({})",
            report.original_report.path,
            report
                .original_report
                .timestamp
                .as_deref()
                .unwrap_or("unknown time")
        ),
        String::new(),
        "## Suggestions".to_string(),
        String::new(),
    ];

    for (index, entry) in report.results.iter().enumerate() {
        let original = &entry.original;
        lines.push(format!("### {}. {}", index + 1, original.title));
        lines.push(format!("- Original link: {}", original.link));
        lines.push(format!(
            "- Category: {}",
            original.category.as_deref().unwrap_or(UNCATEGORIZED)
        ));
        if let Some(status) = original.status {
            match original.status_code {
                Some(code) => lines.push(format!("- Problem: {status} (HTTP {code})")),
                None => lines.push(format!("- Problem: {status}")),
            }
        }
        if let Some(message) = &original.error_message {
            lines.push(format!("- Error: {message}"));
        }
        lines.push(String::new());
        lines.push("#### Alternatives".to_string());

        if entry.alternatives.is_empty() {
            lines.push("No alternatives found.".to_string());
            lines.push(String::new());
        }
        for (n, alternative) in entry.alternatives.iter().enumerate() {
            lines.push(format!("{}. **{}**", n + 1, alternative.title));
            lines.push(format!("   - Link: {}", alternative.link));
            if let Some(snippet) = &alternative.snippet {
                lines.push(format!("   - Description: {snippet}"));
            }
            lines.push(String::new());
        }
        lines.push("---".to_string());
        lines.push(String::new());
    }

    lines.push("## How to update".to_string());
    lines.push(String::new());
    lines.push("1. Review the suggestions above and pick a replacement".to_string());
    lines.push("2. Find the entry in the content store:".to_string());
    for collection in COLLECTIONS {
        lines.push(format!(
            "   - {}: `{}` (or legacy `{}`)",
            collection.name, collection.json_file, collection.legacy_file
        ));
    }
    lines.push("3. Replace the link and save the file".to_string());
    lines.push("4. Re-run the checker to confirm: `link_checker check`".to_string());
    lines.push(String::new());

    lines.join("\n")
}
