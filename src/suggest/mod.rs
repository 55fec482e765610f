//! Alternative-link suggestions for problem links.
//!
//! Reads the problem links of a saved report, searches for replacements
//! (through a real provider or the built-in fixture table) and writes an
//! [`AlternativesReport`] with its Markdown twin.

mod backend;
mod fixtures;
mod markdown;

use std::time::Duration;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::app::host_of;
use crate::models::LinkStatus;

pub use backend::{backend_from_settings, BingSearch, GoogleSearch, SearchBackend};
pub use fixtures::fixture_suggestions;
pub use markdown::render_alternatives_markdown;

/// One replacement candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub title: String,
    pub link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

/// A problem link as read back from a report file.
///
/// Only `title` and `link` matter for searching; every field is optional so
/// reports written by other tools still load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemLink {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<LinkStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// The parts of a saved report the suggester needs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceReport {
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub problem_links: Vec<ProblemLink>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginalReport {
    pub timestamp: Option<String>,
    pub path: String,
}

/// Suggestions for one problem link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlternativeEntry {
    pub original: ProblemLink,
    pub alternatives: Vec<Suggestion>,
    pub has_alternatives: bool,
}

/// Aggregate of one suggester run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlternativesReport {
    pub timestamp: String,
    pub original_report: OriginalReport,
    pub total_problem_links: usize,
    pub alternatives_found: usize,
    pub without_alternatives: usize,
    pub results: Vec<AlternativeEntry>,
}

impl AlternativesReport {
    pub fn new(timestamp: String, original_report: OriginalReport, results: Vec<AlternativeEntry>) -> Self {
        let alternatives_found = results.iter().filter(|r| r.has_alternatives).count();
        Self {
            timestamp,
            original_report,
            total_problem_links: results.len(),
            alternatives_found,
            without_alternatives: results.len() - alternatives_found,
            results,
        }
    }
}

/// Builds `"<title> alternative to <domain> <category>"`, leaving out
/// empty parts.
pub fn build_query(link: &ProblemLink) -> String {
    let domain = host_of(&link.link).map(|host| format!("alternative to {host}"));
    [
        Some(link.title.trim().to_string()),
        domain,
        link.category.as_ref().map(|c| c.trim().to_string()),
    ]
    .into_iter()
    .flatten()
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(" ")
}

/// Finds replacement candidates for problem links.
pub struct AlternativeFinder {
    backend: Option<Box<dyn SearchBackend>>,
    max_results: usize,
    delay: Duration,
}

impl AlternativeFinder {
    /// A finder over `backend`; `None` means fixture suggestions only.
    pub fn new(backend: Option<Box<dyn SearchBackend>>, max_results: usize, delay: Duration) -> Self {
        Self {
            backend,
            max_results,
            delay,
        }
    }

    /// Candidates for one link. Backend failures fall back to fixtures.
    pub async fn suggest(&self, link: &ProblemLink) -> Vec<Suggestion> {
        let query = build_query(link);
        info!("Search query: \"{query}\"");

        let Some(backend) = &self.backend else {
            return fixture_suggestions(&link.title);
        };
        match backend.search(&query, self.max_results).await {
            Ok(results) => results,
            Err(e) => {
                warn!(
                    "{} search failed for \"{query}\": {e}; using built-in suggestions",
                    backend.name()
                );
                fixture_suggestions(&link.title)
            }
        }
    }

    /// Suggestions for every link, in order.
    ///
    /// The configured delay separates successive real searches.
    pub async fn find_all(&self, links: &[ProblemLink]) -> Vec<AlternativeEntry> {
        let mut entries = Vec::with_capacity(links.len());
        for (index, link) in links.iter().enumerate() {
            if index > 0 && self.backend.is_some() && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            info!("[{}/{}] {} ({})", index + 1, links.len(), link.title, link.link);
            let alternatives = self.suggest(link).await;
            entries.push(AlternativeEntry {
                original: link.clone(),
                has_alternatives: !alternatives.is_empty(),
                alternatives,
            });
        }
        entries
    }
}
