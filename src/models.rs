//! Core data types shared by the checker, report and suggester.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

use crate::config::UNCATEGORIZED;

/// A curated entry whose link is checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// Unique within a run
    pub id: String,
    pub title: String,
    /// Absolute URL
    pub link: String,
    /// Missing categories are reported under "Uncategorized"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Resource {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        link: impl Into<String>,
        category: Option<&str>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            link: link.into(),
            category: category.map(str::to_string),
        }
    }

    /// Category, or the "Uncategorized" bucket.
    pub fn category_or_default(&self) -> &str {
        self.category.as_deref().unwrap_or(UNCATEGORIZED)
    }
}

/// Final (or per-layer) classification of a link.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LinkStatus {
    Valid,
    /// A response arrived but its status code is not accepted
    Invalid,
    Timeout,
    /// Network, protocol or browser failure
    Error,
}

/// Which layer produced a `valid` verdict (or the final failed verdict).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum CheckMethod {
    Http,
    Browser,
    /// Browser check failed but policy accepted the link anyway
    BrowserFallback,
}

/// Outcome of the headless-browser layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowserCheck {
    pub status: LinkStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl BrowserCheck {
    pub(crate) fn failed(status: LinkStatus, status_code: Option<u16>, message: String) -> Self {
        Self {
            status,
            status_code,
            error_message: Some(message),
        }
    }
}

/// Per-link verdict with its diagnostic trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    pub id: String,
    pub title: String,
    pub link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub status: LinkStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Milliseconds for the last HTTP response received
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_time: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
    /// HTTP attempts made (first try included)
    pub attempts: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<CheckMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser_check: Option<BrowserCheck>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub validated_with_fallback: bool,
    /// Timestamped diagnostic trail, in order
    #[serde(default)]
    pub logs: Vec<String>,
}

impl CheckResult {
    /// A blank `error` result for `resource`; the checker fills it in.
    pub fn pending(resource: &Resource) -> Self {
        Self {
            id: resource.id.clone(),
            title: resource.title.clone(),
            link: resource.link.clone(),
            category: resource.category.clone(),
            status: LinkStatus::Error,
            status_code: None,
            error_message: None,
            response_time: None,
            content_type: None,
            last_modified: None,
            attempts: 0,
            method: None,
            browser_check: None,
            validated_with_fallback: false,
            logs: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.status == LinkStatus::Valid
    }

    pub fn category_or_default(&self) -> &str {
        self.category.as_deref().unwrap_or(UNCATEGORIZED)
    }
}
