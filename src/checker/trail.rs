//! Per-link diagnostic trail.

use std::sync::Mutex;

use chrono::{SecondsFormat, Utc};
use log::{debug, info};

/// Ordered, timestamped messages describing how one link was checked.
///
/// Shared by reference across retry attempts; entries are appended under a
/// lock that is never held across an await point.
pub(crate) struct Trail {
    link: String,
    verbose: bool,
    entries: Mutex<Vec<String>>,
}

impl Trail {
    pub fn new(link: &str, verbose: bool) -> Self {
        Self {
            link: link.to_string(),
            verbose,
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Appends `[<RFC 3339 UTC, millis>] message` and echoes it to the log.
    pub fn push(&self, message: impl AsRef<str>) {
        let message = message.as_ref();
        if self.verbose {
            info!("[{}] {}", self.link, message);
        } else {
            debug!("[{}] {}", self.link, message);
        }
        let line = format!(
            "[{}] {}",
            Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            message
        );
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(line);
    }

    pub fn into_entries(self) -> Vec<String> {
        self.entries
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
