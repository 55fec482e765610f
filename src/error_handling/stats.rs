//! Failure statistics tracking.
//!
//! Thread-safe counters for failure signatures observed while checking links.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::IntoEnumIterator;

use super::types::FailureKind;

/// Thread-safe failure counter.
///
/// Every [`FailureKind`] is initialized to zero on creation, so lookups never
/// miss. Shared across check tasks through the owning `LinkChecker`.
pub struct FailureStats {
    counts: HashMap<FailureKind, AtomicUsize>,
}

impl FailureStats {
    pub fn new() -> Self {
        let mut counts = HashMap::new();
        for kind in FailureKind::iter() {
            counts.insert(kind, AtomicUsize::new(0));
        }
        FailureStats { counts }
    }

    pub fn increment(&self, kind: FailureKind) {
        if let Some(counter) = self.counts.get(&kind) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!("No failure counter registered for {:?}", kind);
        }
    }

    pub fn get(&self, kind: FailureKind) -> usize {
        self.counts
            .get(&kind)
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        FailureKind::iter().map(|k| self.get(k)).sum()
    }

    /// Non-zero counts in declaration order.
    pub fn non_zero(&self) -> Vec<(FailureKind, usize)> {
        FailureKind::iter()
            .map(|k| (k, self.get(k)))
            .filter(|(_, n)| *n > 0)
            .collect()
    }
}

impl Default for FailureStats {
    fn default() -> Self {
        Self::new()
    }
}
