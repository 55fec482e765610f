//! Batch orchestration.
//!
//! Links are checked in fixed-size batches: every member of a batch runs
//! concurrently and the next batch starts only after the whole batch has
//! finished. This bounds the concurrent HTTP connections and browser
//! instances to `batch_size`.

use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use log::{error, info};
use rand::seq::SliceRandom;

use crate::app::log_progress;
use crate::checker::LinkChecker;
use crate::config::TestModeSettings;
use crate::error_handling::FailureKind;
use crate::models::{CheckResult, LinkStatus, Resource};

/// Checks every resource and returns exactly one result per resource, in
/// input order.
///
/// A `batch_size` of 0 is treated as 1. A check task that panics still
/// yields an `error` result for its resource.
pub async fn check_all_links(
    checker: Arc<LinkChecker>,
    resources: Vec<Resource>,
    batch_size: usize,
) -> Vec<CheckResult> {
    let total = resources.len();
    let batch_size = batch_size.max(1);
    let start_time = Instant::now();
    let mut results = Vec::with_capacity(total);

    info!(
        "Checking {} links in batches of {}",
        total, batch_size
    );

    for batch in resources.chunks(batch_size) {
        let tasks = batch.iter().cloned().map(|resource| {
            let checker = Arc::clone(&checker);
            tokio::spawn(async move { checker.check_link(&resource).await })
        });
        let outcomes = join_all(tasks).await;

        for (resource, outcome) in batch.iter().zip(outcomes) {
            match outcome {
                Ok(result) => results.push(result),
                Err(join_error) => {
                    error!("Check task for {} failed: {join_error}", resource.link);
                    checker.failure_stats().increment(FailureKind::TaskPanic);
                    results.push(aborted_result(resource, &join_error.to_string()));
                }
            }
        }

        log_progress(start_time, results.len(), total);
    }

    results
}

fn aborted_result(resource: &Resource, reason: &str) -> CheckResult {
    let mut result = CheckResult::pending(resource);
    result.status = LinkStatus::Error;
    result.error_message = Some(format!("Check aborted: {reason}"));
    result
}

/// Applies test mode: a random sample of at most `limit_count` resources.
///
/// Returns `resources` unchanged when test mode is off.
pub fn select_for_run(mut resources: Vec<Resource>, test_mode: &TestModeSettings) -> Vec<Resource> {
    if !test_mode.enabled {
        return resources;
    }
    resources.shuffle(&mut rand::rng());
    resources.truncate(test_mode.limit_count);
    info!(
        "Test mode: checking a random sample of {} links",
        resources.len()
    );
    resources
}
