//! The `scheduled` tool: check, suggest on problems, notify, rotate logs.

use std::sync::Arc;
use std::time::SystemTime;

use anyhow::Result;
use chrono::Utc;
use log::{error, info, warn};

use crate::browser::BrowserDriver;
use crate::config::Settings;
use crate::report::iso_timestamp;
use crate::schedule::{
    cleanup_old_logs, error_notification, problems_notification, success_notification,
    Notification, Notifier,
};

use super::{run_check, run_suggest, CheckRun, SuggestRun};

/// What a scheduled run did.
#[derive(Debug, Default)]
pub struct ScheduledOutcome {
    /// The check run, unless it failed
    pub check: Option<CheckRun>,
    /// Suggestions, when problem links were found and suggesting succeeded
    pub suggestions: Option<SuggestRun>,
    /// Whether a notification was delivered (or skipped by a disabled notifier)
    pub notified: bool,
    /// Full error chain when the run failed
    pub error: Option<String>,
    /// Log files removed by rotation
    pub logs_removed: usize,
}

/// Runs the checker, then the suggester when problem links were found,
/// sends the matching notification and rotates old log files.
///
/// Never fails: errors are logged, reported through the error template and
/// recorded in the outcome.
pub async fn run_scheduled(
    settings: &Settings,
    driver: Arc<dyn BrowserDriver>,
    notifier: &dyn Notifier,
) -> ScheduledOutcome {
    info!("Scheduled link check started");
    let mut outcome = ScheduledOutcome::default();

    if let Err(e) = check_and_notify(settings, driver, notifier, &mut outcome).await {
        let chain = format!("{e:?}");
        error!("Scheduled link check failed: {chain}");
        if settings.notifications.email.send_on_errors {
            let notification = error_notification(&chain, &iso_timestamp(Utc::now()));
            outcome.notified = deliver(notifier, notification).await;
        }
        outcome.error = Some(chain);
    }

    let logging = &settings.logging;
    match cleanup_old_logs(&logging.logs_dir, logging.log_retention_days, SystemTime::now()).await {
        Ok(removed) => {
            info!("Log cleanup removed {removed} files");
            outcome.logs_removed = removed;
        }
        Err(e) => warn!(
            "Log cleanup in {} failed: {e}",
            logging.logs_dir.display()
        ),
    }

    info!("Scheduled link check finished");
    outcome
}

async fn check_and_notify(
    settings: &Settings,
    driver: Arc<dyn BrowserDriver>,
    notifier: &dyn Notifier,
    outcome: &mut ScheduledOutcome,
) -> Result<()> {
    let email = &settings.notifications.email;
    let check = run_check(settings, driver).await?;
    let report = &check.report;
    info!(
        "Check complete: {} problems among {} links",
        report.invalid_links, report.total_links
    );

    if report.problem_links.is_empty() {
        info!("All links are valid, no suggestions needed");
        if email.send_on_success {
            let notification = success_notification(report.total_links, &report.timestamp);
            outcome.notified = deliver(notifier, notification).await;
        }
    } else {
        info!(
            "Generating suggestions for {} problem links",
            report.problem_links.len()
        );
        // The fresh report is handed over directly, not rediscovered
        match run_suggest(settings, Some(&check.paths.json)).await {
            Ok(suggestions) => outcome.suggestions = suggestions,
            Err(e) => warn!("Suggestion generation failed: {e:#}"),
        }
        if email.send_on_problems {
            let notification = problems_notification(
                &report.problem_links,
                &report.timestamp,
                &check.paths.markdown.display().to_string(),
            );
            outcome.notified = deliver(notifier, notification).await;
        }
    }

    outcome.check = Some(check);
    Ok(())
}

/// Sends `notification`; failures are logged, never propagated.
async fn deliver(notifier: &dyn Notifier, notification: Notification) -> bool {
    match notifier
        .send(&notification.subject, &notification.html_body)
        .await
    {
        Ok(()) => true,
        Err(e) => {
            error!("Failed to send notification \"{}\": {e}", notification.subject);
            false
        }
    }
}
