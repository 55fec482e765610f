//! Browser layer: render the page in a headless browser and inspect it.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use super::trail::Trail;
use super::LinkChecker;
use crate::browser::BrowserSession;
use crate::config::SitePolicy;
use crate::error_handling::{
    classify_browser_error, fixed_retry_strategy, is_connection_refused, BrowserError,
    FailureKind,
};
use crate::models::{BrowserCheck, LinkStatus};

impl LinkChecker {
    /// Runs the browser layer for `url`.
    ///
    /// Every attempt launches a fresh browser and closes it again before the
    /// next attempt starts, whatever happened in between. Attempts are
    /// retried after the HTTP retry delay, at most `retries` times.
    pub(super) async fn run_browser_stage(
        &self,
        url: &str,
        policy: &SitePolicy,
        trail: &Trail,
    ) -> BrowserCheck {
        let browser = &self.settings.layered_checking.headless_browser;
        let strategy = fixed_retry_strategy(self.settings.retry.retry_delay_ms, browser.retries);
        let attempt_count = AtomicU32::new(0);

        let result = tokio_retry::Retry::spawn(strategy, || {
            let attempt = attempt_count.fetch_add(1, Ordering::SeqCst) + 1;
            self.browser_attempt(url, policy, trail, attempt)
        })
        .await;

        match result {
            Ok(check) | Err(check) => check,
        }
    }

    async fn browser_attempt(
        &self,
        url: &str,
        policy: &SitePolicy,
        trail: &Trail,
        attempt: u32,
    ) -> Result<BrowserCheck, BrowserCheck> {
        trail.push(format!("Browser attempt {attempt}: launching headless browser"));
        let mut session = match self.driver.launch(&self.launch_options).await {
            Ok(session) => session,
            Err(e) => return Err(self.browser_failure(&e, None, trail)),
        };

        let outcome = self.inspect_page(&mut *session, url, policy, trail).await;

        let timeout_ms = self.settings.layered_checking.headless_browser.timeout_ms;
        match tokio::time::timeout(Duration::from_millis(timeout_ms), session.close()).await {
            Ok(Ok(())) => trail.push("Browser closed"),
            Ok(Err(e)) => trail.push(format!("Browser did not close cleanly: {e}")),
            Err(_) => trail.push(format!(
                "Browser did not close within {timeout_ms} ms, abandoning it"
            )),
        }
        outcome
    }

    async fn inspect_page(
        &self,
        session: &mut dyn BrowserSession,
        url: &str,
        policy: &SitePolicy,
        trail: &Trail,
    ) -> Result<BrowserCheck, BrowserCheck> {
        let browser = &self.settings.layered_checking.headless_browser;

        trail.push(format!("Navigating to {url}"));
        let navigation = tokio::time::timeout(
            Duration::from_millis(browser.timeout_ms),
            session.navigate(url),
        )
        .await;
        let status_code = match navigation {
            Err(_) => {
                let e = BrowserError::NavigationTimeout(browser.timeout_ms);
                return Err(self.browser_failure(&e, None, trail));
            }
            Ok(Err(e)) => return Err(self.browser_failure(&e, None, trail)),
            Ok(Ok(code)) => code,
        };
        match status_code {
            Some(code) => trail.push(format!("Page responded with status {code}")),
            None => trail.push("Page responded without a status code"),
        }

        if browser.wait_until_ms > 0 {
            tokio::time::sleep(Duration::from_millis(browser.wait_until_ms)).await;
        }

        let measurement = tokio::time::timeout(
            Duration::from_millis(browser.timeout_ms),
            session.snapshot(),
        )
        .await;
        let snapshot = match measurement {
            Err(_) => {
                let e = BrowserError::EvaluationTimeout(browser.timeout_ms);
                return Err(self.browser_failure(&e, status_code, trail));
            }
            Ok(Err(e)) => return Err(self.browser_failure(&e, status_code, trail)),
            Ok(Ok(snapshot)) => snapshot,
        };
        trail.push(format!(
            "Page body {}x{}, {} characters of text",
            snapshot.width, snapshot.height, snapshot.text_length
        ));

        let status_accepted = policy.treat_all_status_codes_as_valid
            || status_code.is_some_and(|code| policy.accepts(code));
        if !status_accepted {
            self.stats.increment(FailureKind::BrowserInvalidStatus);
            let shown = status_code.map_or_else(|| "unknown".to_string(), |c| c.to_string());
            trail.push(format!("Browser status {shown} not accepted"));
            return Err(BrowserCheck::failed(
                LinkStatus::Invalid,
                status_code,
                format!("Invalid status code: {shown}"),
            ));
        }

        if let Some(problem) = snapshot.content_problem(
            policy.detection_method,
            policy.ignore_empty_visual_content,
            policy.min_dom_content_length,
        ) {
            self.stats.increment(FailureKind::BrowserEmptyContent);
            trail.push(format!("Content check failed: {problem}"));
            return Err(BrowserCheck::failed(LinkStatus::Invalid, status_code, problem));
        }

        trail.push("Browser check passed");
        Ok(BrowserCheck {
            status: LinkStatus::Valid,
            status_code,
            error_message: None,
        })
    }

    fn browser_failure(
        &self,
        error: &BrowserError,
        status_code: Option<u16>,
        trail: &Trail,
    ) -> BrowserCheck {
        let (status, kind) = classify_browser_error(error);
        self.stats.increment(kind);
        if is_connection_refused(error) {
            trail.push("Browser: connection refused");
        }
        trail.push(format!("Browser check failed ({status}): {error}"));
        BrowserCheck::failed(status, status_code, error.to_string())
    }
}
