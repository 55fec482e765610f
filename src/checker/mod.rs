//! Single-link validation.
//!
//! A link goes through explicit stages: the HTTP layer (HEAD then GET, with
//! retries), then, only if that fails and layered checking is enabled, the
//! headless-browser layer. The final verdict combines both layers with the
//! site policy. Checking never returns an error: every failure becomes part
//! of the [`CheckResult`].

mod browser;
mod http;
mod trail;

use std::sync::Arc;

use crate::browser::{BrowserDriver, LaunchOptions};
use crate::config::{CheckerSettings, Settings, SiteMatcher, SitePolicy};
use crate::error_handling::{FailureStats, InitializationError};
use crate::initialization::init_client;
use crate::models::{BrowserCheck, CheckMethod, CheckResult, LinkStatus, Resource};

use self::http::{HttpStageOutcome, HttpVerdict};
use self::trail::Trail;

/// Checks links against one immutable configuration.
///
/// Cheap to share behind an `Arc`; concurrent checks do not interfere.
pub struct LinkChecker {
    settings: CheckerSettings,
    verbose: bool,
    client: reqwest::Client,
    driver: Arc<dyn BrowserDriver>,
    launch_options: LaunchOptions,
    sites: SiteMatcher,
    stats: FailureStats,
}

impl LinkChecker {
    /// Builds a checker from `settings`, using `driver` for the browser layer.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built (e.g. an invalid
    /// proxy) or a special-site pattern does not compile.
    pub fn new(
        settings: &Settings,
        driver: Arc<dyn BrowserDriver>,
    ) -> Result<Self, InitializationError> {
        let checker = &settings.link_checker;
        Ok(Self {
            client: init_client(checker)?,
            sites: SiteMatcher::new(checker)?,
            launch_options: LaunchOptions::from_settings(checker),
            settings: checker.clone(),
            verbose: settings.reporting.verbose_logging,
            driver,
            stats: FailureStats::new(),
        })
    }

    /// Failure counters accumulated by every check made with this checker.
    pub fn failure_stats(&self) -> &FailureStats {
        &self.stats
    }

    /// Checks one resource and returns its verdict with a diagnostic trail.
    pub async fn check_link(&self, resource: &Resource) -> CheckResult {
        let trail = Trail::new(&resource.link, self.verbose);
        let mut result = CheckResult::pending(resource);
        let policy = self.sites.policy_for(&resource.link);

        trail.push(format!("Checking {} ({})", resource.link, resource.id));
        if let Some(site) = &policy.site {
            trail.push(format!("Special site policy applies: {site}"));
        }
        if let Some(proxy) = self.settings.proxy.url() {
            trail.push(format!("Using proxy {proxy}"));
        }

        let http = self.run_http_stage(&resource.link, &policy, &trail).await;
        let failure = apply_http_outcome(&mut result, http);

        match failure {
            None => trail.push("Link is valid (HTTP)"),
            Some(http_message) => {
                if self.settings.browser_escalation_enabled() {
                    trail.push("HTTP layer could not confirm the link, escalating to browser");
                    let browser = self.run_browser_stage(&resource.link, &policy, &trail).await;
                    self.apply_browser_outcome(&mut result, browser, &policy, &http_message);
                }
                match (result.status, result.method) {
                    (LinkStatus::Valid, Some(CheckMethod::BrowserFallback)) => {
                        trail.push("Browser failed, link accepted by fallback policy")
                    }
                    (LinkStatus::Valid, _) => trail.push("Link is valid (browser)"),
                    (status, _) => trail.push(format!("Link is broken: {status}")),
                }
            }
        }

        result.logs = trail.into_entries();
        result
    }

    fn apply_browser_outcome(
        &self,
        result: &mut CheckResult,
        browser: BrowserCheck,
        policy: &SitePolicy,
        http_message: &str,
    ) {
        if browser.status == LinkStatus::Valid {
            result.status = LinkStatus::Valid;
            result.status_code = browser.status_code.or(result.status_code);
            result.method = Some(CheckMethod::Browser);
            result.error_message = None;
        } else if self
            .settings
            .layered_checking
            .headless_browser
            .treat_errors_as_valid
            || policy.treat_all_status_codes_as_valid
        {
            result.status = LinkStatus::Valid;
            result.method = Some(CheckMethod::BrowserFallback);
            result.validated_with_fallback = true;
            result.error_message = None;
        } else {
            result.status = browser.status;
            result.method = Some(CheckMethod::Browser);
            result.error_message = Some(format!(
                "HTTP: {}; Browser: {}",
                http_message,
                browser.error_message.as_deref().unwrap_or("unknown error")
            ));
        }
        result.browser_check = Some(browser);
    }
}

/// Copies the HTTP layer's findings into `result`.
///
/// Returns the failure message when the HTTP layer did not confirm the link.
fn apply_http_outcome(result: &mut CheckResult, http: HttpStageOutcome) -> Option<String> {
    result.attempts = http.attempts;
    if let Some(meta) = http.last_response {
        result.status_code = Some(meta.status_code);
        result.response_time = Some(meta.response_time_ms);
        result.content_type = meta.content_type;
        result.last_modified = meta.last_modified;
    }

    match http.verdict {
        HttpVerdict::Valid => {
            result.status = LinkStatus::Valid;
            result.method = Some(CheckMethod::Http);
            None
        }
        HttpVerdict::Failed(failure) => {
            result.status = failure.status;
            // A received-but-rejected response is an HTTP verdict; a
            // transport failure has no method until a later layer decides
            if failure.status == LinkStatus::Invalid {
                result.method = Some(CheckMethod::Http);
            }
            result.error_message = Some(failure.message.clone());
            Some(failure.message)
        }
    }
}
