//! HTTP layer: HEAD, then GET, inside a fixed-interval retry loop.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Instant;

use reqwest::header::{HeaderName, CONTENT_TYPE, LAST_MODIFIED};
use reqwest::Method;

use super::trail::Trail;
use super::LinkChecker;
use crate::config::SitePolicy;
use crate::error_handling::{
    classify_http_error, describe_error_chain, fixed_retry_strategy, FailureKind,
};
use crate::models::LinkStatus;

/// Metadata of one received HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct ResponseMeta {
    pub status_code: u16,
    pub response_time_ms: u64,
    pub content_type: Option<String>,
    pub last_modified: Option<String>,
}

/// Why the HTTP layer could not confirm a link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct HttpFailureReport {
    pub status: LinkStatus,
    pub message: String,
}

/// Tagged outcome of the HTTP layer.
#[derive(Debug)]
pub(super) enum HttpVerdict {
    Valid,
    Failed(HttpFailureReport),
}

#[derive(Debug)]
pub(super) struct HttpStageOutcome {
    pub verdict: HttpVerdict,
    /// Last response received over all attempts
    pub last_response: Option<ResponseMeta>,
    pub attempts: u32,
}

impl LinkChecker {
    /// Runs the HTTP layer for `url`.
    ///
    /// Each attempt sends HEAD and falls back to GET when HEAD fails or
    /// returns a status the policy does not accept. Failed attempts are
    /// retried after the configured delay, at most `max_retries` times.
    pub(super) async fn run_http_stage(
        &self,
        url: &str,
        policy: &SitePolicy,
        trail: &Trail,
    ) -> HttpStageOutcome {
        let retry = &self.settings.retry;
        let strategy = fixed_retry_strategy(retry.retry_delay_ms, retry.max_retries);

        // Incremented once per attempt (initial + retries)
        let attempt_count = AtomicU32::new(0);
        let last_response: Mutex<Option<ResponseMeta>> = Mutex::new(None);

        let result = tokio_retry::Retry::spawn(strategy, || {
            let attempt = attempt_count.fetch_add(1, Ordering::SeqCst) + 1;
            self.probe_once(url, policy, trail, attempt, &last_response)
        })
        .await;

        let verdict = match result {
            Ok(()) => HttpVerdict::Valid,
            Err(failure) => HttpVerdict::Failed(failure),
        };

        HttpStageOutcome {
            verdict,
            last_response: last_response
                .into_inner()
                .unwrap_or_else(|poisoned| poisoned.into_inner()),
            attempts: attempt_count.load(Ordering::SeqCst),
        }
    }

    async fn probe_once(
        &self,
        url: &str,
        policy: &SitePolicy,
        trail: &Trail,
        attempt: u32,
        last_response: &Mutex<Option<ResponseMeta>>,
    ) -> Result<(), HttpFailureReport> {
        if attempt > 1 {
            trail.push(format!(
                "Retry {} of {}",
                attempt - 1,
                self.settings.retry.max_retries
            ));
        }

        trail.push(format!("HTTP attempt {attempt}: HEAD request"));
        match self.send(Method::HEAD, url).await {
            Ok(meta) => {
                trail.push(format!(
                    "HEAD returned {} in {} ms",
                    meta.status_code, meta.response_time_ms
                ));
                let accepted = policy.accepts(meta.status_code);
                remember(last_response, meta);
                if accepted {
                    return Ok(());
                }
                trail.push("HEAD status not accepted, trying GET");
            }
            Err(e) => {
                let failure = classify_http_error(&e);
                self.stats.increment(failure.kind);
                trail.push(format!(
                    "HEAD failed ({}): {}",
                    failure.status,
                    describe_error_chain(&e)
                ));
                trail.push("Falling back to GET");
            }
        }

        trail.push(format!("HTTP attempt {attempt}: GET request"));
        match self.send(Method::GET, url).await {
            Ok(meta) => {
                trail.push(format!(
                    "GET returned {} in {} ms",
                    meta.status_code, meta.response_time_ms
                ));
                let code = meta.status_code;
                remember(last_response, meta);
                if policy.accepts(code) {
                    Ok(())
                } else {
                    self.stats.increment(FailureKind::HttpInvalidStatus);
                    trail.push(format!("GET status {code} not accepted"));
                    Err(HttpFailureReport {
                        status: LinkStatus::Invalid,
                        message: format!("Invalid status code: {code}"),
                    })
                }
            }
            Err(e) => {
                let failure = classify_http_error(&e);
                self.stats.increment(failure.kind);
                let message = describe_error_chain(&e);
                trail.push(format!("GET failed ({}): {}", failure.status, message));
                Err(HttpFailureReport {
                    status: failure.status,
                    message,
                })
            }
        }
    }

    /// Sends one request; any status code counts as a received response.
    async fn send(&self, method: Method, url: &str) -> Result<ResponseMeta, reqwest::Error> {
        let started = Instant::now();
        let response = self.client.request(method, url).send().await?;
        let header = |name: HeaderName| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        Ok(ResponseMeta {
            status_code: response.status().as_u16(),
            response_time_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            content_type: header(CONTENT_TYPE),
            last_modified: header(LAST_MODIFIED),
        })
    }
}

fn remember(slot: &Mutex<Option<ResponseMeta>>, meta: ResponseMeta) {
    *slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(meta);
}
