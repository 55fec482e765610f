//! Error categorization and retry strategy.
//!
//! Maps transport and browser failures onto a [`LinkStatus`] plus a
//! [`FailureKind`] for the run statistics.

use std::error::Error as StdError;
use std::time::Duration;

use tokio_retry::strategy::FixedInterval;

use super::types::{BrowserError, FailureKind};
use crate::models::LinkStatus;

/// Classification of one failed HTTP request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpFailure {
    /// `Timeout` or `Error`; a received response is never an `HttpFailure`
    pub status: LinkStatus,
    pub kind: FailureKind,
}

/// Creates a fixed-interval retry strategy.
///
/// Yields `retries` delays of `delay_ms` each, so the wrapped action runs at
/// most `retries + 1` times in total.
pub fn fixed_retry_strategy(delay_ms: u64, retries: u32) -> impl Iterator<Item = Duration> {
    FixedInterval::from_millis(delay_ms).take(retries as usize)
}

/// Categorizes a `reqwest::Error` raised before any response was received.
///
/// Timeouts are distinguished from every other failure (DNS, refused
/// connection, TLS, redirect limit), which all count as `error`.
pub fn classify_http_error(error: &reqwest::Error) -> HttpFailure {
    if error.is_timeout() {
        return HttpFailure {
            status: LinkStatus::Timeout,
            kind: FailureKind::HttpTimeout,
        };
    }

    let kind = if error.is_connect() {
        FailureKind::HttpConnect
    } else if error.is_redirect() {
        FailureKind::HttpRedirect
    } else if error.is_request() {
        FailureKind::HttpRequest
    } else if error.is_body() || error.is_decode() {
        FailureKind::HttpBody
    } else {
        FailureKind::HttpOther
    };

    HttpFailure {
        status: LinkStatus::Error,
        kind,
    }
}

/// Categorizes a browser failure.
///
/// Navigation and evaluation timeouts and any error whose message mentions "timeout" are
/// `timeout`; everything else (including `net::ERR_CONNECTION_REFUSED`) is
/// `error`.
pub fn classify_browser_error(error: &BrowserError) -> (LinkStatus, FailureKind) {
    match error {
        BrowserError::NavigationTimeout(_) | BrowserError::EvaluationTimeout(_) => {
            (LinkStatus::Timeout, FailureKind::BrowserTimeout)
        }
        BrowserError::Launch(_) => (LinkStatus::Error, FailureKind::BrowserLaunch),
        other if other.to_string().to_lowercase().contains("timeout") => {
            (LinkStatus::Timeout, FailureKind::BrowserTimeout)
        }
        _ => (LinkStatus::Error, FailureKind::BrowserNavigation),
    }
}

/// Whether a browser error is a refused connection.
pub fn is_connection_refused(error: &BrowserError) -> bool {
    error.to_string().contains("net::ERR_CONNECTION_REFUSED")
}

/// Renders an error together with its `source()` chain, joined by `": "`.
///
/// `reqwest` keeps the useful detail (DNS failure, refused connection) in the
/// source chain rather than the top-level message.
pub fn describe_error_chain(error: &(dyn StdError + 'static)) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
