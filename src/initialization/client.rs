//! HTTP client initialization.

use std::time::Duration;

use reqwest::redirect::Policy;
use reqwest::ClientBuilder;

use crate::config::CheckerSettings;
use crate::error_handling::InitializationError;

/// Initializes the HTTP client used by the link checker.
///
/// Creates a `reqwest::Client` configured with:
/// - User-Agent header from settings
/// - Per-request timeout from settings
/// - Redirects followed up to `max_redirects`, or not at all when disabled
/// - The configured proxy, if enabled
///
/// Every status code is returned to the caller as a response; deciding which
/// codes are acceptable is the checker's job.
///
/// # Errors
///
/// Returns `InitializationError::HttpClientError` if the proxy URL is invalid
/// or the client cannot be built.
pub fn init_client(settings: &CheckerSettings) -> Result<reqwest::Client, InitializationError> {
    let redirect = if settings.follow_redirects {
        Policy::limited(settings.max_redirects)
    } else {
        Policy::none()
    };

    let mut builder = ClientBuilder::new()
        .timeout(Duration::from_millis(settings.timeout_ms))
        .user_agent(settings.user_agent.clone())
        .redirect(redirect);

    if let Some(proxy_url) = settings.proxy.url() {
        builder = builder.proxy(reqwest::Proxy::all(&proxy_url)?);
    }

    Ok(builder.build()?)
}

/// Initializes the HTTP client used for search-provider calls.
pub fn init_search_client(timeout: Duration) -> Result<reqwest::Client, InitializationError> {
    Ok(ClientBuilder::new().timeout(timeout).build()?)
}
