//! Configuration constants.
//!
//! Defaults for every tunable in [`Settings`](super::Settings), plus the fixed
//! names used for report, alternatives and log files.

/// Default User-Agent string for HTTP requests and browser sessions.
///
/// A current desktop Chrome string. Several publishers reject requests that
/// identify as a library client, so the checker presents itself as a browser.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// HTTP request timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;
/// Number of links checked concurrently within one batch
pub const DEFAULT_BATCH_SIZE: usize = 5;
pub const DEFAULT_MAX_REDIRECTS: usize = 5;

/// Status codes accepted as "valid" unless a site policy widens the set.
///
/// 2xx and 3xx families plus 403, which many bot-protected publishers return
/// to non-browser clients even though the page exists.
pub const DEFAULT_VALID_STATUS_CODES: &[u16] = &[
    200, 201, 202, 203, 204, 205, 206, 207, 208, 226, 300, 301, 302, 303, 304, 307, 308, 403,
];

// Retry
pub const DEFAULT_MAX_RETRIES: u32 = 2;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 2_000;

// Headless browser layer
pub const DEFAULT_BROWSER_TIMEOUT_MS: u64 = 15_000;
/// Settle delay after navigation so client-rendered pages can paint
pub const DEFAULT_BROWSER_SETTLE_MS: u64 = 3_000;
pub const DEFAULT_BROWSER_RETRIES: u32 = 1;
pub const DEFAULT_BROWSER_WIDTH: u32 = 1280;
pub const DEFAULT_BROWSER_HEIGHT: u32 = 800;
/// Minimum amount of visible text (characters) for the DOM check to pass
pub const DEFAULT_MIN_DOM_CONTENT_LENGTH: usize = 50;

// Proxy
pub const DEFAULT_PROXY_HOST: &str = "127.0.0.1";
pub const DEFAULT_PROXY_PORT: u16 = 7890;

// Test mode
pub const DEFAULT_TEST_LIMIT: usize = 10;

// Alternative suggestions
pub const DEFAULT_SEARCH_DELAY_MS: u64 = 2_000;
pub const DEFAULT_SEARCH_RESULTS: usize = 5;
pub const GOOGLE_SEARCH_ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";
/// Largest `num` the Custom Search API accepts.
pub const GOOGLE_MAX_RESULTS_PER_QUERY: usize = 10;
pub const BING_SEARCH_ENDPOINT: &str = "https://api.bing.microsoft.com/v7.0/search";
/// Per-request timeout for search provider calls.
pub const SEARCH_REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(15);

// Reports and logs
pub const DEFAULT_CONTENT_DIR: &str = "content";
pub const DEFAULT_REPORTS_DIR: &str = "reports";
pub const DEFAULT_LOGS_DIR: &str = "logs";
pub const DEFAULT_RETENTION_DAYS: u64 = 30;
pub const DEFAULT_CONFIG_FILE: &str = "link_checker.toml";

pub const REPORT_JSON_PREFIX: &str = "link-check-report-";
pub const REPORT_MARKDOWN_PREFIX: &str = "link-check-readable-";
pub const ALTERNATIVES_JSON_PREFIX: &str = "link-alternatives-";
pub const ALTERNATIVES_MARKDOWN_PREFIX: &str = "link-alternatives-readable-";
pub const LOG_FILE_PREFIX: &str = "link-check-";

// Notifications
pub const DEFAULT_SMTP_PORT: u16 = 587;
/// Number of problem links listed in a notification before "... and N more"
pub const NOTIFICATION_PREVIEW_LIMIT: usize = 10;

/// Category bucket for resources without one
pub const UNCATEGORIZED: &str = "Uncategorized";
