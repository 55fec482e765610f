//! Configuration types.
//!
//! [`Settings`] is the single immutable configuration value handed to every
//! component. It deserializes from TOML; every field has a default so a
//! partial (or absent) file is valid.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::config::constants::*;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// How the browser layer decides that a rendered page has real content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DetectionMethod {
    /// The page body has a non-zero bounding box
    Visual,
    /// The page body carries at least a minimum amount of text
    #[default]
    Dom,
    /// Both checks must pass
    Both,
}

impl DetectionMethod {
    pub(crate) fn checks_visual(self) -> bool {
        matches!(self, DetectionMethod::Visual | DetectionMethod::Both)
    }

    pub(crate) fn checks_dom(self) -> bool {
        matches!(self, DetectionMethod::Dom | DetectionMethod::Both)
    }
}

/// External search provider used by the alternative-link suggester.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SearchProvider {
    #[default]
    Google,
    Bing,
    /// Any other value; the suggester uses its fixture table
    #[serde(other)]
    Unsupported,
}

/// Complete configuration for every tool in the crate.
///
/// # Examples
///
/// ```
/// use link_checker::Settings;
///
/// let settings: Settings = toml::from_str(
///     r#"
///     [link_checker]
///     batch_size = 10
///     "#,
/// )
/// .unwrap();
/// assert_eq!(settings.link_checker.batch_size, 10);
/// assert_eq!(settings.link_checker.retry.max_retries, 2);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Where the curated resource collections live
    pub content: ContentSettings,
    /// Link validation behaviour
    pub link_checker: CheckerSettings,
    /// Report output and retention
    pub reporting: ReportingSettings,
    /// Alternative-link search
    pub alternative_suggestion: SuggestionSettings,
    /// Outbound notifications of the scheduled run
    pub notifications: NotificationSettings,
    /// Log file output of the scheduled run
    pub logging: LoggingSettings,
}

/// Location of the content store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentSettings {
    pub store_dir: PathBuf,
}

impl Default for ContentSettings {
    fn default() -> Self {
        Self {
            store_dir: PathBuf::from(DEFAULT_CONTENT_DIR),
        }
    }
}

/// Settings consumed by the link checker and batch orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckerSettings {
    /// Per-request HTTP timeout in milliseconds
    pub timeout_ms: u64,
    /// Links checked concurrently per batch
    pub batch_size: usize,
    pub user_agent: String,
    pub follow_redirects: bool,
    pub max_redirects: usize,
    pub valid_status_codes: BTreeSet<u16>,
    pub proxy: ProxySettings,
    pub retry: RetrySettings,
    pub layered_checking: LayeredCheckingSettings,
    /// Named per-domain overrides, matched in name order
    pub special_sites: BTreeMap<String, SpecialSiteSettings>,
    pub test_mode: TestModeSettings,
}

impl Default for CheckerSettings {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            batch_size: DEFAULT_BATCH_SIZE,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            follow_redirects: true,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            valid_status_codes: DEFAULT_VALID_STATUS_CODES.iter().copied().collect(),
            proxy: ProxySettings::default(),
            retry: RetrySettings::default(),
            layered_checking: LayeredCheckingSettings::default(),
            special_sites: default_special_sites(),
            test_mode: TestModeSettings::default(),
        }
    }
}

impl CheckerSettings {
    /// Whether a failed HTTP layer escalates to the headless browser.
    pub fn browser_escalation_enabled(&self) -> bool {
        self.layered_checking.enabled && self.layered_checking.headless_browser.enabled
    }
}

fn default_special_sites() -> BTreeMap<String, SpecialSiteSettings> {
    let mut sites = BTreeMap::new();
    sites.insert(
        "youtube".to_string(),
        SpecialSiteSettings {
            domain_pattern: r"youtube\.com".to_string(),
            treat_all_status_codes_as_valid: true,
            detection_method: Some(DetectionMethod::Dom),
            ignore_empty_visual_content: true,
            min_dom_content_length: Some(20),
            extra_valid_status_codes: Vec::new(),
        },
    );
    sites.insert(
        "reddit".to_string(),
        SpecialSiteSettings {
            domain_pattern: r"reddit\.com".to_string(),
            treat_all_status_codes_as_valid: true,
            detection_method: Some(DetectionMethod::Dom),
            ..SpecialSiteSettings::default()
        },
    );
    sites
}

/// Outbound proxy shared by the HTTP client and the browser.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    pub enabled: bool,
    pub protocol: String,
    pub host: String,
    pub port: u16,
}

impl Default for ProxySettings {
    fn default() -> Self {
        Self {
            enabled: false,
            protocol: "http".to_string(),
            host: DEFAULT_PROXY_HOST.to_string(),
            port: DEFAULT_PROXY_PORT,
        }
    }
}

impl ProxySettings {
    /// Proxy URL (`protocol://host:port`), or `None` when disabled.
    pub fn url(&self) -> Option<String> {
        self.enabled
            .then(|| format!("{}://{}:{}", self.protocol, self.host, self.port))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    /// Retries after the first attempt; total attempts are `max_retries + 1`
    pub max_retries: u32,
    pub retry_delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayeredCheckingSettings {
    pub enabled: bool,
    pub headless_browser: HeadlessBrowserSettings,
}

impl Default for LayeredCheckingSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            headless_browser: HeadlessBrowserSettings::default(),
        }
    }
}

/// Headless browser layer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadlessBrowserSettings {
    pub enabled: bool,
    /// Navigation timeout in milliseconds
    pub timeout_ms: u64,
    /// Settle delay after navigation, in milliseconds
    pub wait_until_ms: u64,
    pub headless: bool,
    pub width: u32,
    pub height: u32,
    pub detection_method: DetectionMethod,
    /// Browser retries after the first attempt
    pub retries: u32,
    /// Accept a link whose browser check failed (`browser-fallback`).
    /// Off by default: it hides genuinely broken links.
    pub treat_errors_as_valid: bool,
    /// Explicit Chrome/Chromium binary; auto-detected when unset
    pub executable_path: Option<PathBuf>,
    pub min_dom_content_length: usize,
}

impl Default for HeadlessBrowserSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_ms: DEFAULT_BROWSER_TIMEOUT_MS,
            wait_until_ms: DEFAULT_BROWSER_SETTLE_MS,
            headless: true,
            width: DEFAULT_BROWSER_WIDTH,
            height: DEFAULT_BROWSER_HEIGHT,
            detection_method: DetectionMethod::default(),
            retries: DEFAULT_BROWSER_RETRIES,
            treat_errors_as_valid: false,
            executable_path: None,
            min_dom_content_length: DEFAULT_MIN_DOM_CONTENT_LENGTH,
        }
    }
}

/// Per-domain override.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecialSiteSettings {
    /// Case-insensitive regex matched against the full URL
    pub domain_pattern: String,
    pub treat_all_status_codes_as_valid: bool,
    pub detection_method: Option<DetectionMethod>,
    pub ignore_empty_visual_content: bool,
    pub min_dom_content_length: Option<usize>,
    pub extra_valid_status_codes: Vec<u16>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TestModeSettings {
    pub enabled: bool,
    pub limit_count: usize,
}

impl Default for TestModeSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            limit_count: DEFAULT_TEST_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportingSettings {
    pub reports_dir: PathBuf,
    pub report_retention_days: u64,
    /// Echo each diagnostic trail line at `info` instead of `debug`
    pub verbose_logging: bool,
}

impl Default for ReportingSettings {
    fn default() -> Self {
        Self {
            reports_dir: PathBuf::from(DEFAULT_REPORTS_DIR),
            report_retention_days: DEFAULT_RETENTION_DAYS,
            verbose_logging: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestionSettings {
    /// Query a real search provider; otherwise use the built-in fixture table
    pub use_real_searches: bool,
    pub search_provider: SearchProvider,
    pub google_api_key: Option<String>,
    pub google_search_engine_id: Option<String>,
    pub bing_api_key: Option<String>,
    /// Pause between successive real searches, in milliseconds
    pub delay_between_searches_ms: u64,
    pub max_results: usize,
    pub google_endpoint: String,
    pub bing_endpoint: String,
}

impl Default for SuggestionSettings {
    fn default() -> Self {
        Self {
            use_real_searches: false,
            search_provider: SearchProvider::default(),
            google_api_key: None,
            google_search_engine_id: None,
            bing_api_key: None,
            delay_between_searches_ms: DEFAULT_SEARCH_DELAY_MS,
            max_results: DEFAULT_SEARCH_RESULTS,
            google_endpoint: GOOGLE_SEARCH_ENDPOINT.to_string(),
            bing_endpoint: BING_SEARCH_ENDPOINT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    pub email: EmailSettings,
}

/// SMTP notification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailSettings {
    pub enabled: bool,
    pub host: String,
    pub port: u16,
    /// Implicit TLS (`true`) or STARTTLS (`false`)
    pub secure: bool,
    pub user: Option<String>,
    pub password: Option<String>,
    pub from: String,
    pub to: Vec<String>,
    pub send_on_problems: bool,
    pub send_on_success: bool,
    pub send_on_errors: bool,
}

impl Default for EmailSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            host: String::new(),
            port: DEFAULT_SMTP_PORT,
            secure: false,
            user: None,
            password: None,
            from: String::new(),
            to: Vec::new(),
            send_on_problems: true,
            send_on_success: false,
            send_on_errors: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub logs_dir: PathBuf,
    pub log_retention_days: u64,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            logs_dir: PathBuf::from(DEFAULT_LOGS_DIR),
            log_retention_days: DEFAULT_RETENTION_DAYS,
        }
    }
}
