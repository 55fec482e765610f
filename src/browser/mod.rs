//! Headless browser capability.
//!
//! The checker talks to a browser only through [`BrowserDriver`] and
//! [`BrowserSession`], so tests can substitute a scripted fake and builds
//! without Chromium still run the HTTP layer.

#[cfg(feature = "chromium")]
mod chromium;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::{CheckerSettings, DetectionMethod};
use crate::error_handling::BrowserError;

#[cfg(feature = "chromium")]
pub use chromium::ChromiumDriver;

/// Everything needed to start one browser instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchOptions {
    pub headless: bool,
    pub width: u32,
    pub height: u32,
    pub user_agent: String,
    /// `protocol://host:port`
    pub proxy_server: Option<String>,
    pub executable_path: Option<PathBuf>,
}

impl LaunchOptions {
    pub fn from_settings(settings: &CheckerSettings) -> Self {
        let browser = &settings.layered_checking.headless_browser;
        Self {
            headless: browser.headless,
            width: browser.width,
            height: browser.height,
            user_agent: settings.user_agent.clone(),
            proxy_server: settings.proxy.url(),
            executable_path: browser.executable_path.clone(),
        }
    }
}

/// What the page looked like after it settled.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSnapshot {
    /// A `<body>` element exists
    pub has_body: bool,
    /// Body bounding-box width, CSS pixels
    pub width: f64,
    pub height: f64,
    /// Length of the body's rendered text
    pub text_length: usize,
}

impl PageSnapshot {
    pub fn has_visual_content(&self) -> bool {
        self.has_body && self.width > 0.0 && self.height > 0.0
    }

    /// Evaluates the content checks selected by `method`.
    ///
    /// Returns a description of the first failed check, or `None` if the
    /// page has enough content.
    pub fn content_problem(
        &self,
        method: DetectionMethod,
        ignore_empty_visual: bool,
        min_text: usize,
    ) -> Option<String> {
        if method.checks_visual() && !ignore_empty_visual && !self.has_visual_content() {
            return Some(format!(
                "page has no visible content (body {}x{})",
                self.width, self.height
            ));
        }
        if method.checks_dom() && self.text_length < min_text {
            return Some(format!(
                "page text too short ({} < {} characters)",
                self.text_length, min_text
            ));
        }
        None
    }
}

/// Starts browser instances.
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    /// Launches a fresh browser. Each check attempt gets its own instance.
    async fn launch(&self, options: &LaunchOptions) -> Result<Box<dyn BrowserSession>, BrowserError>;
}

/// One running browser with at most one open page.
#[async_trait]
pub trait BrowserSession: Send {
    /// Opens `url` and returns the main document's HTTP status, if known.
    async fn navigate(&mut self, url: &str) -> Result<Option<u16>, BrowserError>;

    /// Measures the currently open page.
    async fn snapshot(&mut self) -> Result<PageSnapshot, BrowserError>;

    /// Closes the page and shuts the browser down.
    async fn close(self: Box<Self>) -> Result<(), BrowserError>;
}

/// Driver used when the crate is built without browser support.
pub struct DisabledDriver;

#[async_trait]
impl BrowserDriver for DisabledDriver {
    async fn launch(&self, _options: &LaunchOptions) -> Result<Box<dyn BrowserSession>, BrowserError> {
        Err(BrowserError::Launch(
            "headless browser support is not compiled in".to_string(),
        ))
    }
}

/// The production driver for this build.
pub fn default_driver() -> Arc<dyn BrowserDriver> {
    #[cfg(feature = "chromium")]
    {
        Arc::new(ChromiumDriver)
    }
    #[cfg(not(feature = "chromium"))]
    {
        Arc::new(DisabledDriver)
    }
}
