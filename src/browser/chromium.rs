//! Chromium driver over the DevTools protocol.

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;

use super::{BrowserDriver, BrowserSession, LaunchOptions, PageSnapshot};
use crate::error_handling::BrowserError;

/// Measures `document.body` once the page has settled.
const PAGE_PROBE: &str = r#"(() => {
  const body = document.body;
  if (!body) {
    return { hasBody: false, width: 0, height: 0, textLength: 0 };
  }
  const rect = body.getBoundingClientRect();
  return {
    hasBody: true,
    width: rect.width,
    height: rect.height,
    textLength: (body.innerText || "").length
  };
})()"#;

/// Launches a local Chrome/Chromium per session.
pub struct ChromiumDriver;

#[async_trait]
impl BrowserDriver for ChromiumDriver {
    async fn launch(&self, options: &LaunchOptions) -> Result<Box<dyn BrowserSession>, BrowserError> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .window_size(options.width, options.height)
            .arg("--disable-setuid-sandbox")
            .arg(format!("--user-agent={}", options.user_agent));
        if !options.headless {
            builder = builder.with_head();
        }
        if let Some(path) = &options.executable_path {
            builder = builder.chrome_executable(path);
        }
        if let Some(proxy) = &options.proxy_server {
            builder = builder.arg(format!("--proxy-server={proxy}"));
        }
        let config = builder.build().map_err(BrowserError::Launch)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        // The CDP connection only makes progress while its handler is polled
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        Ok(Box::new(ChromiumSession {
            browser,
            page: None,
            handler_task,
        }))
    }
}

struct ChromiumSession {
    browser: Browser,
    page: Option<Page>,
    handler_task: JoinHandle<()>,
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn navigate(&mut self, url: &str) -> Result<Option<u16>, BrowserError> {
        let page = self
            .browser
            .new_page(url)
            .await
            .map_err(|e| BrowserError::Navigation(e.to_string()))?;

        let status = page
            .wait_for_navigation_response()
            .await
            .map_err(|e| BrowserError::Navigation(e.to_string()))?
            .and_then(|request| request.response.as_ref().map(|r| r.status))
            .and_then(|code| u16::try_from(code).ok());

        self.page = Some(page);
        Ok(status)
    }

    async fn snapshot(&mut self) -> Result<PageSnapshot, BrowserError> {
        let page = self
            .page
            .as_ref()
            .ok_or_else(|| BrowserError::Evaluation("no page is open".to_string()))?;
        page.evaluate(PAGE_PROBE)
            .await
            .map_err(|e| BrowserError::Evaluation(e.to_string()))?
            .into_value::<PageSnapshot>()
            .map_err(|e| BrowserError::Evaluation(e.to_string()))
    }

    async fn close(mut self: Box<Self>) -> Result<(), BrowserError> {
        if let Some(page) = self.page.take() {
            if let Err(e) = page.close().await {
                log::debug!("Failed to close page: {e}");
            }
        }
        let result = self
            .browser
            .close()
            .await
            .map(|_| ())
            .map_err(|e| BrowserError::Close(e.to_string()));
        if let Err(e) = self.browser.wait().await {
            log::debug!("Failed to reap browser process: {e}");
        }
        self.handler_task.abort();
        result
    }
}
