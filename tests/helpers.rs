// Shared test helpers: fast settings, a scripted browser driver and
// unreachable endpoints.

use std::net::{SocketAddr, TcpListener};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use link_checker::{
    BrowserDriver, BrowserError, BrowserSession, LaunchOptions, PageSnapshot, Resource, Settings,
};

/// Settings tuned for tests: no retry delays, short timeouts, browser layer off.
#[allow(dead_code)] // Used by other test files
pub fn test_settings() -> Settings {
    let mut settings = Settings::default();
    let checker = &mut settings.link_checker;
    checker.timeout_ms = 2_000;
    checker.retry.max_retries = 0;
    checker.retry.retry_delay_ms = 0;
    checker.layered_checking.enabled = false;
    let browser = &mut checker.layered_checking.headless_browser;
    browser.wait_until_ms = 0;
    browser.retries = 0;
    browser.timeout_ms = 2_000;
    settings.reporting.verbose_logging = false;
    settings
}

/// [`test_settings`] with the browser layer switched on.
#[allow(dead_code)]
pub fn layered_settings() -> Settings {
    let mut settings = test_settings();
    settings.link_checker.layered_checking.enabled = true;
    settings
}

/// Points the content store and the reports/logs directories into `root`.
#[allow(dead_code)]
pub fn with_dirs(mut settings: Settings, root: &Path) -> Settings {
    settings.content.store_dir = root.join("content");
    settings.reporting.reports_dir = root.join("reports");
    settings.logging.logs_dir = root.join("logs");
    settings
}

/// Writes `resources` as the `models` collection of the store in `settings`.
#[allow(dead_code)]
pub fn write_store(settings: &Settings, resources: &[Resource]) {
    std::fs::create_dir_all(&settings.content.store_dir).expect("Failed to create store dir");
    let json = serde_json::to_string_pretty(resources).expect("Failed to serialize resources");
    std::fs::write(settings.content.store_dir.join("models.json"), json)
        .expect("Failed to write store");
}

/// A page with plenty of visible text.
#[allow(dead_code)]
pub fn healthy_page() -> PageSnapshot {
    PageSnapshot {
        has_body: true,
        width: 1280.0,
        height: 2400.0,
        text_length: 4_000,
    }
}

/// What a [`FakeDriver`] session does.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub enum Script {
    /// `launch` fails
    LaunchFails,
    /// `navigate` fails with the given message
    NavigateFails(String),
    /// `navigate` never completes
    Hang,
    /// `navigate` returns 200 but measuring the page never completes
    SnapshotHangs,
    /// the page is healthy but `close` never completes
    CloseHangs,
    /// `navigate` returns `status` and the page measures as `snapshot`
    Page {
        status: Option<u16>,
        snapshot: PageSnapshot,
    },
}

/// Scripted browser that counts launches and closes.
#[derive(Clone)]
#[allow(dead_code)]
pub struct FakeDriver {
    script: Script,
    launches: Arc<AtomicUsize>,
    closes: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl FakeDriver {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            launches: Arc::new(AtomicUsize::new(0)),
            closes: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Successful launches.
    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn shared(&self) -> Arc<dyn BrowserDriver> {
        Arc::new(self.clone())
    }
}

#[async_trait]
impl BrowserDriver for FakeDriver {
    async fn launch(&self, _options: &LaunchOptions) -> Result<Box<dyn BrowserSession>, BrowserError> {
        if matches!(self.script, Script::LaunchFails) {
            return Err(BrowserError::Launch("no browser binary".to_string()));
        }
        self.launches.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeSession {
            script: self.script.clone(),
            closes: Arc::clone(&self.closes),
        }))
    }
}

struct FakeSession {
    script: Script,
    closes: Arc<AtomicUsize>,
}

#[async_trait]
impl BrowserSession for FakeSession {
    async fn navigate(&mut self, _url: &str) -> Result<Option<u16>, BrowserError> {
        match &self.script {
            Script::NavigateFails(message) => Err(BrowserError::Navigation(message.clone())),
            Script::Hang => std::future::pending().await,
            Script::SnapshotHangs | Script::CloseHangs => Ok(Some(200)),
            Script::Page { status, .. } => Ok(*status),
            Script::LaunchFails => unreachable!("session never launched"),
        }
    }

    async fn snapshot(&mut self) -> Result<PageSnapshot, BrowserError> {
        match &self.script {
            Script::Page { snapshot, .. } => Ok(*snapshot),
            Script::SnapshotHangs => std::future::pending().await,
            Script::CloseHangs => Ok(healthy_page()),
            _ => Err(BrowserError::Evaluation("no page open".to_string())),
        }
    }

    async fn close(self: Box<Self>) -> Result<(), BrowserError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        if matches!(self.script, Script::CloseHangs) {
            std::future::pending::<()>().await;
        }
        Ok(())
    }
}

/// A local address nothing listens on.
#[allow(dead_code)]
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to read address");
    drop(listener);
    format!("http://{addr}/")
}

/// A listener that accepts connections (via the kernel backlog) but never
/// answers. Keep it alive for the duration of the test.
#[allow(dead_code)]
pub fn silent_listener() -> (TcpListener, SocketAddr) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to read address");
    (listener, addr)
}
