//! Page factory contract and the chromiumoxide production implementation
//!
//! The pool itself never launches browsers or opens tabs; it drives an
//! implementation of [`PageFactory`] and treats sessions and pages as
//! opaque values. [`ChromiumFactory`] is the production implementation
//! backed by a real Chrome/Chromium process over CDP.

pub mod chromium;
pub mod executable;
pub mod profile;

pub use chromium::{BrowserSession, ChromiumFactory};

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Which browser engine flavor the factory should launch.
///
/// Selection only affects executable discovery; every kind speaks CDP
/// and is driven identically once launched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    #[default]
    Chromium,
    Chrome,
    Edge,
}

impl BrowserKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chromium => "chromium",
            Self::Chrome => "chrome",
            Self::Edge => "edge",
        }
    }
}

impl std::fmt::Display for BrowserKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options handed verbatim to [`PageFactory::open_session`].
///
/// The pool passes these through without interpreting them; only the
/// factory gives them meaning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchOptions {
    /// Browser engine flavor to discover and launch
    pub kind: BrowserKind,
    /// Run the browser without a visible window
    pub headless: bool,
    /// Initial window width in pixels
    pub window_width: u32,
    /// Initial window height in pixels
    pub window_height: u32,
    /// Timeout applied to individual CDP requests
    pub request_timeout: Duration,
    /// Extra command-line arguments appended to the launch invocation
    pub args: Vec<String>,
    /// Explicit executable path, bypassing discovery entirely
    pub executable: Option<PathBuf>,
    /// Directory under which per-session profile directories are created.
    /// Defaults to the system temp directory.
    pub user_data_root: Option<PathBuf>,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            kind: BrowserKind::default(),
            headless: true,
            window_width: 1920,
            window_height: 1080,
            request_timeout: Duration::from_secs(30),
            args: Vec::new(),
            executable: None,
            user_data_root: None,
        }
    }
}

/// Page viewport dimensions in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// Options handed verbatim to [`PageFactory::create`] for every page.
///
/// Like [`LaunchOptions`], these are opaque to the pool.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContextOptions {
    /// User agent override applied to the page before it is handed out
    pub user_agent: Option<String>,
    /// Viewport override applied via device metrics emulation
    pub viewport: Option<Viewport>,
}

/// Contract between the pool and whatever produces its pages.
///
/// `open_session`/`close_session` bracket the lifetime of the external
/// engine (one browser process); `create`/`destroy` bracket the lifetime
/// of a single page. Implementations report failures through `anyhow`
/// and the pool maps them into its own error taxonomy.
///
/// Methods are spelled as `impl Future + Send` rather than `async fn`
/// so pool futures stay spawnable on multi-threaded runtimes.
pub trait PageFactory: Send + Sync {
    /// Handle to the running engine; owned by the pool between start and stop
    type Session: Send + Sync;
    /// One unit of work capacity. Cloneable so the pool can retain its
    /// own copy for teardown while the caller borrows the page.
    type Page: Clone + Send + Sync;

    /// Launch the engine. Called once per pool start.
    fn open_session(
        &self,
        launch: &LaunchOptions,
    ) -> impl Future<Output = anyhow::Result<Self::Session>> + Send;

    /// Tear the engine down. Called once per pool stop.
    fn close_session(
        &self,
        session: Self::Session,
    ) -> impl Future<Output = anyhow::Result<()>> + Send;

    /// Produce a fresh page inside the running session.
    fn create(
        &self,
        session: &Self::Session,
        context: &ContextOptions,
    ) -> impl Future<Output = anyhow::Result<Self::Page>> + Send;

    /// Destroy a page previously produced by [`PageFactory::create`].
    fn destroy(
        &self,
        session: &Self::Session,
        page: Self::Page,
    ) -> impl Future<Output = anyhow::Result<()>> + Send;
}
