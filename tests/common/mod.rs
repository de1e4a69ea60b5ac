//! Test utilities and helper factories for the pagepool test suite

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use anyhow::{Result, bail};
use tracing_subscriber::EnvFilter;

use pagepool::{ContextOptions, LaunchOptions, PageFactory, PoolConfig};

/// Initialize tracing so pool `debug!`/`warn!` output shows up under
/// `--nocapture`. Safe to call from every test; only the first call wins.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// In-process stand-in for a browser page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockPage {
    pub serial: u64,
}

/// In-process stand-in for a running browser
#[derive(Debug)]
pub struct MockSession {
    pub open: Arc<AtomicBool>,
}

/// Instrumented factory that counts live pages and their concurrent peak,
/// with injectable create/destroy failures.
#[derive(Debug, Default)]
pub struct MockFactory {
    serial: AtomicU64,
    pub live: AtomicUsize,
    pub peak_live: AtomicUsize,
    pub created: AtomicUsize,
    pub destroyed: AtomicUsize,
    pub fail_open: AtomicBool,
    pub fail_create: AtomicBool,
    pub fail_destroy: AtomicBool,
}

impl MockFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pages currently live (created and not destroyed)
    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    /// Highest number of pages ever live at the same instant
    pub fn peak_live(&self) -> usize {
        self.peak_live.load(Ordering::SeqCst)
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn destroyed(&self) -> usize {
        self.destroyed.load(Ordering::SeqCst)
    }
}

impl PageFactory for MockFactory {
    type Session = MockSession;
    type Page = MockPage;

    async fn open_session(&self, _launch: &LaunchOptions) -> Result<MockSession> {
        if self.fail_open.load(Ordering::SeqCst) {
            bail!("injected session failure");
        }
        Ok(MockSession {
            open: Arc::new(AtomicBool::new(true)),
        })
    }

    async fn close_session(&self, session: MockSession) -> Result<()> {
        session.open.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn create(&self, session: &MockSession, _context: &ContextOptions) -> Result<MockPage> {
        assert!(
            session.open.load(Ordering::SeqCst),
            "create called on a closed session"
        );
        if self.fail_create.load(Ordering::SeqCst) {
            bail!("injected create failure");
        }
        let live = self.live.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_live.fetch_max(live, Ordering::SeqCst);
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(MockPage {
            serial: self.serial.fetch_add(1, Ordering::SeqCst),
        })
    }

    async fn destroy(&self, _session: &MockSession, _page: MockPage) -> Result<()> {
        if self.fail_destroy.load(Ordering::SeqCst) {
            bail!("injected destroy failure");
        }
        self.live.fetch_sub(1, Ordering::SeqCst);
        self.destroyed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Config with the given capacity and defaults everywhere else
#[allow(dead_code)]
pub fn test_config(capacity: usize) -> PoolConfig {
    PoolConfig::builder()
        .capacity(capacity)
        .build()
        .expect("failed to build test config")
}
