pub mod config;
pub mod errors;
pub mod factory;
pub mod pool;

pub use config::PoolConfig;
pub use errors::{PoolError, PoolResult};
pub use factory::{
    BrowserKind, ChromiumFactory, ContextOptions, LaunchOptions, PageFactory, Viewport,
};
pub use pool::{PageLease, PagePool, PoolMetrics};

/// Pool over real Chrome/Chromium pages, the common production shape.
pub type ChromiumPagePool = PagePool<ChromiumFactory>;
