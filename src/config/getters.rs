//! Read accessors for `PoolConfig`

use crate::factory::{BrowserKind, ContextOptions, LaunchOptions};

use super::types::PoolConfig;

impl PoolConfig {
    /// Maximum number of concurrently checked-out pages
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Options handed verbatim to the factory at session open
    #[must_use]
    pub fn launch_options(&self) -> &LaunchOptions {
        &self.launch
    }

    /// Options handed verbatim to the factory for every page
    #[must_use]
    pub fn context_options(&self) -> &ContextOptions {
        &self.context
    }

    /// Browser engine flavor the factory will launch
    #[must_use]
    pub fn browser_kind(&self) -> BrowserKind {
        self.launch.kind
    }

    /// Whether the browser runs without a visible window
    #[must_use]
    pub fn headless(&self) -> bool {
        self.launch.headless
    }
}
