//! Type-safe builder for `PoolConfig` using the typestate pattern
//!
//! Provides a fluent builder interface with compile-time validation
//! ensuring that a capacity is set before building a `PoolConfig`.

use anyhow::{Result, anyhow};
use std::marker::PhantomData;
use std::path::PathBuf;
use std::time::Duration;

use crate::factory::{BrowserKind, ContextOptions, LaunchOptions, Viewport};

use super::types::PoolConfig;

/// Capacity used by `PoolConfig::default()`
pub(crate) const DEFAULT_CAPACITY: usize = 4;

// Type state for the builder
pub struct WithCapacity;

pub struct PoolConfigBuilder<State = ()> {
    pub(crate) capacity: Option<usize>,
    pub(crate) launch: LaunchOptions,
    pub(crate) context: ContextOptions,
    pub(crate) _phantom: PhantomData<State>,
}

impl Default for PoolConfigBuilder<()> {
    fn default() -> Self {
        Self {
            capacity: None,
            launch: LaunchOptions::default(),
            context: ContextOptions::default(),
            _phantom: PhantomData,
        }
    }
}

impl PoolConfig {
    /// Start building a config; `capacity` must be provided before `build`
    #[must_use]
    pub fn builder() -> PoolConfigBuilder<()> {
        PoolConfigBuilder::default()
    }
}

impl PoolConfigBuilder<()> {
    /// Set the maximum number of concurrently checked-out pages
    #[must_use]
    pub fn capacity(self, capacity: usize) -> PoolConfigBuilder<WithCapacity> {
        PoolConfigBuilder {
            capacity: Some(capacity),
            launch: self.launch,
            context: self.context,
            _phantom: PhantomData,
        }
    }
}

// Optional settings, available in every builder state
impl<State> PoolConfigBuilder<State> {
    /// Browser engine flavor to launch (default: Chromium)
    #[must_use]
    pub fn browser_kind(mut self, kind: BrowserKind) -> Self {
        self.launch.kind = kind;
        self
    }

    /// Run the browser without a visible window (default: true)
    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.launch.headless = headless;
        self
    }

    /// Initial browser window size in pixels (default: 1920x1080)
    #[must_use]
    pub fn window_size(mut self, width: u32, height: u32) -> Self {
        self.launch.window_width = width;
        self.launch.window_height = height;
        self
    }

    /// Timeout for individual CDP requests (default: 30s)
    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.launch.request_timeout = timeout;
        self
    }

    /// Append an extra command-line argument to the browser launch
    #[must_use]
    pub fn launch_arg(mut self, arg: impl Into<String>) -> Self {
        self.launch.args.push(arg.into());
        self
    }

    /// Use this executable instead of discovering one
    #[must_use]
    pub fn executable(mut self, path: PathBuf) -> Self {
        self.launch.executable = Some(path);
        self
    }

    /// Create per-session profile directories under this root instead of
    /// the system temp directory
    #[must_use]
    pub fn user_data_root(mut self, root: PathBuf) -> Self {
        self.launch.user_data_root = Some(root);
        self
    }

    /// User agent override applied to every page
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.context.user_agent = Some(user_agent.into());
        self
    }

    /// Viewport override applied to every page
    #[must_use]
    pub fn viewport(mut self, width: u32, height: u32) -> Self {
        self.context.viewport = Some(Viewport { width, height });
        self
    }

    /// Replace the launch options wholesale
    #[must_use]
    pub fn launch_options(mut self, launch: LaunchOptions) -> Self {
        self.launch = launch;
        self
    }

    /// Replace the per-page context options wholesale
    #[must_use]
    pub fn context_options(mut self, context: ContextOptions) -> Self {
        self.context = context;
        self
    }
}

impl PoolConfigBuilder<WithCapacity> {
    /// Build the config, validating runtime constraints.
    ///
    /// # Errors
    ///
    /// Returns an error if `capacity` is zero.
    pub fn build(self) -> Result<PoolConfig> {
        let capacity = self
            .capacity
            .ok_or_else(|| anyhow!("capacity not set despite builder state"))?;

        if capacity == 0 {
            return Err(anyhow!("pool capacity must be greater than zero"));
        }

        Ok(PoolConfig {
            capacity,
            launch: self.launch,
            context: self.context,
        })
    }
}
