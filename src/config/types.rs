//! Core configuration types for the page pool

use serde::{Deserialize, Serialize};

use crate::factory::{ContextOptions, LaunchOptions};

/// Configuration for a [`crate::PagePool`]
///
/// `capacity` bounds how many pages may be checked out at once and is
/// immutable after construction. `launch` and `context` are handed to the
/// factory verbatim; the pool never interprets them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Maximum number of concurrently checked-out pages.
    ///
    /// **INVARIANT:** Always greater than zero (validated in builder).
    pub(crate) capacity: usize,
    pub(crate) launch: LaunchOptions,
    pub(crate) context: ContextOptions,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            capacity: crate::config::builder::DEFAULT_CAPACITY,
            launch: LaunchOptions::default(),
            context: ContextOptions::default(),
        }
    }
}
