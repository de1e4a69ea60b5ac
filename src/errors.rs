//! Error types for pool operations
//!
//! This module defines the various error conditions that can occur
//! while acquiring, releasing, and managing pooled pages.

use std::time::Duration;

/// Error types for pool operations
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    /// Browser session could not be opened, or an operation needed one
    /// and the pool was not started
    #[error("browser session error: {0:#}")]
    Session(anyhow::Error),

    /// The factory failed to produce a page; no capacity was consumed
    #[error("failed to create page: {0:#}")]
    Creation(anyhow::Error),

    /// No capacity was freed within the requested bound
    #[error("no page slot freed within {waited:?}")]
    AcquireTimeout { waited: Duration },

    /// Release was called with a page that is not checked out from this
    /// pool (typically a double release)
    #[error("page {id} is not checked out from this pool")]
    UnknownHandle { id: u64 },

    /// Page teardown failed during release; the slot was still freed
    #[error("failed to close page {id}: {cause:#}")]
    Destruction { id: u64, cause: anyhow::Error },
}

/// Convenience alias for Result with `PoolError`
pub type PoolResult<T> = Result<T, PoolError>;
