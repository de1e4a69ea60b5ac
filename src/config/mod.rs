//! Configuration module for the page pool
//!
//! This module provides the `PoolConfig` struct and its type-safe builder
//! for configuring pool capacity and browser options with validation and
//! sensible defaults.

// Sub-modules
pub mod builder;
pub mod getters;
pub mod types;

// Re-exports for public API
pub use builder::{PoolConfigBuilder, WithCapacity};
pub use types::PoolConfig;
