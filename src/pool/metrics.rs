//! Pool operation counters

use serde::Serialize;
use std::time::Duration;

/// Snapshot of pool bookkeeping.
///
/// `pool_size` is a gauge tracking the number of checked-out pages at the
/// last acquire or release; the counts are monotonic over the pool's
/// lifetime. `busy_time` accumulates how long released pages were checked
/// out; it is best-effort bookkeeping, not part of the pool's contract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PoolMetrics {
    pub pool_size: usize,
    pub acquired_count: u64,
    pub released_count: u64,
    pub busy_time: Duration,
}
