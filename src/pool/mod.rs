//! Bounded pool of externally-produced browser pages
//!
//! The pool enforces a hard cap on concurrently checked-out pages. A
//! caller that finds the pool at capacity suspends until a release frees
//! a slot (optionally bounded by a timeout). Pages are created fresh on
//! every acquire and destroyed on release; the pool holds no idle pages.
//!
//! All shared state lives behind a single `tokio::sync::Mutex`; waiters
//! park on a `Notify` and re-validate capacity after every wakeup, so a
//! woken caller that loses the race for a slot simply goes back to
//! waiting. Page creation and destruction run while the lock is held,
//! which serializes them but makes overshooting the cap impossible.

pub mod lease;
pub mod metrics;

pub use lease::PageLease;
pub use metrics::PoolMetrics;

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use anyhow::anyhow;
use futures::Stream;
use tokio::sync::{Mutex, Notify};
use tracing::{debug, info, warn};

use crate::config::PoolConfig;
use crate::errors::{PoolError, PoolResult};
use crate::factory::{ChromiumFactory, PageFactory};

/// Per-checkout bookkeeping kept by the pool while a page is out
struct Outstanding<P> {
    page: P,
    acquired_at: Instant,
}

/// Everything mutable, guarded by one lock
struct PoolState<F: PageFactory> {
    /// `Some` between `start` and `stop`
    session: Option<F::Session>,
    /// Checked-out pages by lease id; `len() <= capacity` always
    outstanding: HashMap<u64, Outstanding<F::Page>>,
    metrics: PoolMetrics,
}

/// Bounded, concurrent page pool generic over its [`PageFactory`]
pub struct PagePool<F: PageFactory> {
    config: PoolConfig,
    factory: F,
    state: Mutex<PoolState<F>>,
    /// Signalled once per release; each waiter re-validates capacity
    slot_freed: Notify,
    /// Counter for unique lease ids
    next_id: AtomicU64,
}

impl<F: PageFactory> PagePool<F> {
    /// Create a pool. No session is opened until [`PagePool::start`].
    pub fn new(config: PoolConfig, factory: F) -> Self {
        Self {
            state: Mutex::new(PoolState {
                session: None,
                outstanding: HashMap::new(),
                metrics: PoolMetrics::default(),
            }),
            slot_freed: Notify::new(),
            next_id: AtomicU64::new(0),
            config,
            factory,
        }
    }

    /// The configuration this pool was built with
    #[must_use]
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// The factory this pool drives
    #[must_use]
    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Open the browser session. Single-start contract: starting an
    /// already-started pool is an error.
    ///
    /// Pair every successful `start` with a [`PagePool::stop`] on all
    /// exit paths, including error paths.
    pub async fn start(&self) -> PoolResult<()> {
        let mut state = self.state.lock().await;
        if state.session.is_some() {
            return Err(PoolError::Session(anyhow!("pool is already started")));
        }

        info!(
            "starting page pool with capacity {}",
            self.config.capacity()
        );
        let session = self
            .factory
            .open_session(self.config.launch_options())
            .await
            .map_err(PoolError::Session)?;
        state.session = Some(session);
        Ok(())
    }

    /// Close the browser session.
    ///
    /// Pages still checked out are not reclaimed; their later release
    /// frees the slot but skips page teardown, since the browser process
    /// is already gone.
    pub async fn stop(&self) -> PoolResult<()> {
        let mut state = self.state.lock().await;
        let Some(session) = state.session.take() else {
            return Err(PoolError::Session(anyhow!("pool is not started")));
        };

        if !state.outstanding.is_empty() {
            warn!(
                "stopping pool with {} pages still checked out",
                state.outstanding.len()
            );
        }

        info!("stopping page pool");
        self.factory
            .close_session(session)
            .await
            .map_err(PoolError::Session)?;
        Ok(())
    }

    /// Acquire a freshly created page, waiting without bound for a free
    /// slot when the pool is at capacity.
    pub async fn acquire(&self) -> PoolResult<PageLease<F::Page>> {
        self.acquire_inner(None).await
    }

    /// Like [`PagePool::acquire`], but gives up with
    /// [`PoolError::AcquireTimeout`] when no slot frees up within
    /// `timeout`. A zero timeout fails immediately unless a slot is free
    /// at the first check.
    pub async fn acquire_with_timeout(
        &self,
        timeout: Duration,
    ) -> PoolResult<PageLease<F::Page>> {
        self.acquire_inner(Some(timeout)).await
    }

    async fn acquire_inner(&self, timeout: Option<Duration>) -> PoolResult<PageLease<F::Page>> {
        let deadline = timeout.map(|t| tokio::time::Instant::now() + t);

        loop {
            let mut state = self.state.lock().await;

            if state.outstanding.len() < self.config.capacity() {
                // Creation runs under the lock: concurrent acquires can
                // never overshoot capacity, at the cost of serializing
                // page creation.
                let page = {
                    let session = state
                        .session
                        .as_ref()
                        .ok_or_else(|| PoolError::Session(anyhow!("pool is not started")))?;
                    self.factory
                        .create(session, self.config.context_options())
                        .await
                        .map_err(PoolError::Creation)?
                };

                let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                state.outstanding.insert(
                    id,
                    Outstanding {
                        page: page.clone(),
                        acquired_at: Instant::now(),
                    },
                );
                state.metrics.pool_size = state.outstanding.len();
                state.metrics.acquired_count += 1;
                debug!(
                    "page {} checked out ({} outstanding)",
                    id,
                    state.outstanding.len()
                );
                return Ok(PageLease::new(id, page));
            }

            // At capacity: register for the next release before unlocking
            // so a notification landing between unlock and await is kept.
            let notified = self.slot_freed.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            drop(state);

            match deadline {
                None => notified.await,
                Some(deadline) => {
                    if tokio::time::timeout_at(deadline, notified).await.is_err() {
                        let waited = timeout.unwrap_or_default();
                        return Err(PoolError::AcquireTimeout { waited });
                    }
                }
            }
            // Woken: loop around and re-validate, another caller may have
            // taken the freed slot first.
        }
    }

    /// Return a page to the pool, destroying it and waking one waiter.
    ///
    /// The lease must belong to a page currently checked out from this
    /// pool; anything else (most commonly a double release) fails with
    /// [`PoolError::UnknownHandle`]. A teardown failure still frees the
    /// slot and is reported as [`PoolError::Destruction`] so callers can
    /// detect leaked browser targets.
    pub async fn release(&self, lease: &PageLease<F::Page>) -> PoolResult<()> {
        let mut state = self.state.lock().await;
        let id = lease.id();

        let Some(entry) = state.outstanding.remove(&id) else {
            return Err(PoolError::UnknownHandle { id });
        };

        // Destruction runs under the lock, mirroring creation. With the
        // session closed it is skipped: the browser process already took
        // every page down with it.
        let destroy_result = match state.session.as_ref() {
            Some(session) => self.factory.destroy(session, entry.page).await,
            None => {
                warn!("session already closed; skipping teardown of page {}", id);
                Ok(())
            }
        };

        state.metrics.pool_size = state.outstanding.len();
        state.metrics.released_count += 1;
        state.metrics.busy_time += entry.acquired_at.elapsed();
        debug!(
            "page {} released ({} outstanding)",
            id,
            state.outstanding.len()
        );

        // One waiter per freed slot; the wait loop re-validates capacity.
        self.slot_freed.notify_one();

        destroy_result.map_err(|cause| {
            warn!("page {} failed to close cleanly: {:#}", id, cause);
            PoolError::Destruction { id, cause }
        })
    }

    /// Snapshot of the pool's bookkeeping
    pub async fn metrics(&self) -> PoolMetrics {
        self.state.lock().await.metrics
    }

    /// Lazily run one full checkout cycle: exactly `capacity` pages,
    /// one at a time.
    ///
    /// Each yielded lease stays valid until the stream is advanced; the
    /// helper releases it before acquiring the next, and releases the
    /// final one when the stream is driven to completion. The stream is
    /// finite and non-restartable, and it sequences strictly one
    /// checkout per step, so it never increases parallelism.
    ///
    /// The helper owns the releases: a yielded lease must not also be
    /// passed to [`PagePool::release`] by hand.
    pub fn cycle(&self) -> impl Stream<Item = PoolResult<PageLease<F::Page>>> + '_ {
        let rounds = self.config.capacity();
        futures::stream::try_unfold(
            (0usize, None::<PageLease<F::Page>>),
            move |(step, prev)| async move {
                if let Some(lease) = prev {
                    self.release(&lease).await?;
                }
                if step == rounds {
                    return Ok(None);
                }
                let lease = self.acquire().await?;
                Ok(Some((lease.clone(), (step + 1, Some(lease)))))
            },
        )
    }
}

impl PagePool<ChromiumFactory> {
    /// Pool backed by real Chrome/Chromium, the common production shape
    #[must_use]
    pub fn chromium(config: PoolConfig) -> Self {
        Self::new(config, ChromiumFactory::new())
    }
}
