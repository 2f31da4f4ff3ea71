// file: src/renderer/pool.rs
// description: fixed-capacity renderer pool with leased acquisition and graceful degradation

use crate::config::PoolConfig;
use crate::error::{EnhanceError, Result};
use crate::renderer::{Renderer, RendererFactory};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::Notify;
use tokio::time::{Duration, Instant, timeout};
use tracing::{debug, info, warn};

struct PoolState {
    renderers: Vec<Arc<dyn Renderer>>,
    in_use: Vec<bool>,
}

struct PoolShared {
    state: Mutex<PoolState>,
    notify: Notify,
}

impl PoolShared {
    // Availability check-and-set must happen under this lock; a poisoned
    // lock only means a panic elsewhere, the map itself stays usable.
    fn lock(&self) -> MutexGuard<'_, PoolState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Owns a fixed set of renderer instances plus their availability map.
/// Constructed explicitly by the host and shared via `Arc`; lifecycle is
/// `initialize` once, `shutdown` once. Size never changes in between.
pub struct RendererPool {
    shared: Arc<PoolShared>,
    capacity: usize,
    acquire_timeout: Duration,
}

impl RendererPool {
    /// Launch up to `capacity` instances. An instance that fails to start
    /// (or exceeds the launch timeout) is logged and skipped, not retried;
    /// the pool proceeds with whatever started, including zero.
    pub async fn initialize(factory: &dyn RendererFactory, config: &PoolConfig) -> Self {
        let launch_timeout = Duration::from_millis(config.launch_timeout_ms);
        let mut renderers: Vec<Arc<dyn Renderer>> = Vec::with_capacity(config.capacity);

        for slot in 0..config.capacity {
            match timeout(launch_timeout, factory.launch()).await {
                Ok(Ok(renderer)) => {
                    debug!(slot, "renderer instance started");
                    renderers.push(Arc::from(renderer));
                }
                Ok(Err(e)) => {
                    warn!(slot, error = %e, "renderer instance failed to start, skipping");
                }
                Err(_) => {
                    warn!(
                        slot,
                        timeout_ms = config.launch_timeout_ms,
                        "renderer instance startup timed out, skipping"
                    );
                }
            }
        }

        let usable = renderers.len();
        if usable == 0 {
            warn!("renderer pool is empty, all fetches will use fallback retrieval");
        } else if usable < config.capacity {
            warn!(
                usable,
                capacity = config.capacity,
                "renderer pool started degraded"
            );
        } else {
            info!(capacity = config.capacity, "renderer pool initialized");
        }

        let in_use = vec![false; usable];
        Self {
            shared: Arc::new(PoolShared {
                state: Mutex::new(PoolState { renderers, in_use }),
                notify: Notify::new(),
            }),
            capacity: config.capacity,
            acquire_timeout: Duration::from_millis(config.acquire_timeout_ms),
        }
    }

    /// Hand out the first free instance. When all instances are leased the
    /// caller suspends until a lease is dropped, bounded by the configured
    /// acquisition timeout. An empty pool fails immediately with
    /// `PoolUnavailable` so dependents can route to fallback.
    pub async fn acquire(&self) -> Result<RendererLease> {
        let deadline = Instant::now() + self.acquire_timeout;

        loop {
            // Register interest before checking, so a release racing this
            // check is not missed.
            let notified = self.shared.notify.notified();

            {
                let mut state = self.shared.lock();
                if state.renderers.is_empty() {
                    return Err(EnhanceError::PoolUnavailable);
                }
                if let Some(index) = state.in_use.iter().position(|busy| !busy) {
                    state.in_use[index] = true;
                    let renderer = Arc::clone(&state.renderers[index]);
                    debug!(index, "renderer leased");
                    return Ok(RendererLease {
                        index,
                        renderer,
                        shared: Arc::clone(&self.shared),
                    });
                }
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(EnhanceError::PoolExhausted {
                    waited_ms: self.acquire_timeout.as_millis() as u64,
                });
            }
            let _ = timeout(remaining, notified).await;
        }
    }

    /// Close every instance and empty the pool. Pending acquirers are woken
    /// and observe `PoolUnavailable`. Idempotent; re-initialization after
    /// shutdown is not supported.
    pub async fn shutdown(&self) {
        let renderers = {
            let mut state = self.shared.lock();
            state.in_use.clear();
            std::mem::take(&mut state.renderers)
        };

        if renderers.is_empty() {
            return;
        }

        info!(count = renderers.len(), "shutting down renderer pool");
        for renderer in renderers {
            if let Err(e) = renderer.close().await {
                warn!(error = %e, "renderer close failed during shutdown");
            }
        }
        self.shared.notify.notify_waiters();
    }

    /// Number of instances that actually started.
    pub fn usable(&self) -> usize {
        self.shared.lock().renderers.len()
    }

    /// Configured capacity, regardless of how many instances started.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.usable() == 0
    }

    /// Degraded mode: fewer usable instances than configured (including zero).
    pub fn is_degraded(&self) -> bool {
        self.usable() < self.capacity
    }
}

/// Exclusive use of one pooled instance. The slot is returned to the pool
/// when the lease drops, on every exit path, and one waiter is woken.
pub struct RendererLease {
    index: usize,
    renderer: Arc<dyn Renderer>,
    shared: Arc<PoolShared>,
}

impl RendererLease {
    pub fn renderer(&self) -> &dyn Renderer {
        self.renderer.as_ref()
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

impl Drop for RendererLease {
    fn drop(&mut self) {
        {
            let mut state = self.shared.lock();
            // No-op when the slot is gone, e.g. the pool shut down while
            // this lease was out.
            if let Some(slot) = state.in_use.get_mut(self.index) {
                *slot = false;
            }
        }
        self.shared.notify.notify_one();
    }
}
