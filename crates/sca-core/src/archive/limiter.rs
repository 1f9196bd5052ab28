//! Concurrency limiter for the network phase of track downloads.

use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::{AcquireError, Semaphore, SemaphorePermit};

/// Caps how many tracks are inside their network phase (URL resolution and
/// GET) at once. Capacity is fixed for the lifetime of the limiter.
#[derive(Debug)]
pub struct ConcurrencyLimiter {
    semaphore: Semaphore,
    capacity: usize,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl ConcurrencyLimiter {
    /// Create a limiter with `capacity` slots (at least 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            semaphore: Semaphore::new(capacity),
            capacity,
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of permits currently held.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Relaxed)
    }

    /// Highest number of permits held at the same time so far.
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::Relaxed)
    }

    /// Wait for a free slot. The slot is released when the permit is dropped.
    /// Fails only if the semaphore was closed, which this type never does.
    pub async fn acquire(&self) -> Result<NetworkPermit<'_>, AcquireError> {
        let permit = self.semaphore.acquire().await?;
        let now = self.in_flight.fetch_add(1, Ordering::AcqRel) + 1;
        self.peak.fetch_max(now, Ordering::AcqRel);
        Ok(NetworkPermit {
            _permit: permit,
            limiter: self,
        })
    }
}

/// Held for the duration of one network phase.
pub struct NetworkPermit<'a> {
    _permit: SemaphorePermit<'a>,
    limiter: &'a ConcurrencyLimiter,
}

impl Drop for NetworkPermit<'_> {
    fn drop(&mut self) {
        self.limiter.in_flight.fetch_sub(1, Ordering::AcqRel);
    }
}
