//! Thread-safe access to a pool registry

use crate::config::PoolTables;
use crate::errors::{PoolError, PoolResult};
use crate::host::ResourceFactory;
use crate::placement::PlacementData;
use crate::registry::PoolRegistry;

use parking_lot::{Mutex, MutexGuard};
use std::ops::Deref;
use std::sync::Arc;

/// A resource that goes back to its pool when dropped
pub struct PooledResource<F: ResourceFactory> {
    handle: F::Handle,
    registry: SharedPoolRegistry<F>,
    detached: bool,
}

impl<F: ResourceFactory> PooledResource<F> {
    /// Keep the resource active; it will not be released on drop
    pub fn into_handle(mut self) -> F::Handle {
        self.detached = true;
        self.handle
    }
}

impl<F: ResourceFactory> Deref for PooledResource<F> {
    type Target = F::Handle;

    fn deref(&self) -> &Self::Target {
        &self.handle
    }
}

impl<F: ResourceFactory> Drop for PooledResource<F> {
    fn drop(&mut self) {
        if self.detached {
            return;
        }
        // The registry lock may be held further up this thread's stack.
        match self.registry.inner.try_lock() {
            Some(mut registry) => {
                settle(&mut registry, &self.registry.deferred);
                release_logged(&mut registry, self.handle);
            }
            None => {
                log::trace!("Registry busy, deferring release of {:?}", self.handle);
                self.registry.deferred.lock().push(self.handle);
            }
        }
    }
}

fn release_logged<F: ResourceFactory>(registry: &mut PoolRegistry<F>, handle: F::Handle) {
    if let Err(e) = registry.release(handle) {
        log::debug!("Scoped resource {:?} was not pooled: {}", handle, e);
    }
}

/// Release every handle whose drop found the registry locked
fn settle<F: ResourceFactory>(registry: &mut PoolRegistry<F>, deferred: &Mutex<Vec<F::Handle>>) {
    let handles = std::mem::take(&mut *deferred.lock());
    for handle in handles {
        release_logged(registry, handle);
    }
}

/// A [`PoolRegistry`] behind a single coarse lock.
///
/// Each operation holds the lock for its whole duration, so acquire and
/// release calls from different threads never interleave.
///
/// A [`PooledResource`] dropped while the lock is taken does not wait for
/// it. Its handle is queued and released by the next operation that locks
/// the registry.
pub struct SharedPoolRegistry<F: ResourceFactory> {
    inner: Arc<Mutex<PoolRegistry<F>>>,
    deferred: Arc<Mutex<Vec<F::Handle>>>,
}

impl<F: ResourceFactory> Clone for SharedPoolRegistry<F> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            deferred: Arc::clone(&self.deferred),
        }
    }
}

impl<F: ResourceFactory> SharedPoolRegistry<F> {
    pub fn new(registry: PoolRegistry<F>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(registry)),
            deferred: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Lock the registry for several operations in a row.
    ///
    /// Scoped resources dropped while the guard is alive are pooled on the
    /// next lock.
    pub fn lock(&self) -> MutexGuard<'_, PoolRegistry<F>> {
        let mut registry = self.inner.lock();
        settle(&mut registry, &self.deferred);
        registry
    }

    pub fn setup_defaults(&self, tables: &PoolTables<F::Kind>) {
        self.lock().setup_defaults(tables)
    }

    pub fn create_pool(&self, kind: F::Kind, minimum: usize, maximum: usize, amount: usize) -> PoolResult<()> {
        self.lock().create_pool(kind, minimum, maximum, amount)
    }

    pub fn remove_pool(&self, kind: &F::Kind) -> PoolResult<()> {
        self.lock().remove_pool(kind)
    }

    pub fn acquire(&self, kind: &F::Kind, data: &PlacementData<F::Handle>) -> PoolResult<F::Handle> {
        self.lock().acquire(kind, data)
    }

    pub fn acquire_many(
        &self,
        kind: &F::Kind,
        count: usize,
        data: &PlacementData<F::Handle>,
    ) -> PoolResult<Vec<F::Handle>> {
        self.lock().acquire_many(kind, count, data)
    }

    /// Acquire a resource that is released automatically when the guard drops
    pub fn acquire_scoped(&self, kind: &F::Kind, data: &PlacementData<F::Handle>) -> PoolResult<PooledResource<F>> {
        let handle = self.acquire(kind, data)?;
        Ok(PooledResource {
            handle,
            registry: self.clone(),
            detached: false,
        })
    }

    pub fn release(&self, handle: F::Handle) -> PoolResult<()> {
        self.lock().release(handle)
    }

    pub fn set_pool_minimum(&self, kind: &F::Kind, minimum: usize) -> PoolResult<()> {
        self.lock().set_pool_minimum(kind, minimum)
    }

    pub fn idle_count(&self, kind: &F::Kind) -> usize {
        self.lock().pool(kind).map(|pool| pool.len()).unwrap_or(0)
    }
}

impl<F> SharedPoolRegistry<F>
where
    F: ResourceFactory + Send + 'static,
    F::Kind: Send + 'static,
    F::Handle: Send + 'static,
{
    /// Create and fill a pool on the blocking thread pool
    pub async fn create_pool_async(
        &self,
        kind: F::Kind,
        minimum: usize,
        maximum: usize,
        amount: usize,
    ) -> PoolResult<()> {
        let inner = Arc::clone(&self.inner);
        let deferred = Arc::clone(&self.deferred);

        tokio::task::spawn_blocking(move || {
            let mut registry = inner.lock();
            settle(&mut registry, &deferred);
            registry.create_pool(kind, minimum, maximum, amount)
        })
            .await
            .map_err(|_| PoolError::Cancelled)?
    }
}
