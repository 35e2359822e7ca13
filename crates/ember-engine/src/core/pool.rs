//! Thread-safe object pool for recycling per-tick allocations.

use parking_lot::Mutex;

/// Reusable-object cache bounded by a maximum size.
///
/// `acquire` hands out a reset instance (recycled if available, otherwise
/// built by the factory); `release` resets and returns it unless the pool
/// is full, in which case the instance is simply dropped. Reset runs on
/// both paths, so a recycled instance never leaks previous state.
pub struct ObjectPool<T> {
    factory: Box<dyn Fn() -> T + Send + Sync>,
    reset: Box<dyn Fn(&mut T) + Send + Sync>,
    free: Mutex<Vec<T>>,
    max_size: usize,
}

impl<T> ObjectPool<T> {
    pub const DEFAULT_MAX_SIZE: usize = 1000;

    pub fn new(
        factory: impl Fn() -> T + Send + Sync + 'static,
        reset: impl Fn(&mut T) + Send + Sync + 'static,
        max_size: usize,
    ) -> Self {
        ObjectPool {
            factory: Box::new(factory),
            reset: Box::new(reset),
            free: Mutex::new(Vec::new()),
            max_size,
        }
    }

    /// Take an instance out of the pool, or build a fresh one.
    pub fn acquire(&self) -> T {
        let recycled = self.free.lock().pop();
        match recycled {
            Some(mut obj) => {
                (self.reset)(&mut obj);
                obj
            }
            None => (self.factory)(),
        }
    }

    /// Return an instance to the pool. Drops it when the pool is full;
    /// overflow is not an error.
    pub fn release(&self, mut obj: T) {
        (self.reset)(&mut obj);
        let mut free = self.free.lock();
        if free.len() < self.max_size {
            free.push(obj);
        }
    }

    /// Run `f` with a pooled instance, releasing it afterwards.
    pub fn with_pooled<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut obj = self.acquire();
        let result = f(&mut obj);
        self.release(obj);
        result
    }

    /// Drop every cached instance.
    pub fn clear(&self) {
        self.free.lock().clear();
    }

    /// Number of currently cached (free) instances.
    pub fn size(&self) -> usize {
        self.free.lock().len()
    }
}

impl<T> std::fmt::Debug for ObjectPool<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectPool")
            .field("size", &self.size())
            .field("max_size", &self.max_size)
            .finish()
    }
}
