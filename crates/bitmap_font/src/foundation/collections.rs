//! Specialized collection types

/// Objects that can be recycled through a [`Pool`]
pub trait Poolable: Default {
    /// Restore the object to its freshly-constructed state, keeping any
    /// allocations it owns
    fn reset(&mut self);
}

/// Free list for object pooling
///
/// Released objects are reset and kept until the next [`Pool::obtain`], so
/// their heap buffers are reused instead of reallocated. A pool is plain
/// owned data: it is not shared between owners and is not thread-safe.
#[derive(Debug)]
pub struct Pool<T: Poolable> {
    free: Vec<T>,
    max: usize,
    peak: usize,
}

impl<T: Poolable> Pool<T> {
    /// Default number of idle objects a pool retains
    pub const DEFAULT_MAX: usize = 64;

    /// Create a new pool retaining at most [`Pool::DEFAULT_MAX`] idle objects
    pub fn new() -> Self {
        Self::with_max(Self::DEFAULT_MAX)
    }

    /// Create a pool retaining at most `max` idle objects
    pub fn with_max(max: usize) -> Self {
        Self {
            free: Vec::new(),
            max,
            peak: 0,
        }
    }

    /// Take an object from the pool, constructing one if none is idle
    pub fn obtain(&mut self) -> T {
        self.free.pop().unwrap_or_default()
    }

    /// Return an object to the pool
    ///
    /// The object is reset; if the pool is already full it is dropped.
    pub fn free(&mut self, mut item: T) {
        if self.free.len() < self.max {
            item.reset();
            self.free.push(item);
            self.peak = self.peak.max(self.free.len());
        }
    }

    /// Return every object yielded by `items` to the pool
    pub fn free_all(&mut self, items: impl IntoIterator<Item = T>) {
        for item in items {
            self.free(item);
        }
    }

    /// Number of idle objects currently held
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Highest number of idle objects held at once
    pub fn peak(&self) -> usize {
        self.peak
    }
}

impl<T: Poolable> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}
