use std::sync::{Arc, PoisonError, RwLock};

/// Shared, replace-only handle to an immutable value.
///
/// Readers take an `Arc` and keep using it for as long as they need; a reload
/// builds the new value completely and then swaps the pointer, so a reader
/// never observes a partially built state.
#[derive(Debug)]
pub struct Snapshot<T> {
    current: RwLock<Arc<T>>,
}

impl<T> Snapshot<T> {
    pub fn new(value: T) -> Self { Self { current: RwLock::new(Arc::new(value)) } }

    pub fn load(&self) -> Arc<T> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*guard)
    }

    /// Install `value` and return the snapshot it replaced.
    pub fn swap(&self, value: T) -> Arc<T> {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, Arc::new(value))
    }
}
