//! Recorder for host callbacks.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Shared, cloneable log of callback arguments.
#[derive(Debug)]
pub struct CallLog<T> {
    entries: Arc<Mutex<Vec<T>>>,
}

impl<T> Clone for CallLog<T> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<T> Default for CallLog<T> {
    fn default() -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl<T: Send + 'static> CallLog<T> {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<T>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append an entry.
    pub fn push(&self, entry: T) {
        self.lock().push(entry);
    }

    /// A closure that appends its argument to this log.
    pub fn recorder(&self) -> impl Fn(T) + Send + Sync + 'static {
        let log = self.clone();
        move |entry| log.push(entry)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl<T: Clone + Send + 'static> CallLog<T> {
    /// Snapshot of all entries.
    pub fn entries(&self) -> Vec<T> {
        self.lock().clone()
    }

    /// Most recent entry.
    pub fn last(&self) -> Option<T> {
        self.lock().last().cloned()
    }
}
