use std::fmt;

use log::trace;
use parking_lot::Mutex;

/// LIFO stack behind a single mutex.
///
/// Emptiness is reported the same way as on
/// [`ThreadSafeQueue`](crate::ThreadSafeQueue): `pop` and `top` return
/// `None`, they never panic.
pub struct ThreadSafeStack<T> {
    items: Mutex<Vec<T>>,
}

impl<T> ThreadSafeStack<T> {
    pub fn new() -> Self {
        Self { items: Mutex::new(Vec::new()) }
    }

    pub fn push(&self, item: T) {
        let mut items = self.items.lock();
        items.push(item);
        trace!("stack push, depth {}", items.len());
    }

    /// Remove and return the most recently pushed item.
    pub fn pop(&self) -> Option<T> {
        let mut items = self.items.lock();
        let len_before = items.len();
        let result = items.pop();
        // -- post op assertion: depth shrinks only when something was popped
        debug_assert_eq!(items.len(), len_before - usize::from(result.is_some()));
        result
    }

    /// Whether the stack is empty right now; stale as soon as it returns.
    pub fn empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.empty()
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }
}

impl<T: Clone> ThreadSafeStack<T> {
    /// Copy of the top item, leaving the stack unchanged.
    pub fn top(&self) -> Option<T> {
        self.items.lock().last().cloned()
    }
}

impl<T> Default for ThreadSafeStack<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot copy taken under the source's lock.
impl<T: Clone> Clone for ThreadSafeStack<T> {
    fn clone(&self) -> Self {
        let items = self.items.lock().clone();
        Self { items: Mutex::new(items) }
    }
}

impl<T> FromIterator<T> for ThreadSafeStack<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self { items: Mutex::new(iter.into_iter().collect()) }
    }
}

impl<T: fmt::Debug> fmt::Debug for ThreadSafeStack<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThreadSafeStack").field("items", &*self.items.lock()).finish()
    }
}
