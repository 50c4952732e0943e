use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};

use log::{debug, trace, warn};
use parking_lot::{Condvar, Mutex};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::error::QueueError;

/// Queue contents guarded by the lock: the items and the close flag.
struct Inner<T> {
    items: VecDeque<T>,
    closed: bool,
}

impl<T> Inner<T> {
    fn new(items: VecDeque<T>) -> Self {
        Self { items, closed: false }
    }

    fn enqueue(&mut self, item: T) {
        let len_before = self.items.len();
        self.items.push_back(item);
        // -- post op assertion: exactly one item was added
        debug_assert_eq!(self.items.len(), len_before + 1, "Queue length should grow by 1");
    }

    fn dequeue(&mut self) -> Option<T> {
        let len_before = self.items.len();
        let result = self.items.pop_front();
        // -- post op assertion: queue size decreases if dequeue succeeded
        match result {
            Some(_) => debug_assert_eq!(self.items.len(), len_before - 1, "Queue length should decrease by 1"),
            None => debug_assert_eq!(self.items.len(), len_before, "Queue length unchanged when empty"),
        }
        result
    }
}

/// FIFO queue shared between producer and consumer threads.
///
/// Every read and write of the items happens under a single mutex. A paired
/// condition variable wakes consumers blocked in [`wait_and_pop`] when an
/// item arrives or the queue is closed.
///
/// The queue is unbounded: [`push`] never blocks and never fails.
///
/// A consumer waiting on a queue that will never receive another push blocks
/// forever. Always pair unbounded waits with an external shutdown signal;
/// [`close`] is that signal and makes every waiter return
/// [`QueueError::Closed`] once the remaining items are drained.
///
/// [`wait_and_pop`]: ThreadSafeQueue::wait_and_pop
/// [`push`]: ThreadSafeQueue::push
/// [`close`]: ThreadSafeQueue::close
pub struct ThreadSafeQueue<T> {
    inner: Mutex<Inner<T>>,
    not_empty: Condvar,
}

impl<T> ThreadSafeQueue<T> {
    /// Create a new, empty, open queue
    pub fn new() -> Self {
        Self::from_items(VecDeque::new())
    }

    fn from_items(items: VecDeque<T>) -> Self {
        Self {
            inner: Mutex::new(Inner::new(items)),
            not_empty: Condvar::new(),
        }
    }

    /// Append an item to the back and wake one waiting consumer.
    ///
    /// Items pushed after [`close`](ThreadSafeQueue::close) are still
    /// accepted and can be drained by any pop variant.
    pub fn push(&self, item: T) {
        let mut inner = self.inner.lock();
        if inner.closed {
            warn!("push on a closed queue, item will only be seen by draining consumers");
        }
        inner.enqueue(item);
        trace!("pushed, {} queued", inner.items.len());
        drop(inner);

        self.not_empty.notify_one();
    }

    /// Block until an item is available and remove it from the front.
    ///
    /// Returns [`QueueError::Closed`] once the queue is closed and empty.
    pub fn wait_and_pop(&self) -> Result<T, QueueError> {
        let mut inner = self.inner.lock();
        loop {
            if let Some(item) = inner.dequeue() {
                trace!("popped, {} queued", inner.items.len());
                return Ok(item);
            }
            if inner.closed {
                return Err(QueueError::Closed);
            }
            // re-checked on every wake, spurious or not
            self.not_empty.wait(&mut inner);
        }
    }

    /// Like [`wait_and_pop`](ThreadSafeQueue::wait_and_pop), but gives up
    /// with [`QueueError::Timeout`] once `timeout` elapses with nothing to
    /// deliver.
    pub fn wait_and_pop_timeout(&self, timeout: Duration) -> Result<T, QueueError> {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            return self.wait_and_pop();
        };
        let mut inner = self.inner.lock();
        loop {
            if let Some(item) = inner.dequeue() {
                trace!("popped, {} queued", inner.items.len());
                return Ok(item);
            }
            if inner.closed {
                return Err(QueueError::Closed);
            }
            if self.not_empty.wait_until(&mut inner, deadline).timed_out() {
                // an item may have landed right at the deadline
                return match inner.dequeue() {
                    Some(item) => Ok(item),
                    None if inner.closed => Err(QueueError::Closed),
                    None => Err(QueueError::Timeout),
                };
            }
        }
    }

    /// Remove the front item without blocking; `None` when empty.
    pub fn try_pop(&self) -> Option<T> {
        self.inner.lock().dequeue()
    }

    /// Whether the queue is empty right now.
    ///
    /// The answer may be stale as soon as it returns. Use
    /// [`try_pop`](ThreadSafeQueue::try_pop) rather than `empty()` followed
    /// by a pop.
    pub fn empty(&self) -> bool {
        self.inner.lock().items.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.empty()
    }

    /// Get the current queue length
    pub fn len(&self) -> usize {
        self.inner.lock().items.len()
    }

    /// Mark the queue closed and wake every blocked consumer.
    ///
    /// Returns `false` if the queue was already closed; closing twice is
    /// otherwise a no-op.
    pub fn close(&self) -> bool {
        let mut inner = self.inner.lock();
        if inner.closed {
            return false;
        }
        inner.closed = true;
        debug!("queue closed with {} items left", inner.items.len());
        drop(inner);

        self.not_empty.notify_all();
        true
    }

    pub fn is_closed(&self) -> bool {
        self.inner.lock().closed
    }
}

impl<T> Default for ThreadSafeQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot copy: locks `self`, duplicates the items, and returns an
/// unrelated open queue with its own lock and condition variable.
impl<T: Clone> Clone for ThreadSafeQueue<T> {
    fn clone(&self) -> Self {
        let items = self.inner.lock().items.clone();
        Self::from_items(items)
    }
}

impl<T> FromIterator<T> for ThreadSafeQueue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_items(iter.into_iter().collect())
    }
}

impl<T: fmt::Debug> fmt::Debug for ThreadSafeQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("ThreadSafeQueue")
            .field("items", &inner.items)
            .field("closed", &inner.closed)
            .finish()
    }
}

/// Serialized as the sequence of items currently queued.
impl<T: Serialize> Serialize for ThreadSafeQueue<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let inner = self.inner.lock();
        serializer.collect_seq(inner.items.iter())
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for ThreadSafeQueue<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let items = VecDeque::<T>::deserialize(deserializer)?;
        Ok(Self::from_items(items))
    }
}
