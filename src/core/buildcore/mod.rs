pub use crate::core::{
    log::{LogEntry, Logger, Op, SafeLogger, State},
    queue::ThreadSafeQueue,
};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::core::error::QueueError;

/// Queue that journals every operation it performs
///
/// The queue lock is never held while the journal lock is taken, so a
/// consumer blocked in [`wait_and_pop`](JournaledQueue::wait_and_pop) never
/// stalls producers that are logging their pushes. Pushes and the close are
/// journaled before any consumer can observe them, so a delivery or a
/// close-ended pop is never recorded ahead of its cause.
pub struct JournaledQueue<T> {
    name: String,
    queue: ThreadSafeQueue<T>,
    logger: SafeLogger<T>,
}

impl<T: Clone + Send + 'static> JournaledQueue<T> {
    /// Create a new, empty journaled queue
    pub fn new(name: String) -> Self {
        Self {
            queue: ThreadSafeQueue::new(),
            logger: Arc::new(Mutex::new(Logger::new(name.clone()))),
            name,
        }
    }

    /// Push with journaling
    pub fn push(&self, item: T) -> u64 {
        let id = self.logger.lock().log(Op::Push, Some(item.clone()), State::Committed);
        self.queue.push(item);
        id
    }

    /// Block for an item; journals the delivery or the close
    pub fn wait_and_pop(&self) -> Result<T, QueueError> {
        let result = self.queue.wait_and_pop();
        self.log_pop(&result);
        result
    }

    pub fn wait_and_pop_timeout(&self, timeout: Duration) -> Result<T, QueueError> {
        let result = self.queue.wait_and_pop_timeout(timeout);
        self.log_pop(&result);
        result
    }

    pub fn try_pop(&self) -> Option<T> {
        let item = self.queue.try_pop();
        let state = if item.is_some() { State::Delivered } else { State::Empty };
        self.logger.lock().log(Op::Pop, item.clone(), state);
        item
    }

    /// Close the queue, journaled once no matter how often it is called
    pub fn close(&self) {
        // journal held across the close: woken consumers log after it
        let mut logger = self.logger.lock();
        if self.queue.close() {
            logger.log(Op::Close, None, State::Committed);
        }
    }

    fn log_pop(&self, result: &Result<T, QueueError>) {
        let (item, state) = match result {
            Ok(item) => (Some(item.clone()), State::Delivered),
            Err(QueueError::Closed) => (None, State::Closed),
            Err(QueueError::Timeout) => (None, State::TimedOut),
        };
        self.logger.lock().log(Op::Pop, item, state);
    }

    /// Get current queue state
    pub fn queue_state(&self) -> (usize, bool) {
        let len = self.queue.len();
        (len, len == 0)
    }

    /// Expose logs
    pub fn logs(&self) -> Vec<LogEntry<T>> {
        self.logger.lock().entries().to_vec()
    }

    /// Number of journaled `op` entries that ended in `state`
    pub fn count(&self, op: Op, state: State) -> usize {
        self.logger.lock().count(op, state)
    }

    /// Number of journaled entries
    pub fn journal_len(&self) -> usize {
        self.logger.lock().len()
    }

    pub fn queue(&self) -> &ThreadSafeQueue<T> {
        &self.queue
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
