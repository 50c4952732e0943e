//! Thread-safe container utilities: a blocking FIFO queue, a LIFO stack,
//! a once-initialized singleton and a journaled queue that records every
//! operation as NDJSON.

pub mod core;

pub use crate::core::buildcore::JournaledQueue;
pub use crate::core::error::{ConfigError, JournalError, QueueError};
pub use crate::core::queue::ThreadSafeQueue;
pub use crate::core::singleton::Singleton;
pub use crate::core::stack::ThreadSafeStack;
