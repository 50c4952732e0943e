use std::fmt::{Display, Formatter};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::core::error::JournalError;

static LOG_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Queue operation recorded in the journal
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Op {
    Push,
    Pop,
    Close,
}

/// How an operation ended
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum State {
    /// push accepted or close applied
    Committed,
    /// pop returned an item
    Delivered,
    /// non-blocking pop found nothing
    Empty,
    /// blocking pop ended by close
    Closed,
    /// timed pop gave up
    TimedOut,
}

/// Log entry recording an operation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogEntry<T> {
    pub local_log_id: u64,
    pub queue_name: String,
    pub op: Op,
    pub item: Option<T>,
    pub state: State,
    pub timestamp: String, // RFC 3339, local time
}

impl<T: std::fmt::Debug> Display for LogEntry<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "LogEntry {{ local_log_id: {}, queue_name: {}, op: {:?}, item: {:?}, state: {:?}, timestamp: {} }}",
            self.local_log_id, self.queue_name, self.op, self.item, self.state, self.timestamp,
        )
    }
}

/// Journal storing all entries of one queue
#[derive(Clone, Debug)]
pub struct Logger<T> {
    entries: Vec<LogEntry<T>>,
    queue_name: String,
}

impl<T: Clone> Logger<T> {
    pub fn new(queue_name: String) -> Self {
        Self { entries: Vec::new(), queue_name }
    }

    /// Record an operation and return its id
    pub fn log(&mut self, op: Op, item: Option<T>, state: State) -> u64 {
        // --- Negative-space assertion: state must match operation ---
        match op {
            Op::Push => debug_assert!(state == State::Committed, "Push must be Committed"),
            Op::Close => debug_assert!(
                state == State::Committed && item.is_none(),
                "Close must be Committed and carry no item"
            ),
            Op::Pop => debug_assert!(state != State::Committed, "Pop cannot be Committed"),
        }

        let local_log_id = LOG_ID_COUNTER.fetch_add(1, Ordering::SeqCst);

        let before = self.entries.len();
        self.entries.push(LogEntry {
            local_log_id,
            queue_name: self.queue_name.clone(),
            op,
            item,
            state,
            timestamp: chrono::Local::now().to_rfc3339(),
        });

        // --- Negative-space assertion: log length increased exactly by 1 ---
        debug_assert_eq!(self.entries.len(), before + 1, "Logger must increase by exactly one entry");
        local_log_id
    }

    pub fn entries(&self) -> &[LogEntry<T>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries for `op` that ended in `state`
    pub fn count(&self, op: Op, state: State) -> usize {
        self.entries.iter().filter(|e| e.op == op && e.state == state).count()
    }
}

/// Append entries to `path` as NDJSON, one object per line.
pub fn append_logs<T: Serialize>(log: &[LogEntry<T>], path: impl AsRef<Path>) -> Result<(), JournalError> {
    let mut file = OpenOptions::new().append(true).create(true).open(path)?;

    for entry in log {
        let json = serde_json::to_string(entry)?;
        writeln!(file, "{}", json)?; // one JSON object per line
    }
    file.flush()?;
    Ok(())
}

/// Read back every entry of an NDJSON journal, skipping blank lines.
pub fn read_logs<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<Vec<LogEntry<T>>, JournalError> {
    let reader = BufReader::new(File::open(path)?);
    let mut entries = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        entries.push(serde_json::from_str(&line)?);
    }
    Ok(entries)
}

/// Thread-safe wrapper
pub type SafeLogger<T> = Arc<Mutex<Logger<T>>>;
