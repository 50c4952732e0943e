use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use log::info;
use SyncQueueMini::core::buildcore::{JournaledQueue, Op, State};
use SyncQueueMini::core::config::DemoConfig;
use SyncQueueMini::core::diagnostics::init_logging;
use SyncQueueMini::core::log::append_logs;

fn main() -> anyhow::Result<()> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = DemoConfig::load(config_path.as_deref())?;
    init_logging(config.log_config()?).context("Failed to initialize logging")?;

    let queue = Arc::new(JournaledQueue::<String>::new("demo".to_string()));

    // Spawn producers, each enqueueing its own tagged items
    let producers: Vec<_> = (0..config.producers)
        .map(|p| {
            let queue = queue.clone();
            let count = config.items_per_producer;
            thread::spawn(move || {
                for i in 1..=count {
                    queue.push(format!("P{}-Item {}", p, i));
                    thread::sleep(Duration::from_millis(5));
                }
            })
        })
        .collect();

    // Consumers drain until the queue is closed
    let consumers: Vec<_> = (0..config.consumers)
        .map(|c| {
            let queue = queue.clone();
            thread::spawn(move || {
                let mut received = 0usize;
                while let Ok(item) = queue.wait_and_pop() {
                    info!("C{} got {}", c, item);
                    received += 1;
                }
                received
            })
        })
        .collect();

    for handle in producers {
        handle.join().map_err(|_| anyhow::anyhow!("producer thread panicked"))?;
    }
    queue.close();

    let mut total = 0;
    for handle in consumers {
        total += handle.join().map_err(|_| anyhow::anyhow!("consumer thread panicked"))?;
    }

    info!(
        "pushed {}, delivered {}, journal holds {} entries",
        queue.count(Op::Push, State::Committed),
        total,
        queue.journal_len()
    );

    // Append the journal as NDJSON
    append_logs(&queue.logs(), &config.log_path)
        .with_context(|| format!("Failed to append logs to {}", config.log_path.display()))?;
    Ok(())
}
