use std::collections::HashSet;
use std::sync::mpsc;
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use SyncQueueMini::{QueueError, ThreadSafeQueue};

const WAIT_LIMIT: Duration = Duration::from_secs(5);

#[test]
fn test_fifo_single_producer_single_consumer() {
    let queue = Arc::new(ThreadSafeQueue::new());

    let producer = {
        let queue = queue.clone();
        thread::spawn(move || {
            for i in 0..1000 {
                queue.push(i);
            }
        })
    };

    let mut received = Vec::with_capacity(1000);
    for _ in 0..1000 {
        received.push(queue.wait_and_pop().unwrap());
    }
    producer.join().unwrap();

    assert_eq!(received, (0..1000).collect::<Vec<_>>());
    assert!(queue.empty());
}

#[test]
fn test_try_pop_on_empty_leaves_queue_unchanged() {
    let queue: ThreadSafeQueue<i32> = ThreadSafeQueue::new();

    assert_eq!(queue.try_pop(), None);
    assert!(queue.empty());
    assert_eq!(queue.len(), 0);
    assert!(!queue.is_closed());
}

#[test]
fn test_try_pop_returns_front_and_shrinks_by_one() {
    let queue = ThreadSafeQueue::new();
    queue.push("a");
    queue.push("b");
    queue.push("c");

    assert_eq!(queue.try_pop(), Some("a"));
    assert_eq!(queue.len(), 2);
    assert_eq!(queue.try_pop(), Some("b"));
    assert_eq!(queue.len(), 1);
}

#[test]
fn test_blocked_consumer_wakes_on_push() {
    let queue = Arc::new(ThreadSafeQueue::new());
    let (tx, rx) = mpsc::channel();

    let consumer = {
        let queue = queue.clone();
        thread::spawn(move || {
            tx.send(queue.wait_and_pop()).unwrap();
        })
    };

    thread::sleep(Duration::from_millis(50));
    assert!(rx.try_recv().is_err(), "consumer returned before anything was pushed");

    queue.push(42);
    let got = rx.recv_timeout(WAIT_LIMIT).expect("consumer was not woken by push");
    assert_eq!(got, Ok(42));
    consumer.join().unwrap();
}

#[test]
fn test_copy_is_a_snapshot() {
    let a: ThreadSafeQueue<i32> = [1, 2, 3].into_iter().collect();
    let b = a.clone();

    assert_eq!(a.try_pop(), Some(1));
    assert_eq!(b.len(), 3);

    b.push(4);
    assert_eq!(a.len(), 2);

    let drained: Vec<_> = std::iter::from_fn(|| b.try_pop()).collect();
    assert_eq!(drained, vec![1, 2, 3, 4]);
    assert_eq!(a.try_pop(), Some(2));
    assert_eq!(a.try_pop(), Some(3));
}

#[test]
fn test_copy_of_closed_queue_starts_open() {
    let a: ThreadSafeQueue<i32> = [7].into_iter().collect();
    a.close();

    let b = a.clone();
    assert!(a.is_closed());
    assert!(!b.is_closed());
    assert_eq!(b.try_pop(), Some(7));
}

#[test]
fn test_concurrent_stress_no_loss_no_duplication() {
    const PRODUCERS: usize = 4;
    const CONSUMERS: usize = 4;
    const PER_PRODUCER: usize = 2_500;

    let queue = Arc::new(ThreadSafeQueue::new());
    let start = Arc::new(Barrier::new(PRODUCERS + CONSUMERS));

    let producers: Vec<_> = (0..PRODUCERS)
        .map(|p| {
            let queue = queue.clone();
            let start = start.clone();
            thread::spawn(move || {
                start.wait();
                for i in 0..PER_PRODUCER {
                    queue.push((p, i));
                }
            })
        })
        .collect();

    let consumers: Vec<_> = (0..CONSUMERS)
        .map(|_| {
            let queue = queue.clone();
            let start = start.clone();
            thread::spawn(move || {
                start.wait();
                let mut got = Vec::new();
                while let Ok(item) = queue.wait_and_pop() {
                    got.push(item);
                }
                got
            })
        })
        .collect();

    for handle in producers {
        handle.join().unwrap();
    }
    queue.close();

    let mut seen = HashSet::new();
    let mut total = 0;
    for handle in consumers {
        let got = handle.join().unwrap();

        // per-producer order is kept within any one consumer
        for p in 0..PRODUCERS {
            let tags: Vec<_> = got.iter().filter(|(q, _)| *q == p).map(|(_, i)| *i).collect();
            assert!(tags.windows(2).all(|w| w[0] < w[1]), "producer {} reordered", p);
        }

        total += got.len();
        for tag in got {
            assert!(seen.insert(tag), "duplicate delivery of {:?}", tag);
        }
    }

    assert_eq!(total, PRODUCERS * PER_PRODUCER);
    for p in 0..PRODUCERS {
        for i in 0..PER_PRODUCER {
            assert!(seen.contains(&(p, i)), "missing {:?}", (p, i));
        }
    }
}

#[test]
fn test_close_wakes_every_blocked_consumer() {
    let queue: Arc<ThreadSafeQueue<u32>> = Arc::new(ThreadSafeQueue::new());
    let (tx, rx) = mpsc::channel();

    let consumers: Vec<_> = (0..3)
        .map(|_| {
            let queue = queue.clone();
            let tx = tx.clone();
            thread::spawn(move || tx.send(queue.wait_and_pop()).unwrap())
        })
        .collect();
    drop(tx);

    thread::sleep(Duration::from_millis(50));
    assert!(queue.close());
    assert!(!queue.close(), "second close must report already closed");

    for _ in 0..3 {
        let got = rx.recv_timeout(WAIT_LIMIT).expect("close did not wake a consumer");
        assert_eq!(got, Err(QueueError::Closed));
    }
    for handle in consumers {
        handle.join().unwrap();
    }
}

#[test]
fn test_close_drains_remaining_items_first() {
    let queue = ThreadSafeQueue::new();
    queue.push(1);
    queue.push(2);
    queue.close();

    assert_eq!(queue.wait_and_pop(), Ok(1));
    assert_eq!(queue.wait_and_pop(), Ok(2));
    assert_eq!(queue.wait_and_pop(), Err(QueueError::Closed));

    // still unbounded and accepting after close
    queue.push(3);
    assert_eq!(queue.wait_and_pop(), Ok(3));
    assert_eq!(queue.wait_and_pop_timeout(Duration::from_millis(10)), Err(QueueError::Closed));
}

#[test]
fn test_close_wakes_consumer_blocked_in_timed_pop() {
    let queue: Arc<ThreadSafeQueue<u32>> = Arc::new(ThreadSafeQueue::new());
    let (tx, rx) = mpsc::channel();

    let consumer = {
        let queue = queue.clone();
        thread::spawn(move || tx.send(queue.wait_and_pop_timeout(Duration::from_secs(30))).unwrap())
    };

    thread::sleep(Duration::from_millis(50));
    assert!(rx.try_recv().is_err(), "timed pop returned before close");

    queue.close();
    let got = rx.recv_timeout(WAIT_LIMIT).expect("close did not wake the timed consumer");
    assert_eq!(got, Err(QueueError::Closed));
    consumer.join().unwrap();
}

#[test]
fn test_timed_pop_times_out_on_empty_queue() {
    let queue: ThreadSafeQueue<i32> = ThreadSafeQueue::new();

    let started = std::time::Instant::now();
    assert_eq!(queue.wait_and_pop_timeout(Duration::from_millis(30)), Err(QueueError::Timeout));
    assert!(started.elapsed() >= Duration::from_millis(30));
    assert!(queue.empty());
}

#[test]
fn test_timed_pop_receives_item_pushed_while_waiting() {
    let queue = Arc::new(ThreadSafeQueue::new());

    let producer = {
        let queue = queue.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            queue.push("late");
        })
    };

    assert_eq!(queue.wait_and_pop_timeout(WAIT_LIMIT), Ok("late"));
    producer.join().unwrap();
}

#[test]
fn test_serializes_current_items_in_order() {
    let queue: ThreadSafeQueue<String> = ["x", "y"].into_iter().map(String::from).collect();

    let json = serde_json::to_string(&queue).unwrap();
    assert_eq!(json, r#"["x","y"]"#);

    let restored: ThreadSafeQueue<String> = serde_json::from_str(&json).unwrap();
    assert!(!restored.is_closed());
    assert_eq!(restored.try_pop().as_deref(), Some("x"));
    assert_eq!(restored.try_pop().as_deref(), Some("y"));
    assert_eq!(queue.len(), 2);
}
