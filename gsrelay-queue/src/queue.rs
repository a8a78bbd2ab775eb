//! Bounded FIFO queue implementation.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, Notify};
use tokio::time::Instant;

use crate::error::QueueError;
use crate::types::Job;

struct QueueState {
    items: Mutex<VecDeque<Job>>,
    notify: Notify,
    capacity: usize,
}

/// Bounded many-producer/many-consumer FIFO of [`Job`]s.
///
/// Cloning is cheap and shares the underlying queue.
#[derive(Clone)]
pub struct JobQueue {
    state: Arc<QueueState>,
}

impl JobQueue {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: Arc::new(QueueState {
                items: Mutex::new(VecDeque::new()),
                notify: Notify::new(),
                capacity,
            }),
        }
    }

    /// Enqueue without blocking. Fails with [`QueueError::Full`] at capacity.
    pub async fn try_enqueue(&self, job: Job) -> Result<(), QueueError> {
        {
            let mut items = self.state.items.lock().await;
            if items.len() >= self.state.capacity {
                return Err(QueueError::Full);
            }
            items.push_back(job);
        }
        self.state.notify.notify_one();
        Ok(())
    }

    /// Dequeue the oldest job, waiting at most `wait` for one to arrive.
    ///
    /// Returns `None` on timeout so callers can re-check their cancel flag.
    pub async fn dequeue_timeout(&self, wait: Duration) -> Option<Job> {
        let deadline = Instant::now() + wait;
        loop {
            // Arm the waiter before checking, so an enqueue landing between
            // the check and the await still wakes us.
            let notified = self.state.notify.notified();
            {
                let mut items = self.state.items.lock().await;
                if let Some(job) = items.pop_front() {
                    // Notify stores a single permit; re-notify so a second
                    // queued item wakes the next waiter immediately.
                    if !items.is_empty() {
                        self.state.notify.notify_one();
                    }
                    return Some(job);
                }
            }
            if tokio::time::timeout_at(deadline, notified).await.is_err() {
                return self.state.items.lock().await.pop_front();
            }
        }
    }

    pub async fn len(&self) -> usize {
        self.state.items.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.items.lock().await.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.state.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn job(tag: &str) -> Job {
        Job::new(
            PathBuf::from(format!("/spool/{tag}.pdf")),
            PathBuf::from(format!("/spool/{tag}.pcl")),
            "PCL",
            vec!["-sDEVICE=pxlmono".to_string()],
            vec![],
        )
    }

    #[tokio::test]
    async fn fifo_order() {
        let q = JobQueue::with_capacity(8);
        q.try_enqueue(job("a")).await.unwrap();
        q.try_enqueue(job("b")).await.unwrap();
        q.try_enqueue(job("c")).await.unwrap();

        let first = q.dequeue_timeout(Duration::from_millis(10)).await.unwrap();
        let second = q.dequeue_timeout(Duration::from_millis(10)).await.unwrap();
        let third = q.dequeue_timeout(Duration::from_millis(10)).await.unwrap();
        assert_eq!(first.input_path, PathBuf::from("/spool/a.pdf"));
        assert_eq!(second.input_path, PathBuf::from("/spool/b.pdf"));
        assert_eq!(third.input_path, PathBuf::from("/spool/c.pdf"));
        assert!(q.is_empty().await);
    }

    #[tokio::test]
    async fn rejects_when_full() {
        let q = JobQueue::with_capacity(2);
        q.try_enqueue(job("a")).await.unwrap();
        q.try_enqueue(job("b")).await.unwrap();
        let err = q.try_enqueue(job("c")).await.unwrap_err();
        assert!(matches!(err, QueueError::Full));
        assert_eq!(q.len().await, 2);

        // capacity frees up after a dequeue
        q.dequeue_timeout(Duration::from_millis(10)).await.unwrap();
        q.try_enqueue(job("c")).await.unwrap();
    }

    #[tokio::test]
    async fn dequeue_times_out_empty() {
        let q = JobQueue::with_capacity(2);
        let start = std::time::Instant::now();
        let got = q.dequeue_timeout(Duration::from_millis(50)).await;
        assert!(got.is_none());
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[tokio::test]
    async fn wakes_blocked_consumer() {
        let q = JobQueue::with_capacity(2);
        let consumer = {
            let q = q.clone();
            tokio::spawn(async move { q.dequeue_timeout(Duration::from_secs(5)).await })
        };
        // give the consumer time to block
        tokio::time::sleep(Duration::from_millis(20)).await;
        q.try_enqueue(job("a")).await.unwrap();

        let got = consumer.await.unwrap();
        assert!(got.is_some());
    }

    #[tokio::test]
    async fn back_to_back_items_do_not_stall() {
        let q = JobQueue::with_capacity(4);
        q.try_enqueue(job("a")).await.unwrap();
        q.try_enqueue(job("b")).await.unwrap();

        // both must come out well inside a single timeout tick
        let t = std::time::Instant::now();
        assert!(q.dequeue_timeout(Duration::from_secs(1)).await.is_some());
        assert!(q.dequeue_timeout(Duration::from_secs(1)).await.is_some());
        assert!(t.elapsed() < Duration::from_millis(500));
    }
}
