use parking_lot::Mutex;
use std::collections::VecDeque;
use tokio::sync::mpsc;

mod envelope;
pub use envelope::*;

/// Unbounded FIFO queue. Any number of producers, one draining consumer at a time.
///
/// The consumer can hand messages back with [MessageQueue::requeue]; those are
/// popped again before anything still in the channel.
pub(crate) struct MessageQueue<T> {
    tx: mpsc::UnboundedSender<T>,
    rx: Mutex<mpsc::UnboundedReceiver<T>>,
    requeued: Mutex<VecDeque<T>>,
}

impl<T: Send> MessageQueue<T> {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx: Mutex::new(rx),
            requeued: Mutex::new(VecDeque::new()),
        }
    }
    pub fn push(&self, msg: T) {
        // The receiver lives as long as the queue, so sending cannot fail.
        let _ = self.tx.send(msg);
    }
    pub fn pop(&self) -> Option<T> {
        if let Some(msg) = self.requeued.lock().pop_front() {
            return Some(msg);
        }
        self.rx.lock().try_recv().ok()
    }
    /// Pops up to `max` messages, oldest first.
    pub fn pop_many(&self, max: usize) -> Vec<T> {
        let mut out = Vec::with_capacity(max.min(64));
        {
            let mut requeued = self.requeued.lock();
            while out.len() < max {
                match requeued.pop_front() {
                    Some(msg) => out.push(msg),
                    None => break,
                }
            }
        }
        let mut rx = self.rx.lock();
        while out.len() < max {
            match rx.try_recv() {
                Ok(msg) => out.push(msg),
                Err(_) => break,
            }
        }
        out
    }
    /// Puts messages back at the head of the queue, keeping their order.
    pub fn requeue(&self, msgs: Vec<T>) {
        let mut requeued = self.requeued.lock();
        for msg in msgs.into_iter().rev() {
            requeued.push_front(msg);
        }
    }
    pub fn is_empty(&self) -> bool {
        self.requeued.lock().is_empty() && self.rx.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_push_order() {
        let queue = MessageQueue::new();
        for i in 0..10 {
            queue.push(i);
        }
        assert_eq!(queue.pop(), Some(0));
        assert_eq!(queue.pop_many(3), vec![1, 2, 3]);
        assert_eq!(queue.pop_many(100), vec![4, 5, 6, 7, 8, 9]);
        assert!(queue.is_empty());
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn requeued_messages_come_first() {
        let queue = MessageQueue::new();
        for i in 0..5 {
            queue.push(i);
        }
        let batch = queue.pop_many(4);
        assert_eq!(batch, vec![0, 1, 2, 3]);
        queue.push(5);
        queue.requeue(batch[2..].to_vec());
        assert!(!queue.is_empty());
        assert_eq!(queue.pop(), Some(2));
        assert_eq!(queue.pop_many(10), vec![3, 4, 5]);
        assert!(queue.is_empty());
    }

    #[test]
    fn concurrent_producers_keep_per_producer_order() {
        let queue = std::sync::Arc::new(MessageQueue::new());
        let handles: Vec<_> = (0..4)
            .map(|p| {
                let queue = queue.clone();
                std::thread::spawn(move || {
                    for i in 0..250 {
                        queue.push((p, i));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        let all = queue.pop_many(usize::MAX);
        assert_eq!(all.len(), 1000);
        for p in 0..4 {
            let seen: Vec<_> = all.iter().filter(|(q, _)| *q == p).map(|(_, i)| *i).collect();
            assert_eq!(seen, (0..250).collect::<Vec<_>>());
        }
    }
}
