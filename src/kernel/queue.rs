//! A simple FIFO queue with safe concurrent push/pop (spec.md §2: "bounded-
//! unbounded FIFO with safe concurrent enqueue/dequeue").
//!
//! The teacher's `kernel/queue.rs` built this on an unbounded `futures::mpsc`
//! channel wrapped in a lock for a one-slot peek buffer, because its mailbox
//! drain awaited directly on the queue. Actorium's dispatcher schedules
//! drains explicitly (§4.1's scheduling algorithm) rather than polling a
//! stream, so a plain mutex-guarded `VecDeque` is enough and keeps the
//! locking discipline simple: the lock is only ever held across a push or a
//! pop, never across a callback.

use std::collections::VecDeque;
use std::sync::Mutex;

pub struct Queue<T> {
    inner: Mutex<VecDeque<T>>,
}

impl<T> Queue<T> {
    pub fn new() -> Self {
        Queue {
            inner: Mutex::new(VecDeque::new()),
        }
    }

    pub fn push(&self, item: T) {
        self.inner.lock().unwrap().push_back(item);
    }

    pub fn pop(&self) -> Option<T> {
        self.inner.lock().unwrap().pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().is_empty()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Queue::new()
    }
}
