//! Single-assignment result cell: `Promise`/`Future` (spec.md §4.4).
//!
//! The teacher has no standalone promise type — `riker-patterns::ask` wires
//! a `futures::channel::oneshot` directly into a throwaway actor. Actorium
//! needs the richer state machine spec.md §4.4 asks for (pending → exactly
//! one of success/failure/cancelled, callbacks fired at most once, a
//! blocking/async `await`), so this module generalizes that oneshot into a
//! proper primitive the ask pattern and stream completion sinks both build
//! on. The locking style (a small `Mutex`-guarded enum, work done outside
//! the lock) follows `kernel/mailbox.rs`'s `Flags`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

/// The terminal outcome of a `Promise`/`Future` pair.
#[derive(Debug, Clone)]
pub enum Terminal<T, E> {
    Success(T),
    Failure(E),
    Cancelled,
}

struct Callback<T, E> {
    cancelled: Arc<AtomicBool>,
    f: Box<dyn FnOnce(&Terminal<T, E>) + Send>,
}

enum State<T, E> {
    Pending(Vec<Callback<T, E>>),
    Done(Terminal<T, E>),
}

struct Inner<T, E> {
    state: Mutex<State<T, E>>,
    notify: Notify,
}

/// The write side of a promise: completes it exactly once.
pub struct Promise<T, E> {
    inner: Arc<Inner<T, E>>,
}

impl<T, E> Clone for Promise<T, E> {
    fn clone(&self) -> Self {
        Promise {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// The read side: observes whatever terminal value the paired `Promise`
/// eventually writes, any number of times.
pub struct Future<T, E> {
    inner: Arc<Inner<T, E>>,
}

impl<T, E> Clone for Future<T, E> {
    fn clone(&self) -> Self {
        Future {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// A handle to a registered callback; `cancel()` suppresses it if it hasn't
/// fired yet. Cancelling after the promise has already completed is a no-op.
pub struct Subscription {
    cancelled: Arc<AtomicBool>,
}

impl Subscription {
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }
}

impl<T, E> Promise<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    pub fn new() -> (Promise<T, E>, Future<T, E>) {
        let inner = Arc::new(Inner {
            state: Mutex::new(State::Pending(Vec::new())),
            notify: Notify::new(),
        });
        (
            Promise {
                inner: Arc::clone(&inner),
            },
            Future { inner },
        )
    }

    /// Transitions to `terminal` unless already done. Returns whether this
    /// call was the one that completed it — write-once (spec.md §4.4).
    fn complete(&self, terminal: Terminal<T, E>) -> bool {
        let callbacks = {
            let mut guard = self.inner.state.lock().unwrap();
            if matches!(&*guard, State::Done(_)) {
                return false;
            }
            match std::mem::replace(&mut *guard, State::Done(terminal.clone())) {
                State::Pending(cbs) => cbs,
                State::Done(_) => unreachable!(),
            }
        };
        self.inner.notify.notify_waiters();
        for cb in callbacks {
            if !cb.cancelled.load(Ordering::SeqCst) {
                (cb.f)(&terminal);
            }
        }
        true
    }

    pub fn try_success(&self, value: T) -> bool {
        self.complete(Terminal::Success(value))
    }

    pub fn try_failure(&self, err: E) -> bool {
        self.complete(Terminal::Failure(err))
    }

    pub fn try_cancel(&self) -> bool {
        self.complete(Terminal::Cancelled)
    }

    pub fn is_done(&self) -> bool {
        matches!(&*self.inner.state.lock().unwrap(), State::Done(_))
    }
}

impl<T, E> Future<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Registers `f` to run on the terminal value. Runs immediately (on the
    /// caller's stack) if the promise is already done.
    pub fn on_complete<F>(&self, f: F) -> Subscription
    where
        F: FnOnce(&Terminal<T, E>) + Send + 'static,
    {
        let cancelled = Arc::new(AtomicBool::new(false));
        let mut guard = self.inner.state.lock().unwrap();
        match &mut *guard {
            State::Done(terminal) => {
                let terminal = terminal.clone();
                drop(guard);
                f(&terminal);
            }
            State::Pending(cbs) => cbs.push(Callback {
                cancelled: Arc::clone(&cancelled),
                f: Box::new(f),
            }),
        }
        Subscription { cancelled }
    }

    pub fn on_success<F>(&self, f: F) -> Subscription
    where
        F: FnOnce(T) + Send + 'static,
    {
        self.on_complete(move |t| {
            if let Terminal::Success(v) = t {
                f(v.clone());
            }
        })
    }

    pub fn on_failure<F>(&self, f: F) -> Subscription
    where
        F: FnOnce(E) + Send + 'static,
    {
        self.on_complete(move |t| {
            if let Terminal::Failure(e) = t {
                f(e.clone());
            }
        })
    }

    pub fn on_cancel<F>(&self, f: F) -> Subscription
    where
        F: FnOnce() + Send + 'static,
    {
        self.on_complete(move |t| {
            if let Terminal::Cancelled = t {
                f();
            }
        })
    }

    pub fn is_done(&self) -> bool {
        matches!(&*self.inner.state.lock().unwrap(), State::Done(_))
    }

    /// Waits for a terminal value. `None` means `timeout` elapsed first —
    /// the promise itself is untouched and may still complete later.
    pub async fn await_result(&self, timeout: Option<Duration>) -> Option<Terminal<T, E>> {
        loop {
            // `notified()` must be constructed before the state check: a
            // `notify_waiters()` call racing in between is still observed by
            // this future once awaited, which is what makes this loop safe.
            let notified = self.inner.notify.notified();
            {
                let guard = self.inner.state.lock().unwrap();
                if let State::Done(t) = &*guard {
                    return Some(t.clone());
                }
            }
            match timeout {
                Some(d) => {
                    if tokio::time::timeout(d, notified).await.is_err() {
                        return None;
                    }
                }
                None => notified.await,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn success_is_observed_by_await_and_callback() {
        let (promise, future) = Promise::<u32, String>::new();
        let seen = Arc::new(Mutex::new(None));
        let seen2 = Arc::clone(&seen);
        future.on_success(move |v| *seen2.lock().unwrap() = Some(v));

        assert!(promise.try_success(7));
        assert!(!promise.try_success(8), "write-once: second write is rejected");

        match future.await_result(None).await {
            Some(Terminal::Success(v)) => assert_eq!(v, 7),
            other => panic!("expected Success(7), got {other:?}"),
        }
        assert_eq!(*seen.lock().unwrap(), Some(7));
    }

    #[tokio::test]
    async fn late_subscriber_still_sees_the_terminal_value() {
        let (promise, future) = Promise::<u32, String>::new();
        promise.try_failure("boom".to_string());

        let seen = Arc::new(Mutex::new(None));
        let seen2 = Arc::clone(&seen);
        future.on_failure(move |e| *seen2.lock().unwrap() = Some(e));
        assert_eq!(seen.lock().unwrap().as_deref(), Some("boom"));
    }

    #[tokio::test]
    async fn await_times_out_without_completing_the_promise() {
        let (promise, future) = Promise::<u32, String>::new();
        let result = future.await_result(Some(Duration::from_millis(20))).await;
        assert!(result.is_none());
        assert!(!promise.is_done());
        assert!(promise.try_success(1));
    }

    #[tokio::test]
    async fn cancelled_subscription_does_not_fire() {
        let (promise, future) = Promise::<u32, String>::new();
        let fired = Arc::new(AtomicBool::new(false));
        let fired2 = Arc::clone(&fired);
        let sub = future.on_success(move |_| fired2.store(true, Ordering::SeqCst));
        sub.cancel();
        promise.try_success(1);
        assert!(!fired.load(Ordering::SeqCst));
    }
}
