//! One-shot timer service (spec.md §4.6).
//!
//! Grounded on the teacher's `system/timer.rs` (`Timer`/`BasicTimer`/
//! `Job::{Once,Repeat}`), scoped down to one-shot only: spec.md's Scheduler
//! is explicitly "a one-shot timer service", so the teacher's `RepeatJob`
//! and interval-based `schedule` are dropped rather than carried over
//! (noted in DESIGN.md). Cancellation is best-effort, matching the
//! teacher's atomic-flag-checked-before-firing approach.

use crate::actor::actor_ref::BasicActorRef;
use crate::actor::system_message::SystemMessage;
use crate::message::Message;
use crate::system::extension::Extension;
use crate::system::system::ActorSystem;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// A handle to a pending timer; dropping it does not cancel the timer —
/// call `cancel()` explicitly.
#[derive(Clone)]
pub struct TimerHandle {
    cancelled: Arc<AtomicBool>,
}

impl TimerHandle {
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

#[derive(Clone)]
pub struct Scheduler {
    handle: tokio::runtime::Handle,
}

impl Scheduler {
    /// Runs `cb` after `delay` unless cancelled first. A timer already
    /// executing its callback runs to completion even if cancelled mid-flight
    /// (spec.md §4.6, §5).
    pub fn schedule_once<F>(&self, delay: Duration, cb: F) -> TimerHandle
    where
        F: FnOnce() + Send + 'static,
    {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);
        self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            if flag.load(Ordering::SeqCst) {
                return;
            }
            // Callback failures are logged and swallowed so a misbehaving
            // timer body never takes down the scheduler (spec.md §7).
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(cb));
            if let Err(_payload) = result {
                debug!("scheduled callback panicked");
            }
        });
        TimerHandle { cancelled }
    }

    pub fn schedule_message<T: Message>(
        &self,
        delay: Duration,
        target: crate::actor::actor_ref::ActorRef<T>,
        msg: T,
    ) -> TimerHandle {
        self.schedule_once(delay, move || target.tell(msg))
    }

    pub fn schedule_system_message(
        &self,
        delay: Duration,
        target: BasicActorRef,
        msg: SystemMessage,
    ) -> TimerHandle {
        self.schedule_once(delay, move || target.sys_tell(msg, None))
    }
}

impl Extension for Scheduler {
    fn construct(system: &ActorSystem) -> Self {
        Scheduler {
            handle: system.runtime_handle(),
        }
    }
}
