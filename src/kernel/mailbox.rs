//! Mailbox queues, scheduling flags, and the drain loop.
//!
//! Grounded on the teacher's `kernel/mailbox.rs`: a dual queue (system, user),
//! a `scheduled`/`processing` pair of flags guarding the single-runner
//! invariant, and a `run_mailbox` drain entry point that exhausts system
//! messages before a bounded number of user messages, then reschedules if
//! work remains. The teacher's `Sentinel` (a `Drop` guard that detects a
//! panicking thread via `thread::panicking()`) is replaced with explicit
//! `catch_unwind` around each async dispatch, since actorium isolates
//! failures per message rather than per drain pass.

use crate::actor::cell::ActorCell;
use crate::actor::system_message::{ActorState, SystemMessage};
use crate::error::FailureReason;
use crate::kernel::queue::Queue;
use crate::message::{Envelope, Message};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{trace, warn};

/// Guards the single-runner invariant: at most one worker ever observes
/// `processing == true` (spec.md §3, §8 invariant 5).
struct Flags {
    state: Mutex<(bool, bool)>, // (scheduled, processing)
}

impl Flags {
    fn new() -> Self {
        Flags {
            state: Mutex::new((false, false)),
        }
    }

    /// Enqueue-time check: returns `true` if this call won the right to
    /// schedule a dispatch (spec.md §4.1 scheduling algorithm).
    fn try_schedule(&self) -> bool {
        let mut g = self.state.lock().unwrap();
        if g.0 || g.1 {
            return false;
        }
        g.0 = true;
        true
    }

    fn begin_processing(&self) {
        let mut g = self.state.lock().unwrap();
        g.1 = true;
        g.0 = false;
    }

    /// Clears `processing` and decides whether a reschedule is needed,
    /// evaluating `more_work` while still holding the lock so a concurrent
    /// `enqueue_*` can't land between the queue check and the flag clear
    /// (spec.md §3: queue non-empty with `processing == false` must always
    /// have a dispatch pending).
    fn end_processing(&self, more_work: impl FnOnce() -> bool) -> bool {
        let mut g = self.state.lock().unwrap();
        let more_work = more_work();
        g.1 = false;
        if more_work {
            g.0 = true;
        }
        more_work
    }
}

pub struct Mailbox<T: Message> {
    user_queue: Queue<Envelope<T>>,
    system_queue: Queue<Envelope<SystemMessage>>,
    flags: Flags,
    /// Messages drained per cycle before yielding the worker back to the
    /// dispatcher. Spec.md §4.1 names the default (one user message per
    /// drain) as the fairness floor; this is the ambient throughput knob
    /// (teacher's `mailbox.msg_process_limit` config key) layered on top —
    /// raising it never reorders messages, it only changes how many are
    /// drained before a reschedule.
    msg_process_limit: usize,
    suspended: AtomicBool,
}

impl<T: Message> Mailbox<T> {
    pub fn new(msg_process_limit: usize) -> Self {
        Mailbox {
            user_queue: Queue::new(),
            system_queue: Queue::new(),
            flags: Flags::new(),
            msg_process_limit: msg_process_limit.max(1),
            suspended: AtomicBool::new(false),
        }
    }

    pub fn has_user_messages(&self) -> bool {
        !self.user_queue.is_empty()
    }

    pub fn has_system_messages(&self) -> bool {
        !self.system_queue.is_empty()
    }

    /// Drops every queued user message without processing it. Used on
    /// restart (spec.md §4.3: "purge the user inbox; system queue is
    /// preserved").
    pub(crate) fn purge_user_queue(&self) {
        while self.user_queue.pop().is_some() {}
    }
}

impl<T: Message> ActorCell<T> {
    pub(crate) fn enqueue_user(&self, env: Envelope<T>) {
        if self.mailbox.suspended.load(Ordering::SeqCst) {
            self.dead_letter_user(env);
            return;
        }
        self.mailbox.user_queue.push(env);
        self.ensure_scheduled();
    }

    pub(crate) fn enqueue_system(&self, env: Envelope<SystemMessage>) {
        self.mailbox.system_queue.push(env);
        self.ensure_scheduled();
    }

    fn ensure_scheduled(&self) {
        if self.mailbox.flags.try_schedule() {
            let cell = self.arc_self();
            self.dispatcher.spawn_drain(Box::pin(run_mailbox(cell)));
        }
    }
}

/// The dispatcher's drain entry point. Runs one full drain cycle: every
/// pending system message, then up to `msg_process_limit` user messages
/// while the actor is `Running`, then reschedules if anything remains.
pub(crate) async fn run_mailbox<T: Message>(cell: Arc<ActorCell<T>>) {
    cell.mailbox.flags.begin_processing();

    while let Some(env) = cell.mailbox.system_queue.pop() {
        let name = env.message.name();
        trace!(actor = %cell.uri, system_message = name, "draining system message");
        let sender = env.sender.clone();
        let result = AssertUnwindSafe(cell.dispatch_system(env)).catch_unwind().await;
        if let Err(payload) = result {
            let reason = FailureReason::from_panic(&*payload);
            warn!(actor = %cell.uri, %reason, "panic handling system message {}", name);
            cell.fail(reason, sender);
        }
    }

    let mut processed = 0usize;
    while processed < cell.mailbox.msg_process_limit {
        if cell.state() != ActorState::Running {
            break;
        }
        let env = match cell.mailbox.user_queue.pop() {
            Some(env) => env,
            None => break,
        };
        let sender = env.sender.clone();
        let result = AssertUnwindSafe(cell.dispatch_user(env)).catch_unwind().await;
        if let Err(payload) = result {
            let reason = FailureReason::from_panic(&*payload);
            warn!(actor = %cell.uri, %reason, "actor panicked handling a message");
            cell.fail(reason, sender);
            break;
        }
        processed += 1;
        // A message may have produced system messages (e.g. self-stop); drain
        // those before pulling the next user message so a Stop is observed
        // promptly even mid-burst.
        while let Some(env) = cell.mailbox.system_queue.pop() {
            let sender = env.sender.clone();
            let result = AssertUnwindSafe(cell.dispatch_system(env)).catch_unwind().await;
            if let Err(payload) = result {
                let reason = FailureReason::from_panic(&*payload);
                cell.fail(reason, sender);
            }
        }
    }

    if cell.mailbox.flags.end_processing(|| {
        cell.mailbox.has_system_messages() || (cell.state() == ActorState::Running && cell.mailbox.has_user_messages())
    }) {
        let next = Arc::clone(&cell);
        cell.dispatcher.spawn_drain(Box::pin(run_mailbox(next)));
    }
}

impl<T: Message> ActorCell<T> {
    pub(crate) fn suspend_mailbox(&self) {
        self.mailbox.suspended.store(true, Ordering::SeqCst);
    }

    pub(crate) fn resume_mailbox(&self) {
        self.mailbox.suspended.store(false, Ordering::SeqCst);
    }
}
