//! The ask pattern: turns a one-way `tell` into an awaitable reply
//! (spec.md §4.4).
//!
//! Grounded on `riker-patterns::ask::ask` — a short-lived listener actor
//! that turns the first message it receives into a completed future — and
//! generalized onto `crate::future::Promise` so the two extra races spec.md
//! §4.4 asks for (timeout, target dies first) are real completions instead
//! of `unwrap()`s on a bare oneshot channel.

use crate::actor::actor::{Actor, Directive};
use crate::actor::actor_ref::{ActorRef, BasicActorRef};
use crate::actor::context::Context;
use crate::actor::props::Props;
use crate::error::AskError;
use crate::future::{Future as Fut, Promise, Terminal};
use crate::id::ActorId;
use crate::message::Message;
use crate::system::system::ActorSystem;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What a responder sends back to an ask listener. The listener's `Msg`
/// type names `R` explicitly, so a reply to the wrong kind of ask is simply
/// a dead-lettered send rather than a silent corruption (spec.md §9's note
/// on cross-actor sends needing a generic, validated response shape).
#[derive(Debug)]
pub enum Response<R> {
    Success(R),
    Failure(String),
    Cancelled,
}

/// Sends `value` back through `sender` if it is an ask listener expecting
/// `R`; no-ops (dead-letters) otherwise. Used by a `receive` that wants to
/// answer whoever `ask`ed it without caring whether it was actually asked.
pub fn reply_if_asked<R: Message>(sender: &Option<BasicActorRef>, value: R) {
    if let Some(s) = sender {
        s.try_tell(Response::Success(value), None);
    }
}

pub fn reply_failure_if_asked<R: Message>(sender: &Option<BasicActorRef>, err: impl Into<String>) {
    if let Some(s) = sender {
        s.try_tell(Response::<R>::Failure(err.into()), None);
    }
}

struct Listener<R: Message + Clone> {
    target: BasicActorRef,
    promise: Promise<R, AskError>,
    timer: Arc<Mutex<Option<crate::system::scheduler::TimerHandle>>>,
}

fn cancel_timer(timer: &Arc<Mutex<Option<crate::system::scheduler::TimerHandle>>>) {
    if let Some(handle) = timer.lock().unwrap().take() {
        handle.cancel();
    }
}

#[async_trait]
impl<R: Message + Clone> Actor for Listener<R> {
    type Msg = Response<R>;

    async fn pre_start(&mut self, ctx: &Context<Self::Msg>) {
        ctx.watch(&self.target);
    }

    async fn receive(&mut self, ctx: &Context<Self::Msg>, msg: Self::Msg) -> Directive<Self::Msg> {
        cancel_timer(&self.timer);
        match msg {
            Response::Success(v) => {
                self.promise.try_success(v);
            }
            Response::Failure(e) => {
                self.promise.try_failure(AskError::Failure(e));
            }
            Response::Cancelled => {
                self.promise.try_cancel();
            }
        }
        ctx.unwatch(&self.target);
        Directive::Stopped
    }

    async fn on_terminated(&mut self, ctx: &Context<Self::Msg>, who: &BasicActorRef) {
        if who.id() == self.target.id() {
            cancel_timer(&self.timer);
            self.promise.try_failure(AskError::TargetTerminated);
            ctx.stop_self();
        }
    }
}

/// Sends `msg` to `target` and returns a future resolving to the reply, a
/// timeout, or the target's premature termination — spec.md §4.4's ask
/// contract, exposed as a free function (as `riker-patterns::ask::ask` is)
/// so it can be called with only a system handle and a typed ref in hand.
pub fn ask<T, R>(
    system: &ActorSystem,
    target: &ActorRef<T>,
    msg: T,
    timeout: Duration,
) -> impl std::future::Future<Output = Result<R, AskError>> + Send + 'static
where
    T: Message,
    R: Message + Clone,
{
    let (promise, future) = Promise::new();
    let timer_slot = Arc::new(Mutex::new(None));

    let target_basic = target.basic();
    let listener_promise = promise.clone();
    let listener_timer = Arc::clone(&timer_slot);
    let props = Props::new(move || Listener::<R> {
        target: target_basic.clone(),
        promise: listener_promise.clone(),
        timer: Arc::clone(&listener_timer),
    });
    let name = format!("ask-{}", ActorId::next().0);
    let listener = system
        .actor_of::<Listener<R>>(props, &name)
        .expect("ask listener spawn should not fail with a generated unique name");

    target.tell_from(msg, Some(listener.basic()));

    let timeout_promise = promise.clone();
    let timeout_listener = listener.basic();
    let handle = system.scheduler().schedule_once(timeout, move || {
        if timeout_promise.try_failure(AskError::Timeout) {
            timeout_listener.stop();
        }
    });
    *timer_slot.lock().unwrap() = Some(handle);

    async move {
        match future.await_result(None).await {
            Some(Terminal::Success(v)) => Ok(v),
            Some(Terminal::Failure(e)) => Err(e),
            Some(Terminal::Cancelled) => Err(AskError::Cancelled),
            None => unreachable!("await_result(None) never times out on its own"),
        }
    }
}

impl ActorSystem {
    /// Convenience wrapper over the free `ask` function.
    pub fn ask<T, R>(
        &self,
        target: &ActorRef<T>,
        msg: T,
        timeout: Duration,
    ) -> impl std::future::Future<Output = Result<R, AskError>> + Send + 'static
    where
        T: Message,
        R: Message + Clone,
    {
        ask(self, target, msg, timeout)
    }
}

impl<T: Message> Context<T> {
    /// Convenience wrapper over the free `ask` function, using this actor's
    /// own system to reach some other actor `U`.
    pub fn ask<U, R>(&self, target: &ActorRef<U>, msg: U, timeout: Duration) -> impl Fut2<R>
    where
        U: Message,
        R: Message + Clone,
    {
        ask(&self.system(), target, msg, timeout)
    }
}

/// Named alias purely so `Context::ask`'s return type doesn't have to spell
/// out the `Send + 'static` bound twice.
pub trait Fut2<R>: std::future::Future<Output = Result<R, AskError>> + Send + 'static {}
impl<R, F> Fut2<R> for F where F: std::future::Future<Output = Result<R, AskError>> + Send + 'static {}
