//! The `Actor` trait and the `Directive` behavior-transition type.
//!
//! Grounded on the teacher's modern `src/actor/actor.rs`: an async-trait
//! with default no-op lifecycle hooks and a required `receive`. The
//! teacher's `recv` returned `()`; spec.md §4.2 requires behavior
//! transitions (`Same`/`Stopped`/`Deferred`/a replacement), so `receive`
//! here returns `Directive<Self::Msg>` instead — the functional-behavior
//! requirement bridged onto the teacher's stateful, object-oriented actor
//! shape (spec.md §9's REDESIGN FLAG on polymorphic behaviors).

use crate::actor::context::Context;
use crate::error::FailureReason;
use crate::message::Message;
use async_trait::async_trait;

/// What an actor's `receive` wants to happen to its own behavior after
/// handling one message.
pub enum Directive<T: Message> {
    /// Keep handling with the current behavior.
    Same,
    /// Stop self (equivalent to the context self-sending `Stop`).
    Stopped,
    /// Resolve a replacement behavior the next time a message arrives,
    /// invoking the factory with the context at that point. Factories may
    /// spawn children.
    Deferred(Box<dyn FnOnce(&Context<T>) -> Box<dyn Actor<Msg = T>> + Send>),
    /// Replace the behavior immediately with a concrete new one.
    Become(Box<dyn Actor<Msg = T>>),
}

/// An actor: private state plus a message handler, hosted by an
/// `ActorCell<T>` and addressed through an `ActorRef<T>`.
#[async_trait]
pub trait Actor: Send + 'static {
    type Msg: Message;

    async fn pre_start(&mut self, _ctx: &Context<Self::Msg>) {}
    async fn post_start(&mut self, _ctx: &Context<Self::Msg>) {}
    async fn pre_stop(&mut self, _ctx: &Context<Self::Msg>) {}
    async fn post_stop(&mut self, _ctx: &Context<Self::Msg>) {}
    async fn pre_restart(&mut self, _ctx: &Context<Self::Msg>, _cause: Option<FailureReason>) {}
    async fn post_restart(&mut self, _ctx: &Context<Self::Msg>) {}
    async fn on_terminated(&mut self, _ctx: &Context<Self::Msg>, _who: &crate::actor::actor_ref::BasicActorRef) {}
    async fn on_failed(
        &mut self,
        _ctx: &Context<Self::Msg>,
        _who: &crate::actor::actor_ref::BasicActorRef,
        _cause: &FailureReason,
    ) {
    }

    async fn receive(&mut self, ctx: &Context<Self::Msg>, msg: Self::Msg) -> Directive<Self::Msg>;
}

pub type BoxActor<T> = Box<dyn Actor<Msg = T>>;
