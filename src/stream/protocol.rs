//! The backpressured demand protocol every stream stage speaks (spec.md
//! §4.5 / §3's "stream messages (typed)").
//!
//! A stage's inbox mixes two independent vocabularies: signals coming
//! *down* from its upstream (`OnSubscribe`/`OnNext`/`OnComplete`/`OnError`)
//! and signals coming *up* from its downstream (`Subscribe`/`Request`/
//! `Cancel`/`Produce`). Because a `Flow<In, Out>` speaks both at once with
//! two different element types, each stage's own `Msg` enum wraps these two
//! generic pieces rather than reusing a single one across the whole
//! pipeline — see `flow.rs`'s `FlowSignal`.
//!
//! The part that doesn't fall out naturally in a statically-typed actor
//! system is "hand a caller a reference to whatever kind of thing is
//! upstream/downstream of it, without that caller needing to name the
//! neighboring stage's concrete `Msg` type". That's solved the same way
//! `Box<dyn Read>` solves it for I/O: a small adapter trait
//! (`StageSubscriber`/`StagePublisher`) wraps a concrete `ActorRef<Msg>`
//! plus the closures needed to build that stage's own message variants.

use crate::actor::actor_ref::ActorRef;
use crate::error::StreamError;
use crate::id::ActorId;
use crate::message::Message;
use std::sync::Arc;

/// Signals a stage receives from whatever is upstream of it, carrying
/// elements of type `In`.
pub enum UpstreamSignal<In: Message> {
    OnSubscribe(Subscription),
    OnNext(In),
    OnComplete,
    OnError(StreamError),
}

impl<In: Message> std::fmt::Debug for UpstreamSignal<In> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UpstreamSignal::OnSubscribe(_) => write!(f, "OnSubscribe(..)"),
            UpstreamSignal::OnNext(_) => write!(f, "OnNext(..)"),
            UpstreamSignal::OnComplete => write!(f, "OnComplete"),
            UpstreamSignal::OnError(e) => write!(f, "OnError({e:?})"),
        }
    }
}

/// Signals a stage receives from whatever is downstream of it, carrying
/// elements of type `Out` only in `Produce` (`ManualSource`'s external
/// feed — spec.md §4.5).
pub enum DownstreamSignal<Out: Message> {
    Subscribe(ActorId, Box<dyn StageSubscriber<Out>>),
    Request(u64),
    SubscriptionRequest(u64, ActorId),
    Cancel,
    SubscriptionCancel(ActorId),
    Produce(Out),
    /// Marks a `ManualSource`'s external feed exhausted; ignored by every
    /// other stage (spec.md §4.5).
    Close,
}

impl<Out: Message> std::fmt::Debug for DownstreamSignal<Out> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DownstreamSignal::Subscribe(id, _) => write!(f, "Subscribe({id:?})"),
            DownstreamSignal::Request(n) => write!(f, "Request({n})"),
            DownstreamSignal::SubscriptionRequest(n, id) => write!(f, "SubscriptionRequest({n}, {id:?})"),
            DownstreamSignal::Cancel => write!(f, "Cancel"),
            DownstreamSignal::SubscriptionCancel(id) => write!(f, "SubscriptionCancel({id:?})"),
            DownstreamSignal::Produce(_) => write!(f, "Produce(..)"),
            DownstreamSignal::Close => write!(f, "Close"),
        }
    }
}

/// What a publisher calls on whoever subscribed to it.
pub trait StageSubscriber<T: Message>: Send + Sync {
    fn on_subscribe(&self, subscription: Subscription);
    fn on_next(&self, elem: T);
    fn on_complete(&self);
    fn on_error(&self, err: StreamError);
}

/// What a subscriber calls to reach whatever publisher it subscribed to.
pub trait StagePublisher<T: Message>: Send + Sync {
    fn subscribe(&self, subscriber_id: ActorId, subscriber: Box<dyn StageSubscriber<T>>);
}

trait SubscriptionOps: Send + Sync {
    fn request(&self, n: u64);
    fn cancel(&self);
}

/// A downstream's handle back to its upstream: `request`/`cancel` without
/// either side needing to name the other's concrete `Msg` type.
#[derive(Clone)]
pub struct Subscription {
    ops: Arc<dyn SubscriptionOps>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Subscription(..)")
    }
}

impl Subscription {
    /// Requests `n` more elements. `n == 0` is ignored (spec.md §4.5).
    pub fn request(&self, n: u64) {
        if n > 0 {
            self.ops.request(n);
        }
    }

    pub fn cancel(&self) {
        self.ops.cancel();
    }
}

struct ActorSubscriptionOps<Msg: Message> {
    actor: ActorRef<Msg>,
    make_request: Box<dyn Fn(u64) -> Msg + Send + Sync>,
    make_cancel: Box<dyn Fn() -> Msg + Send + Sync>,
}

impl<Msg: Message> SubscriptionOps for ActorSubscriptionOps<Msg> {
    fn request(&self, n: u64) {
        self.actor.tell((self.make_request)(n));
    }

    fn cancel(&self) {
        self.actor.tell((self.make_cancel)());
    }
}

/// Builds a `Subscription` that forwards `request`/`cancel` onto `actor` by
/// running them through `make_request`/`make_cancel` to produce that
/// actor's own concrete message type.
pub fn subscription<Msg, FReq, FCancel>(actor: ActorRef<Msg>, make_request: FReq, make_cancel: FCancel) -> Subscription
where
    Msg: Message,
    FReq: Fn(u64) -> Msg + Send + Sync + 'static,
    FCancel: Fn() -> Msg + Send + Sync + 'static,
{
    Subscription {
        ops: Arc::new(ActorSubscriptionOps {
            actor,
            make_request: Box::new(make_request),
            make_cancel: Box::new(make_cancel),
        }),
    }
}

struct ActorSubscriber<Msg: Message, T: Message> {
    actor: ActorRef<Msg>,
    make_on_subscribe: Box<dyn Fn(Subscription) -> Msg + Send + Sync>,
    make_on_next: Box<dyn Fn(T) -> Msg + Send + Sync>,
    make_on_complete: Box<dyn Fn() -> Msg + Send + Sync>,
    make_on_error: Box<dyn Fn(StreamError) -> Msg + Send + Sync>,
}

impl<Msg: Message, T: Message> StageSubscriber<T> for ActorSubscriber<Msg, T> {
    fn on_subscribe(&self, subscription: Subscription) {
        self.actor.tell((self.make_on_subscribe)(subscription));
    }

    fn on_next(&self, elem: T) {
        self.actor.tell((self.make_on_next)(elem));
    }

    fn on_complete(&self) {
        self.actor.tell((self.make_on_complete)());
    }

    fn on_error(&self, err: StreamError) {
        self.actor.tell((self.make_on_error)(err));
    }
}

/// Builds a `Box<dyn StageSubscriber<T>>` that, when called, sends `actor`
/// its own concrete `Msg` built via the four `make_*` closures.
#[allow(clippy::too_many_arguments)]
pub fn subscriber<Msg, T, FSub, FNext, FComplete, FError>(
    actor: ActorRef<Msg>,
    make_on_subscribe: FSub,
    make_on_next: FNext,
    make_on_complete: FComplete,
    make_on_error: FError,
) -> Box<dyn StageSubscriber<T>>
where
    Msg: Message,
    T: Message,
    FSub: Fn(Subscription) -> Msg + Send + Sync + 'static,
    FNext: Fn(T) -> Msg + Send + Sync + 'static,
    FComplete: Fn() -> Msg + Send + Sync + 'static,
    FError: Fn(StreamError) -> Msg + Send + Sync + 'static,
{
    Box::new(ActorSubscriber {
        actor,
        make_on_subscribe: Box::new(make_on_subscribe),
        make_on_next: Box::new(make_on_next),
        make_on_complete: Box::new(make_on_complete),
        make_on_error: Box::new(make_on_error),
    })
}

struct ActorPublisher<Msg: Message, T: Message> {
    actor: ActorRef<Msg>,
    make_subscribe: Box<dyn Fn(ActorId, Box<dyn StageSubscriber<T>>) -> Msg + Send + Sync>,
}

impl<Msg: Message, T: Message> StagePublisher<T> for ActorPublisher<Msg, T> {
    fn subscribe(&self, subscriber_id: ActorId, subscriber: Box<dyn StageSubscriber<T>>) {
        self.actor.tell((self.make_subscribe)(subscriber_id, subscriber));
    }
}

/// Builds an `Arc<dyn StagePublisher<T>>` wrapping `actor`. `Arc` rather
/// than `Box` because a downstream stage's `Props` factory captures it and
/// may run more than once (a restart re-produces the actor's behavior —
/// spec.md §4.3), so it must be cheaply re-clonable.
pub fn publisher<Msg, T, F>(actor: ActorRef<Msg>, make_subscribe: F) -> Arc<dyn StagePublisher<T>>
where
    Msg: Message,
    T: Message,
    F: Fn(ActorId, Box<dyn StageSubscriber<T>>) -> Msg + Send + Sync + 'static,
{
    Arc::new(ActorPublisher {
        actor,
        make_subscribe: Box::new(make_subscribe),
    })
}
