//! Stream sinks: stages with an upstream but no downstream (spec.md §4.5).
//! Mirrors `flow.rs`'s split of bookkeeping (`SinkActor`) from per-element
//! strategy (`SinkLogic`), minus everything downstream-facing.

use crate::actor::actor::{Actor, Directive};
use crate::actor::actor_ref::BasicActorRef;
use crate::actor::context::Context;
use crate::actor::props::Props;
use crate::error::StreamError;
use crate::future::{Future as Fut, Promise};
use crate::message::Message;
use crate::stream::protocol::{self, StagePublisher, Subscription, UpstreamSignal};
use crate::system::system::ActorSystem;
use std::sync::Arc;
use tokio::sync::mpsc;

/// What a sink's logic uses to talk to its upstream.
pub struct SinkControl<'a> {
    upstream: &'a Option<Subscription>,
    terminated: &'a mut bool,
}

impl<'a> SinkControl<'a> {
    pub fn request_upstream(&mut self, n: u64) {
        if n > 0 {
            if let Some(u) = self.upstream {
                u.request(n);
            }
        }
    }

    pub fn cancel_upstream(&mut self) {
        *self.terminated = true;
        if let Some(u) = self.upstream {
            u.cancel();
        }
    }
}

pub trait SinkLogic<In: Message>: Send + 'static {
    fn on_next(&mut self, elem: In, ctl: &mut SinkControl<'_>);
    fn on_complete(&mut self, _ctl: &mut SinkControl<'_>) {}
    fn on_error(&mut self, _err: StreamError, _ctl: &mut SinkControl<'_>) {}
}

pub struct SinkActor<In: Message, L: SinkLogic<In>> {
    upstream_publisher: Arc<dyn StagePublisher<In>>,
    upstream: Option<Subscription>,
    initial_demand: u64,
    terminated: bool,
    logic: L,
}

#[async_trait::async_trait]
impl<In: Message, L: SinkLogic<In>> Actor for SinkActor<In, L> {
    type Msg = UpstreamSignal<In>;

    async fn pre_start(&mut self, ctx: &Context<Self::Msg>) {
        let myself = ctx.myself();
        let sub = protocol::subscriber(
            myself,
            UpstreamSignal::OnSubscribe,
            UpstreamSignal::OnNext,
            || UpstreamSignal::OnComplete,
            UpstreamSignal::OnError,
        );
        let upstream_publisher = Arc::clone(&self.upstream_publisher);
        upstream_publisher.subscribe(ctx.myself().id(), sub);
    }

    async fn receive(&mut self, _ctx: &Context<Self::Msg>, msg: Self::Msg) -> Directive<Self::Msg> {
        match msg {
            UpstreamSignal::OnSubscribe(sub) => {
                if self.initial_demand > 0 {
                    sub.request(self.initial_demand);
                }
                self.upstream = Some(sub);
            }
            UpstreamSignal::OnNext(elem) => {
                if !self.terminated {
                    let mut ctl = self.control();
                    self.logic.on_next(elem, &mut ctl);
                }
            }
            UpstreamSignal::OnComplete => {
                if !self.terminated {
                    self.terminated = true;
                    let mut ctl = self.control();
                    self.logic.on_complete(&mut ctl);
                }
            }
            UpstreamSignal::OnError(err) => {
                if !self.terminated {
                    self.terminated = true;
                    let mut ctl = self.control();
                    self.logic.on_error(err, &mut ctl);
                }
            }
        }
        Directive::Same
    }
}

impl<In: Message, L: SinkLogic<In>> SinkActor<In, L> {
    fn control(&mut self) -> SinkControl<'_> {
        SinkControl {
            upstream: &self.upstream,
            terminated: &mut self.terminated,
        }
    }
}

fn spawn_sink<In, L, F>(
    system: &ActorSystem,
    name: &str,
    upstream: Arc<dyn StagePublisher<In>>,
    initial_demand: u64,
    make_logic: F,
) -> BasicActorRef
where
    In: Message,
    L: SinkLogic<In>,
    F: Fn() -> L + Send + Sync + 'static,
{
    let props = Props::new(move || SinkActor {
        upstream_publisher: Arc::clone(&upstream),
        upstream: None,
        initial_demand,
        terminated: false,
        logic: make_logic(),
    });
    system
        .actor_of::<SinkActor<In, L>>(props, name)
        .expect("sink actor spawn should not fail with a fresh name")
        .basic()
}

/// Forwards every element to an unbounded mpsc channel, requesting a
/// replacement element upstream for each one delivered so the channel never
/// permanently caps the stream's throughput below `initial_demand`.
pub struct CollectLogic<T: Message> {
    sender: mpsc::UnboundedSender<T>,
}

impl<T: Message> SinkLogic<T> for CollectLogic<T> {
    fn on_next(&mut self, elem: T, ctl: &mut SinkControl<'_>) {
        if self.sender.send(elem).is_err() {
            ctl.cancel_upstream();
            return;
        }
        ctl.request_upstream(1);
    }
}

/// Spawns a sink that streams elements out through the returned receiver
/// (spec.md §4.5's `Sink::collect`).
pub fn collect<T: Message>(
    system: &ActorSystem,
    name: &str,
    upstream: Arc<dyn StagePublisher<T>>,
    initial_demand: u64,
) -> (BasicActorRef, mpsc::UnboundedReceiver<T>) {
    let (sender, receiver) = mpsc::unbounded_channel();
    let actor = spawn_sink(system, name, upstream, initial_demand, move || CollectLogic {
        sender: sender.clone(),
    });
    (actor, receiver)
}

/// Folds every element into an accumulator, completing a future with the
/// final value once the stream completes (spec.md §4.5's `Sink::fold`).
pub struct FoldLogic<T: Message, Acc: Clone + Send + 'static, F: Fn(Acc, T) -> Acc + Send + 'static> {
    acc: Option<Acc>,
    fold: Arc<F>,
    promise: Promise<Acc, StreamError>,
    _t: std::marker::PhantomData<T>,
}

impl<T, Acc, F> SinkLogic<T> for FoldLogic<T, Acc, F>
where
    T: Message,
    Acc: Clone + Send + 'static,
    F: Fn(Acc, T) -> Acc + Send + 'static,
{
    fn on_next(&mut self, elem: T, ctl: &mut SinkControl<'_>) {
        if let Some(acc) = self.acc.take() {
            self.acc = Some((self.fold)(acc, elem));
        }
        ctl.request_upstream(1);
    }

    fn on_complete(&mut self, _ctl: &mut SinkControl<'_>) {
        if let Some(acc) = self.acc.take() {
            self.promise.try_success(acc);
        }
    }

    fn on_error(&mut self, err: StreamError, _ctl: &mut SinkControl<'_>) {
        self.promise.try_failure(err);
    }
}

pub fn fold<T, Acc, F>(
    system: &ActorSystem,
    name: &str,
    upstream: Arc<dyn StagePublisher<T>>,
    initial_demand: u64,
    init: Acc,
    fold_fn: F,
) -> (BasicActorRef, Fut<Acc, StreamError>)
where
    T: Message,
    Acc: Clone + Send + 'static,
    F: Fn(Acc, T) -> Acc + Send + Sync + 'static,
{
    let (promise, future) = Promise::new();
    let fold_fn = Arc::new(fold_fn);
    let actor = spawn_sink(system, name, upstream, initial_demand, move || FoldLogic {
        acc: Some(init.clone()),
        fold: Arc::clone(&fold_fn),
        promise: promise.clone(),
        _t: std::marker::PhantomData,
    });
    (actor, future)
}
