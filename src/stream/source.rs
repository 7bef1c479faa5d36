//! Stream sources: stages with a downstream but no upstream (spec.md §4.5).
//!
//! Every source shares one bookkeeping skeleton — a single optional
//! subscriber, outstanding demand, a terminated flag — and differs only in
//! *what* it does when asked to pump elements out. That skeleton lives in
//! `SourceActor<Out, L>`; each concrete source (`ManualSource`, `ArraySource`,
//! `SingleSource`, `TickSource`) supplies an `L: SourceLogic<Out>`. This
//! mirrors how `kernel/mailbox.rs` separates the mailbox's own machinery
//! from the user `Actor` it drives.

use crate::actor::actor::{Actor, Directive};
use crate::actor::actor_ref::ActorRef;
use crate::actor::context::Context;
use crate::actor::props::Props;
use crate::error::StreamError;
use crate::message::Message;
use crate::stream::protocol::{self, DownstreamSignal, StagePublisher, StageSubscriber};
use crate::system::system::ActorSystem;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

struct SourceState<Out: Message> {
    subscriber: Option<Box<dyn StageSubscriber<Out>>>,
    demand: u64,
    terminated: bool,
}

impl<Out: Message> SourceState<Out> {
    fn new() -> Self {
        SourceState {
            subscriber: None,
            demand: 0,
            terminated: false,
        }
    }
}

/// What a source's logic uses to talk to its (at most one) subscriber.
pub struct SourceControl<'a, Out: Message> {
    state: &'a mut SourceState<Out>,
}

impl<'a, Out: Message> SourceControl<'a, Out> {
    pub fn demand(&self) -> u64 {
        self.state.demand
    }

    /// Sends `elem` downstream if there's demand for it. Returns whether it
    /// was actually sent.
    pub fn emit(&mut self, elem: Out) -> bool {
        if self.state.terminated || self.state.demand == 0 {
            return false;
        }
        if let Some(sub) = &self.state.subscriber {
            sub.on_next(elem);
            self.state.demand -= 1;
            true
        } else {
            false
        }
    }

    /// Idempotent: completes the subscriber at most once.
    pub fn complete(&mut self) {
        if self.state.terminated {
            return;
        }
        self.state.terminated = true;
        if let Some(sub) = self.state.subscriber.take() {
            sub.on_complete();
        }
    }

    pub fn error(&mut self, err: StreamError) {
        if self.state.terminated {
            return;
        }
        self.state.terminated = true;
        if let Some(sub) = self.state.subscriber.take() {
            sub.on_error(err);
        }
    }
}

/// A source's element-production strategy. `pump` is called after every
/// event that might let more elements flow (a subscribe, a `Request`, a
/// `Produce`, a `Close`) and should emit everything current demand allows.
pub trait SourceLogic<Out: Message>: Send + 'static {
    fn on_start(&mut self, _ctx: &Context<DownstreamSignal<Out>>) {}
    fn on_produce(&mut self, _elem: Out) {}
    fn on_close(&mut self) {}
    fn pump(&mut self, ctl: &mut SourceControl<'_, Out>);
}

/// Generic source actor: all bookkeeping here, production strategy in `L`.
pub struct SourceActor<Out: Message, L: SourceLogic<Out>> {
    state: SourceState<Out>,
    logic: L,
}

#[async_trait]
impl<Out: Message, L: SourceLogic<Out>> Actor for SourceActor<Out, L> {
    type Msg = DownstreamSignal<Out>;

    async fn pre_start(&mut self, ctx: &Context<Self::Msg>) {
        self.logic.on_start(ctx);
    }

    async fn receive(&mut self, ctx: &Context<Self::Msg>, msg: Self::Msg) -> Directive<Self::Msg> {
        match msg {
            DownstreamSignal::Subscribe(_id, subscriber) => {
                if self.state.subscriber.is_some() {
                    subscriber.on_error(StreamError::AlreadyHasSubscriber);
                } else {
                    let myself = ctx.myself();
                    let sub = protocol::subscription(myself, DownstreamSignal::Request, || DownstreamSignal::Cancel);
                    subscriber.on_subscribe(sub);
                    self.state.subscriber = Some(subscriber);
                    self.pump();
                }
            }
            DownstreamSignal::Request(n) => {
                self.state.demand = self.state.demand.saturating_add(n);
                self.pump();
            }
            DownstreamSignal::Cancel => {
                self.state.terminated = true;
                self.state.subscriber = None;
            }
            DownstreamSignal::Produce(elem) => {
                self.logic.on_produce(elem);
                self.pump();
            }
            DownstreamSignal::Close => {
                self.logic.on_close();
                self.pump();
            }
            DownstreamSignal::SubscriptionRequest(..) | DownstreamSignal::SubscriptionCancel(..) => {}
        }
        Directive::Same
    }
}

impl<Out: Message, L: SourceLogic<Out>> SourceActor<Out, L> {
    fn pump(&mut self) {
        let mut ctl = SourceControl { state: &mut self.state };
        self.logic.pump(&mut ctl);
    }
}

/// Emits whatever `Produce` sends it, in order, until `close()` drains and
/// then completes the stream. Spec.md §4.5's externally-fed source.
struct ManualSourceLogic<Out: Message> {
    buffer: VecDeque<Out>,
    closed: bool,
}

impl<Out: Message> SourceLogic<Out> for ManualSourceLogic<Out> {
    fn on_produce(&mut self, elem: Out) {
        self.buffer.push_back(elem);
    }

    fn on_close(&mut self) {
        self.closed = true;
    }

    fn pump(&mut self, ctl: &mut SourceControl<'_, Out>) {
        while ctl.demand() > 0 {
            match self.buffer.pop_front() {
                Some(elem) => {
                    ctl.emit(elem);
                }
                None => {
                    if self.closed {
                        ctl.complete();
                    }
                    break;
                }
            }
        }
    }
}

/// A handle to feed a `ManualSource` from outside the stream graph.
pub struct ManualSourceHandle<Out: Message> {
    actor: ActorRef<DownstreamSignal<Out>>,
}

impl<Out: Message> ManualSourceHandle<Out> {
    pub fn produce(&self, elem: Out) {
        self.actor.tell(DownstreamSignal::Produce(elem));
    }

    /// Marks the feed exhausted; the source completes once its buffer drains.
    pub fn close(&self) {
        self.actor.tell(DownstreamSignal::Close);
    }
}

impl<Out: Message> Clone for ManualSourceHandle<Out> {
    fn clone(&self) -> Self {
        ManualSourceHandle { actor: self.actor.clone() }
    }
}

/// Emits a fixed, pre-built sequence of elements, then completes.
struct ArraySourceLogic<Out: Message> {
    items: VecDeque<Out>,
}

impl<Out: Message> SourceLogic<Out> for ArraySourceLogic<Out> {
    fn pump(&mut self, ctl: &mut SourceControl<'_, Out>) {
        while ctl.demand() > 0 {
            match self.items.pop_front() {
                Some(elem) => {
                    ctl.emit(elem);
                }
                None => {
                    ctl.complete();
                    break;
                }
            }
        }
    }
}

/// Emits exactly one element, then completes.
struct SingleSourceLogic<Out: Message> {
    value: Option<Out>,
}

impl<Out: Message> SourceLogic<Out> for SingleSourceLogic<Out> {
    fn pump(&mut self, ctl: &mut SourceControl<'_, Out>) {
        if ctl.demand() > 0 {
            if let Some(v) = self.value.take() {
                ctl.emit(v);
                ctl.complete();
            }
        }
    }
}

/// Re-emits a cloned element on a fixed interval, for as long as there is
/// outstanding demand. Self-schedules via `Produce` rather than threading
/// the scheduler through `SourceLogic`, since only this source needs it.
struct TickSourceLogic<Out: Message + Clone> {
    elem: Out,
    interval: Duration,
    handle: Option<(ActorRef<DownstreamSignal<Out>>, ActorSystem)>,
    scheduled: bool,
}

impl<Out: Message + Clone> SourceLogic<Out> for TickSourceLogic<Out> {
    fn on_start(&mut self, ctx: &Context<DownstreamSignal<Out>>) {
        self.handle = Some((ctx.myself(), ctx.system()));
    }

    fn on_produce(&mut self, _elem: Out) {
        self.scheduled = false;
        self.schedule_next();
    }

    fn pump(&mut self, ctl: &mut SourceControl<'_, Out>) {
        if ctl.demand() > 0 {
            self.schedule_next();
        }
    }
}

impl<Out: Message + Clone> TickSourceLogic<Out> {
    fn schedule_next(&mut self) {
        if self.scheduled {
            return;
        }
        let Some((target, system)) = &self.handle else { return };
        self.scheduled = true;
        let target = target.clone();
        let elem = self.elem.clone();
        system.scheduler().schedule_message(self.interval, target, DownstreamSignal::Produce(elem));
    }
}

/// Builder for stream sources, spawning the underlying actor immediately and
/// wrapping it in the `StagePublisher<Out>` adapter that `.via()`/`.to()`
/// compose with (spec.md §4.5's `source.via(flow).to(sink)` builder).
pub struct Source<Out: Message> {
    pub(crate) publisher: Arc<dyn StagePublisher<Out>>,
    pub(crate) actor_ref: crate::actor::actor_ref::BasicActorRef,
}

impl<Out: Message> Source<Out> {
    pub fn array(system: &ActorSystem, name: &str, items: Vec<Out>) -> Self {
        let items: VecDeque<Out> = items.into_iter().collect();
        let items = Arc::new(Mutex::new(Some(items)));
        let props = Props::new(move || SourceActor {
            state: SourceState::new(),
            logic: ArraySourceLogic {
                items: items.lock().unwrap().take().unwrap_or_default(),
            },
        });
        Self::from_actor::<ArraySourceLogic<Out>>(system, name, props)
    }

    pub fn single(system: &ActorSystem, name: &str, value: Out) -> Self
    where
        Out: Clone,
    {
        let value = Arc::new(Mutex::new(Some(value)));
        let props = Props::new(move || SourceActor {
            state: SourceState::new(),
            logic: SingleSourceLogic {
                value: value.lock().unwrap().clone(),
            },
        });
        Self::from_actor::<SingleSourceLogic<Out>>(system, name, props)
    }

    pub fn manual(system: &ActorSystem, name: &str) -> (Self, ManualSourceHandle<Out>) {
        let props = Props::new(|| SourceActor {
            state: SourceState::new(),
            logic: ManualSourceLogic {
                buffer: VecDeque::new(),
                closed: false,
            },
        });
        let actor = system
            .actor_of::<SourceActor<Out, ManualSourceLogic<Out>>>(props, name)
            .expect("source actor spawn should not fail with a fresh name");
        let publisher = protocol::publisher(actor.clone(), DownstreamSignal::Subscribe);
        let actor_ref = actor.basic();
        (Source { publisher, actor_ref }, ManualSourceHandle { actor })
    }

    pub fn tick(system: &ActorSystem, name: &str, interval: Duration, elem: Out) -> Self
    where
        Out: Clone,
    {
        let props = Props::new(move || SourceActor {
            state: SourceState::new(),
            logic: TickSourceLogic {
                elem: elem.clone(),
                interval,
                handle: None,
                scheduled: false,
            },
        });
        Self::from_actor::<TickSourceLogic<Out>>(system, name, props)
    }

    fn from_actor<L: SourceLogic<Out>>(system: &ActorSystem, name: &str, props: Props<DownstreamSignal<Out>>) -> Self {
        let actor = system
            .actor_of::<SourceActor<Out, L>>(props, name)
            .expect("source actor spawn should not fail with a fresh name");
        let actor_ref = actor.basic();
        let publisher = protocol::publisher(actor, DownstreamSignal::Subscribe);
        Source { publisher, actor_ref }
    }

    pub fn publisher(&self) -> Arc<dyn StagePublisher<Out>> {
        Arc::clone(&self.publisher)
    }

    /// The underlying source actor, type-erased — what `build_pipeline`
    /// hands back as `MaterializedPipeline::source_ref`.
    pub fn actor_ref(&self) -> crate::actor::actor_ref::BasicActorRef {
        self.actor_ref.clone()
    }

    /// Chains one flow stage onto this source (spec.md §4.5's
    /// `source.via(flow).to(sink)` builder). `flow` is one of `flow::map`,
    /// `flow::filter`, etc. partially applied over `(system, name)`.
    pub fn via<F>(self, flow: F) -> Stage<Out>
    where
        F: FnOnce(Arc<dyn StagePublisher<Out>>) -> Arc<dyn StagePublisher<Out>>,
    {
        Stage {
            publisher: flow(self.publisher),
        }
    }

    /// Terminates the chain at a sink, handing the accumulated publisher to
    /// `sink` (one of `sink::collect`, `sink::fold`, etc. partially applied).
    pub fn to<F, R>(self, sink: F) -> R
    where
        F: FnOnce(Arc<dyn StagePublisher<Out>>) -> R,
    {
        sink(self.publisher)
    }
}

/// An in-progress `source.via(...).via(...)` chain, not yet terminated by
/// `.to(...)`. Carries only the accumulated publisher — flows compose by
/// wrapping, so there's nothing else to thread through.
pub struct Stage<Out: Message> {
    publisher: Arc<dyn StagePublisher<Out>>,
}

impl<Out: Message> Stage<Out> {
    pub fn via<F>(self, flow: F) -> Stage<Out>
    where
        F: FnOnce(Arc<dyn StagePublisher<Out>>) -> Arc<dyn StagePublisher<Out>>,
    {
        Stage {
            publisher: flow(self.publisher),
        }
    }

    pub fn to<F, R>(self, sink: F) -> R
    where
        F: FnOnce(Arc<dyn StagePublisher<Out>>) -> R,
    {
        sink(self.publisher)
    }
}
