//! Stream flows: stages with both an upstream and a downstream (spec.md
//! §4.5). A `Flow<In, Out>` speaks `UpstreamSignal<In>` to whatever feeds it
//! and `DownstreamSignal<Out>` to whatever it feeds — two different element
//! types in one actor, so its `Msg` wraps both (`FlowSignal`). Bookkeeping
//! (single upstream subscription, single downstream subscriber, demand in
//! both directions) lives in `FlowActor`; what happens to each element is an
//! `L: FlowLogic<In, Out>`, mirroring `source.rs`'s `SourceLogic` split.

use crate::actor::actor::{Actor, Directive};
use crate::actor::actor_ref::ActorRef;
use crate::actor::context::Context;
use crate::actor::props::Props;
use crate::error::StreamError;
use crate::future::Promise;
use crate::message::Message;
use crate::stream::protocol::{self, DownstreamSignal, StagePublisher, StageSubscriber, Subscription, UpstreamSignal};
use crate::system::system::ActorSystem;
use std::sync::Arc;

#[derive(Debug)]
pub enum FlowSignal<In: Message, Out: Message> {
    Up(UpstreamSignal<In>),
    Down(DownstreamSignal<Out>),
}

/// What a flow's logic uses to talk to its neighbors.
pub struct FlowControl<'a, Out: Message> {
    downstream: &'a Option<Box<dyn StageSubscriber<Out>>>,
    downstream_demand: &'a mut u64,
    upstream: &'a Option<Subscription>,
    terminated: &'a mut bool,
}

impl<'a, Out: Message> FlowControl<'a, Out> {
    pub fn downstream_demand(&self) -> u64 {
        *self.downstream_demand
    }

    /// Sends `elem` downstream if there's demand; silently dropped otherwise
    /// (a `FlowLogic` that doesn't want to drop elements must check
    /// `downstream_demand()` itself before calling this, or request more
    /// upstream and buffer — none of the concrete logics below need to).
    pub fn emit(&mut self, elem: Out) {
        if *self.terminated || *self.downstream_demand == 0 {
            return;
        }
        if let Some(d) = self.downstream {
            d.on_next(elem);
            *self.downstream_demand -= 1;
        }
    }

    pub fn request_upstream(&mut self, n: u64) {
        if n > 0 {
            if let Some(u) = self.upstream {
                u.request(n);
            }
        }
    }

    /// Idempotent: completes the downstream subscriber at most once.
    pub fn complete_downstream(&mut self) {
        if *self.terminated {
            return;
        }
        *self.terminated = true;
        if let Some(d) = self.downstream {
            d.on_complete();
        }
    }

    pub fn error_downstream(&mut self, err: StreamError) {
        if *self.terminated {
            return;
        }
        *self.terminated = true;
        if let Some(d) = self.downstream {
            d.on_error(err);
        }
    }

    pub fn cancel_upstream(&mut self) {
        if let Some(u) = self.upstream {
            u.cancel();
        }
    }
}

/// A flow's per-element strategy. Defaults pass completion/errors straight
/// through, which is what most flows want.
pub trait FlowLogic<In: Message, Out: Message>: Send + 'static {
    fn on_next(&mut self, elem: In, ctl: &mut FlowControl<'_, Out>);

    fn on_complete(&mut self, ctl: &mut FlowControl<'_, Out>) {
        ctl.complete_downstream();
    }

    fn on_error(&mut self, err: StreamError, ctl: &mut FlowControl<'_, Out>) {
        ctl.error_downstream(err);
    }

    /// Called when the downstream cancels. Most logics have nothing extra to
    /// do (`FlowActor` already cancels the upstream subscription itself).
    fn on_downstream_cancel(&mut self, _ctl: &mut FlowControl<'_, Out>) {}
}

pub struct FlowActor<In: Message, Out: Message, L: FlowLogic<In, Out>> {
    upstream_publisher: Arc<dyn StagePublisher<In>>,
    upstream: Option<Subscription>,
    downstream: Option<Box<dyn StageSubscriber<Out>>>,
    downstream_demand: u64,
    pending_upstream_request: u64,
    terminated: bool,
    logic: L,
}

#[async_trait::async_trait]
impl<In: Message, Out: Message, L: FlowLogic<In, Out>> Actor for FlowActor<In, Out, L> {
    type Msg = FlowSignal<In, Out>;

    async fn pre_start(&mut self, ctx: &Context<Self::Msg>) {
        let myself = ctx.myself();
        let sub = protocol::subscriber(
            myself,
            |s| FlowSignal::Up(UpstreamSignal::OnSubscribe(s)),
            |e| FlowSignal::Up(UpstreamSignal::OnNext(e)),
            || FlowSignal::Up(UpstreamSignal::OnComplete),
            |e| FlowSignal::Up(UpstreamSignal::OnError(e)),
        );
        let upstream_publisher = Arc::clone(&self.upstream_publisher);
        upstream_publisher.subscribe(ctx.myself().id(), sub);
    }

    async fn receive(&mut self, ctx: &Context<Self::Msg>, msg: Self::Msg) -> Directive<Self::Msg> {
        match msg {
            FlowSignal::Down(DownstreamSignal::Subscribe(_id, subscriber)) => {
                if self.downstream.is_some() {
                    subscriber.on_error(StreamError::AlreadyHasSubscriber);
                } else {
                    let myself = ctx.myself();
                    let sub =
                        protocol::subscription(myself, |n| FlowSignal::Down(DownstreamSignal::Request(n)), || {
                            FlowSignal::Down(DownstreamSignal::Cancel)
                        });
                    subscriber.on_subscribe(sub);
                    self.downstream = Some(subscriber);
                }
            }
            FlowSignal::Down(DownstreamSignal::Request(n)) => {
                self.downstream_demand = self.downstream_demand.saturating_add(n);
                match &self.upstream {
                    Some(sub) => sub.request(n),
                    None => self.pending_upstream_request = self.pending_upstream_request.saturating_add(n),
                }
            }
            FlowSignal::Down(DownstreamSignal::Cancel) => {
                self.terminated = true;
                self.downstream = None;
                if let Some(sub) = self.upstream.take() {
                    sub.cancel();
                }
                let mut ctl = self.control();
                self.logic.on_downstream_cancel(&mut ctl);
            }
            FlowSignal::Down(DownstreamSignal::Produce(_))
            | FlowSignal::Down(DownstreamSignal::SubscriptionRequest(..))
            | FlowSignal::Down(DownstreamSignal::SubscriptionCancel(..))
            | FlowSignal::Down(DownstreamSignal::Close) => {}
            FlowSignal::Up(UpstreamSignal::OnSubscribe(sub)) => {
                let pending = self.pending_upstream_request;
                self.pending_upstream_request = 0;
                if pending > 0 {
                    sub.request(pending);
                }
                self.upstream = Some(sub);
            }
            FlowSignal::Up(UpstreamSignal::OnNext(elem)) => {
                if !self.terminated {
                    let mut ctl = self.control();
                    self.logic.on_next(elem, &mut ctl);
                }
            }
            FlowSignal::Up(UpstreamSignal::OnComplete) => {
                if !self.terminated {
                    let mut ctl = self.control();
                    self.logic.on_complete(&mut ctl);
                }
            }
            FlowSignal::Up(UpstreamSignal::OnError(err)) => {
                if !self.terminated {
                    let mut ctl = self.control();
                    self.logic.on_error(err, &mut ctl);
                }
            }
        }
        Directive::Same
    }
}

impl<In: Message, Out: Message, L: FlowLogic<In, Out>> FlowActor<In, Out, L> {
    fn control(&mut self) -> FlowControl<'_, Out> {
        FlowControl {
            downstream: &self.downstream,
            downstream_demand: &mut self.downstream_demand,
            upstream: &self.upstream,
            terminated: &mut self.terminated,
        }
    }
}

/// Spawns a concrete flow stage onto `system`, wiring it to `upstream` and
/// returning the `StagePublisher<Out>` the next stage subscribes to — the
/// per-logic-type half of what `Source::via`/`build_pipeline` need, kept out
/// of `pipeline.rs` so each flow constructor owns its own spawn call.
pub trait FlowSpec<In: Message, Out: Message> {
    fn spawn(
        self: Box<Self>,
        system: &ActorSystem,
        name: &str,
        upstream: Arc<dyn StagePublisher<In>>,
    ) -> Arc<dyn StagePublisher<Out>>;
}

/// Spawns a `FlowActor<In, Out, L>` wired to `upstream`. `make_logic` is a
/// re-callable `Fn` (not a bare `L` value) for the same reason `Props`
/// demands one: a restart re-invokes it to get a fresh `L`.
fn spawn_flow<In, Out, L, F>(
    system: &ActorSystem,
    name: &str,
    upstream: Arc<dyn StagePublisher<In>>,
    make_logic: F,
) -> Arc<dyn StagePublisher<Out>>
where
    In: Message,
    Out: Message,
    L: FlowLogic<In, Out>,
    F: Fn() -> L + Send + Sync + 'static,
{
    let props = Props::new(move || FlowActor {
        upstream_publisher: Arc::clone(&upstream),
        upstream: None,
        downstream: None,
        downstream_demand: 0,
        pending_upstream_request: 0,
        terminated: false,
        logic: make_logic(),
    });
    let actor: ActorRef<FlowSignal<In, Out>> = system
        .actor_of::<FlowActor<In, Out, L>>(props, name)
        .expect("flow actor spawn should not fail with a fresh name");
    protocol::publisher(actor, |id, sub| FlowSignal::Down(DownstreamSignal::Subscribe(id, sub)))
}

pub struct MapLogic<In: Message, Out: Message, F: Fn(In) -> Out + Send + 'static> {
    f: Arc<F>,
    _in: std::marker::PhantomData<In>,
    _out: std::marker::PhantomData<Out>,
}

impl<In: Message, Out: Message, F: Fn(In) -> Out + Send + 'static> FlowLogic<In, Out> for MapLogic<In, Out, F> {
    fn on_next(&mut self, elem: In, ctl: &mut FlowControl<'_, Out>) {
        ctl.emit((self.f)(elem));
    }
}

/// Applies `f` to each element (spec.md §4.5's `Flow::map`).
pub fn map<In, Out, F>(
    system: &ActorSystem,
    name: &str,
    upstream: Arc<dyn StagePublisher<In>>,
    f: F,
) -> Arc<dyn StagePublisher<Out>>
where
    In: Message,
    Out: Message,
    F: Fn(In) -> Out + Send + Sync + 'static,
{
    let f = Arc::new(f);
    spawn_flow(system, name, upstream, move || MapLogic {
        f: Arc::clone(&f),
        _in: std::marker::PhantomData,
        _out: std::marker::PhantomData,
    })
}

pub struct FilterLogic<T: Message, F: Fn(&T) -> bool + Send + 'static> {
    predicate: Arc<F>,
    _t: std::marker::PhantomData<T>,
}

impl<T: Message, F: Fn(&T) -> bool + Send + 'static> FlowLogic<T, T> for FilterLogic<T, F> {
    fn on_next(&mut self, elem: T, ctl: &mut FlowControl<'_, T>) {
        if (self.predicate)(&elem) {
            ctl.emit(elem);
        } else {
            ctl.request_upstream(1);
        }
    }
}

/// Drops elements `predicate` rejects, requesting one more upstream element
/// in their place so the downstream still eventually sees what it asked for.
pub fn filter<T, F>(system: &ActorSystem, name: &str, upstream: Arc<dyn StagePublisher<T>>, predicate: F) -> Arc<dyn StagePublisher<T>>
where
    T: Message,
    F: Fn(&T) -> bool + Send + Sync + 'static,
{
    let predicate = Arc::new(predicate);
    spawn_flow(system, name, upstream, move || FilterLogic {
        predicate: Arc::clone(&predicate),
        _t: std::marker::PhantomData,
    })
}

pub struct TakeLogic<T: Message> {
    remaining: u64,
    _t: std::marker::PhantomData<T>,
}

impl<T: Message> FlowLogic<T, T> for TakeLogic<T> {
    fn on_next(&mut self, elem: T, ctl: &mut FlowControl<'_, T>) {
        if self.remaining == 0 {
            ctl.cancel_upstream();
            ctl.complete_downstream();
            return;
        }
        self.remaining -= 1;
        ctl.emit(elem);
        if self.remaining == 0 {
            ctl.cancel_upstream();
            ctl.complete_downstream();
        }
    }
}

/// Passes through the first `n` elements, then cancels upstream and
/// completes downstream (spec.md §4.5's `Flow::take`).
pub fn take<T: Message>(system: &ActorSystem, name: &str, upstream: Arc<dyn StagePublisher<T>>, n: u64) -> Arc<dyn StagePublisher<T>> {
    spawn_flow(system, name, upstream, move || TakeLogic {
        remaining: n,
        _t: std::marker::PhantomData,
    })
}

pub struct DropLogic<T: Message> {
    remaining: u64,
    _t: std::marker::PhantomData<T>,
}

impl<T: Message> FlowLogic<T, T> for DropLogic<T> {
    fn on_next(&mut self, elem: T, ctl: &mut FlowControl<'_, T>) {
        if self.remaining > 0 {
            self.remaining -= 1;
            ctl.request_upstream(1);
        } else {
            ctl.emit(elem);
        }
    }
}

/// Discards the first `n` elements, requesting a replacement upstream for
/// each one dropped (spec.md §4.5's `Flow::drop`).
pub fn drop_first<T: Message>(system: &ActorSystem, name: &str, upstream: Arc<dyn StagePublisher<T>>, n: u64) -> Arc<dyn StagePublisher<T>> {
    spawn_flow(system, name, upstream, move || DropLogic {
        remaining: n,
        _t: std::marker::PhantomData,
    })
}

pub struct TapLogic<T: Message, F: Fn(&T) + Send + 'static> {
    f: Arc<F>,
    _t: std::marker::PhantomData<T>,
}

impl<T: Message, F: Fn(&T) + Send + 'static> FlowLogic<T, T> for TapLogic<T, F> {
    fn on_next(&mut self, elem: T, ctl: &mut FlowControl<'_, T>) {
        (self.f)(&elem);
        ctl.emit(elem);
    }
}

/// Passes every element through unchanged, calling `f` as an observer on
/// each one (spec.md §4.5's `Flow::tap`).
pub fn tap<T, F>(system: &ActorSystem, name: &str, upstream: Arc<dyn StagePublisher<T>>, f: F) -> Arc<dyn StagePublisher<T>>
where
    T: Message,
    F: Fn(&T) + Send + Sync + 'static,
{
    let f = Arc::new(f);
    spawn_flow(system, name, upstream, move || TapLogic {
        f: Arc::clone(&f),
        _t: std::marker::PhantomData,
    })
}

/// A no-op pass-through flow whose only job is to observe completion and
/// error signals through a `Promise<(), StreamError>` — used to let callers
/// `await` "this pipeline finished" without a terminal sink (spec.md §4.5's
/// completion-watching ambient addition).
pub struct CompletionFlowLogic<T: Message> {
    promise: Promise<(), StreamError>,
    _t: std::marker::PhantomData<T>,
}

impl<T: Message> FlowLogic<T, T> for CompletionFlowLogic<T> {
    fn on_next(&mut self, elem: T, ctl: &mut FlowControl<'_, T>) {
        ctl.emit(elem);
    }

    fn on_complete(&mut self, ctl: &mut FlowControl<'_, T>) {
        self.promise.try_success(());
        ctl.complete_downstream();
    }

    fn on_error(&mut self, err: StreamError, ctl: &mut FlowControl<'_, T>) {
        self.promise.try_failure(err.clone());
        ctl.error_downstream(err);
    }

    fn on_downstream_cancel(&mut self, _ctl: &mut FlowControl<'_, T>) {
        self.promise.try_cancel();
    }
}

/// Inserts a `CompletionFlowLogic` stage and returns its completion future
/// alongside the downstream publisher.
pub fn watch_completion<T: Message>(
    system: &ActorSystem,
    name: &str,
    upstream: Arc<dyn StagePublisher<T>>,
) -> (Arc<dyn StagePublisher<T>>, crate::future::Future<(), StreamError>) {
    let (promise, future) = Promise::new();
    let publisher = spawn_flow(system, name, upstream, move || CompletionFlowLogic {
        promise: promise.clone(),
        _t: std::marker::PhantomData,
    });
    (publisher, future)
}

/// `FlowSpec` wrappers for each constructor above, named the way they read
/// in a pipeline description — used by `pipeline::build_pipeline`'s
/// `Vec<Box<dyn FlowSpec<T, T>>>` (spec.md §4.5's S5 scenario).
pub struct MapSpec<T: Message, F: Fn(T) -> T + Send + Sync + 'static> {
    pub f: F,
    pub _t: std::marker::PhantomData<T>,
}

impl<T: Message, F: Fn(T) -> T + Send + Sync + 'static> FlowSpec<T, T> for MapSpec<T, F> {
    fn spawn(self: Box<Self>, system: &ActorSystem, name: &str, upstream: Arc<dyn StagePublisher<T>>) -> Arc<dyn StagePublisher<T>> {
        map(system, name, upstream, self.f)
    }
}

pub struct FilterSpec<T: Message, F: Fn(&T) -> bool + Send + Sync + 'static> {
    pub predicate: F,
    pub _t: std::marker::PhantomData<T>,
}

impl<T: Message, F: Fn(&T) -> bool + Send + Sync + 'static> FlowSpec<T, T> for FilterSpec<T, F> {
    fn spawn(self: Box<Self>, system: &ActorSystem, name: &str, upstream: Arc<dyn StagePublisher<T>>) -> Arc<dyn StagePublisher<T>> {
        filter(system, name, upstream, self.predicate)
    }
}

pub struct TakeSpec<T: Message> {
    pub n: u64,
    pub _t: std::marker::PhantomData<T>,
}

impl<T: Message> FlowSpec<T, T> for TakeSpec<T> {
    fn spawn(self: Box<Self>, system: &ActorSystem, name: &str, upstream: Arc<dyn StagePublisher<T>>) -> Arc<dyn StagePublisher<T>> {
        take(system, name, upstream, self.n)
    }
}

pub struct DropSpec<T: Message> {
    pub n: u64,
    pub _t: std::marker::PhantomData<T>,
}

impl<T: Message> FlowSpec<T, T> for DropSpec<T> {
    fn spawn(self: Box<Self>, system: &ActorSystem, name: &str, upstream: Arc<dyn StagePublisher<T>>) -> Arc<dyn StagePublisher<T>> {
        drop_first(system, name, upstream, self.n)
    }
}

pub struct TapSpec<T: Message, F: Fn(&T) + Send + Sync + 'static> {
    pub f: F,
    pub _t: std::marker::PhantomData<T>,
}

impl<T: Message, F: Fn(&T) + Send + Sync + 'static> FlowSpec<T, T> for TapSpec<T, F> {
    fn spawn(self: Box<Self>, system: &ActorSystem, name: &str, upstream: Arc<dyn StagePublisher<T>>) -> Arc<dyn StagePublisher<T>> {
        tap(system, name, upstream, self.f)
    }
}
