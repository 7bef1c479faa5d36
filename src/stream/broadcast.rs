//! `BroadcastHub<T>`: a stage with one upstream but many independent
//! downstream subscribers, each with its own demand (spec.md §4.5's fan-out
//! stage, scenario S6). Unlike `Flow`/`Sink`, which reject a second
//! `Subscribe` outright (Open Question #2 in DESIGN.md), a hub's whole point
//! is multiple subscribers — so it uses the `SubscriptionRequest`/
//! `SubscriptionCancel` id-carrying variants of `DownstreamSignal` that the
//! single-subscriber stages never touch.
//!
//! Demand model: the hub tracks `in_flight`, the number of elements it has
//! already asked its upstream for but not yet received. A subscriber's
//! `Request(n)` only asks upstream for `n.saturating_sub(in_flight)` more —
//! if in-flight demand already covers the request, no new upstream request
//! is sent. This is the standard reactive-streams credit accounting; see
//! DESIGN.md for why it was chosen over a more literal reading of one
//! narrative detail in the originating scenario.

use crate::actor::actor::{Actor, Directive};
use crate::actor::actor_ref::BasicActorRef;
use crate::actor::context::Context;
use crate::actor::props::Props;
use crate::error::StreamError;
use crate::id::ActorId;
use crate::message::Message;
use crate::stream::protocol::{self, DownstreamSignal, StagePublisher, StageSubscriber, Subscription, UpstreamSignal};
use crate::system::system::ActorSystem;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug)]
pub enum HubSignal<T: Message> {
    Up(UpstreamSignal<T>),
    Down(DownstreamSignal<T>),
}

struct HubActor<T: Message + Clone> {
    upstream_publisher: Arc<dyn StagePublisher<T>>,
    upstream: Option<Subscription>,
    subscribers: HashMap<ActorId, (Box<dyn StageSubscriber<T>>, u64)>,
    in_flight: u64,
    terminated: bool,
}

#[async_trait::async_trait]
impl<T: Message + Clone> Actor for HubActor<T> {
    type Msg = HubSignal<T>;

    async fn pre_start(&mut self, ctx: &Context<Self::Msg>) {
        let myself = ctx.myself();
        let sub = protocol::subscriber(
            myself,
            |s| HubSignal::Up(UpstreamSignal::OnSubscribe(s)),
            |e| HubSignal::Up(UpstreamSignal::OnNext(e)),
            || HubSignal::Up(UpstreamSignal::OnComplete),
            |e| HubSignal::Up(UpstreamSignal::OnError(e)),
        );
        let upstream_publisher = Arc::clone(&self.upstream_publisher);
        upstream_publisher.subscribe(ctx.myself().id(), sub);
    }

    async fn receive(&mut self, ctx: &Context<Self::Msg>, msg: Self::Msg) -> Directive<Self::Msg> {
        match msg {
            HubSignal::Down(DownstreamSignal::Subscribe(id, subscriber)) => {
                if self.subscribers.contains_key(&id) {
                    subscriber.on_error(StreamError::AlreadyHasSubscriber);
                } else {
                    let myself = ctx.myself();
                    let sub = protocol::subscription(
                        myself,
                        move |n| HubSignal::Down(DownstreamSignal::SubscriptionRequest(n, id)),
                        move || HubSignal::Down(DownstreamSignal::SubscriptionCancel(id)),
                    );
                    subscriber.on_subscribe(sub);
                    self.subscribers.insert(id, (subscriber, 0));
                }
            }
            HubSignal::Down(DownstreamSignal::SubscriptionRequest(n, id)) => {
                if let Some((_, demand)) = self.subscribers.get_mut(&id) {
                    *demand = demand.saturating_add(n);
                }
                let extra = n.saturating_sub(self.in_flight);
                if extra > 0 {
                    if let Some(u) = &self.upstream {
                        u.request(extra);
                    }
                    self.in_flight += extra;
                } else {
                    self.in_flight -= n;
                }
            }
            HubSignal::Down(DownstreamSignal::SubscriptionCancel(id)) => {
                self.subscribers.remove(&id);
            }
            HubSignal::Down(DownstreamSignal::Request(_))
            | HubSignal::Down(DownstreamSignal::Cancel)
            | HubSignal::Down(DownstreamSignal::Produce(_))
            | HubSignal::Down(DownstreamSignal::Close) => {}
            HubSignal::Up(UpstreamSignal::OnSubscribe(sub)) => {
                self.upstream = Some(sub);
            }
            HubSignal::Up(UpstreamSignal::OnNext(elem)) => {
                if self.terminated {
                    return Directive::Same;
                }
                self.in_flight = self.in_flight.saturating_sub(1);
                for (subscriber, demand) in self.subscribers.values_mut() {
                    if *demand > 0 {
                        subscriber.on_next(elem.clone());
                        *demand -= 1;
                    }
                }
            }
            HubSignal::Up(UpstreamSignal::OnComplete) => {
                if !self.terminated {
                    self.terminated = true;
                    for (subscriber, _) in self.subscribers.drain() {
                        subscriber.0.on_complete();
                    }
                }
            }
            HubSignal::Up(UpstreamSignal::OnError(err)) => {
                if !self.terminated {
                    self.terminated = true;
                    for (_, (subscriber, _)) in self.subscribers.drain() {
                        subscriber.on_error(err.clone());
                    }
                }
            }
        }
        Directive::Same
    }
}

/// Spawns a fan-out stage subscribed to `upstream`; every call to
/// `subscribe()` on the returned publisher attaches an independent
/// subscriber with its own demand (spec.md §4.5, S6).
pub fn broadcast<T: Message + Clone>(system: &ActorSystem, name: &str, upstream: Arc<dyn StagePublisher<T>>) -> Arc<dyn StagePublisher<T>> {
    let props = Props::new(move || HubActor {
        upstream_publisher: Arc::clone(&upstream),
        upstream: None,
        subscribers: HashMap::new(),
        in_flight: 0,
        terminated: false,
    });
    let actor = system
        .actor_of::<HubActor<T>>(props, name)
        .expect("hub actor spawn should not fail with a fresh name");
    protocol::publisher(actor, |id, sub| HubSignal::Down(DownstreamSignal::Subscribe(id, sub)))
}

/// Exposed for callers that want the hub's `BasicActorRef` (e.g. to `stop()`
/// it directly rather than via subscriber cancellation).
pub fn broadcast_with_handle<T: Message + Clone>(
    system: &ActorSystem,
    name: &str,
    upstream: Arc<dyn StagePublisher<T>>,
) -> (Arc<dyn StagePublisher<T>>, BasicActorRef) {
    let props = Props::new(move || HubActor {
        upstream_publisher: Arc::clone(&upstream),
        upstream: None,
        subscribers: HashMap::new(),
        in_flight: 0,
        terminated: false,
    });
    let actor = system
        .actor_of::<HubActor<T>>(props, name)
        .expect("hub actor spawn should not fail with a fresh name");
    let basic = actor.basic();
    let publisher = protocol::publisher(actor, |id, sub| HubSignal::Down(DownstreamSignal::Subscribe(id, sub)));
    (publisher, basic)
}
