mod common;

use actorium::actors::{Actor, ActorSystem, Context, Directive, Props};
use actorium::future::Terminal;
use actorium::stream::flow::{FilterSpec, FlowSpec, MapSpec, TakeSpec};
use actorium::stream::protocol::{self, UpstreamSignal};
use actorium::stream::{broadcast, build_pipeline, sink, Source};
use async_trait::async_trait;
use std::marker::PhantomData;
use std::time::Duration;
use tokio::sync::mpsc;

/// S5: `array(1..=10) -> map(*2) -> filter(%4==0) -> take(2) -> collect`
/// yields exactly `[4, 8]` and the pipeline's completion future resolves.
#[test]
fn build_pipeline_materializes_a_full_map_filter_take_chain() {
    common::init_tracing();
    let system = ActorSystem::new("streams-pipeline");
    let source = Source::<i32>::array(&system, "numbers", (1..=10).collect());

    let flows: Vec<Box<dyn FlowSpec<i32, i32>>> = vec![
        Box::new(MapSpec { f: |x: i32| x * 2, _t: PhantomData }),
        Box::new(FilterSpec { predicate: |x: &i32| x % 4 == 0, _t: PhantomData }),
        Box::new(TakeSpec { n: 2, _t: PhantomData }),
    ];

    let mut pipeline = build_pipeline(&system, "s5", source, flows, 16);

    let collected = system.runtime_handle().block_on(async {
        let mut out = Vec::new();
        for _ in 0..2 {
            out.push(
                tokio::time::timeout(Duration::from_millis(500), pipeline.out_channel.recv())
                    .await
                    .expect("element should arrive")
                    .expect("channel stays open"),
            );
        }
        out
    });
    assert_eq!(collected, vec![4, 8]);

    let finished = system.runtime_handle().block_on(async { pipeline.completion.await_result(Some(Duration::from_millis(500))).await });
    assert!(matches!(finished, Some(Terminal::Success(()))));
}

/// The `.via()/.to()` fluent builder on `Source` composes the same kind of
/// chain without going through `build_pipeline`.
#[test]
fn fluent_via_to_builder_composes_map_and_filter() {
    common::init_tracing();
    let system = ActorSystem::new("streams-fluent");
    let source = Source::<i32>::array(&system, "numbers", (1..=6).collect());

    let (sink_ref, mut out) = source
        .via(|upstream| actorium::stream::flow::map(&system, "fluent-map", upstream, |x: i32| x * 3))
        .via(|upstream| actorium::stream::flow::filter(&system, "fluent-filter", upstream, |x: &i32| x % 2 == 0))
        .to(|upstream| sink::collect(&system, "fluent-sink", upstream, 16));
    let _ = &sink_ref;

    let collected = system.runtime_handle().block_on(async {
        let mut out_vec = Vec::new();
        for _ in 0..3 {
            out_vec.push(
                tokio::time::timeout(Duration::from_millis(500), out.recv())
                    .await
                    .expect("element should arrive")
                    .expect("channel stays open"),
            );
        }
        out_vec
    });
    assert_eq!(collected, vec![6, 12, 18]);
}

struct Probe<T: actorium::Message + Clone> {
    tx: mpsc::UnboundedSender<T>,
    initial_demand: u64,
}

#[async_trait]
impl<T: actorium::Message + Clone> Actor for Probe<T> {
    type Msg = UpstreamSignal<T>;

    async fn receive(&mut self, _ctx: &Context<Self::Msg>, msg: Self::Msg) -> Directive<Self::Msg> {
        match msg {
            UpstreamSignal::OnSubscribe(sub) => sub.request(self.initial_demand),
            UpstreamSignal::OnNext(elem) => {
                let _ = self.tx.send(elem);
            }
            UpstreamSignal::OnComplete | UpstreamSignal::OnError(_) => {}
        }
        Directive::Same
    }
}

fn spawn_probe(system: &ActorSystem, name: &str, demand: u64) -> (actorium::actors::ActorRef<UpstreamSignal<i32>>, mpsc::UnboundedReceiver<i32>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let actor = system
        .actor_of::<Probe<i32>>(Props::new(move || Probe { tx: tx.clone(), initial_demand: demand }), name)
        .unwrap();
    (actor, rx)
}

/// S6: a `BroadcastHub` fans the same upstream elements out to every
/// subscriber, gated independently by each subscriber's own demand. Uses a
/// `ManualSource` so no element exists upstream until both subscribers have
/// registered their demand with the hub, which would otherwise race a
/// fast-pumping source against the second subscription landing.
#[test]
fn broadcast_hub_gates_delivery_by_per_subscriber_demand() {
    common::init_tracing();
    let system = ActorSystem::new("streams-broadcast");
    let (source, feed) = Source::<i32>::manual(&system, "numbers");
    let hub = broadcast(&system, "hub", source.publisher());

    let (a_ref, mut a_rx) = spawn_probe(&system, "probe-a", 2);
    let (b_ref, mut b_rx) = spawn_probe(&system, "probe-b", 5);

    let a_sub = protocol::subscriber(a_ref.clone(), UpstreamSignal::OnSubscribe, UpstreamSignal::OnNext, || UpstreamSignal::OnComplete, UpstreamSignal::OnError);
    hub.subscribe(a_ref.id(), a_sub);
    let b_sub = protocol::subscriber(b_ref.clone(), UpstreamSignal::OnSubscribe, UpstreamSignal::OnNext, || UpstreamSignal::OnComplete, UpstreamSignal::OnError);
    hub.subscribe(b_ref.id(), b_sub);

    system.runtime_handle().block_on(async {
        tokio::time::sleep(Duration::from_millis(50)).await;
    });
    for n in 1..=20 {
        feed.produce(n);
    }

    let a_got = system.runtime_handle().block_on(async {
        let mut out = Vec::new();
        for _ in 0..2 {
            out.push(tokio::time::timeout(Duration::from_millis(500), a_rx.recv()).await.unwrap().unwrap());
        }
        out
    });
    let b_got = system.runtime_handle().block_on(async {
        let mut out = Vec::new();
        for _ in 0..5 {
            out.push(tokio::time::timeout(Duration::from_millis(500), b_rx.recv()).await.unwrap().unwrap());
        }
        out
    });

    assert_eq!(a_got, vec![1, 2]);
    assert_eq!(b_got, vec![1, 2, 3, 4, 5]);

    // Neither subscriber should receive more than it asked for.
    let extra_a = system.runtime_handle().block_on(async { tokio::time::timeout(Duration::from_millis(80), a_rx.recv()).await });
    assert!(extra_a.is_err(), "probe-a requested only 2 elements");
}
