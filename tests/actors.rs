mod common;

use actorium::actors::{Actor, ActorSystem, Context, Directive, Props};
use async_trait::async_trait;
use common::Collector;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

struct Recorder {
    seen: Arc<Mutex<Vec<i32>>>,
}

#[async_trait]
impl Actor for Recorder {
    type Msg = i32;

    async fn receive(&mut self, _ctx: &Context<Self::Msg>, msg: Self::Msg) -> Directive<Self::Msg> {
        self.seen.lock().unwrap().push(msg);
        Directive::Same
    }
}

/// S1: messages sent to one actor are processed in send order.
#[test]
fn ordering_is_preserved_within_one_actor() {
    common::init_tracing();
    let system = ActorSystem::new("actors-s1");
    let seen = Arc::new(Mutex::new(Vec::new()));
    let props = Props::new({
        let seen = Arc::clone(&seen);
        move || Recorder { seen: Arc::clone(&seen) }
    });
    let actor = system.actor_of::<Recorder>(props, "recorder").unwrap();

    for i in 1..=5 {
        actor.tell(i);
    }

    system.runtime_handle().block_on(async {
        tokio::time::sleep(Duration::from_millis(50)).await;
    });
    assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3, 4, 5]);
}

#[test]
fn actor_names_are_validated() {
    common::init_tracing();
    let system = ActorSystem::new("actors-names");
    let props = Props::new(|| Recorder { seen: Arc::new(Mutex::new(Vec::new())) });

    assert!(system.actor_of::<Recorder>(props.clone(), "valid-name").is_ok());
    assert!(system.actor_of::<Recorder>(props.clone(), "/").is_err());
    assert!(system.actor_of::<Recorder>(props.clone(), "*").is_err());
    assert!(system.actor_of::<Recorder>(props.clone(), "/a/b/c").is_err());
    assert!(system.actor_of::<Recorder>(props.clone(), "@").is_err());
    assert!(system.actor_of::<Recorder>(props.clone(), "#").is_err());
    assert!(system.actor_of::<Recorder>(props.clone(), "abc*").is_err());
    assert!(system.actor_of::<Recorder>(props.clone(), "!").is_err());
    // a name already taken is also rejected
    assert!(system.actor_of::<Recorder>(props, "valid-name").is_err());
}

struct SlowChild;

#[async_trait]
impl Actor for SlowChild {
    type Msg = ();

    async fn pre_stop(&mut self, _ctx: &Context<Self::Msg>) {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    async fn receive(&mut self, _ctx: &Context<Self::Msg>, _msg: Self::Msg) -> Directive<Self::Msg> {
        Directive::Same
    }
}

struct Parent;

#[async_trait]
impl Actor for Parent {
    type Msg = ();

    async fn pre_start(&mut self, ctx: &Context<Self::Msg>) {
        for name in ["child-a", "child-b", "child-c"] {
            ctx.actor_of(Props::new(|| SlowChild), name).unwrap();
        }
    }

    async fn receive(&mut self, _ctx: &Context<Self::Msg>, _msg: Self::Msg) -> Directive<Self::Msg> {
        Directive::Same
    }
}

struct TerminationWatcher {
    target: actorium::actors::BasicActorRef,
    signal: tokio::sync::mpsc::UnboundedSender<()>,
}

#[async_trait]
impl Actor for TerminationWatcher {
    type Msg = ();

    async fn pre_start(&mut self, ctx: &Context<Self::Msg>) {
        ctx.watch(&self.target);
    }

    async fn on_terminated(&mut self, _ctx: &Context<Self::Msg>, who: &actorium::actors::BasicActorRef) {
        if who.id() == self.target.id() {
            let _ = self.signal.send(());
        }
    }

    async fn receive(&mut self, _ctx: &Context<Self::Msg>, _msg: Self::Msg) -> Directive<Self::Msg> {
        Directive::Same
    }
}

/// S2: stopping a parent waits for every child's `pre_stop` to finish
/// before the parent's own `post_stop` runs (each child sleeps 50ms in
/// `pre_stop`).
#[test]
fn stop_waits_for_children() {
    common::init_tracing();
    let system = ActorSystem::new("actors-s2");

    let props = Props::new(|| Parent);
    let parent = system.actor_of::<Parent>(props, "parent").unwrap();
    let parent_basic = parent.basic();

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let watcher_props = Props::new({
        let target = parent_basic.clone();
        let tx = tx.clone();
        move || TerminationWatcher {
            target: target.clone(),
            signal: tx.clone(),
        }
    });
    system.actor_of::<TerminationWatcher>(watcher_props, "watcher").unwrap();

    system.runtime_handle().block_on(async {
        tokio::time::sleep(Duration::from_millis(20)).await;
    });

    let start = Instant::now();
    parent_basic.stop();

    system.runtime_handle().block_on(async {
        tokio::time::timeout(Duration::from_millis(500), rx.recv())
            .await
            .expect("parent should terminate")
            .expect("watcher channel open");
    });
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(50), "expected stop to wait on children, took {elapsed:?}");
}
