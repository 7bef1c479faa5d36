mod common;

use actorium::actors::{ActorSystem, SystemMessage};
use common::Collector;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[test]
fn schedule_once_fires_after_its_delay_not_before() {
    common::init_tracing();
    let system = ActorSystem::new("sched-once");
    let fired = Arc::new(AtomicBool::new(false));
    let fired2 = Arc::clone(&fired);
    let start = Instant::now();

    system.scheduler().schedule_once(Duration::from_millis(60), move || {
        fired2.store(true, Ordering::SeqCst);
    });

    system.runtime_handle().block_on(async {
        tokio::time::sleep(Duration::from_millis(15)).await;
    });
    assert!(!fired.load(Ordering::SeqCst), "must not fire before its delay elapses");

    system.runtime_handle().block_on(async {
        tokio::time::sleep(Duration::from_millis(100)).await;
    });
    assert!(fired.load(Ordering::SeqCst));
    assert!(start.elapsed() >= Duration::from_millis(60));
}

#[test]
fn cancel_before_fire_suppresses_the_callback() {
    common::init_tracing();
    let system = ActorSystem::new("sched-cancel");
    let fired = Arc::new(AtomicBool::new(false));
    let fired2 = Arc::clone(&fired);

    let handle = system.scheduler().schedule_once(Duration::from_millis(40), move || {
        fired2.store(true, Ordering::SeqCst);
    });
    handle.cancel();
    assert!(handle.is_cancelled());

    system.runtime_handle().block_on(async {
        tokio::time::sleep(Duration::from_millis(80)).await;
    });
    assert!(!fired.load(Ordering::SeqCst));
}

#[test]
fn schedule_message_delivers_to_an_actor_after_its_delay() {
    common::init_tracing();
    let system = ActorSystem::new("sched-msg");
    let (actor, mut rx) = Collector::<i32>::spawn(&system, "collector");

    let start = Instant::now();
    system.scheduler().schedule_message(Duration::from_millis(40), actor, 7);

    let received = system.runtime_handle().block_on(async {
        tokio::time::timeout(Duration::from_millis(300), rx.recv()).await.unwrap()
    });
    assert_eq!(received, Some(7));
    assert!(start.elapsed() >= Duration::from_millis(40));
}

#[test]
fn schedule_system_message_stops_an_actor_after_its_delay() {
    common::init_tracing();
    let system = ActorSystem::new("sched-sys");
    let (actor, mut rx) = Collector::<i32>::spawn(&system, "collector");
    let basic = actor.basic();

    system
        .scheduler()
        .schedule_system_message(Duration::from_millis(30), basic.clone(), SystemMessage::Stop);

    system.runtime_handle().block_on(async {
        tokio::time::sleep(Duration::from_millis(120)).await;
    });

    assert!(actorium::actor::selection::select(&system, basic.path().as_str()).is_empty());
    // the actor is gone; nothing is left to deliver a message to it
    actor.tell(1);
    let got = system.runtime_handle().block_on(async {
        tokio::time::timeout(Duration::from_millis(50), rx.recv()).await
    });
    assert!(got.is_err() || got.unwrap().is_none());
}
