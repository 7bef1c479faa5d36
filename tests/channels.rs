mod common;

use actorium::actors::ActorSystem;
use actorium::system::channel::{ChannelMsg, DeadLetter, DEAD_LETTERS_TOPIC};
use common::Collector;
use std::time::Duration;

/// A type-mismatched send (a `BasicActorRef::try_tell` against the wrong
/// concrete `Msg`) is dropped and published on the `dead_letters` channel
/// rather than panicking or silently vanishing (spec.md §6).
#[test]
fn type_mismatched_send_is_published_as_a_dead_letter() {
    common::init_tracing();
    let system = ActorSystem::new("channels-mismatch");

    let (target, _rx) = Collector::<i32>::spawn(&system, "target");
    let (sink, mut letters) = Collector::<DeadLetter>::spawn(&system, "dead-letter-sink");

    system.dead_letters().tell(ChannelMsg::Subscribe {
        topic: DEAD_LETTERS_TOPIC.to_string(),
        subscriber: sink.basic(),
    });
    system.runtime_handle().block_on(async {
        tokio::time::sleep(Duration::from_millis(20)).await;
    });

    target.basic().try_tell("not an i32".to_string(), None);

    let letter = system.runtime_handle().block_on(async {
        tokio::time::timeout(Duration::from_millis(300), letters.recv())
            .await
            .expect("a dead letter should arrive")
            .expect("dead-letter channel stays open")
    });
    assert_eq!(letter.recipient.id(), target.id());
}

/// Sending to an already-terminated actor dead-letters the send instead of
/// queuing it forever behind a mailbox nothing will ever drain again.
#[test]
fn sends_after_termination_are_dead_lettered() {
    common::init_tracing();
    let system = ActorSystem::new("channels-poststop");

    let (target, _rx) = Collector::<i32>::spawn(&system, "target");
    let (sink, mut letters) = Collector::<DeadLetter>::spawn(&system, "dead-letter-sink");

    system.dead_letters().tell(ChannelMsg::Subscribe {
        topic: DEAD_LETTERS_TOPIC.to_string(),
        subscriber: sink.basic(),
    });
    system.runtime_handle().block_on(async {
        tokio::time::sleep(Duration::from_millis(20)).await;
    });

    target.stop();
    system.runtime_handle().block_on(async {
        tokio::time::sleep(Duration::from_millis(40)).await;
    });

    target.tell(7);

    let letter = system.runtime_handle().block_on(async {
        tokio::time::timeout(Duration::from_millis(300), letters.recv())
            .await
            .expect("the late send should be dead-lettered")
            .expect("dead-letter channel stays open")
    });
    assert_eq!(letter.recipient.id(), target.id());
}

/// Unsubscribing stops further delivery to that subscriber.
#[test]
fn unsubscribe_stops_further_delivery() {
    common::init_tracing();
    let system = ActorSystem::new("channels-unsub");

    let (target, _rx) = Collector::<i32>::spawn(&system, "target");
    let (sink, mut letters) = Collector::<DeadLetter>::spawn(&system, "dead-letter-sink");
    let subscriber = sink.basic();

    system.dead_letters().tell(ChannelMsg::Subscribe {
        topic: DEAD_LETTERS_TOPIC.to_string(),
        subscriber: subscriber.clone(),
    });
    system.runtime_handle().block_on(async {
        tokio::time::sleep(Duration::from_millis(20)).await;
    });

    system.dead_letters().tell(ChannelMsg::Unsubscribe {
        topic: DEAD_LETTERS_TOPIC.to_string(),
        subscriber: subscriber.clone(),
    });
    system.runtime_handle().block_on(async {
        tokio::time::sleep(Duration::from_millis(20)).await;
    });

    target.basic().try_tell(123_i64, None); // wrong type against Msg = i32

    let got = system
        .runtime_handle()
        .block_on(async { tokio::time::timeout(Duration::from_millis(100), letters.recv()).await });
    assert!(got.is_err(), "an unsubscribed sink should not receive further dead letters");
}
