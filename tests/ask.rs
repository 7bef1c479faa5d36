mod common;

use actorium::actors::{ask, reply_if_asked, Actor, ActorSystem, AskError, Context, Directive, Props};
use async_trait::async_trait;
use std::time::{Duration, Instant};

struct Doubler;

#[async_trait]
impl Actor for Doubler {
    type Msg = i32;

    async fn receive(&mut self, ctx: &Context<Self::Msg>, msg: Self::Msg) -> Directive<Self::Msg> {
        reply_if_asked(&ctx.sender(), msg * 2);
        Directive::Same
    }
}

#[test]
fn ask_resolves_to_the_actors_reply() {
    common::init_tracing();
    let system = ActorSystem::new("ask-reply");
    let target = system.actor_of::<Doubler>(Props::new(|| Doubler), "doubler").unwrap();

    let result: Result<i32, AskError> = system.runtime_handle().block_on(async {
        ask(&system, &target, 21, Duration::from_secs(2)).await
    });
    assert_eq!(result.unwrap(), 42);
}

struct Silent;

#[async_trait]
impl Actor for Silent {
    type Msg = i32;
    async fn receive(&mut self, _ctx: &Context<Self::Msg>, _msg: Self::Msg) -> Directive<Self::Msg> {
        Directive::Same
    }
}

#[test]
fn ask_times_out_when_nothing_replies() {
    common::init_tracing();
    let system = ActorSystem::new("ask-timeout");
    let target = system.actor_of::<Silent>(Props::new(|| Silent), "silent").unwrap();

    let start = Instant::now();
    let result: Result<i32, AskError> = system.runtime_handle().block_on(async {
        ask(&system, &target, 1, Duration::from_millis(60)).await
    });
    assert!(matches!(result, Err(AskError::Timeout)));
    assert!(start.elapsed() >= Duration::from_millis(60));
}

#[test]
fn ask_fails_fast_when_the_target_terminates_before_replying() {
    common::init_tracing();
    let system = ActorSystem::new("ask-terminated");
    let target = system.actor_of::<Silent>(Props::new(|| Silent), "doomed").unwrap();
    let target_basic = target.basic();

    let start = Instant::now();
    let ask_future = ask::<i32, i32>(&system, &target, 1, Duration::from_secs(30));
    let handle = system.runtime_handle().spawn(ask_future);

    system.runtime_handle().block_on(async {
        // Give the listener's `pre_start` time to register its watch on
        // the target before it is stopped out from under the ask.
        tokio::time::sleep(Duration::from_millis(30)).await;
    });
    target_basic.stop();

    let result = system
        .runtime_handle()
        .block_on(async { tokio::time::timeout(Duration::from_secs(2), handle).await });
    let result = result.expect("ask should resolve well before its own timeout").unwrap();
    assert!(matches!(result, Err(AskError::TargetTerminated)));
    assert!(start.elapsed() < Duration::from_secs(2));
}
