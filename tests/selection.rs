mod common;

use actorium::actor::selection::select;
use actorium::actors::{Actor, ActorSystem, Context, Directive, Props};
use async_trait::async_trait;
use std::time::Duration;

struct NoOp;

#[async_trait]
impl Actor for NoOp {
    type Msg = ();

    async fn receive(&mut self, _ctx: &Context<Self::Msg>, _msg: Self::Msg) -> Directive<Self::Msg> {
        Directive::Same
    }
}

struct Spawner;

#[async_trait]
impl Actor for Spawner {
    type Msg = ();

    async fn pre_start(&mut self, ctx: &Context<Self::Msg>) {
        for name in ["w1", "w2", "w3"] {
            ctx.actor_of(Props::new(|| NoOp), name).unwrap();
        }
    }

    async fn receive(&mut self, _ctx: &Context<Self::Msg>, _msg: Self::Msg) -> Directive<Self::Msg> {
        Directive::Same
    }
}

#[test]
fn wildcard_selects_every_sibling_under_one_segment() {
    common::init_tracing();
    let system = ActorSystem::new("selection-wildcard");
    system.actor_of::<Spawner>(Props::new(|| Spawner), "workers").unwrap();
    system.runtime_handle().block_on(async {
        tokio::time::sleep(Duration::from_millis(20)).await;
    });

    let found = select(&system, "/user/workers/*");
    let mut names: Vec<&str> = found.iter().map(|r| r.name()).collect();
    names.sort();
    assert_eq!(names, vec!["w1", "w2", "w3"]);
}

#[test]
fn exact_path_selects_a_single_actor() {
    common::init_tracing();
    let system = ActorSystem::new("selection-exact");
    system.actor_of::<NoOp>(Props::new(|| NoOp), "solo").unwrap();

    let found = select(&system, "/user/solo");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name(), "solo");
}

#[test]
fn unmatched_path_selects_nothing() {
    common::init_tracing();
    let system = ActorSystem::new("selection-empty");
    assert!(select(&system, "/user/does-not-exist").is_empty());
}

#[test]
fn sibling_name_is_not_matched_by_a_shorter_path() {
    common::init_tracing();
    let system = ActorSystem::new("selection-depth");
    system.actor_of::<Spawner>(Props::new(|| Spawner), "workers").unwrap();
    system.runtime_handle().block_on(async {
        tokio::time::sleep(Duration::from_millis(20)).await;
    });

    // `/user/*` has one fewer segment than `/user/workers/w1` and must not match it.
    let found = select(&system, "/user/*");
    let names: Vec<&str> = found.iter().map(|r| r.name()).collect();
    assert_eq!(names, vec!["workers"]);
}

struct Asker {
    tx: tokio::sync::mpsc::UnboundedSender<usize>,
}

#[async_trait]
impl Actor for Asker {
    type Msg = ();

    async fn receive(&mut self, ctx: &Context<Self::Msg>, _msg: Self::Msg) -> Directive<Self::Msg> {
        let found = ctx.select("/user/workers/*");
        let _ = self.tx.send(found.len());
        Directive::Same
    }
}

#[test]
fn context_select_resolves_from_inside_an_actor() {
    common::init_tracing();
    let system = ActorSystem::new("selection-from-context");
    system.actor_of::<Spawner>(Props::new(|| Spawner), "workers").unwrap();
    system.runtime_handle().block_on(async {
        tokio::time::sleep(Duration::from_millis(20)).await;
    });

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let asker = system
        .actor_of::<Asker>(Props::new(move || Asker { tx: tx.clone() }), "asker")
        .unwrap();
    asker.tell(());

    let count = system.runtime_handle().block_on(async {
        tokio::time::timeout(Duration::from_millis(200), rx.recv()).await.unwrap().unwrap()
    });
    assert_eq!(count, 3);
}
