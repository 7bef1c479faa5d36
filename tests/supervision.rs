mod common;

use actorium::actors::{
    Actor, ActorSystem, Context, Directive, FailureReason, Props, Scope, Strategy, SupervisionConfig,
};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

struct FlakyChild {
    starts: Arc<AtomicU32>,
}

#[async_trait]
impl Actor for FlakyChild {
    type Msg = ();

    async fn pre_start(&mut self, _ctx: &Context<Self::Msg>) {
        self.starts.fetch_add(1, Ordering::SeqCst);
    }

    async fn receive(&mut self, _ctx: &Context<Self::Msg>, _msg: Self::Msg) -> Directive<Self::Msg> {
        panic!("flaky child always panics");
    }
}

struct RestartParent {
    starts: Arc<AtomicU32>,
    child: Option<actorium::actors::ActorRef<()>>,
}

#[async_trait]
impl Actor for RestartParent {
    type Msg = ();

    async fn pre_start(&mut self, ctx: &Context<Self::Msg>) {
        let starts = Arc::clone(&self.starts);
        self.child = ctx.actor_of(Props::new(move || FlakyChild { starts: Arc::clone(&starts) }), "flaky").ok();
    }

    async fn receive(&mut self, _ctx: &Context<Self::Msg>, _msg: Self::Msg) -> Directive<Self::Msg> {
        if let Some(c) = &self.child {
            c.tell(());
        }
        Directive::Same
    }
}

struct EscalationWatcher {
    sink: actorium::actors::ActorRef<FailureReason>,
}

#[async_trait]
impl Actor for EscalationWatcher {
    type Msg = ();

    async fn on_failed(
        &mut self,
        _ctx: &Context<Self::Msg>,
        _who: &actorium::actors::BasicActorRef,
        cause: &FailureReason,
    ) {
        self.sink.tell(cause.clone());
    }

    async fn receive(&mut self, _ctx: &Context<Self::Msg>, _msg: Self::Msg) -> Directive<Self::Msg> {
        Directive::Same
    }
}

/// S3: a parent with `max_restarts: 2` restarts its failing child twice,
/// then stops restarting and escalates `Failed` to its own watchers.
#[test]
fn restart_strategy_restarts_up_to_the_budget_then_escalates() {
    common::init_tracing();
    let system = ActorSystem::new("supervision-restart");
    let starts = Arc::new(AtomicU32::new(0));

    let supervision = SupervisionConfig {
        strategy: Strategy::Restart,
        scope: Scope::OneForOne,
        max_restarts: 2,
        backoff_min: Duration::from_millis(1),
        backoff_max: Duration::from_millis(5),
        ..SupervisionConfig::default()
    };

    let (watcher, mut failures) = common::Collector::<FailureReason>::spawn(&system, "watcher");

    let props = Props::new({
        let starts = Arc::clone(&starts);
        move || RestartParent { starts: Arc::clone(&starts), child: None }
    })
    .with_supervision(supervision);
    let parent = system.actor_of::<RestartParent>(props, "parent").unwrap();
    system.runtime_handle().block_on(async {
        tokio::time::sleep(Duration::from_millis(20)).await;
    });

    let watcher_props = Props::new(move || EscalationWatcher { sink: watcher.clone() });
    let watcher_ref = system.actor_of::<EscalationWatcher>(watcher_props, "escalation-watcher").unwrap();
    let found = actorium::actor::selection::select(&system, "/user/parent");
    assert_eq!(found.len(), 1);
    // Watch the parent directly so its escalated `Failed` is observable
    // from outside the supervision hierarchy being exercised.
    found[0].sys_tell(actorium::actors::SystemMessage::Watch(watcher_ref.basic()), None);
    system.runtime_handle().block_on(async {
        tokio::time::sleep(Duration::from_millis(5)).await;
    });

    for _ in 0..4 {
        parent.tell(());
        system.runtime_handle().block_on(async {
            tokio::time::sleep(Duration::from_millis(40)).await;
        });
    }

    // 1 initial start + 2 restarts = 3 starts before the budget is exhausted.
    assert_eq!(starts.load(Ordering::SeqCst), 3);

    let got = system.runtime_handle().block_on(async {
        tokio::time::timeout(Duration::from_millis(300), failures.recv()).await
    });
    assert!(got.is_ok() && got.unwrap().is_some(), "escalation should notify the parent's own watchers");
}

struct Sibling {
    starts: Arc<AtomicU32>,
}

#[async_trait]
impl Actor for Sibling {
    type Msg = ();

    async fn pre_start(&mut self, _ctx: &Context<Self::Msg>) {
        self.starts.fetch_add(1, Ordering::SeqCst);
    }

    async fn receive(&mut self, _ctx: &Context<Self::Msg>, _msg: Self::Msg) -> Directive<Self::Msg> {
        Directive::Same
    }
}

struct StopAllParent {
    a_starts: Arc<AtomicU32>,
    b_starts: Arc<AtomicU32>,
    bad: Option<actorium::actors::ActorRef<()>>,
}

#[async_trait]
impl Actor for StopAllParent {
    type Msg = ();

    async fn pre_start(&mut self, ctx: &Context<Self::Msg>) {
        let a = Arc::clone(&self.a_starts);
        ctx.actor_of(Props::new(move || Sibling { starts: Arc::clone(&a) }), "sibling-a").unwrap();
        let b = Arc::clone(&self.b_starts);
        ctx.actor_of(Props::new(move || Sibling { starts: Arc::clone(&b) }), "sibling-b").unwrap();
        self.bad = ctx.actor_of(Props::new(|| FlakyChild { starts: Arc::new(AtomicU32::new(0)) }), "bad").ok();
    }

    async fn receive(&mut self, _ctx: &Context<Self::Msg>, _msg: Self::Msg) -> Directive<Self::Msg> {
        if let Some(bad) = &self.bad {
            bad.tell(());
        }
        Directive::Same
    }
}

/// `Scope::AllForOne` with `Strategy::Stop`: one child's failure stops
/// every sibling under that parent, not just the failing one.
#[test]
fn all_for_one_stop_takes_down_every_sibling() {
    common::init_tracing();
    let system = ActorSystem::new("supervision-all-for-one");
    let a_starts = Arc::new(AtomicU32::new(0));
    let b_starts = Arc::new(AtomicU32::new(0));

    let supervision = SupervisionConfig {
        strategy: Strategy::Stop,
        scope: Scope::AllForOne,
        ..SupervisionConfig::default()
    };
    let props = Props::new({
        let a_starts = Arc::clone(&a_starts);
        let b_starts = Arc::clone(&b_starts);
        move || StopAllParent { a_starts: Arc::clone(&a_starts), b_starts: Arc::clone(&b_starts), bad: None }
    })
    .with_supervision(supervision);
    let parent = system.actor_of::<StopAllParent>(props, "parent").unwrap();
    system.runtime_handle().block_on(async {
        tokio::time::sleep(Duration::from_millis(20)).await;
    });

    parent.tell(());
    system.runtime_handle().block_on(async {
        tokio::time::sleep(Duration::from_millis(60)).await;
    });

    assert!(actorium::actor::selection::select(&system, "/user/parent/sibling-a").is_empty());
    assert!(actorium::actor::selection::select(&system, "/user/parent/sibling-b").is_empty());
    assert!(actorium::actor::selection::select(&system, "/user/parent/bad").is_empty());
}

struct ResumeParent {
    child: Option<actorium::actors::ActorRef<()>>,
}

#[async_trait]
impl Actor for ResumeParent {
    type Msg = ();

    async fn pre_start(&mut self, ctx: &Context<Self::Msg>) {
        self.child = ctx
            .actor_of(Props::new(|| FlakyChild { starts: Arc::new(AtomicU32::new(0)) }), "flaky")
            .ok();
    }

    async fn receive(&mut self, _ctx: &Context<Self::Msg>, _msg: Self::Msg) -> Directive<Self::Msg> {
        if let Some(c) = &self.child {
            c.tell(());
        }
        Directive::Same
    }
}

/// `Strategy::Resume` takes no action at all: the child stays registered
/// (in its failed state) with no restart and no stop.
#[test]
fn resume_strategy_leaves_the_child_registered_without_restarting_it() {
    common::init_tracing();
    let system = ActorSystem::new("supervision-resume");

    let supervision = SupervisionConfig {
        strategy: Strategy::Resume,
        scope: Scope::OneForOne,
        ..SupervisionConfig::default()
    };
    let props = Props::new(|| ResumeParent { child: None }).with_supervision(supervision);
    let parent = system.actor_of::<ResumeParent>(props, "parent").unwrap();
    system.runtime_handle().block_on(async {
        tokio::time::sleep(Duration::from_millis(20)).await;
    });

    parent.tell(());
    system.runtime_handle().block_on(async {
        tokio::time::sleep(Duration::from_millis(60)).await;
    });

    // Still registered: Resume neither stops nor restarts the child.
    assert_eq!(actorium::actor::selection::select(&system, "/user/parent/flaky").len(), 1);
}
