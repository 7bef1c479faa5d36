use actorium::actors::{Actor, ActorSystem, Context, Directive, Props, Scope, Strategy, SupervisionConfig};
use async_trait::async_trait;
use std::io;
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;
use tracing_subscriber::fmt::MakeWriter;

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl io::Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for SharedBuf {
    type Writer = SharedBuf;
    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

static WRITER: OnceLock<SharedBuf> = OnceLock::new();

/// Installs the subscriber once per test binary; every test in this file
/// reads from the same accumulated buffer.
fn install() -> SharedBuf {
    WRITER
        .get_or_init(|| {
            let writer = SharedBuf::default();
            let _ = tracing_subscriber::fmt()
                .with_writer(writer.clone())
                .with_ansi(false)
                .try_init();
            writer
        })
        .clone()
}

fn contents(buf: &SharedBuf) -> String {
    String::from_utf8_lossy(&buf.0.lock().unwrap()).into_owned()
}

struct NoOp;

#[async_trait]
impl Actor for NoOp {
    type Msg = ();
    async fn receive(&mut self, _ctx: &Context<Self::Msg>, _msg: Self::Msg) -> Directive<Self::Msg> {
        Directive::Same
    }
}

#[test]
fn spawning_an_actor_logs_its_creation() {
    let buf = install();
    let system = ActorSystem::new("logger-create");
    system.actor_of::<NoOp>(Props::new(|| NoOp), "watched-one").unwrap();

    system.runtime_handle().block_on(async {
        tokio::time::sleep(Duration::from_millis(20)).await;
    });

    let log = contents(&buf);
    assert!(log.contains("actor created"), "log did not mention actor creation:\n{log}");
    assert!(log.contains("watched-one"), "log did not include the actor's path:\n{log}");
}

struct AlwaysPanics;

#[async_trait]
impl Actor for AlwaysPanics {
    type Msg = ();
    async fn receive(&mut self, _ctx: &Context<Self::Msg>, _msg: Self::Msg) -> Directive<Self::Msg> {
        panic!("boom from test");
    }
}

/// A parent with no restart budget for its children, so the child's first
/// panic exhausts supervision and escalates rather than restarting quietly.
struct NoBudgetParent;

#[async_trait]
impl Actor for NoBudgetParent {
    type Msg = ();

    async fn pre_start(&mut self, ctx: &Context<Self::Msg>) {
        ctx.actor_of(Props::new(|| AlwaysPanics), "panicker").unwrap();
    }

    async fn receive(&mut self, _ctx: &Context<Self::Msg>, _msg: Self::Msg) -> Directive<Self::Msg> {
        Directive::Same
    }
}

#[test]
fn a_panicking_actor_with_no_restart_budget_logs_panic_and_escalation() {
    let buf = install();
    let system = ActorSystem::new("logger-panic");

    let supervision = SupervisionConfig {
        strategy: Strategy::Restart,
        scope: Scope::OneForOne,
        max_restarts: 0,
        ..SupervisionConfig::default()
    };
    let props = Props::new(|| NoBudgetParent).with_supervision(supervision);
    let parent = system.actor_of::<NoBudgetParent>(props, "supervisor").unwrap();

    system.runtime_handle().block_on(async {
        tokio::time::sleep(Duration::from_millis(20)).await;
    });

    let found = actorium::actor::selection::select(&system, "/user/supervisor/panicker");
    assert_eq!(found.len(), 1);
    found[0].try_tell((), None);
    let _ = &parent;

    system.runtime_handle().block_on(async {
        tokio::time::sleep(Duration::from_millis(60)).await;
    });

    let log = contents(&buf);
    assert!(log.contains("actor panicked handling a message"), "log did not mention the panic:\n{log}");
    assert!(log.contains("restart budget exhausted"), "log did not mention escalation:\n{log}");
}
