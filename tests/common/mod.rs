//! Shared test scaffolding: a tracing subscriber so failures come with
//! logs, and a generic collector actor used across several test files to
//! observe what a running system delivered.

use actorium::actors::{Actor, Context, Directive};
use actorium::message::Message;
use async_trait::async_trait;
use std::sync::Once;
use tokio::sync::mpsc;

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Forwards every message it receives onto an unbounded channel, for tests
/// that want to observe what was sent to an actor without writing a new
/// `Actor` impl each time.
pub struct Collector<T: Message> {
    tx: mpsc::UnboundedSender<T>,
}

impl<T: Message> Collector<T> {
    pub fn spawn(system: &actorium::actors::ActorSystem, name: &str) -> (actorium::actors::ActorRef<T>, mpsc::UnboundedReceiver<T>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let props = actorium::actors::Props::new(move || Collector { tx: tx.clone() });
        let actor = system.actor_of::<Collector<T>>(props, name).unwrap();
        (actor, rx)
    }
}

#[async_trait]
impl<T: Message> Actor for Collector<T> {
    type Msg = T;

    async fn receive(&mut self, _ctx: &Context<Self::Msg>, msg: Self::Msg) -> Directive<Self::Msg> {
        let _ = self.tx.send(msg);
        Directive::Same
    }
}
