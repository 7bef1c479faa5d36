//! The object an actor's `receive`/lifecycle hooks are given: its own ref,
//! parent, children, and the handful of system-level operations (spawn,
//! stop, watch, select, schedule) spec.md §4.2 and §6 describe.
//!
//! Grounded on the teacher's `Context<Msg>` (`actor_cell.rs`), generalized
//! to the new `ActorCell`/`Props`/`ActorSystem` shape.

use crate::actor::actor::Actor;
use crate::actor::actor_ref::{ActorRef, BasicActorRef};
use crate::actor::cell::ActorCell;
use crate::actor::props::Props;
use crate::actor::system_message::SystemMessage;
use crate::error::CreateActorError;
use crate::message::Message;
use crate::system::system::ActorSystem;
use std::sync::Arc;
use std::time::Duration;

pub struct Context<T: Message> {
    pub(crate) cell: Arc<ActorCell<T>>,
    pub(crate) sender: Option<BasicActorRef>,
}

impl<T: Message> Context<T> {
    pub fn myself(&self) -> ActorRef<T> {
        ActorRef::new(Arc::clone(&self.cell))
    }

    /// The sender of the message currently being handled, if any (spec.md
    /// §3: "`sender` may be a null/noop ref for unsolicited sends").
    /// Outside of a `receive`/`on_signal` call this is always `None`.
    pub fn sender(&self) -> Option<BasicActorRef> {
        self.sender.clone()
    }

    pub fn system(&self) -> ActorSystem {
        self.cell.system()
    }

    pub fn parent(&self) -> Option<BasicActorRef> {
        self.cell.parent.clone()
    }

    pub fn children(&self) -> Vec<BasicActorRef> {
        self.cell.children_refs()
    }

    /// Spawns a child of the current actor. The child's path is
    /// `self.path/name`.
    pub fn actor_of<A: Actor>(&self, props: Props<A::Msg>, name: &str) -> Result<ActorRef<A::Msg>, CreateActorError> {
        crate::kernel::provider::create_actor(
            &self.system(),
            Some(self.myself().basic()),
            props,
            name,
        )
    }

    pub fn stop(&self, target: &BasicActorRef) {
        target.sys_tell(SystemMessage::Stop, Some(self.myself().basic()));
    }

    pub fn stop_self(&self) {
        self.cell.enqueue_system(crate::message::Envelope::new(SystemMessage::Stop, None));
    }

    pub fn watch(&self, target: &BasicActorRef) {
        target.sys_tell(SystemMessage::Watch(self.myself().basic()), Some(self.myself().basic()));
    }

    pub fn unwatch(&self, target: &BasicActorRef) {
        target.sys_tell(SystemMessage::Unwatch(self.myself().basic()), Some(self.myself().basic()));
    }

    /// Resolves a path string (with at most one `*` wildcard segment) to
    /// the matching live refs (spec.md §2's actor-selection addition).
    pub fn select(&self, path: &str) -> Vec<BasicActorRef> {
        crate::actor::selection::select(&self.system(), path)
    }

    pub fn schedule_once<F>(&self, delay: Duration, cb: F) -> crate::system::scheduler::TimerHandle
    where
        F: FnOnce() + Send + 'static,
    {
        self.system().scheduler().schedule_once(delay, cb)
    }

    pub fn schedule_message(&self, delay: Duration, target: ActorRef<T>, msg: T) -> crate::system::scheduler::TimerHandle {
        self.system().scheduler().schedule_message(delay, target, msg)
    }
}
