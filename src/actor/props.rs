//! Actor factories (spec.md's `spawn(behavior, ...)`).
//!
//! Grounded on the teacher's `actor/props.rs` (`Props::new`/`new_args`,
//! boxed producer closures), generalized to the async-trait `Actor` and
//! carrying the dispatcher selection and supervision config spec.md's
//! ambient additions require per-spawn.

use crate::actor::actor::{Actor, BoxActor};
use crate::kernel::dispatcher::DispatcherSelection;
use crate::message::Message;
use crate::supervision::SupervisionConfig;
use std::sync::Arc;

pub struct Props<T: Message> {
    producer: Arc<dyn Fn() -> BoxActor<T> + Send + Sync>,
    pub(crate) dispatcher: DispatcherSelection,
    pub(crate) supervision: SupervisionConfig,
    pub(crate) mailbox_process_limit: usize,
}

impl<T: Message> Clone for Props<T> {
    fn clone(&self) -> Self {
        Props {
            producer: Arc::clone(&self.producer),
            dispatcher: self.dispatcher,
            supervision: self.supervision,
            mailbox_process_limit: self.mailbox_process_limit,
        }
    }
}

impl<T: Message> Props<T> {
    /// Builds a `Props` from any zero-argument actor constructor, the way
    /// the teacher's `Props::new_args::<A, _>(())` did for argument-free
    /// actors.
    pub fn new<A, F>(factory: F) -> Self
    where
        A: Actor<Msg = T> + 'static,
        F: Fn() -> A + Send + Sync + 'static,
    {
        Props {
            producer: Arc::new(move || Box::new(factory())),
            dispatcher: DispatcherSelection::default(),
            supervision: SupervisionConfig::default(),
            mailbox_process_limit: 1,
        }
    }

    pub fn with_dispatcher(mut self, dispatcher: DispatcherSelection) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    pub fn with_supervision(mut self, supervision: SupervisionConfig) -> Self {
        self.supervision = supervision;
        self
    }

    pub fn with_mailbox_process_limit(mut self, limit: usize) -> Self {
        self.mailbox_process_limit = limit.max(1);
        self
    }

    pub fn produce(&self) -> BoxActor<T> {
        (self.producer)()
    }
}
