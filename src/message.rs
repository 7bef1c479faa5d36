//! Message envelopes and the type-erased `AnyMessage` carrier.
//!
//! Grounded on the teacher's modern `src/lib.rs`: a blanket `Message` trait,
//! an `Envelope<T>` pairing a message with its optional sender, and an
//! `AnyMessage` box used wherever a `BasicActorRef` needs to deliver into a
//! mailbox it cannot name the concrete type of. Unlike the teacher, `Message`
//! here does not require `Clone` — replay/persistence, the only consumer of
//! that bound, is out of scope (spec.md §1).

use crate::actor::actor_ref::BasicActorRef;
use std::any::Any;
use std::fmt::Debug;

/// Blanket bound for anything that can travel through a mailbox.
pub trait Message: Debug + Send + 'static {}
impl<T: Debug + Send + 'static> Message for T {}

/// A message paired with the ref of whoever sent it, if any.
///
/// `sender` is `None` for unsolicited sends from outside the actor system
/// (spec.md §3: "`sender` may be a null/noop ref").
pub struct Envelope<T> {
    pub message: T,
    pub sender: Option<BasicActorRef>,
}

impl<T> Envelope<T> {
    pub fn new(message: T, sender: Option<BasicActorRef>) -> Self {
        Envelope { message, sender }
    }
}

/// A message whose concrete type has been erased, for delivery through a
/// `BasicActorRef` that only knows the destination's id, not its message
/// type. The mailbox unwraps it with `take::<T>()` before dispatch; a type
/// mismatch there is a dead-lettered send, not a panic.
pub struct AnyMessage {
    pub msg: Option<Box<dyn Any + Send>>,
    /// Set when this carries a single consumer's payload (e.g. an ask
    /// reply) — `take` asserts the box hasn't already been drained.
    pub one_time: bool,
}

impl AnyMessage {
    pub fn new<T: Message>(msg: T, one_time: bool) -> Self {
        AnyMessage {
            msg: Some(Box::new(msg)),
            one_time,
        }
    }

    /// Attempts to downcast and take ownership of the boxed message.
    /// Returns `None` on a type mismatch or if already taken.
    pub fn take<T: Message>(&mut self) -> Option<T> {
        self.msg
            .take()
            .and_then(|m| m.downcast::<T>().ok())
            .map(|b| *b)
    }
}

impl std::fmt::Debug for AnyMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnyMessage")
            .field("one_time", &self.one_time)
            .field("has_payload", &self.msg.is_some())
            .finish()
    }
}
