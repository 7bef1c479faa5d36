//! Actor handles: the type-erased `BasicActorRef` and the typed `ActorRef<T>`.
//!
//! Grounded on the teacher's `actor_ref.rs`: `ActorReference` for the
//! operations every handle supports regardless of message type, `CellInternal`
//! as the object-safe seam a `BasicActorRef` dispatches through, and
//! `ActorRef<T>` as a thin typed wrapper holding the concrete cell directly
//! so `tell` never pays the `AnyMessage` downcast cost.

use crate::actor::cell::ActorCell;
use crate::actor::system_message::SystemMessage;
use crate::id::{ActorId, ActorUri};
use crate::message::{AnyMessage, Envelope, Message};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Operations available on any actor handle regardless of its message type.
pub trait ActorReference {
    fn id(&self) -> ActorId;
    fn uri(&self) -> &ActorUri;
    fn name(&self) -> &str {
        self.uri().name()
    }
    fn is_root(&self) -> bool;
    fn parent(&self) -> Option<BasicActorRef>;
    fn children(&self) -> Vec<BasicActorRef>;
    fn sys_tell(&self, msg: SystemMessage, sender: Option<BasicActorRef>);
}

/// The object-safe seam every `ActorCell<T>` implements, letting
/// `BasicActorRef` reach into a cell without naming `T`.
pub trait CellInternal: ActorReference + Send + Sync {
    /// Best-effort typed delivery: downcasts `msg` against the cell's `T`
    /// and enqueues on success; dead-letters (logged, dropped) on a type
    /// mismatch.
    fn try_tell_any(&self, msg: AnyMessage, sender: Option<BasicActorRef>);

    /// Registers `child` in this cell's children/watching sets. Called by
    /// the provider right after a new actor is created, so the parent
    /// (type-erased here, since it may host a different message type) can
    /// track it without either side needing to name the other's `T`.
    fn adopt_child(&self, child: BasicActorRef);
}

/// A type-erased, shareable handle to an actor.
///
/// Equality and hashing are by id (spec.md §3).
#[derive(Clone)]
pub struct BasicActorRef {
    pub(crate) cell: Arc<dyn CellInternal>,
}

impl BasicActorRef {
    pub fn new(cell: Arc<dyn CellInternal>) -> Self {
        BasicActorRef { cell }
    }

    pub fn id(&self) -> ActorId {
        self.cell.id()
    }

    pub fn uri(&self) -> &ActorUri {
        self.cell.uri()
    }

    pub fn name(&self) -> &str {
        self.cell.name()
    }

    pub fn path(&self) -> &crate::id::ActorPath {
        &self.cell.uri().path
    }

    pub fn is_root(&self) -> bool {
        self.cell.is_root()
    }

    pub fn parent(&self) -> Option<BasicActorRef> {
        self.cell.parent()
    }

    pub fn children(&self) -> Vec<BasicActorRef> {
        self.cell.children()
    }

    pub fn sys_tell(&self, msg: SystemMessage, sender: Option<BasicActorRef>) {
        self.cell.sys_tell(msg, sender);
    }

    pub fn stop(&self) {
        self.sys_tell(SystemMessage::Stop, None);
    }

    /// Best-effort typed send; the caller does not statically know `T`.
    /// Used by selections and by collaborators holding only a `BasicActorRef`.
    pub fn try_tell<T: Message>(&self, msg: T, sender: Option<BasicActorRef>) {
        self.cell.try_tell_any(AnyMessage::new(msg, false), sender);
    }

    pub(crate) fn adopt_child(&self, child: BasicActorRef) {
        self.cell.adopt_child(child);
    }
}

impl fmt::Debug for BasicActorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BasicActorRef({})", self.uri())
    }
}

impl PartialEq for BasicActorRef {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}
impl Eq for BasicActorRef {}

impl Hash for BasicActorRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

/// A handle typed to the actor's message type; `tell` is the normal,
/// zero-downcast send path.
pub struct ActorRef<T: Message> {
    pub(crate) cell: Arc<ActorCell<T>>,
}

impl<T: Message> Clone for ActorRef<T> {
    fn clone(&self) -> Self {
        ActorRef {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<T: Message> fmt::Debug for ActorRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ActorRef({})", self.cell.uri)
    }
}

impl<T: Message> PartialEq for ActorRef<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cell.id == other.cell.id
    }
}
impl<T: Message> Eq for ActorRef<T> {}

impl<T: Message> ActorRef<T> {
    pub fn new(cell: Arc<ActorCell<T>>) -> Self {
        ActorRef { cell }
    }

    pub fn id(&self) -> ActorId {
        self.cell.id
    }

    pub fn uri(&self) -> &ActorUri {
        &self.cell.uri
    }

    /// Erases the message type. Cheap: one more `Arc` clone.
    pub fn basic(&self) -> BasicActorRef {
        BasicActorRef::new(Arc::clone(&self.cell) as Arc<dyn CellInternal>)
    }

    /// One-way send; sender is `None` (unsolicited / from outside the system).
    pub fn tell(&self, msg: T) {
        self.tell_from(msg, None);
    }

    /// One-way send with an explicit sender, used for ask/reply chains.
    pub fn tell_from(&self, msg: T, sender: Option<BasicActorRef>) {
        self.cell.enqueue_user(Envelope::new(msg, sender));
    }

    pub fn sys_tell(&self, msg: SystemMessage, sender: Option<BasicActorRef>) {
        self.cell.enqueue_system(Envelope::new(msg, sender));
    }

    pub fn stop(&self) {
        self.sys_tell(SystemMessage::Stop, None);
    }
}
