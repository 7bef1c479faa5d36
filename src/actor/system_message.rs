//! The closed system-message taxonomy (spec.md §3) and actor lifecycle
//! states (spec.md §4.2). Grounded on the teacher's `SystemMsg`/`ActorState`
//! split between `actor_cell.rs` (old) and the modern kernel files, unified
//! here into one closed enum per spec.md's "closed variant" requirement.

use crate::actor::actor_ref::BasicActorRef;
use crate::error::FailureReason;

/// Lifecycle state of an actor's cell. Stored as an `AtomicU8` via
/// `ActorState::from_u8`/`as_u8` so reads never take a lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorState {
    Created,
    Starting,
    Running,
    Stopping,
    Stopped,
    Failed,
    Restarting,
    Terminated,
}

impl ActorState {
    pub fn as_u8(self) -> u8 {
        match self {
            ActorState::Created => 0,
            ActorState::Starting => 1,
            ActorState::Running => 2,
            ActorState::Stopping => 3,
            ActorState::Stopped => 4,
            ActorState::Failed => 5,
            ActorState::Restarting => 6,
            ActorState::Terminated => 7,
        }
    }

    pub fn from_u8(v: u8) -> Self {
        match v {
            0 => ActorState::Created,
            1 => ActorState::Starting,
            2 => ActorState::Running,
            3 => ActorState::Stopping,
            4 => ActorState::Stopped,
            5 => ActorState::Failed,
            6 => ActorState::Restarting,
            _ => ActorState::Terminated,
        }
    }

    /// Whether this state still accepts system messages (every state but
    /// the terminal one, spec.md §3: "System messages are processed in
    /// every non-terminal state").
    pub fn accepts_system_messages(self) -> bool {
        self != ActorState::Terminated
    }
}

/// The closed set of lifecycle and supervision signals. Has priority over
/// user messages in a mailbox's drain pass (spec.md §3, §4.1).
#[derive(Debug, Clone)]
pub enum SystemMessage {
    PreStart,
    PostStart,
    PreStop,
    PostStop,
    Stop,
    Restart(Option<FailureReason>),
    PreRestart(Option<FailureReason>),
    PostRestart,
    Watch(BasicActorRef),
    Unwatch(BasicActorRef),
    Terminated(BasicActorRef, Option<FailureReason>),
    Failed(BasicActorRef, FailureReason),
}

impl SystemMessage {
    pub fn name(&self) -> &'static str {
        match self {
            SystemMessage::PreStart => "PreStart",
            SystemMessage::PostStart => "PostStart",
            SystemMessage::PreStop => "PreStop",
            SystemMessage::PostStop => "PostStop",
            SystemMessage::Stop => "Stop",
            SystemMessage::Restart(_) => "Restart",
            SystemMessage::PreRestart(_) => "PreRestart",
            SystemMessage::PostRestart => "PostRestart",
            SystemMessage::Watch(_) => "Watch",
            SystemMessage::Unwatch(_) => "Unwatch",
            SystemMessage::Terminated(_, _) => "Terminated",
            SystemMessage::Failed(_, _) => "Failed",
        }
    }
}
