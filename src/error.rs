//! Error taxonomy for the runtime's public surface (spec.md §7).
//!
//! Internal failures (a panicking `receive`, a lifecycle exception) are never
//! propagated as `Result`s to the sender — they are converted into `Failed`
//! system messages and handled by supervision. These types cover the paths
//! that *do* surface synchronously to a caller: actor creation, the ask
//! pattern, and stream terminal causes.

use thiserror::Error;

/// Failure creating an actor via `actor_of`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CreateActorError {
    #[error("invalid actor name \"{0}\": must match [a-zA-Z0-9_-]+")]
    InvalidName(String),
    #[error("an actor already exists at path \"{0}\"")]
    AlreadyExists(String),
    #[error("actor panicked while starting")]
    Panicked,
}

/// Failure resolving an `ask`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AskError {
    #[error("ask timed out waiting for a reply")]
    Timeout,
    #[error("the ask target terminated before replying")]
    TargetTerminated,
    #[error("ask failed: {0}")]
    Failure(String),
    #[error("ask was cancelled")]
    Cancelled,
}

/// Terminal cause of a stream link (spec.md §4.5, §7).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StreamError {
    #[error("{0}")]
    Opaque(String),
    #[error("stage already has a subscriber")]
    AlreadyHasSubscriber,
}

/// A cause attached to `Restart`, `PreRestart`, `Terminated`, and `Failed`
/// system messages. Carries just enough information to log and to hand to a
/// watcher; the originating error type is not preserved (it may not even be
/// `'static` outside this actor's own stack frame, since it was usually a
/// caught panic payload).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureReason(pub std::sync::Arc<str>);

impl FailureReason {
    pub fn new(msg: impl Into<String>) -> Self {
        FailureReason(msg.into().into())
    }

    pub fn from_panic(payload: &(dyn std::any::Any + Send)) -> Self {
        let msg = if let Some(s) = payload.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "actor panicked".to_string()
        };
        FailureReason::new(msg)
    }
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reserved for future `schedule_*` failure modes (none currently exist —
/// the scheduler's own errors are logged and swallowed per spec.md §7).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("the scheduler has shut down")]
    ShuttingDown,
}
