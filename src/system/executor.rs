//! Blocking/long-running work offload extension (spec.md §9: "provide a
//! dedicated executor extension that spawns worker tasks and returns
//! futures; actors should delegate synchronous I/O there rather than
//! blocking a mailbox worker").
//!
//! Grounded on the teacher's `src/executor.rs` (`TaskExecutor`/`TaskHandle`),
//! simplified onto `tokio::task::spawn_blocking` now that the whole crate
//! stands on tokio rather than the teacher's feature-gated tokio/futures
//! ThreadPool split.

use crate::system::extension::Extension;
use crate::system::system::ActorSystem;
use tokio::task::JoinHandle;

#[derive(Clone)]
pub struct Executor {
    handle: tokio::runtime::Handle,
}

impl Executor {
    /// Runs a blocking closure on the executor's pool, returning a handle
    /// whose output can be awaited like any other future.
    pub fn execute_blocking<F, R>(&self, f: F) -> JoinHandle<R>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        self.handle.spawn_blocking(f)
    }

    /// Spawns an async task on the same pool, for long-running work an
    /// actor wants to offload without blocking its own mailbox worker.
    pub fn execute<F>(&self, fut: F) -> JoinHandle<F::Output>
    where
        F: std::future::Future + Send + 'static,
        F::Output: Send + 'static,
    {
        self.handle.spawn(fut)
    }
}

impl Extension for Executor {
    fn construct(system: &ActorSystem) -> Self {
        Executor {
            handle: system.runtime_handle(),
        }
    }
}
