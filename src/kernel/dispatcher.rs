//! The three dispatcher kinds a mailbox drain can run on (spec.md §4.1).
//!
//! The teacher's `riker-default/riker-dispatcher` wrapped a
//! `futures::executor::ThreadPool`; actorium is built on `tokio` throughout
//! (per the teacher's own modern `riker/Cargo.toml`), so each variant maps
//! onto a `tokio::runtime::Handle` instead: *parallel* is the system's
//! shared multi-thread runtime, *pinned* gets its own dedicated
//! single-thread runtime (one OS thread, as spec.md requires), and
//! *concurrent* also gets a dedicated current-thread runtime — a `LocalSet`
//! cannot cross the `Send` boundary `ActorCell<T>: Send` relies on
//! elsewhere, so "single OS thread, cooperative" is implemented as a
//! current-thread runtime rather than a `tokio::task::LocalSet`.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::runtime::{Builder, Handle, Runtime};

pub type DrainFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Which worker pool a `Props` requests for its actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatcherSelection {
    Parallel,
    Pinned,
    Concurrent,
}

impl Default for DispatcherSelection {
    fn default() -> Self {
        DispatcherSelection::Parallel
    }
}

/// A live dispatcher: a handle to run drain futures on, plus (for Pinned and
/// Concurrent) the dedicated runtime keeping that handle alive.
#[derive(Clone)]
pub struct Dispatcher {
    handle: Handle,
    // Held only to keep a dedicated runtime alive for the lifetime of the
    // actors using it; never read directly.
    _owned_runtime: Option<Arc<Runtime>>,
}

impl Dispatcher {
    pub fn parallel(handle: Handle) -> Self {
        Dispatcher {
            handle,
            _owned_runtime: None,
        }
    }

    pub fn pinned() -> Self {
        let rt = Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("failed to start a pinned-dispatcher runtime");
        let handle = rt.handle().clone();
        let rt = Arc::new(rt);
        // A current-thread runtime only polls spawned tasks while something
        // is driving it; keep one dedicated OS thread blocked on it forever.
        let driver = Arc::clone(&rt);
        std::thread::spawn(move || {
            driver.block_on(std::future::pending::<()>());
        });
        Dispatcher {
            handle,
            _owned_runtime: Some(rt),
        }
    }

    pub fn concurrent() -> Self {
        // Same construction as `pinned`: one dedicated OS thread running a
        // current-thread runtime. The distinction between the two is
        // documented intent (ordering guarantees vs. cooperative sharing),
        // not a different runtime shape.
        Self::pinned()
    }

    pub fn spawn_drain(&self, fut: DrainFuture) {
        self.handle.spawn(fut);
    }
}
