//! `ActorSystem`: the process-wide root — registry, dispatchers,
//! extensions, and the `/user` guardian every top-level `actor_of` spawns
//! under.
//!
//! Grounded on the teacher's `lib.rs::load_config` + `kernel/provider.rs`'s
//! guardian bootstrap, collapsed into one owning struct. Unlike the
//! teacher, actorium builds and owns a dedicated multi-thread `tokio`
//! `Runtime` itself (via `Builder::new_multi_thread`) rather than assuming
//! the embedding application already runs one — this keeps `ActorSystem::new`
//! usable from plain `fn main()`.

use crate::actor::actor::Actor;
use crate::actor::actor_ref::{ActorRef, BasicActorRef};
use crate::actor::props::Props;
use crate::config::RuntimeConfig;
use crate::error::CreateActorError;
use crate::kernel::dispatcher::{Dispatcher, DispatcherSelection};
use crate::kernel::registry::ActorRegistry;
use crate::message::Message;
use crate::system::channel::{Channel, ChannelMsg, DeadLetter};
use crate::system::executor::Executor;
use crate::system::extension::ExtensionRegistry;
use crate::system::scheduler::Scheduler;
use std::sync::{Arc, OnceLock, Weak};
use tokio::runtime::Runtime;
use tracing::info;

pub(crate) type WeakActorSystem = Weak<ActorSystemInner>;

pub struct ActorSystemInner {
    name: String,
    config: RuntimeConfig,
    registry: ActorRegistry,
    parallel: Dispatcher,
    extensions: ExtensionRegistry,
    // Kept alive for the system's lifetime; `parallel` borrows its handle.
    _runtime: Option<Arc<Runtime>>,
    dead_letters: OnceLock<ActorRef<ChannelMsg>>,
}

/// A cheaply-cloneable handle to the whole runtime.
#[derive(Clone)]
pub struct ActorSystem {
    pub(crate) inner: Arc<ActorSystemInner>,
}

impl ActorSystem {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, RuntimeConfig::default_config())
    }

    /// Loads `RuntimeConfig::load()` (actorium.toml + `ACTORIUM_*` env),
    /// falling back to defaults if no config source is present.
    pub fn new_from_env(name: impl Into<String>) -> Self {
        let config = RuntimeConfig::load().unwrap_or_else(|_| RuntimeConfig::default_config());
        Self::with_config(name, config)
    }

    pub fn with_config(name: impl Into<String>, config: RuntimeConfig) -> Self {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(config.dispatcher.pool_size.max(1))
            .enable_all()
            .build()
            .expect("failed to start actorium's runtime");
        let handle = runtime.handle().clone();
        let parallel = Dispatcher::parallel(handle);

        let inner = Arc::new(ActorSystemInner {
            name: name.into(),
            config,
            registry: ActorRegistry::new(),
            parallel,
            extensions: ExtensionRegistry::new(),
            _runtime: Some(Arc::new(runtime)),
            dead_letters: OnceLock::new(),
        });
        let system = ActorSystem { inner };
        let channel = crate::kernel::provider::create_actor::<Channel>(
            &system,
            None,
            Props::new(|| Channel::default()),
            "dead-letters",
        )
        .expect("failed to start the dead-letters channel");
        system
            .inner
            .dead_letters
            .set(channel)
            .unwrap_or_else(|_| panic!("dead-letters channel initialized twice"));
        info!(system = %system.inner.name, "actor system started");
        system
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.inner.config
    }

    pub(crate) fn registry(&self) -> &ActorRegistry {
        &self.inner.registry
    }

    pub(crate) fn downgrade(&self) -> WeakActorSystem {
        Arc::downgrade(&self.inner)
    }

    pub fn runtime_handle(&self) -> tokio::runtime::Handle {
        self.inner
            ._runtime
            .as_ref()
            .expect("system runtime always present")
            .handle()
            .clone()
    }

    pub(crate) fn dispatcher_for(&self, selection: DispatcherSelection) -> Dispatcher {
        match selection {
            DispatcherSelection::Parallel => self.inner.parallel.clone(),
            DispatcherSelection::Pinned => Dispatcher::pinned(),
            DispatcherSelection::Concurrent => Dispatcher::concurrent(),
        }
    }

    /// Spawns a top-level actor rooted at `/user`.
    pub fn actor_of<A: Actor>(&self, props: Props<A::Msg>, name: &str) -> Result<ActorRef<A::Msg>, CreateActorError> {
        let user_root = self.user_guardian();
        crate::kernel::provider::create_actor::<A>(self, Some(user_root), props, name)
    }

    fn user_guardian(&self) -> BasicActorRef {
        if let Some(existing) = self.inner.registry.by_path("/user") {
            return existing;
        }
        let guardian = crate::kernel::provider::create_actor::<crate::system::guardian::Guardian>(
            self,
            None,
            Props::new(|| crate::system::guardian::Guardian),
            "user",
        )
        .expect("failed to start the /user guardian");
        guardian.basic()
    }

    pub fn stop(&self, target: &BasicActorRef) {
        target.stop();
    }

    pub fn scheduler(&self) -> Arc<Scheduler> {
        self.inner.extensions.get_or_init::<Scheduler>(self)
    }

    pub fn executor(&self) -> Arc<Executor> {
        self.inner.extensions.get_or_init::<Executor>(self)
    }

    pub fn get_extension<E: crate::system::extension::Extension>(&self) -> Arc<E> {
        self.inner.extensions.get_or_init::<E>(self)
    }

    pub fn dead_letters(&self) -> ActorRef<ChannelMsg> {
        self.inner
            .dead_letters
            .get()
            .expect("dead-letters channel initialized in ActorSystem::new")
            .clone()
    }

    pub(crate) fn publish_dead_letter(&self, recipient: BasicActorRef, description: String) {
        crate::system::channel::publish_dead_letter(&self.dead_letters(), DeadLetter { recipient, description });
    }
}

