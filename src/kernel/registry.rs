//! The process-wide id/path → actor map.
//!
//! Grounded on the teacher's `kernel/provider.rs` `ProviderInner { paths:
//! DashMap<ActorPath, ()> }`, extended to also resolve a path to the live
//! `BasicActorRef` (needed for actor selection, spec.md §2's ambient
//! addition). Per spec.md §5, this is the only process-wide mutable map in
//! the core; critical sections are limited to insert/lookup/remove.

use crate::actor::actor_ref::BasicActorRef;
use crate::id::{ActorId, ActorPath};
use dashmap::DashMap;

#[derive(Default)]
pub struct ActorRegistry {
    by_path: DashMap<String, BasicActorRef>,
    by_id: DashMap<ActorId, BasicActorRef>,
}

impl ActorRegistry {
    pub fn new() -> Self {
        ActorRegistry::default()
    }

    pub fn register(&self, path: &ActorPath, actor_ref: BasicActorRef) {
        self.by_path.insert(path.as_str().to_string(), actor_ref.clone());
        self.by_id.insert(actor_ref.id(), actor_ref);
    }

    pub fn unregister(&self, path: &ActorPath, id: ActorId) {
        self.by_path.remove(path.as_str());
        self.by_id.remove(&id);
    }

    pub fn path_exists(&self, path: &ActorPath) -> bool {
        self.by_path.contains_key(path.as_str())
    }

    pub fn by_path(&self, path: &str) -> Option<BasicActorRef> {
        self.by_path.get(path).map(|e| e.value().clone())
    }

    pub fn by_id(&self, id: ActorId) -> Option<BasicActorRef> {
        self.by_id.get(&id).map(|e| e.value().clone())
    }

    pub fn all_paths(&self) -> Vec<String> {
        self.by_path.iter().map(|e| e.key().clone()).collect()
    }
}
