//! Typed extension registry (spec.md §6: `ExtensionId<E>` + `get(system)`).
//!
//! Grounded on the teacher's pattern of lazily-constructed, per-system
//! singletons (the guardian hierarchy in `kernel/provider.rs` is the same
//! idea applied to actors rather than plain services). Collaborators reach
//! shared services — an event journal, a durable-state table, anything
//! external — only through this mechanism; the core never depends on their
//! crates.

use std::any::{Any, TypeId};
use std::sync::{Arc, Mutex};

/// Something constructible once per system and shared thereafter.
pub trait Extension: Send + Sync + 'static {
    fn construct(system: &crate::system::system::ActorSystem) -> Self;
}

#[derive(Default)]
pub struct ExtensionRegistry {
    entries: Mutex<std::collections::HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
}

impl ExtensionRegistry {
    pub fn new() -> Self {
        ExtensionRegistry::default()
    }

    pub fn get_or_init<E: Extension>(&self, system: &crate::system::system::ActorSystem) -> Arc<E> {
        let type_id = TypeId::of::<E>();
        {
            let guard = self.entries.lock().unwrap();
            if let Some(existing) = guard.get(&type_id) {
                return existing.clone().downcast::<E>().expect("extension type mismatch");
            }
        }
        // Constructed outside the lock: `E::construct` may itself touch the
        // system (e.g. spawn actors) and must not reenter this mutex.
        let fresh = Arc::new(E::construct(system));
        let mut guard = self.entries.lock().unwrap();
        let entry = guard
            .entry(type_id)
            .or_insert_with(|| fresh.clone() as Arc<dyn Any + Send + Sync>);
        entry.clone().downcast::<E>().expect("extension type mismatch")
    }
}
