//! Actor creation: validating a name, building its path, registering it,
//! and wiring it into its parent's children.
//!
//! Grounded on the teacher's `kernel/provider.rs` (`create_actor`,
//! path-keyed registration) and `Guardian` root-hierarchy bootstrap,
//! simplified to a single `/user` guardian (the teacher also built
//! `/system` and `/temp` guardians; actorium's ask listeners and stream
//! stages are spawned as ordinary `/user` children instead, since nothing
//! in spec.md requires the extra guardians).

use crate::actor::actor::Actor;
use crate::actor::actor_ref::{ActorRef, BasicActorRef, CellInternal};
use crate::actor::cell::ActorCell;
use crate::actor::props::Props;
use crate::actor::system_message::SystemMessage;
use crate::error::CreateActorError;
use crate::id::{validate_name, ActorId, ActorPath, ActorUri};
use crate::system::system::ActorSystem;
use std::sync::Arc;
use tracing::debug;

pub fn create_actor<A: Actor>(
    system: &ActorSystem,
    parent: Option<BasicActorRef>,
    props: Props<A::Msg>,
    name: &str,
) -> Result<ActorRef<A::Msg>, CreateActorError> {
    validate_name(name).map_err(|e| CreateActorError::InvalidName(e.name))?;

    let path = match &parent {
        Some(p) => p.path().child(name),
        None => ActorPath::root().child("user").child(name),
    };
    if system.registry().path_exists(&path) {
        return Err(CreateActorError::AlreadyExists(path.as_str().to_string()));
    }

    let id = ActorId::next();
    let uri = ActorUri::new(path.clone(), id);
    let dispatcher = system.dispatcher_for(props.dispatcher);
    let weak_system = system.downgrade();

    let cell = ActorCell::<A::Msg>::construct(uri, parent.clone(), weak_system, dispatcher, props);
    let basic = BasicActorRef::new(Arc::clone(&cell) as Arc<dyn CellInternal>);

    system.registry().register(&path, basic.clone());
    if let Some(parent) = &parent {
        parent.adopt_child(basic.clone());
    }

    debug!(actor = %path, "actor created");
    cell.start();
    if let Some(parent) = &parent {
        // A parent needs its children's `Terminated`/`Failed` notifications
        // to supervise them, so adopting a child also makes the parent one
        // of its watchers (spec.md §3: "attaching a child implies watching
        // it" cuts both ways — the child must know who to report to).
        basic.sys_tell(SystemMessage::Watch(parent.clone()), None);
    }
    Ok(ActorRef::new(cell))
}
