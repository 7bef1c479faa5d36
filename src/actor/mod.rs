pub mod actor;
pub mod actor_ref;
pub mod cell;
pub mod context;
pub mod props;
pub mod selection;
pub mod system_message;

pub use actor::{Actor, BoxActor, Directive};
pub use actor_ref::{ActorRef, ActorReference, BasicActorRef};
pub use context::Context;
pub use props::Props;
pub use system_message::{ActorState, SystemMessage};
