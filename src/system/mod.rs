pub mod channel;
pub mod executor;
pub mod extension;
pub mod guardian;
pub mod scheduler;
pub mod system;

pub use executor::Executor;
pub use extension::{Extension, ExtensionRegistry};
pub use scheduler::{Scheduler, TimerHandle};
pub use system::ActorSystem;
