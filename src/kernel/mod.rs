pub mod dispatcher;
pub mod mailbox;
pub mod provider;
pub mod queue;
pub mod registry;

pub use dispatcher::{Dispatcher, DispatcherSelection};
