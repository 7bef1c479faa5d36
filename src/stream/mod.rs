pub mod broadcast;
pub mod flow;
pub mod pipeline;
pub mod protocol;
pub mod sink;
pub mod source;

pub use broadcast::{broadcast, broadcast_with_handle};
pub use pipeline::{build_pipeline, MaterializedPipeline};
pub use protocol::{StagePublisher, StageSubscriber, Subscription};
pub use source::{Source, Stage};
