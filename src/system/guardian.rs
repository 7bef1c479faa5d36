//! The `/user` guardian: a do-nothing root actor every top-level `spawn`
//! is parented under, matching the teacher's `kernel/provider.rs` `Guardian`.

use crate::actor::actor::{Actor, Directive};
use crate::actor::context::Context;

pub struct Guardian;

#[async_trait::async_trait]
impl Actor for Guardian {
    type Msg = ();

    async fn receive(&mut self, _ctx: &Context<Self::Msg>, _msg: Self::Msg) -> Directive<Self::Msg> {
        Directive::Same
    }
}
