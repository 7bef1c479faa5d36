//! System-wide publish/subscribe channel, and the well-known `dead_letters`
//! instance of it (spec.md §2, §6).
//!
//! Grounded on the teacher's `riker-default/riker-deadletter` actor, which
//! subscribed to an `All` topic on a dead-letter channel and logged via
//! `log::info!`; here the channel is a first-class generic actor any
//! collaborator can subscribe to, and dead letters are just its best-known
//! topic.

use crate::actor::actor::{Actor, Directive};
use crate::actor::actor_ref::{ActorRef, BasicActorRef};
use crate::actor::context::Context;
use std::collections::HashMap;
use tracing::warn;

/// A message that could not be delivered: the intended destination and a
/// description of what was being sent (message type name via `Debug`).
#[derive(Debug, Clone)]
pub struct DeadLetter {
    pub recipient: BasicActorRef,
    pub description: String,
}

#[derive(Debug)]
pub enum ChannelMsg {
    Subscribe { topic: String, subscriber: BasicActorRef },
    Unsubscribe { topic: String, subscriber: BasicActorRef },
    Publish { topic: String, letter: DeadLetter },
}

#[derive(Default)]
pub struct Channel {
    subscribers: HashMap<String, Vec<BasicActorRef>>,
}

#[async_trait::async_trait]
impl Actor for Channel {
    type Msg = ChannelMsg;

    async fn receive(&mut self, _ctx: &Context<Self::Msg>, msg: Self::Msg) -> Directive<Self::Msg> {
        match msg {
            ChannelMsg::Subscribe { topic, subscriber } => {
                self.subscribers.entry(topic).or_default().push(subscriber);
            }
            ChannelMsg::Unsubscribe { topic, subscriber } => {
                if let Some(subs) = self.subscribers.get_mut(&topic) {
                    subs.retain(|s| s != &subscriber);
                }
            }
            ChannelMsg::Publish { topic, letter } => {
                warn!(recipient = %letter.recipient.uri(), what = %letter.description, "dead letter");
                if let Some(subs) = self.subscribers.get(&topic) {
                    for s in subs {
                        s.try_tell(letter.clone(), None);
                    }
                }
            }
        }
        Directive::Same
    }
}

pub const DEAD_LETTERS_TOPIC: &str = "dead_letters";

pub fn publish_dead_letter(channel: &ActorRef<ChannelMsg>, letter: DeadLetter) {
    channel.tell(ChannelMsg::Publish {
        topic: DEAD_LETTERS_TOPIC.to_string(),
        letter,
    });
}
