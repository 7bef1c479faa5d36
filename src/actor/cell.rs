//! `ActorCell<T>`: the per-actor state machine — behavior slot, children,
//! watch relations, restart bookkeeping, and mailbox — all the things
//! spec.md §3's `ActorContext(T)` names in one place.
//!
//! Grounded on the teacher's `actor/actor_cell.rs` (children/watch/restart
//! bookkeeping shape) and `kernel.rs`/`kernel/provider.rs` (the
//! produce-via-Props restart mechanism), unified into a single owning
//! struct rather than the teacher's separate `Dock<A>` + `ActorCell<Msg>` +
//! kernel-task split, since actorium drives drains explicitly through the
//! dispatcher instead of a background kernel task per actor.

use crate::actor::actor::Actor;
use crate::actor::actor_ref::{ActorReference, BasicActorRef, CellInternal};
use crate::actor::context::Context;
use crate::actor::props::Props;
use crate::actor::system_message::{ActorState, SystemMessage};
use crate::error::FailureReason;
use crate::id::{ActorId, ActorUri};
use crate::kernel::dispatcher::Dispatcher;
use crate::kernel::mailbox::Mailbox;
use crate::message::{AnyMessage, Envelope, Message};
use crate::supervision::{RestartCounters, RestartDecision, RestartKey, Scope, Strategy, SupervisionConfig};
use crate::system::system::{ActorSystem, WeakActorSystem};
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Instant;
use tracing::{info, trace, warn};

pub struct ActorCell<T: Message> {
    pub(crate) uri: ActorUri,
    pub(crate) id: ActorId,
    pub(crate) parent: Option<BasicActorRef>,
    system: WeakActorSystem,
    state: AtomicU8,
    behavior: Mutex<Option<Box<dyn Actor<Msg = T>>>>,
    children: DashMap<String, BasicActorRef>,
    watching: DashMap<ActorId, BasicActorRef>,
    watchers: DashMap<ActorId, BasicActorRef>,
    pending_children: Mutex<std::collections::HashSet<ActorId>>,
    pending_terminations: AtomicUsize,
    pre_stop_done: AtomicBool,
    post_stop_sent: AtomicBool,
    restart_counters: Mutex<RestartCounters>,
    supervision_config: SupervisionConfig,
    pub(crate) dispatcher: Dispatcher,
    pub(crate) mailbox: Mailbox<T>,
    props: Props<T>,
    self_weak: OnceLock<std::sync::Weak<ActorCell<T>>>,
}

impl<T: Message> ActorCell<T> {
    pub(crate) fn construct(
        uri: ActorUri,
        parent: Option<BasicActorRef>,
        system: WeakActorSystem,
        dispatcher: Dispatcher,
        props: Props<T>,
    ) -> Arc<Self> {
        let id = uri.id;
        let mailbox_limit = props.mailbox_process_limit;
        let supervision_config = props.supervision;
        let cell = Arc::new(ActorCell {
            uri,
            id,
            parent,
            system,
            state: AtomicU8::new(ActorState::Created.as_u8()),
            behavior: Mutex::new(None),
            children: DashMap::new(),
            watching: DashMap::new(),
            watchers: DashMap::new(),
            pending_children: Mutex::new(std::collections::HashSet::new()),
            pending_terminations: AtomicUsize::new(0),
            pre_stop_done: AtomicBool::new(false),
            post_stop_sent: AtomicBool::new(false),
            restart_counters: Mutex::new(RestartCounters::default()),
            supervision_config,
            dispatcher,
            mailbox: Mailbox::new(mailbox_limit),
            props,
            self_weak: OnceLock::new(),
        });
        cell.self_weak.set(Arc::downgrade(&cell)).ok();
        cell
    }

    fn arc_self(&self) -> Arc<Self> {
        self.self_weak
            .get()
            .expect("self_weak set during construction")
            .upgrade()
            .expect("cell dropped while still running")
    }

    pub(crate) fn basic_ref(&self) -> BasicActorRef {
        BasicActorRef::new(self.arc_self() as Arc<dyn CellInternal>)
    }

    pub fn system(&self) -> ActorSystem {
        self.system.upgrade().expect("actor system dropped")
    }

    pub(crate) fn state(&self) -> ActorState {
        ActorState::from_u8(self.state.load(Ordering::SeqCst))
    }

    fn set_state(&self, s: ActorState) {
        self.state.store(s.as_u8(), Ordering::SeqCst);
    }

    pub(crate) fn children_refs(&self) -> Vec<BasicActorRef> {
        self.children.iter().map(|e| e.value().clone()).collect()
    }

    fn make_context(&self, sender: Option<BasicActorRef>) -> Context<T> {
        Context {
            cell: self.arc_self(),
            sender,
        }
    }

    /// Registers a freshly created child (spec.md §3: "attaching a child
    /// implies watching it").
    pub(crate) fn adopt_child(&self, child: BasicActorRef) {
        self.watching.insert(child.id(), child.clone());
        self.children.insert(child.name().to_string(), child);
    }

    /// Idempotent: begins the CREATED→STARTING transition by self-sending
    /// `PreStart`.
    pub(crate) fn start(self: &Arc<Self>) {
        if self.state() != ActorState::Created {
            return;
        }
        self.enqueue_system(Envelope::new(SystemMessage::PreStart, None));
    }

    pub(crate) fn dead_letter_user(&self, env: Envelope<T>) {
        warn!(actor = %self.uri, message = ?env.message, "dead letter: mailbox suspended or actor gone");
        if let Some(system) = self.system.upgrade() {
            system.publish_dead_letter(self.basic_ref(), format!("{:?}", env.message));
        }
    }

    pub(crate) fn fail(&self, reason: FailureReason, _sender: Option<BasicActorRef>) {
        self.set_state(ActorState::Failed);
        let me = self.basic_ref();
        for w in self.watchers.iter() {
            w.value().sys_tell(SystemMessage::Failed(me.clone(), reason.clone()), None);
        }
    }

    pub(crate) async fn dispatch_user(&self, env: Envelope<T>) {
        let behavior = self.behavior.lock().unwrap().take();
        let Some(mut behavior) = behavior else {
            self.dead_letter_user(env);
            return;
        };
        let ctx = self.make_context(env.sender);
        let directive = behavior.receive(&ctx, env.message).await;
        self.apply_directive(behavior, directive, &ctx).await;
    }

    async fn apply_directive(
        &self,
        current: Box<dyn Actor<Msg = T>>,
        directive: crate::actor::actor::Directive<T>,
        ctx: &Context<T>,
    ) {
        use crate::actor::actor::Directive;
        match directive {
            Directive::Same => {
                *self.behavior.lock().unwrap() = Some(current);
            }
            Directive::Stopped => {
                *self.behavior.lock().unwrap() = Some(current);
                self.enqueue_system(Envelope::new(SystemMessage::Stop, None));
            }
            Directive::Become(new_behavior) => {
                *self.behavior.lock().unwrap() = Some(new_behavior);
            }
            Directive::Deferred(factory) => {
                let resolved = factory(ctx);
                *self.behavior.lock().unwrap() = Some(resolved);
            }
        }
    }

    pub(crate) async fn dispatch_system(&self, env: Envelope<SystemMessage>) {
        let ctx = self.make_context(env.sender);
        match env.message {
            SystemMessage::PreStart => self.run_pre_start(&ctx).await,
            SystemMessage::PostStart => self.run_post_start(&ctx).await,
            SystemMessage::Stop => self.handle_stop(&ctx).await,
            SystemMessage::PreStop => self.handle_pre_stop(&ctx).await,
            SystemMessage::PostStop => self.handle_post_stop(&ctx).await,
            SystemMessage::Restart(cause) => self.handle_restart(&ctx, cause).await,
            SystemMessage::PreRestart(_) | SystemMessage::PostRestart => {
                // Invoked directly as behavior hooks from `handle_restart`;
                // never queued as standalone mailbox entries.
            }
            SystemMessage::Watch(who) => {
                self.watchers.insert(who.id(), who);
            }
            SystemMessage::Unwatch(who) => {
                self.watchers.remove(&who.id());
            }
            SystemMessage::Terminated(who, cause) => self.handle_child_terminated(&ctx, who, cause).await,
            SystemMessage::Failed(child, cause) => self.handle_child_failed(&ctx, child, cause).await,
        }
    }

    async fn run_pre_start(&self, ctx: &Context<T>) {
        self.set_state(ActorState::Starting);
        let mut behavior = self.behavior.lock().unwrap().take();
        if behavior.is_none() {
            behavior = Some(self.props.produce());
        }
        if let Some(mut b) = behavior {
            b.pre_start(ctx).await;
            *self.behavior.lock().unwrap() = Some(b);
        }
        self.enqueue_system(Envelope::new(SystemMessage::PostStart, None));
    }

    async fn run_post_start(&self, ctx: &Context<T>) {
        self.set_state(ActorState::Running);
        if let Some(mut b) = self.behavior.lock().unwrap().take() {
            b.post_start(ctx).await;
            *self.behavior.lock().unwrap() = Some(b);
        }
    }

    async fn handle_stop(&self, ctx: &Context<T>) {
        if self.state() == ActorState::Stopping {
            return;
        }
        self.set_state(ActorState::Stopping);
        self.pre_stop_done.store(false, Ordering::SeqCst);
        self.post_stop_sent.store(false, Ordering::SeqCst);

        let kids = self.children_refs();
        {
            let mut pending = self.pending_children.lock().unwrap();
            *pending = kids.iter().map(|k| k.id()).collect();
        }
        self.pending_terminations.store(kids.len(), Ordering::SeqCst);
        for kid in &kids {
            kid.stop();
        }
        self.enqueue_system(Envelope::new(SystemMessage::PreStop, None));
        self.finalize_stop_if_ready(ctx).await;
    }

    async fn handle_pre_stop(&self, ctx: &Context<T>) {
        if let Some(mut b) = self.behavior.lock().unwrap().take() {
            b.pre_stop(ctx).await;
            *self.behavior.lock().unwrap() = Some(b);
        }
        self.pre_stop_done.store(true, Ordering::SeqCst);
        self.finalize_stop_if_ready(ctx).await;
    }

    async fn finalize_stop_if_ready(&self, _ctx: &Context<T>) {
        if !self.post_stop_sent.load(Ordering::SeqCst)
            && self.pre_stop_done.load(Ordering::SeqCst)
            && self.pending_terminations.load(Ordering::SeqCst) == 0
        {
            self.post_stop_sent.store(true, Ordering::SeqCst);
            self.enqueue_system(Envelope::new(SystemMessage::PostStop, None));
        }
    }

    async fn handle_post_stop(&self, ctx: &Context<T>) {
        if let Some(mut b) = self.behavior.lock().unwrap().take() {
            b.post_stop(ctx).await;
        }
        self.set_state(ActorState::Stopped);
        // Anything still in, or later sent to, the user queue must dead-letter
        // rather than queue forever with no RUNNING drain left to claim it
        // (spec.md §6: "sends to ... terminated ids are dropped and logged").
        self.suspend_mailbox();
        self.mailbox.purge_user_queue();
        let me = self.basic_ref();
        for w in self.watchers.iter() {
            w.value().sys_tell(SystemMessage::Terminated(me.clone(), None), None);
        }
        self.watchers.clear();
        self.set_state(ActorState::Terminated);
        if let Some(system) = self.system.upgrade() {
            system.registry().unregister(&self.uri.path, self.id);
        }
        trace!(actor = %self.uri, "terminated");
    }

    async fn handle_child_terminated(&self, ctx: &Context<T>, who: BasicActorRef, _cause: Option<FailureReason>) {
        self.children.remove(who.name());
        self.watching.remove(&who.id());
        let removed_pending = self.pending_children.lock().unwrap().remove(&who.id());
        if removed_pending {
            self.pending_terminations.fetch_sub(1, Ordering::SeqCst);
        }
        if let Some(mut b) = self.behavior.lock().unwrap().take() {
            b.on_terminated(ctx, &who).await;
            *self.behavior.lock().unwrap() = Some(b);
        }
        if self.state() == ActorState::Stopping {
            self.finalize_stop_if_ready(ctx).await;
        }
    }

    async fn handle_restart(&self, ctx: &Context<T>, cause: Option<FailureReason>) {
        self.set_state(ActorState::Restarting);
        if let Some(mut b) = self.behavior.lock().unwrap().take() {
            b.pre_restart(ctx, cause.clone()).await;
            b.post_stop(ctx).await;
        }
        self.mailbox.purge_user_queue();

        self.set_state(ActorState::Starting);
        let mut new_behavior = self.props.produce();
        new_behavior.pre_start(ctx).await;
        new_behavior.post_restart(ctx).await;
        *self.behavior.lock().unwrap() = Some(new_behavior);
        self.enqueue_system(Envelope::new(SystemMessage::PostStart, None));
    }

    async fn handle_child_failed(&self, ctx: &Context<T>, child: BasicActorRef, cause: FailureReason) {
        // Any watcher of a failed actor observes `Failed` through this hook
        // (spec.md §7: Failed is watcher-observable like Terminated), but
        // only the actual parent runs the restart/escalation decision below.
        if let Some(mut b) = self.behavior.lock().unwrap().take() {
            b.on_failed(ctx, &child, &cause).await;
            *self.behavior.lock().unwrap() = Some(b);
        }

        let is_child = self
            .children
            .get(child.name())
            .map(|v| v.id() == child.id())
            .unwrap_or(false);
        if !is_child {
            return;
        }

        let key = match self.supervision_config.scope {
            Scope::OneForOne => RestartKey::Child(child.id()),
            Scope::AllForOne => RestartKey::All,
        };
        let decision = {
            let mut counters = self.restart_counters.lock().unwrap();
            counters.decide(key, &self.supervision_config, Instant::now())
        };

        match decision {
            RestartDecision::Exhausted => {
                match self.supervision_config.scope {
                    Scope::OneForOne => child.stop(),
                    Scope::AllForOne => {
                        for c in self.children_refs() {
                            c.stop();
                        }
                    }
                }
                let me = self.basic_ref();
                for w in self.watchers.iter() {
                    w.value().sys_tell(SystemMessage::Failed(me.clone(), cause.clone()), None);
                }
                tracing::error!(actor = %self.uri, child = %child.uri(), "restart budget exhausted; escalating");
            }
            RestartDecision::Apply { strategy, delay } => {
                let targets: Vec<BasicActorRef> = match self.supervision_config.scope {
                    Scope::OneForOne => vec![child.clone()],
                    Scope::AllForOne => self.children_refs(),
                };
                match strategy {
                    Strategy::Restart => {
                        for target in targets {
                            let cause = cause.clone();
                            self.dispatcher.spawn_drain(Box::pin(async move {
                                if !delay.is_zero() {
                                    tokio::time::sleep(delay).await;
                                }
                                target.sys_tell(SystemMessage::Restart(Some(cause)), None);
                            }));
                        }
                    }
                    Strategy::Stop => {
                        for target in targets {
                            target.stop();
                        }
                    }
                    Strategy::Resume => {}
                    Strategy::Escalate => {
                        let me = self.basic_ref();
                        for w in self.watchers.iter() {
                            w.value().sys_tell(SystemMessage::Failed(me.clone(), cause.clone()), None);
                        }
                    }
                }
            }
        }
    }
}

impl<T: Message> ActorReference for ActorCell<T> {
    fn id(&self) -> ActorId {
        self.id
    }

    fn uri(&self) -> &ActorUri {
        &self.uri
    }

    fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    fn parent(&self) -> Option<BasicActorRef> {
        self.parent.clone()
    }

    fn children(&self) -> Vec<BasicActorRef> {
        self.children_refs()
    }

    fn sys_tell(&self, msg: SystemMessage, _sender: Option<BasicActorRef>) {
        self.enqueue_system(Envelope::new(msg, None));
    }
}

impl<T: Message> CellInternal for ActorCell<T> {
    fn adopt_child(&self, child: BasicActorRef) {
        ActorCell::adopt_child(self, child);
    }

    fn try_tell_any(&self, mut msg: AnyMessage, sender: Option<BasicActorRef>) {
        match msg.take::<T>() {
            Some(typed) => self.enqueue_user(Envelope::new(typed, sender)),
            None => {
                info!(actor = %self.uri, "dead letter: message type mismatch on try_tell");
                if let Some(system) = self.system.upgrade() {
                    system.publish_dead_letter(self.basic_ref(), "type-mismatched AnyMessage".to_string());
                }
            }
        }
    }
}
