use actorium::actors::{ActorSystem, Props};

#[test]
fn system_has_the_given_name() {
    let system = ActorSystem::new("named-system");
    assert_eq!(system.name(), "named-system");
}

#[test]
fn default_config_matches_documented_defaults() {
    let system = ActorSystem::new("default-config");
    let config = system.config();
    assert_eq!(config.mailbox.msg_process_limit, 1);
    assert_eq!(config.supervision.max_restarts, 10);
    assert_eq!(config.scheduler.frequency_millis, 50);
}

#[test]
fn dead_letters_ref_is_stable_across_calls() {
    let system = ActorSystem::new("dead-letters-stable");
    let first = system.dead_letters();
    let second = system.dead_letters();
    assert_eq!(first.id(), second.id());
}

#[test]
fn scheduler_and_executor_are_singletons_per_system() {
    let system = ActorSystem::new("extensions-singleton");
    let s1 = system.scheduler();
    let s2 = system.scheduler();
    assert!(std::sync::Arc::ptr_eq(&s1, &s2));

    let e1 = system.executor();
    let e2 = system.executor();
    assert!(std::sync::Arc::ptr_eq(&e1, &e2));
}

#[test]
fn two_systems_do_not_share_extensions_or_dead_letters() {
    let a = ActorSystem::new("system-a");
    let b = ActorSystem::new("system-b");
    assert!(!std::sync::Arc::ptr_eq(&a.scheduler(), &b.scheduler()));
    assert_ne!(a.dead_letters().id(), b.dead_letters().id());
}

#[test]
fn actor_of_rejects_a_duplicate_name_under_the_same_parent() {
    use actorium::actors::{Actor, Context, Directive};
    use async_trait::async_trait;

    struct NoOp;
    #[async_trait]
    impl Actor for NoOp {
        type Msg = ();
        async fn receive(&mut self, _ctx: &Context<Self::Msg>, _msg: Self::Msg) -> Directive<Self::Msg> {
            Directive::Same
        }
    }

    let system = ActorSystem::new("dup-name");
    assert!(system.actor_of::<NoOp>(Props::new(|| NoOp), "taken").is_ok());
    assert!(system.actor_of::<NoOp>(Props::new(|| NoOp), "taken").is_err());
}
