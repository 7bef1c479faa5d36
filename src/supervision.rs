//! Supervision engine: restart policy, backoff, scope, and the restart
//! counters a parent keeps per child (spec.md §4.3).
//!
//! Grounded on the teacher's `Strategy` enum (`src/actor/actor.rs`) extended
//! with the scope/backoff/window fields spec.md §3 requires; the teacher
//! never implemented geometric backoff with jitter, so that part is new
//! code written in the teacher's plain, no-comment style.

use rand::Rng;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// What a parent does about a failed child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Restart,
    Stop,
    Resume,
    Escalate,
}

/// Whether a decision applies only to the failing child or to every child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    OneForOne,
    AllForOne,
}

/// Per-parent supervision policy, attached via `Props`.
#[derive(Debug, Clone, Copy)]
pub struct SupervisionConfig {
    pub strategy: Strategy,
    pub scope: Scope,
    pub max_restarts: u32,
    pub within: Duration,
    pub backoff_min: Duration,
    pub backoff_max: Duration,
    pub backoff_factor: f64,
    pub jitter: f64,
}

impl Default for SupervisionConfig {
    fn default() -> Self {
        SupervisionConfig {
            strategy: Strategy::Restart,
            scope: Scope::OneForOne,
            max_restarts: 10,
            within: Duration::from_secs(60),
            backoff_min: Duration::from_millis(20),
            backoff_max: Duration::from_millis(2000),
            backoff_factor: 2.0,
            jitter: 0.1,
        }
    }
}

impl SupervisionConfig {
    /// Geometric backoff for the `count`-th restart (1-indexed), scaled by
    /// a uniform jitter in `[1-jitter, 1+jitter]`, clamped into
    /// `[backoff_min, backoff_max]` and never negative (spec.md §4.3, §8
    /// invariant 9).
    pub fn backoff_for(&self, count: u32) -> Duration {
        let exp = count.saturating_sub(1) as f64;
        let raw = self.backoff_min.as_secs_f64() * self.backoff_factor.powf(exp);
        let capped = raw.min(self.backoff_max.as_secs_f64());
        let jitter = if self.jitter <= 0.0 {
            1.0
        } else {
            let mut rng = rand::thread_rng();
            rng.gen_range((1.0 - self.jitter).max(0.0)..=(1.0 + self.jitter))
        };
        let scaled = (capped * jitter).max(0.0);
        Duration::from_secs_f64(scaled)
    }
}

/// Key under which a restart counter is tracked: the failing child's id
/// under `OneForOne`, or a fixed sentinel shared by the whole set under
/// `AllForOne`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RestartKey {
    Child(crate::id::ActorId),
    All,
}

#[derive(Debug, Clone)]
struct RestartCounter {
    count: u32,
    window_start: Instant,
}

/// Tracks restart counts per key within a rolling window, owned by a
/// parent's cell and touched only from its own worker (spec.md §5: "touched
/// only on its worker").
#[derive(Debug, Default)]
pub struct RestartCounters {
    counters: HashMap<RestartKey, RestartCounter>,
}

pub enum RestartDecision {
    /// Apply `strategy` after an optional backoff delay.
    Apply { strategy: Strategy, delay: Duration },
    /// The restart budget for this key is exhausted: stop and escalate.
    Exhausted,
}

impl RestartCounters {
    pub fn decide(&mut self, key: RestartKey, config: &SupervisionConfig, now: Instant) -> RestartDecision {
        let entry = self.counters.entry(key).or_insert(RestartCounter {
            count: 0,
            window_start: now,
        });
        if now.duration_since(entry.window_start) > config.within {
            entry.count = 0;
            entry.window_start = now;
        }
        entry.count += 1;
        if entry.count > config.max_restarts {
            return RestartDecision::Exhausted;
        }
        let delay = if config.strategy == Strategy::Restart {
            config.backoff_for(entry.count)
        } else {
            Duration::ZERO
        };
        RestartDecision::Apply {
            strategy: config.strategy,
            delay,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_grows_geometrically_without_jitter() {
        let cfg = SupervisionConfig {
            jitter: 0.0,
            backoff_min: Duration::from_millis(20),
            backoff_max: Duration::from_millis(200),
            backoff_factor: 2.0,
            ..Default::default()
        };
        assert_eq!(cfg.backoff_for(1), Duration::from_millis(20));
        assert_eq!(cfg.backoff_for(2), Duration::from_millis(40));
        assert_eq!(cfg.backoff_for(3), Duration::from_millis(80));
    }

    #[test]
    fn counters_exhaust_after_max_restarts() {
        let cfg = SupervisionConfig {
            max_restarts: 2,
            within: Duration::from_secs(1),
            ..Default::default()
        };
        let mut counters = RestartCounters::default();
        let key = RestartKey::All;
        let now = Instant::now();
        assert!(matches!(
            counters.decide(key, &cfg, now),
            RestartDecision::Apply { .. }
        ));
        assert!(matches!(
            counters.decide(key, &cfg, now),
            RestartDecision::Apply { .. }
        ));
        assert!(matches!(
            counters.decide(key, &cfg, now),
            RestartDecision::Exhausted
        ));
    }
}
