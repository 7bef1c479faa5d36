//! Actor selection: resolving a path string to zero or more live refs,
//! with a single `*` wildcard segment (spec.md §2's ambient addition).
//!
//! Grounded on the teacher's `validate_path` regex (any segment made of
//! `a-zA-Z0-9._-` or the literal `*`) plus `kernel/provider.rs`'s path-keyed
//! registry; the wildcard match itself has no teacher equivalent and is
//! written fresh, matching one path segment per `*` rather than a recursive
//! glob.

use crate::actor::actor_ref::BasicActorRef;
use crate::system::system::ActorSystem;

/// Resolves `path` (e.g. `/user/workers/*` or `/user/worker-3`) against the
/// live registry. A `*` matches exactly one path segment.
pub fn select(system: &ActorSystem, path: &str) -> Vec<BasicActorRef> {
    let wanted: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    system
        .registry()
        .all_paths()
        .into_iter()
        .filter_map(|candidate| {
            let segs: Vec<&str> = candidate.split('/').filter(|s| !s.is_empty()).collect();
            if segments_match(&wanted, &segs) {
                system.registry().by_path(&candidate)
            } else {
                None
            }
        })
        .collect()
}

fn segments_match(wanted: &[&str], actual: &[&str]) -> bool {
    if wanted.len() != actual.len() {
        return false;
    }
    wanted.iter().zip(actual.iter()).all(|(w, a)| *w == "*" || w == a)
}

#[cfg(test)]
mod tests {
    use super::segments_match;

    #[test]
    fn wildcard_matches_one_segment() {
        assert!(segments_match(&["user", "workers", "*"], &["user", "workers", "w1"]));
        assert!(!segments_match(&["user", "workers", "*"], &["user", "workers", "w1", "extra"]));
    }
}
