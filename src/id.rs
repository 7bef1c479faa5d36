//! Actor identity: process-unique ids, hierarchical paths, and the regex
//! validation the teacher's `validate.rs` applied to names and paths.

use regex::Regex;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;

/// A process-unique, monotonically increasing actor id.
///
/// Unlike the teacher (`rand::random::<u32>()` in `uri.rs`), ids here come
/// from an atomic counter: two actors created in the same process can never
/// collide, and ids sort in creation order, which is convenient for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActorId(pub u32);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

static NEXT_ACTOR_ID: AtomicU32 = AtomicU32::new(1);

impl ActorId {
    pub fn next() -> Self {
        ActorId(NEXT_ACTOR_ID.fetch_add(1, Ordering::Relaxed))
    }
}

fn name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap())
}

fn path_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-zA-Z0-9/*._-]+$").unwrap())
}

/// An actor's simple name (one path segment) failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidName {
    pub name: String,
}

impl fmt::Display for InvalidName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\"{}\" is not a valid actor name: must match [a-zA-Z0-9_-]+",
            self.name
        )
    }
}

impl std::error::Error for InvalidName {}

/// A selection/actor path string failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidPath {
    pub path: String,
}

impl fmt::Display for InvalidPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\"{}\" is not a valid actor path: must match [a-zA-Z0-9/*._-]+",
            self.path
        )
    }
}

impl std::error::Error for InvalidPath {}

pub fn validate_name(name: &str) -> Result<(), InvalidName> {
    if name_regex().is_match(name) {
        Ok(())
    } else {
        Err(InvalidName { name: name.into() })
    }
}

pub fn validate_path(path: &str) -> Result<(), InvalidPath> {
    if path_regex().is_match(path) {
        Ok(())
    } else {
        Err(InvalidPath { path: path.into() })
    }
}

/// A `/`-joined hierarchical actor path, e.g. `/user/parent/child`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActorPath(String);

impl ActorPath {
    pub fn root() -> Self {
        ActorPath("/".to_string())
    }

    pub fn child(&self, name: &str) -> Self {
        if self.0.ends_with('/') {
            ActorPath(format!("{}{}", self.0, name))
        } else {
            ActorPath(format!("{}/{}", self.0, name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The final path segment, e.g. `"child"` for `/user/parent/child`.
    pub fn name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }
}

impl fmt::Display for ActorPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Full address of an actor: its path, the id distinguishing it from any
/// dead predecessor that once held the same path, and a host field kept
/// for forward compatibility with a remote transport (never used to route —
/// remote networking is out of scope, per spec.md §1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorUri {
    pub path: ActorPath,
    pub id: ActorId,
    pub host: String,
}

impl ActorUri {
    pub fn new(path: ActorPath, id: ActorId) -> Self {
        ActorUri {
            path,
            id,
            host: "localhost".to_string(),
        }
    }

    pub fn name(&self) -> &str {
        self.path.name()
    }
}

impl fmt::Display for ActorUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.path, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_monotonic_and_unique() {
        let a = ActorId::next();
        let b = ActorId::next();
        assert!(b.0 > a.0);
    }

    #[test]
    fn name_validation_rejects_path_separators() {
        assert!(validate_name("worker-1").is_ok());
        assert!(validate_name("worker/1").is_err());
        assert!(validate_name("").is_err());
    }

    #[test]
    fn path_child_joins_with_slash() {
        let root = ActorPath::root();
        let user = root.child("user");
        let child = user.child("alice");
        assert_eq!(child.as_str(), "/user/alice");
        assert_eq!(child.name(), "alice");
    }
}
