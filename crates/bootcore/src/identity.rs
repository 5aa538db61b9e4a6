//! Object identity.
//!
//! Every runtime object receives an index from a single process-wide counter
//! when it is constructed. The counter starts at zero, only ever moves
//! forward, and has no reset: two objects never share an index, whether or
//! not the first one is still alive.
//!
//! The [`RuntimeObject`] trait is the capability every runtime type exposes:
//! its identity, the name it displays under, and a downcast to
//! [`ByteString`] used by content equality.
use core::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

use crate::ByteString;

static NEXT_INDEX: AtomicU64 = AtomicU64::new(0);

/// The immutable index assigned to an object at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identity(u64);

impl Identity {
    /// Claims the next index from the process-wide counter.
    ///
    /// Safe to call from any thread; concurrent callers always observe
    /// distinct pre-increment values.
    #[must_use]
    pub fn next() -> Self {
        Identity(NEXT_INDEX.fetch_add(1, Ordering::Relaxed))
    }

    #[must_use]
    pub fn index(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Capabilities shared by every runtime object.
pub trait RuntimeObject {
    fn identity(&self) -> Identity;

    /// The display name of the object's type, fixed at construction.
    fn type_name(&self) -> &'static str;

    /// Returns `Some` when the object is string-like.
    fn as_byte_string(&self) -> Option<&ByteString> {
        None
    }

    /// Base equality: two references denote the same object.
    fn same_object(&self, other: &dyn RuntimeObject) -> bool {
        self.identity() == other.identity()
    }

    /// Renders `TypeName(index=N)`.
    fn describe(&self) -> ByteString {
        ByteString::from(format!("{}(index={})", self.type_name(), self.identity()))
    }
}

/// A plain runtime object with no state beyond its identity.
#[derive(Debug)]
pub struct Object {
    identity: Identity,
    type_name: &'static str,
}

impl Object {
    #[must_use]
    pub fn new() -> Self {
        Self::named("Object")
    }

    /// Creates an object that displays under `type_name`.
    #[must_use]
    pub fn named(type_name: &'static str) -> Self {
        Self {
            identity: Identity::next(),
            type_name,
        }
    }
}

impl Default for Object {
    fn default() -> Self {
        Self::new()
    }
}

impl RuntimeObject for Object {
    fn identity(&self) -> Identity {
        self.identity
    }

    fn type_name(&self) -> &'static str {
        self.type_name
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn sequential_objects_get_strictly_increasing_indices() {
        let objects: Vec<Object> = (0..32).map(|_| Object::new()).collect();
        for pair in objects.windows(2) {
            assert!(pair[0].identity() < pair[1].identity());
        }
    }

    #[test]
    fn concurrent_construction_never_repeats_an_index() {
        let handles: Vec<_> = (0..8)
            .map(|_| thread::spawn(|| (0..500).map(|_| Identity::next()).collect::<Vec<_>>()))
            .collect();

        let mut seen: Vec<Identity> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        let total = seen.len();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), total);
    }

    #[test]
    fn describe_uses_type_name_and_index() {
        let object = Object::named("Hangman");
        let expected = format!("Hangman(index={})", object.identity().index());
        assert_eq!(object.describe(), expected.as_str());
    }

    #[test]
    fn base_equality_is_identity() {
        let a = Object::new();
        let b = Object::new();
        assert!(a.same_object(&a));
        assert!(!a.same_object(&b));
    }
}
