//! Representing the values the verifier tracks.

use std::fmt;

use itertools::Itertools;
use num_bigint::BigInt;

use crate::trace::{Name, ScopeId, ValueId};

/// Ownership state of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueState {
    /// Owned by the binding that introduced it.
    Owned,
    /// Ownership relocated to another binding at least once.
    Moved,
    /// Released. Final.
    Dropped,
}

/// A tracked value.
#[derive(Clone, PartialEq, Eq)]
pub struct Value {
    /// Identifier.
    pub id: ValueId,
    /// Current ownership state.
    pub state: ValueState,
    /// Scope in which the value was created.
    pub origin: ScopeId,
    /// Name of its current (or last) owner.
    pub owner: Name,
    /// Contents of the value, as a sequence.
    pub contents: Vec<BigInt>,
}

impl Value {
    /// Creates a new owned value.
    pub(crate) fn new(id: ValueId, origin: ScopeId, owner: Name, contents: Vec<BigInt>) -> Self {
        Self {
            id,
            state: ValueState::Owned,
            origin,
            owner,
            contents,
        }
    }

    /// Was the value released?
    pub fn is_dropped(&self) -> bool {
        self.state == ValueState::Dropped
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} {:?} by {} [{}]",
            self.id,
            self.state,
            self.owner,
            self.contents.iter().join(", ")
        )
    }
}
