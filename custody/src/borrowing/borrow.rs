//! Defining the notion of borrows.

use std::fmt;

use crate::trace::{BorrowId, ScopeId, ValueId};
use crate::utils::Set;

/// Kind of access a borrow grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BorrowKind {
    /// Read-only access, shareable.
    Shared,
    /// Exclusive access.
    Mutable,
}

/// Where a borrow stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BorrowStatus {
    /// Granted and not ended yet.
    Active,
    /// Ended explicitly.
    Released,
    /// Ended with the scope bounding it.
    Expired,
    /// Refused when requested.
    Rejected,
}

/// A granted borrow.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Borrow {
    /// Identifier.
    pub id: BorrowId,
    /// Borrowed value.
    pub value: ValueId,
    /// Scope bounding the borrow.
    pub scope: ScopeId,
    /// Access it grants.
    pub kind: BorrowKind,
    /// Where it stands.
    pub status: BorrowStatus,
}

impl Borrow {
    /// Is it a mutable borrow?
    pub fn mutable(&self) -> bool {
        self.kind == BorrowKind::Mutable
    }

    /// Is it still active?
    pub fn is_active(&self) -> bool {
        self.status == BorrowStatus::Active
    }
}

impl fmt::Debug for Borrow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.mutable() { "&mut " } else { "&" };
        write!(
            f,
            "{:?}: {kind}{:?} in {:?} ({:?})",
            self.id, self.value, self.scope, self.status
        )
    }
}

/// Set of borrows.
pub type Borrows = Set<BorrowId>;
