//! Specifying loans, and in particular the laws of loans.
//!
//! Law of loans, for any value:
//! * no two mutable borrows may be active at once
//! * there cannot be an active mutable borrow if there is an active immutable
//!   one
//!
//! [`Loans`] cannot represent a state that breaks these laws: inserting a
//! borrow that would break them is refused.

use super::{BorrowKind, Borrows};
use crate::trace::BorrowId;
use crate::utils::boxed;

/// Set of active loans of a value.
///
/// Is more precise than a simple set of borrows in that it maintains the
/// invariant that there is always:
/// * at most one mutable borrow
/// * no mutable borrow if there is at least one immutable borrow
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Loans {
    /// Only one mutable loan.
    Mut(BorrowId),
    /// Only immutable loans.
    ///
    /// Invariant: never empty.
    Immut(Borrows),
    /// No loan.
    #[default]
    None,
}

impl Loans {
    /// Removes a borrow from the [`Loans`], returning `true` iff the borrow was
    /// found (and removed).
    pub fn remove(&mut self, borrow: BorrowId) -> bool {
        match self {
            Loans::Mut(borrow2) => {
                if borrow == *borrow2 {
                    *self = Loans::None;
                    true
                } else {
                    false
                }
            }
            Loans::Immut(borrows) => {
                let was_there = borrows.remove(&borrow);
                if borrows.is_empty() {
                    *self = Loans::None;
                }
                was_there
            }
            Loans::None => false,
        }
    }

    /// Inserts a borrow in the [`Loans`].
    ///
    /// Returns `false`, leaving the loans untouched, if the borrow could not
    /// be inserted without violating the law of loans.
    pub fn insert(&mut self, borrow: BorrowId, kind: BorrowKind) -> bool {
        match (kind, &mut *self) {
            (BorrowKind::Mutable, Loans::None) => {
                *self = Loans::Mut(borrow);
                true
            }
            (BorrowKind::Shared, Loans::None) => {
                *self = Loans::Immut([borrow].into());
                true
            }
            (BorrowKind::Shared, Loans::Immut(borrows)) => {
                borrows.insert(borrow);
                true
            }
            (_, _) => false,
        }
    }

    /// The loans that prevent a borrow of kind `kind` from being granted.
    pub fn blockers(&self, kind: BorrowKind) -> Vec<BorrowId> {
        match (kind, self) {
            (_, Loans::Mut(borrow)) => vec![*borrow],
            (BorrowKind::Mutable, Loans::Immut(borrows)) => borrows.iter().copied().collect(),
            _ => vec![],
        }
    }

    /// Gets an iterator over all the borrows in the [`Loans`].
    pub fn iter<'a>(&'a self) -> Box<dyn Iterator<Item = BorrowId> + 'a> {
        match self {
            Loans::None => boxed(std::iter::empty()),
            Loans::Mut(borrow) => boxed(std::iter::once(*borrow)),
            Loans::Immut(borrows) => boxed(borrows.iter().copied()),
        }
    }

    /// Is there no active loan?
    pub fn is_empty(&self) -> bool {
        matches!(self, Loans::None)
    }

    /// Is there an active mutable loan?
    pub fn is_mut(&self) -> bool {
        matches!(self, Loans::Mut(_))
    }
}

impl From<Loans> for Borrows {
    fn from(loans: Loans) -> Self {
        match loans {
            Loans::Mut(borrow) => [borrow].into(),
            Loans::Immut(borrows) => borrows,
            Loans::None => Borrows::new(),
        }
    }
}
