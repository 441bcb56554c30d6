//! Choosing how a sequence is transformed, depending on the access one has to
//! it.
//!
//! Exclusive access allows overwriting the elements in place. Shared access
//! only allows reading them, so the result goes into a brand new sequence.

use num_bigint::BigInt;

use crate::borrowing::{BorrowKind, Loans};
use crate::reporter::DiagnosticKind;
use crate::trace::ElementFn;

/// The two ways of transforming a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// Overwrites the elements of the sequence.
    InPlace,
    /// Writes the transformed elements into a new sequence.
    Projection,
}

impl Transform {
    /// Kind of access the transform needs.
    pub fn access(self) -> BorrowKind {
        match self {
            Transform::InPlace => BorrowKind::Mutable,
            Transform::Projection => BorrowKind::Shared,
        }
    }

    /// Can the transform happen while the sequence has these active loans?
    ///
    /// An in-place mutation goes through the owner or through its only mutable
    /// borrow, so it is refused as soon as someone shares the sequence. A
    /// projection only reads, so it is refused while someone may be writing.
    pub fn admits(self, loans: &Loans) -> bool {
        match self {
            Transform::InPlace => !matches!(loans, Loans::Immut(_)),
            Transform::Projection => !loans.is_mut(),
        }
    }

    /// Violation reported when the transform is not admitted.
    pub fn conflict(self) -> DiagnosticKind {
        match self {
            Transform::InPlace => DiagnosticKind::MutableBorrowConflict,
            Transform::Projection => DiagnosticKind::SharedBorrowConflict,
        }
    }
}

/// Applies `func` to every element of `seq`, in place.
pub fn map_in_place(seq: &mut [BigInt], func: &ElementFn) {
    for element in seq.iter_mut() {
        *element = func.apply(element);
    }
}

/// Applies `func` to every element of `seq`, into a new sequence.
pub fn project(seq: &[BigInt], func: &ElementFn) -> Vec<BigInt> {
    seq.iter().map(|element| func.apply(element)).collect()
}
