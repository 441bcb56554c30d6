//! Tracking borrows.
//!
//! The [`Ledger`] records every borrow request, and for each value the set of
//! loans it has conceded. The [`Loans`] table of a value can never hold two
//! conflicting borrows.

mod borrow;
mod ledger;
mod loans;

pub use borrow::{Borrow, BorrowKind, BorrowStatus, Borrows};
pub use ledger::Ledger;
pub use loans::Loans;
