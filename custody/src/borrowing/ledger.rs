//! The borrow ledger: every borrow requested so far, and the loans each value
//! has conceded.

use std::collections::HashMap;
use std::fmt;

use super::{Borrow, BorrowKind, BorrowStatus, Loans};
use crate::reporter::{Checked, DiagnosticKind, Violation};
use crate::trace::{BorrowId, Name, ScopeId, ValueId};

/// Loans of a value that was never borrowed.
static NO_LOANS: Loans = Loans::None;

/// What became of a borrow request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    /// The borrow was granted.
    Granted(Borrow),
    /// The request was refused.
    Rejected,
}

/// A loan ledger.
#[derive(Default)]
pub struct Ledger {
    /// All borrow requests, indexed by their identifier.
    slots: Vec<Slot>,
    /// Map between values and their active loans.
    ///
    /// Invariant: a borrow is in `self.loans` iff its slot is `Granted` and
    /// `Active`.
    loans: HashMap<ValueId, Loans>,
}

impl Ledger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Identifier of the next borrow request.
    pub fn next_id(&self) -> BorrowId {
        BorrowId(self.slots.len())
    }

    /// Requests a borrow of kind `kind` of `value`, reached through `name`,
    /// bounded by `scope`.
    ///
    /// A refused request still consumes its identifier.
    pub fn request(
        &mut self,
        kind: BorrowKind,
        name: &Name,
        value: ValueId,
        scope: ScopeId,
    ) -> Checked<BorrowId> {
        let id = self.next_id();
        let loans = self.loans.entry(value).or_default();
        if loans.insert(id, kind) {
            self.slots.push(Slot::Granted(Borrow {
                id,
                value,
                scope,
                kind,
                status: BorrowStatus::Active,
            }));
            return Ok(id);
        }

        let blockers = loans.blockers(kind);
        self.slots.push(Slot::Rejected);
        let violation = match kind {
            BorrowKind::Mutable => Violation::new(
                DiagnosticKind::MutableBorrowConflict,
                format!("cannot borrow {name} mutably, it is already borrowed by {blockers:?}"),
            ),
            BorrowKind::Shared => Violation::new(
                DiagnosticKind::SharedBorrowConflict,
                format!("cannot borrow {name}, it is mutably borrowed by {blockers:?}"),
            ),
        };
        Err(violation.with(name).with(value).with(id).with_all(blockers))
    }

    /// Records a request that was refused before reaching the ledger.
    pub fn refuse(&mut self) -> BorrowId {
        let id = self.next_id();
        self.slots.push(Slot::Rejected);
        id
    }

    /// Ends a borrow explicitly.
    ///
    /// Ending a rejected borrow does nothing, since its refusal was already
    /// reported.
    pub fn release(&mut self, id: BorrowId) -> Checked<()> {
        let Some(slot) = self.slots.get_mut(id.0) else {
            return Err(Violation::new(
                DiagnosticKind::MalformedReference,
                format!("borrow {id:?} was never requested"),
            )
            .with(id));
        };
        let Slot::Granted(borrow) = slot else {
            return Ok(());
        };
        match borrow.status {
            BorrowStatus::Active => {
                borrow.status = BorrowStatus::Released;
                let value = borrow.value;
                self.unloan(value, id);
                Ok(())
            }
            status => Err(Violation::new(
                DiagnosticKind::DoubleRelease,
                format!("borrow {id:?} is already {}", fmt_status(status)),
            )
            .with(id)
            .with(borrow.value)),
        }
    }

    /// Expires all the still active borrows among `ids`, returning those.
    pub fn expire(&mut self, ids: impl IntoIterator<Item = BorrowId>) -> Vec<BorrowId> {
        let mut expired = vec![];
        for id in ids {
            let Some(Slot::Granted(borrow)) = self.slots.get_mut(id.0) else {
                continue;
            };
            if borrow.is_active() {
                borrow.status = BorrowStatus::Expired;
                let value = borrow.value;
                self.unloan(value, id);
                expired.push(id);
            }
        }
        expired
    }

    /// Does `value` have any active borrow?
    pub fn is_borrowed(&self, value: ValueId) -> bool {
        !self.loans(value).is_empty()
    }

    /// Active loans of `value`.
    pub fn loans(&self, value: ValueId) -> &Loans {
        self.loans.get(&value).unwrap_or(&NO_LOANS)
    }

    /// Active borrows of `value`, in identifier order.
    pub fn active(&self, value: ValueId) -> Vec<Borrow> {
        self.loans(value)
            .iter()
            .filter_map(|id| self.get(id))
            .collect()
    }

    /// Gets a granted borrow.
    pub fn get(&self, id: BorrowId) -> Option<Borrow> {
        match self.slots.get(id.0)? {
            Slot::Granted(borrow) => Some(*borrow),
            Slot::Rejected => None,
        }
    }

    /// Status of a borrow, if it was ever requested.
    pub fn status(&self, id: BorrowId) -> Option<BorrowStatus> {
        self.slots.get(id.0).map(|slot| match slot {
            Slot::Granted(borrow) => borrow.status,
            Slot::Rejected => BorrowStatus::Rejected,
        })
    }

    /// Removes `id` from the loans of `value`.
    fn unloan(&mut self, value: ValueId, id: BorrowId) {
        let loans = self.loans.entry(value).or_default();
        let removed = loans.remove(id);
        debug_assert!(removed, "Ledger error: {id:?} missing from the loans of {value:?}");
        if loans.is_empty() {
            self.loans.remove(&value);
        }
    }
}

fn fmt_status(status: BorrowStatus) -> &'static str {
    match status {
        BorrowStatus::Active => "active",
        BorrowStatus::Released => "released",
        BorrowStatus::Expired => "expired with its scope",
        BorrowStatus::Rejected => "rejected",
    }
}

impl fmt::Debug for Ledger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.loans.iter().filter(|(_, loans)| !loans.is_empty()))
            .finish()
    }
}
