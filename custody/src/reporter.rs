//! Violation records and the facility that collects them.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam_queue::SegQueue;
use itertools::Itertools;

use crate::codes::*;
use crate::trace::{BorrowId, Name, ScopeId, ValueId};

/// Kinds of violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// Name not bound in any visible scope.
    UnboundNameReferenced,
    /// Name already bound in an enclosing scope, or value not fresh.
    DuplicateBinding,
    /// Binding used after its value moved away.
    UseAfterMove,
    /// Binding used after its value was dropped.
    UseAfterDrop,
    /// Value moved or dropped while borrowed.
    MoveWhileBorrowed,
    /// Exclusive access while already borrowed.
    MutableBorrowConflict,
    /// Shared access while mutably borrowed.
    SharedBorrowConflict,
    /// Borrow ended twice.
    DoubleRelease,
    /// Value dropped twice.
    DoubleDrop,
    /// Borrow bounded by a scope that outlives the borrowed value.
    BorrowOutlivesValue,
    /// Scope closed out of order. Fatal.
    ScopeOrderViolation,
    /// Reference to a non-existent scope, borrow or value. Fatal.
    MalformedReference,
}

impl DiagnosticKind {
    /// Does this kind of violation stop the verification pass?
    pub fn is_fatal(self) -> bool {
        matches!(
            self,
            DiagnosticKind::ScopeOrderViolation | DiagnosticKind::MalformedReference
        )
    }

    /// Stable error code of this kind.
    pub fn code(self) -> &'static str {
        match self {
            DiagnosticKind::UnboundNameReferenced => UNBOUND_NAME_ERROR,
            DiagnosticKind::DuplicateBinding => DUPLICATE_BINDING_ERROR,
            DiagnosticKind::UseAfterMove => USE_AFTER_MOVE_ERROR,
            DiagnosticKind::UseAfterDrop => USE_AFTER_DROP_ERROR,
            DiagnosticKind::MoveWhileBorrowed => MOVE_WHILE_BORROWED_ERROR,
            DiagnosticKind::MutableBorrowConflict => MUTABLE_BORROW_CONFLICT_ERROR,
            DiagnosticKind::SharedBorrowConflict => SHARED_BORROW_CONFLICT_ERROR,
            DiagnosticKind::DoubleRelease => DOUBLE_RELEASE_ERROR,
            DiagnosticKind::DoubleDrop => DOUBLE_DROP_ERROR,
            DiagnosticKind::BorrowOutlivesValue => BORROW_OUTLIVES_VALUE_ERROR,
            DiagnosticKind::ScopeOrderViolation => SCOPE_ORDER_ERROR,
            DiagnosticKind::MalformedReference => MALFORMED_REFERENCE_ERROR,
        }
    }

    /// One-line summary of this kind.
    pub fn message(self) -> &'static str {
        match self {
            DiagnosticKind::UnboundNameReferenced => "unbound name",
            DiagnosticKind::DuplicateBinding => "duplicate binding",
            DiagnosticKind::UseAfterMove => "use of moved value",
            DiagnosticKind::UseAfterDrop => "use of dropped value",
            DiagnosticKind::MoveWhileBorrowed => "cannot move out of borrowed value",
            DiagnosticKind::MutableBorrowConflict => "cannot get exclusive access",
            DiagnosticKind::SharedBorrowConflict => "cannot get shared access",
            DiagnosticKind::DoubleRelease => "borrow released twice",
            DiagnosticKind::DoubleDrop => "value dropped twice",
            DiagnosticKind::BorrowOutlivesValue => "borrowed value does not live long enough",
            DiagnosticKind::ScopeOrderViolation => "scopes closed out of order",
            DiagnosticKind::MalformedReference => "malformed reference",
        }
    }
}

/// An entity involved in a violation.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Involved {
    /// A binding name.
    Name(Name),
    /// A value.
    Value(ValueId),
    /// A borrow.
    Borrow(BorrowId),
    /// A scope.
    Scope(ScopeId),
}

impl fmt::Debug for Involved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Involved::Name(name) => name.fmt(f),
            Involved::Value(value) => value.fmt(f),
            Involved::Borrow(borrow) => borrow.fmt(f),
            Involved::Scope(scope) => scope.fmt(f),
        }
    }
}

impl From<Name> for Involved {
    fn from(name: Name) -> Self {
        Involved::Name(name)
    }
}

impl From<&Name> for Involved {
    fn from(name: &Name) -> Self {
        Involved::Name(name.clone())
    }
}

impl From<ValueId> for Involved {
    fn from(value: ValueId) -> Self {
        Involved::Value(value)
    }
}

impl From<BorrowId> for Involved {
    fn from(borrow: BorrowId) -> Self {
        Involved::Borrow(borrow)
    }
}

impl From<ScopeId> for Involved {
    fn from(scope: ScopeId) -> Self {
        Involved::Scope(scope)
    }
}

/// A violation detected while applying an operation, not yet tied to the
/// position of that operation in the trace.
#[derive(Clone, PartialEq, Eq)]
pub struct Violation {
    /// Kind of violation.
    kind: DiagnosticKind,
    /// Entities involved.
    involved: Vec<Involved>,
    /// Human-readable detail.
    detail: String,
}

impl Violation {
    /// Creates a new violation.
    pub fn new(kind: DiagnosticKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            involved: vec![],
            detail: detail.into(),
        }
    }

    /// Adds an involved entity.
    pub fn with(mut self, involved: impl Into<Involved>) -> Self {
        let involved = involved.into();
        if !self.involved.contains(&involved) {
            self.involved.push(involved);
        }
        self
    }

    /// Adds several involved entities.
    pub fn with_all<I: Into<Involved>>(mut self, involved: impl IntoIterator<Item = I>) -> Self {
        for entity in involved {
            self = self.with(entity);
        }
        self
    }

    /// Kind of the violation.
    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    /// Ties the violation to operation number `op`.
    pub fn at(self, op: usize) -> Diagnostic {
        Diagnostic {
            op,
            kind: self.kind,
            involved: self.involved,
            detail: self.detail,
        }
    }
}

impl fmt::Debug for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.detail)
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.message(), self.detail)
    }
}

impl std::error::Error for Violation {}

/// Convenience type for the operations of the engine components.
pub type Checked<T> = Result<T, Violation>;

/// A detected violation, tied to the operation that caused it.
#[derive(Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Index of the operation in the trace.
    op: usize,
    /// Kind of violation.
    kind: DiagnosticKind,
    /// Entities involved, most relevant first.
    involved: Vec<Involved>,
    /// Human-readable detail.
    detail: String,
}

impl Diagnostic {
    /// Index of the faulty operation in the trace.
    pub fn op(&self) -> usize {
        self.op
    }

    /// Kind of violation.
    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    /// Error code.
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Entities involved, most relevant first.
    pub fn involved(&self) -> &[Involved] {
        &self.involved
    }

    /// Human-readable detail.
    pub fn detail(&self) -> &str {
        &self.detail
    }

    /// Did this violation stop the pass?
    pub fn is_fatal(&self) -> bool {
        self.kind.is_fatal()
    }

    /// Is `entity` involved in this violation?
    pub fn involves(&self, entity: impl Into<Involved>) -> bool {
        self.involved.contains(&entity.into())
    }
}

impl fmt::Debug for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] op #{}: {}: {} ({:?})",
            self.code(),
            self.op,
            self.kind.message(),
            self.detail,
            self.involved.iter().format(", ")
        )
    }
}

/// Collection of diagnostics, in emission order.
#[derive(Default)]
pub struct Diagnostics {
    /// The actual list of diagnostics.
    diagnostics: SegQueue<Diagnostic>,
    /// True iff `self.diagnostics` contains at least one fatal diagnostic.
    is_fatal: AtomicBool,
}

impl Diagnostics {
    /// Pushes a new diagnostic to the list.
    pub fn push(&self, diagnostic: Diagnostic) {
        self.is_fatal
            .fetch_or(diagnostic.is_fatal(), Ordering::Relaxed);
        self.diagnostics.push(diagnostic);
    }

    /// Number of diagnostics.
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Are there no diagnostics at all?
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Flushes all diagnostics and returns them, leaving self's own diagnostic
    /// list empty and ready to receive new ones.
    fn flush(&mut self) -> Diagnostics {
        Diagnostics {
            diagnostics: std::mem::take(&mut self.diagnostics),
            // Revert fatal flag and get it back
            is_fatal: AtomicBool::new(self.is_fatal.swap(false, Ordering::SeqCst)),
        }
    }
}

impl IntoIterator for Diagnostics {
    type IntoIter = ::std::vec::IntoIter<Diagnostic>;
    type Item = Diagnostic;

    fn into_iter(self) -> Self::IntoIter {
        let mut res = vec![];
        while let Some(diagnostic) = self.diagnostics.pop() {
            res.push(diagnostic);
        }
        res.into_iter()
    }
}

/// Verification reporter.
///
/// Collects any diagnostics emitted during verification.
#[derive(Default)]
pub struct Reporter {
    /// The actual diagnostics.
    diagnostics: Diagnostics,
}

impl Reporter {
    /// Create a new `Reporter`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a diagnostic.
    pub fn emit(&self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Flushes all diagnostics and returns them.
    pub fn flush(&mut self) -> Diagnostics {
        self.diagnostics.flush()
    }

    /// Was there any diagnostic so far?
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// Was there a fatal diagnostic so far?
    pub fn has_fatal(&self) -> bool {
        self.diagnostics.is_fatal.load(Ordering::SeqCst)
    }
}
