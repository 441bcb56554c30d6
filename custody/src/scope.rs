//! Defining the scope stack, and what happens when a scope ends.

use std::collections::HashMap;
use std::fmt;

use crate::borrowing::Ledger;
use crate::ownership::{BindingKey, Ownership};
use crate::reporter::{Checked, DiagnosticKind, Violation};
use crate::trace::{BorrowId, Name, ScopeId, ValueId};

/// One open scope.
pub(crate) struct Frame {
    /// Identifier of the scope.
    pub id: ScopeId,
    /// Visible bindings, by name.
    ///
    /// A name bound twice in this scope maps to its latest binding.
    names: HashMap<Name, BindingKey>,
    /// All bindings created in this scope, shadowed ones included, in creation
    /// order.
    pub bindings: Vec<BindingKey>,
    /// Borrows bounded by this scope, in creation order.
    pub borrows: Vec<BorrowId>,
}

impl Frame {
    /// A fresh, empty scope.
    fn new(id: ScopeId) -> Self {
        Self {
            id,
            names: HashMap::new(),
            bindings: vec![],
            borrows: vec![],
        }
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}{:?}", self.id, self.names)
    }
}

/// Stack of open scopes.
///
/// Hash tables with different layers that can be pushed and pop'ed. Starts
/// with the root scope open.
///
/// Invariant: scopes are numbered in opening order, so the ids in `frames` are
/// strictly increasing.
pub(crate) struct ScopeStack {
    /// Open scopes, outermost first.
    frames: Vec<Frame>,
    /// Number of scopes opened so far, root included.
    opened: usize,
}

impl ScopeStack {
    /// A stack with only the root scope open.
    pub fn new() -> Self {
        Self {
            frames: vec![Frame::new(ScopeId::ROOT)],
            opened: 1,
        }
    }

    /// Pushes a new scope onto the pile.
    pub fn open(&mut self) -> ScopeId {
        let id = ScopeId(self.opened);
        self.opened += 1;
        self.frames.push(Frame::new(id));
        id
    }

    /// The innermost open scope, if any is left.
    pub fn innermost(&self) -> Option<ScopeId> {
        self.frames.last().map(|frame| frame.id)
    }

    /// Position of `scope` in the stack, 0 being the outermost one.
    pub fn depth(&self, scope: ScopeId) -> Option<usize> {
        self.frames
            .binary_search_by_key(&scope, |frame| frame.id)
            .ok()
    }

    /// Checks that `scope` is open, returning its depth.
    pub fn ensure_open(&self, scope: ScopeId) -> Checked<usize> {
        self.depth(scope).ok_or_else(|| self.not_open(scope))
    }

    /// The violation of referencing `scope` while it is not open.
    fn not_open(&self, scope: ScopeId) -> Violation {
        let detail = if scope.0 < self.opened {
            format!("scope {scope:?} is already closed")
        } else {
            format!("scope {scope:?} was never opened")
        };
        Violation::new(DiagnosticKind::MalformedReference, detail).with(scope)
    }

    /// Gets the binding of a name, looking from the innermost scope outward.
    pub fn lookup(&self, name: &str) -> Option<BindingKey> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.names.get(name).copied())
    }

    /// Gets the binding of `name` in `scope` itself.
    pub fn bound_in(&self, scope: ScopeId, name: &str) -> Option<BindingKey> {
        let depth = self.depth(scope)?;
        self.frames[depth].names.get(name).copied()
    }

    /// Gets the binding of `name` in any open scope other than `scope`,
    /// enclosing or nested, with the scope in which it was found. Looks from
    /// the innermost scope outward.
    pub fn bound_elsewhere(&self, scope: ScopeId, name: &str) -> Option<(ScopeId, BindingKey)> {
        self.frames
            .iter()
            .rev()
            .filter(|frame| frame.id != scope)
            .find_map(|frame| frame.names.get(name).map(|&key| (frame.id, key)))
    }

    /// Declares a binding in `scope`. Returns the binding it shadows in **that
    /// scope**, if any.
    pub fn declare(&mut self, scope: ScopeId, name: Name, key: BindingKey) -> Option<BindingKey> {
        let frame = self.frame_mut(scope)?;
        frame.bindings.push(key);
        frame.names.insert(name, key)
    }

    /// Records that `borrow` ends at the latest when `scope` ends.
    pub fn record_borrow(&mut self, scope: ScopeId, borrow: BorrowId) {
        if let Some(frame) = self.frame_mut(scope) {
            frame.borrows.push(borrow);
        } else {
            debug_assert!(false, "borrow {borrow:?} recorded in closed scope {scope:?}");
        }
    }

    /// Pops `scope`, which must be the innermost open scope.
    pub fn close(&mut self, scope: ScopeId) -> Checked<Frame> {
        let Some(depth) = self.depth(scope) else {
            return Err(if scope.0 < self.opened {
                Violation::new(
                    DiagnosticKind::ScopeOrderViolation,
                    format!("scope {scope:?} is already closed"),
                )
                .with(scope)
            } else {
                self.not_open(scope)
            });
        };
        if let Some(inner) = self.frames.get(depth + 1) {
            return Err(Violation::new(
                DiagnosticKind::ScopeOrderViolation,
                format!(
                    "cannot close scope {scope:?} while the inner scope {:?} is open",
                    inner.id
                ),
            )
            .with(scope)
            .with(inner.id));
        }
        Ok(self.frames.remove(depth))
    }

    /// Pops the innermost scope, whatever it is.
    pub fn pop(&mut self) -> Option<Frame> {
        self.frames.pop()
    }

    /// Gets the number of open scopes.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Mutable access to an open scope.
    fn frame_mut(&mut self, scope: ScopeId) -> Option<&mut Frame> {
        let depth = self.depth(scope)?;
        self.frames.get_mut(depth)
    }
}

impl fmt::Debug for ScopeStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.frames).finish()
    }
}

/// A value reaching the end of its life.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropEvent {
    /// Index of the operation that caused the drop.
    ///
    /// Drops happening when the trace ends carry the length of the trace.
    pub op: usize,
    /// The dropped value.
    pub value: ValueId,
    /// Its last owner.
    pub name: Name,
    /// Scope of its last owner.
    pub scope: ScopeId,
}

/// Releases everything a closed scope holds.
///
/// First expires the borrows bounded by the scope, then drops the values its
/// bindings still own, newest binding first, and finally forgets the bindings.
/// Values already dropped are skipped, so nothing is ever dropped twice.
pub(crate) fn release(
    frame: Frame,
    op: usize,
    ownership: &mut Ownership,
    ledger: &mut Ledger,
) -> Vec<DropEvent> {
    let expired = ledger.expire(frame.borrows.iter().copied());
    if !expired.is_empty() {
        debug!("scope {:?} ends borrows {expired:?}", frame.id);
    }

    let mut drops = vec![];
    for &key in frame.bindings.iter().rev() {
        let Some(value) = ownership.owned_value(key) else {
            continue;
        };
        debug_assert!(
            !ledger.is_borrowed(value),
            "value {value:?} dropped while borrowed"
        );
        match ownership.drop_owned(key, op) {
            Ok(event) => {
                debug!("scope {:?} drops {:?} ({})", frame.id, event.value, event.name);
                drops.push(event);
            }
            Err(violation) => debug_assert!(false, "{violation:?}"),
        }
    }

    for &key in &frame.bindings {
        ownership.forget(key);
    }
    drops
}
