//! Operations and traces.

use std::fmt;
use std::ops::Deref;

use itertools::Itertools;
use num_bigint::BigInt;

use super::{BorrowId, ElementFn, Name, ScopeId, ValueId};

/// One operation of a trace.
#[derive(Clone, PartialEq, Eq)]
pub enum Op {
    /// Introduces a fresh value under `name` in `scope`.
    Bind {
        /// Binding name.
        name: Name,
        /// The fresh value.
        value: ValueId,
        /// Scope the binding lives in.
        scope: ScopeId,
        /// Initial contents of the value.
        contents: Vec<BigInt>,
    },
    /// Transfers ownership from `src` to a new binding `dest`.
    Move {
        /// Current owner.
        src: Name,
        /// New owner, bound in the innermost open scope.
        dest: Name,
    },
    /// Requests a shared borrow of the value owned by `name`, bounded by
    /// `scope`.
    BorrowShared {
        /// Owner of the borrowed value.
        name: Name,
        /// Scope bounding the lifetime of the borrow.
        scope: ScopeId,
    },
    /// Requests a mutable borrow of the value owned by `name`, bounded by
    /// `scope`.
    BorrowMutable {
        /// Owner of the borrowed value.
        name: Name,
        /// Scope bounding the lifetime of the borrow.
        scope: ScopeId,
    },
    /// Ends a borrow explicitly.
    EndBorrow {
        /// The borrow to end.
        borrow: BorrowId,
    },
    /// Reads the value owned by `name`.
    Use {
        /// The owner.
        name: Name,
    },
    /// Releases the value owned by `name` before its scope ends.
    Drop {
        /// The owner.
        name: Name,
    },
    /// Opens a new innermost scope.
    OpenScope,
    /// Closes a scope, which must be the innermost one.
    CloseScope {
        /// The scope to close.
        scope: ScopeId,
    },
    /// Overwrites every element of a sequence in place.
    MutateInPlace {
        /// The sequence.
        value: ValueId,
        /// Applied to each element.
        func: ElementFn,
    },
    /// Maps a sequence into a brand new value.
    ProjectToNew {
        /// The source sequence, left untouched.
        value: ValueId,
        /// Applied to each element.
        func: ElementFn,
        /// Owner of the new value, bound in the innermost open scope.
        dest: Name,
        /// The new value.
        new_value: ValueId,
    },
}

impl fmt::Debug for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::Bind {
                name,
                value,
                scope,
                contents,
            } => {
                write!(f, "bind {name} = {value:?} in {scope:?}")?;
                if !contents.is_empty() {
                    write!(f, " [{}]", contents.iter().join(", "))?;
                }
                Ok(())
            }
            Op::Move { src, dest } => write!(f, "move {src} -> {dest}"),
            Op::BorrowShared { name, scope } => write!(f, "&{name} in {scope:?}"),
            Op::BorrowMutable { name, scope } => write!(f, "&mut {name} in {scope:?}"),
            Op::EndBorrow { borrow } => write!(f, "end {borrow:?}"),
            Op::Use { name } => write!(f, "use {name}"),
            Op::Drop { name } => write!(f, "drop {name}"),
            Op::OpenScope => write!(f, "{{"),
            Op::CloseScope { scope } => write!(f, "}} {scope:?}"),
            Op::MutateInPlace { value, func } => write!(f, "{value:?}[..] = {value:?}[..] {func:?}"),
            Op::ProjectToNew {
                value,
                func,
                dest,
                new_value,
            } => write!(f, "bind {dest} = {new_value:?} from {value:?}[..] {func:?}"),
        }
    }
}

/// An ordered sequence of operations.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Trace {
    /// The operations, in execution order.
    pub ops: Vec<Op>,
}

impl Trace {
    /// Creates an empty trace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an operation.
    pub fn push(&mut self, op: Op) {
        self.ops.push(op);
    }
}

impl Deref for Trace {
    type Target = [Op];

    fn deref(&self) -> &Self::Target {
        &self.ops
    }
}

impl From<Vec<Op>> for Trace {
    fn from(ops: Vec<Op>) -> Self {
        Self { ops }
    }
}

impl FromIterator<Op> for Trace {
    fn from_iter<I: IntoIterator<Item = Op>>(iter: I) -> Self {
        Self {
            ops: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Trace {
    type IntoIter = std::slice::Iter<'a, Op>;
    type Item = &'a Op;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}

impl fmt::Debug for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, op) in self.ops.iter().enumerate() {
            writeln!(f, "{i:>4}: {op:?}")?;
        }
        Ok(())
    }
}

/// Binds a fresh, empty value.
pub fn bind(name: impl Into<Name>, value: u64, scope: usize) -> Op {
    bind_seq(name, value, scope, [])
}

/// Binds a fresh sequence.
pub fn bind_seq(
    name: impl Into<Name>,
    value: u64,
    scope: usize,
    contents: impl IntoIterator<Item = i64>,
) -> Op {
    Op::Bind {
        name: name.into(),
        value: ValueId(value),
        scope: ScopeId(scope),
        contents: contents.into_iter().map(BigInt::from).collect(),
    }
}

/// Moves `src` into `dest`.
pub fn mv(src: impl Into<Name>, dest: impl Into<Name>) -> Op {
    Op::Move {
        src: src.into(),
        dest: dest.into(),
    }
}

/// Borrows `name` immutably until the end of `scope` at most.
pub fn borrow(name: impl Into<Name>, scope: usize) -> Op {
    Op::BorrowShared {
        name: name.into(),
        scope: ScopeId(scope),
    }
}

/// Borrows `name` mutably until the end of `scope` at most.
pub fn borrow_mut(name: impl Into<Name>, scope: usize) -> Op {
    Op::BorrowMutable {
        name: name.into(),
        scope: ScopeId(scope),
    }
}

/// Ends borrow number `borrow`.
pub fn end_borrow(borrow: usize) -> Op {
    Op::EndBorrow {
        borrow: BorrowId(borrow),
    }
}

/// Uses `name`.
pub fn use_var(name: impl Into<Name>) -> Op {
    Op::Use { name: name.into() }
}

/// Drops `name` explicitly.
pub fn drop_var(name: impl Into<Name>) -> Op {
    Op::Drop { name: name.into() }
}

/// Opens a scope.
pub fn open() -> Op {
    Op::OpenScope
}

/// Closes scope number `scope`.
pub fn close(scope: usize) -> Op {
    Op::CloseScope {
        scope: ScopeId(scope),
    }
}

/// Mutates the sequence `value` in place.
pub fn mutate(value: u64, func: ElementFn) -> Op {
    Op::MutateInPlace {
        value: ValueId(value),
        func,
    }
}

/// Projects the sequence `value` into `new_value`, owned by `dest`.
pub fn project(value: u64, func: ElementFn, dest: impl Into<Name>, new_value: u64) -> Op {
    Op::ProjectToNew {
        value: ValueId(value),
        func,
        dest: dest.into(),
        new_value: ValueId(new_value),
    }
}
