//! Taking a trace and verifying the ownership discipline on it.
//!
//! To use it:
//! * Instantiate `Verifier::new()`
//! * then `verifier.check(&mut ctx, &your_trace)`
//!
//! or feed the operations one by one with [`Verifier::apply`] and collect the
//! [`Report`] with [`Verifier::finish`].

use std::collections::BTreeMap;

use anyhow::Result;
use itertools::Itertools;
use num_bigint::BigInt;

use crate::borrowing::{Borrow, BorrowKind, BorrowStatus, Ledger};
use crate::ownership::{Ownership, Value};
use crate::reporter::{Checked, Diagnostic, DiagnosticKind, Violation};
use crate::scope::{release, DropEvent, ScopeStack};
use crate::trace::{BorrowId, ElementFn, Name, Op, ScopeId, Trace, ValueId};
use crate::transform::{map_in_place, project, Transform};
use crate::Context;

/// What an operation produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Produced {
    /// Nothing, or the operation was refused.
    Nothing,
    /// A newly opened scope.
    Scope(ScopeId),
    /// A granted borrow.
    Borrow(BorrowId),
    /// A value that got a new owner.
    Value(ValueId),
}

/// Outcome of a verification pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Diagnostics, in emission order.
    pub diagnostics: Vec<Diagnostic>,
    /// Drops, in the order they happened.
    pub drops: Vec<DropEvent>,
    /// Final state of every value introduced.
    pub values: BTreeMap<ValueId, Value>,
    /// Index of the operation that halted the pass, if any.
    pub halted_at: Option<usize>,
}

impl Report {
    /// Did the trace verify without any violation?
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Error codes of the diagnostics, in emission order.
    pub fn codes(&self) -> Vec<&'static str> {
        self.diagnostics.iter().map(Diagnostic::code).collect()
    }

    /// Final state of a value.
    pub fn value(&self, id: ValueId) -> Option<&Value> {
        self.values.get(&id)
    }

    /// Final contents of a value.
    pub fn contents(&self, id: ValueId) -> Option<&[BigInt]> {
        self.value(id).map(|value| value.contents.as_slice())
    }

    /// Names of the dropped values' last owners, in drop order.
    pub fn drop_order(&self) -> Vec<&str> {
        self.drops.iter().map(|event| event.name.as_str()).collect()
    }
}

/// The ownership verifier.
///
/// Owns the whole engine state. One verifier verifies one trace.
pub struct Verifier {
    /// Values and the bindings that own them.
    ownership: Ownership,
    /// Borrows, and the loans of each value.
    ledger: Ledger,
    /// Open scopes.
    scopes: ScopeStack,
    /// Drops so far.
    drops: Vec<DropEvent>,
    /// Index of the next operation.
    cursor: usize,
    /// Index of the operation that halted the pass.
    halted: Option<usize>,
}

impl Default for Verifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Verifier {
    /// Creates a new verifier, with only the root scope open.
    pub fn new() -> Self {
        Self {
            ownership: Ownership::new(),
            ledger: Ledger::new(),
            scopes: ScopeStack::new(),
            drops: vec![],
            cursor: 0,
            halted: None,
        }
    }

    /// Verifies a whole trace.
    pub fn check(mut self, ctx: &mut Context, trace: &Trace) -> Report {
        for op in trace {
            if self.apply(ctx, op).is_err() {
                break;
            }
        }
        self.finish(ctx)
    }

    /// Applies the next operation of the trace.
    ///
    /// Violations are emitted in `ctx` and leave the engine state untouched.
    /// Fails iff the pass is halted, either by this operation or by an earlier
    /// one.
    pub fn apply(&mut self, ctx: &Context, op: &Op) -> Result<Produced> {
        if let Some(at) = self.halted {
            bail!("verification halted at operation #{at}");
        }
        let index = self.cursor;
        self.cursor += 1;
        trace!("#{index}: {op:?}");

        match self.step(index, op) {
            Ok(produced) => Ok(produced),
            Err(violation) => {
                let diagnostic = violation.at(index);
                if diagnostic.is_fatal() {
                    warn!("halting: {diagnostic:?}");
                    self.halted = Some(index);
                    ctx.emit(diagnostic);
                    bail!("verification halted at operation #{index}");
                }
                debug!("{diagnostic:?}");
                ctx.emit(diagnostic);
                Ok(Produced::Nothing)
            }
        }
    }

    /// Ends the pass, closing the scopes still open unless configured
    /// otherwise, and collects the report.
    pub fn finish(mut self, ctx: &mut Context) -> Report {
        if self.halted.is_none() && !ctx.config.leak_open_scopes {
            while let Some(frame) = self.scopes.pop() {
                let drops = release(frame, self.cursor, &mut self.ownership, &mut self.ledger);
                self.drops.extend(drops);
            }
        }

        Report {
            diagnostics: ctx.reporter.flush().into_iter().collect(),
            drops: self.drops,
            values: self
                .ownership
                .values()
                .map(|value| (value.id, value.clone()))
                .collect(),
            halted_at: self.halted,
        }
    }

    /// Active borrows of a value.
    pub fn active_borrows(&self, value: ValueId) -> Vec<Borrow> {
        self.ledger.active(value)
    }

    /// Status of a borrow, if it was ever requested.
    pub fn borrow_status(&self, borrow: BorrowId) -> Option<BorrowStatus> {
        self.ledger.status(borrow)
    }

    /// Current state of a value.
    pub fn value(&self, id: ValueId) -> Option<&Value> {
        self.ownership.value(id)
    }

    /// Drops so far.
    pub fn drops(&self) -> &[DropEvent] {
        &self.drops
    }

    /// Number of open scopes.
    pub fn open_scopes(&self) -> usize {
        self.scopes.len()
    }

    /// Applies operation number `index`.
    fn step(&mut self, index: usize, op: &Op) -> Checked<Produced> {
        match op {
            Op::Bind {
                name,
                value,
                scope,
                contents,
            } => {
                self.ownership
                    .bind(&mut self.scopes, name, *value, *scope, contents.clone())?;
                Ok(Produced::Value(*value))
            }
            Op::Move { src, dest } => self.relocate(src, dest),
            Op::BorrowShared { name, scope } => self.borrow(BorrowKind::Shared, name, *scope),
            Op::BorrowMutable { name, scope } => self.borrow(BorrowKind::Mutable, name, *scope),
            Op::EndBorrow { borrow } => {
                self.ledger.release(*borrow)?;
                Ok(Produced::Nothing)
            }
            Op::Use { name } => self.read(name),
            Op::Drop { name } => self.drop_early(index, name),
            Op::OpenScope => Ok(Produced::Scope(self.scopes.open())),
            Op::CloseScope { scope } => {
                let frame = self.scopes.close(*scope)?;
                let drops = release(frame, index, &mut self.ownership, &mut self.ledger);
                self.drops.extend(drops);
                Ok(Produced::Nothing)
            }
            Op::MutateInPlace { value, func } => self.mutate_in_place(*value, func),
            Op::ProjectToNew {
                value,
                func,
                dest,
                new_value,
            } => self.project_to_new(*value, func, dest, *new_value),
        }
    }

    /// Moves the value owned by `src` into a new binding `dest`.
    fn relocate(&mut self, src: &Name, dest: &Name) -> Checked<Produced> {
        let (key, value) = self
            .ownership
            .owned_by(&self.scopes, src, DiagnosticKind::UseAfterDrop)?;
        self.ensure_unborrowed(src, value)?;
        let scope = self.innermost()?;
        self.ownership.relocate(&mut self.scopes, key, dest, scope)?;
        Ok(Produced::Value(value))
    }

    /// Requests a borrow. A refused request still consumes an identifier.
    fn borrow(&mut self, kind: BorrowKind, name: &Name, scope: ScopeId) -> Checked<Produced> {
        let id = self.ledger.next_id();
        let res = self.request(kind, name, scope);
        if self.ledger.next_id() == id {
            self.ledger.refuse();
        }
        res.map(Produced::Borrow)
    }

    /// Checks a borrow request before handing it to the ledger.
    fn request(&mut self, kind: BorrowKind, name: &Name, scope: ScopeId) -> Checked<BorrowId> {
        let depth = self.scopes.ensure_open(scope)?;
        let (key, value) = self
            .ownership
            .owned_by(&self.scopes, name, DiagnosticKind::UseAfterDrop)?;

        let home = self.ownership.binding(key).map(|binding| binding.scope);
        let outlived = |home: &ScopeId| {
            self.scopes
                .depth(*home)
                .map_or(false, |home_depth| depth < home_depth)
        };
        if let Some(home) = home.filter(outlived) {
            return Err(Violation::new(
                DiagnosticKind::BorrowOutlivesValue,
                format!("{name} lives in {home:?} and cannot be borrowed until the end of {scope:?}"),
            )
            .with(name)
            .with(value)
            .with(scope)
            .with(home));
        }

        let id = self.ledger.request(kind, name, value, scope)?;
        self.scopes.record_borrow(scope, id);
        Ok(id)
    }

    /// Reads the value owned by `name`.
    fn read(&self, name: &Name) -> Checked<Produced> {
        let (_, value) = self
            .ownership
            .owned_by(&self.scopes, name, DiagnosticKind::UseAfterDrop)?;
        let loans = self.ledger.loans(value);
        if loans.is_mut() {
            let blockers = loans.iter().collect_vec();
            return Err(Violation::new(
                DiagnosticKind::SharedBorrowConflict,
                format!("cannot read {name}, it is mutably borrowed by {blockers:?}"),
            )
            .with(name)
            .with(value)
            .with_all(blockers));
        }
        Ok(Produced::Nothing)
    }

    /// Drops the value owned by `name` before its scope ends.
    fn drop_early(&mut self, index: usize, name: &Name) -> Checked<Produced> {
        let (key, value) = self
            .ownership
            .owned_by(&self.scopes, name, DiagnosticKind::DoubleDrop)?;
        self.ensure_unborrowed(name, value)?;
        let event = self.ownership.drop_owned(key, index)?;
        debug!("{name} drops {value:?} explicitly");
        self.drops.push(event);
        Ok(Produced::Nothing)
    }

    /// Overwrites the elements of `value`.
    fn mutate_in_place(&mut self, value: ValueId, func: &ElementFn) -> Checked<Produced> {
        self.ensure_live(value)?;
        self.admit(Transform::InPlace, value)?;
        if let Some(contents) = self.ownership.contents_mut(value) {
            map_in_place(contents, func);
        }
        Ok(Produced::Nothing)
    }

    /// Maps the elements of `value` into `new_value`, owned by `dest`.
    fn project_to_new(
        &mut self,
        value: ValueId,
        func: &ElementFn,
        dest: &Name,
        new_value: ValueId,
    ) -> Checked<Produced> {
        let source = self.ensure_live(value)?;
        let contents = project(&source.contents, func);
        self.admit(Transform::Projection, value)?;
        let scope = self.innermost()?;
        self.ownership
            .bind(&mut self.scopes, dest, new_value, scope, contents)?;
        Ok(Produced::Value(new_value))
    }

    /// Checks that `value` exists and was not dropped.
    fn ensure_live(&self, id: ValueId) -> Checked<&Value> {
        let Some(value) = self.ownership.value(id) else {
            return Err(Violation::new(
                DiagnosticKind::MalformedReference,
                format!("value {id:?} was never introduced"),
            )
            .with(id));
        };
        if value.is_dropped() {
            return Err(Violation::new(
                DiagnosticKind::UseAfterDrop,
                format!("{id:?} was dropped by {}", value.owner),
            )
            .with(id)
            .with(&value.owner));
        }
        Ok(value)
    }

    /// Checks that the loans of `value` admit `transform`.
    fn admit(&self, transform: Transform, value: ValueId) -> Checked<()> {
        let loans = self.ledger.loans(value);
        if transform.admits(loans) {
            return Ok(());
        }
        let blockers = loans.iter().collect_vec();
        Err(Violation::new(
            transform.conflict(),
            format!(
                "{transform:?} needs {:?} access to {value:?}, which is borrowed by {blockers:?}",
                transform.access()
            ),
        )
        .with(value)
        .with_all(blockers))
    }

    /// Checks that nobody borrows `value`, owned by `name`.
    fn ensure_unborrowed(&self, name: &Name, value: ValueId) -> Checked<()> {
        let loans = self.ledger.loans(value);
        if loans.is_empty() {
            return Ok(());
        }
        let blockers = loans.iter().collect_vec();
        Err(Violation::new(
            DiagnosticKind::MoveWhileBorrowed,
            format!("{name} is still borrowed by {blockers:?}"),
        )
        .with(name)
        .with(value)
        .with_all(blockers))
    }

    /// The innermost open scope, where new owners are bound.
    fn innermost(&self) -> Checked<ScopeId> {
        self.scopes.innermost().ok_or_else(|| {
            Violation::new(
                DiagnosticKind::MalformedReference,
                "no scope is open, not even the root one",
            )
        })
    }
}
