//! Tracking which binding owns each value.
//!
//! Values are never forgotten: once introduced, a value stays in the table
//! until the end of the verification, so that a later reference to it can be
//! told apart from a reference to something that never existed. Bindings, on
//! the other hand, disappear with their scope.

mod value;

use std::collections::HashMap;

use num_bigint::BigInt;
use slab::Slab;

use crate::reporter::{Checked, DiagnosticKind, Violation};
use crate::scope::{DropEvent, ScopeStack};
use crate::trace::{Name, ScopeId, ValueId};
pub use value::{Value, ValueState};

/// Key of a binding in the binding slab.
pub(crate) type BindingKey = usize;

/// A name bound to a value.
#[derive(Debug, Clone)]
pub(crate) struct Binding {
    /// Name of the binding.
    pub name: Name,
    /// The value it refers to.
    pub value: ValueId,
    /// Scope in which it was introduced.
    pub scope: ScopeId,
    /// Is it still the owner of the value?
    ///
    /// Turns `false` when the value is moved away, and never turns back.
    pub owns: bool,
}

/// The ownership tracker.
#[derive(Default)]
pub(crate) struct Ownership {
    /// Every value introduced so far.
    values: HashMap<ValueId, Value>,
    /// Bindings of the open scopes.
    bindings: Slab<Binding>,
}

impl Ownership {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets a value.
    pub fn value(&self, id: ValueId) -> Option<&Value> {
        self.values.get(&id)
    }

    /// Iterates over all the values introduced so far.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.values.values()
    }

    /// Gets a binding.
    pub fn binding(&self, key: BindingKey) -> Option<&Binding> {
        self.bindings.get(key)
    }

    /// Resolves a name to its binding.
    pub fn resolve(&self, scopes: &ScopeStack, name: &Name) -> Checked<BindingKey> {
        scopes.lookup(name.as_str()).ok_or_else(|| {
            Violation::new(
                DiagnosticKind::UnboundNameReferenced,
                format!("{name} is not bound in any open scope"),
            )
            .with(name)
        })
    }

    /// Resolves a name to the live value it owns.
    ///
    /// `on_dropped` is the kind of violation reported if the value was already
    /// dropped.
    pub fn owned_by(
        &self,
        scopes: &ScopeStack,
        name: &Name,
        on_dropped: DiagnosticKind,
    ) -> Checked<(BindingKey, ValueId)> {
        let key = self.resolve(scopes, name)?;
        let binding = &self.bindings[key];
        let value = &self.values[&binding.value];
        if !binding.owns {
            return Err(Violation::new(
                DiagnosticKind::UseAfterMove,
                format!("{name} was moved to {}", value.owner),
            )
            .with(name)
            .with(value.id));
        }
        if value.is_dropped() {
            return Err(Violation::new(
                on_dropped,
                format!("{name} was already dropped"),
            )
            .with(name)
            .with(value.id));
        }
        Ok((key, value.id))
    }

    /// Checks that `name` may be introduced in `scope`: the scope must be open,
    /// and no other open scope, enclosing or nested, may bind the name already.
    /// Rebinding a name in the same scope shadows it.
    pub fn check_name(&self, scopes: &ScopeStack, name: &Name, scope: ScopeId) -> Checked<()> {
        let depth = scopes.ensure_open(scope)?;
        if let Some((other, key)) = scopes.bound_elsewhere(scope, name.as_str()) {
            let relation = match scopes.depth(other) {
                Some(d) if d < depth => "enclosing",
                _ => "nested",
            };
            return Err(Violation::new(
                DiagnosticKind::DuplicateBinding,
                format!("{name} is already bound in the {relation} scope {other:?}"),
            )
            .with(name)
            .with(self.bindings[key].value)
            .with(other));
        }
        Ok(())
    }

    /// Checks that `value` was never introduced before.
    pub fn check_fresh(&self, value: ValueId) -> Checked<()> {
        match self.values.get(&value) {
            Some(existing) => Err(Violation::new(
                DiagnosticKind::DuplicateBinding,
                format!("{value:?} is not fresh, it was introduced by {}", existing.owner),
            )
            .with(value)
            .with(&existing.owner)),
            None => Ok(()),
        }
    }

    /// Introduces the fresh value `value`, owned by `name` in `scope`.
    pub fn bind(
        &mut self,
        scopes: &mut ScopeStack,
        name: &Name,
        value: ValueId,
        scope: ScopeId,
        contents: Vec<BigInt>,
    ) -> Checked<()> {
        self.check_name(scopes, name, scope)?;
        self.check_fresh(value)?;
        self.values
            .insert(value, Value::new(value, scope, name.clone(), contents));
        self.attach(scopes, name, value, scope);
        Ok(())
    }

    /// Transfers the value owned by binding `from` to a new binding `dest` in
    /// `scope`. Unlike a fresh binding, a move never shadows: `dest` must not
    /// be bound in `scope` yet.
    ///
    /// The caller is in charge of checking that `from` owns a live, unborrowed
    /// value.
    pub fn relocate(
        &mut self,
        scopes: &mut ScopeStack,
        from: BindingKey,
        dest: &Name,
        scope: ScopeId,
    ) -> Checked<ValueId> {
        self.check_name(scopes, dest, scope)?;
        if let Some(key) = scopes.bound_in(scope, dest.as_str()) {
            return Err(Violation::new(
                DiagnosticKind::DuplicateBinding,
                format!("cannot move into {dest}, it is already bound in {scope:?}"),
            )
            .with(dest)
            .with(self.bindings[key].value)
            .with(scope));
        }

        let binding = &mut self.bindings[from];
        debug_assert!(binding.owns, "relocating from a binding that does not own");
        binding.owns = false;
        let id = binding.value;

        let value = self.value_mut(id);
        value.state = ValueState::Moved;
        value.owner = dest.clone();

        self.attach(scopes, dest, id, scope);
        Ok(id)
    }

    /// The value binding `key` owns, if it still owns a live one.
    pub fn owned_value(&self, key: BindingKey) -> Option<ValueId> {
        let binding = self.bindings.get(key)?;
        let live = binding.owns && !self.values[&binding.value].is_dropped();
        live.then_some(binding.value)
    }

    /// Drops the value owned by binding `key`, during operation `op`.
    pub fn drop_owned(&mut self, key: BindingKey, op: usize) -> Checked<DropEvent> {
        let binding = &self.bindings[key];
        let (name, scope, id) = (binding.name.clone(), binding.scope, binding.value);
        let value = self.value_mut(id);
        if value.is_dropped() {
            return Err(Violation::new(
                DiagnosticKind::DoubleDrop,
                format!("{name} was already dropped"),
            )
            .with(&name)
            .with(value.id));
        }
        value.state = ValueState::Dropped;
        Ok(DropEvent {
            op,
            value: value.id,
            name,
            scope,
        })
    }

    /// Forgets a binding whose scope ended.
    pub fn forget(&mut self, key: BindingKey) {
        if self.bindings.contains(key) {
            self.bindings.remove(key);
        }
    }

    /// Mutable access to the contents of a value.
    pub fn contents_mut(&mut self, id: ValueId) -> Option<&mut Vec<BigInt>> {
        self.values.get_mut(&id).map(|value| &mut value.contents)
    }

    /// Registers a new binding, visible from now on.
    fn attach(&mut self, scopes: &mut ScopeStack, name: &Name, value: ValueId, scope: ScopeId) {
        let key = self.bindings.insert(Binding {
            name: name.clone(),
            value,
            scope,
            owns: true,
        });
        if let Some(shadowed) = scopes.declare(scope, name.clone(), key) {
            trace!("{name} shadows {:?}", self.bindings[shadowed].value);
        }
    }

    /// Mutable access to a value a binding refers to.
    fn value_mut(&mut self, id: ValueId) -> &mut Value {
        self.values
            .get_mut(&id)
            .unwrap_or_else(|| panic!("Ownership error: binding refers to unknown value {id:?}"))
    }
}
