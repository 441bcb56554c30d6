//! Arbitrary traces, checked operation by operation.

use std::collections::HashSet;

use proptest::prelude::*;

use super::*;

const NAMES: [&str; 5] = ["a", "b", "c", "d", "e"];

/// A recipe for an operation. Scopes, borrows and values are picked by index
/// among the ones that exist when the recipe is turned into an operation.
#[derive(Debug, Clone)]
enum OpRecipe {
    Bind { name: usize, scope: usize },
    Move { src: usize, dest: usize },
    Borrow { name: usize, scope: usize, mutable: bool },
    EndBorrow { borrow: usize },
    Use { name: usize },
    Drop { name: usize },
    Open,
    Close,
    Mutate { value: usize },
    Project { value: usize, dest: usize },
}

fn arb_op_recipe() -> impl Strategy<Value = OpRecipe> {
    let name = 0..NAMES.len();
    prop_oneof![
        2 => (name.clone(), any::<usize>())
            .prop_map(|(name, scope)| OpRecipe::Bind { name, scope }),
        1 => (name.clone(), name.clone()).prop_map(|(src, dest)| OpRecipe::Move { src, dest }),
        2 => (name.clone(), any::<usize>(), any::<bool>())
            .prop_map(|(name, scope, mutable)| OpRecipe::Borrow { name, scope, mutable }),
        2 => any::<usize>().prop_map(|borrow| OpRecipe::EndBorrow { borrow }),
        1 => name.clone().prop_map(|name| OpRecipe::Use { name }),
        1 => name.clone().prop_map(|name| OpRecipe::Drop { name }),
        2 => Just(OpRecipe::Open),
        1 => Just(OpRecipe::Close),
        1 => any::<usize>().prop_map(|value| OpRecipe::Mutate { value }),
        1 => (any::<usize>(), name).prop_map(|(value, dest)| OpRecipe::Project { value, dest }),
    ]
}

fn arb_op_recipes(count: usize) -> impl Strategy<Value = Vec<OpRecipe>> {
    prop::collection::vec(arb_op_recipe(), 0..count)
}

/// What the verifier produced so far, as far as recipes are concerned.
struct Mirror {
    scopes: Vec<ScopeId>,
    next_value: u64,
    borrows: usize,
}

impl Mirror {
    fn new() -> Self {
        Self {
            scopes: vec![ScopeId::ROOT],
            next_value: 1,
            borrows: 0,
        }
    }

    fn scope(&self, index: usize) -> usize {
        self.scopes[index % self.scopes.len()].0
    }

    fn fresh(&mut self) -> u64 {
        self.next_value += 1;
        self.next_value - 1
    }

    /// A value the verifier knows about, if `index` hits one.
    fn existing(&self, index: usize, verifier: &Verifier) -> Option<u64> {
        let id = 1 + index as u64 % self.next_value;
        verifier.value(ValueId(id)).map(|_| id)
    }

    /// Turns a recipe into an operation that cannot halt the pass.
    fn resolve(&mut self, recipe: &OpRecipe, verifier: &Verifier) -> Op {
        match *recipe {
            OpRecipe::Bind { name, scope } => {
                let (value, scope) = (self.fresh(), self.scope(scope));
                bind_seq(NAMES[name], value, scope, [value as i64])
            }
            OpRecipe::Move { src, dest } => mv(NAMES[src], NAMES[dest]),
            OpRecipe::Borrow { name, scope, mutable } => {
                self.borrows += 1;
                let scope = self.scope(scope);
                if mutable {
                    borrow_mut(NAMES[name], scope)
                } else {
                    borrow(NAMES[name], scope)
                }
            }
            OpRecipe::EndBorrow { borrow } if self.borrows > 0 => end_borrow(borrow % self.borrows),
            OpRecipe::Use { name } => use_var(NAMES[name]),
            OpRecipe::Drop { name } => drop_var(NAMES[name]),
            OpRecipe::Close if self.scopes.len() > 1 => {
                let scope = self.scopes.pop().unwrap();
                close(scope.0)
            }
            OpRecipe::Mutate { value } => match self.existing(value, verifier) {
                Some(id) => mutate(id, add(1)),
                None => use_var(NAMES[0]),
            },
            OpRecipe::Project { value, dest } => match self.existing(value, verifier) {
                Some(id) => {
                    let new_value = self.fresh();
                    project(id, mul(2), NAMES[dest], new_value)
                }
                None => use_var(NAMES[dest]),
            },
            OpRecipe::EndBorrow { .. } | OpRecipe::Close | OpRecipe::Open => open(),
        }
    }
}

/// No value has a mutable borrow alongside another borrow, and no dropped
/// value is borrowed.
fn check_exclusivity(verifier: &Verifier, values: u64) -> Result<(), TestCaseError> {
    for value in (1..values).map(ValueId) {
        let active = verifier.active_borrows(value);
        let mutable = active.iter().filter(|borrow| borrow.mutable()).count();
        prop_assert!(
            mutable == 0 || active.len() == 1,
            "{:?} has conflicting borrows {:?}",
            value,
            active
        );
        if let Some(state) = verifier.value(value) {
            prop_assert!(
                active.is_empty() || !state.is_dropped(),
                "{:?} is borrowed after being dropped",
                value
            );
        }
    }
    Ok(())
}

/// Every value introduced is dropped, exactly once.
fn check_dropped_once(report: &Report) -> Result<(), TestCaseError> {
    let mut dropped = HashSet::new();
    for event in &report.drops {
        prop_assert!(dropped.insert(event.value), "{:?} dropped twice", event.value);
    }
    for (id, value) in &report.values {
        prop_assert!(value.is_dropped(), "{:?} never dropped", id);
        prop_assert!(dropped.contains(id), "{:?} dropped without an event", id);
    }
    prop_assert_eq!(dropped.len(), report.values.len());
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn random_traces_keep_exclusivity_and_drop_once(recipes in arb_op_recipes(300)) {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut ctx = Context::default();
        let mut verifier = Verifier::new();
        let mut mirror = Mirror::new();

        for recipe in &recipes {
            let op = mirror.resolve(recipe, &verifier);
            let produced = verifier.apply(&ctx, &op);
            prop_assert!(produced.is_ok(), "{:?} halted the pass", op);
            if let Ok(Produced::Scope(scope)) = produced {
                mirror.scopes.push(scope);
            }
            check_exclusivity(&verifier, mirror.next_value)?;
        }

        let report = verifier.finish(&mut ctx);
        prop_assert!(report.halted_at.is_none());
        check_dropped_once(&report)?;
    }
}
