//! Transforming sequences in place or into new values.

use num_bigint::BigInt;

use super::*;

fn seq(elements: impl IntoIterator<Item = i64>) -> Vec<BigInt> {
    elements.into_iter().map(BigInt::from).collect()
}

#[test]
#[verifies("ys", "xs")]
fn doubled_copy() {
    examples::doubled_copy()
}

#[test]
#[verifies("xs")]
fn doubled_in_place() {
    examples::doubled_in_place()
}

#[test]
#[should_fail(MUTABLE_BORROW_CONFLICT_ERROR)]
fn mutate_shared() {
    examples::mutate_shared()
}

#[test]
#[should_fail(SHARED_BORROW_CONFLICT_ERROR)]
fn project_while_mutably_borrowed() {
    examples::project_while_mutably_borrowed()
}

#[test]
#[should_fail(MALFORMED_REFERENCE_ERROR)]
fn mutate_unknown_value() {
    vec![bind_seq("xs", 1, 0, [1]), mutate(2, add(1))]
}

#[test]
#[should_fail(USE_AFTER_DROP_ERROR)]
fn project_dropped_value() {
    vec![
        bind_seq("xs", 1, 0, [1]),
        drop_var("xs"),
        project(1, ElementFn::Abs, "ys", 2),
    ]
}

#[test]
#[should_fail(DUPLICATE_BINDING_ERROR)]
fn project_into_existing_value() {
    vec![
        bind_seq("xs", 1, 0, [1]),
        project(1, ElementFn::Identity, "ys", 1),
    ]
}

#[test]
fn projection_leaves_the_source_alone() {
    let report = run(examples::doubled_copy());
    assert!(report.is_clean());
    assert_eq!(report.contents(ValueId(1)), Some(&seq(1..=5)[..]));
    assert_eq!(report.contents(ValueId(2)), Some(&seq([2, 4, 6, 8, 10])[..]));
}

#[test]
fn mutation_creates_no_value() {
    let report = run(examples::doubled_in_place());
    assert!(report.is_clean());
    assert_eq!(report.values.len(), 1);
    assert_eq!(report.contents(ValueId(1)), Some(&seq([2, 4, 6, 8, 10])[..]));
}

#[test]
fn refused_mutation_changes_nothing() {
    let report = run(examples::mutate_shared());
    assert_eq!(report.contents(ValueId(1)), Some(&seq([1, 2, 3])[..]));
}

#[test]
fn owner_mutates_without_borrowing() {
    let report = run(vec![
        bind_seq("xs", 1, 0, [-1, 2, -3]),
        mv("xs", "ys"),
        mutate(1, ElementFn::Abs),
        mutate(1, ElementFn::Neg),
        project(1, add(10), "zs", 2),
    ]);
    assert!(report.is_clean());
    assert_eq!(report.contents(ValueId(1)), Some(&seq([-1, -2, -3])[..]));
    assert_eq!(report.contents(ValueId(2)), Some(&seq([9, 8, 7])[..]));
    assert_eq!(report.drop_order(), ["zs", "ys"]);
}

#[test]
fn empty_sequences() {
    let report = run(vec![bind("xs", 1, 0), project(1, mul(3), "ys", 2)]);
    assert!(report.is_clean());
    assert_eq!(report.contents(ValueId(2)), Some(&[][..]));
}
