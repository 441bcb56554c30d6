//! Dropping values explicitly.

use super::*;

#[test]
#[should_fail(DOUBLE_DROP_ERROR)]
fn drop_twice() {
    examples::drop_twice()
}

#[test]
#[should_fail(USE_AFTER_DROP_ERROR)]
fn use_after_drop() {
    examples::use_after_drop()
}

#[test]
#[should_fail(MOVE_WHILE_BORROWED_ERROR)]
fn drop_while_borrowed() {
    vec![bind("a", 1, 0), borrow_mut("a", 0), drop_var("a")]
}

#[test]
#[should_fail(USE_AFTER_MOVE_ERROR)]
fn drop_moved_out_binding() {
    vec![bind("a", 1, 0), mv("a", "b"), drop_var("a")]
}

#[test]
#[verifies("b", "a", "c")]
fn early_drop_is_not_repeated() {
    vec![
        bind("a", 1, 0),
        bind("b", 2, 0),
        drop_var("b"),
        open(),
        bind("c", 3, 1),
        drop_var("a"),
        close(1),
    ]
}

#[test]
fn early_drop_records_its_operation() {
    let report = run(vec![bind("a", 1, 0), use_var("a"), drop_var("a")]);
    assert!(report.is_clean());
    assert_eq!(report.drops.len(), 1);
    assert_eq!(report.drops[0].op, 2);
    assert_eq!(report.drops[0].value, ValueId(1));
    assert_eq!(report.drops[0].scope, ScopeId::ROOT);
}
