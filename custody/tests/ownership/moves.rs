//! Transferring ownership.

use custody_lib::ValueState;

use super::*;

#[test]
#[should_fail(USE_AFTER_MOVE_ERROR)]
fn use_after_move() {
    examples::move_then_use()
}

#[test]
#[verifies("c")]
fn chained_moves() {
    examples::chained_moves()
}

#[test]
#[should_fail(MOVE_WHILE_BORROWED_ERROR)]
fn move_while_borrowed() {
    examples::move_while_borrowed()
}

#[test]
#[should_fail(UNBOUND_NAME_ERROR)]
fn move_unknown_name() {
    vec![mv("ghost", "b")]
}

#[test]
#[should_fail(DUPLICATE_BINDING_ERROR)]
fn move_onto_outer_name() {
    vec![bind("a", 1, 0), bind("b", 2, 0), open(), mv("a", "b")]
}

#[test]
#[should_fail(DUPLICATE_BINDING_ERROR)]
fn move_onto_itself() {
    vec![bind("a", 1, 0), mv("a", "a"), use_var("a")]
}

#[test]
fn move_onto_a_sibling_name() {
    let report = run(vec![
        bind("a", 1, 0),
        bind("b", 2, 0),
        mv("a", "b"),
        use_var("a"),
        use_var("b"),
    ]);
    // Both bindings keep their own values.
    assert_eq!(report.codes(), [DUPLICATE_BINDING_ERROR]);
    assert_eq!(report.diagnostics[0].op(), 2);
    assert!(report.diagnostics[0].involves(ValueId(2)));
    assert_eq!(report.drop_order(), ["b", "a"]);
}

#[test]
fn moved_value_keeps_its_identity() -> anyhow::Result<()> {
    let report = run(vec![bind_seq("a", 1, 0, [7]), mv("a", "b"), use_var("b")]);
    ensure_clean(&report)?;
    let value = report.value(ValueId(1)).ok_or(anyhow::anyhow!("v1 is gone"))?;
    anyhow::ensure!(value.state == ValueState::Dropped);
    anyhow::ensure!(value.owner.as_str() == "b");
    anyhow::ensure!(report.drops.len() == 1);
    Ok(())
}

#[test]
fn failed_move_changes_nothing() {
    let report = run(vec![
        bind("a", 1, 0),
        borrow("a", 0),
        mv("a", "b"),
        end_borrow(0),
        use_var("a"),
        use_var("b"),
    ]);
    // `b` was never bound, `a` still owns its value.
    assert_eq!(report.codes(), [MOVE_WHILE_BORROWED_ERROR, UNBOUND_NAME_ERROR]);
    assert_eq!(report.diagnostics[1].op(), 5);
    assert_eq!(report.drop_order(), ["a"]);
}

#[test]
fn moving_into_an_inner_scope() {
    let report = run(examples::move_into_inner_scope());
    assert_eq!(report.codes(), [USE_AFTER_MOVE_ERROR]);
    // Dropped with `b`, when the inner scope closes.
    assert_eq!(report.drops.len(), 1);
    assert_eq!(report.drops[0].op, 3);
    assert_eq!(report.drop_order(), ["b"]);
}

fn ensure_clean(report: &Report) -> anyhow::Result<()> {
    anyhow::ensure!(report.is_clean(), "{:#?}", report.diagnostics);
    Ok(())
}
