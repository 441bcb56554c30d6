//! Ending borrows, explicitly or with their scope.

use super::*;

#[test]
#[should_fail(DOUBLE_RELEASE_ERROR)]
fn released_by_scope() {
    examples::released_by_scope()
}

#[test]
#[should_fail(DOUBLE_RELEASE_ERROR)]
fn release_twice() {
    vec![bind("n", 1, 0), borrow("n", 0), end_borrow(0), end_borrow(0)]
}

#[test]
#[should_fail(BORROW_OUTLIVES_VALUE_ERROR)]
fn borrow_outlives_value() {
    examples::borrow_outlives_value()
}

#[test]
#[verifies("p")]
fn borrow_bounded_by_inner_scope() {
    vec![
        bind("p", 1, 0),
        open(),
        borrow_mut("p", 1),
        close(1),
        borrow_mut("p", 0),
    ]
}

#[test]
#[verifies]
fn writers_one_after_the_other() {
    vec![
        bind("n", 1, 0),
        borrow_mut("n", 0),
        end_borrow(0),
        borrow_mut("n", 0),
        end_borrow(1),
    ]
}

#[test]
fn ending_a_refused_borrow_is_silent() {
    let report = run(vec![
        bind("n", 1, 0),
        borrow_mut("n", 0),
        borrow("n", 0),
        end_borrow(1),
    ]);
    assert_eq!(report.codes(), [SHARED_BORROW_CONFLICT_ERROR]);
}

#[test]
fn unknown_borrow_halts() {
    let report = run(vec![bind("n", 1, 0), end_borrow(4), use_var("ghost")]);
    assert_eq!(report.codes(), [MALFORMED_REFERENCE_ERROR]);
    assert_eq!(report.halted_at, Some(1));
    assert!(report.drops.is_empty());
}

#[test]
fn borrows_expire_with_their_scope() -> anyhow::Result<()> {
    let ctx = Context::default();
    let mut verifier = Verifier::new();
    for op in [bind("n", 1, 0), open(), borrow("n", 1), borrow("n", 1)] {
        verifier.apply(&ctx, &op)?;
    }
    anyhow::ensure!(verifier.active_borrows(ValueId(1)).len() == 2);

    verifier.apply(&ctx, &close(1))?;
    anyhow::ensure!(verifier.active_borrows(ValueId(1)).is_empty());
    for borrow in [BorrowId(0), BorrowId(1)] {
        anyhow::ensure!(verifier.borrow_status(borrow) == Some(BorrowStatus::Expired));
    }
    // Expiry is silent.
    anyhow::ensure!(!ctx.has_errors());
    Ok(())
}
