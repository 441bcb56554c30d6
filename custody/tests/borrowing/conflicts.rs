//! Exclusive mutation.

use super::*;

#[test]
#[verifies("n")]
fn two_readers() {
    examples::two_readers()
}

#[test]
#[verifies]
fn reader_then_writer() {
    examples::reader_then_writer()
}

#[test]
#[should_fail(MUTABLE_BORROW_CONFLICT_ERROR)]
fn writer_while_reading() {
    examples::writer_while_reading()
}

#[test]
#[should_fail(MUTABLE_BORROW_CONFLICT_ERROR)]
fn two_writers() {
    vec![bind("n", 1, 0), borrow_mut("n", 0), borrow_mut("n", 0)]
}

#[test]
#[should_fail(SHARED_BORROW_CONFLICT_ERROR)]
fn reader_while_writing() {
    vec![bind("n", 1, 0), borrow_mut("n", 0), borrow("n", 0)]
}

#[test]
#[should_fail(SHARED_BORROW_CONFLICT_ERROR)]
fn reading_owner_while_writing() {
    examples::reading_while_writing()
}

#[test]
#[should_fail(UNBOUND_NAME_ERROR)]
fn borrow_unknown_name() {
    vec![borrow("ghost", 0)]
}

#[test]
#[should_fail(USE_AFTER_MOVE_ERROR)]
fn borrow_moved_value() {
    vec![bind("n", 1, 0), mv("n", "m"), borrow("n", 0)]
}

#[test]
fn conflict_names_the_blocking_borrow() {
    let report = run(examples::writer_while_reading());
    assert_eq!(report.diagnostics.len(), 1);
    let diagnostic = &report.diagnostics[0];
    assert_eq!(diagnostic.op(), 2);
    assert!(diagnostic.involves(BorrowId(0)));
    assert!(diagnostic.involves(BorrowId(1)));
    assert!(diagnostic.involves(ValueId(1)));
    assert!(!diagnostic.is_fatal());
}

#[test]
fn refused_requests_consume_identifiers() -> anyhow::Result<()> {
    let ctx = Context::default();
    let mut verifier = Verifier::new();
    for op in [bind("n", 1, 0), borrow_mut("n", 0), borrow("n", 0)] {
        verifier.apply(&ctx, &op)?;
    }
    let granted = verifier.apply(&ctx, &end_borrow(0))?;
    anyhow::ensure!(granted == Produced::Nothing);

    // Now the reader goes through, as borrow number 2.
    let granted = verifier.apply(&ctx, &borrow("n", 0))?;
    anyhow::ensure!(granted == Produced::Borrow(BorrowId(2)));
    anyhow::ensure!(verifier.borrow_status(BorrowId(1)) == Some(BorrowStatus::Rejected));
    anyhow::ensure!(verifier.active_borrows(ValueId(1)).len() == 1);
    Ok(())
}
