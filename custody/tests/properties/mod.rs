//! Properties that hold for every trace.

use custody_lib::{Produced, Verifier};

use super::*;

mod random;

#[test]
fn use_after_move_is_always_reported() {
    for (src, dest) in [("a", "b"), ("b", "a"), ("x", "x2")] {
        let report = run(vec![bind(src, 1, 0), mv(src, dest), use_var(src)]);
        assert_eq!(report.codes(), [USE_AFTER_MOVE_ERROR], "{src} -> {dest}");
    }
}

#[test]
fn out_of_order_close_always_halts() {
    for depth in 2..6 {
        let mut trace: Vec<_> = (0..depth).map(|_| open()).collect();
        trace.push(close(1));
        trace.push(use_var("ghost"));
        let report = run(trace);
        assert_eq!(report.codes(), [SCOPE_ORDER_ERROR]);
        assert_eq!(report.halted_at, Some(depth));
    }
}

#[test]
fn unended_borrows_end_with_their_scope() {
    for kind in [borrow("n", 1), borrow_mut("n", 1)] {
        let report = run(vec![bind("n", 1, 0), open(), kind, close(1), end_borrow(0)]);
        assert_eq!(report.codes(), [DOUBLE_RELEASE_ERROR]);
    }
}
