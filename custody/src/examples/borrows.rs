//! Borrowing values.
#![allow(missing_docs)]

use super::*;

/// Two readers at once.
pub fn two_readers() -> Trace {
    vec![
        bind("n", 1, 0),
        borrow("n", 0),
        borrow("n", 0),
        use_var("n"),
        end_borrow(0),
        end_borrow(1),
    ]
    .into()
}

pub fn reader_then_writer() -> Trace {
    vec![
        bind("n", 1, 0),
        borrow("n", 0),
        end_borrow(0),
        borrow_mut("n", 0),
        end_borrow(1),
    ]
    .into()
}

/// `b1` is refused while `b0` is active.
pub fn writer_while_reading() -> Trace {
    vec![bind("n", 1, 0), borrow("n", 0), borrow_mut("n", 0)].into()
}

pub fn reading_while_writing() -> Trace {
    vec![bind("n", 1, 0), borrow_mut("n", 0), use_var("n")].into()
}

/// The borrow ends with the inner scope, so ending it again is too late.
pub fn released_by_scope() -> Trace {
    vec![
        bind("n", 1, 0),
        open(),
        borrow_mut("n", 1),
        close(1),
        end_borrow(0),
    ]
    .into()
}

/// `p` lives in the inner scope, its borrow cannot be bounded by the root.
pub fn borrow_outlives_value() -> Trace {
    vec![open(), bind("p", 1, 1), borrow("p", 0), close(1)].into()
}
