//! Transforming sequences.
#![allow(missing_docs)]

use super::*;

/// `ys` is `[2, 4, 6, 8, 10]`, `xs` is untouched.
pub fn doubled_copy() -> Trace {
    vec![
        bind_seq("xs", 1, 0, 1..=5),
        borrow("xs", 0),
        project(1, mul(2), "ys", 2),
        end_borrow(0),
    ]
    .into()
}

/// `xs` becomes `[2, 4, 6, 8, 10]`.
pub fn doubled_in_place() -> Trace {
    vec![
        bind_seq("xs", 1, 0, 1..=5),
        open(),
        borrow_mut("xs", 1),
        mutate(1, mul(2)),
        close(1),
    ]
    .into()
}

pub fn mutate_shared() -> Trace {
    vec![
        bind_seq("xs", 1, 0, [1, 2, 3]),
        borrow("xs", 0),
        mutate(1, add(1)),
    ]
    .into()
}

pub fn project_while_mutably_borrowed() -> Trace {
    vec![
        bind_seq("xs", 1, 0, [1, 2, 3]),
        borrow_mut("xs", 0),
        project(1, ElementFn::Neg, "ys", 2),
    ]
    .into()
}
