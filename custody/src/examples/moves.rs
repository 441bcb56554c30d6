//! Moving values around.
#![allow(missing_docs)]

use super::*;

pub fn move_then_use() -> Trace {
    vec![bind("a", 1, 0), mv("a", "b"), use_var("b"), use_var("a")].into()
}

/// `b` is the one dropped, not `a`.
pub fn chained_moves() -> Trace {
    vec![bind("a", 1, 0), mv("a", "b"), mv("b", "c"), use_var("c")].into()
}

pub fn move_while_borrowed() -> Trace {
    vec![bind("a", 1, 0), borrow("a", 0), mv("a", "b")].into()
}

pub fn drop_twice() -> Trace {
    vec![bind("a", 1, 0), drop_var("a"), drop_var("a")].into()
}

pub fn use_after_drop() -> Trace {
    vec![bind("a", 1, 0), drop_var("a"), use_var("a")].into()
}

/// Moving into an inner scope: the value dies with it.
pub fn move_into_inner_scope() -> Trace {
    vec![
        bind("a", 1, 0),
        open(),
        mv("a", "b"),
        close(1),
        use_var("a"),
    ]
    .into()
}
