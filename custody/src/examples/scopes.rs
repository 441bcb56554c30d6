//! Nesting scopes.
#![allow(missing_docs)]

use super::*;

/// Values die in reverse declaration order, innermost scope first.
pub fn nested_drops() -> Trace {
    vec![
        bind("x", 1, 0),
        open(),
        bind("y", 2, 1),
        bind("z", 3, 1),
        close(1),
        bind("w", 4, 0),
    ]
    .into()
}

pub fn out_of_order_close() -> Trace {
    vec![open(), open(), close(1), bind("never", 1, 0)].into()
}

pub fn close_twice() -> Trace {
    vec![open(), close(1), close(1)].into()
}

pub fn shadowing() -> Trace {
    vec![bind("x", 1, 0), bind("x", 2, 0), use_var("x")].into()
}

pub fn rebinding_outer_name() -> Trace {
    vec![bind("x", 1, 0), open(), bind("x", 2, 1), close(1)].into()
}

pub fn out_of_scope() -> Trace {
    vec![open(), bind("p", 1, 1), close(1), use_var("p")].into()
}
