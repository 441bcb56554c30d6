//! Module for all helper functions that are not related in particular to any
//! other module.

pub mod set;

pub use set::Set;

/// Alias for `Box::new()` to make it shorter and easier to use.
pub fn boxed<T>(t: T) -> Box<T> {
    Box::new(t)
}
