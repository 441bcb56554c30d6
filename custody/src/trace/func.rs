//! Functions applied to every element of a sequence.

use std::fmt;

use num_bigint::BigInt;
use num_traits::Signed;

/// A per-element function.
///
/// Kept as plain data so that traces can be cloned, compared and printed.
#[derive(Clone, PartialEq, Eq)]
pub enum ElementFn {
    /// Leaves the element unchanged.
    Identity,
    /// Adds a constant.
    Add(BigInt),
    /// Multiplies by a constant.
    Mul(BigInt),
    /// Negation.
    Neg,
    /// Absolute value.
    Abs,
}

impl ElementFn {
    /// Applies the function to one element.
    pub fn apply(&self, element: &BigInt) -> BigInt {
        match self {
            ElementFn::Identity => element.clone(),
            ElementFn::Add(k) => element + k,
            ElementFn::Mul(k) => element * k,
            ElementFn::Neg => -element,
            ElementFn::Abs => element.abs(),
        }
    }
}

impl fmt::Debug for ElementFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementFn::Identity => write!(f, "id"),
            ElementFn::Add(k) => write!(f, "+ {k}"),
            ElementFn::Mul(k) => write!(f, "* {k}"),
            ElementFn::Neg => write!(f, "neg"),
            ElementFn::Abs => write!(f, "abs"),
        }
    }
}

/// Adds `k` to each element.
pub fn add(k: i64) -> ElementFn {
    ElementFn::Add(k.into())
}

/// Multiplies each element by `k`.
pub fn mul(k: i64) -> ElementFn {
    ElementFn::Mul(k.into())
}
