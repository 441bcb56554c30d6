//! All the stuff for user-friendlier sets in Rust.

use std::collections::btree_set;
use std::collections::BTreeSet;
use std::fmt;
use std::ops::{Deref, DerefMut};

/// A set.
///
/// Wrapper around `BTreeSet` that is much more convenient to use. Iteration is
/// always in increasing order, which keeps diagnostics deterministic.
#[derive(PartialEq, Eq)]
pub struct Set<T: Ord>(BTreeSet<T>);

impl<T: Ord> Deref for Set<T> {
    type Target = BTreeSet<T>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T: Ord> DerefMut for Set<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<T: Ord> Set<T> {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }
}

impl<T: Ord + fmt::Debug> fmt::Debug for Set<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<T: Ord> Default for Set<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord + Clone> Clone for Set<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: Ord> FromIterator<T> for Set<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(BTreeSet::from_iter(iter))
    }
}

impl<'a, T: Ord> IntoIterator for &'a Set<T> {
    type IntoIter = btree_set::Iter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<T: Ord> IntoIterator for Set<T> {
    type IntoIter = btree_set::IntoIter<T>;
    type Item = T;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for Set<T> {
    fn from(arr: [T; N]) -> Self {
        Self::from_iter(arr)
    }
}
