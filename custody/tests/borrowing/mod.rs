//! Requesting and ending borrows.

use custody_lib::{BorrowStatus, Produced, Verifier};

use super::*;

mod conflicts;
mod lifetimes;
