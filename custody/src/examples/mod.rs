//! Sample traces.

mod borrows;
mod moves;
mod scopes;
mod sequences;

pub use borrows::*;
pub use moves::*;
pub use scopes::*;
pub use sequences::*;

pub use crate::trace::*;
