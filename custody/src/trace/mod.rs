//! Operation traces, the input of the verifier.
//!
//! Traces are built by an external front end. The lowercase helpers (`bind`,
//! `mv`, `borrow_mut`, ...) build single operations and make hand-written
//! traces short to read.

mod func;
mod ids;
mod op;

pub use func::*;
pub use ids::*;
pub use op::*;
