//! Ownership and aliasing verification engine library.
//!
//! Takes a trace of binding, moving, borrowing, using and scope-ending
//! operations, and determines whether it ever breaks the ownership
//! discipline: exclusive mutation, no use after transfer, and exactly-once
//! release of every value at scope boundaries.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::io::Write;
use std::time::Instant;

// Defined first so that the macros can be used in the other modules.
#[macro_use]
pub mod context;

mod borrowing;
mod checker;
pub mod codes;
pub mod config;
pub mod examples;
mod ownership;
pub mod reporter;
mod scope;
pub mod trace;
mod transform;
mod utils;

#[macro_use]
extern crate anyhow;

#[macro_use]
extern crate log;

use anyhow::Result;
pub use borrowing::{Borrow, BorrowKind, BorrowStatus, Loans};
pub use checker::{Produced, Report, Verifier};
pub use config::Config;
pub use context::Context;
pub use ownership::{Value, ValueState};
pub use reporter::{Diagnostic, DiagnosticKind, Involved};
pub use scope::DropEvent;
pub use steps::{check, verify};
pub use trace::Trace;
pub use transform::Transform;

mod steps {
    //! Defining the entry points of the verifier.

    use super::*;

    /// Verifies a given trace.
    ///
    /// Never fails: every violation found, fatal or not, is in the report.
    ///
    /// Under the hood, this function is in charge of allocating a new
    /// `Verifier` and launching it on your trace.
    pub fn verify(ctx: &mut Context, trace: impl Into<Trace>) -> Report {
        verbose_print!(ctx, "Verifying...");
        std::io::stdout().flush().ok();
        let start = Instant::now();

        let trace = trace.into();
        let report = Verifier::new().check(ctx, &trace);
        verbose_println!(
            ctx,
            "\rVerified {} operations [{:?}]",
            trace.len(),
            start.elapsed()
        );
        report
    }

    /// Checks a given trace.
    ///
    /// If it returns successfully, the trace follows the ownership discipline.
    /// Otherwise, the diagnostics are the source of the error.
    pub fn check(ctx: &mut Context, trace: impl Into<Trace>) -> Result<Report> {
        let report = verify(ctx, trace);
        if report.is_clean() {
            Ok(report)
        } else {
            let summary = report
                .diagnostics
                .iter()
                .map(|diagnostic| format!("{diagnostic:?}"))
                .collect::<Vec<_>>()
                .join("\n");
            Err(anyhow!(summary).context("found ownership errors"))
        }
    }
}
