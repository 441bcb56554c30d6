//! Defining the verification context.

use crate::config::Config;
use crate::reporter::{Diagnostic, Reporter};

/// Prints to the standard output, only in verbose mode.
macro_rules! verbose_print {
    ($ctx:expr, $($arg:tt)*) => {
        if $ctx.config.verbose {
            print!($($arg)*);
        }
    };
}

/// Prints a line to the standard output, only in verbose mode.
macro_rules! verbose_println {
    ($ctx:expr, $($arg:tt)*) => {
        if $ctx.config.verbose {
            println!($($arg)*);
        }
    };
}

/// Verification context.
pub struct Context {
    /// Verifier configuration.
    pub config: Config,
    /// Diagnostic reporter.
    pub reporter: Reporter,
}

impl Context {
    /// Creates a new verification context.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            reporter: Reporter::new(),
        }
    }

    /// Records a diagnostic.
    pub fn emit(&self, diagnostic: Diagnostic) {
        self.reporter.emit(diagnostic);
    }

    /// Was there any violation so far?
    pub fn has_errors(&self) -> bool {
        self.reporter.has_errors()
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
