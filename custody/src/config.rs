//! Defining the verifier config options.

/// Verification configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Verbose mode.
    pub verbose: bool,
    /// Do not close the scopes still open at the end of the trace.
    ///
    /// By default, they are closed innermost first, dropping whatever they
    /// still own.
    pub leak_open_scopes: bool,
}
