//! Test attributes for verifier traces.

extern crate proc_macro;
use proc_macro::TokenStream;

#[macro_use]
extern crate quote;

mod should_fail;
mod verifies;

/// The trace returned by the test body must produce exactly the given set of
/// error codes.
#[proc_macro_attribute]
pub fn should_fail(attr: TokenStream, item: TokenStream) -> TokenStream {
    should_fail::should_fail(attr, item)
}

/// The trace returned by the test body must verify cleanly, optionally
/// dropping the given names in that order.
#[proc_macro_attribute]
pub fn verifies(attr: TokenStream, item: TokenStream) -> TokenStream {
    verifies::verifies(attr, item)
}
