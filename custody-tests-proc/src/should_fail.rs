use proc_macro::TokenStream;
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{parse_macro_input, Attribute, Block, Error, Expr, Ident, ItemFn, Result, Token};

struct ShouldFailAttr {
    expected_errors: Punctuated<Expr, Token![,]>,
}

impl Parse for ShouldFailAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let expected_errors = Punctuated::parse_terminated(input)?;
        if expected_errors.is_empty() {
            return Err(input.error("expected at least one error code"));
        }
        Ok(Self { expected_errors })
    }
}

pub(crate) struct TraceFn {
    pub name: Ident,
    pub attrs: Vec<Attribute>,
    pub trace: Block,
}

impl Parse for TraceFn {
    fn parse(input: ParseStream) -> Result<Self> {
        let f: ItemFn = input.parse()?;
        if !f.sig.inputs.is_empty() {
            return Err(Error::new(f.sig.inputs.span(), "expected no arguments"));
        }
        Ok(Self {
            name: f.sig.ident,
            attrs: f.attrs,
            trace: *f.block,
        })
    }
}

pub fn should_fail(attr: TokenStream, item: TokenStream) -> TokenStream {
    let attr = parse_macro_input!(attr as ShouldFailAttr);
    let item = parse_macro_input!(item as TraceFn);

    let ShouldFailAttr { expected_errors } = attr;
    let TraceFn { name, attrs, trace } = item;

    quote! {
        #(#attrs)*
        fn #name() -> ::anyhow::Result<()> {
            use ::std::collections::HashSet;
            let _ = ::env_logger::builder().is_test(true).try_init();
            let trace: ::custody_lib::Trace = ::std::convert::Into::into(#trace);
            let mut context = ::custody_lib::Context::new(::custody_lib::Config::default());
            let report = ::custody_lib::verify(&mut context, trace);
            let codes = report.codes().into_iter().collect::<HashSet<&str>>();
            let expected = [#expected_errors].into_iter().collect::<HashSet<&str>>();
            if codes == expected {
                Ok(())
            } else {
                ::anyhow::bail!("Error codes mismatch. Expected {expected:?}, got {codes:?}: {:#?}", report.diagnostics);
            }
        }
    }
    .into()
}
