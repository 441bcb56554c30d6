use proc_macro::TokenStream;
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{parse_macro_input, LitStr, Result, Token};

use crate::should_fail::TraceFn;

struct VerifiesAttr {
    drop_order: Option<Punctuated<LitStr, Token![,]>>,
}

impl Parse for VerifiesAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        if input.is_empty() {
            return Ok(Self { drop_order: None });
        }
        let drop_order = Punctuated::parse_terminated(input)?;
        Ok(Self {
            drop_order: Some(drop_order),
        })
    }
}

pub fn verifies(attr: TokenStream, item: TokenStream) -> TokenStream {
    let attr = parse_macro_input!(attr as VerifiesAttr);
    let item = parse_macro_input!(item as TraceFn);

    let VerifiesAttr { drop_order } = attr;
    let TraceFn { name, attrs, trace } = item;

    let check_drops = match drop_order {
        Some(names) => quote! {
            let expected: &[&str] = &[#names];
            if report.drop_order() != expected {
                ::anyhow::bail!("Drop order mismatch. Expected {expected:?}, got {:?}", report.drop_order());
            }
        },
        None => quote! {
            let _ = report;
        },
    };

    quote! {
        #(#attrs)*
        fn #name() -> ::anyhow::Result<()> {
            let _ = ::env_logger::builder().is_test(true).try_init();
            let trace: ::custody_lib::Trace = ::std::convert::Into::into(#trace);
            let mut context = ::custody_lib::Context::new(::custody_lib::Config::default());
            let report = ::custody_lib::check(&mut context, trace)?;
            #check_drops
            Ok(())
        }
    }
    .into()
}
