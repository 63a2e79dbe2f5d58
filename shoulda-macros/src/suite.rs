//! `suite!` macro: define a shoulda suite and run it as one `#[test]`

use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::parse::{Parse, ParseStream};
use syn::{Expr, Ident, LitStr, Token, Type};

/// Convert a suite name to snake_case for the generated test function
fn to_snake_case(name: &str) -> String {
    let mut result = String::new();
    let mut prev_is_uppercase = false;

    for (i, c) in name.chars().enumerate() {
        if c.is_ascii_alphanumeric() {
            if c.is_uppercase() {
                if i > 0 && !prev_is_uppercase && !result.ends_with('_') {
                    result.push('_');
                }
                result.push(c.to_ascii_lowercase());
                prev_is_uppercase = true;
            } else {
                result.push(c);
                prev_is_uppercase = false;
            }
        } else if (c.is_whitespace() || c == '-' || c == '_' || c == ':')
            && !result.ends_with('_')
            && !result.is_empty()
        {
            result.push('_');
        }
    }

    while result.ends_with('_') {
        result.pop();
    }

    if result.is_empty() || result.starts_with(|c: char| c.is_ascii_digit()) {
        result.insert_str(0, "suite_");
    }

    result
}

/// Arguments for the suite! macro
/// Supports: suite!("Name", State, |s| { ... })
///           suite!("Name", State, registry = expr, |s| { ... })
struct SuiteArgs {
    name: LitStr,
    state: Type,
    registry: Option<Expr>,
    define: Expr,
}

impl Parse for SuiteArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let name: LitStr = input.parse()?;
        input.parse::<Token![,]>()?;

        let state: Type = input.parse()?;
        input.parse::<Token![,]>()?;

        let registry = if input.peek(Ident) && input.peek2(Token![=]) {
            let key: Ident = input.parse()?;
            if key != "registry" {
                return Err(syn::Error::new(key.span(), "expected `registry = <expr>`"));
            }
            input.parse::<Token![=]>()?;
            let registry: Expr = input.parse()?;
            input.parse::<Token![,]>()?;
            Some(registry)
        } else {
            None
        };

        let define: Expr = input.parse()?;
        if input.peek(Token![,]) {
            input.parse::<Token![,]>()?;
        }

        Ok(Self {
            name,
            state,
            registry,
            define,
        })
    }
}

pub fn suite_impl(input: TokenStream) -> TokenStream {
    let args = match syn::parse::<SuiteArgs>(input) {
        Ok(args) => args,
        Err(e) => return e.to_compile_error().into(),
    };

    let name_str = args.name.value();
    if name_str.trim().is_empty() {
        return syn::Error::new(args.name.span(), "suite name must not be empty")
            .to_compile_error()
            .into();
    }

    let fn_name = format_ident!("{}", to_snake_case(&name_str));
    let state = args.state;
    let define = args.define;

    let builder = match args.registry {
        Some(registry) => quote! {
            ::shoulda::SuiteBuilder::<#state>::with_registry(#name_str, #registry)
        },
        None => quote! {
            ::shoulda::SuiteBuilder::<#state>::new(#name_str)
        },
    };

    let output = quote! {
        #[test]
        fn #fn_name() {
            ::shoulda::logging::init();

            let mut __suite = #builder;
            __suite.define(#define);

            match __suite.build() {
                Ok(__built) => __built.run().assert_passed(),
                Err(e) => panic!("suite {:?} could not be defined: {}", #name_str, e),
            }
        }
    };

    output.into()
}
