use proc_macro::TokenStream;
use quote::{format_ident, quote, quote_spanned};
use syn::spanned::Spanned;

/// Turns a function taking `&apiharness::TestContext` into a `#[test]`.
///
/// The test gets its own mock server and a config pointing at it. An optional
/// `fn(&mut apiharness::Config)` may be passed to adjust the config before the
/// body runs. The start and the outcome of the test are logged, and panics are
/// re-raised after the outcome is written.
#[proc_macro_attribute]
pub fn harness_test(attrs: TokenStream, item: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(item as syn::ItemFn);
    let args = syn::parse_macro_input!(attrs as syn::AttributeArgs);

    let configuration_function: proc_macro2::TokenStream = match args.as_slice() {
        [] => quote! { None },
        [syn::NestedMeta::Meta(syn::Meta::Path(function_path))] => {
            quote! { Some(#function_path as fn(&mut apiharness::Config)) }
        }
        _ => {
            return quote! {
                compile_error!("The only accepted argument is a configuration function!");
            }
            .into();
        }
    };

    if let Some(asyncness) = &input.sig.asyncness {
        return quote_spanned! {asyncness.span()=>
            compile_error!("Harness tests can't be async!");
        }
        .into();
    }

    let attributes = &input.attrs;
    let visibility = &input.vis;
    let test_name = &input.sig.ident;
    let output = &input.sig.output;

    let mut body_signature = input.sig.clone();
    body_signature.ident = format_ident!("__harness_test_body");
    let block = &input.block;

    let call_body = match input.sig.inputs.len() {
        0 => quote! { __harness_test_body() },
        1 => quote! { __harness_test_body(&__harness_context) },
        _ => {
            return quote_spanned! {input.sig.inputs.span()=>
                compile_error!("A harness test takes at most one argument, the &TestContext!");
            }
            .into();
        }
    };

    let expanded = quote! {
        #[test]
        #(#attributes)*
        #visibility fn #test_name() #output {
            #body_signature #block

            let __harness_context = match apiharness::TestContext::start(
                stringify!(#test_name),
                #configuration_function,
            ) {
                Ok(context) => context,
                Err(e) => panic!("Couldn't start the test context: {}", e),
            };

            match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| #call_body)) {
                Ok(output) => {
                    let passed = apiharness::TestOutcome::passed(&output);
                    __harness_context.finish(passed);
                    output
                }
                Err(panic) => {
                    __harness_context.finish(false);
                    std::panic::resume_unwind(panic)
                }
            }
        }
    };

    TokenStream::from(expanded)
}
