//! QuickBench Macros
//!
//! Procedural macro for export registration.
//!
//! ## Macros
//!
//! - `#[quickbench::export]` - Register a function as a module export

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{ItemFn, ReturnType, Type, parse_macro_input};

// ============================================================================
// Attribute Parsing Helpers
// ============================================================================

mod attr {
    use syn::meta::ParseNestedMeta;

    /// Get the attribute name as a string
    pub fn name(meta: &ParseNestedMeta) -> String {
        meta.path
            .get_ident()
            .map(|i| i.to_string())
            .unwrap_or_default()
    }

    /// Parse a string literal attribute: `attr = "value"`
    pub fn string(meta: &ParseNestedMeta) -> syn::Result<String> {
        let value: syn::LitStr = meta.value()?.parse()?;
        Ok(value.value())
    }

    /// Create an unknown attribute error
    pub fn unknown(meta: &ParseNestedMeta, name: &str) -> syn::Error {
        meta.error(format!("unknown attribute: {}", name))
    }
}

/// Register a function as an export of its source file
///
/// Every annotated function is recorded with its name, `file!()` and
/// `line!()`. Which exports run is decided later by name prefix: `bench*`
/// functions in benchmark mode, `compare*` functions in comparison mode.
///
/// # Example
///
/// ```ignore
/// #[quickbench::export]
/// fn bench_parse() {
///     parse(INPUT);
/// }
///
/// #[quickbench::export]
/// async fn bench_fetch() {
///     fetch().await;
/// }
///
/// // Functions returning `Vec<BenchmarkUnit>` register as comparison groups
/// #[quickbench::export]
/// fn compare_sorts() -> Vec<BenchmarkUnit> {
///     vec![unit!(sort_std), unit!(sort_insertion)]
/// }
///
/// // Explicit name and kind
/// #[quickbench::export(name = "compareHashers", group)]
/// fn hashers() -> HasherSet { ... }
/// ```
#[proc_macro_attribute]
pub fn export(args: TokenStream, item: TokenStream) -> TokenStream {
    let args = TokenStream2::from(args);
    let func = parse_macro_input!(item as ItemFn);

    export_impl(args, func)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

#[derive(Default)]
struct ExportConfig {
    name: Option<String>,
    group: bool,
}

fn parse_export_config(args: TokenStream2) -> Result<ExportConfig, syn::Error> {
    let mut config = ExportConfig::default();

    if args.is_empty() {
        return Ok(config);
    }

    let parser = syn::meta::parser(|meta| {
        let name = attr::name(&meta);
        match name.as_str() {
            "name" => config.name = Some(attr::string(&meta)?),
            "group" => config.group = true,
            _ => return Err(attr::unknown(&meta, &name)),
        }
        Ok(())
    });

    syn::parse::Parser::parse2(parser, args)?;
    Ok(config)
}

fn export_impl(args: TokenStream2, func: ItemFn) -> Result<TokenStream2, syn::Error> {
    validate_signature(&func)?;

    let config = parse_export_config(args)?;

    let fn_name = &func.sig.ident;
    let export_name = config.name.unwrap_or_else(|| fn_name.to_string());
    let is_async = func.sig.asyncness.is_some();
    let is_group = config.group || returns_vec(&func.sig.output);

    let factory = if is_group {
        if is_async {
            return Err(syn::Error::new_spanned(
                &func.sig,
                "QuickBench: comparison groups must be synchronous functions",
            ));
        }
        quote! {
            ::quickbench::ExportFactory::Group(|| {
                ::std::iter::IntoIterator::into_iter(#fn_name()).collect()
            })
        }
    } else if is_async {
        quote! {
            ::quickbench::ExportFactory::Unit(|| {
                ::quickbench::BenchmarkUnit::asynchronous(#export_name, #fn_name)
            })
        }
    } else {
        quote! {
            ::quickbench::ExportFactory::Unit(|| {
                ::quickbench::BenchmarkUnit::sync(#export_name, #fn_name)
            })
        }
    };

    Ok(quote! {
        #func

        ::quickbench::internal::inventory::submit! {
            ::quickbench::ExportDef {
                name: #export_name,
                file: file!(),
                line: line!(),
                module_path: module_path!(),
                factory: #factory,
            }
        }
    })
}

fn validate_signature(func: &ItemFn) -> syn::Result<()> {
    if !func.sig.inputs.is_empty() {
        return Err(syn::Error::new_spanned(
            &func.sig.inputs,
            "QuickBench: exported functions must take no arguments",
        ));
    }
    if !func.sig.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &func.sig.generics,
            "QuickBench: exported functions cannot be generic",
        ));
    }
    Ok(())
}

/// `-> Vec<...>` marks a comparison group
fn returns_vec(output: &ReturnType) -> bool {
    match output {
        ReturnType::Type(_, ty) => match ty.as_ref() {
            Type::Path(path) => path
                .path
                .segments
                .last()
                .is_some_and(|segment| segment.ident == "Vec"),
            _ => false,
        },
        ReturnType::Default => false,
    }
}
