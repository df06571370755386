use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{quote, ToTokens};
use syn::{parse_macro_input, FnArg, Ident, ItemFn, Pat, ReturnType, Type};

use memocache_macro_utils::{
    generate_key_expr, mentions_self_type, parse_cache_attributes, split_result_type,
};

fn reject(tokens: impl ToTokens, message: &str) -> TokenStream {
    syn::Error::new_spanned(tokens, message)
        .to_compile_error()
        .into()
}

/// Generate the call through the store.
///
/// For `Result<T, E>` the store holds `T` and the body is the fallible
/// computation itself, so an `Err` is returned without being stored.
fn generate_cached_call(
    ret_type: &TokenStream2,
    result_parts: Option<(&Type, &Type)>,
    block: &syn::Block,
) -> (TokenStream2, TokenStream2) {
    match result_parts {
        Some((ok_type, _)) => (
            quote! { #ok_type },
            quote! {
                __MEMOCACHE_STORE.get_or_try_insert_with(__key, || -> #ret_type #block)
            },
        ),
        None => (
            ret_type.clone(),
            quote! {
                match __MEMOCACHE_STORE.get_or_try_insert_with(__key, || {
                    ::std::result::Result::<#ret_type, ::std::convert::Infallible>::Ok(
                        (|| -> #ret_type #block)(),
                    )
                }) {
                    ::std::result::Result::Ok(value) => value,
                    ::std::result::Result::Err(never) => match never {},
                }
            },
        ),
    }
}

/// A procedural macro that caches the results of a function or method.
///
/// The function keeps its exact signature. Its arguments, and `self` for
/// methods, form the cache key; each annotated function owns one store shared
/// by all threads.
///
/// # Requirements
///
/// - **Arguments**: Must implement `CacheableKey` and be bound to plain identifiers
/// - **Return type**: Must be `Clone + Send + 'static` and must not mention `Self`
/// - **Generics**: Generic functions and `async fn` are not supported
/// - **Function purity**: The function should return the same output for the
///   same input; a cached call skips the body entirely
///
/// # Macro Parameters
///
/// - `policy` (optional): `"unbounded"` (default), `"ttl"`, `"lru"` or `"lfu"`
/// - `maxsize`: Capacity, required by `"lru"` and `"lfu"`, at least 1
/// - `ttl`: Entry lifetime in seconds, required by `"ttl"`. Giving `ttl`
///   without `policy` selects the TTL policy
/// - `concurrency` (optional): `"shared"` (default) computes outside the lock
///   and tolerates recursion; `"serialized"` holds the lock for the whole call
///   so each key is computed once, but must not recurse
/// - `name` (optional): Identifier in the statistics registry and in log
///   events. Default: the function name
///
/// Invalid combinations (a zero or missing `maxsize`, a missing `ttl`, a
/// parameter the policy does not use) are compile errors.
///
/// # Cache Behavior
///
/// - **Regular functions**: All results are cached
/// - **Result-returning functions**: Only `Ok` values are cached; an `Err`
///   is returned as is and neither stores nor evicts anything
/// - **Methods**: `self` is the first key component
/// - **Unhashable arguments**: A call whose key cannot be built (a NaN float,
///   for instance) panics with the key error before running the body
///
/// # Examples
///
/// ```ignore
/// use memocache::cache;
///
/// #[cache]
/// fn fibonacci(n: u64) -> u64 {
///     if n <= 1 {
///         return n;
///     }
///     fibonacci(n - 1) + fibonacci(n - 2)
/// }
///
/// #[cache(policy = "lru", maxsize = 100)]
/// fn add(a: i32, b: i32) -> i32 {
///     a + b
/// }
///
/// #[cache(ttl = 60)]
/// fn fetch_user(id: u32) -> Result<User, ApiError> {
///     api_call(id)
/// }
///
/// #[cache(policy = "lfu", maxsize = 50, name = "scores_v2")]
/// fn score(player: &str) -> u64 {
///     compute_score(player)
/// }
/// ```
#[proc_macro_attribute]
pub fn cache(attr: TokenStream, item: TokenStream) -> TokenStream {
    let attrs = match parse_cache_attributes(attr.into()) {
        Ok(attrs) => attrs,
        Err(err) => return err.into(),
    };

    let input = parse_macro_input!(item as ItemFn);
    let fn_attrs = &input.attrs;
    let vis = &input.vis;
    let sig = &input.sig;
    let ident = &sig.ident;
    let block = &input.block;

    if sig.asyncness.is_some() {
        return reject(sig.asyncness, "#[cache] does not support async functions");
    }
    if sig.generics.type_params().next().is_some() || sig.generics.const_params().next().is_some()
    {
        return reject(&sig.generics, "#[cache] does not support generic functions");
    }

    let config_expr = match attrs.config_expr(ident) {
        Ok(expr) => expr,
        Err(err) => return err.into(),
    };

    let ret_type = match &sig.output {
        ReturnType::Type(_, ty) => quote! { #ty },
        ReturnType::Default => quote! { () },
    };
    if mentions_self_type(ret_type.clone()) {
        return reject(&sig.output, "#[cache] cannot store values whose type mentions `Self`");
    }

    let mut receiver = None;
    let mut args: Vec<Ident> = Vec::new();
    for arg in sig.inputs.iter() {
        match arg {
            FnArg::Receiver(r) => receiver = Some(r),
            FnArg::Typed(pat_type) => match pat_type.pat.as_ref() {
                Pat::Ident(pat_ident) if pat_ident.subpat.is_none() => {
                    args.push(pat_ident.ident.clone());
                }
                other => {
                    return reject(other, "#[cache] arguments must be bound to plain identifiers")
                }
            },
        }
    }

    let key_expr = generate_key_expr(receiver, &args);
    let result_parts = match &sig.output {
        ReturnType::Type(_, ty) => split_result_type(ty),
        ReturnType::Default => None,
    };
    let (value_type, cached_call) = generate_cached_call(&ret_type, result_parts, block);

    let cache_name = attrs.custom_name.unwrap_or_else(|| ident.to_string());

    let expanded = quote! {
        #(#fn_attrs)*
        #vis #sig {
            static __MEMOCACHE_STORE: ::memocache::__private::once_cell::sync::Lazy<
                ::memocache::SharedStore<#value_type>,
            > = ::memocache::__private::once_cell::sync::Lazy::new(|| {
                match ::memocache::SharedStore::from_config(&#config_expr) {
                    ::std::result::Result::Ok(store) => store.with_name(#cache_name),
                    ::std::result::Result::Err(err) => {
                        panic!("cache `{}` cannot be built: {}", #cache_name, err)
                    }
                }
            });

            let __key = match #key_expr {
                ::std::result::Result::Ok(key) => key,
                ::std::result::Result::Err(err) => {
                    panic!("cannot cache call to `{}`: {}", #cache_name, err)
                }
            };

            #cached_call
        }
    };

    TokenStream::from(expanded)
}
