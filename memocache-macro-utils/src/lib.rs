//! Shared utilities for memocache procedural macros
//!
//! This crate provides the attribute parsing, configuration checks and code
//! generation helpers used by `memocache-macros`.

use proc_macro2::TokenStream as TokenStream2;
use quote::{quote, ToTokens};
use syn::{
    punctuated::Punctuated, Expr, GenericArgument, Ident, MetaNameValue, PathArguments, Receiver,
    Token, Type,
};

/// Policy named by the `policy` attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PolicyKind {
    Unbounded,
    Ttl,
    Lru,
    Lfu,
}

impl PolicyKind {
    fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "unbounded" | "memoize" => Some(PolicyKind::Unbounded),
            "ttl" => Some(PolicyKind::Ttl),
            "lru" => Some(PolicyKind::Lru),
            "lfu" => Some(PolicyKind::Lfu),
            _ => None,
        }
    }
}

/// Parsed `#[cache(...)]` attributes.
#[derive(Default)]
pub struct CacheAttributes {
    pub policy: Option<PolicyKind>,
    pub maxsize: Option<usize>,
    /// Seconds.
    pub ttl: Option<u64>,
    pub serialized: bool,
    pub custom_name: Option<String>,
}

fn error(tokens: impl ToTokens, message: &str) -> TokenStream2 {
    syn::Error::new_spanned(tokens, message).to_compile_error()
}

fn parse_int_attribute<T>(nv: &MetaNameValue, what: &str) -> Result<T, TokenStream2>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match &nv.value {
        Expr::Lit(expr_lit) => match &expr_lit.lit {
            syn::Lit::Int(lit_int) => lit_int
                .base10_parse::<T>()
                .map_err(|err| error(lit_int, &format!("invalid `{}`: {}", what, err))),
            other => Err(error(
                other,
                &format!("invalid literal for `{}`: expected integer", what),
            )),
        },
        other => Err(error(
            other,
            &format!("invalid syntax for `{}`: expected `{} = <integer>`", what, what),
        )),
    }
}

fn parse_str_attribute(nv: &MetaNameValue, what: &str) -> Result<String, TokenStream2> {
    match &nv.value {
        Expr::Lit(expr_lit) => match &expr_lit.lit {
            syn::Lit::Str(s) => Ok(s.value()),
            other => Err(error(
                other,
                &format!("invalid literal for `{}`: expected string", what),
            )),
        },
        other => Err(error(
            other,
            &format!("invalid syntax for `{}`: expected `{} = \"...\"`", what, what),
        )),
    }
}

/// Parse the `policy` attribute
pub fn parse_policy_attribute(nv: &MetaNameValue) -> Result<PolicyKind, TokenStream2> {
    let value = parse_str_attribute(nv, "policy")?;
    PolicyKind::parse(&value).ok_or_else(|| {
        error(
            &nv.value,
            "invalid policy: expected \"unbounded\", \"ttl\", \"lru\" or \"lfu\"",
        )
    })
}

/// Parse the `concurrency` attribute; returns whether it is `"serialized"`.
pub fn parse_concurrency_attribute(nv: &MetaNameValue) -> Result<bool, TokenStream2> {
    match parse_str_attribute(nv, "concurrency")?.as_str() {
        "shared" => Ok(false),
        "serialized" => Ok(true),
        _ => Err(error(
            &nv.value,
            "invalid concurrency: expected \"shared\" or \"serialized\"",
        )),
    }
}

/// Parse cache attributes from a token stream
pub fn parse_cache_attributes(attr: TokenStream2) -> Result<CacheAttributes, TokenStream2> {
    use syn::parse::Parser;

    let parser = Punctuated::<MetaNameValue, Token![,]>::parse_terminated;
    let parsed_args = parser.parse2(attr).map_err(|e| e.to_compile_error())?;

    let mut attrs = CacheAttributes::default();

    for nv in parsed_args {
        if nv.path.is_ident("policy") {
            attrs.policy = Some(parse_policy_attribute(&nv)?);
        } else if nv.path.is_ident("maxsize") {
            attrs.maxsize = Some(parse_int_attribute(&nv, "maxsize")?);
        } else if nv.path.is_ident("ttl") {
            attrs.ttl = Some(parse_int_attribute(&nv, "ttl")?);
        } else if nv.path.is_ident("concurrency") {
            attrs.serialized = parse_concurrency_attribute(&nv)?;
        } else if nv.path.is_ident("name") {
            attrs.custom_name = Some(parse_str_attribute(&nv, "name")?);
        } else {
            return Err(error(
                &nv.path,
                "unknown attribute: expected `policy`, `maxsize`, `ttl`, `concurrency` or `name`",
            ));
        }
    }

    Ok(attrs)
}

impl CacheAttributes {
    /// The effective policy. Without `policy`, a `ttl` selects the TTL policy
    /// and anything else is unbounded.
    pub fn resolved_policy(&self) -> PolicyKind {
        match (self.policy, self.ttl) {
            (Some(policy), _) => policy,
            (None, Some(_)) => PolicyKind::Ttl,
            (None, None) => PolicyKind::Unbounded,
        }
    }

    /// Checks the attribute combination and generates the `CacheConfig`
    /// expression for it.
    ///
    /// `span` is where configuration errors are reported.
    pub fn config_expr(&self, span: impl ToTokens) -> Result<TokenStream2, TokenStream2> {
        let policy = self.resolved_policy();
        let config = match policy {
            PolicyKind::Unbounded => {
                if self.maxsize.is_some() || self.ttl.is_some() {
                    return Err(error(
                        span,
                        "an unbounded cache takes neither `maxsize` nor `ttl`",
                    ));
                }
                quote! { ::memocache::CacheConfig::unbounded() }
            }
            PolicyKind::Ttl => {
                if self.maxsize.is_some() {
                    return Err(error(span, "a TTL cache does not take `maxsize`"));
                }
                let secs = self
                    .ttl
                    .ok_or_else(|| error(&span, "TTL cache requires a ttl"))?;
                quote! {
                    ::memocache::CacheConfig::ttl(::std::time::Duration::from_secs(#secs))
                }
            }
            PolicyKind::Lru | PolicyKind::Lfu => {
                let label = if policy == PolicyKind::Lru { "LRU" } else { "LFU" };
                if self.ttl.is_some() {
                    return Err(error(
                        span,
                        &format!("an {} cache does not take `ttl`", label),
                    ));
                }
                let maxsize = match self.maxsize {
                    Some(0) => {
                        return Err(error(
                            span,
                            &format!("{} cache requires a maxsize of at least 1", label),
                        ))
                    }
                    Some(maxsize) => maxsize,
                    None => {
                        return Err(error(span, &format!("{} cache requires a maxsize", label)))
                    }
                };
                if policy == PolicyKind::Lru {
                    quote! { ::memocache::CacheConfig::lru(#maxsize) }
                } else {
                    quote! { ::memocache::CacheConfig::lfu(#maxsize) }
                }
            }
        };

        let concurrency = if self.serialized {
            quote! { ::memocache::Concurrency::Serialized }
        } else {
            quote! { ::memocache::Concurrency::Shared }
        };

        Ok(quote! { #config.with_concurrency(#concurrency) })
    }
}

/// Generate the cache key expression for a call.
///
/// The receiver, when present, is the first positional component. The
/// expression evaluates to `Result<CacheKey, CacheError>`.
pub fn generate_key_expr(receiver: Option<&Receiver>, args: &[Ident]) -> TokenStream2 {
    let receiver_part = receiver.map(|receiver| {
        if receiver.reference.is_some() {
            quote! { &*self as &dyn ::memocache::CacheableKey, }
        } else {
            quote! { &self as &dyn ::memocache::CacheableKey, }
        }
    });

    quote! {
        ::memocache::build_key(
            &[#receiver_part #(&#args as &dyn ::memocache::CacheableKey),*],
            &[],
        )
    }
}

/// Splits `Result<T, E>` into `(T, E)`.
///
/// Only the two-parameter form is recognized; aliases such as
/// `io::Result<T>` are cached as plain values.
pub fn split_result_type(ty: &Type) -> Option<(&Type, &Type)> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    if segment.ident != "Result" {
        return None;
    }
    let PathArguments::AngleBracketed(generics) = &segment.arguments else {
        return None;
    };
    let mut types = generics.args.iter().filter_map(|arg| match arg {
        GenericArgument::Type(ty) => Some(ty),
        _ => None,
    });
    match (types.next(), types.next(), types.next()) {
        (Some(ok), Some(err), None) => Some((ok, err)),
        _ => None,
    }
}

/// Whether `tokens` mention `Self`, which a function-local `static` cannot name.
pub fn mentions_self_type(tokens: TokenStream2) -> bool {
    tokens.into_iter().any(|tree| match tree {
        proc_macro2::TokenTree::Ident(ident) => ident == "Self",
        proc_macro2::TokenTree::Group(group) => mentions_self_type(group.stream()),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn parse(attr: TokenStream2) -> CacheAttributes {
        parse_cache_attributes(attr).unwrap_or_else(|err| panic!("{}", err))
    }

    #[test]
    fn test_defaults_to_unbounded() {
        let attrs = parse(quote! {});
        assert_eq!(attrs.resolved_policy(), PolicyKind::Unbounded);
        assert!(attrs.config_expr(quote! {}).is_ok());
    }

    #[test]
    fn test_ttl_implies_ttl_policy() {
        let attrs = parse(quote! { ttl = 30 });
        assert_eq!(attrs.resolved_policy(), PolicyKind::Ttl);
        let expr = attrs.config_expr(quote! {}).unwrap().to_string();
        assert!(expr.contains("from_secs"));
    }

    #[test]
    fn test_policy_is_case_insensitive() {
        let attrs = parse(quote! { policy = "LFU", maxsize = 8, name = "scores" });
        assert_eq!(attrs.policy, Some(PolicyKind::Lfu));
        assert_eq!(attrs.maxsize, Some(8));
        assert_eq!(attrs.custom_name.as_deref(), Some("scores"));
    }

    #[test]
    fn test_configuration_errors() {
        for attr in [
            quote! { policy = "lru" },
            quote! { policy = "lfu", maxsize = 0 },
            quote! { policy = "ttl" },
            quote! { policy = "lru", maxsize = 2, ttl = 5 },
            quote! { maxsize = 4 },
        ] {
            let attrs = parse(attr);
            assert!(attrs.config_expr(quote! {}).is_err());
        }
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_cache_attributes(quote! { policy = "fifo" }).is_err());
        assert!(parse_cache_attributes(quote! { limit = 10 }).is_err());
        assert!(parse_cache_attributes(quote! { maxsize = "ten" }).is_err());
        assert!(parse_cache_attributes(quote! { concurrency = "locked" }).is_err());
    }

    #[test]
    fn test_serialized_concurrency() {
        let attrs = parse(quote! { concurrency = "serialized" });
        let expr = attrs.config_expr(quote! {}).unwrap().to_string();
        assert!(expr.contains("Serialized"));
    }

    #[test]
    fn test_split_result_type() {
        let ty: Type = parse_quote!(Result<u32, String>);
        let (ok, err) = split_result_type(&ty).unwrap();
        assert_eq!(ok.to_token_stream().to_string(), "u32");
        assert_eq!(err.to_token_stream().to_string(), "String");

        let ty: Type = parse_quote!(std::result::Result<Vec<u8>, std::io::Error>);
        assert!(split_result_type(&ty).is_some());

        let ty: Type = parse_quote!(std::io::Result<u32>);
        assert!(split_result_type(&ty).is_none());
        let ty: Type = parse_quote!(Option<u32>);
        assert!(split_result_type(&ty).is_none());
    }

    #[test]
    fn test_mentions_self_type() {
        assert!(mentions_self_type(quote! { Option<Self> }));
        assert!(!mentions_self_type(quote! { Option<u32> }));
    }
}
