use crate::utils::{NameValueArgs, apply_derives, flag, parse_bool_flags};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::spanned::Spanned;
use syn::{Item, ItemStruct, Type, parse_macro_input};

/// #[entity_id] 宏实现
///
/// 要求单字段 tuple struct，例如 `struct EntityId(String);`：
/// - 派生 Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash；
///   `ord = true` 追加 PartialOrd, Ord，`debug = false` 去掉 Debug
/// - 生成 `new`、`Display`、`FromStr`、`AsRef`、`Borrow` 与双向 `From`
/// - 内部类型为 `String` 时额外生成 `as_str()` 与 `From<&str>`
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr with NameValueArgs::parse_terminated);
    let input = parse_macro_input!(item as Item);

    let result = parse_bool_flags(args, &["debug", "ord"]).and_then(|flags| match input {
        Item::Struct(st) => expand_struct(st, flag(&flags, "debug", true), flag(&flags, "ord", false)),
        other => Err(syn::Error::new(other.span(), "#[entity_id] only on struct")),
    });

    match result {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_struct(mut st: ItemStruct, debug: bool, ord: bool) -> syn::Result<TokenStream2> {
    let inner_ty = single_field(&st)?;

    let mut derives: Vec<syn::Path> = Vec::with_capacity(9);
    if debug {
        derives.push(syn::parse_quote!(Debug));
    }
    derives.extend([
        syn::parse_quote!(Clone),
        syn::parse_quote!(serde::Serialize),
        syn::parse_quote!(serde::Deserialize),
        syn::parse_quote!(PartialEq),
        syn::parse_quote!(Eq),
        syn::parse_quote!(Hash),
    ]);
    if ord {
        derives.push(syn::parse_quote!(PartialOrd));
        derives.push(syn::parse_quote!(Ord));
    }
    apply_derives(&mut st.attrs, derives);

    let ident = &st.ident;
    let (impl_generics, ty_generics, where_clause) = st.generics.split_for_impl();

    let string_helpers = is_string(&inner_ty).then(|| {
        quote! {
            impl #impl_generics #ident #ty_generics #where_clause {
                pub fn as_str(&self) -> &str { &self.0 }
            }

            impl #impl_generics ::core::convert::From<&str> for #ident #ty_generics #where_clause {
                fn from(value: &str) -> Self { Self(::std::string::String::from(value)) }
            }
        }
    });

    Ok(quote! {
        #st

        impl #impl_generics #ident #ty_generics #where_clause {
            pub fn new(value: #inner_ty) -> Self { Self(value) }
        }

        impl #impl_generics ::std::str::FromStr for #ident #ty_generics #where_clause
        where #inner_ty: ::std::str::FromStr
        {
            type Err = <#inner_ty as ::std::str::FromStr>::Err;
            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                s.parse::<#inner_ty>().map(Self)
            }
        }

        impl #impl_generics ::std::fmt::Display for #ident #ty_generics #where_clause
        where #inner_ty: ::std::fmt::Display
        {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::fmt::Display::fmt(&self.0, f)
            }
        }

        impl #impl_generics ::core::convert::AsRef<#inner_ty> for #ident #ty_generics #where_clause {
            fn as_ref(&self) -> &#inner_ty { &self.0 }
        }

        impl #impl_generics ::core::borrow::Borrow<#inner_ty> for #ident #ty_generics #where_clause {
            fn borrow(&self) -> &#inner_ty { &self.0 }
        }

        impl #impl_generics ::core::convert::From<#ident #ty_generics> for #inner_ty #where_clause {
            fn from(value: #ident #ty_generics) -> Self { value.0 }
        }

        impl #impl_generics ::core::convert::From<#inner_ty> for #ident #ty_generics #where_clause {
            fn from(value: #inner_ty) -> Self { Self(value) }
        }

        impl #impl_generics ::core::convert::From<&#inner_ty> for #ident #ty_generics #where_clause
        where #inner_ty: ::core::clone::Clone
        {
            fn from(value: &#inner_ty) -> Self { Self(value.clone()) }
        }

        #string_helpers
    })
}

fn single_field(st: &ItemStruct) -> syn::Result<Type> {
    match &st.fields {
        syn::Fields::Unnamed(f) if f.unnamed.len() == 1 => Ok(f.unnamed[0].ty.clone()),
        syn::Fields::Unnamed(f) => Err(syn::Error::new(
            f.span(),
            "#[entity_id] requires a tuple struct with exactly one field",
        )),
        _ => Err(syn::Error::new(
            st.span(),
            "#[entity_id] supports only tuple struct, e.g., struct X(String);",
        )),
    }
}

fn is_string(ty: &Type) -> bool {
    match ty {
        Type::Path(p) if p.qself.is_none() => p
            .path
            .segments
            .last()
            .is_some_and(|s| s.ident == "String" && s.arguments.is_none()),
        _ => false,
    }
}
