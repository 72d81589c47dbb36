use quote::ToTokens;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{Attribute, Expr, MetaNameValue, Token};

/// `key = value, ...` 形式的宏参数
pub(crate) type NameValueArgs = Punctuated<MetaNameValue, Token![,]>;

// 提取非 derive 属性与已有 derive 列表
pub(crate) fn split_derives(attrs: &[Attribute]) -> (Vec<Attribute>, Vec<syn::Path>) {
    let mut retained = Vec::new();
    let mut existing = Vec::new();
    for attr in attrs.iter() {
        if attr.path().is_ident("derive") {
            if let Ok(list) =
                attr.parse_args_with(Punctuated::<syn::Path, Token![,]>::parse_terminated)
            {
                existing.extend(list);
            }
        } else {
            retained.push(attr.clone());
        }
    }
    (retained, existing)
}

// 合并默认与已有 derive（去重，优先保留 required）
pub(crate) fn merge_derives(existing: Vec<syn::Path>, required: Vec<syn::Path>) -> Attribute {
    let mut seen = std::collections::HashSet::<String>::new();
    let final_list: Vec<syn::Path> = required
        .into_iter()
        .chain(existing)
        .filter(|p| seen.insert(derive_key(p)))
        .collect();
    syn::parse_quote!(#[derive(#(#final_list),*)])
}

// 归一化 derive 的 key，避免 Serialize/serde::Serialize 重复
pub(crate) fn derive_key(p: &syn::Path) -> String {
    match p.segments.last() {
        Some(last) => {
            let last_ident = last.ident.to_string();
            match last_ident.as_str() {
                "Serialize" | "Deserialize" => format!("serde::{}", last_ident),
                _ => last_ident,
            }
        }
        None => p.to_token_stream().to_string(),
    }
}

// 直接在 attrs 上应用默认派生合并
pub(crate) fn apply_derives(attrs: &mut Vec<Attribute>, required: Vec<syn::Path>) {
    let (retained, existing) = split_derives(attrs);
    let merged = merge_derives(existing, required);
    *attrs = std::iter::once(merged).chain(retained).collect();
}

/// 解析 `#[xxx(flag = true|false, ...)]` 形式的布尔开关，仅接受 `allowed` 中的键
pub(crate) fn parse_bool_flags(
    args: NameValueArgs,
    allowed: &[&str],
) -> syn::Result<Vec<(String, bool)>> {
    let mut flags: Vec<(String, bool)> = Vec::new();
    for nv in args {
        let key = path_key(&nv.path)?;
        if !allowed.contains(&key.as_str()) {
            return Err(syn::Error::new(
                nv.path.span(),
                format!("unknown key in attribute; expected one of {allowed:?}"),
            ));
        }
        if flags.iter().any(|(k, _)| *k == key) {
            return Err(syn::Error::new(
                nv.path.span(),
                format!("duplicate key '{key}' in attribute"),
            ));
        }
        flags.push((key, expect_bool(&nv.value)?));
    }
    Ok(flags)
}

pub(crate) fn flag(flags: &[(String, bool)], key: &str, default: bool) -> bool {
    flags
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| *v)
        .unwrap_or(default)
}

pub(crate) fn path_key(path: &syn::Path) -> syn::Result<String> {
    path.get_ident()
        .map(|i| i.to_string())
        .ok_or_else(|| syn::Error::new(path.span(), "expected a plain identifier key"))
}

pub(crate) fn expect_bool(expr: &Expr) -> syn::Result<bool> {
    match expr {
        Expr::Lit(syn::ExprLit {
            lit: syn::Lit::Bool(b),
            ..
        }) => Ok(b.value()),
        other => Err(syn::Error::new(other.span(), "expected boolean literal")),
    }
}

pub(crate) fn expect_str(expr: &Expr) -> syn::Result<syn::LitStr> {
    match expr {
        Expr::Lit(syn::ExprLit {
            lit: syn::Lit::Str(s),
            ..
        }) => Ok(s.clone()),
        other => Err(syn::Error::new(other.span(), "expected string literal")),
    }
}

pub(crate) fn expect_ident(expr: &Expr) -> syn::Result<syn::Ident> {
    match expr {
        Expr::Path(p) if p.qself.is_none() => p
            .path
            .get_ident()
            .cloned()
            .ok_or_else(|| syn::Error::new(p.span(), "expected an identifier")),
        other => Err(syn::Error::new(other.span(), "expected an identifier")),
    }
}

/// `total_amount` -> `totalAmount`
pub(crate) fn to_camel_case(snake: &str) -> String {
    let mut out = String::with_capacity(snake.len());
    let mut upper_next = false;
    for ch in snake.trim_start_matches("r#").chars() {
        if ch == '_' {
            upper_next = !out.is_empty();
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// `SalesOrder` -> `sales_order`
pub(crate) fn to_snake_case(camel: &str) -> String {
    let mut out = String::with_capacity(camel.len() + 4);
    for (i, ch) in camel.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}
