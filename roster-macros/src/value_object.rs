use crate::utils::{NameValueArgs, apply_derives, flag, parse_bool_flags};
use proc_macro::TokenStream;
use quote::quote;
use syn::spanned::Spanned;
use syn::{Item, parse_macro_input};

/// #[value_object] 宏实现
/// - 支持结构体（具名或 tuple）与枚举
/// - 合并/追加派生：Debug, Default, Clone, Serialize, Deserialize, PartialEq, Eq
/// - 参数（均默认 true）：
///   - `debug`：是否派生 Debug（需要手写 Debug 时关闭）
///   - `default`：是否派生 Default（无合理零值时关闭）
///   - `eq`：是否派生 Eq（包含浮点数时关闭，PartialEq 始终派生）
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr with NameValueArgs::parse_terminated);
    let flags = match parse_bool_flags(args, &["debug", "default", "eq"]) {
        Ok(flags) => flags,
        Err(err) => return err.to_compile_error().into(),
    };
    let mut input = parse_macro_input!(item as Item);

    let mut required: Vec<syn::Path> = Vec::with_capacity(7);
    if flag(&flags, "debug", true) {
        required.push(syn::parse_quote!(Debug));
    }
    if flag(&flags, "default", true) {
        required.push(syn::parse_quote!(Default));
    }
    required.push(syn::parse_quote!(Clone));
    required.push(syn::parse_quote!(serde::Serialize));
    required.push(syn::parse_quote!(serde::Deserialize));
    required.push(syn::parse_quote!(PartialEq));
    if flag(&flags, "eq", true) {
        required.push(syn::parse_quote!(Eq));
    }

    match &mut input {
        Item::Struct(st) => {
            apply_derives(&mut st.attrs, required);
            TokenStream::from(quote! { #st })
        }
        Item::Enum(en) => {
            apply_derives(&mut en.attrs, required);
            TokenStream::from(quote! { #en })
        }
        other => syn::Error::new(other.span(), "#[value_object] only supports struct or enum")
            .to_compile_error()
            .into(),
    }
}
