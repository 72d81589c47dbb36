use crate::utils::{
    NameValueArgs, apply_derives, expect_bool, expect_ident, expect_str, path_key, to_camel_case,
    to_snake_case,
};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::spanned::Spanned;
use syn::{Expr, Ident, Item, ItemStruct, LitStr, Type, parse_macro_input};

/// #[record] 宏实现
///
/// 为具名字段结构体派生 `::roster_domain::record::Record`：
/// - `schema()`：按字段声明顺序生成 `EntitySchema`，字段类型与必填性取自 `FieldCodec`
///   （`Option<T>` 为可选字段），标识字段始终必填；
/// - `into_entity()` / `from_entity()`：与动态 `Entity` 互转。
///
/// 结构体参数：
/// - `id = field`（必填）：标识字段
/// - `category = field`（必填）：筛选所用的分类字段
/// - `entity = "name"`：实体名，默认取结构体名的 snake_case
/// - `categories = ["A", "B"]`：筛选器的候选分类
/// - `identifier = manual | generated`：新建时的标识来源，默认 manual
/// - `unique = true | false`：新建时是否检查标识唯一，默认 true
///
/// 字段参数：`#[field(rename = "...", label = "...")]`，字段名默认转为 camelCase。
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr with NameValueArgs::parse_terminated);
    let input = parse_macro_input!(item as Item);

    let st = match input {
        Item::Struct(s) => s,
        other => {
            return syn::Error::new(other.span(), "#[record] only on struct")
                .to_compile_error()
                .into();
        }
    };

    match expand_struct(args, st) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

struct RecordConfig {
    entity: Option<LitStr>,
    id: Ident,
    category: Ident,
    categories: Vec<LitStr>,
    identifier: Ident,
    unique: bool,
}

struct RecordField {
    ident: Ident,
    ty: Type,
    name: String,
    label: Option<LitStr>,
}

fn expand_struct(args: NameValueArgs, mut st: ItemStruct) -> syn::Result<TokenStream2> {
    let cfg = parse_config(args, &st)?;

    let span = st.span();
    let syn::Fields::Named(named) = &mut st.fields else {
        return Err(syn::Error::new(
            span,
            "#[record] only supports named-field struct",
        ));
    };

    // 收集字段信息并移除 #[field(..)] 辅助属性
    let mut fields: Vec<RecordField> = Vec::with_capacity(named.named.len());
    for f in named.named.iter_mut() {
        let ident = f
            .ident
            .clone()
            .ok_or_else(|| syn::Error::new(f.span(), "expected named field"))?;
        let mut name = to_camel_case(&ident.to_string());
        let mut label = None;

        let mut retained = Vec::with_capacity(f.attrs.len());
        for attr in f.attrs.drain(..) {
            if !attr.path().is_ident("field") {
                retained.push(attr);
                continue;
            }
            let args = attr.parse_args_with(NameValueArgs::parse_terminated)?;
            for nv in args {
                match path_key(&nv.path)?.as_str() {
                    "rename" => name = expect_str(&nv.value)?.value(),
                    "label" => label = Some(expect_str(&nv.value)?),
                    _ => {
                        return Err(syn::Error::new(
                            nv.path.span(),
                            "unknown key in #[field]; expected 'rename' or 'label'",
                        ));
                    }
                }
            }
        }
        f.attrs = retained;

        fields.push(RecordField {
            ident,
            ty: f.ty.clone(),
            name,
            label,
        });
    }

    let find = |wanted: &Ident, role: &str| {
        fields
            .iter()
            .find(|f| f.ident == *wanted)
            .ok_or_else(|| syn::Error::new(wanted.span(), format!("{role} field not found")))
    };
    let id_field = find(&cfg.id, "identifier")?;
    let category_field = find(&cfg.category, "category")?;

    apply_derives(
        &mut st.attrs,
        vec![
            syn::parse_quote!(Debug),
            syn::parse_quote!(Clone),
            syn::parse_quote!(PartialEq),
        ],
    );

    let ident = &st.ident;
    let (impl_generics, ty_generics, where_clause) = st.generics.split_for_impl();

    let entity_name = cfg
        .entity
        .as_ref()
        .map(LitStr::value)
        .unwrap_or_else(|| to_snake_case(&ident.to_string()));
    let id_name = &id_field.name;
    let id_ident = &id_field.ident;
    let category_name = &category_field.name;
    let categories = &cfg.categories;
    let policy = &cfg.identifier;
    let unique = cfg.unique;

    let specs = fields.iter().map(|f| {
        let name = &f.name;
        let ty = &f.ty;
        let required = if f.ident == cfg.id {
            quote! { true }
        } else {
            quote! { <#ty as ::roster_domain::value_object::FieldCodec>::REQUIRED }
        };
        let label = f.label.as_ref().map(|l| quote! { .with_label(#l) });
        quote! {
            ::roster_domain::schema::FieldSpec::new(
                #name,
                <#ty as ::roster_domain::value_object::FieldCodec>::KIND,
                #required,
            ) #label
        }
    });

    let value_fields: Vec<&RecordField> = fields.iter().filter(|f| f.ident != cfg.id).collect();
    let value_idents: Vec<&Ident> = value_fields.iter().map(|f| &f.ident).collect();
    let value_names: Vec<&String> = value_fields.iter().map(|f| &f.name).collect();
    let value_tys: Vec<&Type> = value_fields.iter().map(|f| &f.ty).collect();

    Ok(quote! {
        #st

        impl #impl_generics ::roster_domain::record::Record for #ident #ty_generics #where_clause {
            fn schema() -> ::roster_domain::error::DomainResult<::roster_domain::schema::EntitySchema> {
                ::roster_domain::schema::EntitySchema::builder()
                    .entity(#entity_name)
                    .id_field(#id_name)
                    .category_field(#category_name)
                    .identifier(::roster_domain::schema::IdentifierPolicy::#policy)
                    .enforce_unique_identifier_on_create(#unique)
                    .categories(::std::vec![#(::std::string::String::from(#categories)),*])
                    .fields(::std::vec![#(#specs),*])
                    .build()
            }

            fn into_entity(self) -> ::roster_domain::entity::Entity {
                let id = ::roster_domain::entity::EntityId::from(
                    ::std::string::ToString::to_string(&self.#id_ident),
                );
                let mut fields = ::std::collections::BTreeMap::new();
                #(
                    fields.insert(
                        ::std::string::String::from(#value_names),
                        ::roster_domain::value_object::FieldCodec::into_value(self.#value_idents),
                    );
                )*
                ::roster_domain::entity::Entity::new(id, fields)
            }

            fn from_entity(
                entity: &::roster_domain::entity::Entity,
            ) -> ::roster_domain::error::DomainResult<Self> {
                let null = ::roster_domain::value_object::FieldValue::Null;
                ::std::result::Result::Ok(Self {
                    #id_ident: ::std::str::FromStr::from_str(entity.id().as_str()).map_err(|_| {
                        ::roster_domain::error::DomainError::Parse {
                            reason: ::std::format!(
                                "invalid identifier `{}` for {}",
                                entity.id(),
                                #entity_name
                            ),
                        }
                    })?,
                    #(
                        #value_idents: <#value_tys as ::roster_domain::value_object::FieldCodec>::from_value(
                            #value_names,
                            entity.field(#value_names).unwrap_or(&null),
                        )?,
                    )*
                })
            }
        }
    })
}

fn parse_config(args: NameValueArgs, st: &ItemStruct) -> syn::Result<RecordConfig> {
    let mut entity = None;
    let mut id = None;
    let mut category = None;
    let mut categories = Vec::new();
    let mut identifier: Ident = syn::parse_quote!(Manual);
    let mut unique = true;

    for nv in args {
        let key = path_key(&nv.path)?;
        match key.as_str() {
            "entity" => entity = Some(expect_str(&nv.value)?),
            "id" => id = Some(expect_ident(&nv.value)?),
            "category" => category = Some(expect_ident(&nv.value)?),
            "categories" => categories = expect_str_array(&nv.value)?,
            "identifier" => {
                let policy = expect_ident(&nv.value)?;
                identifier = match policy.to_string().as_str() {
                    "manual" => Ident::new("Manual", policy.span()),
                    "generated" => Ident::new("Generated", policy.span()),
                    _ => {
                        return Err(syn::Error::new(
                            policy.span(),
                            "identifier must be `manual` or `generated`",
                        ));
                    }
                };
            }
            "unique" => unique = expect_bool(&nv.value)?,
            _ => {
                return Err(syn::Error::new(
                    nv.path.span(),
                    format!("unknown key '{key}' in #[record]"),
                ));
            }
        }
    }

    let missing = |what: &str| {
        syn::Error::new(
            st.ident.span(),
            format!("#[record] requires `{what} = <field>`"),
        )
    };

    Ok(RecordConfig {
        entity,
        id: id.ok_or_else(|| missing("id"))?,
        category: category.ok_or_else(|| missing("category"))?,
        categories,
        identifier,
        unique,
    })
}

fn expect_str_array(expr: &Expr) -> syn::Result<Vec<LitStr>> {
    match expr {
        Expr::Array(arr) => arr.elems.iter().map(expect_str).collect(),
        other => Err(syn::Error::new(
            other.span(),
            "expected an array of string literals",
        )),
    }
}
