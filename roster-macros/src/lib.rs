//! 名册过程宏（roster-macros）
//!
//! - `#[record]`：为具名结构体派生结构配置与 `Entity` 互转
//! - `#[entity_id]`：单字段 tuple struct 形式的标识类型
//! - `#[value_object]`：值对象的默认派生集合
//!
use proc_macro::TokenStream;

mod entity_id;
mod record;
mod utils;
mod value_object;

/// 记录宏
/// - 要求具名字段结构体，参数 `id = <field>`、`category = <field>` 必填
/// - 自动实现 `::roster_domain::record::Record`（`schema/into_entity/from_entity`）
/// - 字段可用 `#[field(rename = "...", label = "...")]` 调整字段名与展示名
#[proc_macro_attribute]
pub fn record(attr: TokenStream, item: TokenStream) -> TokenStream {
    record::expand(attr, item)
}

/// 实体 ID 宏
/// 用于为 `tuple struct` 形式的 ID 类型（例如 `struct EntityId(String);`）
/// 自动实现 `Display`、`FromStr`、`AsRef` 与双向 `From`。
#[proc_macro_attribute]
pub fn entity_id(attr: TokenStream, item: TokenStream) -> TokenStream {
    entity_id::expand(attr, item)
}

/// 值对象宏
/// 合并/追加派生：Debug, Default, Clone, Serialize, Deserialize, PartialEq, Eq，
/// 可通过 `debug/default/eq = false` 关闭对应派生。
#[proc_macro_attribute]
pub fn value_object(attr: TokenStream, item: TokenStream) -> TokenStream {
    value_object::expand(attr, item)
}
