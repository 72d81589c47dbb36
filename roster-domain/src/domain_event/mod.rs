//! 集合变更事件（Collection Event）
//!
//! 控制器每次改变可观察状态后发布一条事件，展示层订阅后据此重新渲染。

mod collection_event;
mod field_changed;

pub use collection_event::CollectionEvent;
pub use field_changed::{FieldChange, FieldChanged};
