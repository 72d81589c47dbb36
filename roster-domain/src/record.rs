//! 类型化记录（Record）
//!
//! 由 `#[record]` 宏为具名结构体生成：结构声明（schema）以及与动态 `Entity` 的互转，
//! 让部署方可以用普通 Rust 结构体声明字段集合与种子数据。
//!
use crate::entity::Entity;
use crate::error::DomainResult;
use crate::schema::EntitySchema;

pub trait Record: Sized {
    /// 该记录类型对应的（已校验的）结构配置
    fn schema() -> DomainResult<EntitySchema>;

    fn into_entity(self) -> Entity;

    fn from_entity(entity: &Entity) -> DomainResult<Self>;
}
