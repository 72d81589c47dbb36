//! 数据源（Data Source）
//!
//! 控制器在启动时从数据源获取初始集合：
//! - `DataSource`：产出松散类型的原始记录（静态种子或远程调用）；
//! - `RecordTransform`：将原始记录映射为规范化的 `Entity`，映射规则随部署而定，可插拔。
//!
//! 该模块仅定义协议与几个通用实现，具体部署的映射由上层注入。
//!
mod static_source;
mod transform;

#[cfg(feature = "http")]
mod http;

pub use static_source::StaticSource;
pub use transform::{FnTransform, SchemaTransform};

#[cfg(feature = "http")]
pub use http::HttpSource;

use crate::entity::Entity;
use crate::error::DomainResult;
use async_trait::async_trait;
use std::sync::Arc;

/// 数据源返回的原始记录
pub type RawRecord = serde_json::Value;

/// 初始集合的数据源
#[async_trait]
pub trait DataSource: Send + Sync {
    /// 获取初始记录；不可达或数据格式错误时返回 `DomainError::Network`
    async fn fetch_initial_entities(&self) -> DomainResult<Vec<RawRecord>>;
}

#[async_trait]
impl<T> DataSource for Arc<T>
where
    T: DataSource + ?Sized,
{
    async fn fetch_initial_entities(&self) -> DomainResult<Vec<RawRecord>> {
        (**self).fetch_initial_entities().await
    }
}

/// 原始记录到实体的映射
pub trait RecordTransform: Send + Sync {
    fn transform(&self, raw: RawRecord) -> DomainResult<Entity>;
}

impl<T> RecordTransform for Arc<T>
where
    T: RecordTransform + ?Sized,
{
    fn transform(&self, raw: RawRecord) -> DomainResult<Entity> {
        (**self).transform(raw)
    }
}
