use async_trait::async_trait;

use super::{DataSource, RawRecord};
use crate::error::DomainResult;
use crate::record::Record;
use crate::schema::EntitySchema;

/// 静态种子数据源
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    records: Vec<RawRecord>,
}

impl StaticSource {
    pub fn new(records: Vec<RawRecord>) -> Self {
        Self { records }
    }

    /// 由类型化记录生成种子（按 schema 展平为 JSON 对象）
    pub fn from_records<R, I>(schema: &EntitySchema, records: I) -> Self
    where
        R: Record,
        I: IntoIterator<Item = R>,
    {
        let records = records
            .into_iter()
            .map(|r| r.into_entity().to_json(schema))
            .collect();
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl DataSource for StaticSource {
    async fn fetch_initial_entities(&self) -> DomainResult<Vec<RawRecord>> {
        Ok(self.records.clone())
    }
}
