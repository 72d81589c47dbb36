use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::{RawRecord, RecordTransform};
use crate::entity::{Entity, EntityId};
use crate::error::{DomainError, DomainResult};
use crate::schema::EntitySchema;
use crate::value_object::FieldValue;

/// 按 schema 直接映射同名字段的默认转换
///
/// - 记录必须是 JSON 对象；
/// - 标识字段可以是字符串或数字；
/// - 必填字段缺失或为 null 视为数据格式错误，未声明的键被忽略。
#[derive(Debug, Clone)]
pub struct SchemaTransform {
    schema: Arc<EntitySchema>,
}

impl SchemaTransform {
    pub fn new(schema: Arc<EntitySchema>) -> Self {
        Self { schema }
    }
}

impl RecordTransform for SchemaTransform {
    fn transform(&self, raw: RawRecord) -> DomainResult<Entity> {
        let Value::Object(obj) = raw else {
            return Err(DomainError::network("record is not a JSON object"));
        };

        let id_field = self.schema.id_field();
        let id = match obj.get(id_field) {
            Some(Value::String(s)) if !s.trim().is_empty() => EntityId::from(s.trim()),
            Some(Value::Number(n)) => match integral(n) {
                Some(i) => EntityId::from(i.to_string()),
                None => EntityId::from(n.to_string()),
            },
            _ => {
                return Err(DomainError::network(format!(
                    "record is missing identifier `{id_field}`"
                )));
            }
        };

        let mut fields = BTreeMap::new();
        for spec in self.schema.value_fields() {
            let value = match obj.get(spec.name()) {
                Some(v) => FieldValue::from_json(spec.kind(), spec.name(), v)?,
                None => FieldValue::Null,
            };
            if value.is_null() && spec.required() {
                return Err(DomainError::network(format!(
                    "record {id} is missing required field `{}`",
                    spec.name()
                )));
            }
            fields.insert(spec.name().to_string(), value);
        }

        Ok(Entity::new(id, fields))
    }
}

/// 整数或可无损表示为 i64 的整值浮点（`3.0` → 3）
fn integral(n: &serde_json::Number) -> Option<i64> {
    n.as_i64().or_else(|| n.as_f64().and_then(crate::value_object::f64_to_i64))
}

/// 闭包形式的转换，用于部署特定的字段映射
pub struct FnTransform<F>(pub F);

impl<F> RecordTransform for FnTransform<F>
where
    F: Fn(RawRecord) -> DomainResult<Entity> + Send + Sync,
{
    fn transform(&self, raw: RawRecord) -> DomainResult<Entity> {
        (self.0)(raw)
    }
}

impl<F> fmt::Debug for FnTransform<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnTransform(..)")
    }
}
