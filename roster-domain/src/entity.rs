//! 实体（Entity）
//!
//! 集合中的一条记录：唯一标识 + 按字段名索引的取值。
//! 字段集合由部署方的 [`EntitySchema`](crate::schema::EntitySchema) 决定。
//!
use std::collections::BTreeMap;

use roster_macros::entity_id;
use serde_json::{Map, Value};

use crate::domain_event::{FieldChange, FieldChanged};
use crate::schema::EntitySchema;
use crate::value_object::FieldValue;

/// 实体标识（`id` / `orderId` 等），远程数据中的数字标识按十进制字符串保存
#[entity_id(ord = true)]
pub struct EntityId(String);

impl EntityId {
    /// 数字标识（用于自动分配下一个标识）
    pub fn as_number(&self) -> Option<i64> {
        self.0.parse().ok()
    }
}

/// 集合中的实体
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    id: EntityId,
    fields: BTreeMap<String, FieldValue>,
}

impl Entity {
    pub fn new(id: impl Into<EntityId>, fields: BTreeMap<String, FieldValue>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    pub fn id(&self) -> &EntityId {
        &self.id
    }

    /// 读取非标识字段
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> &BTreeMap<String, FieldValue> {
        &self.fields
    }

    /// 以“可编辑字符串”读取字段，标识字段同样可读
    pub fn input_value(&self, schema: &EntitySchema, name: &str) -> String {
        if name == schema.id_field() {
            return self.id.to_string();
        }
        self.field(name).map(FieldValue::to_input).unwrap_or_default()
    }

    /// 合并字段（`{ ...entity, ...changes }`），标识保持不变，返回实际发生变化的字段
    pub fn merge(&mut self, changes: BTreeMap<String, FieldValue>) -> Vec<FieldChange> {
        let mut changed = Vec::new();
        for (name, new) in changes {
            let old = self.fields.get(&name).cloned().unwrap_or_default();
            let change = FieldChanged::new(old, new.clone());
            if change.is_changed() {
                changed.push(FieldChange {
                    field: name.clone(),
                    change,
                });
            }
            self.fields.insert(name, new);
        }
        changed
    }

    /// 转为扁平的 JSON 对象（标识字段名取自 schema）
    pub fn to_json(&self, schema: &EntitySchema) -> Value {
        let mut obj = Map::new();
        obj.insert(
            schema.id_field().to_string(),
            Value::String(self.id.to_string()),
        );
        for (name, value) in &self.fields {
            obj.insert(name.clone(), value.to_json());
        }
        Value::Object(obj)
    }
}
