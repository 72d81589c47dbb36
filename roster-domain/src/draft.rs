//! 草稿表单（DraftForm）
//!
//! 与实体结构一一对应、但所有取值都以可编辑字符串保存的暂存区，
//! 新建或更新在提交（commit）前都先写入这里。
//!
use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::entity::{Entity, EntityId};
use crate::error::{DomainError, DomainResult};
use crate::schema::EntitySchema;
use crate::value_object::FieldValue;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DraftForm {
    values: BTreeMap<String, String>,
}

impl DraftForm {
    /// 零值草稿：文本/日期为空串，数值为 "0"
    pub fn empty(schema: &EntitySchema) -> Self {
        let values = schema
            .fields()
            .iter()
            .map(|f| (f.name().to_string(), f.kind().zero_input().to_string()))
            .collect();
        Self { values }
    }

    /// 以实体当前取值填充草稿（进入编辑模式时使用）
    pub fn from_entity(schema: &EntitySchema, entity: &Entity) -> Self {
        let values = schema
            .fields()
            .iter()
            .map(|f| (f.name().to_string(), entity.input_value(schema, f.name())))
            .collect();
        Self { values }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    /// 合并部分字段更新，不做校验；返回实际写入的字段名
    ///
    /// 未在 schema 中声明的字段被忽略；`lock_identifier` 为 true 时标识字段不可写。
    pub fn stage<I, K, V>(
        &mut self,
        schema: &EntitySchema,
        partial: I,
        lock_identifier: bool,
    ) -> Vec<String>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut staged = Vec::new();
        for (name, value) in partial {
            let name = name.into();
            if schema.field(&name).is_none() {
                debug!(field = %name, entity = schema.entity(), "ignoring unknown draft field");
                continue;
            }
            if lock_identifier && name == schema.id_field() {
                debug!(field = %name, "identifier is immutable while editing");
                continue;
            }
            self.values.insert(name.clone(), value.into());
            staged.push(name);
        }
        staged
    }

    fn raw(&self, field: &str) -> &str {
        self.get(field).map(str::trim).unwrap_or_default()
    }

    /// 校验并解析除标识外的所有字段
    ///
    /// 必填字段不可为空；可选字段留空时记为 `FieldValue::Null`。
    pub fn parse_fields(&self, schema: &EntitySchema) -> DomainResult<BTreeMap<String, FieldValue>> {
        let mut parsed = BTreeMap::new();
        for spec in schema.value_fields() {
            let raw = self.raw(spec.name());
            let value = if raw.is_empty() {
                if spec.required() {
                    return Err(DomainError::validation(spec.label(), "is required"));
                }
                FieldValue::Null
            } else {
                spec.kind().parse_input(spec.label(), raw)?
            };
            parsed.insert(spec.name().to_string(), value);
        }
        Ok(parsed)
    }

    /// 读取表单填写的标识（手工标识模式）
    pub fn parse_identifier(&self, schema: &EntitySchema) -> DomainResult<EntityId> {
        let raw = self.raw(schema.id_field());
        let label = schema
            .id_spec()
            .map(|s| s.label())
            .unwrap_or(schema.id_field());
        if raw.is_empty() {
            return Err(DomainError::validation(label, "is required"));
        }
        if let Some(spec) = schema.id_spec() {
            // 仅校验格式，标识始终以字符串保存
            spec.kind().parse_input(label, raw)?;
        }
        Ok(EntityId::from(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldSpec;
    use crate::value_object::FieldKind;

    fn schema() -> EntitySchema {
        EntitySchema::builder()
            .entity("sales_order")
            .id_field("orderId")
            .category_field("status")
            .fields(vec![
                FieldSpec::new("orderId", FieldKind::Text, true).with_label("Order ID"),
                FieldSpec::new("customerName", FieldKind::Text, true),
                FieldSpec::new("orderDate", FieldKind::Date, true),
                FieldSpec::new("status", FieldKind::Text, true),
                FieldSpec::new("totalAmount", FieldKind::Number, false),
                FieldSpec::new("itemCount", FieldKind::Integer, false),
            ])
            .build()
            .unwrap()
    }

    fn filled() -> DraftForm {
        let s = schema();
        let mut d = DraftForm::empty(&s);
        d.stage(
            &s,
            [
                ("orderId", "SO010"),
                ("customerName", "Eve"),
                ("orderDate", "2023-11-01"),
                ("status", "Pending"),
                ("totalAmount", "99.5"),
                ("itemCount", "2"),
            ],
            false,
        );
        d
    }

    #[test]
    fn empty_draft_uses_zero_values() {
        let d = DraftForm::empty(&schema());
        assert_eq!(d.get("orderId"), Some(""));
        assert_eq!(d.get("totalAmount"), Some("0"));
        assert_eq!(d.get("itemCount"), Some("0"));
        assert_eq!(d.values().len(), 6);
    }

    #[test]
    fn stage_ignores_unknown_and_locked_identifier() {
        let s = schema();
        let mut d = DraftForm::empty(&s);
        let staged = d.stage(&s, [("bogus", "x"), ("orderId", "SO9"), ("status", "Shipped")], true);
        assert_eq!(staged, vec!["status".to_string()]);
        assert_eq!(d.get("orderId"), Some(""));
        assert_eq!(d.get("bogus"), None);
    }

    #[test]
    fn parse_fields_produces_typed_values() {
        let s = schema();
        let fields = filled().parse_fields(&s).unwrap();
        assert_eq!(fields.get("totalAmount"), Some(&FieldValue::Number(99.5)));
        assert_eq!(fields.get("itemCount"), Some(&FieldValue::Integer(2)));
        assert!(!fields.contains_key("orderId"));
        assert_eq!(filled().parse_identifier(&s).unwrap().as_str(), "SO010");
    }

    #[test]
    fn parse_fields_rejects_missing_required_and_bad_numbers() {
        let s = schema();
        let mut d = filled();
        d.stage(&s, [("customerName", "  ")], false);
        let err = d.parse_fields(&s).unwrap_err();
        assert_eq!(err, DomainError::validation("customerName", "is required"));

        let mut d = filled();
        d.stage(&s, [("totalAmount", "lots")], false);
        assert!(matches!(
            d.parse_fields(&s),
            Err(DomainError::Validation { .. })
        ));

        let mut d = filled();
        d.stage(&s, [("orderId", "")], false);
        assert_eq!(
            d.parse_identifier(&s).unwrap_err(),
            DomainError::validation("Order ID", "is required")
        );
    }

    #[test]
    fn optional_numeric_left_empty_becomes_null() {
        let s = schema();
        let mut d = filled();
        d.stage(&s, [("itemCount", "")], false);
        let fields = d.parse_fields(&s).unwrap();
        assert_eq!(fields.get("itemCount"), Some(&FieldValue::Null));
    }
}
