//! 实体结构配置（EntitySchema）
//!
//! 描述一个部署所识别的字段集合：标识字段、分类字段（用于筛选）、
//! 每个字段的必填性与类型，以及新建时的标识策略。
//!
//! 可通过 `bon` 生成的构建器在代码中声明，也可从 JSON 配置加载：
//!
//! ```
//! use roster_domain::schema::EntitySchema;
//!
//! let schema = EntitySchema::from_json(r#"{
//!     "entity": "user",
//!     "id_field": "id",
//!     "category_field": "department",
//!     "fields": [
//!         { "name": "id", "required": true },
//!         { "name": "firstName", "required": true },
//!         { "name": "department", "required": true }
//!     ]
//! }"#).unwrap();
//!
//! assert_eq!(schema.category_field(), "department");
//! assert!(schema.enforce_unique_identifier_on_create());
//! ```
//!
use std::collections::HashSet;

use bon::bon;
use roster_macros::value_object;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::{FieldKind, ValueObject};

/// 新建实体时标识的来源
#[value_object]
#[derive(Copy)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierPolicy {
    /// 由表单填写（编辑时不可修改）
    #[default]
    Manual,
    /// 由控制器分配：现有最大数字标识 + 1
    Generated,
}

/// 单个字段的配置
#[value_object]
pub struct FieldSpec {
    name: String,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    kind: FieldKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, kind: FieldKind, required: bool) -> Self {
        Self {
            name: name.into(),
            required,
            kind,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn required(&self) -> bool {
        self.required
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// 展示名，未配置时回退为字段名
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}

/// 实体结构配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSchema")]
pub struct EntitySchema {
    entity: String,
    id_field: String,
    category_field: String,
    identifier: IdentifierPolicy,
    enforce_unique_identifier_on_create: bool,
    categories: Vec<String>,
    fields: Vec<FieldSpec>,
}

#[bon]
impl EntitySchema {
    /// 构建并校验配置
    #[builder]
    pub fn new(
        #[builder(into)] entity: String,
        #[builder(into)] id_field: String,
        #[builder(into)] category_field: String,
        #[builder(default)] identifier: IdentifierPolicy,
        #[builder(default = true)] enforce_unique_identifier_on_create: bool,
        #[builder(default)] categories: Vec<String>,
        fields: Vec<FieldSpec>,
    ) -> DomainResult<Self> {
        let schema = Self {
            entity,
            id_field,
            category_field,
            identifier,
            enforce_unique_identifier_on_create,
            categories,
            fields,
        };
        schema.validate()?;
        Ok(schema)
    }
}

impl EntitySchema {
    pub fn from_json(config: &str) -> DomainResult<Self> {
        let raw: RawSchema = serde_json::from_str(config)?;
        Self::try_from(raw)
    }

    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn id_field(&self) -> &str {
        &self.id_field
    }

    pub fn category_field(&self) -> &str {
        &self.category_field
    }

    pub fn identifier(&self) -> IdentifierPolicy {
        self.identifier
    }

    pub fn enforce_unique_identifier_on_create(&self) -> bool {
        self.enforce_unique_identifier_on_create
    }

    /// 筛选器可选的分类值（不含 "All"）
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// 全部字段（含标识字段），按声明顺序
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// 除标识字段以外的字段
    pub fn value_fields(&self) -> impl Iterator<Item = &FieldSpec> + '_ {
        self.fields.iter().filter(|f| f.name != self.id_field)
    }

    pub fn id_spec(&self) -> Option<&FieldSpec> {
        self.field(&self.id_field)
    }
}

impl ValueObject for EntitySchema {
    type Error = DomainError;

    fn validate(&self) -> Result<(), Self::Error> {
        let invalid = |reason: String| DomainError::InvalidSchema { reason };

        let mut seen = HashSet::new();
        for f in &self.fields {
            if f.name.trim().is_empty() {
                return Err(invalid("field name must not be empty".into()));
            }
            if !seen.insert(f.name.as_str()) {
                return Err(invalid(format!("duplicate field `{}`", f.name)));
            }
        }
        if !seen.contains(self.id_field.as_str()) {
            return Err(invalid(format!(
                "identifier field `{}` is not declared",
                self.id_field
            )));
        }
        if !seen.contains(self.category_field.as_str()) {
            return Err(invalid(format!(
                "category field `{}` is not declared",
                self.category_field
            )));
        }
        // 手工标识只能依靠新建时的唯一性检查来维持不变量
        if self.identifier == IdentifierPolicy::Manual && !self.enforce_unique_identifier_on_create
        {
            return Err(invalid(
                "manual identifiers require enforce_unique_identifier_on_create".into(),
            ));
        }
        Ok(())
    }
}

// -------- config parsing --------

fn default_true() -> bool {
    true
}

#[derive(Deserialize)]
struct RawSchema {
    entity: String,
    id_field: String,
    category_field: String,
    #[serde(default)]
    identifier: IdentifierPolicy,
    #[serde(default = "default_true")]
    enforce_unique_identifier_on_create: bool,
    #[serde(default)]
    categories: Vec<String>,
    fields: Vec<FieldSpec>,
}

impl TryFrom<RawSchema> for EntitySchema {
    type Error = DomainError;

    fn try_from(raw: RawSchema) -> Result<Self, Self::Error> {
        EntitySchema::builder()
            .entity(raw.entity)
            .id_field(raw.id_field)
            .category_field(raw.category_field)
            .identifier(raw.identifier)
            .enforce_unique_identifier_on_create(raw.enforce_unique_identifier_on_create)
            .categories(raw.categories)
            .fields(raw.fields)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order_fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::new("orderId", FieldKind::Text, true).with_label("Order ID"),
            FieldSpec::new("customerName", FieldKind::Text, true),
            FieldSpec::new("status", FieldKind::Text, true),
            FieldSpec::new("totalAmount", FieldKind::Number, false),
        ]
    }

    #[test]
    fn builder_applies_defaults() {
        let schema = EntitySchema::builder()
            .entity("sales_order")
            .id_field("orderId")
            .category_field("status")
            .fields(order_fields())
            .build()
            .unwrap();

        assert_eq!(schema.identifier(), IdentifierPolicy::Manual);
        assert!(schema.enforce_unique_identifier_on_create());
        assert!(schema.categories().is_empty());
        assert_eq!(schema.id_spec().unwrap().label(), "Order ID");
        assert_eq!(schema.field("status").unwrap().label(), "status");
        assert_eq!(schema.value_fields().count(), 3);
    }

    #[test]
    fn rejects_undeclared_identifier_and_category() {
        let err = EntitySchema::builder()
            .entity("x")
            .id_field("id")
            .category_field("status")
            .fields(order_fields())
            .build()
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidSchema { .. }));

        let err = EntitySchema::builder()
            .entity("x")
            .id_field("orderId")
            .category_field("department")
            .fields(order_fields())
            .build()
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidSchema { .. }));
    }

    #[test]
    fn rejects_duplicate_fields() {
        let mut fields = order_fields();
        fields.push(FieldSpec::new("status", FieldKind::Text, false));
        let err = EntitySchema::builder()
            .entity("x")
            .id_field("orderId")
            .category_field("status")
            .fields(fields)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("duplicate field"));
    }

    #[test]
    fn manual_identifiers_must_stay_unique() {
        let err = EntitySchema::builder()
            .entity("x")
            .id_field("orderId")
            .category_field("status")
            .enforce_unique_identifier_on_create(false)
            .fields(order_fields())
            .build()
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidSchema { .. }));

        let ok = EntitySchema::builder()
            .entity("x")
            .id_field("orderId")
            .category_field("status")
            .identifier(IdentifierPolicy::Generated)
            .enforce_unique_identifier_on_create(false)
            .fields(order_fields())
            .build();
        assert!(ok.is_ok());
    }

    #[test]
    fn loads_from_json_config() {
        let schema = EntitySchema::from_json(
            r#"{
                "entity": "user",
                "id_field": "id",
                "category_field": "department",
                "identifier": "generated",
                "categories": ["Sales", "Engineering"],
                "fields": [
                    { "name": "id", "required": true, "kind": "integer" },
                    { "name": "email", "required": true, "label": "E-mail" },
                    { "name": "department" }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(schema.identifier(), IdentifierPolicy::Generated);
        assert_eq!(schema.id_spec().unwrap().kind(), FieldKind::Integer);
        assert_eq!(schema.field("email").unwrap().label(), "E-mail");
        assert!(!schema.field("department").unwrap().required());
        assert_eq!(schema.categories(), ["Sales", "Engineering"]);
    }

    #[test]
    fn json_config_is_validated() {
        let err = EntitySchema::from_json(
            r#"{ "entity": "u", "id_field": "id", "category_field": "dept", "fields": [] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::InvalidSchema { .. }));

        let err = EntitySchema::from_json("not json").unwrap_err();
        assert!(matches!(err, DomainError::Serde { .. }));
    }
}
