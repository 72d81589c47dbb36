//! 从 JSON 配置加载实体结构，并用静态种子数据走一遍“获取 → 转换 → 筛选”。
use std::sync::Arc;

use roster_domain::error::DomainResult;
use roster_domain::schema::EntitySchema;
use roster_domain::source::{DataSource, RecordTransform, SchemaTransform, StaticSource};
use roster_domain::specification::{CategoryFilter, CategoryMatches, FilteredView};
use serde_json::json;

const SCHEMA: &str = r#"{
    "entity": "user",
    "id_field": "id",
    "category_field": "department",
    "fields": [
        { "name": "id", "required": true },
        { "name": "firstName", "required": true, "label": "First Name" },
        { "name": "lastName", "required": true, "label": "Last Name" },
        { "name": "department", "required": true }
    ]
}"#;

#[tokio::main(flavor = "current_thread")]
async fn main() -> DomainResult<()> {
    let schema = Arc::new(EntitySchema::from_json(SCHEMA)?);
    let source = StaticSource::new(vec![
        json!({ "id": "u1", "firstName": "Ada", "lastName": "Lovelace", "department": "Engineering" }),
        json!({ "id": "u2", "firstName": "Grace", "lastName": "Hopper", "department": "Research" }),
        json!({ "id": "u3", "firstName": "Alan", "lastName": "Turing", "department": "Engineering" }),
    ]);

    let transform = SchemaTransform::new(schema.clone());
    let entities = source
        .fetch_initial_entities()
        .await?
        .into_iter()
        .map(|raw| transform.transform(raw))
        .collect::<DomainResult<Vec<_>>>()?;

    let filter = CategoryFilter::from("Engineering");
    let view = FilteredView::new(&entities, CategoryMatches::new(schema.category_field(), &filter));
    for user in view {
        println!("{} -> {}", user.id(), user.to_json(&schema));
    }
    Ok(())
}
