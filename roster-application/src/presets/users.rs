//! 用户目录
//!
//! 两种形态共用同一组字段 `{firstName, lastName, email, department}`：
//! - 远程目录（[`DirectoryUser`]）：从用户接口获取，`name` 拆分为名/姓，
//!   `company.name` 作为部门；新建时自动分配数字标识；
//! - 手工目录（[`StaffUser`]）：标识由表单填写并要求唯一，静态种子。
//!
use std::sync::Arc;

use roster_domain::entity::Entity;
use roster_domain::error::{DomainError, DomainResult};
use roster_domain::record::Record;
use roster_domain::source::{DataSource, RawRecord, RecordTransform, StaticSource};
use roster_macros::record;
use serde_json::Value;

use crate::config::ControllerConfig;
use crate::controller::EntityCollectionController;

/// 默认的远程用户接口
pub const USERS_URL: &str = "https://jsonplaceholder.typicode.com/users";
pub const LOAD_ERROR_MESSAGE: &str = "Failed to fetch users. Please try again.";

/// 远程目录中的用户
#[record(entity = "user", id = id, category = department, identifier = generated)]
pub struct DirectoryUser {
    #[field(label = "ID")]
    pub id: i64,
    #[field(label = "First Name")]
    pub first_name: String,
    #[field(label = "Last Name")]
    pub last_name: String,
    #[field(label = "Email")]
    pub email: String,
    #[field(label = "Department")]
    pub department: String,
}

/// 手工维护的用户
#[record(entity = "user", id = id, category = department)]
pub struct StaffUser {
    #[field(label = "ID")]
    pub id: String,
    #[field(label = "First Name")]
    pub first_name: String,
    #[field(label = "Last Name")]
    pub last_name: String,
    #[field(label = "Email")]
    pub email: String,
    #[field(label = "Department")]
    pub department: String,
}

/// 远程用户记录到 [`DirectoryUser`] 的映射
///
/// `name` 按空白拆分：首段为名，其余为姓；缺少 `company.name` 时部门为空串。
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectoryTransform;

impl RecordTransform for DirectoryTransform {
    fn transform(&self, raw: RawRecord) -> DomainResult<Entity> {
        let Value::Object(obj) = raw else {
            return Err(DomainError::network("user record is not a JSON object"));
        };

        let id = obj
            .get("id")
            .and_then(|v| match v {
                Value::Number(n) => n.as_i64(),
                Value::String(s) => s.trim().parse().ok(),
                _ => None,
            })
            .ok_or_else(|| DomainError::network("user record has no numeric `id`"))?;

        let name = obj.get("name").and_then(Value::as_str).unwrap_or_default();
        let mut parts = name.split_whitespace();
        let first_name = parts.next().unwrap_or_default().to_string();
        let last_name = parts.collect::<Vec<_>>().join(" ");

        let email = obj
            .get("email")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let department = obj
            .get("company")
            .and_then(|c| c.get("name"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        Ok(DirectoryUser {
            id,
            first_name,
            last_name,
            email,
            department,
        }
        .into_entity())
    }
}

pub fn remote_config() -> ControllerConfig {
    ControllerConfig::builder()
        .load_error_message(LOAD_ERROR_MESSAGE)
        .build()
}

/// 远程目录：指定数据源
pub fn remote_with_source(source: Arc<dyn DataSource>) -> DomainResult<EntityCollectionController> {
    Ok(EntityCollectionController::builder()
        .schema(DirectoryUser::schema()?)
        .source(source)
        .transform(Arc::new(DirectoryTransform))
        .config(remote_config())
        .build())
}

/// 远程目录：GET `url` 获取用户数组
#[cfg(feature = "http")]
pub fn remote(url: impl Into<String>) -> DomainResult<EntityCollectionController> {
    remote_with_source(Arc::new(roster_domain::source::HttpSource::new(url)))
}

/// 手工目录的种子用户
pub fn staff_seed() -> Vec<StaffUser> {
    let user = |id: &str, first: &str, last: &str, email: &str, dept: &str| StaffUser {
        id: id.to_string(),
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: email.to_string(),
        department: dept.to_string(),
    };
    vec![
        user("U001", "Leanne", "Graham", "leanne@example.com", "Engineering"),
        user("U002", "Ervin", "Howell", "ervin@example.com", "Sales"),
        user("U003", "Clementine", "Bauch", "clementine@example.com", "Marketing"),
    ]
}

/// 手工目录：标识由表单填写，新建时检查唯一
pub fn manual(seed: Vec<StaffUser>) -> DomainResult<EntityCollectionController> {
    let schema = StaffUser::schema()?;
    let source = StaticSource::from_records(&schema, seed);
    Ok(EntityCollectionController::builder()
        .schema(schema)
        .source(Arc::new(source))
        .build())
}
