//! 规约（Specification）与分类筛选
//!
//! `CategoryFilter` 对应筛选下拉框的选中值（或 "All" 哨兵），
//! 只作用于渲染视图，从不修改集合本身。
//!
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::entity::Entity;

/// "All" 哨兵在筛选器中的取值
pub const ALL: &str = "All";

/// 规约模式的核心 trait
///
/// 用于封装业务规则，使其可复用、可组合和可测试
pub trait Specification<T> {
    /// 检查候选对象是否满足规约
    fn is_satisfied_by(&self, candidate: &T) -> bool;
}

/// 分类筛选条件
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum CategoryFilter {
    #[default]
    All,
    Is(String),
}

impl CategoryFilter {
    pub fn is(value: impl Into<String>) -> Self {
        Self::Is(value.into())
    }

    pub fn as_str(&self) -> &str {
        match self {
            CategoryFilter::All => ALL,
            CategoryFilter::Is(v) => v,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if s == ALL {
            CategoryFilter::All
        } else {
            CategoryFilter::Is(s.to_string())
        })
    }
}

impl From<&str> for CategoryFilter {
    fn from(value: &str) -> Self {
        match value.parse() {
            Ok(filter) => filter,
            Err(never) => match never {},
        }
    }
}

impl From<CategoryFilter> for String {
    fn from(value: CategoryFilter) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 实体的分类字段等于筛选值（或筛选值为 All）
#[derive(Debug, Clone, Copy)]
pub struct CategoryMatches<'a> {
    field: &'a str,
    filter: &'a CategoryFilter,
}

impl<'a> CategoryMatches<'a> {
    pub fn new(field: &'a str, filter: &'a CategoryFilter) -> Self {
        Self { field, filter }
    }
}

impl Specification<Entity> for CategoryMatches<'_> {
    fn is_satisfied_by(&self, candidate: &Entity) -> bool {
        match self.filter {
            CategoryFilter::All => true,
            CategoryFilter::Is(wanted) => candidate
                .field(self.field)
                .is_some_and(|v| v.to_input() == *wanted),
        }
    }
}

/// 惰性、可重启（`Clone`）的筛选视图
///
/// 每次调用都基于当前集合重新计算，不缓存。
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    inner: std::slice::Iter<'a, Entity>,
    spec: CategoryMatches<'a>,
}

impl<'a> FilteredView<'a> {
    pub fn new(entities: &'a [Entity], spec: CategoryMatches<'a>) -> Self {
        Self {
            inner: entities.iter(),
            spec,
        }
    }
}

impl<'a> Iterator for FilteredView<'a> {
    type Item = &'a Entity;

    fn next(&mut self) -> Option<Self::Item> {
        let spec = self.spec;
        self.inner.find(|e| spec.is_satisfied_by(e))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.inner.size_hint().1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_object::FieldValue;
    use std::collections::BTreeMap;

    fn order(id: &str, status: &str) -> Entity {
        let mut fields = BTreeMap::new();
        fields.insert("status".to_string(), FieldValue::Text(status.into()));
        Entity::new(id, fields)
    }

    fn orders() -> Vec<Entity> {
        vec![
            order("SO001", "Shipped"),
            order("SO002", "Pending"),
            order("SO003", "Shipped"),
        ]
    }

    #[test]
    fn all_sentinel_parses_and_displays() {
        assert_eq!(CategoryFilter::from("All"), CategoryFilter::All);
        assert_eq!(CategoryFilter::from("Shipped"), CategoryFilter::is("Shipped"));
        assert_eq!(CategoryFilter::All.to_string(), "All");
        assert_eq!(
            serde_json::to_value(CategoryFilter::is("Pending")).unwrap(),
            "Pending"
        );
    }

    #[test]
    fn all_yields_whole_collection_in_order() {
        let list = orders();
        let filter = CategoryFilter::All;
        let ids: Vec<_> = FilteredView::new(&list, CategoryMatches::new("status", &filter))
            .map(|e| e.id().as_str())
            .collect();
        assert_eq!(ids, ["SO001", "SO002", "SO003"]);
    }

    #[test]
    fn category_yields_exact_subset_and_restarts() {
        let list = orders();
        let filter = CategoryFilter::is("Shipped");
        let view = FilteredView::new(&list, CategoryMatches::new("status", &filter));

        let first: Vec<_> = view.clone().map(|e| e.id().as_str()).collect();
        let again: Vec<_> = view.map(|e| e.id().as_str()).collect();
        assert_eq!(first, ["SO001", "SO003"]);
        assert_eq!(first, again);
    }

    #[test]
    fn missing_category_field_never_matches() {
        let list = vec![Entity::new("X", BTreeMap::new())];
        let filter = CategoryFilter::is("Shipped");
        let spec = CategoryMatches::new("status", &filter);
        assert!(!spec.is_satisfied_by(&list[0]));
        assert_eq!(FilteredView::new(&list, spec).count(), 0);
    }
}
