//! 领域层统一错误定义
//!
//! 覆盖数据源（网络/数据格式）、草稿校验、标识唯一性、目标缺失与配置解析等
//! 最小必要集合，便于在应用层统一转换并写入控制器的错误槽。
//!
use thiserror::Error;

/// 统一错误类型（基础库最小必要集）
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    // --- 数据源 ---
    #[error("network error: {reason}")]
    Network { reason: String },

    // --- 草稿/提交 ---
    #[error("{field}: {reason}")]
    Validation { field: String, reason: String },
    #[error("identifier {id} must be unique")]
    DuplicateIdentifier { id: String },
    #[error("entity not found: {id}")]
    NotFound { id: String },

    // --- 配置/序列化 ---
    #[error("serialization error: {reason}")]
    Serde { reason: String },
    #[error("parse error: {reason}")]
    Parse { reason: String },
    #[error("invalid schema: {reason}")]
    InvalidSchema { reason: String },
    #[error("type mismatch: field={field}, expected={expected}, found={found}")]
    TypeMismatch {
        field: String,
        expected: String,
        found: String,
    },
}

impl DomainError {
    pub fn network(reason: impl Into<String>) -> Self {
        Self::Network {
            reason: reason.into(),
        }
    }

    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// 是否属于“数据源不可达或数据格式错误”一类
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }
}

/// 统一 Result 类型别名
pub type DomainResult<T> = Result<T, DomainError>;

// ---- Cross-crate conversions ----
// 允许在数据源与配置解析处直接使用 `?` 转换为 DomainError

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::Serde {
            reason: err.to_string(),
        }
    }
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for DomainError {
    fn from(err: reqwest::Error) -> Self {
        DomainError::Network {
            reason: err.to_string(),
        }
    }
}

impl From<std::num::ParseIntError> for DomainError {
    fn from(err: std::num::ParseIntError) -> Self {
        DomainError::Parse {
            reason: err.to_string(),
        }
    }
}

impl From<std::num::ParseFloatError> for DomainError {
    fn from(err: std::num::ParseFloatError) -> Self {
        DomainError::Parse {
            reason: err.to_string(),
        }
    }
}

impl From<chrono::ParseError> for DomainError {
    fn from(err: chrono::ParseError) -> Self {
        DomainError::Parse {
            reason: err.to_string(),
        }
    }
}
