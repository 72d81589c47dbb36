use roster_domain::error::DomainError;

/// 应用层错误
///
/// 在领域错误之外补充 `load()` 的超时与取消；两者与数据源失败同属“网络类”错误。
#[non_exhaustive]
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("load timed out after {after_ms} ms")]
    Timeout { after_ms: u64 },

    #[error("load cancelled")]
    Cancelled,
}

impl AppError {
    /// 是否按“获取失败”提示展示
    pub fn is_network(&self) -> bool {
        match self {
            AppError::Domain(err) => err.is_network(),
            AppError::Timeout { .. } | AppError::Cancelled => true,
        }
    }

    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            AppError::Domain(err) => Some(err),
            _ => None,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
