use std::time::Duration;

use bon::Builder;

/// `load()` 的默认超时
pub const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_secs(10);
/// 事件广播缓冲区的默认容量
pub const DEFAULT_EVENT_CAPACITY: usize = 64;
/// 网络类错误的默认提示
pub const DEFAULT_LOAD_ERROR_MESSAGE: &str = "Failed to fetch entities. Please try again.";

/// 控制器配置
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct ControllerConfig {
    /// 单次加载的最长等待时间
    #[builder(default = DEFAULT_LOAD_TIMEOUT)]
    pub load_timeout: Duration,
    /// 订阅事件的缓冲区容量，落后超过该数量的订阅者会跳过旧事件
    #[builder(default = DEFAULT_EVENT_CAPACITY)]
    pub event_capacity: usize,
    /// 加载失败（含超时、取消）时展示给用户的提示
    #[builder(into, default = DEFAULT_LOAD_ERROR_MESSAGE.to_string())]
    pub load_error_message: String,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
