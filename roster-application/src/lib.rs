//! 名册应用层（roster-application）
//!
//! - `controller`：实体集合控制器，编排加载、暂存、编辑、提交、删除与筛选
//! - `config`：控制器配置（超时、事件容量、错误提示）
//! - `dto`：面向展示层的只读快照
//! - `presets`：销售订单与用户目录等现成部署
//!
pub mod config;
pub mod controller;
pub mod dto;
pub mod error;
pub mod presets;

pub use config::ControllerConfig;
pub use controller::{CommitOutcome, ControllerState, EntityCollectionController};
pub use error::{AppError, AppResult};
