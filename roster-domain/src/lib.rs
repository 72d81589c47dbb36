//! 名册领域层基础库（roster-domain）
//!
//! 提供客户端实体集合 CRUD 所需的领域构件：
//! - 实体（`entity`）与字段取值（`value_object`）建模
//! - 部署相关的结构配置（`schema`）与类型化记录（`record`）
//! - 提交前的草稿表单（`draft`）
//! - 分类筛选规约与惰性视图（`specification`）
//! - 初始集合的数据源协议与通用实现（`source`）
//! - 集合变更事件（`domain_event`）与进程内事件总线（`eventing`）
//!
//! 本 crate 与渲染方式完全解耦，仅定义领域模型、协议与最小必要的错误类型。
//!
//! 典型用法：
//! 1. 用 `#[record]` 声明记录结构体，或从 JSON 加载 `EntitySchema`；
//! 2. 选择 `source` 中的数据源并提供部署相关的 `RecordTransform`；
//! 3. 交给应用层的控制器编排加载、暂存、提交与删除。
//!
pub mod domain_event;
pub mod draft;
pub mod entity;
pub mod error;
pub mod eventing;
pub mod record;
pub mod schema;
pub mod source;
pub mod specification;
pub mod value_object;

// 允许在本 crate 内部通过 ::roster_domain 进行自引用，
// 以便过程宏在本 crate 的单元测试中也能解析到 ::roster_domain 路径。
extern crate self as roster_domain;
