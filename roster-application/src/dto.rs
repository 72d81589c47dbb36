use roster_domain::draft::DraftForm;
use roster_domain::entity::EntityId;
use serde::Serialize;
use serde_json::Value;

use crate::controller::{ControllerState, EntityCollectionController};

/// 数据传输对象（DTO）
///
/// - 作为应用层的输出载体，面向展示层序列化友好；
/// - 与领域模型解耦，避免将控制器内部状态直接暴露到展示层；
/// - 应保持只读特性与简洁结构。
pub trait Dto: Serialize + Send + Sync + 'static {
    fn to_json(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}

/// 控制器状态快照
///
/// 实体以扁平 JSON 对象表示（标识字段名取自 schema），保持集合顺序。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControllerSnapshot {
    pub entity: String,
    pub state: ControllerState,
    pub loading: bool,
    pub error: Option<String>,
    pub editing: Option<EntityId>,
    pub draft: DraftForm,
    pub filter_options: Vec<String>,
    pub entities: Vec<Value>,
}

impl ControllerSnapshot {
    pub(crate) fn capture(controller: &EntityCollectionController) -> Self {
        let schema = controller.schema();
        Self {
            entity: schema.entity().to_string(),
            state: controller.state(),
            loading: controller.is_loading(),
            error: controller.error_message(),
            editing: controller.edit_target().cloned(),
            draft: controller.draft().clone(),
            filter_options: controller.filter_options(),
            entities: controller
                .entities()
                .iter()
                .map(|e| e.to_json(schema))
                .collect(),
        }
    }
}

impl Dto for ControllerSnapshot {}
