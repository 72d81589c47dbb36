use serde::Serialize;

use super::FieldChange;
use crate::entity::EntityId;

/// 控制器发布的状态变更事件
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CollectionEvent {
    LoadStarted,
    Loaded { count: usize },
    LoadFailed { reason: String },
    DraftChanged { fields: Vec<String> },
    EditStarted { id: EntityId },
    EditCancelled,
    Created { id: EntityId },
    Updated { id: EntityId, changes: Vec<FieldChange> },
    Removed { id: EntityId },
    CommitRejected { reason: String },
}

impl CollectionEvent {
    /// 稳定的事件类型名，用于日志
    pub fn event_type(&self) -> &'static str {
        match self {
            CollectionEvent::LoadStarted => "load_started",
            CollectionEvent::Loaded { .. } => "loaded",
            CollectionEvent::LoadFailed { .. } => "load_failed",
            CollectionEvent::DraftChanged { .. } => "draft_changed",
            CollectionEvent::EditStarted { .. } => "edit_started",
            CollectionEvent::EditCancelled => "edit_cancelled",
            CollectionEvent::Created { .. } => "created",
            CollectionEvent::Updated { .. } => "updated",
            CollectionEvent::Removed { .. } => "removed",
            CollectionEvent::CommitRejected { .. } => "commit_rejected",
        }
    }

    /// 是否改变了集合本身（而非草稿/编辑状态）
    pub fn touches_collection(&self) -> bool {
        matches!(
            self,
            CollectionEvent::Loaded { .. }
                | CollectionEvent::Created { .. }
                | CollectionEvent::Updated { .. }
                | CollectionEvent::Removed { .. }
        )
    }
}
