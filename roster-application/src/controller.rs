//! 实体集合控制器（EntityCollectionController）
//!
//! 持有内存中的实体集合与表单相关的瞬时状态（草稿、编辑目标、加载标志、最近一次错误），
//! 对外提供加载、暂存、编辑、提交、删除与筛选操作。
//!
//! 所有修改操作都以 `&mut self` 进行，`load()` 在等待数据源期间独占控制器，
//! 因此集合不会与其他操作交错。每次可观察状态变化后发布一条 [`CollectionEvent`]。
//!
use std::collections::HashSet;
use std::sync::Arc;

use bon::bon;
use futures_core::stream::BoxStream;
use roster_domain::domain_event::{CollectionEvent, FieldChange};
use roster_domain::draft::DraftForm;
use roster_domain::entity::{Entity, EntityId};
use roster_domain::error::{DomainError, DomainResult};
use roster_domain::eventing::InMemoryEventBus;
use roster_domain::schema::{EntitySchema, IdentifierPolicy};
use roster_domain::source::{DataSource, RawRecord, RecordTransform, SchemaTransform};
use roster_domain::specification::{ALL, CategoryFilter, CategoryMatches, FilteredView};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::ControllerConfig;
use crate::dto::ControllerSnapshot;
use crate::error::{AppError, AppResult};

/// 控制器状态
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ControllerState {
    #[default]
    Idle,
    Loading,
    Error,
}

impl ControllerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControllerState::Idle => "idle",
            ControllerState::Loading => "loading",
            ControllerState::Error => "error",
        }
    }
}

/// 一次成功提交的结果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CommitOutcome {
    Created { id: EntityId },
    Updated { id: EntityId, changes: Vec<FieldChange> },
}

impl CommitOutcome {
    pub fn id(&self) -> &EntityId {
        match self {
            CommitOutcome::Created { id } | CommitOutcome::Updated { id, .. } => id,
        }
    }
}

pub struct EntityCollectionController {
    schema: Arc<EntitySchema>,
    source: Arc<dyn DataSource>,
    transform: Arc<dyn RecordTransform>,
    config: ControllerConfig,
    entities: Vec<Entity>,
    draft: DraftForm,
    edit_target: Option<EntityId>,
    loading: bool,
    error: Option<AppError>,
    events: InMemoryEventBus<CollectionEvent>,
}

#[bon]
impl EntityCollectionController {
    /// 构建一个空集合、空闲状态的控制器
    ///
    /// 未提供 `transform` 时按 schema 直接映射同名字段（[`SchemaTransform`]）。
    #[builder]
    pub fn new(
        #[builder(into)] schema: Arc<EntitySchema>,
        source: Arc<dyn DataSource>,
        transform: Option<Arc<dyn RecordTransform>>,
        #[builder(default)] config: ControllerConfig,
    ) -> Self {
        let transform: Arc<dyn RecordTransform> = match transform {
            Some(t) => t,
            None => Arc::new(SchemaTransform::new(schema.clone())),
        };
        let events = InMemoryEventBus::new(config.event_capacity);
        Self {
            draft: DraftForm::empty(&schema),
            schema,
            source,
            transform,
            config,
            entities: Vec::new(),
            edit_target: None,
            loading: false,
            error: None,
            events,
        }
    }
}

impl EntityCollectionController {
    /// 启动：立即执行一次加载
    ///
    /// 加载失败不会中止启动，错误保存在错误槽中，可通过 [`Self::error_message`] 读取。
    pub async fn start(mut self) -> Self {
        if let Err(err) = self.load().await {
            debug!(error = %err, "initial load failed");
        }
        self
    }

    /// 从数据源加载初始集合，返回加载到的实体数量
    pub async fn load(&mut self) -> AppResult<usize> {
        self.load_with_cancel(&CancellationToken::new()).await
    }

    /// 可取消的加载
    ///
    /// 成功时替换整个集合并清空错误；失败（数据源错误、超时、取消）时保留原集合，
    /// 写入错误槽。无论成功与否都会清除加载标志。
    pub async fn load_with_cancel(&mut self, token: &CancellationToken) -> AppResult<usize> {
        self.loading = true;
        self.publish(CollectionEvent::LoadStarted);
        info!(entity = self.schema.entity(), "loading initial entities");

        let timeout = self.config.load_timeout;
        let source = self.source.clone();
        let fetched = tokio::select! {
            biased;
            _ = token.cancelled() => Err(AppError::Cancelled),
            res = tokio::time::timeout(timeout, source.fetch_initial_entities()) => match res {
                Ok(records) => records.map_err(AppError::from),
                Err(_) => Err(AppError::Timeout {
                    after_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                }),
            },
        };
        let result = fetched.and_then(|records| self.materialize(records).map_err(AppError::from));
        self.loading = false;

        match result {
            Ok(entities) => {
                let count = entities.len();
                self.entities = entities;
                self.error = None;
                self.drop_stale_edit_target();
                info!(entity = self.schema.entity(), count, "entities loaded");
                self.publish(CollectionEvent::Loaded { count });
                Ok(count)
            }
            Err(err) => {
                warn!(entity = self.schema.entity(), error = %err, "failed to load entities");
                self.error = Some(err.clone());
                self.publish(CollectionEvent::LoadFailed {
                    reason: err.to_string(),
                });
                Err(err)
            }
        }
    }

    /// 转换原始记录并检查标识唯一；任何失败都按数据格式错误处理
    fn materialize(&self, records: Vec<RawRecord>) -> DomainResult<Vec<Entity>> {
        let mut seen = HashSet::with_capacity(records.len());
        let mut entities = Vec::with_capacity(records.len());
        for raw in records {
            let entity = self.transform.transform(raw).map_err(|err| {
                if err.is_network() {
                    err
                } else {
                    DomainError::network(format!("malformed record: {err}"))
                }
            })?;
            if !seen.insert(entity.id().clone()) {
                return Err(DomainError::network(format!(
                    "duplicate identifier {} in loaded data",
                    entity.id()
                )));
            }
            entities.push(entity);
        }
        Ok(entities)
    }

    /// 合并部分字段到草稿，不做校验，返回实际写入的字段名
    ///
    /// 编辑模式下标识字段不可修改。
    pub fn stage_draft<I, K, V>(&mut self, partial: I) -> Vec<String>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let lock_identifier = self.edit_target.is_some();
        let staged = self.draft.stage(&self.schema, partial, lock_identifier);
        if !staged.is_empty() {
            debug!(fields = ?staged, "draft staged");
            self.publish(CollectionEvent::DraftChanged {
                fields: staged.clone(),
            });
        }
        staged
    }

    /// 进入编辑模式：以实体当前取值填充草稿
    ///
    /// 标识不存在时返回 `NotFound`，不改变任何状态。
    pub fn begin_edit(&mut self, id: impl Into<EntityId>) -> AppResult<()> {
        let id = id.into();
        let Some(draft) = self
            .get(id.as_str())
            .map(|entity| DraftForm::from_entity(&self.schema, entity))
        else {
            return Err(DomainError::NotFound { id: id.to_string() }.into());
        };
        self.draft = draft;
        debug!(id = %id, "edit started");
        self.edit_target = Some(id.clone());
        self.publish(CollectionEvent::EditStarted { id });
        Ok(())
    }

    /// 放弃编辑，回到新建模式
    pub fn cancel_edit(&mut self) {
        self.reset_form();
        self.publish(CollectionEvent::EditCancelled);
    }

    /// 提交草稿：编辑模式下更新目标实体，否则新建
    ///
    /// 失败时集合保持不变，错误写入错误槽；成功时清空草稿并回到新建模式。
    pub fn commit(&mut self) -> AppResult<CommitOutcome> {
        self.loading = true;
        let result = match self.edit_target.clone() {
            Some(id) => self.apply_update(id),
            None => self.apply_create(),
        };
        self.loading = false;

        match result {
            Ok(outcome) => {
                self.reset_form();
                self.error = None;
                match &outcome {
                    CommitOutcome::Created { id } => {
                        info!(entity = self.schema.entity(), id = %id, "entity created");
                        self.publish(CollectionEvent::Created { id: id.clone() });
                    }
                    CommitOutcome::Updated { id, changes } => {
                        info!(
                            entity = self.schema.entity(),
                            id = %id,
                            changed = changes.len(),
                            "entity updated"
                        );
                        self.publish(CollectionEvent::Updated {
                            id: id.clone(),
                            changes: changes.clone(),
                        });
                    }
                }
                Ok(outcome)
            }
            Err(err) => {
                let err = AppError::from(err);
                warn!(entity = self.schema.entity(), error = %err, "commit rejected");
                self.error = Some(err.clone());
                self.publish(CollectionEvent::CommitRejected {
                    reason: err.to_string(),
                });
                Err(err)
            }
        }
    }

    fn apply_update(&mut self, id: EntityId) -> DomainResult<CommitOutcome> {
        let fields = self.draft.parse_fields(&self.schema)?;
        let entity = self
            .entities
            .iter_mut()
            .find(|e| *e.id() == id)
            .ok_or_else(|| DomainError::NotFound { id: id.to_string() })?;
        let changes = entity.merge(fields);
        Ok(CommitOutcome::Updated { id, changes })
    }

    fn apply_create(&mut self) -> DomainResult<CommitOutcome> {
        // 自动分配的标识始终检查唯一，开关只放宽手工标识
        let (id, check_unique) = match self.schema.identifier() {
            IdentifierPolicy::Manual => (
                self.draft.parse_identifier(&self.schema)?,
                self.schema.enforce_unique_identifier_on_create(),
            ),
            IdentifierPolicy::Generated => (self.next_identifier()?, true),
        };
        if check_unique && self.get(id.as_str()).is_some() {
            return Err(DomainError::DuplicateIdentifier { id: id.to_string() });
        }
        let fields = self.draft.parse_fields(&self.schema)?;
        self.entities.push(Entity::new(id.clone(), fields));
        Ok(CommitOutcome::Created { id })
    }

    /// 现有最大数字标识 + 1（没有数字标识时从 1 开始）
    fn next_identifier(&self) -> DomainResult<EntityId> {
        let max = self
            .entities
            .iter()
            .filter_map(|e| e.id().as_number())
            .max()
            .unwrap_or(0);
        let next = max.checked_add(1).ok_or_else(|| {
            let label = self
                .schema
                .id_spec()
                .map(|s| s.label())
                .unwrap_or(self.schema.id_field());
            DomainError::validation(label, "no identifier left to assign")
        })?;
        Ok(EntityId::from(next.to_string()))
    }

    /// 删除实体；标识不存在时无副作用。返回是否删除了实体
    ///
    /// 删除总会清空错误槽；若编辑目标被删除，同时退出编辑模式。
    pub fn remove(&mut self, id: impl Into<EntityId>) -> bool {
        let id = id.into();
        self.error = None;

        let before = self.entities.len();
        self.entities.retain(|e| *e.id() != id);
        let removed = self.entities.len() != before;

        if self.edit_target.as_ref() == Some(&id) {
            self.reset_form();
            self.publish(CollectionEvent::EditCancelled);
        }
        if removed {
            info!(entity = self.schema.entity(), id = %id, "entity removed");
            self.publish(CollectionEvent::Removed { id });
        } else {
            debug!(id = %id, "remove ignored; entity not present");
        }
        removed
    }

    /// 按分类筛选的惰性视图，每次调用都基于当前集合
    pub fn filtered_view<'a>(&'a self, filter: &'a CategoryFilter) -> FilteredView<'a> {
        FilteredView::new(
            &self.entities,
            CategoryMatches::new(self.schema.category_field(), filter),
        )
    }

    fn reset_form(&mut self) {
        self.draft = DraftForm::empty(&self.schema);
        self.edit_target = None;
    }

    fn drop_stale_edit_target(&mut self) {
        let stale = self
            .edit_target
            .as_ref()
            .is_some_and(|id| self.get(id.as_str()).is_none());
        if stale {
            self.reset_form();
            self.publish(CollectionEvent::EditCancelled);
        }
    }

    fn publish(&self, event: CollectionEvent) {
        debug!(event_type = event.event_type(), "publishing collection event");
        self.events.publish(event);
    }

    // -------- read accessors --------

    pub fn schema(&self) -> &EntitySchema {
        &self.schema
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id().as_str() == id)
    }

    pub fn draft(&self) -> &DraftForm {
        &self.draft
    }

    pub fn edit_target(&self) -> Option<&EntityId> {
        self.edit_target.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.edit_target.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn state(&self) -> ControllerState {
        if self.loading {
            ControllerState::Loading
        } else if self.error.is_some() {
            ControllerState::Error
        } else {
            ControllerState::Idle
        }
    }

    pub fn error(&self) -> Option<&AppError> {
        self.error.as_ref()
    }

    /// 面向用户的错误提示：网络类错误使用配置的提示语，其余使用错误自身的信息
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(|err| {
            if err.is_network() {
                self.config.load_error_message.clone()
            } else {
                err.to_string()
            }
        })
    }

    /// 筛选下拉框的选项："All" 在前
    ///
    /// schema 未声明分类时，按首次出现顺序取集合中的分类值。
    pub fn filter_options(&self) -> Vec<String> {
        let mut options = vec![ALL.to_string()];
        if !self.schema.categories().is_empty() {
            options.extend(self.schema.categories().iter().cloned());
            return options;
        }
        let mut seen = HashSet::new();
        for entity in &self.entities {
            let Some(value) = entity.field(self.schema.category_field()) else {
                continue;
            };
            let value = value.to_input();
            if !value.is_empty() && value != ALL && seen.insert(value.clone()) {
                options.push(value);
            }
        }
        options
    }

    /// 当前状态的只读快照
    pub fn snapshot(&self) -> ControllerSnapshot {
        ControllerSnapshot::capture(self)
    }

    /// 订阅状态变更事件
    pub fn subscribe(&self) -> BoxStream<'static, CollectionEvent> {
        self.events.subscribe()
    }
}

impl std::fmt::Debug for EntityCollectionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityCollectionController")
            .field("entity", &self.schema.entity())
            .field("len", &self.entities.len())
            .field("edit_target", &self.edit_target)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
