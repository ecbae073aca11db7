//! Append-only record of executed batch operations.
//!
//! Records are written once and never rewritten, except for the consumed
//! marker set after a successful rollback. There is no retention policy:
//! records live as long as the ledger does.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::batch::BatchAction;
use crate::error::RecruitError;
use crate::lifecycle::EntityType;
use crate::model::{ActorId, EntityId, EntitySnapshot, OperationId, TenantId};

/// What one batch call changed, with the pre-image of every affected entity.
#[derive(Debug, Clone)]
pub struct BatchOperationRecord {
    pub id: OperationId,
    pub actor_id: ActorId,
    pub tenant_id: TenantId,
    pub action: BatchAction,
    pub timestamp: DateTime<Utc>,
    pub reason: Option<String>,
    // Positionally aligned with `original_snapshots`.
    affected_ids: Vec<EntityId>,
    original_snapshots: Vec<EntitySnapshot>,
    rollback_consumed: bool,
    rolled_back_at: Option<DateTime<Utc>>,
    rolled_back_by: Option<ActorId>,
}

impl BatchOperationRecord {
    pub fn new(
        id: OperationId,
        actor_id: ActorId,
        tenant_id: TenantId,
        action: BatchAction,
        reason: Option<String>,
        snapshots: Vec<EntitySnapshot>,
    ) -> Self {
        let affected_ids = snapshots.iter().map(EntitySnapshot::id).collect();
        Self {
            id,
            actor_id,
            tenant_id,
            action,
            timestamp: Utc::now(),
            reason,
            affected_ids,
            original_snapshots: snapshots,
            rollback_consumed: false,
            rolled_back_at: None,
            rolled_back_by: None,
        }
    }

    pub fn entity_type(&self) -> EntityType {
        self.action.entity_type()
    }

    pub fn affected_ids(&self) -> &[EntityId] {
        &self.affected_ids
    }

    pub fn original_snapshots(&self) -> &[EntitySnapshot] {
        &self.original_snapshots
    }

    /// `(id, pre-image)` pairs in execution order.
    pub fn pre_images(&self) -> impl Iterator<Item = (EntityId, &EntitySnapshot)> {
        self.affected_ids
            .iter()
            .copied()
            .zip(self.original_snapshots.iter())
    }

    pub fn affected_count(&self) -> usize {
        self.affected_ids.len()
    }

    pub fn is_consumed(&self) -> bool {
        self.rollback_consumed
    }

    pub fn rollback_available(&self) -> bool {
        !self.rollback_consumed
    }

    pub fn rolled_back_at(&self) -> Option<DateTime<Utc>> {
        self.rolled_back_at
    }

    pub fn rolled_back_by(&self) -> Option<&ActorId> {
        self.rolled_back_by.as_ref()
    }

    pub fn summary(&self) -> OperationSummary {
        OperationSummary {
            id: self.id.clone(),
            action: self.action.as_str(),
            entity_type: self.entity_type(),
            timestamp: self.timestamp,
            affected_count: self.affected_count(),
            rollback_available: self.rollback_available(),
        }
    }
}

/// List view of a ledger entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationSummary {
    pub id: OperationId,
    pub action: &'static str,
    pub entity_type: EntityType,
    pub timestamp: DateTime<Utc>,
    pub affected_count: usize,
    pub rollback_available: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerPage {
    pub operations: Vec<OperationSummary>,
    pub total: usize,
    pub has_more: bool,
}

#[derive(Default)]
struct LedgerInner {
    records: HashMap<OperationId, BatchOperationRecord>,
    // Insertion order, oldest first.
    order: Vec<OperationId>,
}

/// Shared, concurrency-safe operation ledger. Owned by the application and
/// handed to the executor and the rollback engine.
#[derive(Default)]
pub struct OperationLedger {
    inner: RwLock<LedgerInner>,
}

impl OperationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generate_id() -> OperationId {
        OperationId::new(format!("bulk_{}", Uuid::new_v4().simple()))
    }

    pub async fn append(&self, record: BatchOperationRecord) -> Result<OperationId, RecruitError> {
        let mut inner = self.inner.write().await;
        if inner.records.contains_key(&record.id) {
            return Err(RecruitError::Conflict(format!(
                "operation {} already recorded",
                record.id
            )));
        }
        let id = record.id.clone();
        inner.order.push(id.clone());
        inner.records.insert(id.clone(), record);
        Ok(id)
    }

    pub async fn get(&self, id: &OperationId) -> Option<BatchOperationRecord> {
        self.inner.read().await.records.get(id).cloned()
    }

    /// Newest-first page of the tenant's operations.
    pub async fn list_by_tenant(
        &self,
        tenant: &TenantId,
        limit: usize,
        offset: usize,
    ) -> LedgerPage {
        let inner = self.inner.read().await;
        let owned: Vec<&BatchOperationRecord> = inner
            .order
            .iter()
            .rev()
            .filter_map(|id| inner.records.get(id))
            .filter(|record| &record.tenant_id == tenant)
            .collect();

        let total = owned.len();
        let operations: Vec<OperationSummary> = owned
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(BatchOperationRecord::summary)
            .collect();
        let has_more = offset.saturating_add(operations.len()) < total;

        LedgerPage {
            operations,
            total,
            has_more,
        }
    }

    /// Marks a record as rolled back. Fails if it already was.
    pub async fn mark_consumed(
        &self,
        id: &OperationId,
        actor: &ActorId,
        at: DateTime<Utc>,
    ) -> Result<(), RecruitError> {
        let mut inner = self.inner.write().await;
        let record = inner
            .records
            .get_mut(id)
            .ok_or_else(|| RecruitError::NotFound(format!("bulk operation {id}")))?;
        if record.rollback_consumed {
            return Err(RecruitError::RollbackUnavailable(format!(
                "operation {id} has already been rolled back"
            )));
        }
        record.rollback_consumed = true;
        record.rolled_back_at = Some(at);
        record.rolled_back_by = Some(actor.clone());
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.records.is_empty()
    }
}
