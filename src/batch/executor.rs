use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use serde_json::{Value, json};

use super::action::{BatchAction, CandidateAction};
use crate::error::RecruitError;
use crate::ledger::{BatchOperationRecord, OperationLedger};
use crate::locks::TenantLocks;
use crate::model::{Actor, Entity, EntityId, EntitySnapshot, OperationId, TenantId};
use crate::store::{EntityStore, Notification, NotificationSink};

/// Upper bound on ids per batch when none is configured.
pub const DEFAULT_MAX_BATCH_SIZE: usize = 100;

/// One bulk request for a single tenant.
#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub action: BatchAction,
    pub ids: Vec<EntityId>,
    pub reason: Option<String>,
    pub notes: Option<String>,
}

impl BatchRequest {
    pub fn new(action: impl Into<BatchAction>, ids: Vec<EntityId>) -> Self {
        Self {
            action: action.into(),
            ids,
            reason: None,
            notes: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    // Rejection notes fall back to the reason when no notes were given.
    fn rejection_text(&self) -> Option<&str> {
        self.notes
            .as_deref()
            .or(self.reason.as_deref())
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}

/// Outcome of the action on one target.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchItemResult {
    pub id: EntityId,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchItemResult {
    fn ok(id: EntityId, result: Value) -> Self {
        Self {
            id,
            success: true,
            result: Some(result),
            error: None,
        }
    }

    fn failed(id: EntityId, error: String) -> Self {
        Self {
            id,
            success: false,
            result: None,
            error: Some(error),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub action: &'static str,
}

impl BatchSummary {
    fn from_results(action: BatchAction, results: &[BatchItemResult]) -> Self {
        let successful = results.iter().filter(|r| r.success).count();
        Self {
            total: results.len(),
            successful,
            failed: results.len() - successful,
            action: action.as_str(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutcome {
    pub success: bool,
    pub operation_id: OperationId,
    pub summary: BatchSummary,
    pub results: Vec<BatchItemResult>,
    pub rollback_available: bool,
    pub reason: Option<String>,
}

/// Applies one action to many entities of one tenant.
///
/// Ownership of every id is checked up front and the whole request fails if
/// any id is unknown to the tenant. After that, items run sequentially in
/// input order and a failing item never stops the rest.
///
/// Status actions overwrite the status directly and do not consult the
/// transition graph: bulk actions are an administrative override, so
/// archiving an already archived job succeeds here while the single-entity
/// path rejects it.
pub struct BatchExecutor {
    store: Arc<dyn EntityStore>,
    ledger: Arc<OperationLedger>,
    notifier: Arc<dyn NotificationSink>,
    locks: Arc<TenantLocks>,
    max_batch_size: usize,
}

impl BatchExecutor {
    pub fn new(
        store: Arc<dyn EntityStore>,
        ledger: Arc<OperationLedger>,
        notifier: Arc<dyn NotificationSink>,
        locks: Arc<TenantLocks>,
    ) -> Self {
        Self {
            store,
            ledger,
            notifier,
            locks,
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
        }
    }

    pub fn with_max_batch_size(mut self, max_batch_size: usize) -> Self {
        self.max_batch_size = max_batch_size;
        self
    }

    pub async fn execute(
        &self,
        actor: &Actor,
        request: BatchRequest,
    ) -> Result<BatchOutcome, RecruitError> {
        self.validate(&request)?;
        let action = request.action;
        let tenant = &actor.tenant_id;

        let guard = self.locks.acquire(tenant).await;

        let entities = self.resolve_all(tenant, &request).await?;

        let mut results = Vec::with_capacity(entities.len());
        let mut snapshots = Vec::with_capacity(entities.len());
        for entity in entities {
            let id = entity.id();
            snapshots.push(EntitySnapshot::capture(&entity));
            match self.apply(tenant, &request, entity).await {
                Ok(value) => results.push(BatchItemResult::ok(id, value)),
                Err(e) => {
                    tracing::warn!(%tenant, id, action = %action, "bulk item failed: {e}");
                    results.push(BatchItemResult::failed(id, e.to_string()));
                }
            }
        }

        let summary = BatchSummary::from_results(action, &results);
        let record = BatchOperationRecord::new(
            OperationLedger::generate_id(),
            actor.id.clone(),
            tenant.clone(),
            action,
            request.reason.clone(),
            snapshots,
        );
        let operation_id = self.ledger.append(record).await?;
        drop(guard);

        tracing::info!(
            operation = %operation_id,
            %tenant,
            actor = %actor.id,
            action = %action,
            total = summary.total,
            successful = summary.successful,
            failed = summary.failed,
            "bulk operation completed"
        );

        self.notify(actor, &operation_id, &summary).await;

        Ok(BatchOutcome {
            success: true,
            operation_id,
            summary,
            results,
            rollback_available: true,
            reason: request.reason,
        })
    }

    fn validate(&self, request: &BatchRequest) -> Result<(), RecruitError> {
        if request.ids.is_empty() {
            return Err(RecruitError::Validation(
                "at least one id is required".into(),
            ));
        }
        if request.ids.len() > self.max_batch_size {
            return Err(RecruitError::Validation(format!(
                "at most {} ids are allowed per batch, got {}",
                self.max_batch_size,
                request.ids.len()
            )));
        }
        let mut seen = HashSet::with_capacity(request.ids.len());
        if let Some(dup) = request.ids.iter().find(|id| !seen.insert(**id)) {
            return Err(RecruitError::Validation(format!("duplicate id {dup}")));
        }
        Ok(())
    }

    /// Loads every target or fails without touching anything.
    async fn resolve_all(
        &self,
        tenant: &TenantId,
        request: &BatchRequest,
    ) -> Result<Vec<Entity>, RecruitError> {
        let entity_type = request.action.entity_type();
        let mut entities = Vec::with_capacity(request.ids.len());
        let mut missing = Vec::new();
        for &id in &request.ids {
            match self.store.get(tenant, entity_type, id).await? {
                Some(entity) => entities.push(entity),
                None => missing.push(id.to_string()),
            }
        }

        if !missing.is_empty() {
            tracing::warn!(
                %tenant,
                %entity_type,
                missing = missing.len(),
                "bulk request rejected by ownership check"
            );
            return Err(RecruitError::NotFound(format!(
                "{entity_type}s not found or access denied: {}",
                missing.join(", ")
            )));
        }
        Ok(entities)
    }

    async fn apply(
        &self,
        tenant: &TenantId,
        request: &BatchRequest,
        entity: Entity,
    ) -> Result<Value, RecruitError> {
        let now = Utc::now();
        let id = entity.id();
        let entity_type = entity.entity_type();

        let mut updated = match (request.action, entity) {
            (BatchAction::Job(action), Entity::Job(mut job)) => match action.target_status() {
                Some(status) => {
                    job.status = status;
                    Entity::Job(job)
                }
                None => {
                    self.store.delete(tenant, entity_type, id).await?;
                    return Ok(json!({ "id": id, "deleted": true }));
                }
            },
            (BatchAction::Candidate(action), Entity::Candidate(mut candidate)) => {
                match action.target_status() {
                    Some(status) => {
                        candidate.status = status;
                        if action == CandidateAction::Reject
                            && let Some(text) = request.rejection_text()
                        {
                            candidate.append_note(now, "Rejected", text);
                        }
                        Entity::Candidate(candidate)
                    }
                    None => {
                        self.store.delete(tenant, entity_type, id).await?;
                        return Ok(json!({ "id": id, "deleted": true }));
                    }
                }
            }
            (action, entity) => {
                return Err(RecruitError::Internal(anyhow::anyhow!(
                    "{action} is not a {} action",
                    entity.entity_type()
                )));
            }
        };
        updated.touch(now);

        let saved = self.store.replace(tenant, updated).await?;
        Ok(serde_json::to_value(&saved)?)
    }

    async fn notify(&self, actor: &Actor, operation_id: &OperationId, summary: &BatchSummary) {
        let notification = Notification {
            actor_id: actor.id.clone(),
            tenant_id: actor.tenant_id.clone(),
            title: "Bulk operation completed".into(),
            message: format!(
                "{}: {} of {} succeeded, {} failed",
                summary.action, summary.successful, summary.total, summary.failed
            ),
            operation_id: Some(operation_id.clone()),
        };
        if let Err(e) = self.notifier.notify(&notification).await {
            tracing::warn!(operation = %operation_id, "bulk notification failed: {e:#}");
        }
    }
}
