//! Reverses a recorded batch operation by replaying its pre-images.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use crate::error::{RecruitError, StoreError};
use crate::ledger::{BatchOperationRecord, OperationLedger};
use crate::locks::TenantLocks;
use crate::model::{Actor, EntityId, EntitySnapshot, OperationId, Role, TenantId};
use crate::store::{ActorDirectory, EntityStore};

/// The first item that could not be restored.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RollbackFailure {
    pub id: EntityId,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RollbackOutcome {
    pub operation_id: OperationId,
    pub restored: usize,
    pub failure: Option<RollbackFailure>,
}

impl RollbackOutcome {
    pub fn success(&self) -> bool {
        self.failure.is_none()
    }
}

pub struct RollbackEngine {
    store: Arc<dyn EntityStore>,
    ledger: Arc<OperationLedger>,
    directory: Arc<dyn ActorDirectory>,
    locks: Arc<TenantLocks>,
    elevated_roles: Vec<Role>,
}

impl RollbackEngine {
    pub fn new(
        store: Arc<dyn EntityStore>,
        ledger: Arc<OperationLedger>,
        directory: Arc<dyn ActorDirectory>,
        locks: Arc<TenantLocks>,
    ) -> Self {
        Self {
            store,
            ledger,
            directory,
            locks,
            elevated_roles: vec![Role::Admin, Role::Owner],
        }
    }

    pub fn with_elevated_roles(mut self, roles: Vec<Role>) -> Self {
        self.elevated_roles = roles;
        self
    }

    /// Restores every entity touched by `operation_id` to its pre-image.
    ///
    /// Only the actor who ran the operation, or an actor whose *current*
    /// role is elevated, may roll it back. Replay stops at the first item
    /// that fails; the record is marked consumed only when every item was
    /// restored.
    pub async fn rollback(
        &self,
        operation_id: &OperationId,
        actor: &Actor,
    ) -> Result<RollbackOutcome, RecruitError> {
        let tenant = &actor.tenant_id;
        let _guard = self.locks.acquire(tenant).await;

        let record = self
            .ledger
            .get(operation_id)
            .await
            .filter(|record| &record.tenant_id == tenant)
            .ok_or_else(|| RecruitError::NotFound(format!("bulk operation {operation_id}")))?;

        self.authorize(&record, actor).await?;

        if record.is_consumed() {
            return Err(RecruitError::RollbackUnavailable(format!(
                "operation {operation_id} has already been rolled back"
            )));
        }

        let mut restored = 0;
        let mut failure = None;
        for (id, snapshot) in record.pre_images() {
            let replayed = if record.action.is_delete() {
                self.recreate(tenant, snapshot).await
            } else {
                self.store
                    .replace(tenant, snapshot.entity.clone())
                    .await
                    .map(|_| ())
            };
            match replayed {
                Ok(()) => restored += 1,
                Err(e) => {
                    failure = Some(RollbackFailure {
                        id,
                        message: e.to_string(),
                    });
                    break;
                }
            }
        }

        let outcome = RollbackOutcome {
            operation_id: operation_id.clone(),
            restored,
            failure,
        };

        match &outcome.failure {
            None => {
                self.ledger
                    .mark_consumed(operation_id, &actor.id, Utc::now())
                    .await?;
                tracing::info!(
                    operation = %operation_id,
                    %tenant,
                    actor = %actor.id,
                    restored,
                    "bulk operation rolled back"
                );
            }
            Some(failed) => {
                tracing::warn!(
                    operation = %operation_id,
                    %tenant,
                    actor = %actor.id,
                    restored,
                    failed_id = failed.id,
                    "rollback aborted: {}",
                    failed.message
                );
            }
        }

        Ok(outcome)
    }

    async fn authorize(
        &self,
        record: &BatchOperationRecord,
        actor: &Actor,
    ) -> Result<(), RecruitError> {
        if record.actor_id == actor.id {
            return Ok(());
        }
        let current = self
            .directory
            .current_role(&record.tenant_id, &actor.id)
            .await?;
        if current.is_some_and(|role| self.elevated_roles.contains(&role)) {
            return Ok(());
        }
        tracing::warn!(
            operation = %record.id,
            actor = %actor.id,
            owner = %record.actor_id,
            "rollback denied"
        );
        Err(RecruitError::Authorization(
            "only the actor who ran the operation or an administrator can roll it back".into(),
        ))
    }

    // Re-inserts a deleted entity under its original id. An identical entity
    // already present (left by an earlier, aborted replay) counts as restored.
    async fn recreate(
        &self,
        tenant: &TenantId,
        snapshot: &EntitySnapshot,
    ) -> Result<(), StoreError> {
        match self.store.restore(tenant, snapshot.entity.clone()).await {
            Ok(_) => Ok(()),
            Err(StoreError::AlreadyExists { entity_type, id }) => {
                let current = self
                    .store
                    .get(tenant, snapshot.entity.entity_type(), id)
                    .await?;
                if current.as_ref() == Some(&snapshot.entity) {
                    Ok(())
                } else {
                    Err(StoreError::AlreadyExists { entity_type, id })
                }
            }
            Err(e) => Err(e),
        }
    }
}
