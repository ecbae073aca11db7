//! Transition-gated status changes for one job or candidate.

use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use crate::error::RecruitError;
use crate::lifecycle::{EntityType, LifecycleStatus, TransitionValidator};
use crate::locks::TenantLocks;
use crate::model::{Actor, Entity, EntityId};
use crate::store::EntityStore;

/// Where an entity may go from its current status.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionOptions {
    pub entity_type: EntityType,
    pub id: EntityId,
    pub current_status: &'static str,
    pub allowed_transitions: Vec<&'static str>,
    pub is_terminal: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChange {
    pub previous_status: &'static str,
    pub new_status: &'static str,
    pub entity: Entity,
}

pub struct StatusService {
    store: Arc<dyn EntityStore>,
    locks: Arc<TenantLocks>,
}

impl StatusService {
    pub fn new(store: Arc<dyn EntityStore>, locks: Arc<TenantLocks>) -> Self {
        Self { store, locks }
    }

    pub async fn transitions(
        &self,
        actor: &Actor,
        entity_type: EntityType,
        id: EntityId,
    ) -> Result<TransitionOptions, RecruitError> {
        let entity = self.load(actor, entity_type, id).await?;
        let current_status = entity.status_label();
        let allowed_transitions =
            TransitionValidator::allowed_next_raw(entity_type, current_status);
        Ok(TransitionOptions {
            entity_type,
            id,
            current_status,
            is_terminal: allowed_transitions.is_empty(),
            allowed_transitions,
        })
    }

    /// Moves one entity to `requested` if the transition graph allows it.
    pub async fn change_status(
        &self,
        actor: &Actor,
        entity_type: EntityType,
        id: EntityId,
        requested: &str,
        reason: Option<&str>,
    ) -> Result<StatusChange, RecruitError> {
        let _guard = self.locks.acquire(&actor.tenant_id).await;
        let entity = self.load(actor, entity_type, id).await?;
        let previous_status = entity.status_label();
        let now = Utc::now();
        let reason = reason.map(str::trim).filter(|r| !r.is_empty());

        let mut updated = match entity {
            Entity::Job(mut job) => {
                job.status = gate(job.status, requested)?;
                Entity::Job(job)
            }
            Entity::Candidate(mut candidate) => {
                candidate.status = gate(candidate.status, requested)?;
                if let Some(reason) = reason {
                    let label = format!("Status changed to {}", candidate.status);
                    candidate.append_note(now, &label, reason);
                }
                Entity::Candidate(candidate)
            }
        };
        updated.touch(now);

        let saved = self.store.replace(&actor.tenant_id, updated).await?;
        let new_status = saved.status_label();
        tracing::info!(
            tenant = %actor.tenant_id,
            actor = %actor.id,
            %entity_type,
            id,
            from = previous_status,
            to = new_status,
            reason = reason.unwrap_or_default(),
            "status changed"
        );

        Ok(StatusChange {
            previous_status,
            new_status,
            entity: saved,
        })
    }

    async fn load(
        &self,
        actor: &Actor,
        entity_type: EntityType,
        id: EntityId,
    ) -> Result<Entity, RecruitError> {
        self.store
            .get(&actor.tenant_id, entity_type, id)
            .await?
            .ok_or_else(|| RecruitError::NotFound(format!("{entity_type} {id}")))
    }
}

fn gate<S>(current: S, requested: &str) -> Result<S, RecruitError>
where
    S: LifecycleStatus + FromStr<Err = String>,
{
    let requested: S = requested.parse().map_err(RecruitError::Validation)?;
    TransitionValidator::validate(current, requested)?;
    Ok(requested)
}
