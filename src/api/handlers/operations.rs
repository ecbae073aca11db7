//! Operation ledger handlers.
//!
//! GET  /bulk-operations                          newest-first page for the tenant
//! GET  /bulk-operations/:operation_id            full record with pre-images
//! POST /bulk-operations/:operation_id/rollback   undo a batch (requires confirm)

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query};
use axum::{Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::api::error::AppError;
use crate::error::RecruitError;
use crate::ledger::LedgerPage;
use crate::lifecycle::EntityType;
use crate::model::{Actor, ActorId, EntityId, EntitySnapshot, OperationId};

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationDetail {
    pub id: OperationId,
    pub actor_id: ActorId,
    pub action: &'static str,
    pub entity_type: EntityType,
    pub timestamp: DateTime<Utc>,
    pub reason: Option<String>,
    pub affected_ids: Vec<EntityId>,
    pub affected_count: usize,
    pub original_data: Vec<EntitySnapshot>,
    pub rollback_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rolled_back_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rolled_back_by: Option<ActorId>,
}

#[derive(Debug, Deserialize)]
pub struct RollbackRequest {
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RollbackResponse {
    pub success: bool,
    pub message: String,
    pub operation_id: OperationId,
}

pub async fn list_operations(
    Extension(state): Extension<AppState>,
    Extension(actor): Extension<Actor>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<LedgerPage>, AppError> {
    let Query(params) = params?;
    let limit = match params.limit {
        Some(0) => {
            return Err(RecruitError::Validation("limit must be at least 1".into()).into());
        }
        Some(limit) => limit.min(state.paging.max_page_size),
        None => state.paging.default_page_size,
    };
    let offset = params.offset.unwrap_or(0);

    let page = state
        .ledger
        .list_by_tenant(&actor.tenant_id, limit, offset)
        .await;
    Ok(Json(page))
}

pub async fn get_operation(
    Extension(state): Extension<AppState>,
    Extension(actor): Extension<Actor>,
    Path(operation_id): Path<String>,
) -> Result<Json<OperationDetail>, AppError> {
    let operation_id = OperationId::new(operation_id);
    let record = state
        .ledger
        .get(&operation_id)
        .await
        .filter(|record| record.tenant_id == actor.tenant_id)
        .ok_or_else(|| RecruitError::NotFound(format!("bulk operation {operation_id}")))?;

    Ok(Json(OperationDetail {
        entity_type: record.entity_type(),
        action: record.action.as_str(),
        affected_ids: record.affected_ids().to_vec(),
        affected_count: record.affected_count(),
        original_data: record.original_snapshots().to_vec(),
        rollback_available: record.rollback_available(),
        rolled_back_at: record.rolled_back_at(),
        rolled_back_by: record.rolled_back_by().cloned(),
        id: record.id,
        actor_id: record.actor_id,
        timestamp: record.timestamp,
        reason: record.reason,
    }))
}

pub async fn rollback_operation(
    Extension(state): Extension<AppState>,
    Extension(actor): Extension<Actor>,
    Path(operation_id): Path<String>,
    payload: Result<Json<RollbackRequest>, JsonRejection>,
) -> Result<Json<RollbackResponse>, AppError> {
    let confirmed = payload.map(|Json(body)| body.confirm).unwrap_or(false);
    if !confirmed {
        return Err(RecruitError::Validation(
            "rollback requires {\"confirm\": true}".into(),
        )
        .into());
    }

    let operation_id = OperationId::new(operation_id);
    let outcome = state.rollback.rollback(&operation_id, &actor).await?;
    if !outcome.success() {
        // Item-level detail stays in the server log.
        return Err(RecruitError::RollbackFailed {
            operation_id: operation_id.to_string(),
            message: "not every entity could be restored".into(),
        }
        .into());
    }

    Ok(Json(RollbackResponse {
        success: true,
        message: format!(
            "Rolled back {} {}",
            outcome.restored,
            if outcome.restored == 1 { "entity" } else { "entities" }
        ),
        operation_id,
    }))
}
