//! POST /jobs/bulk         apply one action to many jobs
//! POST /candidates/bulk   apply one action to many candidates

use axum::extract::rejection::JsonRejection;
use axum::{Extension, Json};
use serde::Deserialize;

use crate::api::AppState;
use crate::api::error::AppError;
use crate::batch::{BatchOutcome, BatchRequest, CandidateAction, JobAction};
use crate::model::{Actor, EntityId};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkJobRequest {
    pub job_ids: Vec<EntityId>,
    pub action: JobAction,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkCandidateRequest {
    pub candidate_ids: Vec<EntityId>,
    pub action: CandidateAction,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

pub async fn bulk_jobs(
    Extension(state): Extension<AppState>,
    Extension(actor): Extension<Actor>,
    payload: Result<Json<BulkJobRequest>, JsonRejection>,
) -> Result<Json<BatchOutcome>, AppError> {
    let Json(body) = payload?;
    let request = BatchRequest {
        action: body.action.into(),
        ids: body.job_ids,
        reason: body.reason,
        notes: None,
    };
    let outcome = state.executor.execute(&actor, request).await?;
    Ok(Json(outcome))
}

pub async fn bulk_candidates(
    Extension(state): Extension<AppState>,
    Extension(actor): Extension<Actor>,
    payload: Result<Json<BulkCandidateRequest>, JsonRejection>,
) -> Result<Json<BatchOutcome>, AppError> {
    let Json(body) = payload?;
    let request = BatchRequest {
        action: body.action.into(),
        ids: body.candidate_ids,
        reason: body.reason,
        notes: body.notes,
    };
    let outcome = state.executor.execute(&actor, request).await?;
    Ok(Json(outcome))
}
